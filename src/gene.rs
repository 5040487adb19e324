use fnv::FnvHashMap;
use itertools::Itertools;
use serde::Deserialize;

use crate::error::GenoviewError;

pub type GeneId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Direction {
    #[serde(rename = "f")]
    Forward,
    #[serde(rename = "r")]
    Reverse,
}

/// One functional annotation hit: `(code, label, score)`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Annotation(pub String, pub String, pub f64);

impl Annotation {
    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> &str {
        &self.1
    }

    pub fn score(&self) -> f64 {
        self.2
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gene {
    #[serde(rename = "gene_callers_id")]
    pub id: GeneId,
    pub direction: Direction,
    // coordinates along the track's own split
    #[serde(rename = "start_in_split")]
    pub start: u64,
    #[serde(rename = "stop_in_split")]
    pub stop: u64,
    // annotation source (e.g. COG20_CATEGORY) to its hit
    #[serde(default)]
    pub functions: Option<FnvHashMap<String, Annotation>>,
}

impl Gene {
    pub fn new(id: GeneId, direction: Direction, start: u64, stop: u64) -> Self {
        Gene {
            id,
            direction,
            start,
            stop,
            functions: None,
        }
    }

    pub fn with_function(mut self, source: &str, code: &str, label: &str, score: f64) -> Self {
        self.functions.get_or_insert_with(FnvHashMap::default).insert(
            source.to_string(),
            Annotation(code.to_string(), label.to_string(), score),
        );
        self
    }

    pub fn length(&self) -> u64 {
        self.stop.saturating_sub(self.start)
    }

    pub fn midpoint(&self) -> f64 {
        self.start as f64 + (self.stop - self.start) as f64 / 2.0
    }

    fn check_range(&self) -> Result<(), GenoviewError> {
        if self.stop <= self.start {
            return Err(GenoviewError::InvalidGeneRange {
                gene_id: self.id,
                start: self.start,
                stop: self.stop,
            });
        }
        Ok(())
    }
}

/// The genes of one genome or contig, drawn as a single row.
#[derive(Debug, Clone)]
pub struct Track {
    label: String,
    genes: Vec<Gene>,
    // gene id to its position in `genes`
    by_id: FnvHashMap<GeneId, usize>,
}

impl Track {
    /// Validates the gene list: non-empty, every range non-degenerate, starts
    /// in non-decreasing order.
    pub fn new(label: impl Into<String>, genes: Vec<Gene>) -> Result<Self, GenoviewError> {
        let label = label.into();
        if genes.is_empty() {
            return Err(GenoviewError::EmptyTrack(label));
        }
        for gene in &genes {
            gene.check_range()?;
        }
        if let Some((_, next)) = genes.iter().tuple_windows().find(|(a, b)| b.start < a.start) {
            return Err(GenoviewError::UnorderedGenes {
                track: label,
                gene_id: next.id,
            });
        }
        let by_id = genes.iter().enumerate().map(|(i, g)| (g.id, i)).collect();
        Ok(Track { label, genes, by_id })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn gene(&self, id: GeneId) -> Option<&Gene> {
        self.by_id.get(&id).map(|&i| &self.genes[i])
    }

    /// Stop coordinate of the last gene.
    pub fn extent(&self) -> u64 {
        self.genes.last().map_or(0, |g| g.stop)
    }
}
