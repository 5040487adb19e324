use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use boomphf::Mphf;
use flate2::read::MultiGzDecoder;
use fnv::FnvHashMap;
use itertools::Itertools;
use serde::Deserialize;

use crate::error::GenoviewError;
use crate::gene::{Gene, GeneId, Track};

/// An ortholog group: which gene represents it on each track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneCluster {
    members: FnvHashMap<String, GeneId>,
}

impl GeneCluster {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, GeneId)>,
        S: Into<String>,
    {
        GeneCluster {
            members: members.into_iter().map(|(l, id)| (l.into(), id)).collect(),
        }
    }

    pub fn gene_for(&self, track_label: &str) -> Option<GeneId> {
        self.members.get(track_label).copied()
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, GeneId)> {
        self.members.iter().map(|(l, &id)| (l.as_str(), id))
    }
}

#[derive(Deserialize)]
struct TrackRecord {
    #[serde(default)]
    label: Option<String>,
    genes: Vec<Gene>,
}

#[derive(Deserialize)]
struct DatasetRecord {
    tracks: Vec<TrackRecord>,
    #[serde(default)]
    gene_clusters: FnvHashMap<String, FnvHashMap<String, GeneId>>,
}

/// The tracks to draw and the gene clusters they can be aligned on.
pub struct Dataset {
    tracks: Vec<Track>,
    clusters: FnvHashMap<String, GeneCluster>,
    // gene id to the name of the cluster it belongs to
    gene_clusters: FnvHashMap<GeneId, String>,
    // maps from track label to a slot in `label_slots`
    label_mphf: Mphf<String>,
    // slot to track index
    label_slots: Vec<usize>,
}

impl Dataset {
    pub fn new(
        tracks: Vec<Track>,
        clusters: FnvHashMap<String, GeneCluster>,
    ) -> Result<Self, GenoviewError> {
        if tracks.is_empty() {
            return Err(GenoviewError::EmptyDataset);
        }
        let labels: Vec<String> = tracks.iter().map(|t| t.label().to_string()).collect();
        if let Some(dup) = labels.iter().duplicates().next() {
            return Err(GenoviewError::DuplicateTrack(dup.clone()));
        }
        // the gene to cluster index below relies on ids being dataset-wide
        if let Some(dup) = tracks
            .iter()
            .flat_map(|t| t.genes().iter().map(|g| g.id))
            .duplicates()
            .next()
        {
            return Err(GenoviewError::DuplicateGeneId(dup));
        }
        let label_mphf = Mphf::new(1.7, &labels);
        let mut label_slots = vec![0; labels.len()];
        for (idx, label) in labels.iter().enumerate() {
            label_slots[label_mphf.hash(label) as usize] = idx;
        }
        let gene_clusters = clusters
            .iter()
            .flat_map(|(name, gc)| gc.members().map(move |(_, id)| (id, name.clone())))
            .collect();
        Ok(Dataset {
            tracks,
            clusters,
            gene_clusters,
            label_mphf,
            label_slots,
        })
    }

    /// Reads a JSON dataset, gunzipping it first when the path ends in `.gz`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GenoviewError> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);
        let gzipped = path.extension().map_or(false, |ext| ext == "gz");
        if gzipped {
            Self::from_reader(MultiGzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, GenoviewError> {
        let record: DatasetRecord = serde_json::from_reader(reader)?;
        Self::from_record(record)
    }

    pub fn from_json(json: &str) -> Result<Self, GenoviewError> {
        let record: DatasetRecord = serde_json::from_str(json)?;
        Self::from_record(record)
    }

    fn from_record(record: DatasetRecord) -> Result<Self, GenoviewError> {
        let tracks = record
            .tracks
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let label = t.label.unwrap_or_else(|| format!("Genome_{}", i + 1));
                Track::new(label, t.genes)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let clusters = record
            .gene_clusters
            .into_iter()
            .map(|(name, members)| (name, GeneCluster { members }))
            .collect();
        Self::new(tracks, clusters)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, label: &str) -> Option<&Track> {
        let slot = self.label_mphf.try_hash(&label.to_string())? as usize;
        let track = &self.tracks[*self.label_slots.get(slot)?];
        if track.label() == label {
            Some(track)
        } else {
            None
        }
    }

    pub fn cluster(&self, name: &str) -> Option<&GeneCluster> {
        self.clusters.get(name)
    }

    pub fn clusters(&self) -> &FnvHashMap<String, GeneCluster> {
        &self.clusters
    }

    pub fn cluster_names(&self) -> Vec<&str> {
        self.clusters.keys().map(|k| k.as_str()).sorted().collect()
    }

    /// Name of the cluster a gene belongs to, if any.
    pub fn cluster_of(&self, gene: GeneId) -> Option<&str> {
        self.gene_clusters.get(&gene).map(|s| s.as_str())
    }

    /// Same clusters, new tracks.
    pub fn with_tracks(&self, tracks: Vec<Track>) -> Result<Self, GenoviewError> {
        Self::new(tracks, self.clusters.clone())
    }
}
