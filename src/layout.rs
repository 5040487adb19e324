//! Turns a dataset into positioned primitives.
//!
//! Each track sits on row `index + 1`. Everything is recomputed per pass;
//! a pass never patches the primitives of an earlier one.

use log::{debug, warn};

use crate::color::{resolve_color, BLACK};
use crate::dataset::{Dataset, GeneCluster};
use crate::error::GenoviewError;
use crate::gene::{Direction, Gene, Track};
use crate::primitive::{Arrow, ArrowShape, Line, Point, Primitive, PrimitiveId, Text};
use crate::view::Viewport;

pub const ARROW_SCALE: f64 = 0.5;
pub const ARROW_LEFT_PAD: f64 = 1.5;
pub const SCALE_BAR_LENGTH: f64 = 100.0;

/// Where an aligned anchor gene is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignReference {
    /// Center of the visible window in world coordinates; follows panning.
    ViewportCenter,
    /// Fixed `canvas_width / 2`, ignoring pan.
    CanvasCenter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    // vertical distance between track rows
    pub spacing: f64,
    // ruler tick interval in nucleotides
    pub scale_interval: u64,
    pub show_scale: bool,
    pub show_labels: bool,
    pub canvas_width: f64,
    pub reference: AlignReference,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            spacing: 30.0,
            scale_interval: 100,
            show_scale: true,
            show_labels: false,
            canvas_width: 1000.0,
            reference: AlignReference::ViewportCenter,
        }
    }
}

impl LayoutConfig {
    pub fn baseline_y(&self, row: usize) -> f64 {
        self.spacing * row as f64 - 4.0
    }

    pub fn arrow_top(&self, row: usize) -> f64 {
        self.spacing * row as f64 - 11.0
    }

    /// World x that anchor genes are moved onto.
    pub fn reference_x(&self, viewport: &Viewport) -> f64 {
        match self.reference {
            AlignReference::ViewportCenter => self.canvas_width / 2.0 - viewport.pan.x,
            AlignReference::CanvasCenter => self.canvas_width / 2.0,
        }
    }
}

/// A gene cluster chosen as alignment anchor.
#[derive(Debug, Clone, Copy)]
pub struct Anchor<'a> {
    pub name: &'a str,
    pub cluster: &'a GeneCluster,
}

#[derive(Debug)]
pub struct TrackLayout {
    pub label: String,
    pub row: usize,
    pub baseline_y: f64,
    // horizontal shift applied to the baseline and every arrow
    pub offset: f64,
    pub aligned: bool,
    pub primitives: Vec<Primitive>,
    // set when the anchor could not be applied to this track
    pub diagnostic: Option<GenoviewError>,
}

/// Result of one full layout pass.
#[derive(Debug)]
pub struct Layout {
    pub genome_max: u64,
    pub tracks: Vec<TrackSummary>,
    pub diagnostics: Vec<GenoviewError>,
    primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackSummary {
    pub label: String,
    pub row: usize,
    pub baseline_y: f64,
    pub offset: f64,
    pub aligned: bool,
}

impl Layout {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0)
    }

    pub fn arrows(&self) -> impl Iterator<Item = (PrimitiveId, &Arrow)> {
        self.primitives
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_arrow().map(|a| (PrimitiveId(i), a)))
    }

    /// Topmost arrow under a world point.
    pub fn arrow_at(&self, p: Point) -> Option<(PrimitiveId, &Arrow)> {
        self.arrows().filter(|(_, a)| a.contains(p)).last()
    }

    /// Number of rows below the tracks needed to show the scale bar.
    pub fn rows(&self) -> usize {
        self.tracks.len() + 1
    }
}

/// Longest track extent. Recompute whenever the track set changes.
pub fn compute_genome_max(tracks: &[Track]) -> Result<u64, GenoviewError> {
    tracks
        .iter()
        .map(|t| t.extent())
        .max()
        .ok_or(GenoviewError::EmptyDataset)
}

/// Offset that moves the anchor gene's midpoint onto the reference x.
/// `Ok(None)` when the cluster has no member on this track.
pub fn alignment_offset(
    track: &Track,
    anchor: &Anchor,
    reference_x: f64,
) -> Result<Option<f64>, GenoviewError> {
    let gene_id = match anchor.cluster.gene_for(track.label()) {
        Some(id) => id,
        None => return Ok(None),
    };
    let gene = track
        .gene(gene_id)
        .ok_or_else(|| GenoviewError::AnchorGeneNotFound {
            track: track.label().to_string(),
            cluster: anchor.name.to_string(),
            gene_id,
        })?;
    Ok(Some(reference_x - gene.midpoint()))
}

pub fn build_arrow(gene: &Gene, track: usize, row: usize, config: &LayoutConfig) -> Arrow {
    let mut arrow = Arrow {
        gene: gene.id,
        track,
        shape: ArrowShape::new(gene.length() as f64),
        left: ARROW_LEFT_PAD + gene.start as f64,
        top: config.arrow_top(row),
        scale: ARROW_SCALE,
        rotation: 0,
        fill: resolve_color(gene),
    };
    if gene.direction == Direction::Reverse {
        arrow.rotate(180);
    }
    arrow
}

/// Lays out one track on `row` (1-based). Anchor failures only affect this
/// track: it falls back to offset 0 and records the error.
pub fn layout_track(
    track: &Track,
    index: usize,
    row: usize,
    anchor: Option<&Anchor>,
    genome_max: u64,
    config: &LayoutConfig,
    viewport: &Viewport,
) -> TrackLayout {
    let mut diagnostic = None;
    let mut offset = None;
    if let Some(anchor) = anchor {
        let reference_x = config.reference_x(viewport);
        match alignment_offset(track, anchor, reference_x) {
            Ok(Some(x)) => {
                debug!(
                    "track {} aligned on {}: offset {}, reference {}",
                    track.label(),
                    anchor.name,
                    x,
                    reference_x
                );
                offset = Some(x);
            }
            Ok(None) => debug!("track {} has no member of {}", track.label(), anchor.name),
            Err(e) => {
                warn!("{}; drawing track unaligned", e);
                diagnostic = Some(e);
            }
        }
    }
    let aligned = offset.is_some();
    let offset = offset.unwrap_or(0.0);
    let baseline_y = config.baseline_y(row);

    let mut primitives = Vec::with_capacity(track.genes().len() + 2);
    primitives.push(Primitive::Line(Line {
        from: Point::new(offset, baseline_y),
        to: Point::new(offset + genome_max as f64, baseline_y),
        stroke: BLACK,
        width: 2.0,
        selectable: false,
    }));
    if config.show_labels {
        primitives.push(Primitive::Text(Text {
            text: track.label().to_string(),
            at: Point::new(offset, config.spacing * row as f64 - 24.0),
            size: 10.0,
            stroke: BLACK,
        }));
    }
    for gene in track.genes() {
        let mut arrow = build_arrow(gene, index, row, config);
        arrow.left += offset;
        primitives.push(Primitive::Arrow(arrow));
    }

    TrackLayout {
        label: track.label().to_string(),
        row,
        baseline_y,
        offset,
        aligned,
        primitives,
        diagnostic,
    }
}

/// Tick label in kilobases, truncated to one decimal.
pub fn tick_label(tick: u64) -> String {
    format!("{}.{} kB", tick / 1000, (tick % 1000) / 100)
}

/// Ticks every `scale_interval` from 0 below `genome_max`, then a fixed
/// 100 nt scale bar further down.
pub fn build_ruler(
    genome_max: u64,
    scale_interval: u64,
    track_count: usize,
    config: &LayoutConfig,
) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    let rows = (track_count + 1) as f64;
    let tick_top = rows * config.spacing - 24.0;
    if scale_interval > 0 {
        for tick in (0..genome_max).step_by(scale_interval as usize) {
            let x = tick as f64;
            primitives.push(Primitive::Line(Line {
                from: Point::new(x, tick_top),
                to: Point::new(x, tick_top + 20.0),
                stroke: BLACK,
                width: 1.0,
                selectable: true,
            }));
            primitives.push(Primitive::Text(Text {
                text: tick_label(tick),
                at: Point::new(x + 5.0, tick_top),
                size: 15.0,
                stroke: BLACK,
            }));
        }
    }
    let bar_top = rows * 1.25 * config.spacing - 4.0;
    primitives.push(Primitive::Line(Line {
        from: Point::new(0.0, bar_top),
        to: Point::new(SCALE_BAR_LENGTH, bar_top),
        stroke: BLACK,
        width: 2.0,
        selectable: false,
    }));
    primitives.push(Primitive::Text(Text {
        text: "100 nts".to_string(),
        at: Point::new(15.0, bar_top),
        size: 20.0,
        stroke: BLACK,
    }));
    primitives
}

/// Full layout pass over every track. An anchor name missing from the
/// dataset is recorded and the pass continues unaligned.
pub fn layout(
    dataset: &Dataset,
    anchor: Option<&str>,
    config: &LayoutConfig,
    viewport: &Viewport,
) -> Result<Layout, GenoviewError> {
    let genome_max = compute_genome_max(dataset.tracks())?;
    let mut diagnostics = Vec::new();
    let anchor = match anchor {
        Some(name) => match dataset.cluster(name) {
            Some(cluster) => Some(Anchor { name, cluster }),
            None => {
                warn!("{} is not a gene cluster in the dataset", name);
                diagnostics.push(GenoviewError::UnknownCluster(name.to_string()));
                None
            }
        },
        None => None,
    };

    let mut primitives = Vec::new();
    let mut tracks = Vec::with_capacity(dataset.tracks().len());
    for (i, track) in dataset.tracks().iter().enumerate() {
        let placed = layout_track(
            track,
            i,
            i + 1,
            anchor.as_ref(),
            genome_max,
            config,
            viewport,
        );
        tracks.push(TrackSummary {
            label: placed.label,
            row: placed.row,
            baseline_y: placed.baseline_y,
            offset: placed.offset,
            aligned: placed.aligned,
        });
        primitives.extend(placed.primitives);
        diagnostics.extend(placed.diagnostic);
    }
    if config.show_scale {
        primitives.extend(build_ruler(
            genome_max,
            config.scale_interval,
            tracks.len(),
            config,
        ));
    }
    debug!(
        "laid out {} tracks, {} primitives, genome max {}",
        tracks.len(),
        primitives.len(),
        genome_max
    );

    Ok(Layout {
        genome_max,
        tracks,
        diagnostics,
        primitives,
    })
}
