//! Interactive state around a layout: viewport, alignment anchor and
//! selection. Any change to what is laid out rebuilds the whole layout.

use fnv::FnvHashSet;
use log::{info, warn};

use crate::dataset::Dataset;
use crate::error::GenoviewError;
use crate::gene::{GeneId, Track};
use crate::layout::{layout, Layout, LayoutConfig};
use crate::primitive::{Point, PrimitiveId};

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 20.0;
// zoom factor per unit of wheel delta
const WHEEL_BASE: f64 = 0.999;

/// Maps world coordinates to the screen: `screen = world * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            zoom: 1.0,
            pan: Point::default(),
        }
    }
}

impl Viewport {
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    pub fn to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Sets the zoom while keeping the world point under `screen` in place.
    pub fn zoom_to_point(&mut self, screen: Point, zoom: f64) {
        let zoom = zoom.max(MIN_ZOOM).min(MAX_ZOOM);
        let world = self.to_world(screen);
        self.zoom = zoom;
        self.pan = Point::new(screen.x - world.x * zoom, screen.y - world.y * zoom);
    }

    /// Mouse wheel: positive `delta_y` zooms out.
    pub fn zoom_wheel(&mut self, delta_y: f64, screen: Point) {
        let zoom = self.zoom * WHEEL_BASE.powf(delta_y);
        self.zoom_to_point(screen, zoom);
    }
}

/// What to do with the current anchor when asked to align on a cluster
/// that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorRecovery {
    KeepPrevious,
    Clear,
}

/// Selected arrows, keyed by primitive id.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: FnvHashSet<PrimitiveId>,
}

impl Selection {
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: PrimitiveId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedGene {
    pub primitive: PrimitiveId,
    pub gene: GeneId,
    pub cluster: Option<String>,
    pub selected: bool,
}

pub struct GenomeView {
    dataset: Dataset,
    config: LayoutConfig,
    viewport: Viewport,
    anchor: Option<String>,
    recovery: AnchorRecovery,
    selection: Selection,
    layout: Layout,
}

impl GenomeView {
    pub fn new(
        dataset: Dataset,
        config: LayoutConfig,
        recovery: AnchorRecovery,
    ) -> Result<Self, GenoviewError> {
        let viewport = Viewport::default();
        let layout = layout(&dataset, None, &config, &viewport)?;
        Ok(GenomeView {
            dataset,
            config,
            viewport,
            anchor: None,
            recovery,
            selection: Selection::default(),
            layout,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Clears and rebuilds every primitive from the current state.
    pub fn relayout(&mut self) -> Result<(), GenoviewError> {
        self.layout = layout(
            &self.dataset,
            self.anchor.as_deref(),
            &self.config,
            &self.viewport,
        )?;
        Ok(())
    }

    /// Aligns all tracks on `cluster`, or removes alignment with `None`.
    /// An unknown cluster is logged and handed back. Under `KeepPrevious`
    /// the current layout is left untouched; under `Clear` the view is laid
    /// out again without an anchor.
    pub fn set_alignment_anchor(&mut self, cluster: Option<&str>) -> Result<(), GenoviewError> {
        match cluster {
            None => self.anchor = None,
            Some(name) if self.dataset.cluster(name).is_some() => {
                self.anchor = Some(name.to_string())
            }
            Some(name) => {
                warn!("{} is not a gene cluster in the dataset", name);
                if self.recovery == AnchorRecovery::Clear {
                    self.anchor = None;
                    self.relayout()?;
                }
                return Err(GenoviewError::UnknownCluster(name.to_string()));
            }
        }
        self.relayout()
    }

    /// Swaps the track set; genome max and every primitive are recomputed.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) -> Result<(), GenoviewError> {
        self.dataset = self.dataset.with_tracks(tracks)?;
        self.selection.clear();
        self.relayout()
    }

    pub fn replace_config(&mut self, config: LayoutConfig) -> Result<(), GenoviewError> {
        self.config = config;
        self.relayout()
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    pub fn zoom_wheel(&mut self, delta_y: f64, screen: Point) {
        self.viewport.zoom_wheel(delta_y, screen);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Toggles selection of an arrow and reports its gene and cluster.
    /// Non-arrow ids are ignored.
    pub fn toggle_selection(&mut self, id: PrimitiveId) -> Option<SelectedGene> {
        let gene = self.layout.get(id)?.as_arrow()?.gene;
        let selected = self.selection.toggle(id);
        let cluster = self.dataset.cluster_of(gene).map(|s| s.to_string());
        info!(
            "gene {} cluster: {}",
            gene,
            cluster.as_deref().unwrap_or("none")
        );
        Some(SelectedGene {
            primitive: id,
            gene,
            cluster,
            selected,
        })
    }

    /// Click at a screen position.
    pub fn click(&mut self, screen: Point) -> Option<SelectedGene> {
        let world = self.viewport.to_world(screen);
        let (id, _) = self.layout.arrow_at(world)?;
        self.toggle_selection(id)
    }
}
