//! Layout of comparative genome views: genome tracks as horizontal lines
//! carrying gene arrows, optionally aligned on a shared gene cluster, with
//! a distance ruler underneath.

pub mod color;
pub mod dataset;
pub mod error;
pub mod gene;
pub mod layout;
pub mod primitive;
pub mod raster;
pub mod view;

pub use dataset::{Dataset, GeneCluster};
pub use error::GenoviewError;
pub use gene::{Annotation, Direction, Gene, GeneId, Track};
pub use layout::{layout, AlignReference, Layout, LayoutConfig};
pub use primitive::{Arrow, Point, Primitive, PrimitiveId};
pub use raster::Canvas;
pub use view::{AnchorRecovery, GenomeView, Viewport};
