//! Layout model of the virtual controller surface.
//!
//! ```text
//! LayoutConfig ──► LayoutTree ──► render plan ──► ArrangedSurface
//! (TOML, percent)  (ratios)       (ordered)       (rectangles, hit targets)
//! ```
//!
//! - [`config`] - serializable configuration and its validation
//! - [`tree`] - the recursive tree and its single mutation surface
//! - [`geometry`] - rectangle arrangement used by the reference renderer

pub mod config;
pub mod error;
pub mod geometry;
pub mod tree;

pub use config::{AreaConfig, LayoutConfig};
pub use error::LayoutError;
pub use geometry::{arrange, ArrangedSurface, ColumnShares, Extent, Rect};
pub use tree::{Divider, DividerId, LayoutNode, LayoutTree, Leaf, LeafKind, Orientation, Side};
