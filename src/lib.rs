//! Binned surface area heuristic split search for bounding volume hierarchy builders.
//!
//! A builder summarizes a primitive range ([`RangeSummary`]), derives an [`AxisMapping`] from it, fills a
//! [`BinAccumulator`] (possibly one per worker, merged afterwards) and asks it for the cheapest
//! [`SplitDescriptor`]. [`find_best_split`] runs the whole sequence.

pub mod trees;
pub mod utilities;

pub use trees::*;
pub use utilities::{AffineTransform, BoundingBox};
