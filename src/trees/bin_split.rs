use super::bin_mapping::{Axis, AxisMapping};
use super::prim_ref::Bounded;
use crate::utilities::bounding_box::BoundingBox;
use std::fmt;

/// Everything the builder needs to perform a binned split: where to cut and the mapping that defines the cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitDescriptor {
    /// SAH cost of the split; infinite when there is no split.
    pub cost: f32,
    /// Split axis, or `None` if no split improved on not splitting at all.
    pub axis: Option<Axis>,
    /// First bin of the right-hand side.
    pub position: usize,
    /// Mapping the bins were built with.
    pub mapping: AxisMapping,
}

impl SplitDescriptor {
    /// Constructs the "no split" result.
    #[inline]
    pub fn invalid(mapping: AxisMapping) -> Self {
        Self {
            cost: f32::INFINITY,
            axis: None,
            position: 0,
            mapping,
        }
    }

    #[inline]
    pub fn new(cost: f32, axis: Axis, position: usize, mapping: AxisMapping) -> Self {
        debug_assert!(position > 0 && position < mapping.bin_count());
        Self {
            cost,
            axis: Some(axis),
            position,
            mapping,
        }
    }

    /// Tests if this split is valid.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.axis.is_some()
    }

    /// SAH cost of performing the split.
    #[inline(always)]
    pub fn split_sah(&self) -> f32 {
        self.cost
    }

    /// Partition test matching the binning that produced the split: true if the primitive belongs on the left.
    ///
    /// Everything goes right for an invalid split.
    #[inline(always)]
    pub fn goes_left<P: Bounded>(&self, primitive: &P) -> bool {
        match self.axis {
            Some(axis) => {
                (self.mapping.bin_primitive(primitive)[axis.index()] as usize) < self.position
            }
            None => false,
        }
    }
}

impl fmt::Display for SplitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            Some(axis) => write!(
                f,
                "SplitDescriptor {{ cost = {}, axis = {}, position = {} }}",
                self.cost, axis, self.position
            ),
            None => write!(f, "SplitDescriptor {{ none }}"),
        }
    }
}

/// Exact primitive counts and bounds on both sides of a split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitDetail {
    pub left_count: usize,
    pub right_count: usize,
    pub left_bounds: BoundingBox,
    pub right_bounds: BoundingBox,
}

impl SplitDetail {
    pub const EMPTY: SplitDetail = SplitDetail {
        left_count: 0,
        right_count: 0,
        left_bounds: BoundingBox::EMPTY,
        right_bounds: BoundingBox::EMPTY,
    };

    #[inline]
    pub fn new(
        left_count: usize,
        left_bounds: BoundingBox,
        right_count: usize,
        right_bounds: BoundingBox,
    ) -> Self {
        Self {
            left_count,
            right_count,
            left_bounds,
            right_bounds,
        }
    }

    /// Total number of primitives on both sides.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.left_count + self.right_count
    }
}
