use super::bin_mapping::{Axis, AxisMapping};
use super::bin_split::{SplitDescriptor, SplitDetail};
use super::prim_ref::Bounded;
use crate::utilities::affine_transform::AffineTransform;
use crate::utilities::bounding_box::BoundingBox;
use crate::utilities::math_helper::block_count;
use glam::IVec3;

/// Per-bin, per-axis bounds and primitive counts gathered from a primitive range.
///
/// Every primitive lands in exactly one bin on each axis. Instances filled from disjoint sub-ranges on
/// different workers can be merged with [`BinAccumulator::combine`] in any order.
pub trait BinAccumulator: Clone + Send + Sync {
    /// Maximum number of bins per axis the accumulator can hold.
    const CAPACITY: usize;

    /// Creates a cleared accumulator.
    fn empty() -> Self;

    /// Resets every bin to empty bounds and a zero count.
    fn clear(&mut self);

    /// Adds one primitive's bounds to the bins given per axis in `bin`.
    ///
    /// Bin indices past [`BinAccumulator::CAPACITY`] fold into the last bin.
    fn insert(&mut self, bounds: &BoundingBox, bin: IVec3);

    /// Merges another accumulator's bins into this one.
    fn combine(&mut self, other: &Self);

    /// Number of primitives in `bin` along `axis`.
    fn count(&self, bin: usize, axis: Axis) -> u32;

    /// Bounds of the primitives in `bin` along `axis`.
    fn bounds(&self, bin: usize, axis: Axis) -> BoundingBox;

    /// Bins every primitive of the slice.
    ///
    /// A mapping with more bins than the accumulator holds gets its upper bins merged into the last one.
    #[inline]
    fn append<P: Bounded>(&mut self, primitives: &[P], mapping: &AxisMapping) {
        for primitive in primitives {
            let bounds = primitive.bounds();
            self.insert(&bounds, mapping.bin(bounds.center2()));
        }
    }

    /// Bins every primitive of the slice using its bounds re-expressed in `space`.
    ///
    /// The mapping must come from a summary built in the same space.
    #[inline]
    fn append_in_space<P: Bounded>(
        &mut self,
        primitives: &[P],
        mapping: &AxisMapping,
        space: &AffineTransform,
    ) {
        for primitive in primitives {
            let bounds = space.transform_bounds(&primitive.bounds());
            self.insert(&bounds, mapping.bin(bounds.center2()));
        }
    }

    /// Merges two accumulators into a new one.
    #[inline]
    fn reduce(a: &Self, b: &Self) -> Self {
        let mut result = a.clone();
        result.combine(b);
        result
    }

    /// Total number of primitives binned along `axis`.
    #[inline]
    fn total_count(&self, axis: Axis) -> usize {
        (0..Self::CAPACITY)
            .map(|bin| self.count(bin, axis) as usize)
            .sum()
    }
}

/// Searches accumulated bins for the split with the lowest surface area heuristic cost.
pub trait SplitEvaluator: BinAccumulator {
    /// Finds the cheapest split over all valid axes and bin positions.
    ///
    /// Counts on each side are rounded up to blocks of `1 << block_shift` primitives. Any shift is
    /// accepted; from 32 upward every non-empty side costs a single block. Earlier axes win ties, as
    /// does the first position within an axis.
    fn best(&self, mapping: &AxisMapping, block_shift: u32) -> SplitDescriptor;

    /// Recomputes the counts and bounds on each side of `split`.
    fn split_detail(&self, mapping: &AxisMapping, split: &SplitDescriptor) -> SplitDetail {
        let Some(axis) = split.axis else {
            return SplitDetail::EMPTY;
        };
        let bin_count = mapping.bin_count().min(Self::CAPACITY);
        let mut left_count = 0;
        let mut left_bounds = BoundingBox::EMPTY;
        for bin in 0..split.position {
            left_count += self.count(bin, axis) as usize;
            left_bounds.extend(&self.bounds(bin, axis));
        }
        let mut right_count = 0;
        let mut right_bounds = BoundingBox::EMPTY;
        for bin in split.position..bin_count {
            right_count += self.count(bin, axis) as usize;
            right_bounds.extend(&self.bounds(bin, axis));
        }
        SplitDetail::new(left_count, left_bounds, right_count, right_bounds)
    }
}

/// Scalar binner holding up to `BINS` bins per axis.
#[repr(C, align(64))]
#[derive(Clone, Debug, PartialEq)]
pub struct BinInfo<const BINS: usize> {
    /// Geometry bounds for each bin in each dimension.
    bounds: [[BoundingBox; 3]; BINS],
    /// Number of primitives that map into each bin in each dimension.
    counts: [[u32; 3]; BINS],
}

impl<const BINS: usize> Default for BinInfo<BINS> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const BINS: usize> BinInfo<BINS> {
    /// Bins every primitive of the slice without clamping bin indices.
    ///
    /// # Safety
    /// Every primitive's centroid must lie within the centroid bounds `mapping` was built from, and the
    /// mapping's bin count must not exceed `BINS`.
    pub unsafe fn append_unchecked<P: Bounded>(&mut self, primitives: &[P], mapping: &AxisMapping) {
        debug_assert!(mapping.bin_count() <= BINS);
        for primitive in primitives {
            let bounds = primitive.bounds();
            let bin = mapping.bin_unchecked(bounds.center2());
            for axis in 0..3 {
                let index = bin[axis] as usize;
                self.bounds.get_unchecked_mut(index)[axis].extend(&bounds);
                self.counts.get_unchecked_mut(index)[axis] += 1;
            }
        }
    }

    /// Merges only the first `bin_count` bins of another accumulator.
    pub fn combine_bins(&mut self, other: &Self, bin_count: usize) {
        for bin in 0..bin_count.min(BINS) {
            for axis in 0..3 {
                self.counts[bin][axis] += other.counts[bin][axis];
                self.bounds[bin][axis].extend(&other.bounds[bin][axis]);
            }
        }
    }
}

impl<const BINS: usize> BinAccumulator for BinInfo<BINS> {
    const CAPACITY: usize = BINS;

    #[inline]
    fn empty() -> Self {
        Self {
            bounds: [[BoundingBox::EMPTY; 3]; BINS],
            counts: [[0; 3]; BINS],
        }
    }

    fn clear(&mut self) {
        for bin in 0..BINS {
            self.bounds[bin] = [BoundingBox::EMPTY; 3];
            self.counts[bin] = [0; 3];
        }
    }

    #[inline(always)]
    fn insert(&mut self, bounds: &BoundingBox, bin: IVec3) {
        for axis in 0..3 {
            let index = (bin[axis] as usize).min(BINS - 1);
            self.bounds[index][axis].extend(bounds);
            self.counts[index][axis] += 1;
        }
    }

    #[inline]
    fn combine(&mut self, other: &Self) {
        self.combine_bins(other, BINS);
    }

    #[inline(always)]
    fn count(&self, bin: usize, axis: Axis) -> u32 {
        self.counts[bin][axis.index()]
    }

    #[inline(always)]
    fn bounds(&self, bin: usize, axis: Axis) -> BoundingBox {
        self.bounds[bin][axis.index()]
    }
}

impl<const BINS: usize> SplitEvaluator for BinInfo<BINS> {
    fn best(&self, mapping: &AxisMapping, block_shift: u32) -> SplitDescriptor {
        let bin_count = mapping.bin_count().min(BINS);

        // Sweep from right to left, recording what lies at or above each position.
        let mut right_areas = [[0.0f32; 3]; BINS];
        let mut right_counts = [[0u32; 3]; BINS];
        let mut count = [0u32; 3];
        let mut merged = [BoundingBox::EMPTY; 3];
        for bin in (1..bin_count).rev() {
            for axis in 0..3 {
                count[axis] += self.counts[bin][axis];
                merged[axis].extend(&self.bounds[bin][axis]);
                right_counts[bin][axis] = count[axis];
                right_areas[bin][axis] = merged[axis].half_area();
            }
        }

        // Sweep from left to right and evaluate the SAH at every position.
        let mut best_cost = [f32::INFINITY; 3];
        let mut best_position = [0usize; 3];
        count = [0; 3];
        merged = [BoundingBox::EMPTY; 3];
        for position in 1..bin_count {
            for axis in 0..3 {
                count[axis] += self.counts[position - 1][axis];
                merged[axis].extend(&self.bounds[position - 1][axis]);
                let left_count = count[axis];
                let right_count = right_counts[position][axis];
                if left_count == 0 || right_count == 0 {
                    continue;
                }
                let cost = merged[axis].half_area() * block_count(left_count, block_shift) as f32
                    + right_areas[position][axis] * block_count(right_count, block_shift) as f32;
                if cost < best_cost[axis] {
                    best_cost[axis] = cost;
                    best_position[axis] = position;
                }
            }
        }

        let mut split = SplitDescriptor::invalid(*mapping);
        for axis in Axis::ALL {
            // Zero sized dimensions never split.
            if mapping.is_invalid(axis) {
                continue;
            }
            let index = axis.index();
            if best_position[index] != 0 && best_cost[index] < split.cost {
                split = SplitDescriptor::new(best_cost[index], axis, best_position[index], *mapping);
            }
        }
        split
    }
}
