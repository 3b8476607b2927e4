use super::bin_info::{BinAccumulator, SplitEvaluator};
use super::bin_mapping::{Axis, AxisMapping};
use super::bin_split::SplitDescriptor;
use crate::utilities::bounding_box::BoundingBox;
use crate::utilities::math_helper::block_count;
use crate::utilities::vector_wide::{Mask16, Vector16, VectorI16};
use glam::{IVec3, Vec3};

/// Number of bins held by [`WideBinInfo`], one per lane.
pub const WIDE_BIN_COUNT: usize = 16;

/// Bin bounds stored one bin per lane, one vector per box coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LaneBounds {
    min_x: Vector16,
    min_y: Vector16,
    min_z: Vector16,
    max_x: Vector16,
    max_y: Vector16,
    max_z: Vector16,
}

impl LaneBounds {
    const EMPTY: LaneBounds = LaneBounds {
        min_x: Vector16 { lanes: [f32::INFINITY; 16] },
        min_y: Vector16 { lanes: [f32::INFINITY; 16] },
        min_z: Vector16 { lanes: [f32::INFINITY; 16] },
        max_x: Vector16 { lanes: [f32::NEG_INFINITY; 16] },
        max_y: Vector16 { lanes: [f32::NEG_INFINITY; 16] },
        max_z: Vector16 { lanes: [f32::NEG_INFINITY; 16] },
    };

    #[inline(always)]
    fn extend_lane(&mut self, mask: &Mask16, bounds: &BoundingBox) {
        self.min_x = self.min_x.mask_min(mask, bounds.min.x);
        self.min_y = self.min_y.mask_min(mask, bounds.min.y);
        self.min_z = self.min_z.mask_min(mask, bounds.min.z);
        self.max_x = self.max_x.mask_max(mask, bounds.max.x);
        self.max_y = self.max_y.mask_max(mask, bounds.max.y);
        self.max_z = self.max_z.mask_max(mask, bounds.max.z);
    }

    #[inline(always)]
    fn merge(&mut self, other: &LaneBounds) {
        self.min_x = self.min_x.min(&other.min_x);
        self.min_y = self.min_y.min(&other.min_y);
        self.min_z = self.min_z.min(&other.min_z);
        self.max_x = self.max_x.max(&other.max_x);
        self.max_y = self.max_y.max(&other.max_y);
        self.max_z = self.max_z.max(&other.max_z);
    }

    #[inline(always)]
    fn lane(&self, bin: usize) -> BoundingBox {
        BoundingBox::new(
            Vec3::new(self.min_x[bin], self.min_y[bin], self.min_z[bin]),
            Vec3::new(self.max_x[bin], self.max_y[bin], self.max_z[bin]),
        )
    }

    /// Half areas of the boxes merged from bin 0 up to each lane.
    #[inline(always)]
    fn prefix_area_lr(&self) -> Vector16 {
        half_areas(
            self.min_x.prefix_min(),
            self.min_y.prefix_min(),
            self.min_z.prefix_min(),
            self.max_x.prefix_max(),
            self.max_y.prefix_max(),
            self.max_z.prefix_max(),
        )
    }

    /// Half areas of the boxes merged from the last bin down to each lane.
    #[inline(always)]
    fn prefix_area_rl(&self) -> Vector16 {
        half_areas(
            self.min_x.reverse_prefix_min(),
            self.min_y.reverse_prefix_min(),
            self.min_z.reverse_prefix_min(),
            self.max_x.reverse_prefix_max(),
            self.max_y.reverse_prefix_max(),
            self.max_z.reverse_prefix_max(),
        )
    }
}

#[inline(always)]
fn half_areas(
    min_x: Vector16,
    min_y: Vector16,
    min_z: Vector16,
    max_x: Vector16,
    max_y: Vector16,
    max_z: Vector16,
) -> Vector16 {
    let dx = max_x - min_x;
    let dy = max_y - min_y;
    let dz = max_z - min_z;
    dx * dy + dy * dz + dz * dx
}

/// 16 bin binner that keeps each axis' bins in lane vectors and evaluates all positions of an axis at once.
///
/// Makes the same decisions as [`BinInfo`](super::bin_info::BinInfo) for the same mapping.
#[repr(C, align(64))]
#[derive(Clone, Debug, PartialEq)]
pub struct WideBinInfo {
    bounds: [LaneBounds; 3],
    counts: [VectorI16; 3],
}

impl Default for WideBinInfo {
    fn default() -> Self {
        Self::empty()
    }
}

impl BinAccumulator for WideBinInfo {
    const CAPACITY: usize = WIDE_BIN_COUNT;

    #[inline]
    fn empty() -> Self {
        Self {
            bounds: [LaneBounds::EMPTY; 3],
            counts: [VectorI16::splat(0); 3],
        }
    }

    fn clear(&mut self) {
        *self = Self::empty();
    }

    #[inline(always)]
    fn insert(&mut self, bounds: &BoundingBox, bin: IVec3) {
        let step = VectorI16::iota();
        let bin = bin.min(IVec3::splat(WIDE_BIN_COUNT as i32 - 1));
        for axis in 0..3 {
            let update = step.simd_eq(&VectorI16::splat(bin[axis]));
            self.bounds[axis].extend_lane(&update, bounds);
            self.counts[axis] = self.counts[axis].mask_add(&update, 1);
        }
    }

    fn combine(&mut self, other: &Self) {
        for axis in 0..3 {
            self.bounds[axis].merge(&other.bounds[axis]);
            self.counts[axis] = self.counts[axis] + other.counts[axis];
        }
    }

    #[inline(always)]
    fn count(&self, bin: usize, axis: Axis) -> u32 {
        self.counts[axis.index()][bin] as u32
    }

    #[inline(always)]
    fn bounds(&self, bin: usize, axis: Axis) -> BoundingBox {
        self.bounds[axis.index()].lane(bin)
    }
}

impl SplitEvaluator for WideBinInfo {
    fn best(&self, mapping: &AxisMapping, block_shift: u32) -> SplitDescriptor {
        // Lane i evaluates position i + 1; the last lane has nothing to its right.
        let positions = Mask16::from_bits(0x7fff);
        let zero = VectorI16::splat(0);
        let mut split = SplitDescriptor::invalid(*mapping);
        for axis in Axis::ALL {
            // Zero sized dimensions never split.
            if mapping.is_invalid(axis) {
                continue;
            }
            let index = axis.index();
            let bounds = &self.bounds[index];
            let left_area = bounds.prefix_area_lr();
            let right_area = bounds.prefix_area_rl().shift_down_one(0.0);
            let left_count = self.counts[index].prefix_sum();
            let right_count = self.counts[index].reverse_prefix_sum().shift_down_one(0);
            let left_blocks = blocks(&left_count, block_shift);
            let right_blocks = blocks(&right_count, block_shift);
            let valid = positions
                .and(&left_count.simd_gt(&zero))
                .and(&right_count.simd_gt(&zero));
            let cost = Vector16::select(
                &valid,
                &(left_area * left_blocks + right_area * right_blocks),
                &Vector16::splat(f32::INFINITY),
            );
            if cost.simd_lt(&Vector16::splat(split.cost)).any() {
                let lane = cost.select_min();
                split = SplitDescriptor::new(cost[lane], axis, lane + 1, *mapping);
            }
        }
        split
    }
}

#[inline(always)]
fn blocks(counts: &VectorI16, block_shift: u32) -> Vector16 {
    Vector16::from_fn(|i| block_count(counts[i] as u32, block_shift) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::bin_info::BinInfo;
    use crate::trees::range_summary::RangeSummary;
    use approx::assert_relative_eq;

    fn unit_box_at(center: Vec3) -> BoundingBox {
        BoundingBox::new(center - Vec3::splat(0.5), center + Vec3::splat(0.5))
    }

    fn scattered(count: usize) -> Vec<BoundingBox> {
        (0..count)
            .map(|i| {
                let x = (i * 37 % 101) as f32 * 0.25;
                let y = (i * 11 % 23) as f32 * 0.5;
                let z = (i * 5 % 7) as f32;
                BoundingBox::new(
                    Vec3::new(x, y, z),
                    Vec3::new(x + 0.1 + (i % 3) as f32, y + 0.5, z + 0.2 * (i % 4) as f32),
                )
            })
            .collect()
    }

    #[test]
    fn matches_scalar_bins() {
        let boxes = scattered(200);
        let mapping = AxisMapping::new_fixed(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        let mut scalar = BinInfo::<16>::empty();
        scalar.append(&boxes, &mapping);
        for bin in 0..WIDE_BIN_COUNT {
            for axis in Axis::ALL {
                assert_eq!(wide.count(bin, axis), scalar.count(bin, axis));
                assert_eq!(wide.bounds(bin, axis), scalar.bounds(bin, axis));
            }
        }
        for axis in Axis::ALL {
            assert_eq!(wide.total_count(axis), boxes.len());
        }
    }

    #[test]
    fn matches_scalar_split() {
        let boxes = scattered(300);
        let mapping = AxisMapping::new_fixed(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        let mut scalar = BinInfo::<16>::empty();
        scalar.append(&boxes, &mapping);
        for block_shift in 0..3 {
            let a = wide.best(&mapping, block_shift);
            let b = scalar.best(&mapping, block_shift);
            assert_eq!(a.axis, b.axis);
            assert_eq!(a.position, b.position);
            assert_eq!(a.cost, b.cost);
            assert_eq!(
                wide.split_detail(&mapping, &a),
                scalar.split_detail(&mapping, &b)
            );
        }
    }

    #[test]
    fn large_block_shifts_match_scalar() {
        let boxes = scattered(300);
        let mapping = AxisMapping::new_fixed(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        let mut scalar = BinInfo::<16>::empty();
        scalar.append(&boxes, &mapping);
        for block_shift in [30, 31, 32, 63, 64, u32::MAX] {
            let a = wide.best(&mapping, block_shift);
            let b = scalar.best(&mapping, block_shift);
            assert!(a.is_valid());
            assert_eq!(a, b);
            // Both sides round to a single block.
            let detail = scalar.split_detail(&mapping, &b);
            assert_eq!(
                b.cost,
                detail.left_bounds.half_area() + detail.right_bounds.half_area()
            );
        }
    }

    #[test]
    fn oversized_mapping_keeps_every_primitive() {
        let boxes = scattered(2000);
        let mapping = AxisMapping::new(&RangeSummary::from_primitives(&boxes), 32);
        assert_eq!(mapping.bin_count(), 32);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        let mut scalar = BinInfo::<16>::empty();
        scalar.append(&boxes, &mapping);
        for axis in Axis::ALL {
            assert_eq!(wide.total_count(axis), boxes.len());
            assert_eq!(scalar.total_count(axis), boxes.len());
            for bin in 0..WIDE_BIN_COUNT {
                assert_eq!(wide.count(bin, axis), scalar.count(bin, axis));
                assert_eq!(wide.bounds(bin, axis), scalar.bounds(bin, axis));
            }
        }
        assert_eq!(wide.best(&mapping, 0), scalar.best(&mapping, 0));
    }

    #[test]
    fn equal_axes_prefer_x_and_the_first_lane() {
        let boxes: Vec<BoundingBox> = (0..6)
            .map(|i| unit_box_at(Vec3::new(i as f32, i as f32, 0.0)))
            .collect();
        let mapping = AxisMapping::new_fixed(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        let split = wide.best(&mapping, 0);
        assert_eq!(split.axis, Some(Axis::X));
        // The three-three partition is produced by positions 7, 8 and 9 alike.
        assert_eq!(split.position, 7);
        assert_relative_eq!(split.cost, 90.0);
        let mut scalar = BinInfo::<16>::empty();
        scalar.append(&boxes, &mapping);
        assert_eq!(split, scalar.best(&mapping, 0));
    }

    #[test]
    fn row_of_sixteen() {
        let boxes: Vec<BoundingBox> = (0..16)
            .map(|i| unit_box_at(Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        let mapping = AxisMapping::new_fixed(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        let split = wide.best(&mapping, 0);
        assert_eq!(split.axis, Some(Axis::X));
        assert_eq!(split.position, 8);
        assert_relative_eq!(split.cost, 2.0 * 17.0 * 8.0);
    }

    #[test]
    fn smaller_mapping_leaves_upper_lanes_unused() {
        let boxes = scattered(40);
        let mapping = AxisMapping::new(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        assert!(mapping.bin_count() < WIDE_BIN_COUNT);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        let mut scalar = BinInfo::<16>::empty();
        scalar.append(&boxes, &mapping);
        let a = wide.best(&mapping, 0);
        let b = scalar.best(&mapping, 0);
        assert_eq!((a.axis, a.position), (b.axis, b.position));
        assert!(a.position < mapping.bin_count());
    }

    #[test]
    fn degenerate_and_empty_do_not_split() {
        let mapping = AxisMapping::new_fixed(&RangeSummary::EMPTY, WIDE_BIN_COUNT);
        assert!(!WideBinInfo::empty().best(&mapping, 0).is_valid());

        let boxes = vec![unit_box_at(Vec3::ONE); 5];
        let mapping = AxisMapping::new_fixed(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        let mut wide = WideBinInfo::empty();
        wide.append(&boxes, &mapping);
        assert!(!wide.best(&mapping, 0).is_valid());
        assert_eq!(wide.count(0, Axis::Y), 5);
    }

    #[test]
    fn reduce_and_clear() {
        let boxes = scattered(64);
        let mapping = AxisMapping::new_fixed(&RangeSummary::from_primitives(&boxes), WIDE_BIN_COUNT);
        let mut a = WideBinInfo::empty();
        a.append(&boxes[..20], &mapping);
        let mut b = WideBinInfo::empty();
        b.append(&boxes[20..], &mapping);
        let mut whole = WideBinInfo::empty();
        whole.append(&boxes, &mapping);
        assert_eq!(WideBinInfo::reduce(&a, &b), whole);
        assert_eq!(WideBinInfo::reduce(&b, &a), whole);
        whole.clear();
        assert_eq!(whole, WideBinInfo::empty());
    }
}
