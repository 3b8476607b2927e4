use super::prim_ref::Bounded;
use super::range_summary::RangeSummary;
use crate::utilities::math_helper::clamp;
use glam::{IVec3, Vec3};
use std::fmt;

/// Centroid extents at or below this are treated as zero; the axis then gets no bins.
pub const DEGENERATE_EXTENT_THRESHOLD: f32 = 1e-34;

/// Keeps the largest centroid strictly inside the last bin under rounding.
const BIN_SCALE_SHRINK: f32 = 0.99;

/// Coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// All axes in tie-break order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Axis> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Linear mapping from (doubled) centroid space into per-axis bin indices.
///
/// `bin = floor((centroid - offset) * scale)`, independently on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisMapping {
    bin_count: usize,
    offset: Vec3,
    scale: Vec3,
}

impl AxisMapping {
    /// Creates a mapping whose bin count adapts to the range size: small ranges get fewer bins.
    pub fn new(summary: &RangeSummary, max_bins: usize) -> Self {
        let max_bins = max_bins.max(1);
        let adaptive = (4.0 + 0.05 * summary.size() as f32) as usize;
        Self::with_bin_count(summary, clamp(adaptive, 1, max_bins))
    }

    /// Creates a mapping that always uses exactly `bin_count` bins.
    pub fn new_fixed(summary: &RangeSummary, bin_count: usize) -> Self {
        Self::with_bin_count(summary, bin_count.max(1))
    }

    fn with_bin_count(summary: &RangeSummary, bin_count: usize) -> Self {
        let centroid_bounds = &summary.centroid_bounds;
        if centroid_bounds.is_empty() {
            return Self {
                bin_count,
                offset: Vec3::ZERO,
                scale: Vec3::ZERO,
            };
        }
        let diagonal = centroid_bounds.size();
        let scale = Vec3::select(
            diagonal.cmpgt(Vec3::splat(DEGENERATE_EXTENT_THRESHOLD)),
            Vec3::splat(BIN_SCALE_SHRINK * bin_count as f32) / diagonal,
            Vec3::ZERO,
        );
        Self {
            bin_count,
            offset: centroid_bounds.min,
            scale,
        }
    }

    /// Number of bins on every axis.
    #[inline(always)]
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    #[inline(always)]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    #[inline(always)]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Returns true if the axis had no usable centroid extent; every centroid lands in bin 0 there.
    #[inline(always)]
    pub fn is_invalid(&self, axis: Axis) -> bool {
        self.scale[axis.index()] == 0.0
    }

    /// Maps a doubled centroid to its bin on each axis, clamped into `[0, bin_count)`.
    #[inline(always)]
    pub fn bin(&self, center2: Vec3) -> IVec3 {
        let raw = ((center2 - self.offset) * self.scale).floor().as_ivec3();
        raw.clamp(IVec3::ZERO, IVec3::splat(self.bin_count as i32 - 1))
    }

    /// Maps a doubled centroid to its bin on each axis without clamping.
    ///
    /// # Safety
    /// The centroid must lie within the centroid bounds the mapping was built from. Callers index bin
    /// storage with the result unchecked, so anything else reads or writes out of bounds.
    #[inline(always)]
    pub unsafe fn bin_unchecked(&self, center2: Vec3) -> IVec3 {
        ((center2 - self.offset) * self.scale).floor().as_ivec3()
    }

    /// Bins a primitive by the center of its bounds.
    #[inline(always)]
    pub fn bin_primitive<P: Bounded>(&self, primitive: &P) -> IVec3 {
        self.bin(primitive.bounds().center2())
    }
}

impl fmt::Display for AxisMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AxisMapping {{ bin_count = {}, offset = {}, scale = {} }}",
            self.bin_count, self.offset, self.scale
        )
    }
}
