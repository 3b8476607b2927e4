use super::prim_ref::Bounded;
use crate::utilities::affine_transform::AffineTransform;
use crate::utilities::bounding_box::BoundingBox;

/// Bounds of a contiguous range of primitives and of their centroids.
///
/// Centroids are kept doubled (`min + max` of each primitive) to match what the binners feed the mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSummary {
    /// Union of all primitive bounds.
    pub geometry_bounds: BoundingBox,
    /// Bounds of the doubled primitive centroids.
    pub centroid_bounds: BoundingBox,
    /// Number of primitives in the range.
    pub count: usize,
}

impl Default for RangeSummary {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl RangeSummary {
    /// Summary of an empty range.
    pub const EMPTY: RangeSummary = RangeSummary {
        geometry_bounds: BoundingBox::EMPTY,
        centroid_bounds: BoundingBox::EMPTY,
        count: 0,
    };

    pub fn new(geometry_bounds: BoundingBox, centroid_bounds: BoundingBox, count: usize) -> Self {
        Self {
            geometry_bounds,
            centroid_bounds,
            count,
        }
    }

    /// Summarizes a slice of primitives.
    pub fn from_primitives<P: Bounded>(primitives: &[P]) -> Self {
        let mut summary = Self::EMPTY;
        for primitive in primitives {
            summary.add(&primitive.bounds());
        }
        summary
    }

    /// Summarizes a slice of primitives after moving their bounds into the space of `space`.
    pub fn from_primitives_in_space<P: Bounded>(primitives: &[P], space: &AffineTransform) -> Self {
        let mut summary = Self::EMPTY;
        for primitive in primitives {
            summary.add(&space.transform_bounds(&primitive.bounds()));
        }
        summary
    }

    /// Adds a single primitive's bounds to the summary.
    #[inline]
    pub fn add(&mut self, bounds: &BoundingBox) {
        self.geometry_bounds.extend(bounds);
        self.centroid_bounds.extend_point(bounds.center2());
        self.count += 1;
    }

    /// Merges the summary of another, disjoint range into this one.
    #[inline]
    pub fn merge(&mut self, other: &RangeSummary) {
        self.geometry_bounds.extend(&other.geometry_bounds);
        self.centroid_bounds.extend(&other.centroid_bounds);
        self.count += other.count;
    }

    /// Combines two summaries without modifying either.
    #[inline]
    pub fn merged(a: &RangeSummary, b: &RangeSummary) -> RangeSummary {
        let mut result = *a;
        result.merge(b);
        result
    }

    /// Number of primitives in the range.
    #[inline]
    pub fn size(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit_box_at(center: Vec3) -> BoundingBox {
        BoundingBox::new(center - Vec3::splat(0.5), center + Vec3::splat(0.5))
    }

    #[test]
    fn summary_uses_doubled_centroids() {
        let boxes = [unit_box_at(Vec3::ZERO), unit_box_at(Vec3::new(3.0, 1.0, 0.0))];
        let summary = RangeSummary::from_primitives(&boxes);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.geometry_bounds.min, Vec3::splat(-0.5));
        assert_eq!(summary.geometry_bounds.max, Vec3::new(3.5, 1.5, 0.5));
        assert_eq!(summary.centroid_bounds.min, Vec3::ZERO);
        assert_eq!(summary.centroid_bounds.max, Vec3::new(6.0, 2.0, 0.0));
    }

    #[test]
    fn merge_matches_whole() {
        let boxes: Vec<BoundingBox> = (0..10)
            .map(|i| unit_box_at(Vec3::new(i as f32, (i * i) as f32, -(i as f32))))
            .collect();
        let whole = RangeSummary::from_primitives(&boxes);
        let left = RangeSummary::from_primitives(&boxes[..4]);
        let right = RangeSummary::from_primitives(&boxes[4..]);
        assert_eq!(RangeSummary::merged(&left, &right), whole);
        assert_eq!(RangeSummary::merged(&right, &left), whole);
        assert_eq!(RangeSummary::merged(&RangeSummary::EMPTY, &whole), whole);
    }
}
