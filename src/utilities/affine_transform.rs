use crate::utilities::bounding_box::BoundingBox;
use glam::{Mat3, Quat, Vec3};

/// A transformation composed of a linear transformation and a translation.
///
/// Used to bin primitives in a space other than world space, e.g. the principal axes of a
/// hair strand bundle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AffineTransform {
    /// Translation in the affine transform.
    pub translation: Vec3,
    /// Linear transform in the affine transform.
    pub linear_transform: Mat3,
}

impl Default for AffineTransform {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    /// Gets the identity affine transform.
    #[inline(always)]
    pub const fn identity() -> Self {
        Self {
            linear_transform: Mat3::IDENTITY,
            translation: Vec3::ZERO,
        }
    }

    /// Constructs a new affine transform.
    #[inline(always)]
    pub fn from_rotation_translation(orientation: Quat, translation: Vec3) -> Self {
        Self {
            linear_transform: Mat3::from_quat(orientation),
            translation,
        }
    }

    /// Constructs a new affine transform.
    #[inline(always)]
    pub fn from_linear_transform_translation(linear_transform: Mat3, translation: Vec3) -> Self {
        Self {
            linear_transform,
            translation,
        }
    }

    /// Transforms a vector by an affine transform.
    #[inline(always)]
    pub fn transform(position: Vec3, transform: &Self, transformed: &mut Vec3) {
        *transformed = transform.linear_transform * position + transform.translation;
    }

    /// Transforms a point by this transform.
    #[inline(always)]
    pub fn transform_point(&self, position: Vec3) -> Vec3 {
        let mut transformed = Vec3::ZERO;
        Self::transform(position, self, &mut transformed);
        transformed
    }

    /// Computes the axis-aligned bounds, in the transformed space, of a box given in the source space.
    pub fn transform_bounds(&self, bounds: &BoundingBox) -> BoundingBox {
        if bounds.is_empty() {
            return BoundingBox::EMPTY;
        }
        let mut result = BoundingBox::EMPTY;
        for corner in bounds.corners() {
            result.extend_point(self.transform_point(corner));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_bounds_unchanged() {
        let b = BoundingBox::new(Vec3::new(-1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(AffineTransform::identity().transform_bounds(&b), b);
        assert!(AffineTransform::identity()
            .transform_bounds(&BoundingBox::EMPTY)
            .is_empty());
    }

    #[test]
    fn rotated_bounds_swap_axes() {
        let rotation = AffineTransform::from_rotation_translation(
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let b = BoundingBox::new(Vec3::ZERO, Vec3::new(4.0, 1.0, 1.0));
        let t = rotation.transform_bounds(&b);
        assert_relative_eq!(t.min.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(t.max.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(t.min.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(t.max.y, 4.0, epsilon = 1e-5);
        assert_relative_eq!(t.min.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(t.max.z, 2.0, epsilon = 1e-5);
    }
}
