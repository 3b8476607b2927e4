use crate::utilities::bounding_box::BoundingBox;
use glam::Vec3;

/// Anything that can be placed into bins by its axis-aligned bounds.
pub trait Bounded {
    /// Bounds of the primitive in world space.
    fn bounds(&self) -> BoundingBox;
}

/// Reference to a single primitive handed to the builder: its bounds plus the ids needed to find it again.
///
/// Laid out so that `min`/`geometry_id` and `max`/`primitive_id` each fill 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrimitiveRef {
    /// Minimum bounds of the primitive.
    pub min: Vec3,
    /// Index of the geometry owning the primitive.
    pub geometry_id: u32,
    /// Maximum bounds of the primitive.
    pub max: Vec3,
    /// Index of the primitive within its geometry.
    pub primitive_id: u32,
}

impl PrimitiveRef {
    #[inline]
    pub fn new(bounds: BoundingBox, geometry_id: u32, primitive_id: u32) -> Self {
        Self {
            min: bounds.min,
            geometry_id,
            max: bounds.max,
            primitive_id,
        }
    }
}

impl Bounded for PrimitiveRef {
    #[inline(always)]
    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }
}

impl Bounded for BoundingBox {
    #[inline(always)]
    fn bounds(&self) -> BoundingBox {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_sizes() {
        assert_eq!(mem::size_of::<PrimitiveRef>(), 32);
        assert_eq!(mem::align_of::<PrimitiveRef>(), 4);
    }

    #[test]
    fn test_offsets() {
        let p = PrimitiveRef::default();
        let base = &p as *const PrimitiveRef as usize;
        assert_eq!(&p.min as *const _ as usize - base, 0);
        assert_eq!(&p.geometry_id as *const _ as usize - base, 12);
        assert_eq!(&p.max as *const _ as usize - base, 16);
        assert_eq!(&p.primitive_id as *const _ as usize - base, 28);
    }

    #[test]
    fn test_bounds() {
        let b = BoundingBox::new(Vec3::new(0.0, 1.0, 2.0), Vec3::new(1.0, 2.0, 4.0));
        let p = PrimitiveRef::new(b, 3, 7);
        assert_eq!(p.bounds(), b);
        assert_eq!(p.bounds().center2(), Vec3::new(1.0, 3.0, 6.0));
        assert_eq!((p.geometry_id, p.primitive_id), (3, 7));
    }
}
