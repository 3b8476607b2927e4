pub mod affine_transform;
pub mod bounding_box;
pub mod math_helper;
pub mod vector_wide;

pub use self::affine_transform::AffineTransform;
pub use self::bounding_box::BoundingBox;
