use glam::Vec3;
use std::fmt;

/// Provides simple axis-aligned bounding box functionality.
///
/// The empty box has `min = +inf` and `max = -inf`. It is the identity of [`BoundingBox::create_merged_boxes`],
/// so accumulating boxes can always start from [`BoundingBox::EMPTY`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Location with the lowest X, Y, and Z coordinates in the axis-aligned bounding box.
    pub min: Vec3,
    /// Location with the highest X, Y, and Z coordinates in the axis-aligned bounding box.
    pub max: Vec3,
}

impl Default for BoundingBox {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// Bounding box containing nothing.
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Constructs a bounding box from the specified minimum and maximum.
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Constructs a zero volume bounding box around a single point.
    #[inline]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Creates the smallest possible bounding box that contains a list of points.
    /// An empty list produces [`BoundingBox::EMPTY`].
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut result = Self::EMPTY;
        for point in points {
            result.extend_point(*point);
        }
        result
    }

    /// Returns true if the box contains no points at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Grows the box to contain another box.
    #[inline]
    pub fn extend(&mut self, other: &BoundingBox) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grows the box to contain a point.
    #[inline]
    pub fn extend_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Computes a bounding box which contains two other bounding boxes.
    #[inline]
    pub fn create_merged(min_a: Vec3, max_a: Vec3, min_b: Vec3, max_b: Vec3) -> (Vec3, Vec3) {
        (min_a.min(min_b), max_a.max(max_b))
    }

    /// Computes a bounding box which contains two other bounding boxes.
    #[inline]
    pub fn create_merged_boxes(a: Self, b: Self) -> Self {
        let (min, max) = Self::create_merged(a.min, a.max, b.min, b.max);
        Self { min, max }
    }

    /// Sum of the box's corner coordinates, i.e. twice its center.
    /// Binning only needs a consistent scale, so the halving is skipped.
    #[inline]
    pub fn center2(&self) -> Vec3 {
        self.min + self.max
    }

    /// Computes the extent of the box along each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of the box's surface area. Empty boxes report zero.
    #[inline]
    pub fn half_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let offset = self.max - self.min;
        offset.x * offset.y + offset.y * offset.z + offset.z * offset.x
    }

    /// Returns true if `other` lies entirely within this box. Every box contains the empty box.
    #[inline]
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.is_empty() || (self.min.cmple(other.min).all() && self.max.cmpge(other.max).all())
    }

    /// Returns the eight corners of the box.
    #[inline]
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}
