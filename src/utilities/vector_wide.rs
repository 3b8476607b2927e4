use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// Fixed-width numeric vector of `N` lanes backed by a plain array.
///
/// Every operation is a straight loop over the lanes, which the compiler turns into native vector
/// instructions where the target has them and into scalar code everywhere else.
#[repr(C, align(64))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorWide<T, const N: usize> {
    pub lanes: [T; N],
}

/// Lane mask produced by comparisons on [`VectorWide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskWide<const N: usize> {
    pub lanes: [bool; N],
}

/// 16 lanes of `f32`.
pub type Vector16 = VectorWide<f32, 16>;
/// 16 lanes of `i32`.
pub type VectorI16 = VectorWide<i32, 16>;
/// 16 lane mask.
pub type Mask16 = MaskWide<16>;

impl<const N: usize> MaskWide<N> {
    /// Creates a mask from the low `N` bits of `bits`, lane 0 in bit 0.
    #[inline(always)]
    pub fn from_bits(bits: u64) -> Self {
        Self {
            lanes: std::array::from_fn(|i| (bits >> i) & 1 == 1),
        }
    }

    /// Lanewise AND.
    #[inline(always)]
    pub fn and(&self, other: &Self) -> Self {
        Self {
            lanes: std::array::from_fn(|i| self.lanes[i] & other.lanes[i]),
        }
    }

    /// Returns true if any lane is set.
    #[inline(always)]
    pub fn any(&self) -> bool {
        self.lanes.iter().any(|&lane| lane)
    }

    /// Counts the set lanes.
    #[inline(always)]
    pub fn count_ones(&self) -> usize {
        self.lanes.iter().filter(|&&lane| lane).count()
    }
}

impl<T: Copy, const N: usize> VectorWide<T, N> {
    /// Creates a vector with every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self { lanes: [value; N] }
    }

    /// Creates a vector from a lane index function.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self {
            lanes: std::array::from_fn(f),
        }
    }

    /// Picks lanes from `a` where the mask is set and from `b` elsewhere.
    #[inline(always)]
    pub fn select(mask: &MaskWide<N>, a: &Self, b: &Self) -> Self {
        Self::from_fn(|i| if mask.lanes[i] { a.lanes[i] } else { b.lanes[i] })
    }

    /// Moves every lane one slot toward lane 0; the last lane is filled with `fill`.
    #[inline(always)]
    pub fn shift_down_one(&self, fill: T) -> Self {
        Self::from_fn(|i| if i + 1 < N { self.lanes[i + 1] } else { fill })
    }

    /// Inclusive left-to-right scan with `f`.
    #[inline(always)]
    fn scan(&self, f: impl Fn(T, T) -> T) -> Self {
        let mut result = *self;
        for i in 1..N {
            result.lanes[i] = f(result.lanes[i - 1], result.lanes[i]);
        }
        result
    }

    /// Inclusive right-to-left scan with `f`.
    #[inline(always)]
    fn reverse_scan(&self, f: impl Fn(T, T) -> T) -> Self {
        let mut result = *self;
        for i in (0..N.saturating_sub(1)).rev() {
            result.lanes[i] = f(result.lanes[i + 1], result.lanes[i]);
        }
        result
    }
}

impl<T: Copy + PartialEq, const N: usize> VectorWide<T, N> {
    /// Lanewise equality.
    #[inline(always)]
    pub fn simd_eq(&self, other: &Self) -> MaskWide<N> {
        MaskWide {
            lanes: std::array::from_fn(|i| self.lanes[i] == other.lanes[i]),
        }
    }
}

impl<T: Copy + PartialOrd, const N: usize> VectorWide<T, N> {
    /// Lanewise less-than.
    #[inline(always)]
    pub fn simd_lt(&self, other: &Self) -> MaskWide<N> {
        MaskWide {
            lanes: std::array::from_fn(|i| self.lanes[i] < other.lanes[i]),
        }
    }

    /// Lanewise greater-than.
    #[inline(always)]
    pub fn simd_gt(&self, other: &Self) -> MaskWide<N> {
        other.simd_lt(self)
    }

    /// Lanewise minimum.
    #[inline(always)]
    pub fn min(&self, other: &Self) -> Self {
        Self::from_fn(|i| min_lane(self.lanes[i], other.lanes[i]))
    }

    /// Lanewise maximum.
    #[inline(always)]
    pub fn max(&self, other: &Self) -> Self {
        Self::from_fn(|i| max_lane(self.lanes[i], other.lanes[i]))
    }

    /// Lanewise minimum against a scalar, applied only where the mask is set.
    #[inline(always)]
    pub fn mask_min(&self, mask: &MaskWide<N>, value: T) -> Self {
        Self::from_fn(|i| {
            if mask.lanes[i] {
                min_lane(self.lanes[i], value)
            } else {
                self.lanes[i]
            }
        })
    }

    /// Lanewise maximum against a scalar, applied only where the mask is set.
    #[inline(always)]
    pub fn mask_max(&self, mask: &MaskWide<N>, value: T) -> Self {
        Self::from_fn(|i| {
            if mask.lanes[i] {
                max_lane(self.lanes[i], value)
            } else {
                self.lanes[i]
            }
        })
    }

    /// Running minimum from lane 0 upward.
    #[inline(always)]
    pub fn prefix_min(&self) -> Self {
        self.scan(min_lane)
    }

    /// Running maximum from lane 0 upward.
    #[inline(always)]
    pub fn prefix_max(&self) -> Self {
        self.scan(max_lane)
    }

    /// Running minimum from the last lane downward.
    #[inline(always)]
    pub fn reverse_prefix_min(&self) -> Self {
        self.reverse_scan(min_lane)
    }

    /// Running maximum from the last lane downward.
    #[inline(always)]
    pub fn reverse_prefix_max(&self) -> Self {
        self.reverse_scan(max_lane)
    }

    /// Index of the smallest lane; the lowest index wins ties.
    #[inline(always)]
    pub fn select_min(&self) -> usize {
        let mut best = 0;
        for i in 1..N {
            if self.lanes[i] < self.lanes[best] {
                best = i;
            }
        }
        best
    }
}

impl<T: Copy + Add<Output = T>, const N: usize> VectorWide<T, N> {
    /// Lanewise add of a scalar where the mask is set.
    #[inline(always)]
    pub fn mask_add(&self, mask: &MaskWide<N>, value: T) -> Self {
        Self::from_fn(|i| {
            if mask.lanes[i] {
                self.lanes[i] + value
            } else {
                self.lanes[i]
            }
        })
    }

    /// Running sum from lane 0 upward.
    #[inline(always)]
    pub fn prefix_sum(&self) -> Self {
        self.scan(|a, b| a + b)
    }

    /// Running sum from the last lane downward.
    #[inline(always)]
    pub fn reverse_prefix_sum(&self) -> Self {
        self.reverse_scan(|a, b| a + b)
    }
}

impl<const N: usize> VectorWide<i32, N> {
    /// Lane indices `0, 1, .., N - 1`.
    #[inline(always)]
    pub fn iota() -> Self {
        Self::from_fn(|i| i as i32)
    }
}

#[inline(always)]
fn min_lane<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline(always)]
fn max_lane<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

macro_rules! impl_lanewise_op {
    ($trait:ident, $method:ident) => {
        impl<T: Copy + $trait<Output = T>, const N: usize> $trait for VectorWide<T, N> {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self::from_fn(|i| self.lanes[i].$method(rhs.lanes[i]))
            }
        }
    };
}

impl_lanewise_op!(Add, add);
impl_lanewise_op!(Sub, sub);
impl_lanewise_op!(Mul, mul);

impl<T, const N: usize> Index<usize> for VectorWide<T, N> {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.lanes[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for VectorWide<T, N> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.lanes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_scans() {
        let v = VectorWide::<i32, 4> {
            lanes: [3, 1, 4, 1],
        };
        assert_eq!(v.prefix_sum().lanes, [3, 4, 8, 9]);
        assert_eq!(v.reverse_prefix_sum().lanes, [9, 6, 5, 1]);
        assert_eq!(v.prefix_min().lanes, [3, 1, 1, 1]);
        assert_eq!(v.prefix_max().lanes, [3, 3, 4, 4]);
        assert_eq!(v.reverse_prefix_min().lanes, [1, 1, 1, 1]);
        assert_eq!(v.reverse_prefix_max().lanes, [4, 4, 4, 1]);
    }

    #[test]
    fn test_shift_and_select_min() {
        let v = Vector16::from_fn(|i| (16 - i) as f32);
        let shifted = v.shift_down_one(0.0);
        assert_eq!(shifted[0], 15.0);
        assert_eq!(shifted[14], 1.0);
        assert_eq!(shifted[15], 0.0);
        assert_eq!(v.select_min(), 15);
        let ties = VectorWide::<f32, 4> {
            lanes: [2.0, 1.0, 1.0, 3.0],
        };
        assert_eq!(ties.select_min(), 1);
    }

    #[test]
    fn test_one_hot_masked_update() {
        let mask = VectorI16::iota().simd_eq(&VectorI16::splat(5));
        assert_eq!(mask.count_ones(), 1);
        let counts = VectorI16::splat(0).mask_add(&mask, 1);
        assert_eq!(counts.lanes.iter().sum::<i32>(), 1);
        assert_eq!(counts[5], 1);
        let mins = Vector16::splat(f32::INFINITY).mask_min(&mask, -2.0);
        assert_eq!(mins[5], -2.0);
        assert_eq!(mins[4], f32::INFINITY);
    }

    #[test]
    fn test_mask_bits() {
        let m = Mask16::from_bits(0x7fff);
        assert_eq!(m.count_ones(), 15);
        assert!(!m.lanes[15]);
        assert!(m.and(&Mask16::from_bits(1)).any());
        assert!(!m.and(&Mask16::from_bits(1 << 15)).any());
    }
}
