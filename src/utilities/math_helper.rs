/// Clamps a value between a minimum and maximum value.
#[inline(always)]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Rounds `count` up to a whole number of blocks of `1 << block_shift` and returns the block count.
///
/// Every shift is accepted. From 32 upward a non-zero count is a single block.
#[inline(always)]
pub fn block_count(count: u32, block_shift: u32) -> u32 {
    // Shifts past 63 give the same result as 63 for a 32-bit count.
    let block_shift = block_shift.min(63);
    let block_add = (1u64 << block_shift) - 1;
    ((count as u64 + block_add) >> block_shift) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_count() {
        assert_eq!(block_count(0, 0), 0);
        assert_eq!(block_count(7, 0), 7);
        assert_eq!(block_count(1, 2), 1);
        assert_eq!(block_count(4, 2), 1);
        assert_eq!(block_count(5, 2), 2);
        assert_eq!(block_count(u32::MAX, 3), 1 << 29);
        assert_eq!(block_count(u32::MAX, 31), 2);
        assert_eq!(block_count(7, 32), 1);
        assert_eq!(block_count(u32::MAX, 32), 1);
        assert_eq!(block_count(1, 200), 1);
        assert_eq!(block_count(0, 200), 0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1, 0, 3), 0);
        assert_eq!(clamp(2.5, 0.0, 3.0), 2.5);
    }
}
