use thiserror::Error;

/// Largest bin count the scalar binner is instantiated with.
pub const MAXIMUM_BIN_COUNT: usize = 32;

/// Block shifts at or above this would overflow the block rounding.
const MAXIMUM_BLOCK_SHIFT: u32 = 31;

/// Rejected binning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinningError {
    #[error("bin count {requested} is outside 1..={maximum}")]
    BinCountOutOfRange { requested: usize, maximum: usize },
    #[error("block shift {0} must be below 31")]
    BlockShiftOutOfRange(u32),
    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// Which binner implementation evaluates splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinnerKind {
    /// Scalar binner with up to `max_bins` adaptive bins.
    Scalar,
    /// Lane-parallel binner with a fixed 16 bins.
    Wide,
    /// Wide when the CPU has native 16-lane float vectors, scalar otherwise.
    #[default]
    Auto,
}

impl BinnerKind {
    /// Resolves `Auto` against the running CPU.
    pub fn resolve(self) -> BinnerKind {
        match self {
            BinnerKind::Auto => {
                if has_wide_lanes() {
                    BinnerKind::Wide
                } else {
                    BinnerKind::Scalar
                }
            }
            kind => kind,
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn has_wide_lanes() -> bool {
    is_x86_feature_detected!("avx512f")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn has_wide_lanes() -> bool {
    false
}

/// Settings for a binned split search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinningSettings {
    /// Upper bound on bins per axis for the scalar binner.
    ///
    /// Ignored when the wide binner runs, which always uses 16 bins. That includes `Auto` on CPUs
    /// with native 16-lane vectors.
    pub max_bins: usize,
    /// Primitive counts are rounded up to blocks of `1 << block_shift` when costing a split.
    pub block_shift: u32,
    /// Number of workers binning disjoint chunks in parallel.
    pub worker_count: usize,
    /// Ranges smaller than this are binned on the calling thread.
    pub parallel_threshold: usize,
    /// Binner implementation.
    pub kind: BinnerKind,
}

impl Default for BinningSettings {
    fn default() -> Self {
        Self {
            max_bins: MAXIMUM_BIN_COUNT,
            block_shift: 0,
            worker_count: 1,
            parallel_threshold: 1024,
            kind: BinnerKind::Auto,
        }
    }
}

impl BinningSettings {
    pub fn with_max_bins(mut self, max_bins: usize) -> Self {
        self.max_bins = max_bins;
        self
    }

    pub fn with_block_shift(mut self, block_shift: u32) -> Self {
        self.block_shift = block_shift;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    pub fn with_kind(mut self, kind: BinnerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<(), BinningError> {
        if self.max_bins == 0 || self.max_bins > MAXIMUM_BIN_COUNT {
            return Err(BinningError::BinCountOutOfRange {
                requested: self.max_bins,
                maximum: MAXIMUM_BIN_COUNT,
            });
        }
        if self.block_shift >= MAXIMUM_BLOCK_SHIFT {
            return Err(BinningError::BlockShiftOutOfRange(self.block_shift));
        }
        if self.worker_count == 0 {
            return Err(BinningError::NoWorkers);
        }
        Ok(())
    }
}
