pub mod bin_info;
pub mod bin_info_wide;
pub mod bin_mapping;
pub mod bin_split;
pub mod binned_split;
pub mod binning_settings;
pub mod prim_ref;
pub mod range_summary;

pub use self::bin_info::{BinAccumulator, BinInfo, SplitEvaluator};
pub use self::bin_info_wide::{WideBinInfo, WIDE_BIN_COUNT};
pub use self::bin_mapping::{Axis, AxisMapping};
pub use self::bin_split::{SplitDescriptor, SplitDetail};
pub use self::binned_split::{bin_parallel, find_best_split, reduce_pairwise};
pub use self::binning_settings::{BinnerKind, BinningError, BinningSettings, MAXIMUM_BIN_COUNT};
pub use self::prim_ref::{Bounded, PrimitiveRef};
pub use self::range_summary::RangeSummary;
