use super::bin_info::{BinAccumulator, BinInfo, SplitEvaluator};
use super::bin_info_wide::{WideBinInfo, WIDE_BIN_COUNT};
use super::bin_mapping::AxisMapping;
use super::bin_split::SplitDescriptor;
use super::binning_settings::{BinnerKind, BinningError, BinningSettings, MAXIMUM_BIN_COUNT};
use super::prim_ref::Bounded;
use super::range_summary::RangeSummary;
use crossbeam_utils::thread;
use crossbeam_utils::CachePadded;
use log::{debug, trace};
use std::panic;

/// Bins `primitives` on up to `worker_count` threads and merges the per-worker bins.
///
/// The slice is cut into contiguous chunks, one per worker. Each worker fills its own cache padded
/// accumulator, so nothing is shared while binning; the partial results are then merged pairwise.
pub fn bin_parallel<B, P>(primitives: &[P], mapping: &AxisMapping, worker_count: usize) -> B
where
    B: BinAccumulator,
    P: Bounded + Sync,
{
    let worker_count = worker_count.clamp(1, primitives.len().max(1));
    if worker_count == 1 {
        let mut bins = B::empty();
        bins.append(primitives, mapping);
        return bins;
    }

    let chunk_size = primitives.len().div_ceil(worker_count);
    trace!(
        "[binned_split] binning {} primitives on {} workers, {} per chunk",
        primitives.len(),
        worker_count,
        chunk_size
    );
    let partials = thread::scope(|scope| {
        let handles: Vec<_> = primitives
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move |_| {
                    let mut bins = CachePadded::new(B::empty());
                    bins.append(chunk, mapping);
                    bins
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload))
            })
            .map(CachePadded::into_inner)
            .collect::<Vec<B>>()
    })
    .unwrap_or_else(|payload| panic::resume_unwind(payload));
    reduce_pairwise(partials)
}

/// Merges accumulators as a balanced binary tree: neighbours first, then neighbouring pairs, and so on.
pub fn reduce_pairwise<B: BinAccumulator>(mut partials: Vec<B>) -> B {
    while partials.len() > 1 {
        let mut next = Vec::with_capacity(partials.len().div_ceil(2));
        let mut remaining = partials.into_iter();
        while let Some(mut a) = remaining.next() {
            if let Some(b) = remaining.next() {
                a.combine(&b);
            }
            next.push(a);
        }
        partials = next;
    }
    partials.pop().unwrap_or_else(B::empty)
}

fn evaluate<B, P>(
    primitives: &[P],
    mapping: &AxisMapping,
    worker_count: usize,
    block_shift: u32,
) -> SplitDescriptor
where
    B: SplitEvaluator,
    P: Bounded + Sync,
{
    let bins: B = bin_parallel(primitives, mapping, worker_count);
    bins.best(mapping, block_shift)
}

/// Bins a primitive range and returns its cheapest SAH split.
///
/// `summary` must describe `primitives`. The returned split may be invalid, in which case the caller
/// should fall back to another strategy or make a leaf.
pub fn find_best_split<P: Bounded + Sync>(
    primitives: &[P],
    summary: &RangeSummary,
    settings: &BinningSettings,
) -> Result<SplitDescriptor, BinningError> {
    settings.validate()?;
    let worker_count = if primitives.len() < settings.parallel_threshold {
        1
    } else {
        settings.worker_count
    };
    let split = match settings.kind.resolve() {
        BinnerKind::Wide => {
            let mapping = AxisMapping::new_fixed(summary, WIDE_BIN_COUNT);
            evaluate::<WideBinInfo, P>(primitives, &mapping, worker_count, settings.block_shift)
        }
        _ => {
            let mapping = AxisMapping::new(summary, settings.max_bins);
            evaluate::<BinInfo<MAXIMUM_BIN_COUNT>, P>(
                primitives,
                &mapping,
                worker_count,
                settings.block_shift,
            )
        }
    };
    if split.is_valid() {
        trace!("[binned_split] {} primitives: {}", primitives.len(), split);
    } else {
        debug!(
            "[binned_split] no SAH split for {} primitives, {}",
            primitives.len(),
            split.mapping
        );
    }
    Ok(split)
}
