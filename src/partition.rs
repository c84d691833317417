use crate::vcf_io::VcfRecord;

/// Default number of filter workers when `--threads` is not given.
pub const DEFAULT_WORKERS: usize = 4;

/// A contiguous run of records plus its place in the original ordering.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub index: usize,
    pub records: &'a [VcfRecord],
}

/// Clamp a user-supplied worker count to at least 1.
pub fn effective_workers(requested: i64) -> usize {
    if requested < 1 { 1 } else { requested as usize }
}

/// Threads worth starting for `chunks` chunks: one per chunk, capped at `workers`.
pub fn pool_size(workers: usize, chunks: usize) -> usize {
    workers.min(chunks).max(1)
}

/// Records per chunk for `n` records over `workers` workers: ceil(n / workers).
pub fn chunk_size(n: usize, workers: usize) -> usize {
    n.div_ceil(workers.max(1))
}

/// Split `records` into contiguous chunks of `ceil(N / W)` records; the last
/// chunk holds the remainder. No records means no chunks.
pub fn split(records: &[VcfRecord], workers: usize) -> Vec<Chunk<'_>> {
    if records.is_empty() {
        return Vec::new();
    }
    let size = chunk_size(records.len(), workers);
    records
        .chunks(size)
        .enumerate()
        .map(|(index, records)| Chunk { index, records })
        .collect()
}
