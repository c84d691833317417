use log::debug;

use crate::error::Result;
use crate::partition::Chunk;
use crate::positions::PositionIndex;
use crate::vcf_io::VcfRecord;

#[cfg(feature = "rayon")]
use crate::error::SiteFilterError;
#[cfg(feature = "rayon")]
use crate::partition::pool_size;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Records of one chunk that survived filtering, still tagged with the chunk index.
#[derive(Debug)]
pub struct FilteredChunk<'a> {
    pub index: usize,
    pub records: Vec<&'a VcfRecord>,
}

/// Keep the records whose (CHROM, POS) is in the index, in chunk order.
/// Records on chromosomes absent from the index are dropped.
pub fn filter_chunk<'a>(chunk: Chunk<'a>, index: &PositionIndex) -> FilteredChunk<'a> {
    let records: Vec<&'a VcfRecord> = chunk
        .records
        .iter()
        .filter(|rec| index.contains(&rec.chrom, rec.pos))
        .collect();
    if let (Some(first), Some(last)) = (chunk.records.first(), chunk.records.last()) {
        debug!(
            "[filter] chunk {} (lines {}..={}): kept {}/{}",
            chunk.index,
            first.line_number,
            last.line_number,
            records.len(),
            chunk.records.len()
        );
    }
    FilteredChunk { index: chunk.index, records }
}

/// Run one `filter_chunk` per chunk on a pool of at most `workers` threads
/// (`workers` is already clamped to >= 1 by the caller). The pool never has
/// more threads than there are chunks.
///
/// Results come back in completion order; callers restore the original order
/// with [`crate::merge::merge_chunks`].
#[cfg(feature = "rayon")]
pub fn filter_chunks<'a>(
    chunks: Vec<Chunk<'a>>,
    index: &PositionIndex,
    workers: usize,
) -> Result<Vec<FilteredChunk<'a>>> {
    if chunks.is_empty() {
        return Ok(Vec::new());
    }
    let threads = pool_size(workers, chunks.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("site-filter-{i}"))
        .build()
        .map_err(|e| SiteFilterError::WorkerPool { threads, reason: e.to_string() })?;

    let done = std::sync::Mutex::new(Vec::with_capacity(chunks.len()));
    pool.install(|| {
        chunks.into_par_iter().for_each(|chunk| {
            let filtered = filter_chunk(chunk, index);
            // completion order, not chunk order
            let mut guard = done.lock().unwrap_or_else(|p| p.into_inner());
            guard.push(filtered);
        });
    });
    Ok(done.into_inner().unwrap_or_else(|p| p.into_inner()))
}

#[cfg(not(feature = "rayon"))]
pub fn filter_chunks<'a>(
    chunks: Vec<Chunk<'a>>,
    index: &PositionIndex,
    _workers: usize,
) -> Result<Vec<FilteredChunk<'a>>> {
    Ok(chunks.into_iter().map(|chunk| filter_chunk(chunk, index)).collect())
}
