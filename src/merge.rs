use crate::error::{Result, SiteFilterError};
use crate::filter::FilteredChunk;
use crate::vcf_io::VcfRecord;

/// Concatenate per-chunk results by ascending chunk index, whatever order the
/// workers finished in.
///
/// `expected_chunks` is the number of chunks the partitioner produced; every
/// index in `0..expected_chunks` must appear exactly once.
pub fn merge_chunks<'a>(
    mut results: Vec<FilteredChunk<'a>>,
    expected_chunks: usize,
) -> Result<Vec<&'a VcfRecord>> {
    results.sort_by_key(|r| r.index);

    for (expected, r) in results.iter().enumerate() {
        if r.index >= expected_chunks {
            return Err(SiteFilterError::Consistency(format!(
                "chunk index {} out of range (expected {} chunks)",
                r.index, expected_chunks
            )));
        }
        if r.index < expected {
            return Err(SiteFilterError::Consistency(format!("chunk {} reported twice", r.index)));
        }
        if r.index > expected {
            return Err(SiteFilterError::Consistency(format!("chunk {expected} missing from results")));
        }
    }
    if results.len() != expected_chunks {
        return Err(SiteFilterError::Consistency(format!(
            "chunk {} missing from results",
            results.len()
        )));
    }

    let total: usize = results.iter().map(|r| r.records.len()).sum();
    let mut merged = Vec::with_capacity(total);
    for r in results {
        merged.extend(r.records);
    }
    Ok(merged)
}
