use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::error::Result;
use crate::filter::filter_chunks;
use crate::merge::merge_chunks;
use crate::partition::{self, DEFAULT_WORKERS, effective_workers};
use crate::positions::PositionIndex;
use crate::vcf_io::{read_vcf, write_vcf};

/// Inputs for one filtering run.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub positions: PathBuf,
    pub vcf: PathBuf,
    pub output: PathBuf,
    workers: usize,
}

impl FilterConfig {
    pub fn new(positions: impl Into<PathBuf>, vcf: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            positions: positions.into(),
            vcf: vcf.into(),
            output: output.into(),
            workers: DEFAULT_WORKERS,
        }
    }

    /// Set the worker count; values below 1 become 1.
    pub fn with_workers(mut self, requested: i64) -> Self {
        self.workers = effective_workers(requested);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// Counts reported after a successful run.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub positions: usize,
    pub chromosomes: usize,
    pub records_read: usize,
    pub records_kept: usize,
    pub chunks: usize,
    /// Filter threads actually started (never more than `chunks`)
    pub workers: usize,
}

/// Load positions and records, filter chunks in parallel, merge and write.
///
/// Both inputs are fully parsed before the output file is created, so a bad
/// input line never leaves a partial output behind.
pub fn run(cfg: &FilterConfig) -> Result<RunSummary> {
    let t0 = Instant::now();
    let workers = cfg.workers;

    let index = PositionIndex::load(&cfg.positions)?;
    info!(
        "[positions] loaded {} sites on {} chromosomes from {}",
        index.len(),
        index.chromosome_count(),
        cfg.positions.display()
    );
    if index.is_empty() {
        warn!("[positions] allow-list is empty; output will contain the header only");
    }

    let (header, records) = read_vcf(&cfg.vcf)?;
    info!(
        "[vcf] read {} header lines, {} samples, {} records from {}",
        header.len(),
        header.samples().len(),
        records.len(),
        cfg.vcf.display()
    );

    if header.is_empty() {
        warn!("[vcf] {} has no header lines", cfg.vcf.display());
    }

    let chunks = partition::split(&records, workers);
    let n_chunks = chunks.len();
    let threads = workers.min(n_chunks);
    info!(
        "[partition] {} chunks of up to {} records over {} worker threads ({} requested)",
        n_chunks,
        partition::chunk_size(records.len(), workers),
        threads,
        workers
    );

    let filtered = filter_chunks(chunks, &index, workers)?;
    let merged = merge_chunks(filtered, n_chunks)?;

    let written = write_vcf(&cfg.output, &header, merged)?;
    info!(
        "[write] kept {}/{} records -> {} ({:.2?})",
        written,
        records.len(),
        cfg.output.display(),
        t0.elapsed()
    );

    Ok(RunSummary {
        positions: index.len(),
        chromosomes: index.chromosome_count(),
        records_read: records.len(),
        records_kept: written,
        chunks: n_chunks,
        workers: threads,
    })
}
