use log::debug;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{FileKind, Result, SiteFilterError};

/// Allow-list of (chromosome, position) sites, keyed by chromosome.
///
/// Built once before filtering starts and only read afterwards, so workers
/// share it by plain reference.
#[derive(Debug, Default, Clone)]
pub struct PositionIndex {
    sites: HashMap<String, HashSet<u64>>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a two-column TSV (`chrom<TAB>pos`, no header row).
    ///
    /// Every line must have exactly two fields and a non-negative integer
    /// position; the first bad line aborts the load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| SiteFilterError::NotFound {
            kind: FileKind::PositionList,
            path: path.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(f);

        let mut index = PositionIndex::new();
        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|e| SiteFilterError::from_read(FileKind::PositionList, path, line_no, e))?;
            let line = line.strip_suffix('\r').unwrap_or(&line);

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 2 {
                return Err(SiteFilterError::malformed(
                    FileKind::PositionList,
                    path,
                    line_no,
                    format!("expected 2 tab-separated fields, found {}", fields.len()),
                ));
            }
            let pos: u64 = fields[1].parse().map_err(|_| {
                SiteFilterError::malformed(
                    FileKind::PositionList,
                    path,
                    line_no,
                    format!("position '{}' is not a non-negative integer", fields[1]),
                )
            })?;
            index.insert(fields[0], pos);
        }
        debug!(
            "[positions] {} distinct sites on {} chromosomes from {}",
            index.len(),
            index.chromosome_count(),
            path.display()
        );
        Ok(index)
    }

    /// Add a site. Re-adding an existing site is a no-op.
    pub fn insert(&mut self, chrom: &str, pos: u64) {
        match self.sites.get_mut(chrom) {
            Some(set) => {
                set.insert(pos);
            }
            None => {
                self.sites.insert(chrom.to_string(), HashSet::from([pos]));
            }
        }
    }

    #[inline]
    pub fn contains(&self, chrom: &str, pos: u64) -> bool {
        self.sites.get(chrom).is_some_and(|set| set.contains(&pos))
    }

    /// Number of distinct sites.
    pub fn len(&self) -> usize {
        self.sites.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.values().all(HashSet::is_empty)
    }

    pub fn chromosome_count(&self) -> usize {
        self.sites.len()
    }
}

impl FromIterator<(String, u64)> for PositionIndex {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut index = PositionIndex::new();
        for (chrom, pos) in iter {
            index.insert(&chrom, pos);
        }
        index
    }
}
