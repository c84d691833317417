use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{FileKind, Result, SiteFilterError};

/// One VCF data line. Only CHROM and POS are parsed; the original text is
/// kept for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfRecord {
    pub chrom: String,
    pub pos: u64,
    pub raw: String, // full original line, without terminator
    pub line_number: usize,
}

impl VcfRecord {
    /// Parse a non-header line. Needs at least CHROM and an integer POS.
    pub fn parse(line: String, line_number: usize, path: &Path) -> Result<Self> {
        let bad = |reason: String| SiteFilterError::malformed(FileKind::Vcf, path, line_number, reason);
        let mut it = line.split('\t');
        let chrom = it.next().unwrap_or_default();
        let pos_field = it
            .next()
            .ok_or_else(|| bad("expected at least 2 tab-separated fields (CHROM, POS), found 1".to_string()))?;
        let pos: u64 = pos_field
            .parse()
            .map_err(|_| bad(format!("POS '{pos_field}' is not a non-negative integer")))?;
        if chrom.is_empty() {
            return Err(bad("empty CHROM field".to_string()));
        }
        Ok(VcfRecord {
            chrom: chrom.to_string(),
            pos,
            raw: line,
            line_number,
        })
    }
}

/// Leading `##` meta lines and the `#CHROM` column line, verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcfHeader {
    pub lines: Vec<String>,
}

impl VcfHeader {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sample names from the `#CHROM` line (columns after FORMAT).
    pub fn samples(&self) -> Vec<&str> {
        self.lines
            .iter()
            .rev()
            .find(|l| l.starts_with("#CHROM"))
            .map(|l| l.split('\t').skip(9).collect())
            .unwrap_or_default()
    }
}

/// Read a plain-text VCF, returning (header, records) in file order.
pub fn read_vcf<P: AsRef<Path>>(path: P) -> Result<(VcfHeader, Vec<VcfRecord>)> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| SiteFilterError::NotFound {
        kind: FileKind::Vcf,
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(f);

    let mut header = VcfHeader::default();
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| SiteFilterError::from_read(FileKind::Vcf, path, line_no, e))?;
        if line.starts_with('#') {
            if !records.is_empty() {
                return Err(SiteFilterError::malformed(
                    FileKind::Vcf,
                    path,
                    line_no,
                    "header line after the first data record",
                ));
            }
            header.lines.push(line);
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        records.push(VcfRecord::parse(line, line_no, path)?);
    }
    Ok((header, records))
}

/// Write header then records to `path` (created or truncated).
/// Returns the number of records written.
pub fn write_vcf<'a, P, I>(path: P, header: &VcfHeader, records: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a VcfRecord>,
{
    let path = path.as_ref();
    let io_err = |e: std::io::Error| SiteFilterError::Io { path: path.to_path_buf(), source: e };

    let f = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(f);

    for h in &header.lines {
        writeln!(writer, "{h}").map_err(io_err)?;
    }
    let mut n = 0usize;
    for rec in records {
        writeln!(writer, "{}", rec.raw).map_err(io_err)?;
        n += 1;
    }
    writer.flush().map_err(io_err)?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    const VCF: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chr1,length=1000>\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n\
chr1\t100\trs1\tA\tG\t50\tPASS\tDP=10\tGT\t0/1\t1/1\n\
chr1\t50\t.\tC\tT\t.\t.\t.\tGT\t0/0\t./.\n";

    fn write_vcf_text(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_read_vcf_header_and_records() {
        let f = write_vcf_text(VCF);
        let (header, records) = read_vcf(f.path()).unwrap();
        assert_eq!(header.len(), 3);
        assert_eq!(header.samples(), vec!["S1", "S2"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chrom, "chr1");
        assert_eq!(records[0].pos, 100);
        assert_eq!(records[0].line_number, 4);
        assert_eq!(records[1].pos, 50);
        assert_eq!(records[1].raw, "chr1\t50\t.\tC\tT\t.\t.\t.\tGT\t0/0\t./.");
    }

    #[test]
    fn test_read_then_write_is_lossless() {
        let f = write_vcf_text(VCF);
        let (header, records) = read_vcf(f.path()).unwrap();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.vcf");
        let n = write_vcf(&out, &header, &records).unwrap();
        assert_eq!(n, 2);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), VCF);
    }

    #[test]
    fn test_bad_pos_reports_line_number() {
        let f = write_vcf_text("#CHROM\tPOS\nchr1\t10\nchr1\tabc\n");
        match read_vcf(f.path()).unwrap_err() {
            SiteFilterError::MalformedInput { kind, line, reason, .. } => {
                assert_eq!(kind, FileKind::Vcf);
                assert_eq!(line, 3);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_reports_line_number() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"#CHROM\tPOS\nchr1\t10\nchr1\t11\t\xff\xfe\n").unwrap();
        f.flush().unwrap();
        match read_vcf(f.path()).unwrap_err() {
            SiteFilterError::MalformedInput { kind, line, .. } => {
                assert_eq!(kind, FileKind::Vcf);
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_record_error_carries_path() {
        let err = VcfRecord::parse("chr1\tx".to_string(), 12, Path::new("calls.vcf")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("VCF file 'calls.vcf' at line 12"));
        assert!(msg.contains("POS 'x'"));
    }

    #[test]
    fn test_single_field_line_is_malformed() {
        let f = write_vcf_text("#CHROM\tPOS\nchr1\n");
        assert!(matches!(
            read_vcf(f.path()),
            Err(SiteFilterError::MalformedInput { line: 2, .. })
        ));
    }

    #[test]
    fn test_header_after_records_is_malformed() {
        let f = write_vcf_text("#CHROM\tPOS\nchr1\t10\n##late=1\n");
        assert!(matches!(
            read_vcf(f.path()),
            Err(SiteFilterError::MalformedInput { line: 3, .. })
        ));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let f = write_vcf_text("#CHROM\tPOS\nchr1\t10\n\nchr1\t11\n\n");
        let (_, records) = read_vcf(f.path()).unwrap();
        assert_eq!(records.iter().map(|r| r.pos).collect::<Vec<_>>(), vec![10, 11]);
    }

    #[test]
    fn test_header_only_file() {
        let f = write_vcf_text("##fileformat=VCFv4.2\n#CHROM\tPOS\n");
        let (header, records) = read_vcf(f.path()).unwrap();
        assert_eq!(header.len(), 2);
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_vcf_is_not_found() {
        let err = read_vcf("/nonexistent/input.vcf").unwrap_err();
        assert!(matches!(err, SiteFilterError::NotFound { kind: FileKind::Vcf, .. }));
    }

    #[test]
    fn test_write_to_missing_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("no_such_dir").join("out.vcf");
        let err = write_vcf(&out, &VcfHeader::default(), std::iter::empty()).unwrap_err();
        assert!(matches!(err, SiteFilterError::Io { .. }));
    }

    #[test]
    fn test_write_truncates_existing_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.vcf");
        std::fs::write(&out, "stale content that is much longer than the header\n").unwrap();
        let header = VcfHeader { lines: vec!["#CHROM\tPOS".to_string()] };
        write_vcf(&out, &header, std::iter::empty()).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "#CHROM\tPOS\n");
    }
}
