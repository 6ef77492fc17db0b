use anyhow::{Context, Result};
use sift_core::Hit;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const HEADER: &str = "File Name, Size(words), Score";

/// CSV report: one `name,size,score` row per hit, score to 4 decimals.
pub fn write_report<W: Write>(mut out: W, hits: &[Hit]) -> Result<()> {
    writeln!(out, "{HEADER}")?;
    for hit in hits {
        writeln!(out, "{},{},{:.4}", hit.name, hit.size, hit.score)?;
    }
    out.flush()?;
    Ok(())
}

/// Truncates `path` before writing.
pub fn write_report_file(path: &Path, hits: &[Hit]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating report {}", path.display()))?;
    write_report(BufWriter::new(file), hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(doc_id: u32, name: &str, size: u32, score: f64) -> Hit {
        Hit { doc_id, name: name.into(), size, score }
    }

    #[test]
    fn formats_rows_with_four_decimals() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[hit(2, "b.txt", 6, 1.23456), hit(1, "a.txt", 3, -0.5)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "File Name, Size(words), Score\nb.txt,6,1.2346\na.txt,3,-0.5000\n");
    }

    #[test]
    fn empty_result_still_has_header() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "File Name, Size(words), Score\n");
    }

    #[test]
    fn file_is_truncated_between_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");
        write_report_file(&path, &[hit(1, "a", 1, 1.0), hit(2, "b", 1, 0.5)]).unwrap();
        write_report_file(&path, &[hit(3, "c", 2, 0.25)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "File Name, Size(words), Score\nc,2,0.2500\n");
    }
}
