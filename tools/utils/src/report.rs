//! 批处理结果的文本报告.

use am_berry::dataset::{BatchReport, ReconstructReport};
use am_berry::UnitFailure;
use std::io::{self, Write};

const S4: &str = "    ";

fn describe_failures_into<W: Write>(failed: &[UnitFailure], w: &mut W) -> io::Result<()> {
    writeln!(w, "{S4}Failed: {}", failed.len())?;
    for f in failed {
        writeln!(w, "{S4}{S4}{f}")?;
    }
    Ok(())
}

/// 将批量融合 `report` 的结果写进 `w` 中.
pub fn describe_batch_into<W: Write>(report: &BatchReport, w: &mut W) -> io::Result<()> {
    writeln!(
        w,
        "Fused {} of {} pairs.",
        report.succeeded_count(),
        report.total()
    )?;
    writeln!(w, "{S4}Succeeded: {}", report.succeeded_count())?;
    for base in report.succeeded.iter() {
        writeln!(w, "{S4}{S4}{base}")?;
    }
    describe_failures_into(&report.failed, w)
}

/// 将数据集重建 `report` 的结果写进 `w` 中.
pub fn describe_reconstruct_into<W: Write>(report: &ReconstructReport, w: &mut W) -> io::Result<()> {
    let subjects: Vec<&str> = report.subjects.iter().map(String::as_str).collect();
    writeln!(w, "Conversion done for subjects [{}]", subjects.join(", "))?;
    writeln!(w, "{S4}Converted cases: {}", report.converted.len())?;
    describe_failures_into(&report.failed, w)
}

#[cfg(test)]
mod tests {
    use super::{describe_batch_into, describe_reconstruct_into};
    use am_berry::dataset::{BatchReport, CaseOutcome, ReconstructReport};
    use am_berry::{Error, UnitFailure};
    use std::path::PathBuf;

    #[test]
    fn test_describe_batch() {
        let report = BatchReport {
            succeeded: vec!["A".into()],
            failed: vec![UnitFailure {
                unit: "B".into(),
                error: Error::MissingFile(PathBuf::from("B_seg-myelin.png")),
            }],
        };
        let mut buf = Vec::new();
        describe_batch_into(&report, &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();

        assert!(s.starts_with("Fused 1 of 2 pairs.\n"));
        assert!(s.contains("        A\n"));
        assert!(s.contains("Failed: 1\n"));
        assert!(s.contains("B: [missing file]"));
    }

    #[test]
    fn test_describe_reconstruct() {
        let mut report = ReconstructReport::default();
        report.subjects.insert("S09".into());
        report.subjects.insert("S01".into());
        report.converted.push(CaseOutcome {
            case_id: "007".into(),
            subject_id: "S09".into(),
            image: PathBuf::new(),
            label: PathBuf::new(),
        });
        let mut buf = Vec::new();
        describe_reconstruct_into(&report, &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();

        assert!(s.starts_with("Conversion done for subjects [S01, S09]\n"));
        assert!(s.contains("Converted cases: 1\n"));
        assert!(s.contains("Failed: 0\n"));
    }
}
