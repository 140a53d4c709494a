use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::layout::{self, ReportMeta};
use crate::models::RiskFactorReport;
use crate::pdf;

pub const REPORT_FILE_NAME: &str = "risk_intervention_report.pdf";

pub fn export_to_document(
    report: &RiskFactorReport,
    meta: &ReportMeta,
) -> Result<Vec<u8>, ExportError> {
    let layout = layout::layout_report(report, meta);
    pdf::render_pdf(&layout, layout::TITLE)
}

/// Writes the PDF into `dir` under the fixed report file name.
pub fn save_report(
    report: &RiskFactorReport,
    meta: &ReportMeta,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = export_to_document(report, meta)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE_NAME);
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "report saved");
    Ok(path)
}

pub fn render_markdown(report: &RiskFactorReport, meta: &ReportMeta) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", layout::TITLE);
    let _ = writeln!(output, "Generated on: {}", meta.generated_label());
    let _ = writeln!(
        output,
        "Total High-Risk Profiles Analyzed: {}",
        report.total_high_risk
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Distress Factors");

    if report.factors.is_empty() {
        let _ = writeln!(output, "No high-risk profiles in this dataset.");
    } else {
        let [factor, impact, affected] = layout::TABLE_HEADERS;
        let _ = writeln!(output, "| {factor} | {impact} | {affected} |");
        let _ = writeln!(output, "|---|---:|---:|");
        for entry in &report.factors {
            let _ = writeln!(
                output,
                "| {} | {:.1}% | {} |",
                entry.name.replace('|', "\\|"),
                entry.percent,
                entry.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "_{}_", layout::FOOTER);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FactorEntry;
    use chrono::NaiveDate;

    fn meta() -> ReportMeta {
        ReportMeta {
            generated_on: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        }
    }

    fn sample() -> RiskFactorReport {
        RiskFactorReport {
            total_high_risk: 2,
            factors: vec![
                FactorEntry {
                    name: "JobLoss".to_string(),
                    count: 1,
                    percent: 50.0,
                },
                FactorEntry {
                    name: "Medical".to_string(),
                    count: 1,
                    percent: 50.0,
                },
            ],
        }
    }

    #[test]
    fn markdown_lists_factors_in_order() {
        let text = render_markdown(&sample(), &meta());
        assert!(text.contains("Total High-Risk Profiles Analyzed: 2"));
        let job = text.find("| JobLoss | 50.0% | 1 |").unwrap();
        let medical = text.find("| Medical | 50.0% | 1 |").unwrap();
        assert!(job < medical);
    }

    #[test]
    fn markdown_escapes_pipes_in_factor_names() {
        let report = RiskFactorReport {
            total_high_risk: 1,
            factors: vec![FactorEntry {
                name: "Rent | Utilities".to_string(),
                count: 1,
                percent: 100.0,
            }],
        };
        let text = render_markdown(&report, &meta());
        assert!(text.contains("| Rent \\| Utilities | 100.0% | 1 |"));
    }

    #[test]
    fn markdown_handles_empty_report() {
        let report = RiskFactorReport {
            total_high_risk: 0,
            factors: Vec::new(),
        };
        let text = render_markdown(&report, &meta());
        assert!(text.contains("No high-risk profiles in this dataset."));
    }

    #[test]
    fn saves_under_fixed_file_name() {
        let dir = std::env::temp_dir().join(format!("sentinel-report-{}", uuid::Uuid::new_v4()));
        let path = save_report(&sample(), &meta(), &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
