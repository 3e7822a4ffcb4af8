// ==========================================
// Excel 迁移工具 - 结果文本渲染
// ==========================================
// 供命令行人读输出；JSON 输出直接序列化 PipelineReport
// ==========================================

use crate::domain::report::{PipelineReport, SheetStats};
use std::fmt;

fn stats_text(stats: &SheetStats) -> String {
    format!(
        "rows_clean={} rows_raw={} blank_rows_dropped={} coerced_to_null={}",
        stats.rows_clean, stats.rows_raw, stats.blank_rows_dropped, stats.coerced_to_null
    )
}

/// 人读摘要视图
pub struct ReportText<'a>(pub &'a PipelineReport);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "Mode: {}", report.mode)?;
        writeln!(f, "Excel: {}", report.excel_path)?;
        writeln!(f, "Database: {}", report.database_url)?;
        writeln!(f)?;
        writeln!(f, "Configured schema:")?;
        writeln!(f, "{}", report.schema)?;
        writeln!(f, "Transform stats:")?;
        for (sheet, stats) in &report.transform_stats {
            writeln!(f, "  - {}: {}", sheet, stats_text(stats))?;
        }

        if report.is_dry_run() {
            return writeln!(f, "\nDry-run complete (no changes written to the database).");
        }

        writeln!(f, "\nLoad stats:")?;
        for (table, count) in &report.load_stats {
            writeln!(f, "  - {}: inserted {} rows", table, count)?;
        }

        writeln!(f, "\nRow count validation:")?;
        for (table, check) in &report.row_counts {
            let status = if check.matched { "OK" } else { "MISMATCH" };
            writeln!(
                f,
                "  - {}: expected={} actual={} [{}]",
                table, check.expected, check.actual, status
            )?;
        }

        if let Some(summary) = &report.validation_summary {
            writeln!(
                f,
                "\nValidation summary: {} / {} tables match.",
                summary.matching_tables, summary.total_tables
            )?;
            if summary.all_match {
                writeln!(f, "All table row counts match expected values.")?;
            } else {
                writeln!(f, "Some tables do not match expected row counts.")?;
            }
        }

        Ok(())
    }
}

/// 渲染人读摘要
pub fn render_text(report: &PipelineReport) -> String {
    ReportText(report).to_string()
}
