// ==========================================
// Excel 迁移工具 - Excel 表格抽取实现
// ==========================================
// 支持: .xlsx / .xlsm / .xlsb / .xls / .ods（calamine 自动识别）
// 约定: 已用区域首行为表头，其余为数据行
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::grid::SheetGrid;
use crate::importer::error::{ExtractResult, ExtractionError};
use crate::importer::sheet_extractor_trait::{ExtractedSheet, SheetExtractor};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

// ==========================================
// ExcelSheetExtractor 实现
// ==========================================
pub struct ExcelSheetExtractor;

impl SheetExtractor for ExcelSheetExtractor {
    #[instrument(skip(self, sheet_names), fields(workbook = %workbook_path.display()))]
    fn extract(
        &self,
        workbook_path: &Path,
        sheet_names: &[&str],
    ) -> ExtractResult<Vec<ExtractedSheet>> {
        // 检查文件存在
        if !workbook_path.exists() {
            return Err(ExtractionError::WorkbookNotFound(
                workbook_path.display().to_string(),
            ));
        }

        // 打开工作簿
        let mut workbook = open_workbook_auto(workbook_path)?;
        let available = workbook.sheet_names();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for &sheet_name in sheet_names {
            if !available.iter().any(|s| s == sheet_name) {
                return Err(ExtractionError::SheetNotFound {
                    sheet: sheet_name.to_string(),
                    available: available.join(", "),
                });
            }

            let range = workbook
                .worksheet_range(sheet_name)
                .map_err(|e| ExtractionError::SheetReadError {
                    sheet: sheet_name.to_string(),
                    message: e.to_string(),
                })?;

            let grid = range_to_grid(&range);
            debug!(
                sheet = sheet_name,
                columns = grid.column_count(),
                rows = grid.row_count(),
                "工作表读取完成"
            );

            sheets.push(ExtractedSheet {
                sheet_name: sheet_name.to_string(),
                grid,
            });
        }

        info!(sheets = sheets.len(), "工作簿抽取完成");
        Ok(sheets)
    }
}

/// 区域 → 原始表格（首行为表头）
fn range_to_grid(range: &Range<Data>) -> SheetGrid {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_names(header_row),
        None => return SheetGrid::default(),
    };

    let data_rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    SheetGrid::from_rows(headers, data_rows)
}

/// 表头文本: 空表头命名为 `Unnamed: <列号>`，重名追加 `.1`、`.2` 后缀
fn header_names(header_row: &[Data]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(header_row.len());

    for (col_idx, cell) in header_row.iter().enumerate() {
        let base = match cell {
            Data::Empty => format!("Unnamed: {}", col_idx),
            other => other.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

/// calamine 单元格 → CellValue
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                CellValue::Float(dt.as_f64())
            } else {
                dt.as_datetime()
                    .map(CellValue::DateTime)
                    .unwrap_or(CellValue::Float(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        // #N/A、#DIV/0! 等错误单元格视为空白
        Data::Error(_) => CellValue::Null,
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
