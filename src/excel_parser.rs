use crate::error::{Result, RosterError};
use crate::models::RawRow;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

/// 葡语月份名, 用于按月份匹配工作表
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// 是否按工作簿读取
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// 从工作簿中读取当月工作表的所有行
pub fn read_workbook_rows(file_path: &Path, month: u32) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(file_path)
        .map_err(|e| RosterError::Workbook(format!("无法打开文件 {:?}: {}", file_path, e)))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = pick_sheet(&sheet_names, month)
        .ok_or_else(|| RosterError::Workbook("工作簿没有工作表".to_string()))?;
    debug!(sheet = %sheet_name, "读取工作表");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| RosterError::Workbook(format!("无法读取工作表 {}: {}", sheet_name, e)))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_text).collect())
        .collect())
}

/// 优先选择名称包含当月月份名的工作表, 否则取第一个
fn pick_sheet(sheet_names: &[String], month: u32) -> Option<String> {
    let month_name = month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .map(|m| m.to_lowercase());

    month_name
        .and_then(|m| {
            sheet_names
                .iter()
                .find(|name| name.to_lowercase().contains(&m))
        })
        .or_else(|| sheet_names.first())
        .cloned()
}

/// 单元格转文本, 与导出工具的数字转文本规则一致 (整数带 ".0")
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => float_to_text(*f),
        Data::Int(i) => format!("{}.0", i),
        Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Data::DateTime(dt) => float_to_text(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

fn float_to_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}
