use crate::models::{DayIndexMap, RawRow, DAYS_IN_MONTH};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// 表头行至少需要的日期标记数
const MIN_DAY_MARKERS: usize = 2;

/// 找到的日期表头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeader {
    /// 表头所在行号
    pub row_index: usize,
    pub days: DayIndexMap,
}

fn decimal_marker() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // 导出工具把数字转成 "1.0" 这样的文本
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+\.0$").ok()).as_ref()
}

/// 单元格是否为日期标记 ("1.0" .. "31.0"), 是则返回日期
pub fn day_marker(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if !decimal_marker()?.is_match(cell) {
        return None;
    }
    let day = cell.parse::<f64>().ok()?.trunc();
    if (1.0..=DAYS_IN_MONTH as f64).contains(&day) {
        Some(day as u32)
    } else {
        None
    }
}

/// 扫描各行, 返回第一个包含至少两个日期标记的行及其日期 -> 列映射
pub fn locate_header(rows: &[RawRow]) -> Option<DayHeader> {
    for (row_index, row) in rows.iter().enumerate() {
        let markers: Vec<(usize, u32)> = row
            .iter()
            .enumerate()
            .filter_map(|(col, cell)| day_marker(cell).map(|day| (col, day)))
            .collect();

        if markers.len() < MIN_DAY_MARKERS {
            continue;
        }

        // 同一日期出现多次时, 右侧的列覆盖左侧
        let days: DayIndexMap = markers.into_iter().map(|(col, day)| (day, col)).collect();
        debug!(row_index, days = days.len(), "找到日期表头行");
        return Some(DayHeader { row_index, days });
    }

    None
}
