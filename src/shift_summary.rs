use crate::calendar::MonthCalendar;
use crate::models::{Roster, StaffRecord};
use regex::Regex;
use std::sync::OnceLock;

/// 休息/假期代码
const OFF_CODES: [&str; 7] = ["", "-", "F", "Fr", "Lf", "Hol", "Aniv"];

/// 班次类别, 按开始时间划分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Morning,
    Interim,
    Afternoon,
    Off,
    Other,
}

/// 员工当月汇总
#[derive(Debug, Clone, PartialEq)]
pub struct StaffSummary {
    pub name: String,
    pub shifts: usize,
    pub hours: f64,
    pub weekends: usize,
    pub morning: usize,
    pub interim: usize,
    pub afternoon: usize,
}

fn leading_number() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?").ok()).as_ref()
}

fn is_off(code: &str) -> bool {
    OFF_CODES.contains(&code.trim())
}

/// 解析 "9,5" / "14h" 这样的时间
fn parse_hour(part: &str) -> Option<f64> {
    let cleaned: String = part
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    leading_number()?.find(&cleaned)?.as_str().parse().ok()
}

/// 按开始时间对班次分类
pub fn classify_shift(code: &str) -> ShiftKind {
    if is_off(code) {
        return ShiftKind::Off;
    }

    let start = code.trim().split('-').next().and_then(parse_hour);
    match start {
        None => ShiftKind::Other,
        Some(h) if h < 10.0 => ShiftKind::Morning,
        Some(h) if h < 13.0 => ShiftKind::Interim,
        Some(_) => ShiftKind::Afternoon,
    }
}

/// "8-16" 形式班次的时长 (小时), 其它形式为 0
pub fn shift_hours(code: &str) -> f64 {
    if is_off(code) || !code.contains('-') {
        return 0.0;
    }

    let code = code.trim().replace('h', "");
    let parts: Vec<&str> = code.split('-').collect();
    if parts.len() != 2 {
        return 0.0;
    }

    match (parse_hour(parts[0]), parse_hour(parts[1])) {
        (Some(start), Some(end)) => end - start,
        _ => 0.0,
    }
}

/// 计算单个员工的汇总
pub fn summarize_staff(record: &StaffRecord, calendar: &MonthCalendar) -> StaffSummary {
    let mut summary = StaffSummary {
        name: record.name.clone(),
        shifts: 0,
        hours: 0.0,
        weekends: 0,
        morning: 0,
        interim: 0,
        afternoon: 0,
    };

    for (&day, code) in &record.shifts {
        match classify_shift(code) {
            ShiftKind::Morning => summary.morning += 1,
            ShiftKind::Interim => summary.interim += 1,
            ShiftKind::Afternoon => summary.afternoon += 1,
            ShiftKind::Off | ShiftKind::Other => {}
        }

        let hours = shift_hours(code);
        if hours > 0.0 {
            summary.shifts += 1;
            summary.hours += hours;
            if calendar.is_weekend(day) {
                summary.weekends += 1;
            }
        }
    }

    summary
}

/// 生成汇总 Markdown 表格, 行顺序与透视表列顺序一致
pub fn render_summary(roster: &Roster, calendar: &MonthCalendar) -> String {
    let mut md = String::from("| Name | Shifts | Hours | Weekends | Morning | Interim | Afternoon |\n");
    md.push_str("|---|---|---|---|---|---|---|\n");

    for record in roster.iter() {
        let s = summarize_staff(record, calendar);
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            s.name, s.shifts, s.hours, s.weekends, s.morning, s.interim, s.afternoon
        ));
    }

    md
}
