use crate::calendar::MonthCalendar;
use crate::models::{Roster, DAYS_IN_MONTH};

/// 生成按日期为行, 员工为列的 Markdown 表格
pub fn render_pivot(roster: &Roster, calendar: &MonthCalendar) -> String {
    let names = roster.names();
    let mut md = String::new();

    // 表头
    md.push_str(&format!("| Day | {} |\n", names.join(" | ")));
    md.push_str(&format!("|---|{}|\n", vec!["---"; names.len()].join("|")));

    for day in 1..=DAYS_IN_MONTH {
        md.push_str(&format!("| {} ({}) |", day, calendar.weekday_label(day)));
        for name in names {
            let shift = roster.get(name).map(|r| r.shift(day)).unwrap_or("");
            md.push_str(&format!(" {} |", shift));
        }
        md.push('\n');
    }

    md
}
