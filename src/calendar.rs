use crate::error::{Result, RosterError};
use crate::models::AppConfig;
use chrono::{Datelike, NaiveDate, Weekday};

/// 月历: 根据当月 1 日的星期推算每天的星期缩写
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    /// 1 日相对周一的偏移 (0 = 周一)
    first_offset: u32,
    labels: [String; 7],
}

impl MonthCalendar {
    pub fn new(year: i32, month: u32, labels: &[String]) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| RosterError::Config(format!("无效的年月: {}-{}", year, month)))?;

        let labels: [String; 7] = labels.to_vec().try_into().map_err(|v: Vec<String>| {
            RosterError::Config(format!("星期缩写必须是 7 个, 实际 {} 个", v.len()))
        })?;

        Ok(Self {
            first_offset: first.weekday().num_days_from_monday(),
            labels,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.year, config.month, &config.weekday_labels)
    }

    /// 某日的星期缩写, 以 7 天为周期
    pub fn weekday_label(&self, day: u32) -> &str {
        let idx = (self.first_offset + day.saturating_sub(1)) % 7;
        &self.labels[idx as usize]
    }

    /// 是否为周六或周日; 超出当月范围按周期推算
    pub fn is_weekend(&self, day: u32) -> bool {
        let idx = (self.first_offset + day.saturating_sub(1)) % 7;
        idx >= Weekday::Sat.num_days_from_monday()
    }
}
