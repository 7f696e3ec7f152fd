use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 解析后的一行原始单元格
pub type RawRow = Vec<String>;

/// 日期 (1-31) -> 列索引
pub type DayIndexMap = BTreeMap<u32, usize>;

/// 一个月的天数上限
pub const DAYS_IN_MONTH: u32 = 31;

/// 员工排班记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRecord {
    /// 去掉 `*` 标记后的姓名
    pub name: String,
    /// 日期 -> 班次代码, 1..=31 全部存在, 缺省为空字符串
    pub shifts: BTreeMap<u32, String>,
}

impl StaffRecord {
    pub fn shift(&self, day: u32) -> &str {
        self.shifts.get(&day).map(String::as_str).unwrap_or("")
    }
}

/// 抽取阶段的累加器: 首次出现顺序 + 按姓名索引的记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    order: Vec<String>,
    records: HashMap<String, StaffRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入记录; 同名时后者覆盖前者, 顺序保持首次出现位置。
    /// 返回是否发生了覆盖。
    pub fn upsert(&mut self, record: StaffRecord) -> bool {
        let overwritten = self.records.contains_key(&record.name);
        if !overwritten {
            self.order.push(record.name.clone());
        }
        self.records.insert(record.name.clone(), record);
        overwritten
    }

    /// 按首次出现顺序排列的姓名
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, name: &str) -> Option<&StaffRecord> {
        self.records.get(name)
    }

    /// 按显示顺序遍历记录
    pub fn iter(&self) -> impl Iterator<Item = &StaffRecord> {
        self.order.iter().filter_map(|name| self.records.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// 解码失败时的容错方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorTolerance {
    /// 丢弃非法字节
    Lossy,
    /// 出现非法字节即视为失败
    Strict,
}

/// 解码策略: 编码标签 + 容错方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingStrategy {
    pub label: String,
    pub tolerance: ErrorTolerance,
}

impl EncodingStrategy {
    pub fn lossy(label: &str) -> Self {
        Self {
            label: label.to_string(),
            tolerance: ErrorTolerance::Lossy,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 输入文件路径
    pub input_path: String,
    /// 排班所属年份
    pub year: i32,
    /// 排班所属月份 (1-12)
    pub month: u32,
    /// 星期缩写, 周一开始
    pub weekday_labels: Vec<String>,
    /// 依次尝试的解码策略
    pub encodings: Vec<EncodingStrategy>,
    /// 员工行的最少单元格数
    pub min_row_width: usize,
    /// 员工编号的最短长度
    pub min_id_len: usize,
    /// 是否附加班次汇总表
    pub include_summary: bool,
    /// 日志级别
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: "output.csv".to_string(),
            year: 2026,
            month: 1,
            weekday_labels: ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            encodings: vec![
                EncodingStrategy::lossy("utf-16"),
                EncodingStrategy::lossy("utf-8"),
            ],
            min_row_width: 30,
            min_id_len: 4,
            include_summary: false,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if chrono::NaiveDate::from_ymd_opt(self.year, self.month, 1).is_none() {
            return Err(RosterError::Config(format!(
                "无效的年月: {}-{}",
                self.year, self.month
            )));
        }
        if self.weekday_labels.len() != 7 {
            return Err(RosterError::Config(format!(
                "星期缩写必须是 7 个, 实际 {} 个",
                self.weekday_labels.len()
            )));
        }
        if self.encodings.is_empty() {
            return Err(RosterError::Config("至少需要一个解码策略".to_string()));
        }
        if let Some(bad) = self
            .encodings
            .iter()
            .find(|e| encoding_rs::Encoding::for_label(e.label.trim().as_bytes()).is_none())
        {
            return Err(RosterError::Config(format!("未知编码: {}", bad.label)));
        }
        Ok(())
    }
}

/// 一次处理的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PivotOutcome {
    /// 渲染完成的报表
    Report(String),
    /// 找不到日期表头行
    NoHeader,
}
