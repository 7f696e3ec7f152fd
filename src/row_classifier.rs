use crate::models::{AppConfig, DayIndexMap, RawRow, Roster, StaffRecord, DAYS_IN_MONTH};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 判断一行是否为员工主记录的规则
pub trait RowRule {
    fn name(&self) -> &'static str;
    fn accepts(&self, row: &[String]) -> bool;
}

/// 列数下限: 过短的行不是真正的数据行
#[derive(Debug, Clone, Copy)]
pub struct MinWidth(pub usize);

impl RowRule for MinWidth {
    fn name(&self) -> &'static str {
        "min_width"
    }

    fn accepts(&self, row: &[String]) -> bool {
        row.len() >= self.0
    }
}

/// 第 0 列必须是员工编号 (如 "91019.0"); 汇总行此列为空
#[derive(Debug, Clone, Copy)]
pub struct IdentifierCell {
    pub min_len: usize,
}

impl RowRule for IdentifierCell {
    fn name(&self) -> &'static str {
        "identifier_cell"
    }

    fn accepts(&self, row: &[String]) -> bool {
        let Some(id) = row.first().map(|c| c.trim()) else {
            return false;
        };
        let digits = id.strip_suffix(".0").unwrap_or(id);
        !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
            && id.chars().count() >= self.min_len
    }
}

/// 按顺序执行的规则链
pub struct RowClassifier {
    rules: Vec<Box<dyn RowRule>>,
}

impl RowClassifier {
    pub fn new(rules: Vec<Box<dyn RowRule>>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(vec![
            Box::new(MinWidth(config.min_row_width)),
            Box::new(IdentifierCell {
                min_len: config.min_id_len,
            }),
        ])
    }

    /// 返回第一条不通过的规则名, 全部通过时为 None
    pub fn rejected_by(&self, row: &[String]) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| !rule.accepts(row))
            .map(|rule| rule.name())
    }
}

impl Default for RowClassifier {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// 去掉 `*` 标记和首尾空白
pub fn clean_name(raw: &str) -> String {
    raw.replace('*', "").trim().to_string()
}

/// 按日期 -> 列映射取出 1..=31 的班次, 缺失或越界时为空字符串
pub fn extract_shifts(row: &[String], days: &DayIndexMap) -> BTreeMap<u32, String> {
    (1..=DAYS_IN_MONTH)
        .map(|day| {
            let shift = days
                .get(&day)
                .and_then(|&col| row.get(col))
                .cloned()
                .unwrap_or_default();
            (day, shift)
        })
        .collect()
}

/// 扫描所有行, 把员工主记录累加到 roster 中并返回
pub fn extract_roster(
    rows: &[RawRow],
    days: &DayIndexMap,
    classifier: &RowClassifier,
    mut roster: Roster,
) -> Roster {
    for (row_index, row) in rows.iter().enumerate() {
        if let Some(rule) = classifier.rejected_by(row) {
            if rule != "min_width" {
                debug!(row_index, rule, "跳过非员工行");
            }
            continue;
        }

        let name = clean_name(row.get(1).map(String::as_str).unwrap_or_default());
        let record = StaffRecord {
            name: name.clone(),
            shifts: extract_shifts(row, days),
        };

        if roster.upsert(record) {
            warn!(row_index, name = %name, "员工姓名重复, 后出现的记录覆盖前者");
        } else {
            debug!(row_index, name = %name, "员工行");
        }
    }

    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_row(id: &str, name: &str, width: usize) -> Vec<String> {
        let mut row = vec![String::new(); width];
        row[0] = id.to_string();
        if width > 1 {
            row[1] = name.to_string();
        }
        row
    }

    fn day_map(pairs: &[(u32, usize)]) -> DayIndexMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn width_boundary_is_thirty() {
        let classifier = RowClassifier::default();
        assert_eq!(classifier.rejected_by(&wide_row("91019.0", "Ana", 30)), None);
        assert_eq!(
            classifier.rejected_by(&wide_row("91019.0", "Ana", 29)),
            Some("min_width")
        );
    }

    #[test]
    fn identifier_must_be_numeric_and_long_enough() {
        let rule = IdentifierCell { min_len: 4 };
        let check = |id: &str| rule.accepts(&[id.to_string()]);
        assert!(check("91019.0"));
        assert!(check(" 91019 "));
        assert!(check("1234"));
        assert!(check("12.0"));
        assert!(!check("123"));
        assert!(!check(""));
        assert!(!check(".0"));
        assert!(!check("Nome"));
        assert!(!check("9101a.0"));
        assert!(!check("91.5"));
    }

    #[test]
    fn non_identifier_first_cell_is_rejected() {
        let classifier = RowClassifier::default();
        assert_eq!(
            classifier.rejected_by(&wide_row("", "Ana", 40)),
            Some("identifier_cell")
        );
        assert_eq!(
            classifier.rejected_by(&wide_row("Total", "Ana", 30)),
            Some("identifier_cell")
        );
    }

    #[test]
    fn name_decoration_is_stripped() {
        assert_eq!(clean_name("Maria Silva*"), "Maria Silva");
        assert_eq!(clean_name(" *Rui* "), "Rui");
    }

    #[test]
    fn shifts_cover_every_day() {
        let row = vec!["M".to_string(), "T".to_string()];
        let shifts = extract_shifts(&row, &day_map(&[(1, 0), (2, 1), (3, 7)]));
        assert_eq!(shifts.len(), 31);
        assert_eq!(shifts[&1], "M");
        assert_eq!(shifts[&2], "T");
        assert_eq!(shifts[&3], "");
        assert_eq!(shifts[&31], "");
    }

    #[test]
    fn accepted_rows_build_the_roster() {
        let mut ana = wide_row("91019.0", "Maria Silva*", 30);
        ana[5] = "M".to_string();
        let mut summary = wide_row("", "Maria Silva", 30);
        summary[5] = "21".to_string();
        let rows = vec![ana, summary, wide_row("1234", "Rui", 10)];

        let roster = extract_roster(
            &rows,
            &day_map(&[(1, 5)]),
            &RowClassifier::default(),
            Roster::new(),
        );
        assert_eq!(roster.names(), ["Maria Silva".to_string()]);
        assert_eq!(roster.get("Maria Silva").unwrap().shift(1), "M");
    }

    #[test]
    fn duplicate_names_keep_the_later_row() {
        let mut first = wide_row("1001.0", "Ana*", 30);
        first[5] = "M".to_string();
        let mut other = wide_row("1002.0", "Rui", 30);
        other[5] = "T".to_string();
        let mut second = wide_row("1003.0", "Ana", 30);
        second[5] = "F".to_string();

        let roster = extract_roster(
            &[first, other, second],
            &day_map(&[(1, 5)]),
            &RowClassifier::default(),
            Roster::new(),
        );
        assert_eq!(roster.names(), ["Ana".to_string(), "Rui".to_string()]);
        assert_eq!(roster.get("Ana").unwrap().shift(1), "F");
    }

    #[test]
    fn custom_rule_chain() {
        struct NamePresent;
        impl RowRule for NamePresent {
            fn name(&self) -> &'static str {
                "name_present"
            }
            fn accepts(&self, row: &[String]) -> bool {
                row.get(1).is_some_and(|n| !n.trim().is_empty())
            }
        }

        let classifier = RowClassifier::new(vec![Box::new(MinWidth(2)), Box::new(NamePresent)]);
        assert_eq!(
            classifier.rejected_by(&["x".to_string(), "Ana".to_string()]),
            None
        );
        assert_eq!(
            classifier.rejected_by(&["x".to_string(), " ".to_string()]),
            Some("name_present")
        );
    }
}
