pub mod calendar;
pub mod decoder;
pub mod error;
pub mod excel_parser;
pub mod header_locator;
pub mod models;
pub mod pivot;
pub mod row_classifier;
pub mod shift_summary;
pub mod table_parser;

use anyhow::{Context, Result};
use calendar::MonthCalendar;
use error::RosterError;
use header_locator::locate_header;
use models::{AppConfig, PivotOutcome, RawRow, Roster};
use row_classifier::{extract_roster, RowClassifier};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "config.json";

/// 找不到日期表头时输出的提示
pub const NO_HEADER_MESSAGE: &str = "Could not find date header row.";

/// 获取配置文件路径
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster-pivot")
        .join(CONFIG_FILE)
}

/// 加载配置, 文件不存在或无法解析时使用默认值
pub fn load_config() -> AppConfig {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> AppConfig {
    if config_path.exists() {
        if let Ok(content) = fs::read_to_string(config_path) {
            if let Ok(config) = serde_json::from_str::<AppConfig>(&content) {
                return config;
            }
        }
    }
    AppConfig::default()
}

/// 初始化日志, 输出到 stderr, 保持 stdout 只有报表
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 对已解析的行执行: 定位表头 -> 识别员工行 -> 生成透视表
pub fn process_rows(rows: &[RawRow], config: &AppConfig) -> error::Result<PivotOutcome> {
    let calendar = MonthCalendar::from_config(config)?;

    let Some(header) = locate_header(rows) else {
        info!(rows = rows.len(), "未找到日期表头行");
        return Ok(PivotOutcome::NoHeader);
    };

    let classifier = RowClassifier::from_config(config);
    let roster = extract_roster(rows, &header.days, &classifier, Roster::new());
    if roster.is_empty() {
        warn!(header_row = header.row_index, "找到日期表头, 但没有识别出员工行");
    }
    info!(
        header_row = header.row_index,
        days = header.days.len(),
        staff = roster.len(),
        "排班抽取完成"
    );

    let mut report = pivot::render_pivot(&roster, &calendar);
    if config.include_summary {
        report.push('\n');
        report.push_str(&shift_summary::render_summary(&roster, &calendar));
    }

    Ok(PivotOutcome::Report(report))
}

/// 对已解码的文本执行完整流程
pub fn process_text(text: &str, config: &AppConfig) -> error::Result<PivotOutcome> {
    let rows = table_parser::parse_rows(text)?;
    debug!(rows = rows.len(), "CSV 解析完成");
    process_rows(&rows, config)
}

/// 对原始字节执行完整流程
pub fn process_bytes(bytes: &[u8], config: &AppConfig) -> error::Result<PivotOutcome> {
    let decoded = decoder::decode_bytes(bytes, &config.encodings).ok_or_else(|| {
        RosterError::DecodeExhausted {
            path: PathBuf::from(&config.input_path),
            tried: config.encodings.iter().map(|e| e.label.clone()).collect(),
        }
    })?;
    process_text(&decoded.text, config)
}

/// 读取输入文件 (CSV 文本或工作簿) 并执行完整流程
pub fn process_file(config: &AppConfig) -> error::Result<PivotOutcome> {
    let input_path = Path::new(&config.input_path);

    if excel_parser::is_workbook(input_path) {
        let rows = excel_parser::read_workbook_rows(input_path, config.month)?;
        debug!(rows = rows.len(), "工作簿解析完成");
        return process_rows(&rows, config);
    }

    let decoded = decoder::decode_file(input_path, &config.encodings)?;
    debug!(encoding = decoded.encoding, "输入文件已解码");
    process_text(&decoded.text, config)
}

/// 按给定配置运行, 把报表写到 out
pub fn run_with_config<W: Write>(config: &AppConfig, out: &mut W) -> Result<()> {
    config.validate().context("配置校验失败")?;

    let outcome = process_file(config)
        .with_context(|| format!("处理排班文件失败: {}", config.input_path))?;

    match outcome {
        PivotOutcome::Report(report) => writeln!(out, "{}", report)?,
        PivotOutcome::NoHeader => writeln!(out, "{}", NO_HEADER_MESSAGE)?,
    }
    out.flush()?;

    Ok(())
}

/// 程序入口: 加载配置, 初始化日志, 输出到 stdout
pub fn run() -> Result<()> {
    let config = load_config();
    init_logging(&config);
    debug!(config_path = %get_config_path().display(), input = %config.input_path, "启动");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_config(&config, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_uses_defaults() {
        let config = load_config_from(Path::new("no/such/dir/config.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn unparsable_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
    }

    #[test]
    fn partial_config_is_merged_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"input_path": "escala.csv", "include_summary": true}"#).unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.input_path, "escala.csv");
        assert!(config.include_summary);
        assert_eq!(config.year, 2026);
    }

    #[test]
    fn rows_without_header_report_no_header() {
        let rows = vec![vec!["a".to_string(), "1.0".to_string()]];
        let outcome = process_rows(&rows, &AppConfig::default()).unwrap();
        assert_eq!(outcome, PivotOutcome::NoHeader);
    }

    #[test]
    fn header_without_staff_rows_renders_empty_table() {
        let rows = vec![vec!["".to_string(), "1.0".to_string(), "2.0".to_string()]];
        let PivotOutcome::Report(report) = process_rows(&rows, &AppConfig::default()).unwrap() else {
            panic!("expected a report");
        };
        assert!(report.starts_with("| Day |  |\n"));
    }

    #[test]
    fn undecodable_bytes_are_an_error() {
        let err = process_bytes(b"   ", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, RosterError::DecodeExhausted { .. }));
    }
}
