use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("无法读取文件 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("文件 {path:?} 无法解码, 已尝试: {}", .tried.join(", "))]
    DecodeExhausted { path: PathBuf, tried: Vec<String> },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("工作簿读取失败: {0}")]
    Workbook(String),
    #[error("配置无效: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RosterError>;
