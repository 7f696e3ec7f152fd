use crate::error::{Result, RosterError};
use crate::models::{EncodingStrategy, ErrorTolerance};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// 解码结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// 实际使用的编码名称
    pub encoding: &'static str,
}

/// 读取整个输入文件; 文件句柄在函数返回时释放
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let io_err = |source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;
    Ok(bytes)
}

/// 读取并解码文件, 按顺序尝试各解码策略
pub fn decode_file(path: &Path, strategies: &[EncodingStrategy]) -> Result<Decoded> {
    let bytes = read_input(path)?;
    decode_bytes(&bytes, strategies).ok_or_else(|| RosterError::DecodeExhausted {
        path: path.to_path_buf(),
        tried: strategies.iter().map(|s| s.label.clone()).collect(),
    })
}

/// 依次尝试解码策略, 返回第一个得到非空文本的结果
pub fn decode_bytes(bytes: &[u8], strategies: &[EncodingStrategy]) -> Option<Decoded> {
    for (idx, strategy) in strategies.iter().enumerate() {
        match attempt(bytes, strategy) {
            Some(decoded) => {
                debug!(encoding = decoded.encoding, bytes = decoded.text.len(), "输入解码成功");
                return Some(decoded);
            }
            None if idx + 1 < strategies.len() => {
                warn!(label = %strategy.label, "解码失败, 尝试下一个编码");
            }
            None => {
                warn!(label = %strategy.label, "所有编码均解码失败");
            }
        }
    }
    None
}

/// 按单个策略解码; 失败或结果为空时返回 None
fn attempt(bytes: &[u8], strategy: &EncodingStrategy) -> Option<Decoded> {
    let encoding = Encoding::for_label(strategy.label.trim().as_bytes())?;

    let (encoding, text, had_errors) = if encoding == UTF_16LE || encoding == UTF_16BE {
        // 有 BOM 时由 BOM 决定字节序, 否则按 NUL 字节的位置推断
        let (utf16, body) = match Encoding::for_bom(bytes) {
            Some((bom, len)) if bom == UTF_16LE || bom == UTF_16BE => (bom, &bytes[len..]),
            Some(_) => return None,
            None => (sniff_utf16(bytes)?, bytes),
        };
        let (text, had_errors) = utf16.decode_without_bom_handling(body);
        (utf16, text, had_errors)
    } else {
        let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
        (encoding, text, had_errors)
    };

    let text = match strategy.tolerance {
        ErrorTolerance::Strict if had_errors => return None,
        ErrorTolerance::Strict => text.into_owned(),
        ErrorTolerance::Lossy if had_errors => text.replace('\u{FFFD}', ""),
        ErrorTolerance::Lossy => text.into_owned(),
    };

    if text.trim().is_empty() {
        return None;
    }

    Some(Decoded {
        text,
        encoding: encoding.name(),
    })
}

/// 无 BOM 的 UTF-16 判断: 偶数长度, 且奇数 (LE) 或偶数 (BE) 位置上多数是 NUL
fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return None;
    }

    let units = bytes.len() / 2;
    let high_nul = bytes.iter().skip(1).step_by(2).filter(|&&b| b == 0).count();
    let low_nul = bytes.iter().step_by(2).filter(|&&b| b == 0).count();

    if high_nul * 2 > units && low_nul * 2 <= units {
        Some(UTF_16LE)
    } else if low_nul * 2 > units && high_nul * 2 <= units {
        Some(UTF_16BE)
    } else {
        None
    }
}
