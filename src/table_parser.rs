use crate::error::Result;
use crate::models::RawRow;
use csv::{ReaderBuilder, StringRecord};

/// 把已解码的 CSV 文本拆分成行; 各行列数可以不同, 不做补齐或截断
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .double_quote(true)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_keep_delimiters_and_newlines() {
        let rows = parse_rows("\"a,b\",\"line1\nline2\",c\r\n").unwrap();
        assert_eq!(rows, vec![vec!["a,b", "line1\nline2", "c"]]);
    }

    #[test]
    fn doubled_quote_is_literal() {
        let rows = parse_rows("\"say \"\"hi\"\"\",x\n").unwrap();
        assert_eq!(rows[0][0], "say \"hi\"");
    }

    #[test]
    fn ragged_rows_are_preserved() {
        let rows = parse_rows("a,b,c\nd\n,,\n").unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1], vec!["d"]);
        assert_eq!(rows[2], vec!["", "", ""]);
    }

    #[test]
    fn empty_cells_survive() {
        let rows = parse_rows("\"\",\"1.0\",\"2.0\"").unwrap();
        assert_eq!(rows, vec![vec!["", "1.0", "2.0"]]);
    }
}
