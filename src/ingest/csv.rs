//! Minimal CSV reading for manually-entered post data.
//!
//! Quote- and CRLF-tolerant, header row required. Cells stay strings; the
//! normalizer owns all type coercion.

use std::mem::take;

use serde_json::{Map, Value};

use crate::domain::RawPostData;
use crate::error::{ListeningError, Result};

/// Split CSV text into rows of cells. Double-quote escaping and CRLF line
/// endings are handled; blank lines are dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Turn CSV text into the raw row objects the normalizer consumes: the first
/// row is the header, each later row becomes one `{header: cell}` mapping.
/// Rows shorter than the header leave trailing fields absent; extra cells
/// are dropped.
pub fn read_rows(text: &str) -> Result<Vec<RawPostData>> {
    let mut rows = parse_rows(text);
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let header: Vec<String> = rows
        .remove(0)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    if header.iter().all(|h| h.is_empty()) {
        return Err(ListeningError::MalformedInput {
            expected: "header row",
            context: "first CSV row has no column names".to_string(),
        });
    }

    let mut out = Vec::with_capacity(rows.len());
    for cells in rows {
        let mut obj = Map::new();
        for (name, cell) in header.iter().zip(cells) {
            if name.is_empty() {
                continue;
            }
            obj.insert(name.clone(), Value::String(cell));
        }
        out.push(Value::Object(obj));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_quoted_cells_and_crlf() {
        let text = "a,b\r\n\"one, two\",\"he said \"\"hi\"\"\"\r\n";
        let rows = parse_rows(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["one, two", "he said \"hi\""]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let rows = parse_rows("a,b\n\n1,2\n\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn read_rows_builds_objects_from_header() {
        let text = "post_id,author,text,date,likes\n\
                    p1,Alice,\"hello, world\",2024-01-15,10\n\
                    p2,Bob,hi,2024-01-16,\n";
        let rows = read_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            json!({
                "post_id": "p1",
                "author": "Alice",
                "text": "hello, world",
                "date": "2024-01-15",
                "likes": "10"
            })
        );
        assert_eq!(rows[1]["likes"], json!(""));
    }

    #[test]
    fn short_rows_leave_fields_absent() {
        let rows = read_rows("post_id,author,text\np1,Alice\n").unwrap();
        assert_eq!(rows[0], json!({"post_id": "p1", "author": "Alice"}));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(read_rows("").unwrap().is_empty());
    }
}
