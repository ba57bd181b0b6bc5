//! Bulk option import: one option per record, taken from the first column.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub fn read_options(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let options = parse_options(&raw);
    tracing::debug!(path = %path.display(), count = options.len(), "options imported");
    Ok(options)
}

/// First field of every non-blank record, unquoted and trimmed. Fields are
/// separated by `,`, tab or `;`; a quoted field may span lines.
pub fn parse_options(raw: &str) -> Vec<String> {
    let mut options = Vec::new();
    let mut first = String::new();
    let mut field = 0usize;
    let mut quoted = false;
    let mut chars = raw.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    if field == 0 {
                        first.push('"');
                    }
                }
                '"' => quoted = false,
                other if field == 0 => first.push(other),
                _ => {}
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            ',' | '\t' | ';' => field += 1,
            '\n' | '\r' => {
                end_record(&mut options, &mut first);
                field = 0;
            }
            other if field == 0 => first.push(other),
            _ => {}
        }
    }
    end_record(&mut options, &mut first);
    options
}

fn end_record(options: &mut Vec<String>, first: &mut String) {
    let value = first.trim();
    if !value.is_empty() {
        options.push(value.to_string());
    }
    first.clear();
}
