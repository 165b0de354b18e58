use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// How malformed bytes in an input file are handled. One policy for the
/// whole run instead of per-file behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Invalid UTF-8 fails the run.
    Strict,
    /// Invalid sequences become U+FFFD and processing continues.
    #[default]
    Replace,
}

pub fn read_to_string(path: &Path, policy: DecodePolicy) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read input file: {}", path.display()))?;
    match policy {
        DecodePolicy::Strict => String::from_utf8(bytes)
            .map_err(|e| anyhow::anyhow!("invalid UTF-8 in {}: {}", path.display(), e)),
        DecodePolicy::Replace => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// Parse a whole CSV document into records. Fields may be quoted, with
/// `""` for an embedded quote; quoted fields may span commas and line
/// breaks. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;

    let chars: Vec<char> = text.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                buf.push('"');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            i += 1;
            continue;
        }
        if ch == ',' && !in_quotes {
            fields.push(std::mem::take(&mut buf));
            i += 1;
            continue;
        }
        if (ch == '\n' || ch == '\r') && !in_quotes {
            if ch == '\r' && i + 1 < chars.len() && chars[i + 1] == '\n' {
                i += 1;
            }
            if !fields.is_empty() || !buf.is_empty() {
                fields.push(std::mem::take(&mut buf));
                records.push(std::mem::take(&mut fields));
            }
            i += 1;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    if !fields.is_empty() || !buf.is_empty() {
        fields.push(buf);
        records.push(fields);
    }
    records
}

/// Quote a field only when it needs it; embedded quotes are doubled.
pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) -> anyhow::Result<()> {
    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        let quoted: Vec<String> = row.iter().map(|f| csv_quote(f)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, out)
        .with_context(|| format!("cannot write output file: {}", path.display()))
}

/// Column lookup over a header row. Names are matched trimmed and
/// case-insensitively.
pub struct HeaderIndex {
    by_name: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn from_row(header: &[String]) -> HeaderIndex {
        let mut by_name = HashMap::new();
        for (i, name) in header.iter().enumerate() {
            by_name.insert(name.trim().to_ascii_lowercase(), i);
        }
        HeaderIndex { by_name }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Field value for `name` in `row`, empty string when the column is
    /// missing or the row is short.
    pub fn field<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.position(name)
            .and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Like `field`, but trims and maps empty to `None`.
    pub fn opt_field(&self, row: &[String], name: &str) -> Option<String> {
        let v = self.field(row, name).trim();
        if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    }

    pub fn require(&self, name: &str) -> anyhow::Result<usize> {
        self.position(name)
            .ok_or_else(|| anyhow::anyhow!("missing required column: {}", name))
    }
}
