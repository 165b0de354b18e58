//! SQL text generation. There is no parameterized-query path anywhere in
//! the pipeline; every free-text field must go through `escape_sql_string`
//! (or a `SqlValue` variant that calls it) before interpolation, with no
//! exemption for trusted input.

/// `NULL` for an absent value; otherwise single-quoted with embedded
/// quotes doubled.
pub fn escape_sql_string(value: Option<&str>) -> String {
    match value {
        None => "NULL".to_string(),
        Some(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

/// One column position in a VALUES tuple.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int(i64),
    Bool(bool),
    /// Escaped text with a cast suffix for structured columns,
    /// e.g. `'[...]'::jsonb`.
    Cast(String, &'static str),
    /// Current-time marker for timestamp columns that must never be NULL.
    Now,
}

impl SqlValue {
    /// Optional free text: empty or missing becomes NULL, never `''`.
    pub fn opt_text(value: Option<String>) -> SqlValue {
        match value {
            Some(s) if !s.trim().is_empty() => SqlValue::Text(s),
            _ => SqlValue::Null,
        }
    }

    /// Optional integer column: NULL when absent.
    pub fn opt_int(value: Option<i64>) -> SqlValue {
        match value {
            Some(n) => SqlValue::Int(n),
            None => SqlValue::Null,
        }
    }

    /// Timestamp column: a missing value defaults to NOW() rather than
    /// NULL, since created/updated stamps are non-nullable downstream.
    pub fn timestamp(value: Option<String>) -> SqlValue {
        match value {
            Some(s) if !s.trim().is_empty() => SqlValue::Text(s),
            _ => SqlValue::Now,
        }
    }

    /// Like `timestamp`, but with an explicit `::timestamptz` cast on
    /// present values.
    pub fn timestamptz(value: Option<String>) -> SqlValue {
        match value {
            Some(s) if !s.trim().is_empty() => SqlValue::Cast(s, "timestamptz"),
            _ => SqlValue::Now,
        }
    }

    pub fn render(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Text(s) => escape_sql_string(Some(s)),
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            SqlValue::Cast(s, cast) => format!("{}::{}", escape_sql_string(Some(s)), cast),
            SqlValue::Now => "NOW()".to_string(),
        }
    }
}

/// Parenthesized, comma-separated literal tuple in column order.
pub fn value_tuple(values: &[SqlValue]) -> String {
    let rendered: Vec<String> = values.iter().map(SqlValue::render).collect();
    format!("({})", rendered.join(", "))
}

#[derive(Clone, Debug)]
pub enum Conflict {
    /// `ON CONFLICT (<key>) DO NOTHING`
    DoNothing { key: String },
    /// `ON CONFLICT (<key>) DO UPDATE SET <col> = <expr>, ...`
    DoUpdate {
        key: String,
        set: Vec<(String, String)>,
    },
}

/// Update expression pulling the incoming row's value.
pub fn excluded(column: &str) -> String {
    format!("EXCLUDED.{}", column)
}

/// Multi-row `INSERT INTO ... VALUES ...` statement with an optional
/// conflict clause. Rows are pre-rendered tuples from `value_tuple`.
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    pub conflict: Option<Conflict>,
}

impl InsertStatement {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "INSERT INTO {} ({})\nVALUES\n",
            self.table,
            self.columns.join(", ")
        ));
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str("  ");
            out.push_str(row);
            if i + 1 < self.rows.len() {
                out.push(',');
            }
            out.push('\n');
        }
        match &self.conflict {
            None => {
                // Close the VALUES list directly.
                trim_trailing_newline(&mut out);
                out.push_str(";\n");
            }
            Some(Conflict::DoNothing { key }) => {
                out.push_str(&format!("ON CONFLICT ({}) DO NOTHING;\n", key));
            }
            Some(Conflict::DoUpdate { key, set }) => {
                out.push_str(&format!("ON CONFLICT ({}) DO UPDATE SET\n", key));
                for (i, (col, expr)) in set.iter().enumerate() {
                    out.push_str(&format!("  {} = {}", col, expr));
                    if i + 1 < set.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                trim_trailing_newline(&mut out);
                out.push_str(";\n");
            }
        }
        out
    }
}

fn trim_trailing_newline(s: &mut String) {
    if s.ends_with('\n') {
        s.pop();
    }
}

/// `-- ===...` banner used to delimit sections of a generated migration.
pub fn banner(title: &str) -> String {
    let rule = "-- ============================================================================";
    format!("{}\n-- {}\n{}\n", rule, title, rule)
}

/// Read-only verification statement: `SELECT COUNT(*) AS <alias> FROM <table>;`
pub fn select_count(alias: &str, table: &str) -> String {
    format!("SELECT COUNT(*) AS {} FROM {};\n", alias, table)
}

/// Per-group verification statement.
pub fn select_count_by(group_column: &str, table: &str) -> String {
    format!(
        "SELECT {col}, COUNT(*) AS count FROM {table} GROUP BY {col} ORDER BY {col};\n",
        col = group_column,
        table = table
    )
}
