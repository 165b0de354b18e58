use crate::csvio::HeaderIndex;
use crate::duration::parse_duration;
use crate::sqlgen::SqlValue;

/// Substituted whenever the source `options` field is missing, fails to
/// decode, or does not hold exactly four strings.
pub const PLACEHOLDER_OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

/// A quiz question row as it comes out of the source export, before any
/// cleanup. Absent columns stay `None`; cleanup decides the defaults.
#[derive(Clone, Debug, Default)]
pub struct RawQuestion {
    pub id: Option<String>,
    pub prompt: String,
    /// JSON-encoded array string, when present.
    pub options: Option<String>,
    pub correct: Option<String>,
    pub explanation: String,
    pub created_at: Option<String>,
}

/// Locally recovered field problems. These never abort a run; the driver
/// counts them into the summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldIssue {
    /// `options` was not a JSON array of exactly 4 strings.
    BadOptions,
    /// `correct_answer` was present but not an integer in [0,3].
    BadCorrectIndex,
}

/// Canonical cleaned shape, one row of the output CSV.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionRecord {
    pub id: String,
    pub category: String,
    /// Per-category sequence label, `q001`, `q002`, ...
    pub sequence_id: String,
    pub prompt: String,
    pub options: [String; 4],
    pub correct: u8,
    pub explanation: String,
    /// 1-based, dense within the category.
    pub order_index: usize,
    pub created_at: String,
}

/// Standardize one raw row into the canonical shape. `position` is the
/// 1-based slot within the category and drives both `sequence_id` and
/// `order_index`. `gen_id` supplies fresh identifiers so tests can pin
/// them down; production callers pass a UUID v4 closure.
pub fn normalize(
    raw: &RawQuestion,
    category: &str,
    position: usize,
    run_timestamp: &str,
    mut gen_id: impl FnMut() -> String,
) -> (QuestionRecord, Vec<FieldIssue>) {
    let mut issues = Vec::new();

    let options = match decode_options(raw.options.as_deref()) {
        Some(opts) => opts,
        None => {
            issues.push(FieldIssue::BadOptions);
            PLACEHOLDER_OPTIONS.map(str::to_string)
        }
    };

    let correct = match raw.correct.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(s) => match s.parse::<i64>() {
            Ok(n) if (0..=3).contains(&n) => n as u8,
            // Out-of-range answers would silently corrupt the answer key
            // downstream; substitute 0 and report.
            _ => {
                issues.push(FieldIssue::BadCorrectIndex);
                0
            }
        },
    };

    let id = match raw.id.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => gen_id(),
    };
    let created_at = match raw.created_at.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => run_timestamp.to_string(),
    };

    let record = QuestionRecord {
        id,
        category: category.to_string(),
        sequence_id: format!("q{:03}", position),
        prompt: raw.prompt.clone(),
        options,
        correct,
        explanation: raw.explanation.clone(),
        order_index: position,
        created_at,
    };
    (record, issues)
}

fn decode_options(encoded: Option<&str>) -> Option<[String; 4]> {
    let text = encoded?.trim();
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let items = value.as_array()?;
    if items.len() != 4 {
        return None;
    }
    let mut out: Vec<String> = Vec::with_capacity(4);
    for item in items {
        out.push(item.as_str()?.to_string());
    }
    out.try_into().ok()
}

/// Output CSV column order. `options` is a JSON-encoded array string;
/// numbers are decimal strings.
pub const QUESTION_CSV_COLUMNS: [&str; 9] = [
    "id",
    "quiz_id",
    "question_id",
    "question",
    "options",
    "correct_answer",
    "explanation",
    "order_index",
    "created_at",
];

impl QuestionRecord {
    pub fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.category.clone(),
            self.sequence_id.clone(),
            self.prompt.clone(),
            serde_json::to_string(&self.options).expect("string array encodes"),
            self.correct.to_string(),
            self.explanation.clone(),
            self.order_index.to_string(),
            self.created_at.clone(),
        ]
    }

    /// Parse a row of the cleaned CSV back into a record. The cleaned
    /// file is this tool's own output, so structural problems here are
    /// terminal, not recoverable.
    pub fn from_csv_row(header: &HeaderIndex, row: &[String]) -> anyhow::Result<QuestionRecord> {
        let options = decode_options(Some(header.field(row, "options")))
            .ok_or_else(|| anyhow::anyhow!("options is not a JSON array of 4 strings"))?;
        let correct = header
            .field(row, "correct_answer")
            .trim()
            .parse::<u8>()
            .map_err(|_| anyhow::anyhow!("correct_answer is not an integer"))?;
        anyhow::ensure!(correct <= 3, "correct_answer {} out of range [0,3]", correct);
        let order_index = header
            .field(row, "order_index")
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("order_index is not an integer"))?;

        Ok(QuestionRecord {
            id: header.field(row, "id").to_string(),
            category: header.field(row, "quiz_id").to_string(),
            sequence_id: header.field(row, "question_id").to_string(),
            prompt: header.field(row, "question").to_string(),
            options,
            correct,
            explanation: header.field(row, "explanation").to_string(),
            order_index,
            created_at: header.field(row, "created_at").to_string(),
        })
    }

    /// Value tuple in `QUESTION_CSV_COLUMNS` order for the import
    /// migration. `question_id` is nullable; `options` is cast to jsonb.
    pub fn sql_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.category.clone()),
            SqlValue::opt_text(Some(self.sequence_id.clone())),
            SqlValue::Text(self.prompt.clone()),
            SqlValue::Cast(
                serde_json::to_string(&self.options).expect("string array encodes"),
                "jsonb",
            ),
            SqlValue::Int(self.correct as i64),
            SqlValue::Text(self.explanation.clone()),
            SqlValue::Int(self.order_index as i64),
            SqlValue::timestamp(Some(self.created_at.clone())),
        ]
    }
}

/// One lecture/recitation/verse row of a media export. `attribution` is
/// the speaker or reciter column, depending on the table.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaRecord {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub attribution: Option<String>,
    /// Canonical `minutes:seconds`, or the raw text when unparseable.
    pub duration: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub order_index: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl MediaRecord {
    pub fn from_csv_row(header: &HeaderIndex, row: &[String], attribution_column: &str) -> MediaRecord {
        let order_index = header
            .field(row, "order_index")
            .trim()
            .parse::<i64>()
            .unwrap_or(0);
        MediaRecord {
            id: header.field(row, "id").to_string(),
            category_id: header.field(row, "category_id").to_string(),
            title: header.field(row, "title").to_string(),
            attribution: header.opt_field(row, attribution_column),
            duration: parse_duration(header.field(row, "duration")),
            media_url: header.field(row, "video_url").to_string(),
            thumbnail_url: header.opt_field(row, "thumbnail_url"),
            order_index: order_index.max(0),
            created_at: header.opt_field(row, "created_at"),
            updated_at: header.opt_field(row, "updated_at"),
        }
    }

    /// Value tuple matching
    /// `(id, category_id, title, <attribution>, duration, video_url,
    ///   thumbnail_url, order_index, created_at, updated_at)`.
    pub fn sql_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.category_id.clone()),
            SqlValue::Text(self.title.clone()),
            SqlValue::opt_text(self.attribution.clone()),
            SqlValue::opt_text(self.duration.clone()),
            SqlValue::Text(self.media_url.clone()),
            SqlValue::opt_text(self.thumbnail_url.clone()),
            SqlValue::Int(self.order_index),
            SqlValue::timestamp(self.created_at.clone()),
            SqlValue::timestamp(self.updated_at.clone()),
        ]
    }
}

/// One Quran verse row of a scripture export. `arabic`, `translation`
/// and `reference` are required columns; the verse coordinates are not.
#[derive(Clone, Debug, PartialEq)]
pub struct VerseRecord {
    pub id: String,
    pub arabic: String,
    pub translation: String,
    pub reference: String,
    pub surah_number: Option<i64>,
    pub verse_number: Option<i64>,
    pub created_at: Option<String>,
}

impl VerseRecord {
    pub fn from_csv_row(header: &HeaderIndex, row: &[String]) -> VerseRecord {
        VerseRecord {
            id: header.field(row, "id").to_string(),
            arabic: header.field(row, "arabic").to_string(),
            translation: header.field(row, "translation").to_string(),
            reference: header.field(row, "reference").to_string(),
            surah_number: parse_opt_int(header.field(row, "surah_number")),
            verse_number: parse_opt_int(header.field(row, "verse_number")),
            created_at: header.opt_field(row, "created_at"),
        }
    }

    /// Value tuple matching
    /// `(id, arabic, translation, reference, surah_number, verse_number,
    ///   created_at)`.
    pub fn sql_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.arabic.clone()),
            SqlValue::Text(self.translation.clone()),
            SqlValue::Text(self.reference.clone()),
            SqlValue::opt_int(self.surah_number),
            SqlValue::opt_int(self.verse_number),
            SqlValue::timestamptz(self.created_at.clone()),
        ]
    }
}

/// One hadith row. `arabic` is nullable; many collections ship
/// translation-only rows.
#[derive(Clone, Debug, PartialEq)]
pub struct HadithRecord {
    pub id: String,
    pub arabic: Option<String>,
    pub translation: String,
    pub reference: String,
    pub collection: Option<String>,
    pub book_number: Option<String>,
    pub hadith_number: Option<String>,
    pub created_at: Option<String>,
}

impl HadithRecord {
    pub fn from_csv_row(header: &HeaderIndex, row: &[String]) -> HadithRecord {
        HadithRecord {
            id: header.field(row, "id").to_string(),
            arabic: header.opt_field(row, "arabic"),
            translation: header.field(row, "translation").to_string(),
            reference: header.field(row, "reference").to_string(),
            collection: header.opt_field(row, "collection"),
            book_number: header.opt_field(row, "book_number"),
            hadith_number: header.opt_field(row, "hadith_number"),
            created_at: header.opt_field(row, "created_at"),
        }
    }

    /// Value tuple matching
    /// `(id, arabic, translation, reference, collection, book_number,
    ///   hadith_number, created_at)`.
    pub fn sql_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::opt_text(self.arabic.clone()),
            SqlValue::Text(self.translation.clone()),
            SqlValue::Text(self.reference.clone()),
            SqlValue::opt_text(self.collection.clone()),
            SqlValue::opt_text(self.book_number.clone()),
            SqlValue::opt_text(self.hadith_number.clone()),
            SqlValue::timestamptz(self.created_at.clone()),
        ]
    }
}

fn parse_opt_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}
