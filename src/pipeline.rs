use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use uuid::Uuid;

use crate::bank::Bank;
use crate::classify::is_placeholder;
use crate::config::PipelineConfig;
use crate::csvio::{self, DecodePolicy, HeaderIndex};
use crate::normalize::{
    self, HadithRecord, MediaRecord, QuestionRecord, RawQuestion, VerseRecord,
    QUESTION_CSV_COLUMNS,
};
use crate::quota::fill_to_quota;
use crate::sqlgen::{
    banner, excluded, select_count, select_count_by, value_tuple, Conflict, InsertStatement,
    SqlValue,
};

const QUIZZES_TABLE: &str = "public.quizzes";
const QUESTIONS_TABLE: &str = "public.quiz_questions";

#[derive(Clone, Debug)]
pub struct CategoryReport {
    pub category: String,
    /// Non-placeholder rows found in the source for this category.
    pub real: usize,
    /// Synthetic rows appended from the bank.
    pub generated: usize,
    /// Rows written for this category.
    pub count: usize,
    /// Missing rows the bank could not supply.
    pub shortfall: usize,
    /// Bank size for this category, for the shortfall warning.
    pub bank_available: usize,
    /// Malformed fields replaced with defaults during normalization.
    pub field_issues: usize,
}

/// Plain-text verification summary for one cleaning run, printed to
/// stdout by the entry point.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub removed_placeholders: usize,
    pub per_category: Vec<CategoryReport>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.per_category.iter().map(|c| c.count).sum()
    }

    pub fn has_shortfall(&self) -> bool {
        self.per_category.iter().any(|c| c.shortfall > 0)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Removed {} placeholder questions", self.removed_placeholders)?;
        writeln!(f)?;
        writeln!(f, "Questions per category:")?;
        for c in &self.per_category {
            writeln!(
                f,
                "  {}: {} real, {} generated, {} total",
                c.category, c.real, c.generated, c.count
            )?;
            if c.field_issues > 0 {
                writeln!(
                    f,
                    "  {}: {} malformed field(s) replaced with defaults",
                    c.category, c.field_issues
                )?;
            }
        }
        for c in &self.per_category {
            if c.shortfall > 0 {
                writeln!(
                    f,
                    "WARNING: {} is short by {} question(s); bank exhausted at {}/{} ({} in bank)",
                    c.category,
                    c.shortfall,
                    c.count,
                    c.count + c.shortfall,
                    c.bank_available
                )?;
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "Generated {} questions total across {} categories",
            self.total(),
            self.per_category.len()
        )
    }
}

/// CSV mode: read the raw export, drop placeholder rows, fill each
/// configured category to the target from the bank, normalize, and write
/// the cleaned CSV. Rows for categories outside the configured list are
/// dropped, as are surplus rows past the target.
pub fn clean_quiz_csv(
    input: &Path,
    output: &Path,
    bank: &Bank,
    config: &PipelineConfig,
    run_timestamp: &str,
) -> anyhow::Result<RunSummary> {
    let text = csvio::read_to_string(input, config.decode)?;
    let rows = csvio::parse_csv(&text);
    anyhow::ensure!(!rows.is_empty(), "empty input file: {}", input.display());
    let header = HeaderIndex::from_row(&rows[0]);
    header.require("quiz_id")?;
    header.require("question")?;

    let mut by_category: HashMap<String, Vec<RawQuestion>> = HashMap::new();
    let mut removed = 0usize;
    for row in &rows[1..] {
        let category = header.field(row, "quiz_id").trim().to_string();
        let prompt = header.field(row, "question").to_string();
        let explanation = header.field(row, "explanation").to_string();
        if is_placeholder(&prompt, &explanation) {
            removed += 1;
            continue;
        }
        by_category.entry(category).or_default().push(RawQuestion {
            id: header.opt_field(row, "id"),
            prompt,
            options: header.opt_field(row, "options"),
            correct: header.opt_field(row, "correct_answer"),
            explanation,
            created_at: header.opt_field(row, "created_at"),
        });
    }

    let target = config.target_per_category;
    let mut out_rows: Vec<Vec<String>> = Vec::new();
    let mut summary = RunSummary {
        removed_placeholders: removed,
        per_category: Vec::new(),
    };

    for cat in &config.categories {
        let empty = Vec::new();
        let real = by_category.get(&cat.quiz_id).unwrap_or(&empty);
        let fill = fill_to_quota(real, target, |needed| bank.take(&cat.quiz_id, needed));
        let used_real = real.len().min(target);

        let mut field_issues = 0usize;
        for (i, raw) in fill.records.iter().enumerate() {
            let (record, issues) = normalize::normalize(raw, &cat.quiz_id, i + 1, run_timestamp, || {
                Uuid::new_v4().to_string()
            });
            field_issues += issues.len();
            out_rows.push(record.to_csv_row());
        }

        summary.per_category.push(CategoryReport {
            category: cat.quiz_id.clone(),
            real: used_real,
            generated: fill.records.len() - used_real,
            count: fill.records.len(),
            shortfall: fill.shortfall,
            bank_available: bank.available(&cat.quiz_id),
            field_issues,
        });
    }

    csvio::write_csv(output, &QUESTION_CSV_COLUMNS, &out_rows)?;
    Ok(summary)
}

#[derive(Clone, Debug)]
pub struct QuizSqlReport {
    pub categories: usize,
    pub questions: usize,
}

/// SQL mode for quiz data: read a cleaned questions CSV and write one
/// migration that upserts the category metadata, re-imports every
/// question, and ends with read-only verification counts.
pub fn quiz_import_sql(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> anyhow::Result<QuizSqlReport> {
    let text = csvio::read_to_string(input, config.decode)?;
    let rows = csvio::parse_csv(&text);
    anyhow::ensure!(!rows.is_empty(), "empty input file: {}", input.display());
    let header = HeaderIndex::from_row(&rows[0]);
    for col in ["id", "quiz_id", "question", "options", "correct_answer", "order_index"] {
        header.require(col)?;
    }

    let mut records: Vec<QuestionRecord> = Vec::new();
    for (i, row) in rows[1..].iter().enumerate() {
        let record = QuestionRecord::from_csv_row(&header, row)
            .with_context(|| format!("{}: row {}", input.display(), i + 2))?;
        records.push(record);
    }

    let mut sql = String::new();
    sql.push_str(&banner("IMPORT QUIZ DATA FROM CSV"));
    sql.push_str("-- Imports quiz categories and questions from the cleaned CSV export.\n\n");

    if !config.categories.is_empty() {
        sql.push_str(&banner("1. IMPORT QUIZZES"));
        let quiz_rows: Vec<String> = config
            .categories
            .iter()
            .map(|cat| {
                value_tuple(&[
                    SqlValue::Text(
                        cat.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
                    ),
                    SqlValue::Text(cat.quiz_id.clone()),
                    SqlValue::Text(cat.title.clone()),
                    SqlValue::Text(cat.description.clone()),
                    SqlValue::Text(cat.difficulty.clone()),
                    SqlValue::Text(cat.color.clone()),
                    SqlValue::Int(cat.order_index),
                    SqlValue::Now,
                    SqlValue::Now,
                ])
            })
            .collect();
        let quizzes = InsertStatement {
            table: QUIZZES_TABLE.to_string(),
            columns: to_columns(&[
                "id",
                "quiz_id",
                "title",
                "description",
                "difficulty",
                "color",
                "order_index",
                "created_at",
                "updated_at",
            ]),
            rows: quiz_rows,
            conflict: Some(Conflict::DoUpdate {
                key: "quiz_id".to_string(),
                set: vec![
                    ("title".to_string(), excluded("title")),
                    ("description".to_string(), excluded("description")),
                    ("difficulty".to_string(), excluded("difficulty")),
                    ("color".to_string(), excluded("color")),
                    ("order_index".to_string(), excluded("order_index")),
                    ("updated_at".to_string(), "NOW()".to_string()),
                ],
            }),
        };
        sql.push_str(&quizzes.render());
        sql.push('\n');
    }

    sql.push_str(&banner("2. IMPORT QUIZ QUESTIONS"));
    sql.push_str("-- Delete existing questions to allow a clean re-import\n");
    sql.push_str(&format!("DELETE FROM {};\n\n", QUESTIONS_TABLE));

    let question_rows: Vec<String> = records.iter().map(|r| value_tuple(&r.sql_values())).collect();
    let questions = InsertStatement {
        table: QUESTIONS_TABLE.to_string(),
        columns: to_columns(&QUESTION_CSV_COLUMNS),
        rows: question_rows,
        conflict: Some(Conflict::DoUpdate {
            key: "id".to_string(),
            set: vec![
                ("quiz_id".to_string(), excluded("quiz_id")),
                ("question".to_string(), excluded("question")),
                ("options".to_string(), excluded("options")),
                ("correct_answer".to_string(), excluded("correct_answer")),
                ("explanation".to_string(), excluded("explanation")),
                ("order_index".to_string(), excluded("order_index")),
            ],
        }),
    };
    sql.push_str(&questions.render());
    sql.push('\n');

    sql.push_str(&banner("VERIFICATION"));
    sql.push_str(&select_count("total_quizzes", QUIZZES_TABLE));
    sql.push_str(&select_count("total_questions", QUESTIONS_TABLE));
    sql.push_str(&select_count_by("quiz_id", QUESTIONS_TABLE));

    write_text_file(output, &sql)?;
    Ok(QuizSqlReport {
        categories: config.categories.len(),
        questions: records.len(),
    })
}

/// One media CSV to import: which table it feeds and what its
/// attribution column is called (`speaker`, `reciter`, ...).
#[derive(Clone, Debug)]
pub struct MediaImportSpec {
    pub csv_path: PathBuf,
    pub table: String,
    /// Identifier-shaped label used in comments and count aliases.
    pub label: String,
    pub attribution_column: String,
}

#[derive(Clone, Debug)]
pub struct MediaReport {
    pub label: String,
    pub count: usize,
}

/// SQL mode for media exports: one INSERT section per spec, idempotent
/// via `ON CONFLICT (id) DO NOTHING`, with a shared verification block.
pub fn media_import_sql(
    specs: &[MediaImportSpec],
    output: &Path,
    decode: DecodePolicy,
) -> anyhow::Result<Vec<MediaReport>> {
    let mut sql = String::new();
    let mut reports = Vec::new();

    for spec in specs {
        let text = csvio::read_to_string(&spec.csv_path, decode)?;
        let rows = csvio::parse_csv(&text);
        anyhow::ensure!(
            !rows.is_empty(),
            "empty media export: {}",
            spec.csv_path.display()
        );
        let header = HeaderIndex::from_row(&rows[0]);
        header.require("id")?;
        header.require("title")?;

        let records: Vec<MediaRecord> = rows[1..]
            .iter()
            .map(|row| MediaRecord::from_csv_row(&header, row, &spec.attribution_column))
            .collect();

        sql.push_str(&banner(&format!("IMPORT {} FROM CSV", spec.label.to_uppercase())));
        if records.is_empty() {
            sql.push_str(&format!("-- No {} rows found\n\n", spec.label));
            reports.push(MediaReport {
                label: spec.label.clone(),
                count: 0,
            });
            continue;
        }

        let stmt = InsertStatement {
            table: spec.table.clone(),
            columns: to_columns(&[
                "id",
                "category_id",
                "title",
                &spec.attribution_column,
                "duration",
                "video_url",
                "thumbnail_url",
                "order_index",
                "created_at",
                "updated_at",
            ]),
            rows: records.iter().map(|r| value_tuple(&r.sql_values())).collect(),
            conflict: Some(Conflict::DoNothing {
                key: "id".to_string(),
            }),
        };
        sql.push_str(&stmt.render());
        sql.push_str(&format!("\n-- Total: {} {} imported\n\n", records.len(), spec.label));
        reports.push(MediaReport {
            label: spec.label.clone(),
            count: records.len(),
        });
    }

    sql.push_str(&banner("VERIFICATION QUERIES"));
    for spec in specs {
        sql.push_str(&select_count(&format!("total_{}", spec.label), &spec.table));
        sql.push_str(&select_count_by("category_id", &spec.table));
    }

    write_text_file(output, &sql)?;
    Ok(reports)
}

/// The verses and hadiths exports, imported together into their two
/// tables by one migration.
#[derive(Clone, Debug)]
pub struct ScriptureImportSpec {
    pub verses_csv: PathBuf,
    pub hadiths_csv: PathBuf,
    pub verses_table: String,
    pub hadiths_table: String,
}

#[derive(Clone, Debug)]
pub struct ScriptureReport {
    pub verses: usize,
    pub hadiths: usize,
}

/// SQL mode for scripture reference data: one INSERT section per table,
/// idempotent via `ON CONFLICT (id) DO NOTHING`, `::timestamptz` casts on
/// present timestamps, and a trailing verification block.
pub fn verses_hadiths_import_sql(
    spec: &ScriptureImportSpec,
    output: &Path,
    decode: DecodePolicy,
) -> anyhow::Result<ScriptureReport> {
    let text = csvio::read_to_string(&spec.verses_csv, decode)?;
    let rows = csvio::parse_csv(&text);
    anyhow::ensure!(
        !rows.is_empty(),
        "empty verses export: {}",
        spec.verses_csv.display()
    );
    let header = HeaderIndex::from_row(&rows[0]);
    for col in ["id", "arabic", "translation", "reference"] {
        header.require(col)?;
    }
    let verses: Vec<VerseRecord> = rows[1..]
        .iter()
        .map(|row| VerseRecord::from_csv_row(&header, row))
        .collect();

    let text = csvio::read_to_string(&spec.hadiths_csv, decode)?;
    let rows = csvio::parse_csv(&text);
    anyhow::ensure!(
        !rows.is_empty(),
        "empty hadiths export: {}",
        spec.hadiths_csv.display()
    );
    let header = HeaderIndex::from_row(&rows[0]);
    for col in ["id", "translation", "reference"] {
        header.require(col)?;
    }
    let hadiths: Vec<HadithRecord> = rows[1..]
        .iter()
        .map(|row| HadithRecord::from_csv_row(&header, row))
        .collect();

    let mut sql = String::new();
    sql.push_str(&banner("IMPORT QURAN VERSES AND HADITHS"));
    sql.push_str("-- Imports scripture reference data from the CSV exports.\n\n");

    sql.push_str(&banner("1. IMPORT QURAN VERSES"));
    if verses.is_empty() {
        sql.push_str("-- No verse rows found\n\n");
    } else {
        let stmt = InsertStatement {
            table: spec.verses_table.clone(),
            columns: to_columns(&[
                "id",
                "arabic",
                "translation",
                "reference",
                "surah_number",
                "verse_number",
                "created_at",
            ]),
            rows: verses.iter().map(|r| value_tuple(&r.sql_values())).collect(),
            conflict: Some(Conflict::DoNothing {
                key: "id".to_string(),
            }),
        };
        sql.push_str(&stmt.render());
        sql.push_str(&format!("\n-- Total: {} verses imported\n\n", verses.len()));
    }

    sql.push_str(&banner("2. IMPORT HADITHS"));
    if hadiths.is_empty() {
        sql.push_str("-- No hadith rows found\n\n");
    } else {
        let stmt = InsertStatement {
            table: spec.hadiths_table.clone(),
            columns: to_columns(&[
                "id",
                "arabic",
                "translation",
                "reference",
                "collection",
                "book_number",
                "hadith_number",
                "created_at",
            ]),
            rows: hadiths.iter().map(|r| value_tuple(&r.sql_values())).collect(),
            conflict: Some(Conflict::DoNothing {
                key: "id".to_string(),
            }),
        };
        sql.push_str(&stmt.render());
        sql.push_str(&format!("\n-- Total: {} hadiths imported\n\n", hadiths.len()));
    }

    sql.push_str(&banner("VERIFICATION"));
    sql.push_str(&select_count("total_verses", &spec.verses_table));
    sql.push_str(&select_count("total_hadiths", &spec.hadiths_table));
    sql.push_str(&select_count_by("collection", &spec.hadiths_table));

    write_text_file(output, &sql)?;
    Ok(ScriptureReport {
        verses: verses.len(),
        hadiths: hadiths.len(),
    })
}

fn to_columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn write_text_file(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, text)
        .with_context(|| format!("cannot write output file: {}", path.display()))
}
