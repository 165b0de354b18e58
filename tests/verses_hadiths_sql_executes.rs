use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use quizprep::csvio::{self, DecodePolicy};
use quizprep::pipeline::{self, ScriptureImportSpec};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

const VERSES_HEADER: [&str; 7] = [
    "id",
    "arabic",
    "translation",
    "reference",
    "surah_number",
    "verse_number",
    "created_at",
];

const HADITHS_HEADER: [&str; 8] = [
    "id",
    "arabic",
    "translation",
    "reference",
    "collection",
    "book_number",
    "hadith_number",
    "created_at",
];

fn write_exports(verses: &PathBuf, hadiths: &PathBuf) {
    let verse_rows = vec![
        vec![
            "v1".to_string(),
            "\u{0628}\u{0650}\u{0633}\u{0652}\u{0645}\u{0650}".to_string(),
            "In the name of Allah".to_string(),
            "Al-Fatiha 1:1".to_string(),
            "1".to_string(),
            "1".to_string(),
            "2025-12-01T04:40:59".to_string(),
        ],
        vec![
            "v2".to_string(),
            "\u{0627}\u{0644}\u{0652}\u{062d}\u{064e}\u{0645}\u{0652}\u{062f}\u{064f}".to_string(),
            "All praise is due to Allah".to_string(),
            "Al-Fatiha 1:2".to_string(),
            String::new(),
            String::new(),
            "2025-12-01T04:40:59".to_string(),
        ],
    ];
    csvio::write_csv(verses, &VERSES_HEADER, &verse_rows).expect("write verses csv");

    let hadith_rows = vec![
        vec![
            "h1".to_string(),
            "\u{0625}\u{0646}\u{0645}\u{0627}".to_string(),
            "Actions are judged by intentions.".to_string(),
            "Bukhari 1".to_string(),
            "Sahih al-Bukhari".to_string(),
            "1".to_string(),
            "1".to_string(),
            "2025-12-02T10:00:00".to_string(),
        ],
        vec![
            "h2".to_string(),
            String::new(),
            "None of you truly believes until he loves for his brother what he loves for himself, the Prophet's counsel.".to_string(),
            "Bukhari 13".to_string(),
            String::new(),
            String::new(),
            "13".to_string(),
            "2025-12-02T10:00:00".to_string(),
        ],
    ];
    csvio::write_csv(hadiths, &HADITHS_HEADER, &hadith_rows).expect("write hadiths csv");
}

/// The emitted migration, minus the read-only verification SELECTs and
/// the timestamptz casts the target engine does not know, must actually
/// execute. Running it twice exercises ON CONFLICT (id) DO NOTHING
/// idempotence.
#[test]
fn generated_scripture_sql_inserts_and_is_idempotent() {
    let dir = temp_dir("quizprep-scripture-sql");
    let verses_csv = dir.join("quran_verses_rows.csv");
    let hadiths_csv = dir.join("hadiths_rows.csv");
    let output = dir.join("import.sql");
    write_exports(&verses_csv, &hadiths_csv);

    // Schema-less table names so the statements run under SQLite too.
    let spec = ScriptureImportSpec {
        verses_csv,
        hadiths_csv,
        verses_table: "quran_verses".to_string(),
        hadiths_table: "hadiths".to_string(),
    };
    let report =
        pipeline::verses_hadiths_import_sql(&spec, &output, DecodePolicy::Replace)
            .expect("generate sql");
    assert_eq!(report.verses, 2);
    assert_eq!(report.hadiths, 2);

    let sql = std::fs::read_to_string(&output).expect("read migration");
    assert!(sql.contains("ON CONFLICT (id) DO NOTHING;"));
    assert!(sql.contains("'2025-12-01T04:40:59'::timestamptz"));
    assert!(sql.contains("SELECT COUNT(*) AS total_verses FROM quran_verses;"));
    assert!(sql.contains("SELECT COUNT(*) AS total_hadiths FROM hadiths;"));

    let inserts: String = sql
        .lines()
        .filter(|l| !l.trim_start().starts_with("SELECT"))
        .collect::<Vec<_>>()
        .join("\n")
        .replace("::timestamptz", "");

    let conn = Connection::open_in_memory().expect("open sqlite");
    conn.execute_batch(
        "CREATE TABLE quran_verses(
            id TEXT PRIMARY KEY,
            arabic TEXT NOT NULL,
            translation TEXT NOT NULL,
            reference TEXT NOT NULL,
            surah_number INTEGER,
            verse_number INTEGER,
            created_at TEXT
        );
        CREATE TABLE hadiths(
            id TEXT PRIMARY KEY,
            arabic TEXT,
            translation TEXT NOT NULL,
            reference TEXT NOT NULL,
            collection TEXT,
            book_number TEXT,
            hadith_number TEXT,
            created_at TEXT
        );",
    )
    .expect("create tables");

    conn.execute_batch(&inserts).expect("first import");
    conn.execute_batch(&inserts).expect("re-import is a no-op");

    let verse_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM quran_verses", [], |r| r.get(0))
        .expect("verse count");
    assert_eq!(verse_count, 2);
    let hadith_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM hadiths", [], |r| r.get(0))
        .expect("hadith count");
    assert_eq!(hadith_count, 2);

    // Arabic text survived the escaping round-trip.
    let arabic: String = conn
        .query_row("SELECT arabic FROM quran_verses WHERE id = 'v1'", [], |r| r.get(0))
        .expect("arabic v1");
    assert_eq!(arabic, "\u{0628}\u{0650}\u{0633}\u{0652}\u{0645}\u{0650}");

    // Absent verse coordinates landed as NULL, present ones as integers.
    let surah: i64 = conn
        .query_row("SELECT surah_number FROM quran_verses WHERE id = 'v1'", [], |r| {
            r.get(0)
        })
        .expect("surah v1");
    assert_eq!(surah, 1);
    let missing_surah: Option<i64> = conn
        .query_row("SELECT surah_number FROM quran_verses WHERE id = 'v2'", [], |r| {
            r.get(0)
        })
        .expect("surah v2");
    assert_eq!(missing_surah, None);

    // Translation-only hadith rows keep a NULL arabic column, and an
    // apostrophe in the translation round-trips intact.
    let null_arabic: Option<String> = conn
        .query_row("SELECT arabic FROM hadiths WHERE id = 'h2'", [], |r| r.get(0))
        .expect("arabic h2");
    assert_eq!(null_arabic, None);
    let translation: String = conn
        .query_row("SELECT translation FROM hadiths WHERE id = 'h2'", [], |r| r.get(0))
        .expect("translation h2");
    assert!(translation.contains("the Prophet's counsel"));
    let collection: Option<String> = conn
        .query_row("SELECT collection FROM hadiths WHERE id = 'h2'", [], |r| r.get(0))
        .expect("collection h2");
    assert_eq!(collection, None);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_scripture_export_is_terminal() {
    let dir = temp_dir("quizprep-scripture-missing");
    let hadiths_csv = dir.join("hadiths_rows.csv");
    csvio::write_csv(&hadiths_csv, &HADITHS_HEADER, &[]).expect("write hadiths csv");
    let spec = ScriptureImportSpec {
        verses_csv: dir.join("no-such-export.csv"),
        hadiths_csv,
        verses_table: "quran_verses".to_string(),
        hadiths_table: "hadiths".to_string(),
    };
    let err = pipeline::verses_hadiths_import_sql(&spec, &dir.join("out.sql"), DecodePolicy::Replace)
        .expect_err("must fail");
    assert!(err.to_string().contains("no-such-export.csv"));
    let _ = std::fs::remove_dir_all(&dir);
}
