use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use quizprep::csvio::{self, DecodePolicy};
use quizprep::pipeline::{self, MediaImportSpec};

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

const MEDIA_HEADER: [&str; 10] = [
    "id",
    "category_id",
    "title",
    "speaker",
    "duration",
    "video_url",
    "thumbnail_url",
    "order_index",
    "created_at",
    "updated_at",
];

fn write_lectures_csv(path: &PathBuf) {
    let rows = vec![
        vec![
            "l1".to_string(),
            "aqeedah".to_string(),
            "The Prophet's Mercy".to_string(),
            "Shaykh O'Connor".to_string(),
            "1h 5m".to_string(),
            "https://videos.example/l1".to_string(),
            "https://thumbs.example/l1.jpg".to_string(),
            "1".to_string(),
            "2025-12-01 04:40:59+00".to_string(),
            "2025-12-01 04:40:59+00".to_string(),
        ],
        vec![
            "l2".to_string(),
            "tafsir".to_string(),
            "Reflections, part 2".to_string(),
            String::new(),
            "13:20".to_string(),
            "https://videos.example/l2".to_string(),
            String::new(),
            "2".to_string(),
            "2025-12-02 10:00:00+00".to_string(),
            "2025-12-02 10:00:00+00".to_string(),
        ],
    ];
    csvio::write_csv(path, &MEDIA_HEADER, &rows).expect("write lectures csv");
}

/// The emitted migration, minus the read-only verification SELECTs, must
/// actually execute. Running it twice exercises ON CONFLICT (id) DO
/// NOTHING idempotence.
#[test]
fn generated_media_sql_inserts_and_is_idempotent() {
    let dir = temp_dir("quizprep-media-sql");
    let input = dir.join("lectures_rows.csv");
    let output = dir.join("import.sql");
    write_lectures_csv(&input);

    let specs = vec![MediaImportSpec {
        csv_path: input,
        // Schema-less table name so the statement runs under SQLite too.
        table: "lectures".to_string(),
        label: "lectures".to_string(),
        attribution_column: "speaker".to_string(),
    }];
    let reports =
        pipeline::media_import_sql(&specs, &output, DecodePolicy::Replace).expect("generate sql");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].count, 2);

    let sql = std::fs::read_to_string(&output).expect("read migration");
    assert!(sql.contains("ON CONFLICT (id) DO NOTHING;"));
    assert!(sql.contains("SELECT COUNT(*) AS total_lectures FROM lectures;"));

    let inserts: String = sql
        .lines()
        .filter(|l| !l.trim_start().starts_with("SELECT"))
        .collect::<Vec<_>>()
        .join("\n");

    let conn = Connection::open_in_memory().expect("open sqlite");
    conn.execute_batch(
        "CREATE TABLE lectures(
            id TEXT PRIMARY KEY,
            category_id TEXT,
            title TEXT,
            speaker TEXT,
            duration TEXT,
            video_url TEXT,
            thumbnail_url TEXT,
            order_index INTEGER,
            created_at TEXT,
            updated_at TEXT
        )",
    )
    .expect("create table");

    conn.execute_batch(&inserts).expect("first import");
    conn.execute_batch(&inserts).expect("re-import is a no-op");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM lectures", [], |r| r.get(0))
        .expect("count");
    assert_eq!(count, 2);

    // Embedded quotes survived the escaping round-trip.
    let title: String = conn
        .query_row("SELECT title FROM lectures WHERE id = 'l1'", [], |r| r.get(0))
        .expect("title");
    assert_eq!(title, "The Prophet's Mercy");
    let speaker: String = conn
        .query_row("SELECT speaker FROM lectures WHERE id = 'l1'", [], |r| r.get(0))
        .expect("speaker");
    assert_eq!(speaker, "Shaykh O'Connor");

    // Empty optionals landed as NULL, not empty strings.
    let null_speaker: Option<String> = conn
        .query_row("SELECT speaker FROM lectures WHERE id = 'l2'", [], |r| r.get(0))
        .expect("speaker l2");
    assert_eq!(null_speaker, None);

    // Durations were canonicalized to minutes:seconds.
    let d1: String = conn
        .query_row("SELECT duration FROM lectures WHERE id = 'l1'", [], |r| r.get(0))
        .expect("duration l1");
    assert_eq!(d1, "65:0");
    let d2: String = conn
        .query_row("SELECT duration FROM lectures WHERE id = 'l2'", [], |r| r.get(0))
        .expect("duration l2");
    assert_eq!(d2, "13:20");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_media_export_is_terminal() {
    let dir = temp_dir("quizprep-media-missing");
    let specs = vec![MediaImportSpec {
        csv_path: dir.join("no-such-export.csv"),
        table: "lectures".to_string(),
        label: "lectures".to_string(),
        attribution_column: "speaker".to_string(),
    }];
    let err = pipeline::media_import_sql(&specs, &dir.join("out.sql"), DecodePolicy::Replace)
        .expect_err("must fail");
    assert!(err.to_string().contains("no-such-export.csv"));
    let _ = std::fs::remove_dir_all(&dir);
}
