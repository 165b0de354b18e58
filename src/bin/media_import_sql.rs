use std::path::PathBuf;

use quizprep::csvio::DecodePolicy;
use quizprep::pipeline::{self, MediaImportSpec};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

// Positional arguments override the defaults:
//   media_import_sql [lectures.csv] [recitations.csv] [migration.sql]
fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let lectures = arg_or(&args, 0, "lectures_rows.csv");
    let recitations = arg_or(&args, 1, "recitations_rows.csv");
    let output = PathBuf::from(arg_or(&args, 2, "migrations/009_import_lectures_recitations.sql"));

    let specs = vec![
        MediaImportSpec {
            csv_path: PathBuf::from(lectures),
            table: "public.lectures".to_string(),
            label: "lectures".to_string(),
            attribution_column: "speaker".to_string(),
        },
        MediaImportSpec {
            csv_path: PathBuf::from(recitations),
            table: "public.recitations".to_string(),
            label: "recitations".to_string(),
            attribution_column: "reciter".to_string(),
        },
    ];

    let reports = pipeline::media_import_sql(&specs, &output, DecodePolicy::Replace)?;
    for report in &reports {
        println!("Imported {} {}", report.count, report.label);
    }
    println!("SQL migration generated: {}", output.display());
    Ok(())
}

fn arg_or<'a>(args: &'a [String], index: usize, default: &'a str) -> &'a str {
    args.get(index).map(String::as_str).unwrap_or(default)
}
