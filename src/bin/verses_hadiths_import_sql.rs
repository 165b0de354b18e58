use std::path::PathBuf;

use quizprep::csvio::DecodePolicy;
use quizprep::pipeline::{self, ScriptureImportSpec};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

// Positional arguments override the defaults:
//   verses_hadiths_import_sql [verses.csv] [hadiths.csv] [migration.sql]
fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let spec = ScriptureImportSpec {
        verses_csv: PathBuf::from(arg_or(&args, 0, "quran_verses_rows.csv")),
        hadiths_csv: PathBuf::from(arg_or(&args, 1, "hadiths_rows.csv")),
        verses_table: "public.quran_verses".to_string(),
        hadiths_table: "public.hadiths".to_string(),
    };
    let output = PathBuf::from(arg_or(&args, 2, "migrations/007_import_verses_hadiths.sql"));

    let report = pipeline::verses_hadiths_import_sql(&spec, &output, DecodePolicy::Replace)?;
    println!("Imported {} verses", report.verses);
    println!("Imported {} hadiths", report.hadiths);
    println!("SQL migration generated: {}", output.display());
    Ok(())
}

fn arg_or<'a>(args: &'a [String], index: usize, default: &'a str) -> &'a str {
    args.get(index).map(String::as_str).unwrap_or(default)
}
