use std::path::{Path, PathBuf};

use quizprep::config::PipelineConfig;
use quizprep::pipeline;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

// Positional arguments override the defaults:
//   quiz_import_sql [cleaned.csv] [migration.sql] [config.json]
fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = PathBuf::from(arg_or(&args, 0, "quiz_questions_clean_50_per_category.csv"));
    let output = PathBuf::from(arg_or(&args, 1, "migrations/006_import_quiz_data.sql"));
    let config = match args.get(2) {
        Some(path) => PipelineConfig::load(Path::new(path))?,
        None => PipelineConfig::default(),
    };

    let report = pipeline::quiz_import_sql(&input, &output, &config)?;
    println!(
        "Generated SQL migration with {} quizzes and {} questions",
        report.categories, report.questions
    );
    println!("Output: {}", output.display());
    Ok(())
}

fn arg_or<'a>(args: &'a [String], index: usize, default: &'a str) -> &'a str {
    args.get(index).map(String::as_str).unwrap_or(default)
}
