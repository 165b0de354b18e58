use std::path::{Path, PathBuf};

use quizprep::bank::Bank;
use quizprep::config::PipelineConfig;
use quizprep::pipeline;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

// Positional arguments override the defaults:
//   clean_quiz_csv [input.csv] [output.csv] [banks_dir] [config.json]
fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = PathBuf::from(arg_or(&args, 0, "quiz_questions_rows.csv"));
    let output = PathBuf::from(arg_or(&args, 1, "quiz_questions_clean_50_per_category.csv"));
    let banks_dir = PathBuf::from(arg_or(&args, 2, "banks"));
    let config = match args.get(3) {
        Some(path) => PipelineConfig::load(Path::new(path))?,
        None => PipelineConfig::default(),
    };

    let bank = Bank::load_dir(&banks_dir)?;
    let run_timestamp = chrono::Utc::now().to_rfc3339();
    let summary = pipeline::clean_quiz_csv(&input, &output, &bank, &config, &run_timestamp)?;

    print!("{}", summary);
    println!("Output file: {}", output.display());
    Ok(())
}

fn arg_or<'a>(args: &'a [String], index: usize, default: &'a str) -> &'a str {
    args.get(index).map(String::as_str).unwrap_or(default)
}
