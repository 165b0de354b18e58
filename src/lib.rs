//! Data-preparation pipeline for quiz/content CSV exports: filter
//! placeholder rows, backfill per-category quotas from question banks,
//! and emit cleaned CSV or SQL import migrations.

pub mod bank;
pub mod classify;
pub mod config;
pub mod csvio;
pub mod duration;
pub mod normalize;
pub mod pipeline;
pub mod quota;
pub mod sqlgen;
