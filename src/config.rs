use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::csvio::DecodePolicy;

/// One quiz category: the quota bucket key plus the metadata emitted
/// into the `quizzes` upsert of the import migration.
#[derive(Clone, Debug, Deserialize)]
pub struct CategorySpec {
    pub quiz_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub order_index: i64,
    /// Stable row id for the upsert; generated per run when absent.
    #[serde(default)]
    pub id: Option<String>,
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

fn default_color() -> String {
    "#9E9E9E".to_string()
}

/// Run configuration, loadable from a JSON file. Defaults reproduce the
/// shipped category set and the 50-per-category quota.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub target_per_category: usize,
    pub categories: Vec<CategorySpec>,
    pub decode: DecodePolicy,
}

impl Default for PipelineConfig {
    fn default() -> PipelineConfig {
        let cat = |quiz_id: &str, title: &str, description: &str, difficulty: &str, color: &str, order_index: i64| {
            CategorySpec {
                quiz_id: quiz_id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                difficulty: difficulty.to_string(),
                color: color.to_string(),
                order_index,
                id: None,
            }
        };
        PipelineConfig {
            target_per_category: 50,
            // Processing order; order_index is the display order.
            categories: vec![
                cat("quran", "Quran Knowledge", "Test your knowledge of the Holy Quran", "Medium", "#4CAF50", 1),
                cat("seerah", "Seerah Quiz", "Learn about the life of Prophet Muhammad \u{fdfa}", "Easy", "#2196F3", 2),
                cat("history", "Islamic History", "Explore the rich history of Islam", "Hard", "#FF9800", 3),
                cat("pillars", "Pillars of Islam", "Test your knowledge of the five pillars", "Easy", "#F44336", 5),
                cat("fiqh", "Fiqh Basics", "Understanding Islamic jurisprudence", "Medium", "#9C27B0", 4),
                cat("prophets", "Prophets in Islam", "Learn about the prophets mentioned in the Quran", "Medium", "#00BCD4", 6),
            ],
            decode: DecodePolicy::Replace,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> anyhow::Result<PipelineConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file: {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("malformed config file: {}", path.display()))?;
        anyhow::ensure!(
            config.target_per_category > 0,
            "target_per_category must be positive"
        );
        Ok(config)
    }
}
