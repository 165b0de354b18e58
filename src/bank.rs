use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::normalize::RawQuestion;

/// One synthetic question in a category bank. Banks live in external
/// `banks/<category>.json` data files so content edits never touch code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BankQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: u8,
    pub explanation: String,
}

impl BankQuestion {
    pub fn to_raw(&self) -> RawQuestion {
        RawQuestion {
            id: None,
            prompt: self.question.clone(),
            options: Some(serde_json::to_string(&self.options).expect("string array encodes")),
            correct: Some(self.correct_answer.to_string()),
            explanation: self.explanation.clone(),
            created_at: None,
        }
    }
}

/// All loaded banks, keyed by category. A category with no bank file is
/// simply an empty bank; quota shortfall reporting covers the rest.
#[derive(Debug, Default)]
pub struct Bank {
    by_category: HashMap<String, Vec<BankQuestion>>,
}

impl Bank {
    pub fn empty() -> Bank {
        Bank::default()
    }

    /// Load every `<category>.json` in `dir`. A missing directory yields
    /// an empty bank; an unreadable or malformed file is terminal.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Bank> {
        let mut by_category = HashMap::new();
        if !dir.is_dir() {
            return Ok(Bank::default());
        }
        for ent in std::fs::read_dir(dir)
            .with_context(|| format!("cannot read bank directory: {}", dir.display()))?
        {
            let path = ent?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(category) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read bank file: {}", path.display()))?;
            let questions: Vec<BankQuestion> = serde_json::from_str(&text)
                .with_context(|| format!("malformed bank file: {}", path.display()))?;
            by_category.insert(category.to_string(), questions);
        }
        Ok(Bank { by_category })
    }

    pub fn insert(&mut self, category: &str, questions: Vec<BankQuestion>) {
        self.by_category.insert(category.to_string(), questions);
    }

    /// Up to `needed` synthetic records for `category`, in bank order.
    pub fn take(&self, category: &str, needed: usize) -> Vec<RawQuestion> {
        self.by_category
            .get(category)
            .map(|qs| qs.iter().take(needed).map(BankQuestion::to_raw).collect())
            .unwrap_or_default()
    }

    pub fn available(&self, category: &str) -> usize {
        self.by_category.get(category).map(Vec::len).unwrap_or(0)
    }
}
