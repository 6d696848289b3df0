// src/classify/relevance.rs
//! Relevance gate: exclusion vocabulary (and garbled-text markers) dominates,
//! then at least one regatta term must appear.

use super::Classifier;

impl Classifier {
    /// Decides on the lowercase concatenation of `title` and `details`.
    pub fn is_relevant(&self, title: &str, details: &str) -> bool {
        let combined = format!("{title} {details}").to_lowercase();
        if self.has_exclusion(&combined) {
            return false;
        }
        self.regatta.iter().any(|k| combined.contains(k.as_str()))
    }
}
