use serde::{Deserialize, Serialize};

use crate::bloom::classifier::{default_rules, CategoryRule, PatternClassifier};

/// Name rules that bucket meshes into bloom categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClassificationOptions {
    /// Rules, evaluated in category priority order.
    pub rules: Vec<CategoryRule>,
}

impl Default for ClassificationOptions {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl ClassificationOptions {
    /// Classifier built from these rules.
    #[must_use]
    pub fn classifier(&self) -> PatternClassifier {
        PatternClassifier::new(self.rules.clone())
    }
}
