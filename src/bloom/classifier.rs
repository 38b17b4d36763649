//! Mesh classification into bloom categories.
//!
//! Classification is a strategy: the coordination center only sees the
//! [`ObjectClassifier`] trait. The stock [`PatternClassifier`] evaluates
//! data-driven substring rules in category priority order, first match wins,
//! so a mesh can never land in two categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic group of meshes sharing one visual treatment.
///
/// Declaration order is classification priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ObjectCategory {
    /// The two chrome rings around the eye.
    EyeRings,
    /// The iris disc.
    Iris,
    /// Reveal rings and bloom areas.
    MagicRings,
    /// Big and little arms.
    Arms,
}

impl ObjectCategory {
    /// Every category, in priority order.
    pub const ALL: [Self; 4] = [Self::EyeRings, Self::Iris, Self::MagicRings, Self::Arms];

    /// Canonical name, as used in parameter keys (`eyeRings.Anneaux_Eye_Ext`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EyeRings => "eyeRings",
            Self::Iris => "iris",
            Self::MagicRings => "magicRings",
            Self::Arms => "arms",
        }
    }

    /// Parse a category name. Accepts the canonical camelCase form and
    /// `snake_case`, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == folded)
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which category, if any, a mesh belongs to.
pub trait ObjectClassifier {
    /// Category of the mesh called `mesh_name`.
    fn classify(&self, mesh_name: &str) -> Option<ObjectCategory>;
}

impl<F> ObjectClassifier for F
where
    F: Fn(&str) -> Option<ObjectCategory>,
{
    fn classify(&self, mesh_name: &str) -> Option<ObjectCategory> {
        self(mesh_name)
    }
}

/// A substring predicate for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category assigned on a match.
    pub category: ObjectCategory,
    /// The lowercased name must contain at least one of these.
    pub any_of: Vec<String>,
    /// The lowercased name must contain none of these.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub none_of: Vec<String>,
}

impl CategoryRule {
    /// Rule matching names that contain any of `any_of`.
    #[must_use]
    pub fn new(category: ObjectCategory, any_of: &[&str]) -> Self {
        Self {
            category,
            any_of: any_of.iter().map(|s| s.to_lowercase()).collect(),
            none_of: Vec::new(),
        }
    }

    /// Builder: names containing any of `none_of` are excluded.
    #[must_use]
    pub fn excluding(mut self, none_of: &[&str]) -> Self {
        self.none_of = none_of.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    /// Whether an already lowercased name satisfies the rule.
    #[must_use]
    pub fn matches(&self, lowercase_name: &str) -> bool {
        self.any_of.iter().any(|p| lowercase_name.contains(p.as_str()))
            && !self
                .none_of
                .iter()
                .any(|p| lowercase_name.contains(p.as_str()))
    }
}

/// Rules for the eye rig.
#[must_use]
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(ObjectCategory::EyeRings, &["anneaux_eye"]),
        CategoryRule::new(ObjectCategory::Iris, &["iris"]),
        CategoryRule::new(ObjectCategory::MagicRings, &["ring_sg"]),
        CategoryRule::new(ObjectCategory::MagicRings, &["ring"]).excluding(&["eye"]),
        CategoryRule::new(ObjectCategory::Arms, &["bigarm", "littlearm", "bras"]),
    ]
}

/// Case-insensitive substring classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternClassifier {
    rules: Vec<CategoryRule>,
}

impl PatternClassifier {
    /// Build from rules. Rules are stably re-ordered by category priority,
    /// so the order they are listed in only matters within a category.
    #[must_use]
    pub fn new(mut rules: Vec<CategoryRule>) -> Self {
        for rule in &mut rules {
            rule.any_of.iter_mut().for_each(|p| *p = p.to_lowercase());
            rule.none_of.iter_mut().for_each(|p| *p = p.to_lowercase());
        }
        rules.sort_by_key(|r| r.category);
        Self { rules }
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl ObjectClassifier for PatternClassifier {
    fn classify(&self, mesh_name: &str) -> Option<ObjectCategory> {
        let name = mesh_name.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&name))
            .map(|r| r.category)
    }
}
