use serde::{Deserialize, Serialize};

/// Label for any book count missing from the table.
pub const FALLBACK_LABEL: &str = "other";

/// Maps an exact book count to a category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    pub label: String,
    pub books: usize,
}

impl TypeRule {
    pub fn new(label: &str, books: usize) -> Self {
        Self {
            label: label.to_string(),
            books,
        }
    }
}

pub fn default_rules() -> Vec<TypeRule> {
    vec![
        // 46 OT + 27 NT, deuterocanonicals included
        TypeRule::new("catholic", 73),
        // 39 OT + 27 NT
        TypeRule::new("protestant", 66),
    ]
}

/// Exact-count lookup over an ordered rule table. The first matching rule
/// wins; counts with no rule fall back to [`FALLBACK_LABEL`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<TypeRule>,
}

impl Classifier {
    pub fn new(rules: Vec<TypeRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, books: usize) -> &str {
        self.rules
            .iter()
            .find(|r| r.books == books)
            .map(|r| r.label.as_str())
            .unwrap_or(FALLBACK_LABEL)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_counts() {
        let c = Classifier::default();
        assert_eq!(c.classify(73), "catholic");
        assert_eq!(c.classify(66), "protestant");
    }

    #[test]
    fn unknown_counts_fall_back() {
        let c = Classifier::default();
        for n in [0, 1, 27, 39, 65, 67, 72, 74, 81, usize::MAX] {
            assert_eq!(c.classify(n), FALLBACK_LABEL, "count {n}");
        }
    }

    #[test]
    fn first_rule_wins_on_shared_count() {
        let c = Classifier::new(vec![TypeRule::new("a", 10), TypeRule::new("b", 10)]);
        assert_eq!(c.classify(10), "a");
    }

    #[test]
    fn empty_table_is_all_other() {
        let c = Classifier::new(Vec::new());
        assert_eq!(c.classify(73), FALLBACK_LABEL);
    }
}
