use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed set of expense categories. Declaration order is the order used in
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive match against the category names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category '{0}' (expected one of: Food, Transport, Shopping, Health, Other)")]
pub struct ParseCategoryError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("food".parse::<Category>(), Ok(Category::Food));
        assert_eq!(" TRANSPORT ".parse::<Category>(), Ok(Category::Transport));
    }

    #[test]
    fn test_unknown_category() {
        let err = "Rent".parse::<Category>().unwrap_err();
        assert_eq!(err, ParseCategoryError("Rent".to_string()));
        assert!(err.to_string().contains("Rent"));
    }

    #[test]
    fn test_report_order_follows_declaration() {
        let mut shuffled = vec![Category::Other, Category::Food, Category::Health];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Category::Food, Category::Health, Category::Other]
        );
    }
}
