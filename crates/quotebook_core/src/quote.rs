//! Quote record and category filter.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// A quote and the category it belongs to.
///
/// Quotes have no identity field: two quotes with the same text and
/// category are indistinguishable. Serialized field order is `text`,
/// then `category`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quote itself.
    pub text: String,
    /// Category name used for filtering.
    pub category: String,
}

impl Quote {
    /// Creates a validated quote with both fields trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `text` or `category` is empty
    /// after trimming.
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> CoreResult<Self> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() {
            return Err(CoreError::validation("text"));
        }
        if category.is_empty() {
            return Err(CoreError::validation("category"));
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Returns true if both fields are non-blank.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// Which quotes a listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote.
    #[default]
    All,
    /// Quotes whose category equals the name exactly.
    Category(String),
}

impl CategoryFilter {
    /// Parses a stored or user-supplied filter value.
    ///
    /// `"all"` and blank input mean [`CategoryFilter::All`]; anything else is
    /// taken as a category name after trimming.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    /// Returns true if `quote` passes this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => quote.category == *name,
        }
    }

    /// Returns the stored representation of this filter.
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(name) => name,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in collection used when nothing usable is stored.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote {
            text: "The only way to do great work is to love what you do.".into(),
            category: "Motivation".into(),
        },
        Quote {
            text: "Faith is taking the first step even when you don't see the whole staircase."
                .into(),
            category: "Faith".into(),
        },
    ]
}
