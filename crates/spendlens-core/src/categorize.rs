//! Keyword categorization of transaction descriptions
//!
//! The lexicon is an ordered list of categories, each with an ordered list of
//! keywords. A description gets the first category (in declaration order) that
//! has any keyword occurring in the lower-cased description. There is no
//! scoring: "market taxi receipt" goes to whichever of the two categories was
//! declared first, not to the longer or more specific keyword.
//!
//! First-match-wins is a product decision. Older keyword tables disagreed on
//! priority, so changing it means changing the lexicon order, not this code.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{FlowDirection, RawTransaction, Transaction, INCOME_CATEGORY, UNCATEGORIZED};

/// One category and its keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered category -> keywords table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryLexicon {
    entries: Vec<LexiconEntry>,
}

impl CategoryLexicon {
    /// Build a lexicon, keeping declaration order.
    ///
    /// Keywords are lower-cased and empty keywords dropped. Duplicate or empty
    /// category names are rejected.
    pub fn new(entries: Vec<LexiconEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for entry in entries {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Config("category name must not be empty".into()));
            }
            if !seen.insert(name.clone()) {
                return Err(Error::Config(format!("duplicate category: {}", name)));
            }

            let keywords = entry
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();

            normalized.push(LexiconEntry { name, keywords });
        }

        Ok(Self {
            entries: normalized,
        })
    }

    /// Convenience constructor from `(name, keywords)` pairs
    pub fn from_pairs<N, K>(pairs: impl IntoIterator<Item = (N, Vec<K>)>) -> Result<Self>
    where
        N: Into<String>,
        K: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, keywords)| LexiconEntry {
                    name: name.into(),
                    keywords: keywords.into_iter().map(Into::into).collect(),
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// Category names in declaration order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick the category for a description.
///
/// Returns [`UNCATEGORIZED`] when nothing matches, including for an empty
/// description.
pub fn categorize<'a>(description: &str, lexicon: &'a CategoryLexicon) -> &'a str {
    let desc_lower = description.to_lowercase();
    if desc_lower.trim().is_empty() {
        return UNCATEGORIZED;
    }

    for entry in &lexicon.entries {
        if let Some(keyword) = entry.keywords.iter().find(|k| desc_lower.contains(k.as_str())) {
            debug!(
                "Keyword '{}' matched '{}': {}",
                keyword, description, entry.name
            );
            return &entry.name;
        }
    }

    debug!("No keyword matched '{}'", description);
    UNCATEGORIZED
}

/// Categorize imported transactions.
///
/// Income always gets [`INCOME_CATEGORY`]; expenses go through the lexicon.
/// Amounts become non-negative magnitudes.
pub fn categorize_all(raw: &[RawTransaction], lexicon: &CategoryLexicon) -> Vec<Transaction> {
    let transactions: Vec<Transaction> = raw
        .iter()
        .map(|r| {
            let category = match r.flow {
                FlowDirection::Income => INCOME_CATEGORY,
                FlowDirection::Expense => categorize(&r.description, lexicon),
            };
            Transaction::new(r.date, r.amount, r.description.clone(), r.flow, category)
        })
        .collect();

    let uncategorized = transactions
        .iter()
        .filter(|t| t.category == UNCATEGORIZED)
        .count();
    debug!(
        "Categorized {} transactions ({} uncategorized)",
        transactions.len(),
        uncategorized
    );

    transactions
}
