//! Token index for contains-style search.
//!
//! Each indexed text is folded once at build time. The index maps every
//! token of every folded text to the positions that contain it, so a query
//! only has to scan the token vocabulary instead of every record.

use std::collections::HashMap;

use crate::normalize::{fold, tokens};

/// Folded texts plus a token → positions reverse index.
#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    /// Folded text per position.
    folded: Vec<String>,
    /// Token → ascending positions whose folded text contains the token.
    postings: HashMap<String, Vec<usize>>,
}

impl TextIndex {
    /// Builds an index over `texts`; positions follow iteration order.
    pub fn build<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::default();

        for (position, text) in texts.into_iter().enumerate() {
            let folded = fold(text);
            for token in tokens(&folded) {
                let postings = index.postings.entry(token.to_string()).or_default();
                if postings.last() != Some(&position) {
                    postings.push(position);
                }
            }
            index.folded.push(folded);
        }

        index
    }

    /// Returns the positions whose folded text contains `folded_query`,
    /// in ascending order.
    ///
    /// `folded_query` must already be folded with [`fold`]. An empty query
    /// matches nothing.
    pub fn matches(&self, folded_query: &str) -> Vec<usize> {
        if folded_query.is_empty() {
            return Vec::new();
        }

        // Every query token is a substring of some token of a matching
        // text, so the longest one gives the narrowest candidate set.
        let Some(pivot) = tokens(folded_query).max_by_key(|t| t.len()) else {
            return self.scan(folded_query);
        };

        let mut candidates: Vec<usize> = self
            .postings
            .iter()
            .filter(|(token, _)| token.contains(pivot))
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .filter(|&p| self.folded[p].contains(folded_query))
            .collect()
    }

    /// Linear scan, for queries with no alphanumeric token.
    fn scan(&self, folded_query: &str) -> Vec<usize> {
        self.folded
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(folded_query))
            .map(|(p, _)| p)
            .collect()
    }

    /// Returns the folded text at `position`.
    pub fn folded(&self, position: usize) -> Option<&str> {
        self.folded.get(position).map(String::as_str)
    }

    /// Number of indexed texts.
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Number of distinct tokens.
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }
}
