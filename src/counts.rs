//! Tallies of which token follows which. See [`TransitionCountsBuilder`].

use hashbrown::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::token::{split_whitespace, BigramRef, Token, TokenRef};

/// How many times each successor was seen right after one predecessor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuccessorCounts {
    map: HashMap<Token, u64>,
}

impl SuccessorCounts {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Add an occurrence of this token.
    pub fn add_token(&mut self, token: TokenRef<'_>) {
        match self.map.get_mut(token) {
            Some(n) => {
                *n += 1;
            }
            None => {
                self.map.insert(token.to_string(), 1);
            }
        }
    }

    /// Number of times `successor` was seen. Unseen successors have a count of 0.
    pub fn count(&self, successor: TokenRef<'_>) -> u64 {
        self.map.get(successor).copied().unwrap_or(0)
    }

    /// Sum of all successor counts.
    pub fn total(&self) -> u64 {
        self.map.values().sum()
    }

    /// Number of distinct successors.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, u64)> {
        self.map.iter().map(|(t, n)| (t, *n))
    }

    /// The `n` most common successors, most common first. Ties are ordered by token.
    pub fn most_common(&self, n: usize) -> Vec<(&Token, u64)> {
        self.iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .take(n)
            .collect()
    }
}

/// Counts of every adjacent `(predecessor, successor)` pair in a corpus. Built once by a
/// [`TransitionCountsBuilder`] and never changed afterwards.
///
/// ```
/// # use bigramish::TransitionCounts;
/// let tokens = bigramish::token::split_whitespace("the cat sat on the mat the cat ran");
/// let counts = TransitionCounts::from_tokens(&tokens);
///
/// let the = counts.get("the").unwrap();
/// assert_eq!(the.count("cat"), 2);
/// assert_eq!(the.count("mat"), 1);
/// assert_eq!(counts.total(), tokens.len() as u64 - 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionCounts {
    map: HashMap<Token, SuccessorCounts>,
}

impl TransitionCounts {
    pub fn builder() -> TransitionCountsBuilder {
        TransitionCountsBuilder::new()
    }

    /// Counts all adjacent pairs in `tokens`. Fewer than two tokens give empty counts.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut b = Self::builder();
        b.feed_tokens(tokens.iter().map(String::as_str));
        b.build()
    }

    /// The successors seen after `predecessor`, or `None` if it was never followed by anything.
    pub fn get(&self, predecessor: TokenRef<'_>) -> Option<&SuccessorCounts> {
        self.map.get(predecessor)
    }

    /// Number of distinct predecessors.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Sum of all counts; for a single fed corpus of `n >= 2` tokens this is `n - 1`.
    pub fn total(&self) -> u64 {
        self.map.values().map(SuccessorCounts::total).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &SuccessorCounts)> {
        self.map.iter()
    }
}

/// Builds [`TransitionCounts`] by being fed tokens and keeping track of how often one token
/// follows another.
#[derive(Clone, Debug, Default)]
pub struct TransitionCountsBuilder {
    map: HashMap<Token, SuccessorCounts>,
}

impl TransitionCountsBuilder {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Uses up the builder. An unfed builder gives empty counts.
    pub fn build(self) -> TransitionCounts {
        debug!(
            predecessors = self.map.len(),
            "built transition counts"
        );
        TransitionCounts { map: self.map }
    }

    /// Add the occurrence of `next` following `prev`.
    pub fn add_occurrence(&mut self, (prev, next): BigramRef<'_>) {
        match self.map.get_mut(prev) {
            Some(c) => {
                c.add_token(next);
            }
            None => {
                let mut c = SuccessorCounts::new();
                c.add_token(next);
                self.map.insert(prev.to_string(), c);
            }
        }
    }

    /// Counts every adjacent pair in `tokens`. Separate calls are separate sequences: the last
    /// token of one feed is not paired with the first token of the next.
    pub fn feed_tokens<'a>(&mut self, tokens: impl IntoIterator<Item = TokenRef<'a>>) {
        for pair in tokens.into_iter().tuple_windows() {
            self.add_occurrence(pair);
        }
    }

    /// Feeds the builder with text, split with [`split_whitespace()`].
    pub fn feed_str(&mut self, content: &str) {
        let tokens = split_whitespace(content);
        self.feed_tokens(tokens.iter().map(String::as_str));
    }
}
