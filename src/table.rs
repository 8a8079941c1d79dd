//! The mutable probability table: built from [`TransitionCounts`], then open to overrides.

use hashbrown::HashMap;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::counts::TransitionCounts;
use crate::distribution::TokenDistribution;
use crate::error::{BigramError, Result};
use crate::token::{Token, TokenRef};

/// For every known predecessor, the distribution of the token that follows it.
///
/// Derived distributions hold `count / total` and sum to 1. Any entry can later be replaced or
/// edited with arbitrary non-negative weights, and the sampler reads whatever is current; there
/// is no way for the table to tell learned entries from injected ones.
///
/// ```
/// # use bigramish::TransitionCounts;
/// # use rand::{rngs::StdRng, SeedableRng};
/// let tokens = bigramish::token::split_whitespace("ROMEO: Is the day so young? ROMEO: Ay me!");
/// let mut table = TransitionCounts::from_tokens(&tokens).normalize().unwrap();
///
/// table.replace("ROMEO:", [("Juliet", 1.0)]).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(456);
/// let text = table.generate(&mut rng, &tokens, 2, Some("ROMEO:")).unwrap();
/// assert_eq!(text, vec!["ROMEO:", "Juliet"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionTable {
    pub(crate) map: HashMap<Token, TokenDistribution>,
}

impl TransitionCounts {
    /// Turns counts into probabilities: every successor gets its count divided by the total
    /// count of its predecessor. Successors are ordered by token, so the same counts always give
    /// the same table and the same samples for a given random source.
    ///
    /// A predecessor without successors can not come out of a
    /// [`TransitionCountsBuilder`](crate::TransitionCountsBuilder); if one is found anyway,
    /// [`BigramError::InternalInvariant`] is returned.
    pub fn normalize(&self) -> Result<TransitionTable> {
        let mut map = HashMap::with_capacity(self.len());
        for (predecessor, successors) in self.iter() {
            let total = successors.total();
            if total == 0 {
                return Err(BigramError::InternalInvariant(format!(
                    "predecessor {predecessor:?} has no successors"
                )));
            }
            let pairs = successors
                .iter()
                .sorted_by(|a, b| a.0.cmp(b.0))
                .map(|(t, n)| (t.clone(), n as f64 / total as f64));
            let dist = TokenDistribution::new(predecessor, pairs).map_err(|e| {
                BigramError::InternalInvariant(format!("normalizing {predecessor:?}: {e}"))
            })?;
            map.insert(predecessor.clone(), dist);
        }
        debug!(predecessors = map.len(), "normalized transition counts");

        Ok(TransitionTable { map })
    }
}

impl TransitionTable {
    /// The current distribution after `predecessor`, or `None` if there is none.
    pub fn query(&self, predecessor: TokenRef<'_>) -> Option<&TokenDistribution> {
        self.map.get(predecessor)
    }

    pub fn contains(&self, predecessor: TokenRef<'_>) -> bool {
        self.map.contains_key(predecessor)
    }

    /// Number of predecessors with a distribution.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn predecessors(&self) -> impl Iterator<Item = &Token> {
        self.map.keys()
    }

    /// Replaces everything that may follow `predecessor` with `pairs`. Weights are relative and
    /// need not sum to 1. Other entries are untouched.
    ///
    /// The weights are validated before anything changes; on error the old entry (or its
    /// absence) stays as it was. See [`TokenDistribution::new()`] for the rules.
    pub fn replace<S>(
        &mut self,
        predecessor: TokenRef<'_>,
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<()>
    where
        S: Into<Token>,
    {
        let dist = TokenDistribution::new(predecessor, pairs).map_err(|e| {
            warn!(predecessor, error = %e, "rejected override");
            e
        })?;
        info!(predecessor, successors = dist.len(), "replaced distribution");
        self.map.insert(predecessor.to_string(), dist);
        Ok(())
    }

    /// Sets the weight of a single successor of `predecessor`. An unknown predecessor gets a new
    /// distribution with only this successor.
    pub fn set_weight(
        &mut self,
        predecessor: TokenRef<'_>,
        successor: TokenRef<'_>,
        weight: f64,
    ) -> Result<()> {
        let res = match self.map.get_mut(predecessor) {
            Some(dist) => dist.set_weight(predecessor, successor, weight),
            None => TokenDistribution::new(predecessor, [(successor, weight)]).map(|dist| {
                self.map.insert(predecessor.to_string(), dist);
            }),
        };
        match &res {
            Ok(()) => info!(predecessor, successor, weight, "set transition weight"),
            Err(e) => warn!(predecessor, successor, error = %e, "rejected weight"),
        }
        res
    }

    /// Drops the distribution of `predecessor`, returning it. Afterwards the sampler treats it
    /// like a token it has never seen.
    pub fn remove(&mut self, predecessor: TokenRef<'_>) -> Option<TokenDistribution> {
        self.map.remove(predecessor)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::BigramError;
    use crate::token::split_whitespace;
    use crate::TransitionCounts;

    const CAT: &str = "the cat sat on the mat the cat ran";

    #[test]
    fn normalizes_counts() {
        let table = TransitionCounts::from_tokens(&split_whitespace(CAT))
            .normalize()
            .unwrap();
        let the = table.query("the").unwrap();
        assert!((the.weight("cat").unwrap() - 0.667).abs() < 1e-3);
        assert!((the.weight("mat").unwrap() - 0.333).abs() < 1e-3);
        assert!(table.query("ran").is_none());
    }

    #[test]
    fn derived_distributions_sum_to_one() {
        let text = "First Citizen: Before we proceed any further, hear me speak. \
                    All: Speak, speak. First Citizen: You are all resolved rather to die \
                    than to famish? All: Resolved. resolved. First Citizen: First, you know \
                    Caius Marcius is chief enemy to the people.";
        let table = TransitionCounts::from_tokens(&split_whitespace(text))
            .normalize()
            .unwrap();
        assert!(!table.is_empty());
        for p in table.predecessors() {
            let sum: f64 = table.query(p).unwrap().iter().map(|(_, w)| w).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{p}: {sum}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let counts = TransitionCounts::from_tokens(&split_whitespace(CAT));
        assert_eq!(counts.normalize().unwrap(), counts.normalize().unwrap());
    }

    #[test]
    fn empty_counts_give_empty_table() {
        let table = TransitionCounts::default().normalize().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn replace_then_query_returns_supplied() {
        let mut table = TransitionCounts::from_tokens(&split_whitespace(CAT))
            .normalize()
            .unwrap();
        let supplied = [("banana", 0.7), ("pizza", 0.1), ("tacos", 0.1), ("cookies", 0.1)];
        // Both over an existing entry and a new one
        for predecessor in ["the", "love"] {
            table.replace(predecessor, supplied).unwrap();
            let got: Vec<_> = table
                .query(predecessor)
                .unwrap()
                .iter()
                .map(|(t, w)| (t.as_str(), w))
                .collect();
            assert_eq!(got, supplied);
        }
        // Others are untouched
        assert_eq!(table.query("cat").unwrap().weight("sat"), Some(0.5));
    }

    #[test]
    fn rejected_replace_leaves_entry() {
        let mut table = TransitionCounts::from_tokens(&split_whitespace(CAT))
            .normalize()
            .unwrap();
        let before = table.clone();
        let err = table
            .replace("the", [("cat", 1.0), ("dog", -2.0)])
            .unwrap_err();
        assert!(matches!(err, BigramError::InvalidWeight { .. }));
        assert!(table.replace("on", [("x", f64::NAN)]).is_err());
        assert!(table.replace("nowhere", [("x", 0.0)]).is_err());
        assert_eq!(table, before);
    }

    #[test]
    fn set_weight_edits_one_successor() {
        let mut table = TransitionCounts::from_tokens(&split_whitespace(CAT))
            .normalize()
            .unwrap();
        table.set_weight("the", "dog", 1.0).unwrap();
        let the = table.query("the").unwrap();
        assert_eq!(the.len(), 3);
        assert!((the.total_weight() - 2.0).abs() < 1e-12);
        assert!((the.probability("dog") - 0.5).abs() < 1e-12);

        table.set_weight("Once", "upon", 1.0).unwrap();
        assert_eq!(table.query("Once").unwrap().weight("upon"), Some(1.0));

        assert!(table.set_weight("the", "cat", f64::INFINITY).is_err());
        assert!(table.set_weight("never", "x", -1.0).is_err());
        assert!(!table.contains("never"));
    }

    #[test]
    fn remove_forgets_predecessor() {
        let mut table = TransitionCounts::from_tokens(&split_whitespace(CAT))
            .normalize()
            .unwrap();
        assert!(table.remove("the").is_some());
        assert!(!table.contains("the"));
        assert!(table.remove("the").is_none());
    }
}
