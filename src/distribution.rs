//! [`TokenDistribution`] are representations of how likely each successor [`Token`] is, and are
//! paired up with a predecessor in a [`TransitionTable`](crate::TransitionTable).
//!
//! Weights are relative. A distribution derived from counts sums to 1, but an overridden one
//! may sum to anything positive; sampling always divides by the current total, and
//! [`TokenDistribution::probability()`] reports the same normalized value.

use hashbrown::HashMap;
use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, WeightedAliasIndex};

use crate::error::{BigramError, Result};
use crate::token::{Token, TokenRef};

/// A distribution of choices and their likelyhood.
#[derive(Clone, Debug)]
pub struct TokenDistribution {
    /// Mappings of index in choices to their likelyhood. Rebuilt whenever a weight changes.
    dist: WeightedAliasIndex<f64>,
    /// The actual choices
    choices: Vec<Token>,
    /// Weights as supplied, index aligned with `choices`.
    weights: Vec<f64>,
    /// Position of each choice in `choices`.
    index: HashMap<Token, usize>,
}

impl TokenDistribution {
    /// Creates a distribution for `predecessor` from `(successor, weight)` pairs, keeping their
    /// order. A repeated successor keeps its first position and its last weight.
    ///
    /// Fails with [`BigramError::InvalidWeight`] for a negative or non-finite weight, and with
    /// [`BigramError::NoPositiveWeight`] if nothing could ever be sampled.
    pub fn new<S>(
        predecessor: TokenRef<'_>,
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self>
    where
        S: Into<Token>,
    {
        let mut index: HashMap<Token, usize> = HashMap::new();
        let mut choices = Vec::new();
        let mut weights = Vec::new();
        for (successor, weight) in pairs {
            let successor = successor.into();
            check_weight(predecessor, &successor, weight)?;
            match index.get(&successor) {
                Some(&i) => weights[i] = weight,
                None => {
                    index.insert(successor.clone(), choices.len());
                    choices.push(successor);
                    weights.push(weight);
                }
            }
        }

        Self::from_parts(predecessor, choices, weights, index)
    }

    fn from_parts(
        predecessor: TokenRef<'_>,
        choices: Vec<Token>,
        weights: Vec<f64>,
        index: HashMap<Token, usize>,
    ) -> Result<Self> {
        let total: f64 = weights.iter().sum();
        if choices.is_empty() || !(total.is_finite() && total > 0.0) {
            return Err(BigramError::NoPositiveWeight {
                predecessor: predecessor.to_string(),
            });
        }
        // The alias table caps each weight at `f64::MAX / n`, so it gets the weights scaled to
        // sum to 1. Sampling only depends on the ratios.
        let scaled: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let dist = WeightedAliasIndex::new(scaled).map_err(|e| {
            BigramError::InternalInvariant(format!(
                "alias table for {predecessor:?} rejected normalized weights: {e}"
            ))
        })?;

        Ok(Self {
            dist,
            choices,
            weights,
            index,
        })
    }

    /// Samples a successor, each with chance `weight / total_weight()`.
    pub fn sample(&self, rng: &mut impl Rng) -> &Token {
        &self.choices[self.dist.sample(rng)]
    }

    /// The weight stored for `successor`, as supplied or as derived from counts.
    pub fn weight(&self, successor: TokenRef<'_>) -> Option<f64> {
        self.position(successor).map(|i| self.weights[i])
    }

    /// The chance of `successor` being sampled. 0 for unknown successors.
    pub fn probability(&self, successor: TokenRef<'_>) -> f64 {
        self.weight(successor)
            .map(|w| w / self.total_weight())
            .unwrap_or(0.0)
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Always false; a distribution can not be built without a successor.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, f64)> {
        self.choices.iter().zip(self.weights.iter().copied())
    }

    /// The `n` heaviest successors, heaviest first. Ties are ordered by token.
    pub fn most_likely(&self, n: usize) -> Vec<(&Token, f64)> {
        self.iter()
            .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .take(n)
            .collect()
    }

    /// Sets the weight of one successor, adding it if it is new. On error `self` is unchanged.
    pub fn set_weight(
        &mut self,
        predecessor: TokenRef<'_>,
        successor: TokenRef<'_>,
        weight: f64,
    ) -> Result<()> {
        check_weight(predecessor, successor, weight)?;
        let mut choices = self.choices.clone();
        let mut weights = self.weights.clone();
        let mut index = self.index.clone();
        match self.position(successor) {
            Some(i) => weights[i] = weight,
            None => {
                index.insert(successor.to_string(), choices.len());
                choices.push(successor.to_string());
                weights.push(weight);
            }
        }
        *self = Self::from_parts(predecessor, choices, weights, index)?;
        Ok(())
    }

    fn position(&self, successor: TokenRef<'_>) -> Option<usize> {
        self.index.get(successor).copied()
    }
}

impl PartialEq for TokenDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.choices == other.choices && self.weights == other.weights
    }
}

fn check_weight(predecessor: TokenRef<'_>, successor: TokenRef<'_>, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(BigramError::InvalidWeight {
            predecessor: predecessor.to_string(),
            successor: successor.to_string(),
            weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::TokenDistribution;
    use crate::error::BigramError;

    #[test]
    fn keeps_order_and_last_duplicate_weight() {
        let d = TokenDistribution::new("a", [("time", 0.4), ("great", 0.3), ("time", 0.5)]).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(
            d.iter().collect::<Vec<_>>(),
            vec![(&"time".to_string(), 0.5), (&"great".to_string(), 0.3)]
        );
    }

    #[test]
    fn rejects_bad_weights() {
        for w in [-0.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = TokenDistribution::new("love", [("banana", 1.0), ("pizza", w)]).unwrap_err();
            assert!(
                matches!(err, BigramError::InvalidWeight { ref successor, .. } if successor == "pizza"),
                "{err:?}"
            );
        }
    }

    #[test]
    fn rejects_nothing_to_sample() {
        let empty: [(&str, f64); 0] = [];
        assert_eq!(
            TokenDistribution::new("x", empty).unwrap_err(),
            BigramError::NoPositiveWeight {
                predecessor: "x".to_string()
            }
        );
        assert!(TokenDistribution::new("x", [("a", 0.0), ("b", 0.0)]).is_err());
        assert!(TokenDistribution::new("x", [("a", f64::MAX), ("b", f64::MAX)]).is_err());
    }

    #[test]
    fn accepts_huge_finite_weights() {
        let d = TokenDistribution::new("p", [("a", 1e308), ("b", 1e-10)]).unwrap();
        assert_eq!(d.weight("a"), Some(1e308));
        assert_eq!(d.weight("b"), Some(1e-10));
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(d.sample(&mut rng), "a");
        }

        let d = TokenDistribution::new("p", [("a", f64::MAX / 2.0), ("b", f64::MAX / 4.0)]).unwrap();
        assert!((d.probability("a") - 2.0 / 3.0).abs() < 1e-12);

        let mut d = TokenDistribution::new("p", [("a", 1.0)]).unwrap();
        d.set_weight("p", "b", 1e308).unwrap();
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn unnormalized_weights_are_relative() {
        let d = TokenDistribution::new("x", [("a", 3.0), ("b", 1.0)]).unwrap();
        assert_eq!(d.total_weight(), 4.0);
        assert!((d.probability("a") - 0.75).abs() < 1e-12);
        assert_eq!(d.probability("missing"), 0.0);
        assert_eq!(d.weight("b"), Some(1.0));
    }

    #[test]
    fn zero_weight_is_never_sampled() {
        let d = TokenDistribution::new("x", [("never", 0.0), ("always", 2.5)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert_eq!(d.sample(&mut rng), "always");
        }
    }

    #[test]
    fn set_weight_edits_or_adds() {
        let mut d = TokenDistribution::new("there", [("lived", 0.8)]).unwrap();
        d.set_weight("there", "was", 0.2).unwrap();
        d.set_weight("there", "lived", 0.6).unwrap();
        assert_eq!(d.weight("lived"), Some(0.6));
        assert_eq!(d.weight("was"), Some(0.2));
        assert_eq!(d.most_likely(1), vec![(&"lived".to_string(), 0.6)]);
    }

    #[test]
    fn failed_set_weight_leaves_distribution() {
        let mut d = TokenDistribution::new("x", [("a", 1.0)]).unwrap();
        let before = d.clone();
        assert!(d.set_weight("x", "a", -1.0).is_err());
        assert!(d.set_weight("x", "a", 0.0).is_err());
        assert_eq!(d, before);
    }
}
