//! Sampling new text from a [`TransitionTable`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{BigramError, Result};
use crate::table::TransitionTable;
use crate::token::{Token, TokenRef};

/// Settings for [`TransitionTable::generate_with_options()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Number of tokens to produce.
    pub length: usize,
    /// Token to start from. Ignored if the table has no distribution for it.
    pub seed: Option<Token>,
    /// Seed for the random source. With the same table, corpus and options, the output is
    /// always the same.
    pub rng_seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            length: 100,
            seed: None,
            rng_seed: None,
        }
    }
}

impl GenerateOptions {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: impl Into<Token>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = Some(rng_seed);
        self
    }
}

impl TransitionTable {
    /// Generates exactly `length` tokens.
    ///
    /// The first token is `seed` if the table has a distribution for it, otherwise a token drawn
    /// uniformly from `corpus` (so frequent tokens are more likely to be picked). Each next token
    /// is sampled from the distribution of the current one. If the current token has no
    /// distribution, a fresh token is drawn from `corpus` the same way and generation carries on
    /// from there.
    ///
    /// Fails with [`BigramError::EmptyCorpus`] if a draw from `corpus` is needed but it is empty.
    /// No partial output is returned.
    pub fn generate<'a>(
        &'a self,
        rng: &mut impl Rng,
        corpus: &'a [Token],
        length: usize,
        seed: Option<TokenRef<'_>>,
    ) -> Result<Vec<&'a Token>> {
        if length < 1 {
            return Ok(Vec::new());
        }

        let mut current = match seed.and_then(|s| self.map.get_key_value(s)) {
            Some((token, _)) => token,
            None => draw(rng, corpus)?,
        };
        let mut res = Vec::with_capacity(length);
        res.push(current);

        while res.len() < length {
            current = match self.map.get(current.as_str()) {
                Some(dist) => dist.sample(rng),
                None => {
                    debug!(token = %current, "no distribution, drawing a new token");
                    draw(rng, corpus)?
                }
            };
            res.push(current);
        }

        Ok(res)
    }

    /// Like [`TransitionTable::generate()`], with a random source seeded from
    /// [`GenerateOptions::rng_seed`], or from entropy if there is none.
    pub fn generate_with_options<'a>(
        &'a self,
        corpus: &'a [Token],
        options: &GenerateOptions,
    ) -> Result<Vec<&'a Token>> {
        let mut rng = match options.rng_seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        self.generate(
            &mut rng,
            corpus,
            options.length,
            options.seed.as_deref(),
        )
    }
}

fn draw<'a>(rng: &mut impl Rng, corpus: &'a [Token]) -> Result<&'a Token> {
    corpus.choose(rng).ok_or(BigramError::EmptyCorpus)
}
