//! Dead simple first order Markov ("bigram") text generation, with a probability table you can
//! tamper with.
//!
//! The pipeline only goes forward: tokens are counted into [`TransitionCounts`], the counts are
//! normalized into a [`TransitionTable`], the table may be overridden, and text is sampled from
//! whatever the table holds right now.
//!
//! ```
//! use bigramish::{token::split_whitespace, GenerateOptions, TransitionCounts};
//!
//! let tokens = split_whitespace("the cat sat on the mat the cat ran");
//! let counts = TransitionCounts::from_tokens(&tokens);
//! let mut table = counts.normalize().unwrap();
//!
//! // Weights are relative, they do not have to add up to 1
//! table.replace("love", [("banana", 7.0), ("pizza", 1.0)]).unwrap();
//!
//! let opts = GenerateOptions::new(10).with_seed("love").with_rng_seed(42);
//! let text = table.generate_with_options(&tokens, &opts).unwrap();
//! assert_eq!(text.len(), 10);
//! assert_eq!(text[0], "love");
//! ```
//!
//! The randomness is built using a weighted distribution (see
//! [`rand_distr::WeightedAliasIndex`]). Given the same random source, the same table and the same
//! corpus, the output is always the same.
//!
//! # Features
//!
//! - `inline-more` - Passed on to `hashbrown`. Enabled by default.
//! - `cli` - Builds the `bigramish` binary. Enabled by default.

pub mod counts;
pub mod distribution;
pub mod error;
pub mod generate;
pub mod table;
pub mod token;

pub use counts::{SuccessorCounts, TransitionCounts, TransitionCountsBuilder};
pub use distribution::TokenDistribution;
pub use error::{BigramError, Result};
pub use generate::GenerateOptions;
pub use table::TransitionTable;
pub use token::{Token, TokenRef};
