//! Shared fixtures for unit tests: one small, hand-checkable lexicon and
//! the automata built from it.

use crate::distribution::LetterDistribution;
use crate::lexicon::{Dawg, Gaddag};
use std::sync::Arc;

/// The test lexicon. Small enough that every cross-set and anagram below
/// can be verified by hand.
pub(crate) const TEST_WORDS: &[&str] = &[
    "AB",
    "ABS",
    "BA",
    "TAB",
    "CARE",
    "CARES",
    "AEROLITH",
    "HOMEMADE",
    "GAMODEME",
];

pub(crate) fn english_dist() -> Arc<LetterDistribution> {
    Arc::new(LetterDistribution::english())
}

pub(crate) fn small_dawg() -> Arc<Dawg> {
    let dist = LetterDistribution::english();
    Arc::new(Dawg::from_words("small", TEST_WORDS, dist.alphabet()).unwrap())
}

pub(crate) fn small_gaddag() -> Arc<Gaddag> {
    let dist = LetterDistribution::english();
    Arc::new(Gaddag::from_words("small", TEST_WORDS, dist.alphabet()).unwrap())
}

/// A GADDAG over no words at all: cross-sets all come out empty, but
/// cross-scores (which are lexicon-independent) still generate. Handy
/// for pure scoring tests over fixed positions.
pub(crate) fn empty_gaddag() -> Arc<Gaddag> {
    let dist = LetterDistribution::english();
    let words: &[&str] = &[];
    Arc::new(Gaddag::from_words("empty", words, dist.alphabet()).unwrap())
}
