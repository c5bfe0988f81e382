//! Rack anagramming over the DAWG.

use crate::alphabet::{MachineLetter, MachineWord};
use crate::error::Error;
use crate::lexicon::Dawg;
use crate::rack::Rack;
use std::collections::HashSet;

/// `Build` includes proper sub-anagrams; `Exact` keeps only words that
/// use the whole rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnagramMode {
    Build,
    Exact,
}

/// All lexicon words realisable from `letters` (blanks as `?`). Digraph
/// shorthand digits are understood by the alphabet. Results are sorted
/// and unique; a word reachable both naturally and through a blank
/// appears once.
/// ## Errors
/// If the rack cannot be encoded.
pub fn anagram(letters: &str, dawg: &Dawg, mode: AnagramMode) -> Result<Vec<String>, Error> {
    let alph = dawg.alphabet();
    let rack = Rack::from_string(letters, alph)?;
    let full_len = rack.num_tiles() as usize;

    let mut found: HashSet<MachineWord> = HashSet::new();
    let mut search = Search {
        dawg,
        mode,
        full_len,
        rack,
        word: MachineWord::new(),
        found: &mut found,
    };
    search.descend(dawg.root_node_index());

    let mut out: Vec<String> = found.iter().map(|w| alph.user_visible(w)).collect();
    out.sort();
    Ok(out)
}

struct Search<'a> {
    dawg: &'a Dawg,
    mode: AnagramMode,
    full_len: usize,
    rack: Rack,
    word: MachineWord,
    found: &'a mut HashSet<MachineWord>,
}

impl<'a> Search<'a> {
    fn wanted(&self, len: usize) -> bool {
        match self.mode {
            AnagramMode::Build => true,
            AnagramMode::Exact => len == self.full_len,
        }
    }

    fn descend(&mut self, node: u32) {
        for code in 1..=self.rack.alphabet_size() {
            let ml = MachineLetter(code);
            let natural = self.rack.has(ml);
            let blank = self.rack.has_blank();
            if !natural && !blank {
                continue;
            }
            let terminal = self.dawg.in_letter_set(node, ml);
            let next = self.dawg.next_node_idx(node, ml);
            if terminal || next.is_some() {
                // Prefer the natural tile; a blank only stands in when
                // the letter itself is exhausted. Emitted words carry
                // natural letters either way, so the distinction does
                // not create duplicates.
                let consumed = if natural { ml } else { MachineLetter::BLANK };
                self.rack.take(consumed).expect("tile verified on rack");
                self.word.push(ml);
                if terminal && self.wanted(self.word.len()) {
                    self.found.insert(self.word);
                }
                if let Some(next) = next {
                    self.descend(next);
                }
                self.word.truncate(self.word.len() - 1);
                self.rack.add(consumed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    // The shared test lexicon holds AEROLITH, HOMEMADE and GAMODEME,
    // among smaller words.
    #[test]
    fn test_exact_anagram() {
        let dawg = testutil::small_dawg();
        let answers = anagram("AEHILORT", &dawg, AnagramMode::Exact).unwrap();
        assert_eq!(answers, vec!["AEROLITH"]);
    }

    #[test]
    fn test_exact_anagram_with_blank() {
        let dawg = testutil::small_dawg();
        let answers = anagram("ADEEMMO?", &dawg, AnagramMode::Exact).unwrap();
        assert_eq!(answers, vec!["GAMODEME", "HOMEMADE"]);
    }

    #[test]
    fn test_build_vs_exact() {
        let dawg = testutil::small_dawg();
        let build = anagram("ABSCRE", &dawg, AnagramMode::Build).unwrap();
        assert_eq!(build, vec!["AB", "ABS", "BA", "CARE", "CARES"]);
        let exact = anagram("ABSCRE", &dawg, AnagramMode::Exact).unwrap();
        assert!(exact.is_empty());
        let exact = anagram("CARES", &dawg, AnagramMode::Exact).unwrap();
        assert_eq!(exact, vec!["CARES"]);
    }

    #[test]
    fn test_no_answers() {
        let dawg = testutil::small_dawg();
        let answers = anagram("QQQQ", &dawg, AnagramMode::Build).unwrap();
        assert!(answers.is_empty());
    }

    #[test]
    fn test_blank_does_not_duplicate() {
        let dawg = testutil::small_dawg();
        // the blank can re-derive AB; it must not appear twice
        let answers = anagram("AB?", &dawg, AnagramMode::Build).unwrap();
        assert_eq!(
            answers,
            vec!["AB", "ABS", "BA", "TAB"]
        );
    }
}
