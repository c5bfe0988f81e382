//! In-memory construction of the node-array automata from a word list.
//!
//! A pointer trie is built first, then serialized breadth-first into the
//! flat encoding. The result is a trie, not a minimized graph; the node
//! contract is identical either way and minimization is purely a storage
//! concern.

use super::{Automaton, ARC_COUNT_BITS, LETTER_BIT_SHIFT, NODE_IDX_BIT_MASK};
use crate::alphabet::{Alphabet, MachineLetter};
use crate::error::Error;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

// Arc counts live in the low 5 bits of a node header: at most 31 arcs,
// which caps the alphabet at 30 letters plus the separation arc.
const MAX_LETTERS: usize = 30;

#[derive(Default)]
struct TrieNode {
    children: BTreeMap<u8, usize>,
    letter_set: u64,
}

struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    fn new() -> Trie {
        Trie {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Insert an entry: walk `path`, then record `last` in the letter set
    /// of the final node.
    fn insert(&mut self, path: &[u8], last: u8) {
        let mut cur = 0;
        for &label in path {
            cur = match self.nodes[cur].children.get(&label) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[cur].children.insert(label, child);
                    child
                }
            };
        }
        self.nodes[cur].letter_set |= 1u64 << last;
    }

    /// Serialize breadth-first into the flat node array plus the
    /// deduplicated letter-set table.
    fn serialize(&self) -> Result<(Vec<u32>, Vec<u64>), Error> {
        let mut index_of = vec![0u32; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut next: u64 = 0;
        let mut queue = VecDeque::new();
        queue.push_back(0usize);
        while let Some(id) = queue.pop_front() {
            index_of[id] = next as u32;
            next += 1 + self.nodes[id].children.len() as u64;
            if next > NODE_IDX_BIT_MASK as u64 {
                return Err(Error::LexiconTooLarge);
            }
            order.push(id);
            for &child in self.nodes[id].children.values() {
                queue.push_back(child);
            }
        }

        let mut letter_sets: Vec<u64> = Vec::new();
        let mut set_index: HashMap<u64, u32> = HashMap::new();
        let mut words = vec![0u32; next as usize];
        for &id in &order {
            let node = &self.nodes[id];
            let ls_index = *set_index.entry(node.letter_set).or_insert_with(|| {
                letter_sets.push(node.letter_set);
                letter_sets.len() as u32 - 1
            });
            let base = index_of[id] as usize;
            words[base] = (ls_index << ARC_COUNT_BITS) | node.children.len() as u32;
            for (i, (&label, &child)) in node.children.iter().enumerate() {
                words[base + 1 + i] =
                    ((label as u32) << LETTER_BIT_SHIFT) | index_of[child];
            }
        }
        Ok((words, letter_sets))
    }
}

fn encode_words<S: AsRef<str>>(
    words: &[S],
    alphabet: &Alphabet,
) -> Result<Vec<Vec<u8>>, Error> {
    let mut out = Vec::with_capacity(words.len());
    for w in words {
        let mw = alphabet.to_machine_word(w.as_ref())?;
        if mw.is_empty() {
            continue;
        }
        out.push(mw.iter().map(|ml| ml.unblank().code()).collect());
    }
    Ok(out)
}

fn finish(name: &str, alphabet: &Arc<Alphabet>, trie: &Trie) -> Result<Automaton, Error> {
    if alphabet.len() as usize > MAX_LETTERS {
        return Err(Error::AlphabetTooLarge(alphabet.len() as usize));
    }
    let (nodes, letter_sets) = trie.serialize()?;
    Ok(Automaton {
        name: name.to_string(),
        alphabet: Arc::clone(alphabet),
        nodes,
        letter_sets,
    })
}

pub(super) fn build_dawg<S: AsRef<str>>(
    name: &str,
    words: &[S],
    alphabet: &Arc<Alphabet>,
) -> Result<Automaton, Error> {
    let mut trie = Trie::new();
    for codes in encode_words(words, alphabet)? {
        trie.insert(&codes[..codes.len() - 1], codes[codes.len() - 1]);
    }
    finish(name, alphabet, &trie)
}

pub(super) fn build_gaddag<S: AsRef<str>>(
    name: &str,
    words: &[S],
    alphabet: &Arc<Alphabet>,
) -> Result<Automaton, Error> {
    let sep = MachineLetter::SEPARATION.code();
    let mut trie = Trie::new();
    let mut entry: Vec<u8> = Vec::new();
    for codes in encode_words(words, alphabet)? {
        let n = codes.len();
        // REV(w): the whole word placed leftward from its last letter.
        entry.clear();
        entry.extend(codes.iter().rev());
        trie.insert(&entry[..n - 1], entry[n - 1]);
        // REV(w[..k]) ⊗ w[k..] for every split point.
        for k in 1..n {
            entry.clear();
            entry.extend(codes[..k].iter().rev());
            entry.push(sep);
            entry.extend(&codes[k..]);
            trie.insert(&entry[..entry.len() - 1], entry[entry.len() - 1]);
        }
    }
    finish(name, alphabet, &trie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::LetterDistribution;

    #[test]
    fn test_trie_counts() {
        let dist = LetterDistribution::english();
        let alph = dist.alphabet();
        let dawg = build_dawg("t", &["AB", "ABS", "BA"], alph).unwrap();
        // root arcs: A and B
        assert_eq!(dawg.num_arcs(dawg.root_node_index()), 2);
        let a = alph.val("A").unwrap();
        let b = alph.val("B").unwrap();
        let n = dawg.next_node_idx(dawg.root_node_index(), a).unwrap();
        // at "A", B terminates (AB) and an arc continues toward ABS
        assert!(dawg.in_letter_set(n, b));
        let n = dawg.next_node_idx(n, b).unwrap();
        assert!(dawg.in_letter_set(n, alph.val("S").unwrap()));
    }

    #[test]
    fn test_one_letter_words_terminate_at_root() {
        let dist = LetterDistribution::english();
        let dawg = build_dawg("t", &["A", "AB"], dist.alphabet()).unwrap();
        let alph = dist.alphabet();
        assert!(dawg.in_letter_set(dawg.root_node_index(), alph.val("A").unwrap()));
        assert!(!dawg.in_letter_set(dawg.root_node_index(), alph.val("B").unwrap()));
    }
}
