//! Lexicon automata: the DAWG (word recognition, anagramming) and the
//! GADDAG (bidirectional placement traversal).
//!
//! Both share one node/arc encoding over a flat `Vec<u32>`:
//!
//! - A node's first word is `(letter_set_index << 5) | arc_count`. The
//!   letter-set index points into a deduplicated table of 64-bit masks
//!   (bit = letter code) naming the letters that terminate a word at that
//!   node. A letter set can exceed the bits left in a node word once
//!   digraph alphabets are in play, hence the table indirection.
//! - The following `arc_count` words are arcs:
//!   `(letter_code << LETTER_BIT_SHIFT) | target_node_index`. Arc letter
//!   zero is the GADDAG separation arc.
//!
//! Automata are immutable after construction and shared via `Arc`; a
//! process-wide cache deduplicates loads by `"<kind>:<name>"`.

mod builder;

use crate::alphabet::{Alphabet, MachineLetter};
use crate::error::Error;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::convert::TryInto;
use std::ops::Deref;
use std::sync::{Arc, Mutex};

/// Bit position of the arc letter inside an arc word.
pub const LETTER_BIT_SHIFT: u32 = 24;
/// Mask isolating an arc's target node index.
pub const NODE_IDX_BIT_MASK: u32 = (1 << LETTER_BIT_SHIFT) - 1;
/// Low bits of a node header holding the arc count.
pub const ARC_COUNT_BITS: u32 = 5;
const ARC_COUNT_MASK: u32 = (1 << ARC_COUNT_BITS) - 1;

const DAWG_MAGIC: &[u8; 4] = b"CDWG";
const GADDAG_MAGIC: &[u8; 4] = b"CGDG";
const FORMAT_VERSION: u32 = 1;

/// The shared node-array automaton. [`Dawg`] and [`Gaddag`] deref to this.
#[derive(Debug)]
pub struct Automaton {
    name: String,
    alphabet: Arc<Alphabet>,
    nodes: Vec<u32>,
    letter_sets: Vec<u64>,
}

impl Automaton {
    pub fn root_node_index(&self) -> u32 {
        0
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self, node: u32) -> u32 {
        self.nodes[node as usize] & ARC_COUNT_MASK
    }

    /// The set of letters that terminate a word at this node, as a mask
    /// with bit `code` set. Compatible with cross-set masks.
    pub fn letter_set(&self, node: u32) -> u64 {
        self.letter_sets[(self.nodes[node as usize] >> ARC_COUNT_BITS) as usize]
    }

    /// True if `letter` completes a word at this node. Blank designation
    /// is ignored.
    pub fn in_letter_set(&self, node: u32, letter: MachineLetter) -> bool {
        self.letter_set(node) & (1u64 << letter.unblank().code()) != 0
    }

    /// Iterate this node's arcs as `(letter, target)` pairs.
    pub fn arcs(&self, node: u32) -> impl Iterator<Item = (MachineLetter, u32)> + '_ {
        let start = node as usize + 1;
        let end = start + self.num_arcs(node) as usize;
        self.nodes[start..end].iter().map(|&w| {
            (
                MachineLetter((w >> LETTER_BIT_SHIFT) as u8),
                w & NODE_IDX_BIT_MASK,
            )
        })
    }

    /// Follow the arc for `letter`, if there is one.
    pub fn next_node_idx(&self, node: u32, letter: MachineLetter) -> Option<u32> {
        self.arcs(node)
            .find(|&(l, _)| l == letter)
            .map(|(_, target)| target)
    }

    fn to_bytes(&self, magic: &[u8; 4]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(magic);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.push(self.alphabet.len());
        for glyph in self.alphabet.glyphs() {
            let bytes = glyph.as_bytes();
            out.push(bytes.len() as u8);
            out.extend_from_slice(bytes);
        }
        out.extend_from_slice(&(self.letter_sets.len() as u32).to_le_bytes());
        for &ls in &self.letter_sets {
            out.extend_from_slice(&ls.to_le_bytes());
        }
        out.extend_from_slice(&(self.nodes.len() as u32).to_le_bytes());
        for &n in &self.nodes {
            out.extend_from_slice(&n.to_le_bytes());
        }
        out
    }

    fn from_bytes(name: &str, bytes: &[u8], magic: &[u8; 4]) -> Result<Automaton, Error> {
        let mut r = Reader { bytes, pos: 0 };
        if r.take(4)? != &magic[..] {
            return Err(Error::BadMagic);
        }
        let version = r.u32()?;
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let nglyphs = r.u8()? as usize;
        let mut glyphs = Vec::with_capacity(nglyphs);
        for _ in 0..nglyphs {
            let len = r.u8()? as usize;
            let g = std::str::from_utf8(r.take(len)?).map_err(|_| Error::Truncated)?;
            glyphs.push(g.to_string());
        }
        let nsets = r.u32()? as usize;
        let mut letter_sets = Vec::with_capacity(nsets);
        for _ in 0..nsets {
            letter_sets.push(r.u64()?);
        }
        let nnodes = r.u32()? as usize;
        let mut nodes = Vec::with_capacity(nnodes);
        for _ in 0..nnodes {
            nodes.push(r.u32()?);
        }
        Ok(Automaton {
            name: name.to_string(),
            alphabet: Arc::new(Alphabet::new(&glyphs)),
            nodes,
            letter_sets,
        })
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.pos + n > self.bytes.len() {
            return Err(Error::Truncated);
        }
        let s = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, Error> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64, Error> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }
}

/// A DAWG over the lexicon: recognizes words and drives the anagrammer.
#[derive(Debug)]
pub struct Dawg(Automaton);

impl Deref for Dawg {
    type Target = Automaton;

    fn deref(&self) -> &Automaton {
        &self.0
    }
}

impl Dawg {
    /// Build a DAWG from a word list. Empty words are ignored.
    /// ## Errors
    /// If a word cannot be encoded, or the result overflows the format.
    pub fn from_words<S: AsRef<str>>(
        name: &str,
        words: &[S],
        alphabet: &Arc<Alphabet>,
    ) -> Result<Dawg, Error> {
        builder::build_dawg(name, words, alphabet).map(Dawg)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes(DAWG_MAGIC)
    }

    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Dawg, Error> {
        Automaton::from_bytes(name, bytes, DAWG_MAGIC).map(Dawg)
    }

    pub fn from_file(name: &str, path: &str) -> Result<Dawg, Error> {
        let bytes = std::fs::read(path).map_err(|source| Error::ReadError {
            path: path.to_string(),
            source,
        })?;
        Self::from_bytes(name, &bytes)
    }

    /// True if the automaton accepts `word`. Blank designations are
    /// ignored.
    pub fn accepts(&self, word: &[MachineLetter]) -> bool {
        if word.is_empty() {
            return false;
        }
        let mut node = self.root_node_index();
        for &ml in &word[..word.len() - 1] {
            match self.next_node_idx(node, ml.unblank()) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.in_letter_set(node, word[word.len() - 1])
    }
}

/// A GADDAG over the lexicon: every word is reachable from each of its
/// split points, reversed prefix first, separation arc, then suffix.
#[derive(Debug)]
pub struct Gaddag(Automaton);

impl Deref for Gaddag {
    type Target = Automaton;

    fn deref(&self) -> &Automaton {
        &self.0
    }
}

impl Gaddag {
    /// Build a GADDAG from a word list. Empty words are ignored.
    /// ## Errors
    /// If a word cannot be encoded, or the result overflows the format.
    pub fn from_words<S: AsRef<str>>(
        name: &str,
        words: &[S],
        alphabet: &Arc<Alphabet>,
    ) -> Result<Gaddag, Error> {
        builder::build_gaddag(name, words, alphabet).map(Gaddag)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes(GADDAG_MAGIC)
    }

    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Gaddag, Error> {
        Automaton::from_bytes(name, bytes, GADDAG_MAGIC).map(Gaddag)
    }

    pub fn from_file(name: &str, path: &str) -> Result<Gaddag, Error> {
        let bytes = std::fs::read(path).map_err(|source| Error::ReadError {
            path: path.to_string(),
            source,
        })?;
        Self::from_bytes(name, &bytes)
    }
}

enum CachedLexicon {
    Dawg(Arc<Dawg>),
    Gaddag(Arc<Gaddag>),
}

lazy_static! {
    static ref LEXICON_CACHE: Mutex<HashMap<String, CachedLexicon>> = Mutex::new(HashMap::new());
}

/// Load a DAWG from a file, sharing one instance per lexicon name across
/// the process.
pub fn load_dawg_cached(name: &str, path: &str) -> Result<Arc<Dawg>, Error> {
    let key = format!("dawg:{}", name);
    let mut cache = LEXICON_CACHE.lock().expect("lexicon cache poisoned");
    if let Some(CachedLexicon::Dawg(d)) = cache.get(&key) {
        return Ok(Arc::clone(d));
    }
    let dawg = Arc::new(Dawg::from_file(name, path)?);
    cache.insert(key, CachedLexicon::Dawg(Arc::clone(&dawg)));
    Ok(dawg)
}

/// Load a GADDAG from a file, sharing one instance per lexicon name
/// across the process.
pub fn load_gaddag_cached(name: &str, path: &str) -> Result<Arc<Gaddag>, Error> {
    let key = format!("gaddag:{}", name);
    let mut cache = LEXICON_CACHE.lock().expect("lexicon cache poisoned");
    if let Some(CachedLexicon::Gaddag(g)) = cache.get(&key) {
        return Ok(Arc::clone(g));
    }
    let gaddag = Arc::new(Gaddag::from_file(name, path)?);
    cache.insert(key, CachedLexicon::Gaddag(Arc::clone(&gaddag)));
    Ok(gaddag)
}
