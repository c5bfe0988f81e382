//! Machine letters and the glyph alphabet.
//!
//! Every tile is represented internally as a [`MachineLetter`], a small
//! integer code. Codes are 1-based: the zero code is reserved for the
//! empty-square sentinel on the board and for the GADDAG separation arc in
//! the lexicon, neither of which ever names a real letter.

use crate::error::Error;
use std::collections::HashMap;
use tinyvec::ArrayVec;

/// Upper bound on the number of letters an alphabet may hold. Cross-sets
/// are 64-bit masks indexed by letter code, so this must stay below 64.
pub const MAX_ALPHABET_SIZE: u8 = 50;

/// High bit marking a tile that was played from a blank. The tile scores
/// zero but otherwise behaves as the designated letter.
pub const BLANK_MASK: u8 = 0x80;

/// Longest tile sequence we handle: a full board row.
pub const WORD_DIM: usize = 16;

/// A sequence of machine letters (a word, a rack, a leave).
pub type MachineWord = ArrayVec<[MachineLetter; WORD_DIM]>;

/// A letter code. See the module documentation for the encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MachineLetter(pub u8);

impl MachineLetter {
    /// The empty-square sentinel. Only ever stored on a board square.
    pub const EMPTY: MachineLetter = MachineLetter(0);

    /// An unassigned blank tile (`?` in rack strings).
    pub const BLANK: MachineLetter = MachineLetter(BLANK_MASK);

    /// Marks "use the letter already on the board here" inside a move's
    /// tile sequence. Serialized as `.`.
    pub const PLAYED_THROUGH: MachineLetter = MachineLetter(0x7f);

    /// The GADDAG separation letter. Letter codes are 1-based, so the zero
    /// code is free for it; it never terminates a word.
    pub const SEPARATION: MachineLetter = MachineLetter(0);

    pub fn code(self) -> u8 {
        self.0
    }

    /// True if this tile was played from a blank.
    pub fn is_blanked(self) -> bool {
        self.0 & BLANK_MASK != 0
    }

    /// The blank-designated version of this letter.
    pub fn blanked(self) -> MachineLetter {
        MachineLetter(self.0 | BLANK_MASK)
    }

    /// The underlying letter, with any blank designation removed.
    pub fn unblank(self) -> MachineLetter {
        MachineLetter(self.0 & !BLANK_MASK)
    }
}

/// An ordered list of glyphs with fast glyph-to-code and code-to-glyph
/// maps. Multi-codepoint glyphs ("CH", "LL", "RR") are supported; encoding
/// tokenizes greedily, longest glyph first.
///
/// Lowercase forms denote blank-designated tiles; `?` is an unassigned
/// blank and `.` the played-through marker. The digraph tiles also accept
/// the digit shorthands `1` (CH), `2` (LL) and `3` (RR) in rack strings.
#[derive(Debug, Clone)]
pub struct Alphabet {
    glyphs: Vec<String>,
    lower: Vec<String>,
    encoder: HashMap<String, MachineLetter>,
}

impl Alphabet {
    pub fn new<S: AsRef<str>>(glyphs: &[S]) -> Alphabet {
        assert!(
            glyphs.len() <= MAX_ALPHABET_SIZE as usize,
            "alphabet larger than MAX_ALPHABET_SIZE"
        );
        let mut upper = Vec::with_capacity(glyphs.len());
        let mut lower = Vec::with_capacity(glyphs.len());
        let mut encoder = HashMap::new();
        for (i, g) in glyphs.iter().enumerate() {
            let g = g.as_ref().to_string();
            let lc = g.to_lowercase();
            let code = MachineLetter(i as u8 + 1);
            encoder.insert(g.clone(), code);
            encoder.insert(lc.clone(), code.blanked());
            let shorthand = match g.as_str() {
                "CH" => Some("1"),
                "LL" => Some("2"),
                "RR" => Some("3"),
                _ => None,
            };
            if let Some(digit) = shorthand {
                encoder.insert(digit.to_string(), code);
            }
            upper.push(g);
            lower.push(lc);
        }
        encoder.insert("?".to_string(), MachineLetter::BLANK);
        encoder.insert(".".to_string(), MachineLetter::PLAYED_THROUGH);
        Alphabet {
            glyphs: upper,
            lower,
            encoder,
        }
    }

    /// Number of letters (the blank is not counted).
    pub fn len(&self) -> u8 {
        self.glyphs.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// All glyphs in code order.
    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    /// Code for a glyph. Lowercase glyphs yield blank-designated codes.
    /// ## Errors
    /// [`Error::UnknownGlyph`] on unrecognized input.
    pub fn val(&self, glyph: &str) -> Result<MachineLetter, Error> {
        self.encoder
            .get(glyph)
            .copied()
            .ok_or_else(|| Error::UnknownGlyph(glyph.to_string()))
    }

    /// Glyph for a machine letter.
    pub fn letter(&self, ml: MachineLetter) -> String {
        if ml == MachineLetter::PLAYED_THROUGH {
            return ".".to_string();
        }
        if ml == MachineLetter::BLANK {
            return "?".to_string();
        }
        let idx = (ml.unblank().0 - 1) as usize;
        if ml.is_blanked() {
            self.lower[idx].clone()
        } else {
            self.glyphs[idx].clone()
        }
    }

    /// Encode a string as machine letters, tokenizing greedily so that
    /// digraph glyphs win over their constituent letters.
    /// ## Errors
    /// If a token is not in the alphabet, or the string is too long.
    pub fn to_machine_word(&self, s: &str) -> Result<MachineWord, Error> {
        let chars: Vec<char> = s.chars().collect();
        let mut word = MachineWord::new();
        let mut i = 0;
        while i < chars.len() {
            if word.len() == WORD_DIM {
                return Err(Error::EncodeStringTooLong(s.to_string()));
            }
            if i + 1 < chars.len() {
                let two: String = chars[i..i + 2].iter().collect();
                if let Some(&ml) = self.encoder.get(&two) {
                    word.push(ml);
                    i += 2;
                    continue;
                }
            }
            let one: String = chars[i..i + 1].iter().collect();
            word.push(self.val(&one)?);
            i += 1;
        }
        Ok(word)
    }

    /// Decode machine letters back to a user-visible string.
    pub fn user_visible(&self, word: &[MachineLetter]) -> String {
        word.iter().map(|&ml| self.letter(ml)).collect()
    }
}
