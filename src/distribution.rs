//! Named letter distributions: how many of each tile a game starts with,
//! and what each tile is worth.

use crate::alphabet::{Alphabet, MachineLetter};
use crate::bag::Bag;
use crate::error::Error;
use rand::rngs::StdRng;
use std::sync::Arc;

const ENGLISH: &str = "\
A,9,1
B,2,3
C,2,3
D,4,2
E,12,1
F,2,4
G,3,2
H,2,4
I,9,1
J,1,8
K,1,5
L,4,1
M,2,3
N,6,1
O,8,1
P,2,3
Q,1,10
R,6,1
S,4,1
T,6,1
U,4,1
V,2,4
W,2,4
X,1,8
Y,2,4
Z,1,10
?,2,0";

// FISE tile set. The digraphs CH, LL and RR are single tiles; K and W do
// not exist.
const SPANISH: &str = "\
A,12,1
B,2,3
C,4,3
CH,1,5
D,5,2
E,12,1
F,1,4
G,2,2
H,2,4
I,6,1
J,1,8
L,4,1
LL,1,8
M,2,3
N,5,1
Ñ,1,8
O,9,1
P,2,3
Q,1,5
R,5,1
RR,1,8
S,6,1
T,4,1
U,5,1
V,1,4
X,1,8
Y,1,4
Z,1,10
?,2,0";

/// A named letter distribution. Construction produces the alphabet, the
/// bag contents and the scoring table atomically from one table.
#[derive(Debug, Clone)]
pub struct LetterDistribution {
    name: String,
    alphabet: Arc<Alphabet>,
    // Indexed by letter code; slot 0 holds the blank count.
    counts: Vec<u8>,
    scores: Vec<i32>,
}

impl LetterDistribution {
    /// The standard English distribution (100 tiles).
    pub fn english() -> LetterDistribution {
        // The built-in tables always parse.
        Self::from_csv("english", ENGLISH).unwrap()
    }

    /// The FISE Spanish distribution, digraph tiles included.
    pub fn spanish() -> LetterDistribution {
        Self::from_csv("spanish", SPANISH).unwrap()
    }

    /// Look up a built-in distribution by name.
    /// ## Errors
    /// [`Error::UnknownDistribution`] for names we don't know.
    pub fn named(name: &str) -> Result<LetterDistribution, Error> {
        match name {
            "english" => Ok(Self::english()),
            "spanish" => Ok(Self::spanish()),
            _ => Err(Error::UnknownDistribution(name.to_string())),
        }
    }

    /// Parse a distribution from `glyph,count,value` lines. The blank is
    /// the `?` line; glyph order determines letter codes.
    /// ## Errors
    /// If a line does not parse, or the alphabet would be too large.
    pub fn from_csv(name: &str, text: &str) -> Result<LetterDistribution, Error> {
        let mut glyphs: Vec<String> = Vec::new();
        let mut letter_rows: Vec<(u8, i32)> = Vec::new();
        let mut blank_count = 0u8;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let bad = || Error::BadDistributionLine(line.to_string());
            let mut fields = line.split(',');
            let glyph = fields.next().ok_or_else(bad)?;
            let count: u8 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(bad)?;
            let value: i32 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(bad)?;
            if fields.next().is_some() {
                return Err(bad());
            }
            if glyph == "?" {
                blank_count = count;
            } else {
                glyphs.push(glyph.to_string());
                letter_rows.push((count, value));
            }
        }
        if glyphs.len() > crate::alphabet::MAX_ALPHABET_SIZE as usize {
            return Err(Error::AlphabetTooLarge(glyphs.len()));
        }
        let alphabet = Arc::new(Alphabet::new(&glyphs));
        let mut counts = vec![blank_count];
        let mut scores = vec![0];
        for (count, value) in letter_rows {
            counts.push(count);
            scores.push(value);
        }
        Ok(LetterDistribution {
            name: name.to_string(),
            alphabet,
            counts,
            scores,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Point value of a tile. Blanks score zero, designated or not.
    pub fn score(&self, ml: MachineLetter) -> i32 {
        if ml.is_blanked() {
            0
        } else {
            self.scores[ml.code() as usize]
        }
    }

    /// Number of copies of a tile in a fresh bag.
    pub fn count(&self, ml: MachineLetter) -> u8 {
        if ml.is_blanked() {
            self.counts[0]
        } else {
            self.counts[ml.code() as usize]
        }
    }

    /// Total number of tiles in a fresh bag.
    pub fn total_tiles(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// The full tile multiset, blanks as [`MachineLetter::BLANK`].
    pub fn tiles(&self) -> Vec<MachineLetter> {
        let mut tiles = Vec::with_capacity(self.total_tiles());
        for _ in 0..self.counts[0] {
            tiles.push(MachineLetter::BLANK);
        }
        for code in 1..self.counts.len() {
            for _ in 0..self.counts[code] {
                tiles.push(MachineLetter(code as u8));
            }
        }
        tiles
    }

    /// Make a full, shuffled bag from this distribution.
    pub fn make_bag(&self, rng: StdRng) -> Bag {
        Bag::new(self.tiles(), rng)
    }
}
