//! Cross-sets: per-square bitmasks of the letters that form a legal
//! perpendicular word, plus the matching cross-scores.

use super::{BoardDirection, GameBoard, LEFT, RIGHT};
use crate::alphabet::{Alphabet, MachineLetter, MAX_ALPHABET_SIZE};
use crate::distribution::LetterDistribution;
use crate::error::Error;
use crate::lexicon::Gaddag;
use crate::play::Move;

#[cfg(feature = "bitintr")]
use bitintr::Popcnt;

#[cfg(feature = "bitintr")]
#[inline(always)]
fn count_ones(n: u64) -> u32 {
    n.popcnt() as u32
}

#[cfg(not(feature = "bitintr"))]
#[inline(always)]
fn count_ones(n: u64) -> u32 {
    n.count_ones()
}

/// A bitmask of letters allowed on a square, bit index = letter code. It
/// is inherently directional: when generating moves horizontally we
/// consult the vertical cross-set, built from the tiles above and below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossSet(pub u64);

impl CrossSet {
    /// Every letter allowed: the state of a square with no perpendicular
    /// neighbours.
    pub const TRIVIAL: CrossSet = CrossSet((1 << (MAX_ALPHABET_SIZE as u32 + 1)) - 1);

    pub fn allowed(self, letter: MachineLetter) -> bool {
        self.0 & (1u64 << letter.unblank().code()) != 0
    }

    pub fn set(&mut self, letter: MachineLetter) {
        self.0 |= 1u64 << letter.unblank().code();
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of letters in the set.
    pub fn len(self) -> usize {
        count_ones(self.0) as usize
    }

    /// Build a cross-set from a string of glyphs; a test convenience.
    /// ## Errors
    /// If a glyph is unknown.
    pub fn from_string(letters: &str, alph: &Alphabet) -> Result<CrossSet, Error> {
        let mut cs = CrossSet(0);
        for ml in alph.to_machine_word(letters)? {
            cs.set(ml);
        }
        Ok(cs)
    }
}

impl GameBoard {
    /// Traverse the tiles on the board backwards (right to left) through
    /// the GADDAG, starting at `col`. With `check_letter_set`, the letter
    /// at `left_most_col` is tested against the node's letter set instead
    /// of being traversed. Returns the reached node and whether the walk
    /// stayed on valid arcs.
    pub(crate) fn traverse_backwards(
        &self,
        row: i32,
        col: i32,
        node_idx: u32,
        check_letter_set: bool,
        left_most_col: i32,
        gd: &Gaddag,
    ) -> (u32, bool) {
        let mut col = col;
        let mut node_idx = node_idx;
        while self.pos_exists(row, col) {
            let ml = self.sq(row, col).letter();
            if ml == MachineLetter::EMPTY {
                break;
            }
            if check_letter_set && col == left_most_col {
                return (node_idx, gd.in_letter_set(node_idx, ml));
            }
            match gd.next_node_idx(node_idx, ml.unblank()) {
                Some(next) => node_idx = next,
                None => return (node_idx, false),
            }
            col -= 1;
        }
        (node_idx, true)
    }

    fn traverse_backwards_for_score(
        &self,
        row: i32,
        col: i32,
        dist: &LetterDistribution,
    ) -> i32 {
        let mut col = col;
        let mut score = 0;
        while self.pos_exists(row, col) {
            let ml = self.sq(row, col).letter();
            if ml == MachineLetter::EMPTY {
                break;
            }
            score += dist.score(ml);
            col -= 1;
        }
        score
    }

    /// Generate the cross-set and cross-score for a single square, in the
    /// current orientation, storing them in the `dir` slot.
    pub fn gen_cross_set(
        &mut self,
        row: i32,
        col: i32,
        dir: BoardDirection,
        gd: &Gaddag,
        dist: &LetterDistribution,
    ) {
        if !self.pos_exists(row, col) {
            return;
        }
        // An occupied square has no cross-set of its own.
        if !self.sq(row, col).is_empty() {
            let sq = self.sq_mut(row, col);
            sq.set_cross_set(dir, CrossSet(0));
            sq.set_cross_score(dir, 0);
            return;
        }
        // No neighbouring tile in this orientation: anything goes.
        if self.left_and_right_empty(row, col) {
            let sq = self.sq_mut(row, col);
            sq.set_cross_set(dir, CrossSet::TRIVIAL);
            sq.set_cross_score(dir, 0);
            return;
        }
        let right_col = self.word_edge(row, col + 1, RIGHT);
        if right_col == col {
            // Tiles to the left only. Traverse them backwards from the
            // root, then follow the separation arc; the letter set there
            // is exactly the cross-set.
            let (l_node_idx, l_path_valid) =
                self.traverse_backwards(row, col - 1, gd.root_node_index(), false, 0, gd);
            let score = self.traverse_backwards_for_score(row, col - 1, dist);
            self.sq_mut(row, col).set_cross_score(dir, score);

            if !l_path_valid {
                // The word on the board is not extendable (it may even be
                // a phony).
                self.sq_mut(row, col).set_cross_set(dir, CrossSet(0));
                return;
            }
            let cross_set = match gd.next_node_idx(l_node_idx, MachineLetter::SEPARATION) {
                Some(s_idx) => CrossSet(gd.letter_set(s_idx)),
                None => CrossSet(0),
            };
            self.sq_mut(row, col).set_cross_set(dir, cross_set);
        } else {
            // Tiles to the right; maybe to the left as well. Start at the
            // right edge and work back to this square.
            let left_col = self.word_edge(row, col - 1, LEFT);
            let (l_node_idx, l_path_valid) =
                self.traverse_backwards(row, right_col, gd.root_node_index(), false, 0, gd);
            let score_r = self.traverse_backwards_for_score(row, right_col, dist);
            let score_l = self.traverse_backwards_for_score(row, col - 1, dist);
            self.sq_mut(row, col).set_cross_score(dir, score_r + score_l);
            if !l_path_valid {
                self.sq_mut(row, col).set_cross_set(dir, CrossSet(0));
                return;
            }
            if left_col == col {
                // Only the right side is occupied: the letter set of the
                // node we reached is the cross-set.
                let cross_set = CrossSet(gd.letter_set(l_node_idx));
                self.sq_mut(row, col).set_cross_set(dir, cross_set);
            } else {
                // Both sides have tiles. For every arc out of the node,
                // speculatively continue backwards through the left run;
                // the letters whose continuation reaches a word join the
                // cross-set.
                let mut cross_set = CrossSet(0);
                let arcs: Vec<(MachineLetter, u32)> = gd.arcs(l_node_idx).collect();
                for (ml, next_idx) in arcs {
                    if ml == MachineLetter::SEPARATION {
                        continue;
                    }
                    let (_, success) =
                        self.traverse_backwards(row, col - 1, next_idx, true, left_col, gd);
                    if success {
                        cross_set.set(ml);
                    }
                }
                self.sq_mut(row, col).set_cross_set(dir, cross_set);
            }
        }
    }

    /// Generate cross-sets and cross-scores for every square, in both
    /// orientations via one transposition.
    pub fn gen_all_cross_sets(&mut self, gd: &Gaddag, dist: &LetterDistribution) {
        for row in 0..self.dim {
            for col in 0..self.dim {
                self.gen_cross_set(row, col, BoardDirection::Horizontal, gd, dist);
            }
        }
        self.transpose();
        for row in 0..self.dim {
            for col in 0..self.dim {
                self.gen_cross_set(row, col, BoardDirection::Vertical, gd, dist);
            }
        }
        self.transpose();
    }

    /// Incremental recomputation after a move: every tile the move placed
    /// creates new across-words whose flanks need fresh cross-sets, and
    /// the squares just before and after the main word do too.
    pub fn update_cross_sets_for_move(
        &mut self,
        m: &Move,
        gd: &Gaddag,
        dist: &LetterDistribution,
    ) {
        let (row, col, vertical) = m.coords_and_vertical();
        if vertical {
            self.calc_for_across(row, col, m, BoardDirection::Horizontal, gd, dist);
            self.transpose();
            self.calc_for_self(col, row, m, BoardDirection::Vertical, gd, dist);
            self.transpose();
        } else {
            self.calc_for_self(row, col, m, BoardDirection::Horizontal, gd, dist);
            self.transpose();
            self.calc_for_across(col, row, m, BoardDirection::Vertical, gd, dist);
            self.transpose();
        }
    }

    // Cross-sets on both sides of each across-word a tile of this move
    // created, and on the played square itself. Assumes the across-words
    // run horizontally in the current orientation.
    fn calc_for_across(
        &mut self,
        row_start: i32,
        col_start: i32,
        m: &Move,
        csd: BoardDirection,
        gd: &Gaddag,
        dist: &LetterDistribution,
    ) {
        for row in row_start..row_start + m.tiles().len() as i32 {
            if m.tiles()[(row - row_start) as usize] == MachineLetter::PLAYED_THROUGH {
                // No new across-word here.
                continue;
            }
            // The edges are still part of the word.
            let right_col = self.word_edge(row, col_start, RIGHT);
            let left_col = self.word_edge(row, col_start, LEFT);
            self.gen_cross_set(row, right_col + 1, csd, gd, dist);
            self.gen_cross_set(row, left_col - 1, csd, gd, dist);
            // This clears the cross-set on the just-played tile.
            self.gen_cross_set(row, col_start, csd, gd, dist);
        }
    }

    // Cross-sets along the main word itself, one square past each end.
    // Assumes the word runs horizontally in the current orientation.
    fn calc_for_self(
        &mut self,
        row_start: i32,
        col_start: i32,
        m: &Move,
        csd: BoardDirection,
        gd: &Gaddag,
        dist: &LetterDistribution,
    ) {
        for col in col_start - 1..=col_start + m.tiles().len() as i32 {
            self.gen_cross_set(row_start, col, csd, gd, dist);
        }
    }
}
