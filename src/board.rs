//! The game board: a grid of squares with premium multipliers, played
//! letters, per-direction cross-sets and anchors.
//!
//! Vertical operations reuse the horizontal code path by transposing the
//! grid; transposition is an involution and is guarded by a test.

mod cross_set;
#[cfg(test)]
pub(crate) mod samples;

pub use cross_set::CrossSet;

use crate::alphabet::{Alphabet, MachineLetter, MachineWord};
use crate::distribution::LetterDistribution;
use crate::error::Error;
use crate::lexicon::Gaddag;
use crate::play::Move;

/// Bonus for using all seven rack tiles in one play.
pub const BINGO_BONUS: i32 = 50;

/// The standard 15x15 crossword game board. `=` and `-` are triple and
/// double word squares, `"` and `'` triple and double letter squares, and
/// `*` the start square.
pub const CROSSWORD_GAME_BOARD: &[&str] = &[
    "=  '   =   '  =",
    " -   \"   \"   - ",
    "  -   ' '   -  ",
    "'  -   '   -  '",
    "    -     -    ",
    " \"   \"   \"   \" ",
    "  '   ' '   '  ",
    "=  '   *   '  =",
    "  '   ' '   '  ",
    " \"   \"   \"   \" ",
    "    -     -    ",
    "'  -   '   -  '",
    "  -   ' '   -  ",
    " -   \"   \"   - ",
    "=  '   =   '  =",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusSquare {
    NoBonus,
    StartSquare,
    Dls,
    Tls,
    Dws,
    Tws,
}

impl Default for BonusSquare {
    fn default() -> Self {
        BonusSquare::NoBonus
    }
}

impl BonusSquare {
    fn from_char(c: char) -> Result<BonusSquare, Error> {
        match c {
            ' ' => Ok(BonusSquare::NoBonus),
            '*' => Ok(BonusSquare::StartSquare),
            '\'' => Ok(BonusSquare::Dls),
            '"' => Ok(BonusSquare::Tls),
            '-' => Ok(BonusSquare::Dws),
            '=' => Ok(BonusSquare::Tws),
            _ => Err(Error::BadLayoutGlyph(c)),
        }
    }

    fn to_char(self) -> char {
        match self {
            BonusSquare::NoBonus => ' ',
            BonusSquare::StartSquare => '*',
            BonusSquare::Dls => '\'',
            BonusSquare::Tls => '"',
            BonusSquare::Dws => '-',
            BonusSquare::Tws => '=',
        }
    }
}

/// Direction selector for cross-sets, cross-scores and anchors. By
/// convention, generating plays horizontally consults the *vertical*
/// cross-set: the stored vertical set describes what fits with respect to
/// the vertical neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardDirection {
    Horizontal,
    Vertical,
}

pub(crate) const LEFT: i32 = -1;
pub(crate) const RIGHT: i32 = 1;

/// One board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Square {
    letter: MachineLetter,
    bonus: BonusSquare,
    h_cross_set: CrossSet,
    v_cross_set: CrossSet,
    h_cross_score: i32,
    v_cross_score: i32,
    h_anchor: bool,
    v_anchor: bool,
}

impl Square {
    pub fn is_empty(&self) -> bool {
        self.letter == MachineLetter::EMPTY
    }

    pub fn letter(&self) -> MachineLetter {
        self.letter
    }

    pub fn bonus(&self) -> BonusSquare {
        self.bonus
    }

    pub fn cross_set(&self, dir: BoardDirection) -> CrossSet {
        match dir {
            BoardDirection::Horizontal => self.h_cross_set,
            BoardDirection::Vertical => self.v_cross_set,
        }
    }

    pub fn set_cross_set(&mut self, dir: BoardDirection, cs: CrossSet) {
        match dir {
            BoardDirection::Horizontal => self.h_cross_set = cs,
            BoardDirection::Vertical => self.v_cross_set = cs,
        }
    }

    pub fn cross_score(&self, dir: BoardDirection) -> i32 {
        match dir {
            BoardDirection::Horizontal => self.h_cross_score,
            BoardDirection::Vertical => self.v_cross_score,
        }
    }

    pub fn set_cross_score(&mut self, dir: BoardDirection, score: i32) {
        match dir {
            BoardDirection::Horizontal => self.h_cross_score = score,
            BoardDirection::Vertical => self.v_cross_score = score,
        }
    }

    pub fn is_anchor(&self, dir: BoardDirection) -> bool {
        match dir {
            BoardDirection::Horizontal => self.h_anchor,
            BoardDirection::Vertical => self.v_anchor,
        }
    }

    fn set_anchor(&mut self, dir: BoardDirection) {
        match dir {
            BoardDirection::Horizontal => self.h_anchor = true,
            BoardDirection::Vertical => self.v_anchor = true,
        }
    }

    fn reset_anchors(&mut self) {
        self.h_anchor = false;
        self.v_anchor = false;
    }

    fn display_string(&self, alph: &Alphabet) -> String {
        if self.is_empty() {
            self.bonus.to_char().to_string()
        } else {
            alph.letter(self.letter)
        }
    }
}

/// The tiles found on a plaintext board, plus the racks it mentions, so
/// the caller can reconcile the bag.
#[derive(Debug, Default)]
pub struct TilesInPlay {
    pub on_board: Vec<MachineLetter>,
    pub rack1: Vec<MachineLetter>,
    pub rack2: Vec<MachineLetter>,
}

/// The playing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameBoard {
    squares: Vec<Square>,
    dim: i32,
    transposed: bool,
    tiles_played: u32,
}

impl GameBoard {
    /// Build a board from a premium-square layout.
    /// ## Errors
    /// If the layout is not square or contains unknown glyphs.
    pub fn make_board(layout: &[&str]) -> Result<GameBoard, Error> {
        let dim = layout.len();
        let mut squares = Vec::with_capacity(dim * dim);
        for row in layout {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != dim {
                return Err(Error::InvalidRowLength(chars.len(), dim));
            }
            for c in chars {
                squares.push(Square {
                    bonus: BonusSquare::from_char(c)?,
                    h_cross_set: CrossSet::TRIVIAL,
                    v_cross_set: CrossSet::TRIVIAL,
                    ..Square::default()
                });
            }
        }
        let mut board = GameBoard {
            squares,
            dim: dim as i32,
            transposed: false,
            tiles_played: 0,
        };
        board.update_all_anchors();
        Ok(board)
    }

    pub fn dim(&self) -> i32 {
        self.dim
    }

    pub fn tiles_played(&self) -> u32 {
        self.tiles_played
    }

    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    pub fn pos_exists(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.dim && col >= 0 && col < self.dim
    }

    pub(crate) fn sq(&self, row: i32, col: i32) -> &Square {
        &self.squares[(row * self.dim + col) as usize]
    }

    pub(crate) fn sq_mut(&mut self, row: i32, col: i32) -> &mut Square {
        &mut self.squares[(row * self.dim + col) as usize]
    }

    pub fn get_square(&self, row: i32, col: i32) -> &Square {
        self.sq(row, col)
    }

    pub fn get_letter(&self, row: i32, col: i32) -> MachineLetter {
        self.sq(row, col).letter
    }

    pub fn set_letter(&mut self, row: i32, col: i32, letter: MachineLetter) {
        self.sq_mut(row, col).letter = letter;
    }

    pub fn is_anchor(&self, row: i32, col: i32, dir: BoardDirection) -> bool {
        self.sq(row, col).is_anchor(dir)
    }

    /// Swap rows and columns. Cross-sets and anchors travel with their
    /// squares; direction arguments keep their meaning through the
    /// transposition. Involution.
    pub fn transpose(&mut self) {
        for row in 0..self.dim {
            for col in 0..row {
                let a = (row * self.dim + col) as usize;
                let b = (col * self.dim + row) as usize;
                self.squares.swap(a, b);
            }
        }
        self.transposed = !self.transposed;
    }

    /// Empty the board.
    pub fn clear(&mut self) {
        for sq in self.squares.iter_mut() {
            sq.letter = MachineLetter::EMPTY;
            sq.h_cross_set = CrossSet::TRIVIAL;
            sq.v_cross_set = CrossSet::TRIVIAL;
            sq.h_cross_score = 0;
            sq.v_cross_score = 0;
        }
        self.tiles_played = 0;
        self.transposed = false;
        self.update_all_anchors();
    }

    fn left_and_right_empty(&self, row: i32, col: i32) -> bool {
        !(self.pos_exists(row, col - 1) && !self.sq(row, col - 1).is_empty())
            && !(self.pos_exists(row, col + 1) && !self.sq(row, col + 1).is_empty())
    }

    /// Walk along occupied squares in `dir` and return the last occupied
    /// column, or the starting column minus `dir` if it was empty.
    pub(crate) fn word_edge(&self, row: i32, col: i32, dir: i32) -> i32 {
        let mut col = col;
        while self.pos_exists(row, col) && !self.sq(row, col).is_empty() {
            col += dir;
        }
        col - dir
    }

    fn update_anchors(&mut self, row: i32, col: i32) {
        let tile_above = row > 0 && !self.sq(row - 1, col).is_empty();
        let tile_below = row < self.dim - 1 && !self.sq(row + 1, col).is_empty();
        let tile_left = col > 0 && !self.sq(row, col - 1).is_empty();
        let tile_right = col < self.dim - 1 && !self.sq(row, col + 1).is_empty();
        let tile_here = !self.sq(row, col).is_empty();

        let sq = self.sq_mut(row, col);
        sq.reset_anchors();
        if tile_here {
            // An occupied square seeds generation when it is the last
            // tile of its run in the direction of travel.
            if !tile_right {
                sq.set_anchor(BoardDirection::Horizontal);
            }
            if !tile_below {
                sq.set_anchor(BoardDirection::Vertical);
            }
        } else {
            // An empty square is an anchor only perpendicular to its
            // neighbours; in-line empties are covered by the occupied
            // anchors of the run itself.
            if !tile_left && !tile_right && (tile_above || tile_below) {
                sq.set_anchor(BoardDirection::Horizontal);
            }
            if !tile_above && !tile_below && (tile_left || tile_right) {
                sq.set_anchor(BoardDirection::Vertical);
            }
        }
    }

    /// Recompute every anchor from scratch. On an empty board only the
    /// start square anchors, in both directions.
    pub fn update_all_anchors(&mut self) {
        if self.tiles_played > 0 {
            for row in 0..self.dim {
                for col in 0..self.dim {
                    self.update_anchors(row, col);
                }
            }
        } else {
            for sq in self.squares.iter_mut() {
                sq.reset_anchors();
            }
            let center = self.dim / 2;
            let sq = self.sq_mut(center, center);
            sq.set_anchor(BoardDirection::Horizontal);
            sq.set_anchor(BoardDirection::Vertical);
        }
    }

    /// Score a horizontal word placement. `word` spans the whole main
    /// word, played-through markers included; the caller transposes first
    /// for vertical plays and passes the matching `cross_dir`.
    ///
    /// Letter premiums apply to fresh tiles only; word premiums multiply
    /// the main word and any cross-word a fresh tile makes. A fresh tile
    /// contributes its cross-word whenever it actually has a
    /// perpendicular neighbour; the stored cross-score may legitimately
    /// be zero (all-blank cross-words).
    pub fn score_word(
        &self,
        word: &[MachineLetter],
        row: i32,
        col: i32,
        tiles_played: u8,
        cross_dir: BoardDirection,
        dist: &LetterDistribution,
    ) -> i32 {
        let mut main_word_score = 0;
        let mut cross_scores = 0;
        let mut word_multiplier = 1;
        let bingo_bonus = if tiles_played == 7 { BINGO_BONUS } else { 0 };

        for (idx, &tile) in word.iter().enumerate() {
            let col = col + idx as i32;
            let sq = self.sq(row, col);
            let fresh = tile != MachineLetter::PLAYED_THROUGH;
            let ml = if fresh { tile } else { sq.letter };
            let mut letter_multiplier = 1;
            let mut this_word_multiplier = 1;
            if fresh {
                match sq.bonus {
                    BonusSquare::Tws => {
                        this_word_multiplier = 3;
                        word_multiplier *= 3;
                    }
                    BonusSquare::Dws | BonusSquare::StartSquare => {
                        this_word_multiplier = 2;
                        word_multiplier *= 2;
                    }
                    BonusSquare::Dls => letter_multiplier = 2,
                    BonusSquare::Tls => letter_multiplier = 3,
                    BonusSquare::NoBonus => {}
                }
            }
            let ls = dist.score(ml);
            main_word_score += ls * letter_multiplier;

            let has_cross_word = (row > 0 && !self.sq(row - 1, col).is_empty())
                || (row < self.dim - 1 && !self.sq(row + 1, col).is_empty());
            if fresh && has_cross_word {
                cross_scores += (sq.cross_score(cross_dir) + ls * letter_multiplier)
                    * this_word_multiplier;
            }
        }
        main_word_score * word_multiplier + cross_scores + bingo_bonus
    }

    /// All words a move would form, cross-words in tile order and the
    /// main word last. Letters come back with blank designations removed.
    /// The move is not played; the board is unchanged.
    pub fn formed_words(&self, m: &Move) -> Result<Vec<MachineWord>, Error> {
        let (row, col, vertical) = m.coords_and_vertical();
        let (dr, dc) = if vertical { (1, 0) } else { (0, 1) };
        let tiles = m.tiles();
        let last_row = row + dr * (tiles.len() as i32 - 1);
        let last_col = col + dc * (tiles.len() as i32 - 1);
        if !self.pos_exists(row, col) || !self.pos_exists(last_row, last_col) {
            return Err(Error::IllegalPlay(format!(
                "play at {},{} of length {} does not fit",
                row,
                col,
                tiles.len()
            )));
        }

        let mut words = Vec::new();
        let mut main_word = MachineWord::new();
        for (idx, &tile) in tiles.iter().enumerate() {
            let (r, c) = (row + dr * idx as i32, col + dc * idx as i32);
            let fresh = tile != MachineLetter::PLAYED_THROUGH;
            let ml = if fresh { tile } else { self.sq(r, c).letter };
            main_word.push(ml.unblank());
            if fresh {
                // perpendicular run through this square, if any
                if let Some(cross) = self.cross_word_at(r, c, ml, dc, dr) {
                    words.push(cross);
                }
            }
        }
        words.push(main_word);
        Ok(words)
    }

    // The perpendicular word formed by placing `ml` at (row, col);
    // (pdr, pdc) is the perpendicular direction.
    fn cross_word_at(
        &self,
        row: i32,
        col: i32,
        ml: MachineLetter,
        pdr: i32,
        pdc: i32,
    ) -> Option<MachineWord> {
        let mut r = row - pdr;
        let mut c = col - pdc;
        while self.pos_exists(r, c) && !self.sq(r, c).is_empty() {
            r -= pdr;
            c -= pdc;
        }
        r += pdr;
        c += pdc;
        let mut word = MachineWord::new();
        loop {
            if (r, c) == (row, col) {
                word.push(ml.unblank());
            } else if self.pos_exists(r, c) && !self.sq(r, c).is_empty() {
                word.push(self.sq(r, c).letter.unblank());
            } else {
                break;
            }
            r += pdr;
            c += pdc;
        }
        if word.len() > 1 {
            Some(word)
        } else {
            None
        }
    }

    /// Check a placement against the rules without touching the board.
    /// ## Errors
    /// [`Error::IllegalPlay`] describing the violation.
    pub fn error_if_illegal_play(
        &self,
        row: i32,
        col: i32,
        vertical: bool,
        word: &[MachineLetter],
    ) -> Result<(), Error> {
        let (dr, dc) = if vertical { (1, 0) } else { (0, 1) };
        let center = self.dim / 2;
        let mut fresh_tiles = 0;
        let mut connected = false;
        let mut covers_start = false;
        for (idx, &tile) in word.iter().enumerate() {
            let (r, c) = (row + dr * idx as i32, col + dc * idx as i32);
            if !self.pos_exists(r, c) {
                return Err(Error::IllegalPlay("play extends off the board".to_string()));
            }
            if tile == MachineLetter::PLAYED_THROUGH {
                if self.sq(r, c).is_empty() {
                    return Err(Error::IllegalPlay(format!(
                        "playing through empty square {},{}",
                        r, c
                    )));
                }
                connected = true;
            } else {
                if !self.sq(r, c).is_empty() {
                    return Err(Error::IllegalPlay(format!(
                        "square {},{} already has a tile",
                        r, c
                    )));
                }
                fresh_tiles += 1;
                if (r, c) == (center, center) {
                    covers_start = true;
                }
                let neighbours = [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)];
                if neighbours
                    .iter()
                    .any(|&(nr, nc)| self.pos_exists(nr, nc) && !self.sq(nr, nc).is_empty())
                {
                    connected = true;
                }
            }
        }
        if fresh_tiles == 0 {
            return Err(Error::IllegalPlay("no tiles played".to_string()));
        }
        if self.tiles_played == 0 {
            if !covers_start {
                return Err(Error::IllegalPlay(
                    "the opening play must cover the start square".to_string(),
                ));
            }
        } else if !connected {
            return Err(Error::IllegalPlay(
                "play does not connect to existing tiles".to_string(),
            ));
        }
        Ok(())
    }

    /// Stamp a move's tiles onto the board, then bring the affected
    /// cross-sets and all anchors up to date.
    pub fn play_move(&mut self, m: &Move, gd: &Gaddag, dist: &LetterDistribution) {
        let (row, col, vertical) = m.coords_and_vertical();
        let (dr, dc) = if vertical { (1, 0) } else { (0, 1) };
        for (idx, &tile) in m.tiles().iter().enumerate() {
            if tile == MachineLetter::PLAYED_THROUGH {
                continue;
            }
            self.set_letter(row + dr * idx as i32, col + dc * idx as i32, tile);
        }
        self.tiles_played += m.tiles_played() as u32;
        self.update_cross_sets_for_move(m, gd, dist);
        self.update_all_anchors();
    }

    /// Set one row from a string, one character per square; spaces are
    /// empty squares. Test and display helper.
    /// ## Errors
    /// If a character is not a known glyph.
    pub fn set_row(&mut self, row: i32, letters: &str, alph: &Alphabet) -> Result<(), Error> {
        for col in 0..self.dim {
            if !self.sq(row, col).is_empty() {
                self.tiles_played -= 1;
            }
            self.set_letter(row, col, MachineLetter::EMPTY);
        }
        for (idx, ch) in letters.chars().enumerate() {
            if ch != ' ' {
                let ml = alph.val(&ch.to_string())?;
                self.set_letter(row, idx as i32, ml);
                self.tiles_played += 1;
            }
        }
        Ok(())
    }

    /// Read a plaintext board: the 15 framed rows of `|`-delimited cells,
    /// two characters per cell, lowercase for blank-designated tiles.
    /// Surrounding annotation lines are tolerated and ignored. Returns
    /// the tiles found so the caller can reconcile the bag.
    /// ## Errors
    /// If the text does not contain exactly `dim` board rows.
    pub fn set_from_plaintext(
        &mut self,
        text: &str,
        alph: &Alphabet,
    ) -> Result<TilesInPlay, Error> {
        let mut tiles_in_play = TilesInPlay::default();
        let rows: Vec<&str> = text
            .lines()
            .filter_map(|line| {
                let start = line.find('|')?;
                let end = line.rfind('|')?;
                if end > start {
                    Some(&line[start + 1..end])
                } else {
                    None
                }
            })
            .collect();
        if rows.len() != self.dim as usize {
            return Err(Error::InvalidRowCount(rows.len(), self.dim as usize));
        }
        self.tiles_played = 0;
        for (row, content) in rows.iter().enumerate() {
            let chars: Vec<char> = content.chars().collect();
            for col in 0..self.dim as usize {
                let letter = match chars.get(col * 2) {
                    Some(&ch) if ch != ' ' => alph.val(&ch.to_string()).ok(),
                    _ => None,
                };
                match letter {
                    Some(ml) => {
                        self.set_letter(row as i32, col as i32, ml);
                        self.tiles_played += 1;
                        tiles_in_play.on_board.push(ml);
                    }
                    // Premium annotations in empty cells parse as no tile.
                    None => self.set_letter(row as i32, col as i32, MachineLetter::EMPTY),
                }
            }
        }
        Ok(tiles_in_play)
    }

    /// Render the board with coordinates, for display and debugging.
    pub fn to_display_text(&self, alph: &Alphabet) -> String {
        let mut out = String::from("   ");
        for col in 0..self.dim {
            out.push((b'A' + col as u8) as char);
            out.push(' ');
        }
        out.push('\n');
        out.push_str("   ");
        out.push_str(&"-".repeat(self.dim as usize * 2));
        out.push('\n');
        for row in 0..self.dim {
            out.push_str(&format!("{:2}|", row + 1));
            for col in 0..self.dim {
                out.push_str(&self.sq(row, col).display_string(alph));
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    /// Copy another board's state into this one without reallocating.
    pub fn copy_from(&mut self, other: &GameBoard) {
        self.squares.clone_from(&other.squares);
        self.dim = other.dim;
        self.transposed = other.transposed;
        self.tiles_played = other.tiles_played;
    }
}
