//! Moves: placements, exchanges, passes and scoring adjustments, plus the
//! human-readable coordinate syntax.

use crate::alphabet::{Alphabet, MachineLetter, MachineWord};
use crate::error::Error;

/// What a move does. Beyond the three moves a player can make, the
/// remaining variants are score adjustments that appear in game
/// histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    Play,
    Exchange,
    Pass,
    Challenge,
    PhonyTilesReturned,
    ChallengeBonus,
    EndgameTiles,
    LostTileScore,
    LostScoreOnTime,
}

/// A single move. For a `Play`, `tiles` spans the whole main word, with
/// [`MachineLetter::PLAYED_THROUGH`] marking board tiles the play passes
/// over; `row`/`col` name the topmost/leftmost square of the word. For an
/// `Exchange`, `tiles` lists the returned tiles and the coordinates are
/// meaningless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    action: MoveAction,
    tiles: MachineWord,
    leave: MachineWord,
    score: i32,
    row: i32,
    col: i32,
    vertical: bool,
    tiles_played: u8,
}

impl Move {
    pub fn new_scoring(
        score: i32,
        tiles: MachineWord,
        leave: MachineWord,
        vertical: bool,
        tiles_played: u8,
        row: i32,
        col: i32,
    ) -> Move {
        Move {
            action: MoveAction::Play,
            tiles,
            leave,
            score,
            row,
            col,
            vertical,
            tiles_played,
        }
    }

    /// Build a scoring move from coordinate and word strings; handy in
    /// tests and anywhere a position is described textually.
    /// ## Errors
    /// If the coordinates or the word do not parse.
    pub fn new_scoring_simple(
        score: i32,
        coords: &str,
        word: &str,
        leave: &str,
        alph: &Alphabet,
    ) -> Result<Move, Error> {
        let (row, col, vertical) = from_board_game_coords(coords)?;
        let tiles = alph.to_machine_word(word)?;
        let leave = alph.to_machine_word(leave)?;
        let tiles_played = tiles
            .iter()
            .filter(|&&t| t != MachineLetter::PLAYED_THROUGH)
            .count() as u8;
        Ok(Move::new_scoring(
            score,
            tiles,
            leave,
            vertical,
            tiles_played,
            row,
            col,
        ))
    }

    pub fn new_exchange(tiles: MachineWord, leave: MachineWord) -> Move {
        Move {
            action: MoveAction::Exchange,
            tiles,
            leave,
            score: 0,
            row: 0,
            col: 0,
            vertical: false,
            tiles_played: 0,
        }
    }

    pub fn new_pass() -> Move {
        Move {
            action: MoveAction::Pass,
            tiles: MachineWord::new(),
            leave: MachineWord::new(),
            score: 0,
            row: 0,
            col: 0,
            vertical: false,
            tiles_played: 0,
        }
    }

    /// A pure score adjustment (endgame tiles, challenge bonus, ...).
    pub fn new_score_adjustment(action: MoveAction, score: i32) -> Move {
        Move {
            action,
            tiles: MachineWord::new(),
            leave: MachineWord::new(),
            score,
            row: 0,
            col: 0,
            vertical: false,
            tiles_played: 0,
        }
    }

    pub fn action(&self) -> MoveAction {
        self.action
    }

    pub fn tiles(&self) -> &MachineWord {
        &self.tiles
    }

    pub fn leave(&self) -> &MachineWord {
        &self.leave
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Number of tiles this play takes off the rack.
    pub fn tiles_played(&self) -> u8 {
        self.tiles_played
    }

    pub fn coords_and_vertical(&self) -> (i32, i32, bool) {
        (self.row, self.col, self.vertical)
    }

    /// The move's origin in board-game notation (`"K9"` for vertical,
    /// `"9K"` for horizontal).
    pub fn board_coords(&self) -> String {
        let col_letter = (b'A' + self.col as u8) as char;
        if self.vertical {
            format!("{}{}", col_letter, self.row + 1)
        } else {
            format!("{}{}", self.row + 1, col_letter)
        }
    }

    /// One-line description, e.g. `"K9 TAeL"` or `"(exch ABC)"`.
    pub fn short_description(&self, alph: &Alphabet) -> String {
        match self.action {
            MoveAction::Play => format!(
                "{} {}",
                self.board_coords(),
                alph.user_visible(&self.tiles)
            ),
            MoveAction::Exchange => format!("(exch {})", alph.user_visible(&self.tiles)),
            MoveAction::Pass => "(pass)".to_string(),
            _ => format!("(adjust {})", self.score),
        }
    }
}

/// Parse board-game coordinates. Column-letter-first (`"K9"`) means a
/// vertical play down that column; row-number-first (`"9K"`) means a
/// horizontal play along that row. Rows are 1-based in the text.
/// ## Errors
/// [`Error::BadCoordinates`] on anything else.
pub fn from_board_game_coords(coords: &str) -> Result<(i32, i32, bool), Error> {
    let bad = || Error::BadCoordinates(coords.to_string());
    let chars: Vec<char> = coords.trim().chars().collect();
    if chars.len() < 2 {
        return Err(bad());
    }
    let first = chars[0];
    if first.is_ascii_alphabetic() {
        // vertical: letter then digits
        let digits: String = chars[1..].iter().collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(bad());
        }
        let row: i32 = digits.parse().map_err(|_| bad())?;
        let col = first.to_ascii_uppercase() as i32 - 'A' as i32;
        Ok((row - 1, col, true))
    } else if first.is_ascii_digit() {
        // horizontal: digits then letter
        let letter = *chars.last().ok_or_else(bad)?;
        if !letter.is_ascii_alphabetic() {
            return Err(bad());
        }
        let digits: String = chars[..chars.len() - 1].iter().collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(bad());
        }
        let row: i32 = digits.parse().map_err(|_| bad())?;
        let col = letter.to_ascii_uppercase() as i32 - 'A' as i32;
        Ok((row - 1, col, false))
    } else {
        Err(bad())
    }
}
