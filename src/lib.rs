#![deny(
    clippy::used_underscore_binding,
    clippy::map_unwrap_or,
    clippy::int_plus_one,
    clippy::string_add_assign,
    clippy::invalid_upcast_comparisons,
    clippy::mut_mut,
    clippy::items_after_statements,
    clippy::mem_forget,
    clippy::maybe_infinite_iter
)]

//! A crossword game engine for Rust.
//! <br>
//! Given a board state, a rack of tiles and a lexicon, this crate
//! enumerates every legal play with its score, and exposes the make and
//! unmake primitives a search (Monte-Carlo simulation, endgame solving,
//! play selection) is built on.
//!
//! The moving parts: the lexicon automata (a DAWG for anagramming and a
//! GADDAG for placement), the board with its per-square cross-set
//! acceleration, the Gordon-style move generator, and the game state
//! with its pre-allocated snapshot stack.
//!
//! # Basic usage
//! ```
//! use crossword_engine::{
//!     Gaddag, Game, GameRules, GordonGenerator, LetterDistribution, Rack,
//!     CROSSWORD_GAME_BOARD,
//! };
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), crossword_engine::Error> {
//! let dist = Arc::new(LetterDistribution::english());
//! let gaddag = Arc::new(Gaddag::from_words(
//!     "demo",
//!     &["RUST", "RUSTS", "TRUSS"],
//!     dist.alphabet(),
//! )?);
//! let rules = GameRules::new(Arc::clone(&gaddag), Arc::clone(&dist), CROSSWORD_GAME_BOARD)?;
//! let mut game = Game::new(&rules, ["you", "me"], StdRng::seed_from_u64(1));
//! game.start_game();
//!
//! let mut gen = GordonGenerator::new(gaddag, dist);
//! let rack = Rack::from_string("RUSTSX?", game.alphabet())?;
//! let mut board = game.board().clone();
//! gen.gen_all(&mut board, &rack, game.bag().tiles_remaining() >= 7);
//! for play in gen.plays() {
//!     println!("{} {}", play.short_description(game.alphabet()), play.score());
//! }
//! # Ok(())
//! # }
//! ```

mod alphabet;
mod anagrammer;
mod bag;
mod board;
mod distribution;
mod error;
mod game;
mod lexicon;
mod movegen;
mod play;
mod rack;
#[cfg(test)]
mod testutil;

pub use crate::alphabet::{
    Alphabet, MachineLetter, MachineWord, BLANK_MASK, MAX_ALPHABET_SIZE, WORD_DIM,
};
pub use crate::anagrammer::{anagram, AnagramMode};
pub use crate::bag::{Bag, EXCHANGE_LIMIT};
pub use crate::board::{
    BoardDirection, BonusSquare, CrossSet, GameBoard, Square, TilesInPlay, BINGO_BONUS,
    CROSSWORD_GAME_BOARD,
};
pub use crate::distribution::LetterDistribution;
pub use crate::error::Error;
pub use crate::game::{Game, GameEvent, GameHistory, GameRules, RACK_SIZE};
pub use crate::lexicon::{
    load_dawg_cached, load_gaddag_cached, Automaton, Dawg, Gaddag, LETTER_BIT_SHIFT,
    NODE_IDX_BIT_MASK,
};
pub use crate::movegen::GordonGenerator;
pub use crate::play::{from_board_game_coords, Move, MoveAction};
pub use crate::rack::Rack;
