//! Game state: turn accounting, applying moves, and the pre-allocated
//! state stack that makes make/unmake cheap enough for search.

use crate::alphabet::{Alphabet, MachineLetter, MachineWord};
use crate::bag::{Bag, EXCHANGE_LIMIT};
use crate::board::GameBoard;
use crate::distribution::LetterDistribution;
use crate::error::Error;
use crate::lexicon::Gaddag;
use crate::movegen::GordonGenerator;
use crate::play::{from_board_game_coords, Move, MoveAction};
use crate::rack::Rack;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::sync::Arc;

/// Tiles on a full rack.
pub const RACK_SIZE: usize = 7;

/// Consecutive scoreless turns that end a game.
const MAX_SCORELESS_TURNS: u32 = 6;

/// The capability bundle a game is built from: one lexicon, one board
/// layout, one letter distribution.
#[derive(Debug, Clone)]
pub struct GameRules {
    gaddag: Arc<Gaddag>,
    dist: Arc<LetterDistribution>,
    board: GameBoard,
}

impl GameRules {
    /// ## Errors
    /// If the board layout does not parse.
    pub fn new(
        gaddag: Arc<Gaddag>,
        dist: Arc<LetterDistribution>,
        layout: &[&str],
    ) -> Result<GameRules, Error> {
        Ok(GameRules {
            gaddag,
            dist,
            board: GameBoard::make_board(layout)?,
        })
    }

    pub fn gaddag(&self) -> &Arc<Gaddag> {
        &self.gaddag
    }

    pub fn letter_distribution(&self) -> &Arc<LetterDistribution> {
        &self.dist
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }
}

#[derive(Debug, Clone)]
struct PlayerState {
    name: String,
    rack: Rack,
    points: i32,
}

/// One recorded turn: the rack the player held and what they did with it.
#[derive(Debug, Clone)]
pub struct GameEvent {
    pub rack: MachineWord,
    pub play: Move,
}

/// A lightweight game record, enough to replay a game to any turn.
#[derive(Debug, Clone, Default)]
pub struct GameHistory {
    pub players: [String; 2],
    pub events: Vec<GameEvent>,
}

// A pre-allocated snapshot of everything a move can touch. The bag is
// backed up as a tile sequence only; random state is not snapshotted.
#[derive(Debug)]
struct StateBackup {
    board: GameBoard,
    bag_tiles: Vec<MachineLetter>,
    racks: [Rack; 2],
    points: [i32; 2],
    playing: bool,
    scoreless_turns: u32,
    onturn: usize,
    turnnum: u32,
}

/// The main game structure: board, bag, two players, history and the
/// state stack. It does not care how it is played; search engines and
/// interactive frontends drive it the same way.
#[derive(Debug)]
pub struct Game {
    gaddag: Arc<Gaddag>,
    alph: Arc<Alphabet>,
    dist: Arc<LetterDistribution>,
    board: GameBoard,
    bag: Bag,
    rng: StdRng,

    playing: bool,
    scoreless_turns: u32,
    onturn: usize,
    turnnum: u32,
    players: [PlayerState; 2],
    history: GameHistory,

    state_stack: Vec<StateBackup>,
    stack_ptr: usize,
}

impl Game {
    /// A new game between two named players. Racks start empty; call
    /// [`start_game`](Game::start_game) to deal.
    pub fn new(rules: &GameRules, players: [&str; 2], mut rng: StdRng) -> Game {
        let dist = Arc::clone(rules.letter_distribution());
        let alph = Arc::clone(dist.alphabet());
        let bag = dist.make_bag(StdRng::from_seed(rng.gen()));
        let size = alph.len();
        let mk = |name: &str| PlayerState {
            name: name.to_string(),
            rack: Rack::new(size),
            points: 0,
        };
        Game {
            gaddag: Arc::clone(rules.gaddag()),
            alph,
            dist,
            board: rules.board().clone(),
            bag,
            rng,
            playing: false,
            scoreless_turns: 0,
            onturn: 0,
            turnnum: 0,
            players: [mk(players[0]), mk(players[1])],
            history: GameHistory {
                players: [players[0].to_string(), players[1].to_string()],
                events: Vec::new(),
            },
            state_stack: Vec::new(),
            stack_ptr: 0,
        }
    }

    /// Instantiate a game from a history and play to `turnnum`.
    /// ## Errors
    /// If the replay fails or the turn is out of range.
    pub fn new_from_history(
        history: &GameHistory,
        rules: &GameRules,
        turnnum: usize,
        rng: StdRng,
    ) -> Result<Game, Error> {
        let mut game = Game::new(
            rules,
            [history.players[0].as_str(), history.players[1].as_str()],
            rng,
        );
        game.history = history.clone();
        game.play_to_turn(turnnum)?;
        Ok(game)
    }

    /// Deal a fresh game: clear the board, refill and reshuffle the bag,
    /// randomly pick who goes first, draw seven tiles each.
    pub fn start_game(&mut self) {
        self.board.clear();
        self.bag.refill();
        if self.rng.gen_range(0..2) == 0 {
            self.players.swap(0, 1);
        }
        self.history.players = [self.players[0].name.clone(), self.players[1].name.clone()];
        self.history.events.clear();
        for p in self.players.iter_mut() {
            let tiles = self.bag.draw_at_most(RACK_SIZE);
            p.rack.set(&tiles);
            p.points = 0;
        }
        self.onturn = 0;
        self.turnnum = 0;
        self.scoreless_turns = 0;
        self.playing = true;
    }

    /// Pre-size the state stack. Depth should cover the plies any search
    /// on this game will make; each slot is allocated once, here.
    pub fn set_state_stack_length(&mut self, length: usize) {
        self.state_stack.clear();
        self.state_stack.reserve_exact(length);
        for _ in 0..length {
            self.state_stack.push(StateBackup {
                board: self.board.clone(),
                bag_tiles: self.bag.tiles().to_vec(),
                racks: [self.players[0].rack.clone(), self.players[1].rack.clone()],
                points: [0, 0],
                playing: self.playing,
                scoreless_turns: 0,
                onturn: 0,
                turnnum: 0,
            });
        }
        self.stack_ptr = 0;
    }

    fn backup_state(&mut self) {
        assert!(
            self.stack_ptr < self.state_stack.len(),
            "state stack overflow: sized for {} plies",
            self.state_stack.len()
        );
        let st = &mut self.state_stack[self.stack_ptr];
        st.board.copy_from(&self.board);
        st.bag_tiles.clear();
        st.bag_tiles.extend_from_slice(self.bag.tiles());
        st.racks[0].copy_from(&self.players[0].rack);
        st.racks[1].copy_from(&self.players[1].rack);
        st.points = [self.players[0].points, self.players[1].points];
        st.playing = self.playing;
        st.scoreless_turns = self.scoreless_turns;
        st.onturn = self.onturn;
        st.turnnum = self.turnnum;
        self.stack_ptr += 1;
    }

    fn restore_state(&mut self, idx: usize) {
        let st = &self.state_stack[idx];
        self.board.copy_from(&st.board);
        self.bag.set_tiles(&st.bag_tiles);
        self.players[0].rack.copy_from(&st.racks[0]);
        self.players[1].rack.copy_from(&st.racks[1]);
        self.players[0].points = st.points[0];
        self.players[1].points = st.points[1];
        self.playing = st.playing;
        self.scoreless_turns = st.scoreless_turns;
    }

    /// Apply a move. With `backup`, a snapshot is pushed first so the
    /// move can be unplayed; without it, the move is recorded in the
    /// game history.
    /// ## Errors
    /// Rule violations (an exchange the bag cannot cover) leave the game
    /// unmutated.
    /// ## Panics
    /// If `backup` is requested and the state stack is exhausted.
    pub fn play_move(&mut self, m: &Move, backup: bool) -> Result<(), Error> {
        // Validate before snapshotting or mutating anything.
        if m.action() == MoveAction::Exchange && self.bag.tiles_remaining() < EXCHANGE_LIMIT {
            return Err(Error::CannotExchange(EXCHANGE_LIMIT));
        }
        if backup {
            self.backup_state();
        }
        let rack_before = self.players[self.onturn].rack.tiles_on();
        let mut extra_events: Vec<Move> = Vec::new();

        match m.action() {
            MoveAction::Play => {
                self.board.play_move(m, &self.gaddag, &self.dist);
                let score = m.score();
                if score != 0 {
                    self.scoreless_turns = 0;
                }
                self.players[self.onturn].points += score;

                let mut tiles = self.bag.draw_at_most(m.tiles_played() as usize);
                tiles.extend_from_slice(m.leave());
                self.players[self.onturn].rack.set(&tiles);

                if self.players[self.onturn].rack.is_empty() {
                    self.playing = false;
                    let other = (self.onturn + 1) % 2;
                    let unplayed = 2 * self.players[other].rack.score_on(&self.dist);
                    self.players[self.onturn].points += unplayed;
                    extra_events
                        .push(Move::new_score_adjustment(MoveAction::EndgameTiles, unplayed));
                }
            }
            MoveAction::Pass => {
                self.scoreless_turns += 1;
            }
            MoveAction::Exchange => {
                let mut tiles = self.bag.exchange(m.tiles())?;
                tiles.extend_from_slice(m.leave());
                self.players[self.onturn].rack.set(&tiles);
                self.scoreless_turns += 1;
            }
            // Score adjustments carry their sign at creation time.
            _ => {
                self.players[self.onturn].points += m.score();
            }
        }

        if self.scoreless_turns == MAX_SCORELESS_TURNS {
            self.playing = false;
            for p in self.players.iter_mut() {
                p.points -= p.rack.score_on(&self.dist);
            }
        }

        if !backup {
            self.history.events.push(GameEvent {
                rack: rack_before,
                play: m.clone(),
            });
            for extra in extra_events {
                self.history.events.push(GameEvent {
                    rack: MachineWord::new(),
                    play: extra,
                });
            }
        }

        self.onturn = (self.onturn + 1) % 2;
        self.turnnum += 1;
        Ok(())
    }

    /// Restore the state from before the last backed-up move.
    /// ## Panics
    /// If there is no snapshot to pop: strictly one unplay per backed-up
    /// play.
    pub fn unplay_last_move(&mut self) {
        assert!(self.stack_ptr > 0, "state stack underflow");
        self.stack_ptr -= 1;
        // Turn counters advance uniformly; they are recomputed rather
        // than restored.
        self.turnnum -= 1;
        self.onturn = (self.onturn + 1) % 2;
        self.restore_state(self.stack_ptr);
    }

    /// Rewind the whole stack, back to the first snapshot.
    pub fn reset_to_first_state(&mut self) {
        assert!(self.stack_ptr > 0, "state stack is empty");
        self.onturn = self.state_stack[0].onturn;
        self.turnnum = self.state_stack[0].turnnum;
        self.restore_state(0);
        self.stack_ptr = 0;
    }

    /// Deep copy for a parallel search worker. The automata are shared,
    /// the bag gets a fresh random source, and the history stays with
    /// the original. The copy's stack is its own, same depth, rewound.
    pub fn copy(&self) -> Game {
        let mut rng = StdRng::from_entropy();
        let bag = self.bag.copy(StdRng::from_seed(rng.gen()));
        let mut copy = Game {
            gaddag: Arc::clone(&self.gaddag),
            alph: Arc::clone(&self.alph),
            dist: Arc::clone(&self.dist),
            board: self.board.clone(),
            bag,
            rng,
            playing: self.playing,
            scoreless_turns: self.scoreless_turns,
            onturn: self.onturn,
            turnnum: self.turnnum,
            players: self.players.clone(),
            history: GameHistory::default(),
            state_stack: Vec::new(),
            stack_ptr: 0,
        };
        copy.set_state_stack_length(self.state_stack.len());
        copy
    }

    /// Replay the recorded history up to (not including) `turnnum`.
    /// ## Errors
    /// If `turnnum` exceeds the history or a recorded move fails.
    pub fn play_to_turn(&mut self, turnnum: usize) -> Result<(), Error> {
        if turnnum > self.history.events.len() {
            return Err(Error::TurnOutOfRange(self.history.events.len()));
        }
        self.board.clear();
        self.bag.refill();
        for p in self.players.iter_mut() {
            p.points = 0;
            p.rack.clear();
        }
        self.turnnum = 0;
        self.onturn = 0;
        self.scoreless_turns = 0;
        self.playing = true;

        let events: Vec<GameEvent> = self.history.events[..turnnum].to_vec();
        for evt in &events {
            if !evt.rack.is_empty() {
                let mut rack = Rack::new(self.alph.len());
                rack.set(&evt.rack);
                self.set_rack_for(self.onturn, rack)?;
            }
            self.replay_event(&evt.play)?;
        }
        // The side to move now gets a random rack unless the history
        // already pinned one.
        self.set_random_rack(self.onturn);
        for p in &self.players {
            if p.rack.is_empty() {
                self.playing = false;
            }
        }
        Ok(())
    }

    // Apply one recorded event. Like play_move, minus history writing and
    // end-of-game bookkeeping, which the history carries explicitly.
    fn replay_event(&mut self, m: &Move) -> Result<(), Error> {
        match m.action() {
            MoveAction::Play => {
                self.board.play_move(m, &self.gaddag, &self.dist);
                self.players[self.onturn].points += m.score();
                let mut tiles = self.bag.draw_at_most(m.tiles_played() as usize);
                tiles.extend_from_slice(m.leave());
                self.players[self.onturn].rack.set(&tiles);
            }
            MoveAction::Exchange => {
                let mut tiles = self.bag.exchange(m.tiles())?;
                tiles.extend_from_slice(m.leave());
                self.players[self.onturn].rack.set(&tiles);
                self.scoreless_turns += 1;
            }
            MoveAction::Pass => {
                self.scoreless_turns += 1;
            }
            _ => {
                self.players[self.onturn].points += m.score();
                // adjustments share the turn they belong to
                return Ok(());
            }
        }
        self.onturn = (self.onturn + 1) % 2;
        self.turnnum += 1;
        Ok(())
    }

    /// Play a move described by coordinates and word, for the player on
    /// turn.
    /// ## Errors
    /// If the move does not parse, is illegal, or uses absent tiles.
    pub fn play_scoring_move(&mut self, coords: &str, word: &str) -> Result<Move, Error> {
        let rack = self.players[self.onturn].rack.to_string(&self.alph);
        let m = self.create_and_score_placement_move(coords, word, &rack)?;
        self.play_move(&m, false)?;
        Ok(m)
    }

    /// Build and score a placement move from its textual description,
    /// without playing it.
    /// ## Errors
    /// If coordinates, word or rack do not parse, or the placement is
    /// illegal.
    pub fn create_and_score_placement_move(
        &mut self,
        coords: &str,
        tiles: &str,
        rack: &str,
    ) -> Result<Move, Error> {
        let (row, col, vertical) = from_board_game_coords(coords)?;
        let word = self.alph.to_machine_word(tiles)?;
        let rack_tiles = self.alph.to_machine_word(rack)?;
        let tiles_played = word
            .iter()
            .filter(|&&t| t != MachineLetter::PLAYED_THROUGH)
            .count() as u8;
        let leave = leave_after(&rack_tiles, &word, &self.alph)?;
        self.board.error_if_illegal_play(row, col, vertical, &word)?;

        // Scoring always walks horizontally; transpose first for a
        // vertical play and read the matching cross-scores.
        let score = if vertical {
            self.board.transpose();
            let score = self.board.score_word(
                &word,
                col,
                row,
                tiles_played,
                crate::board::BoardDirection::Horizontal,
                &self.dist,
            );
            self.board.transpose();
            score
        } else {
            self.board.score_word(
                &word,
                row,
                col,
                tiles_played,
                crate::board::BoardDirection::Vertical,
                &self.dist,
            )
        };
        Ok(Move::new_scoring(
            score,
            word,
            leave,
            vertical,
            tiles_played,
            row,
            col,
        ))
    }

    /// Set a player's rack, reconciling with the bag: both racks go back
    /// in, the tiles are drawn out by name, and the opponent redraws.
    /// ## Errors
    /// If the tiles are not available in the unseen pool.
    pub fn set_rack_for(&mut self, player: usize, rack: Rack) -> Result<(), Error> {
        self.throw_racks_in();
        self.bag.remove_tiles(&rack.tiles_on())?;
        self.players[player].rack = rack;
        self.set_random_rack((player + 1) % 2);
        Ok(())
    }

    /// Set both racks at once, reconciling with the bag.
    /// ## Errors
    /// If the tiles are not available in the unseen pool.
    pub fn set_racks_for_both(&mut self, racks: [Rack; 2]) -> Result<(), Error> {
        self.throw_racks_in();
        for rack in &racks {
            self.bag.remove_tiles(&rack.tiles_on())?;
        }
        let [r0, r1] = racks;
        self.players[0].rack = r0;
        self.players[1].rack = r1;
        Ok(())
    }

    /// Throw both players' racks back into the bag.
    pub fn throw_racks_in(&mut self) {
        for p in self.players.iter_mut() {
            self.bag.put_back(&p.rack.tiles_on());
            p.rack.clear();
        }
    }

    /// Replace a player's rack with a random draw. Used by simulations
    /// to randomize the unseen opponent rack.
    pub fn set_random_rack(&mut self, player: usize) {
        let current = self.players[player].rack.tiles_on();
        let tiles = self.bag.redraw(&current);
        self.players[player].rack.set(&tiles);
    }

    /// Best achievable score for each sampled opponent rack, each
    /// evaluated on its own deep copy of the game. With the `rayon`
    /// feature the racks are evaluated in parallel.
    /// ## Errors
    /// If a rack string cannot be parsed.
    pub fn sample_best_scores(&self, racks: &[&str]) -> Result<Vec<i32>, Error> {
        let parsed: Vec<Rack> = racks
            .iter()
            .map(|r| Rack::from_string(r, &self.alph))
            .collect::<Result<Vec<_>, _>>()?;

        let best = |rack: &Rack| -> i32 {
            let mut game = self.copy();
            let mut gen =
                GordonGenerator::new(Arc::clone(&game.gaddag), Arc::clone(&game.dist));
            gen.gen_all(&mut game.board, rack, false);
            gen.plays().iter().map(Move::score).max().unwrap_or(0)
        };

        #[cfg(feature = "rayon")]
        {
            Ok(parsed.par_iter().map(best).collect())
        }
        #[cfg(not(feature = "rayon"))]
        {
            Ok(parsed.iter().map(best).collect())
        }
    }

    pub fn rack_for(&self, player: usize) -> &Rack {
        &self.players[player].rack
    }

    pub fn rack_letters_for(&self, player: usize) -> String {
        self.players[player].rack.to_string(&self.alph)
    }

    pub fn points_for(&self, player: usize) -> i32 {
        self.players[player].points
    }

    pub fn set_points_for(&mut self, player: usize, points: i32) {
        self.players[player].points = points;
    }

    pub fn player_name(&self, player: usize) -> &str {
        &self.players[player].name
    }

    /// Score difference from the perspective of the player on turn.
    pub fn current_spread(&self) -> i32 {
        self.points_for(self.onturn) - self.points_for((self.onturn + 1) % 2)
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut GameBoard {
        &mut self.board
    }

    pub fn bag(&self) -> &Bag {
        &self.bag
    }

    pub fn bag_mut(&mut self) -> &mut Bag {
        &mut self.bag
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alph
    }

    pub fn gaddag(&self) -> &Arc<Gaddag> {
        &self.gaddag
    }

    pub fn letter_distribution(&self) -> &Arc<LetterDistribution> {
        &self.dist
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn turn(&self) -> u32 {
        self.turnnum
    }

    pub fn player_on_turn(&self) -> usize {
        self.onturn
    }

    pub fn set_player_on_turn(&mut self, onturn: usize) {
        self.onturn = onturn;
    }

    pub fn scoreless_turns(&self) -> u32 {
        self.scoreless_turns
    }
}

/// The rack left over after playing `tiles` from `rack`. Played-through
/// markers consume nothing; blank-designated tiles consume a blank.
/// ## Errors
/// [`Error::TileNotInRack`] if the play uses a tile the rack lacks.
fn leave_after(
    rack: &[MachineLetter],
    tiles: &[MachineLetter],
    alph: &Alphabet,
) -> Result<MachineWord, Error> {
    let mut counts = [0u8; 256];
    for &t in rack {
        counts[t.code() as usize] += 1;
    }
    for &t in tiles {
        if t == MachineLetter::PLAYED_THROUGH {
            continue;
        }
        let consumed = if t.is_blanked() {
            MachineLetter::BLANK
        } else {
            t
        };
        let slot = &mut counts[consumed.code() as usize];
        if *slot == 0 {
            return Err(Error::TileNotInRack(alph.letter(consumed)));
        }
        *slot -= 1;
    }
    let mut leave = MachineWord::new();
    for code in 0..=255u8 {
        for _ in 0..counts[code as usize] {
            leave.push(MachineLetter(code));
        }
    }
    Ok(leave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CROSSWORD_GAME_BOARD;
    use crate::testutil;
    use multiset::HashMultiSet;

    fn rules() -> GameRules {
        GameRules::new(
            testutil::small_gaddag(),
            testutil::english_dist(),
            CROSSWORD_GAME_BOARD,
        )
        .unwrap()
    }

    fn seeded_game(seed: u64) -> Game {
        let rules = rules();
        let mut game = Game::new(&rules, ["cesar", "jeremy"], StdRng::seed_from_u64(seed));
        game.start_game();
        game
    }

    fn full_multiset(game: &Game) -> HashMultiSet<u8> {
        game.bag()
            .tiles()
            .iter()
            .chain(game.rack_for(0).tiles_on().iter())
            .chain(game.rack_for(1).tiles_on().iter())
            .map(|t| t.code())
            .collect()
    }

    #[test]
    fn test_start_game() {
        let game = seeded_game(7);
        assert!(game.playing());
        assert_eq!(game.rack_for(0).num_tiles(), 7);
        assert_eq!(game.rack_for(1).num_tiles(), 7);
        assert_eq!(game.bag().tiles_remaining(), 86);
        assert_eq!(game.turn(), 0);
        assert_eq!(game.current_spread(), 0);
    }

    #[test]
    fn test_tile_conservation() {
        let mut game = seeded_game(11);
        let dist_tiles: HashMultiSet<u8> = game
            .letter_distribution()
            .tiles()
            .iter()
            .map(|t| t.code())
            .collect();
        assert_eq!(full_multiset(&game), dist_tiles);

        let onturn = game.player_on_turn();
        let mut rack = Rack::new(game.alphabet().len());
        rack.set(&game.alphabet().to_machine_word("CARES").unwrap());
        game.set_rack_for(onturn, rack).unwrap();
        game.play_scoring_move("8D", "CARES").unwrap();
        // board tiles now count toward the total
        let mut seen: HashMultiSet<u8> = full_multiset(&game);
        for t in "CARES".chars() {
            seen.insert(game.alphabet().val(&t.to_string()).unwrap().code());
        }
        assert_eq!(seen, dist_tiles);
    }

    #[test]
    fn test_play_scoring_move() {
        let mut game = seeded_game(3);
        let onturn = game.player_on_turn();
        let mut rack = Rack::new(game.alphabet().len());
        rack.set(&game.alphabet().to_machine_word("CARES").unwrap());
        game.set_rack_for(onturn, rack).unwrap();

        // 8E CARE puts the E on the star and doubles the word
        let m = game.play_scoring_move("8E", "CARE").unwrap();
        assert_eq!(m.score(), 12);
        assert_eq!(game.points_for(onturn), 12);
        assert_eq!(game.player_on_turn(), (onturn + 1) % 2);
        assert_eq!(game.turn(), 1);
        // four fresh tiles drawn on top of the S left behind
        assert_eq!(game.rack_for(onturn).num_tiles(), 5);
        assert_eq!(game.history().events.len(), 1);
        // the used tiles stay on the board
        assert_eq!(
            game.board().get_letter(7, 4),
            game.alphabet().val("C").unwrap()
        );
    }

    #[test]
    fn test_make_unmake_roundtrip() {
        let mut game = seeded_game(99);
        game.set_state_stack_length(4);

        let mut gen = GordonGenerator::new(
            Arc::clone(game.gaddag()),
            Arc::clone(game.letter_distribution()),
        );
        let onturn = game.player_on_turn();
        let mut rack = Rack::new(game.alphabet().len());
        rack.set(&game.alphabet().to_machine_word("ABSCRE?").unwrap());
        game.set_rack_for(onturn, rack.clone()).unwrap();

        let board_before = game.board().clone();
        let bag_before: HashMultiSet<u8> =
            game.bag().tiles().iter().map(|t| t.code()).collect();
        let racks_before = [game.rack_for(0).clone(), game.rack_for(1).clone()];
        let points_before = [game.points_for(0), game.points_for(1)];
        let turn_before = game.turn();

        let mut board = game.board().clone();
        gen.gen_all(&mut board, &rack, true);
        let plays: Vec<Move> = gen.plays().to_vec();
        assert!(!plays.is_empty());

        for m in &plays {
            game.play_move(m, true).unwrap();
            game.unplay_last_move();

            assert_eq!(*game.board(), board_before, "board after {:?}", m);
            let bag_after: HashMultiSet<u8> =
                game.bag().tiles().iter().map(|t| t.code()).collect();
            assert_eq!(bag_after, bag_before);
            assert_eq!(*game.rack_for(0), racks_before[0]);
            assert_eq!(*game.rack_for(1), racks_before[1]);
            assert_eq!(game.points_for(0), points_before[0]);
            assert_eq!(game.points_for(1), points_before[1]);
            assert_eq!(game.turn(), turn_before);
            assert_eq!(game.player_on_turn(), onturn);
            assert!(game.playing());
        }
    }

    #[test]
    fn test_reset_to_first_state() {
        let mut game = seeded_game(5);
        game.set_state_stack_length(3);
        let onturn = game.player_on_turn();
        let mut rack = Rack::new(game.alphabet().len());
        rack.set(&game.alphabet().to_machine_word("CARESAB").unwrap());
        game.set_rack_for(onturn, rack).unwrap();
        let turn_before = game.turn();

        let m = game
            .create_and_score_placement_move("8D", "CARES", "CARESAB")
            .unwrap();
        game.play_move(&m, true).unwrap();
        let m2 = Move::new_pass();
        game.play_move(&m2, true).unwrap();
        assert_eq!(game.turn(), turn_before + 2);

        game.reset_to_first_state();
        assert_eq!(game.turn(), turn_before);
        assert_eq!(game.player_on_turn(), onturn);
        assert_eq!(game.points_for(onturn), 0);
        assert!(game.board().get_square(7, 3).is_empty());
    }

    #[test]
    fn test_endgame_triggering() {
        let mut game = seeded_game(13);
        let onturn = game.player_on_turn();
        let alph = Arc::clone(game.alphabet());
        let mut r0 = Rack::new(alph.len());
        r0.set(&alph.to_machine_word("AB").unwrap());
        let mut r1 = Rack::new(alph.len());
        r1.set(&alph.to_machine_word("QZ").unwrap());
        game.set_racks_for_both([r0, r1]).unwrap();
        // empty the bag so the final play ends the game
        let n = game.bag().tiles_remaining();
        game.bag_mut().draw_at_most(n);

        let m = game.play_scoring_move("8G", "AB").unwrap();
        assert!(!game.playing());
        assert_eq!(game.rack_for(onturn).num_tiles(), 0);
        // 2 x (Q10 + Z10) on top of the play itself
        assert_eq!(game.points_for(onturn), m.score() + 40);
        let events = &game.history().events;
        assert_eq!(
            events.last().unwrap().play.action(),
            MoveAction::EndgameTiles
        );
    }

    #[test]
    fn test_six_scoreless_turns_end_game() {
        let mut game = seeded_game(17);
        let racks = [
            game.rack_for(0).score_on(game.letter_distribution()),
            game.rack_for(1).score_on(game.letter_distribution()),
        ];
        for _ in 0..6 {
            game.play_move(&Move::new_pass(), false).unwrap();
        }
        assert!(!game.playing());
        assert_eq!(game.points_for(0), -racks[0]);
        assert_eq!(game.points_for(1), -racks[1]);
    }

    #[test]
    fn test_exchange_move() {
        let mut game = seeded_game(23);
        let onturn = game.player_on_turn();
        let before = full_multiset(&game);
        let rack = game.rack_for(onturn).clone();
        let tiles = rack.tiles_on();
        let exchanged: MachineWord = tiles.iter().take(3).cloned().collect();
        let leave: MachineWord = tiles.iter().skip(3).cloned().collect();

        let m = Move::new_exchange(exchanged, leave);
        game.play_move(&m, false).unwrap();
        assert_eq!(game.rack_for(onturn).num_tiles(), 7);
        assert_eq!(game.scoreless_turns(), 1);
        assert_eq!(full_multiset(&game), before);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut game = seeded_game(29);
        game.set_state_stack_length(2);
        let copy = game.copy();
        assert_eq!(copy.points_for(0), game.points_for(0));
        assert_eq!(*copy.rack_for(0), *game.rack_for(0));
        assert_eq!(*copy.board(), *game.board());
        assert!(copy.history().events.is_empty());

        game.play_move(&Move::new_pass(), false).unwrap();
        assert_ne!(copy.turn(), game.turn());
    }

    #[test]
    fn test_play_to_turn() {
        let mut game = seeded_game(31);
        let onturn = game.player_on_turn();
        let mut rack = Rack::new(game.alphabet().len());
        rack.set(&game.alphabet().to_machine_word("CARESAB").unwrap());
        game.set_rack_for(onturn, rack).unwrap();
        game.play_scoring_move("8D", "CARES").unwrap();
        game.play_move(&Move::new_pass(), false).unwrap();
        let score = game.points_for(onturn);
        let history = game.history().clone();

        let replayed = Game::new_from_history(
            &history,
            &rules(),
            history.events.len(),
            StdRng::seed_from_u64(31),
        )
        .unwrap();
        assert_eq!(replayed.points_for(onturn), score);
        assert_eq!(replayed.turn(), 2);
        assert_eq!(
            replayed.board().get_letter(7, 3),
            game.alphabet().val("C").unwrap()
        );
        assert!(Game::new_from_history(
            &history,
            &rules(),
            99,
            StdRng::seed_from_u64(1)
        )
        .is_err());
    }

    #[test]
    fn test_sample_best_scores() {
        let mut game = seeded_game(37);
        let onturn = game.player_on_turn();
        let mut rack = Rack::new(game.alphabet().len());
        rack.set(&game.alphabet().to_machine_word("CARESAB").unwrap());
        game.set_rack_for(onturn, rack).unwrap();
        game.play_scoring_move("8D", "CARES").unwrap();

        let scores = game.sample_best_scores(&["AB", "QQQQ"]).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > 0);
        assert_eq!(scores[1], 0);
    }
}
