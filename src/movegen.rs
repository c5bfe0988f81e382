//! The Gordon-style move generator: enumerate every legal placement from
//! a rack by walking the GADDAG leftward from each anchor, crossing the
//! separation arc, and extending rightward.

use crate::alphabet::{MachineLetter, MachineWord};
use crate::board::{BoardDirection, GameBoard};
use crate::distribution::LetterDistribution;
use crate::lexicon::Gaddag;
use crate::play::Move;
use crate::rack::Rack;
use std::sync::Arc;

// Sentinel column guaranteeing "no previous anchor in this row".
const NO_ANCHOR: i32 = 100;

/// Enumerates all legal plays for a board and rack. One generator can be
/// reused across turns; `gen_all` clears the previous play list.
pub struct GordonGenerator {
    gaddag: Arc<Gaddag>,
    dist: Arc<LetterDistribution>,
    plays: Vec<Move>,
    vertical: bool,
    cur_row_idx: i32,
    cur_anchor_col: i32,
    last_anchor_col: i32,
    tiles_played: u8,
    dim: i32,
}

impl GordonGenerator {
    pub fn new(gaddag: Arc<Gaddag>, dist: Arc<LetterDistribution>) -> GordonGenerator {
        GordonGenerator {
            gaddag,
            dist,
            plays: Vec::new(),
            vertical: false,
            cur_row_idx: 0,
            cur_anchor_col: 0,
            last_anchor_col: NO_ANCHOR,
            tiles_played: 0,
            dim: 0,
        }
    }

    /// The plays found by the last `gen_all`. Unsorted; callers rank by
    /// their own notion of equity.
    pub fn plays(&self) -> &[Move] {
        &self.plays
    }

    /// Populate the play list with every legal placement for `rack`, plus
    /// every distinct exchange when `add_exchange` (the caller checks the
    /// bag has at least seven tiles), plus a pass.
    pub fn gen_all(&mut self, board: &mut GameBoard, rack: &Rack, add_exchange: bool) {
        self.plays.clear();
        self.dim = board.dim();
        let mut rack = rack.clone();

        self.vertical = false;
        self.gen_by_orientation(board, &mut rack, BoardDirection::Horizontal);
        board.transpose();
        self.vertical = true;
        self.gen_by_orientation(board, &mut rack, BoardDirection::Vertical);
        board.transpose();

        if add_exchange {
            self.generate_exchanges(&rack);
        }
        self.plays.push(Move::new_pass());
    }

    fn gen_by_orientation(&mut self, board: &GameBoard, rack: &mut Rack, dir: BoardDirection) {
        let gaddag = Arc::clone(&self.gaddag);
        for row in 0..self.dim {
            self.cur_row_idx = row;
            self.last_anchor_col = NO_ANCHOR;
            for col in 0..self.dim {
                if board.is_anchor(row, col, dir) {
                    self.cur_anchor_col = col;
                    self.gen(
                        board,
                        col,
                        MachineWord::new(),
                        rack,
                        gaddag.root_node_index(),
                    );
                    self.last_anchor_col = col;
                }
            }
        }
    }

    /// One step of the recursive traversal at `col`. An occupied square
    /// forces its own letter; an empty one tries every rack letter the
    /// cross-set admits, blanks standing in for anything.
    fn gen(&mut self, board: &GameBoard, col: i32, word: MachineWord, rack: &mut Rack, node: u32) {
        let cs_dir = if self.vertical {
            BoardDirection::Horizontal
        } else {
            BoardDirection::Vertical
        };
        let sq = board.get_square(self.cur_row_idx, col);
        let cross_set = sq.cross_set(cs_dir);
        let gaddag = Arc::clone(&self.gaddag);

        if !sq.is_empty() {
            let ml = sq.letter();
            let next = gaddag.next_node_idx(node, ml.unblank());
            self.go_on(board, col, ml, word, rack, next, node);
        } else if !rack.is_empty() {
            for code in 1..=rack.alphabet_size() {
                let ml = MachineLetter(code);
                if rack.has(ml) && cross_set.allowed(ml) {
                    let next = gaddag.next_node_idx(node, ml);
                    rack.take(ml).expect("letter verified on rack");
                    self.tiles_played += 1;
                    self.go_on(board, col, ml, word, rack, next, node);
                    rack.add(ml);
                    self.tiles_played -= 1;
                }
            }
            if rack.has_blank() {
                for code in 1..=rack.alphabet_size() {
                    let ml = MachineLetter(code);
                    if cross_set.allowed(ml) {
                        let next = gaddag.next_node_idx(node, ml);
                        rack.take(MachineLetter::BLANK)
                            .expect("blank verified on rack");
                        self.tiles_played += 1;
                        self.go_on(board, col, ml.blanked(), word, rack, next, node);
                        rack.add(MachineLetter::BLANK);
                        self.tiles_played -= 1;
                    }
                }
            }
        }
    }

    /// Consume the letter just chosen for `cur_col` and keep going:
    /// leftward while we are at or left of the anchor, then through the
    /// separation arc and rightward. A play is recorded whenever the
    /// pre-arc node's letter set accepts the letter and the word cannot
    /// be extended in the current direction of travel.
    #[allow(clippy::too_many_arguments)]
    fn go_on(
        &mut self,
        board: &GameBoard,
        cur_col: i32,
        ml: MachineLetter,
        mut word: MachineWord,
        rack: &mut Rack,
        new_node: Option<u32>,
        old_node: u32,
    ) {
        let gaddag = Arc::clone(&self.gaddag);
        let occupied = !board.get_square(self.cur_row_idx, cur_col).is_empty();
        if cur_col <= self.cur_anchor_col {
            // moving leftward: prepend
            let stored = if occupied {
                MachineLetter::PLAYED_THROUGH
            } else {
                ml
            };
            word.insert(0, stored);

            let no_letter_directly_left = cur_col == 0
                || board
                    .get_square(self.cur_row_idx, cur_col - 1)
                    .is_empty();
            // A lone tile is the same physical play in either orientation;
            // it is recorded by the horizontal pass only.
            let unique_play = !(self.vertical && word.len() == 1);
            if gaddag.in_letter_set(old_node, ml)
                && no_letter_directly_left
                && self.tiles_played > 0
                && unique_play
            {
                self.record_play(board, rack, &word, cur_col);
            }
            if let Some(next) = new_node {
                // keep going left, but never into the previous anchor's
                // territory: those plays were generated from it
                if cur_col > 0 && cur_col - 1 != self.last_anchor_col {
                    self.gen(board, cur_col - 1, word, rack, next);
                }
                // shift direction: jump to the square right of the anchor
                if no_letter_directly_left && self.cur_anchor_col < self.dim - 1 {
                    if let Some(sep) = gaddag.next_node_idx(next, MachineLetter::SEPARATION) {
                        self.gen(board, self.cur_anchor_col + 1, word, rack, sep);
                    }
                }
            }
        } else {
            // moving rightward: append
            let stored = if occupied {
                MachineLetter::PLAYED_THROUGH
            } else {
                ml
            };
            word.push(stored);

            let no_letter_directly_right = cur_col == self.dim - 1
                || board
                    .get_square(self.cur_row_idx, cur_col + 1)
                    .is_empty();
            if gaddag.in_letter_set(old_node, ml)
                && no_letter_directly_right
                && self.tiles_played > 0
            {
                self.record_play(board, rack, &word, cur_col - word.len() as i32 + 1);
            }
            if let Some(next) = new_node {
                if cur_col < self.dim - 1 {
                    self.gen(board, cur_col + 1, word, rack, next);
                }
            }
        }
    }

    fn record_play(&mut self, board: &GameBoard, rack: &Rack, word: &MachineWord, start_col: i32) {
        let cross_dir = if self.vertical {
            BoardDirection::Horizontal
        } else {
            BoardDirection::Vertical
        };
        let score = board.score_word(
            word,
            self.cur_row_idx,
            start_col,
            self.tiles_played,
            cross_dir,
            &self.dist,
        );
        // translate back out of the transposed frame
        let (row, col) = if self.vertical {
            (start_col, self.cur_row_idx)
        } else {
            (self.cur_row_idx, start_col)
        };
        self.plays.push(Move::new_scoring(
            score,
            *word,
            rack.tiles_on(),
            self.vertical,
            self.tiles_played,
            row,
            col,
        ));
    }

    /// Emit every distinct non-empty sub-multiset of the rack as an
    /// exchange.
    fn generate_exchanges(&mut self, rack: &Rack) {
        let mut counts: Vec<(MachineLetter, u8)> = Vec::new();
        if rack.has_blank() {
            counts.push((MachineLetter::BLANK, rack.count_of(MachineLetter::BLANK)));
        }
        for code in 1..=rack.alphabet_size() {
            let ml = MachineLetter(code);
            if rack.has(ml) {
                counts.push((ml, rack.count_of(ml)));
            }
        }
        let mut exchanged = MachineWord::new();
        let mut leave = MachineWord::new();
        self.exchange_subsets(&counts, 0, &mut exchanged, &mut leave);
    }

    fn exchange_subsets(
        &mut self,
        counts: &[(MachineLetter, u8)],
        idx: usize,
        exchanged: &mut MachineWord,
        leave: &mut MachineWord,
    ) {
        if idx == counts.len() {
            if !exchanged.is_empty() {
                self.plays.push(Move::new_exchange(*exchanged, *leave));
            }
            return;
        }
        let (ml, count) = counts[idx];
        for take in 0..=count {
            let ex_len = exchanged.len();
            let lv_len = leave.len();
            for _ in 0..take {
                exchanged.push(ml);
            }
            for _ in take..count {
                leave.push(ml);
            }
            self.exchange_subsets(counts, idx + 1, exchanged, leave);
            exchanged.truncate(ex_len);
            leave.truncate(lv_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anagrammer::{anagram, AnagramMode};
    use crate::board::CROSSWORD_GAME_BOARD;
    use crate::play::MoveAction;
    use crate::testutil;

    fn setup() -> (GordonGenerator, GameBoard, Arc<LetterDistribution>) {
        let dist = testutil::english_dist();
        let gd = testutil::small_gaddag();
        let board = GameBoard::make_board(CROSSWORD_GAME_BOARD).unwrap();
        (GordonGenerator::new(gd, Arc::clone(&dist)), board, dist)
    }

    #[test]
    fn test_empty_board_matches_anagrammer() {
        // On an empty board every play is an anagram of the rack laid
        // through the start square: for each word, one placement per
        // letter, times two orientations. (Every word here has two or
        // more letters; lone tiles come out once, horizontally.)
        let (mut gen, mut board, dist) = setup();
        let alph = dist.alphabet();
        let rack_str = "ABSCRE";
        let rack = Rack::from_string(rack_str, alph).unwrap();

        gen.gen_all(&mut board, &rack, false);
        let placements: Vec<&Move> = gen
            .plays()
            .iter()
            .filter(|m| m.action() == MoveAction::Play)
            .collect();

        let dawg = testutil::small_dawg();
        let words = anagram(rack_str, &dawg, AnagramMode::Build).unwrap();
        let expected: usize = words.iter().map(|w| w.chars().count()).sum();
        assert_eq!(placements.len(), 2 * expected);

        // every generated play must be a word through the start square
        for m in &placements {
            let (row, col, vertical) = m.coords_and_vertical();
            let word = alph.user_visible(m.tiles());
            assert!(words.contains(&word), "{} is not a word", word);
            if vertical {
                assert_eq!(col, 7);
                assert!(row <= 7 && row + m.tiles().len() as i32 > 7);
            } else {
                assert_eq!(row, 7);
                assert!(col <= 7 && col + m.tiles().len() as i32 > 7);
            }
        }
    }

    #[test]
    fn test_single_tile_play_generated_once() {
        // "O" is a word by itself. The opening one-tile play is the same
        // physical move in either orientation and must come out exactly
        // once, as a horizontal play.
        let dist = testutil::english_dist();
        let gd =
            Arc::new(Gaddag::from_words("tiny", &["O", "OX"], dist.alphabet()).unwrap());
        let mut board = GameBoard::make_board(CROSSWORD_GAME_BOARD).unwrap();
        let mut gen = GordonGenerator::new(gd, Arc::clone(&dist));

        let rack = Rack::from_string("O", dist.alphabet()).unwrap();
        gen.gen_all(&mut board, &rack, false);
        let placements: Vec<&Move> = gen
            .plays()
            .iter()
            .filter(|m| m.action() == MoveAction::Play)
            .collect();
        assert_eq!(placements.len(), 1);
        let (row, col, vertical) = placements[0].coords_and_vertical();
        assert_eq!((row, col), (7, 7));
        assert!(!vertical);
    }

    #[test]
    fn test_scores_and_leaves() {
        let (mut gen, mut board, dist) = setup();
        let alph = dist.alphabet();
        let rack = Rack::from_string("AB", alph).unwrap();

        gen.gen_all(&mut board, &rack, false);
        // AB and BA, horizontally and vertically, at two positions each
        // (crossing the star), plus the pass
        let placements: Vec<&Move> = gen
            .plays()
            .iter()
            .filter(|m| m.action() == MoveAction::Play)
            .collect();
        assert_eq!(placements.len(), 8);
        for m in &placements {
            // A=1, B=3, doubled on the star
            assert_eq!(m.score(), 8);
            assert!(m.leave().is_empty());
            assert_eq!(m.tiles_played(), 2);
        }
        assert_eq!(
            gen.plays()
                .iter()
                .filter(|m| m.action() == MoveAction::Pass)
                .count(),
            1
        );
    }

    #[test]
    fn test_plays_use_cross_sets() {
        // With AB on the board, S hooks make ABS but nothing makes ABQ.
        let (mut gen, mut board, dist) = setup();
        let alph = dist.alphabet();
        let gd = testutil::small_gaddag();
        board.set_row(7, "      AB", alph).unwrap();
        board.gen_all_cross_sets(&gd, &dist);
        board.update_all_anchors();

        let rack = Rack::from_string("SQ", alph).unwrap();
        gen.gen_all(&mut board, &rack, false);
        let descs: Vec<String> = gen
            .plays()
            .iter()
            .filter(|m| m.action() == MoveAction::Play)
            .map(|m| m.short_description(alph))
            .collect();
        assert!(descs.contains(&"8G ..S".to_string()), "plays: {:?}", descs);
        for d in &descs {
            assert!(!d.contains('Q'), "Q must not appear: {:?}", descs);
        }
    }

    #[test]
    fn test_blank_expansion() {
        // A blank can stand in for the S hook; it is recorded lowercase.
        let (mut gen, mut board, dist) = setup();
        let alph = dist.alphabet();
        let gd = testutil::small_gaddag();
        board.set_row(7, "      AB", alph).unwrap();
        board.gen_all_cross_sets(&gd, &dist);
        board.update_all_anchors();

        let rack = Rack::from_string("?", alph).unwrap();
        gen.gen_all(&mut board, &rack, false);
        let descs: Vec<String> = gen
            .plays()
            .iter()
            .filter(|m| m.action() == MoveAction::Play)
            .map(|m| m.short_description(alph))
            .collect();
        assert!(descs.contains(&"8G ..s".to_string()), "plays: {:?}", descs);
    }

    #[test]
    fn test_exchanges() {
        let (mut gen, mut board, dist) = setup();
        let alph = dist.alphabet();
        let rack = Rack::from_string("AAB", alph).unwrap();

        gen.gen_all(&mut board, &rack, true);
        let exchanges: Vec<&Move> = gen
            .plays()
            .iter()
            .filter(|m| m.action() == MoveAction::Exchange)
            .collect();
        // distinct sub-multisets of {A,A,B}: A, AA, B, AB, AAB
        assert_eq!(exchanges.len(), 5);
        for m in &exchanges {
            assert_eq!(m.score(), 0);
            assert_eq!(
                m.tiles().len() + m.leave().len(),
                rack.num_tiles() as usize
            );
        }
    }

    #[test]
    fn test_dedup_by_anchor_bounds() {
        // A board word with several anchors must not duplicate plays.
        let (mut gen, mut board, dist) = setup();
        let alph = dist.alphabet();
        let gd = testutil::small_gaddag();
        board.set_row(7, "      AB", alph).unwrap();
        board.gen_all_cross_sets(&gd, &dist);
        board.update_all_anchors();

        let rack = Rack::from_string("TS", alph).unwrap();
        gen.gen_all(&mut board, &rack, false);
        let mut keys: Vec<String> = gen
            .plays()
            .iter()
            .filter(|m| m.action() == MoveAction::Play)
            .map(|m| m.short_description(alph))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total, "duplicate plays generated");
        // TAB and ABS are both reachable
        assert!(keys.contains(&"8F T..".to_string()));
        assert!(keys.contains(&"8G ..S".to_string()));
    }
}
