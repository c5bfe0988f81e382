use criterion::{criterion_group, criterion_main, Criterion};
use crossword_engine::{GameBoard, Gaddag, LetterDistribution, CROSSWORD_GAME_BOARD};
use std::sync::Arc;

const WORDS: &[&str] = &[
    "AB", "ABS", "BA", "TAB", "CARE", "CARES", "SCARE", "RACE", "ACRE",
];

fn setup() -> (GameBoard, Arc<Gaddag>, LetterDistribution) {
    let dist = LetterDistribution::english();
    let gaddag =
        Arc::new(Gaddag::from_words("bench", WORDS, dist.alphabet()).unwrap());
    let mut board = GameBoard::make_board(CROSSWORD_GAME_BOARD).unwrap();
    board.set_row(7, "     CARES", dist.alphabet()).unwrap();
    board.set_row(8, "      BA", dist.alphabet()).unwrap();
    board.gen_all_cross_sets(&gaddag, &dist);
    board.update_all_anchors();
    (board, gaddag, dist)
}

// Two transpositions per full-board generation, two more per search ply;
// this has to stay cheap for transposition to beat duplicated code.
fn bench_transpose(c: &mut Criterion) {
    let (mut board, _, _) = setup();
    c.bench_function("board.transpose", |b| {
        b.iter(|| {
            board.transpose();
            board.transpose();
        })
    });
}

fn bench_gen_all_cross_sets(c: &mut Criterion) {
    let (mut board, gaddag, dist) = setup();
    c.bench_function("board.gen_all_cross_sets", |b| {
        b.iter(|| board.gen_all_cross_sets(&gaddag, &dist))
    });
}

criterion_group!(benches, bench_transpose, bench_gen_all_cross_sets);
criterion_main!(benches);
