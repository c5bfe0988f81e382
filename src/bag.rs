//! The tile bag.
//!
//! Tiles live in a shuffled vector and are drawn from the back. All
//! randomness comes from the injected source, so games can be replayed
//! deterministically under test.

use crate::alphabet::MachineLetter;
use crate::error::Error;
use multiset::HashMultiSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Minimum number of tiles that must remain for an exchange to be legal.
pub const EXCHANGE_LIMIT: usize = 7;

#[derive(Debug)]
pub struct Bag {
    tiles: Vec<MachineLetter>,
    initial: Vec<MachineLetter>,
    rng: StdRng,
}

impl Bag {
    /// A new bag holding `tiles`, shuffled with `rng`.
    pub fn new(tiles: Vec<MachineLetter>, mut rng: StdRng) -> Bag {
        let initial = tiles.clone();
        let mut tiles = tiles;
        tiles.shuffle(&mut rng);
        Bag {
            tiles,
            initial,
            rng,
        }
    }

    pub fn tiles_remaining(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The undrawn tiles. Order is the draw order, back first.
    pub fn tiles(&self) -> &[MachineLetter] {
        &self.tiles
    }

    /// Draw exactly `n` tiles.
    /// ## Errors
    /// [`Error::BagEmpty`] if fewer than `n` remain.
    pub fn draw(&mut self, n: usize) -> Result<Vec<MachineLetter>, Error> {
        if n > self.tiles.len() {
            return Err(Error::BagEmpty {
                wanted: n,
                have: self.tiles.len(),
            });
        }
        Ok(self.tiles.split_off(self.tiles.len() - n))
    }

    /// Draw up to `n` tiles; fewer if the bag runs dry.
    pub fn draw_at_most(&mut self, n: usize) -> Vec<MachineLetter> {
        let n = n.min(self.tiles.len());
        // Always succeeds after clamping.
        self.draw(n).unwrap()
    }

    /// Put tiles back into the bag and reshuffle the unseen portion.
    pub fn put_back(&mut self, tiles: &[MachineLetter]) {
        self.tiles.extend_from_slice(tiles);
        self.tiles.shuffle(&mut self.rng);
    }

    /// Exchange: draw replacements for `tiles`, then return `tiles` to the
    /// bag. Drawing first guarantees none of the returned tiles come
    /// straight back.
    /// ## Errors
    /// [`Error::CannotExchange`] with fewer than seven tiles left;
    /// [`Error::BagEmpty`] never, since the exchange size is bounded by
    /// the rack.
    pub fn exchange(&mut self, tiles: &[MachineLetter]) -> Result<Vec<MachineLetter>, Error> {
        if self.tiles.len() < EXCHANGE_LIMIT {
            return Err(Error::CannotExchange(EXCHANGE_LIMIT));
        }
        let drawn = self.draw(tiles.len())?;
        self.put_back(tiles);
        Ok(drawn)
    }

    /// Throw the current rack back in and draw a fresh one of rack size.
    /// Used to randomize an opponent rack during simulations.
    pub fn redraw(&mut self, current: &[MachineLetter]) -> Vec<MachineLetter> {
        self.put_back(current);
        self.draw_at_most(crate::game::RACK_SIZE)
    }

    /// Remove specific tiles from the bag, for reconciling a known rack.
    /// Blank-designated letters remove a blank.
    /// ## Errors
    /// [`Error::TileNotInBag`] if any tile is missing; the bag is left
    /// unchanged in that case.
    pub fn remove_tiles(&mut self, tiles: &[MachineLetter]) -> Result<(), Error> {
        let mut have: HashMultiSet<u8> = self.tiles.iter().map(|t| t.code()).collect();
        let wanted: Vec<MachineLetter> = tiles
            .iter()
            .map(|&t| {
                if t.is_blanked() {
                    MachineLetter::BLANK
                } else {
                    t
                }
            })
            .collect();
        for &t in &wanted {
            if have.count_of(&t.code()) == 0 {
                return Err(Error::TileNotInBag(format!("{}", t.code())));
            }
            have.remove(&t.code());
        }
        for &t in &wanted {
            let pos = self
                .tiles
                .iter()
                .position(|&x| x == t)
                .expect("tile verified present");
            self.tiles.swap_remove(pos);
        }
        self.tiles.shuffle(&mut self.rng);
        Ok(())
    }

    /// Refill the bag to the full distribution and reshuffle.
    pub fn refill(&mut self) {
        self.tiles.clone_from(&self.initial);
        self.tiles.shuffle(&mut self.rng);
    }

    /// Copy another bag's tile sequence into this one. The random source
    /// is not copied; search snapshots only need the tile order.
    pub fn copy_from(&mut self, other: &Bag) {
        self.tiles.clone_from(&other.tiles);
    }

    /// Restore the tile sequence from a snapshot.
    pub fn set_tiles(&mut self, tiles: &[MachineLetter]) {
        self.tiles.clear();
        self.tiles.extend_from_slice(tiles);
    }

    /// Deep copy with a fresh random source.
    pub fn copy(&self, rng: StdRng) -> Bag {
        Bag {
            tiles: self.tiles.clone(),
            initial: self.initial.clone(),
            rng,
        }
    }
}
