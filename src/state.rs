//! Saved-state blob: board, score, move count and the exact position of the
//! random source, so a restored game continues with the same spawns.
//!
//! Layout, little-endian:
//!
//! ```text
//! magic "S2K8" | version u8 | dimension u8 | 16 x cell u32 | score u64
//! | moves u64 | rng seed [u8; 32] | rng stream u64 | rng word pos u128
//! ```

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::warn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, SIZE};
use crate::error::{Result, StateError};
use crate::game::Game;

pub const MAGIC: [u8; 4] = *b"S2K8";
pub const VERSION: u8 = 1;
pub const STATE_LEN: usize = 4 + 1 + 1 + 4 * SIZE * SIZE + 8 + 8 + 32 + 8 + 16;

// 2^17 is the largest tile a 4x4 board can hold when every spawn is a 2.
const MAX_TILE: u32 = 1 << 17;

fn truncated(_: io::Error) -> StateError {
  StateError::Truncated
}

fn valid_tile(val: u32) -> bool {
  val == 0 || (val >= 2 && val <= MAX_TILE && val.is_power_of_two())
}

impl Game {
  pub fn save_to<W: Write>(&self, w: &mut W) -> Result<()> {
    w.write_all(&MAGIC)?;
    w.write_u8(VERSION)?;
    w.write_u8(SIZE as u8)?;
    for row in self.board.cells().iter() {
      for &val in row.iter() {
        w.write_u32::<LittleEndian>(val)?;
      }
    }
    w.write_u64::<LittleEndian>(self.score)?;
    w.write_u64::<LittleEndian>(self.moves)?;
    w.write_all(&self.rng.get_seed())?;
    w.write_u64::<LittleEndian>(self.rng.get_stream())?;
    w.write_u128::<LittleEndian>(self.rng.get_word_pos())?;
    Ok(())
  }

  /// Serializes the complete game into an opaque blob.
  pub fn save(&self) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(STATE_LEN);
    self.save_to(&mut buf)?;
    Ok(buf)
  }

  /// Rebuilds a game from a blob produced by `save`.
  pub fn restore(bytes: &[u8]) -> Result<Game> {
    Ok(decode(bytes)?)
  }

  /// Restores `bytes`, or starts a new game from `seed` if they are not a
  /// valid saved state.
  pub fn resume(bytes: &[u8], seed: u64) -> Game {
    match Game::restore(bytes) {
      Ok(game) => game,
      Err(e) => {
        warn!("{}; starting a new game", e);
        Game::new(seed)
      }
    }
  }
}

fn decode(bytes: &[u8]) -> std::result::Result<Game, StateError> {
  let mut r = Cursor::new(bytes);

  let mut magic = [0u8; 4];
  r.read_exact(&mut magic).map_err(truncated)?;
  if magic != MAGIC {
    return Err(StateError::BadMagic);
  }
  let version = r.read_u8().map_err(truncated)?;
  if version != VERSION {
    return Err(StateError::UnsupportedVersion(version));
  }
  let dim = r.read_u8().map_err(truncated)?;
  if dim as usize != SIZE {
    return Err(StateError::BadDimension(dim));
  }

  let mut board = Board::EMPTY;
  for row in 0..SIZE {
    for col in 0..SIZE {
      let value = r.read_u32::<LittleEndian>().map_err(truncated)?;
      if !valid_tile(value) {
        return Err(StateError::BadTile { row, col, value });
      }
      board.set(row, col, value);
    }
  }
  let score = r.read_u64::<LittleEndian>().map_err(truncated)?;
  let moves = r.read_u64::<LittleEndian>().map_err(truncated)?;

  let mut seed = [0u8; 32];
  r.read_exact(&mut seed).map_err(truncated)?;
  let stream = r.read_u64::<LittleEndian>().map_err(truncated)?;
  let word_pos = r.read_u128::<LittleEndian>().map_err(truncated)?;

  let extra = bytes.len() - r.position() as usize;
  if extra != 0 {
    return Err(StateError::TrailingBytes(extra));
  }

  let mut rng = ChaCha8Rng::from_seed(seed);
  rng.set_stream(stream);
  rng.set_word_pos(word_pos);
  Ok(Game::from_parts(board, score, moves, rng))
}
