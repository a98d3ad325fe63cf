use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Direction, SIZE};
use crate::error::{Error, Result};

/// Value of both starting tiles and of every spawned tile.
pub const SPAWN_VALUE: u32 = 2;

/// Which directions currently change the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LegalMoves {
  pub right: bool,
  pub left: bool,
  pub up: bool,
  pub down: bool,
}

impl LegalMoves {
  pub fn of(board: Board) -> LegalMoves {
    LegalMoves {
      right: board.can_slide(Direction::Right),
      left: board.can_slide(Direction::Left),
      up: board.can_slide(Direction::Up),
      down: board.can_slide(Direction::Down),
    }
  }

  pub fn get(self, dir: Direction) -> bool {
    match dir {
      Direction::Right => self.right,
      Direction::Left => self.left,
      Direction::Up => self.up,
      Direction::Down => self.down,
    }
  }

  pub fn any(self) -> bool {
    self.right || self.left || self.up || self.down
  }

  pub fn directions(self) -> Vec<Direction> {
    Direction::ALL.iter().cloned().filter(|&dir| self.get(dir)).collect()
  }
}

/// Result of a single `Game::play` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
  /// False when the direction was not legal; nothing was touched.
  pub changed: bool,
  /// Resulting value of every merge made by this move.
  pub merges: Vec<u32>,
  /// Running score after the move.
  pub score: u64,
  /// Cell the new tile landed in.
  pub spawned: Option<(usize, usize)>,
}

impl MoveOutcome {
  fn unchanged(score: u64) -> MoveOutcome {
    MoveOutcome { changed: false, merges: Vec::new(), score, spawned: None }
  }

  pub fn gained(&self) -> u64 {
    self.merges.iter().map(|&val| u64::from(val)).sum()
  }
}

/// The board engine: grid, score, legal-move flags and the random source
/// used for tile placement.
///
/// All mutation goes through `&mut self` and there is no internal locking.
/// A `Game` may be moved to another thread, but sharing one between threads
/// needs external synchronization.
#[derive(Debug, Clone)]
pub struct Game {
  pub(crate) board: Board,
  pub(crate) score: u64,
  pub(crate) moves: u64,
  legal: LegalMoves,
  pub(crate) rng: ChaCha8Rng,
}

impl Game {
  /// Starts a game whose tile placement is fully determined by `seed`.
  pub fn new(seed: u64) -> Game {
    Game::with_rng(ChaCha8Rng::seed_from_u64(seed))
  }

  fn with_rng(rng: ChaCha8Rng) -> Game {
    let mut game = Game { board: Board::EMPTY, score: 0, moves: 0, legal: LegalMoves::default(), rng };
    game.initialize();
    game
  }

  pub(crate) fn from_parts(board: Board, score: u64, moves: u64, rng: ChaCha8Rng) -> Game {
    Game { board, score, moves, legal: LegalMoves::of(board), rng }
  }

  /// Clears the board and places two 2s on distinct random cells.
  ///
  /// The random stream keeps running across new games.
  pub fn initialize(&mut self) {
    let (first, second) = loop {
      let first = (self.rng.gen_range(0..SIZE), self.rng.gen_range(0..SIZE));
      let second = (self.rng.gen_range(0..SIZE), self.rng.gen_range(0..SIZE));
      if first != second {
        break (first, second);
      }
    };

    self.board = Board::EMPTY;
    self.board.set(first.0, first.1, SPAWN_VALUE);
    self.board.set(second.0, second.1, SPAWN_VALUE);
    self.score = 0;
    self.moves = 0;
    self.legal = LegalMoves::of(self.board);
    debug!("new game, tiles at {:?} and {:?}", first, second);
  }

  /// Slides the board toward `dir`, scores the merges and spawns a tile.
  ///
  /// An illegal direction is a no-op reported through `changed = false`.
  pub fn play(&mut self, dir: Direction) -> Result<MoveOutcome> {
    if !self.legal.get(dir) {
      trace!("ignoring illegal move {}", dir);
      return Ok(MoveOutcome::unchanged(self.score));
    }

    let (board, merges) = self.board.slide(dir);
    if board.is_full() {
      return Err(Error::NoOpenCell);
    }
    self.board = board;
    let gained: u64 = merges.iter().map(|&val| u64::from(val)).sum();
    self.score += gained;
    self.moves += 1;
    let spawned = self.spawn()?;

    debug!("move {} {}: {} merges, +{}, score {}", self.moves, dir, merges.len(), gained, self.score);
    Ok(MoveOutcome { changed: true, merges, score: self.score, spawned: Some(spawned) })
  }

  /// Puts a 2 on a uniformly chosen empty cell and refreshes the legal moves.
  pub fn spawn(&mut self) -> Result<(usize, usize)> {
    let open = self.board.empty_cells();
    let &(row, col) = open.choose(&mut self.rng).ok_or(Error::NoOpenCell)?;
    self.board.set(row, col, SPAWN_VALUE);
    self.legal = LegalMoves::of(self.board);
    trace!("spawned {} at ({}, {}) of {} open", SPAWN_VALUE, row, col, open.len());
    Ok((row, col))
  }

  pub fn can_move(&self, dir: Direction) -> bool {
    self.legal.get(dir)
  }

  pub fn legal_moves(&self) -> LegalMoves {
    self.legal
  }

  pub fn is_game_over(&self) -> bool {
    !self.legal.any()
  }

  pub fn board(&self) -> Board {
    self.board
  }

  pub fn score(&self) -> u64 {
    self.score
  }

  /// Number of accepted moves since the game started.
  pub fn moves(&self) -> u64 {
    self.moves
  }

  pub fn max_tile(&self) -> u32 {
    self.board.max_val()
  }
}
