//! Headless move selection for driving the engine without a human.

use std::collections::HashMap;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Direction, SIZE};
use crate::config::{Config, StrategyKind};
use crate::game::SPAWN_VALUE;

const SCORE_LOST_PENALTY: f32 = 200000.0;
const SCORE_MONOTONICITY_POWER: f32 = 4.0;
const SCORE_MONOTONICITY_WEIGHT: f32 = 47.0;
const SCORE_SUM_POWER: f32 = 3.5;
const SCORE_SUM_WEIGHT: f32 = 11.0;
const SCORE_MERGES_WEIGHT: f32 = 700.0;
const SCORE_EMPTY_WEIGHT: f32 = 270.0;

// Chance branches below this probability are scored by the heuristic.
const MIN_PROB: f32 = 0.0001;

// Greedy ties go to the first of these.
const PREFERENCE: [Direction; 4] = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];

/// Heuristic score for every line of four exponent nibbles.
fn score_table() -> &'static [f32] {
  static TABLE: OnceLock<Vec<f32>> = OnceLock::new();
  TABLE.get_or_init(|| (0..65536).map(line_score).collect())
}

fn line_score(n: usize) -> f32 {
  let vals = [(n >> 0) & 0xf, (n >> 4) & 0xf, (n >> 8) & 0xf, (n >> 12) & 0xf];

  let mut sum = 0f32;
  let mut empty = 0;
  let mut merges = 0;
  let mut counter = 0;
  let mut prev = 0;
  for &rank in vals.iter() {
    sum += (rank as f32).powf(SCORE_SUM_POWER);
    if rank == 0 {
      empty += 1;
    } else {
      if prev == rank {
        counter += 1;
      } else if counter > 0 {
        merges += 1 + counter;
        counter = 0;
      }
      prev = rank;
    }
  }
  if counter > 0 {
    merges += 1 + counter;
  }

  let mut monotonicity_left = 0f32;
  let mut monotonicity_right = 0f32;
  for i in 1..4 {
    let (a, b) = ((vals[i - 1] as f32).powf(SCORE_MONOTONICITY_POWER), (vals[i] as f32).powf(SCORE_MONOTONICITY_POWER));
    if vals[i - 1] > vals[i] {
      monotonicity_left += a - b;
    } else {
      monotonicity_right += b - a;
    }
  }

  SCORE_LOST_PENALTY +
    SCORE_EMPTY_WEIGHT * (empty as f32) +
    SCORE_MERGES_WEIGHT * (merges as f32) -
    SCORE_MONOTONICITY_WEIGHT * monotonicity_left.min(monotonicity_right) -
    SCORE_SUM_WEIGHT * sum
}

/// Packs a line of tile values into four exponent nibbles, capped at 15.
fn line_index(line: [u32; SIZE]) -> usize {
  line.iter().enumerate().fold(0, |acc, (i, &val)| {
    let rank = if val == 0 { 0 } else { val.trailing_zeros().min(15) as usize };
    acc | rank << (4 * i)
  })
}

pub fn heur_score(board: Board) -> f32 {
  let table = score_table();
  let rows = board.cells();
  let cols = board.transpose().cells();
  rows.iter().chain(cols.iter()).map(|&line| table[line_index(line)]).sum()
}

/// Chooses moves for one game at a time.
pub struct Player {
  strategy: StrategyKind,
  depth: u8,
  rng: ChaCha8Rng,
  hash: HashMap<Board, (u8, f32)>,
}

impl Player {
  pub fn new(strategy: StrategyKind, depth: u8, seed: u64) -> Player {
    Player { strategy, depth, rng: ChaCha8Rng::seed_from_u64(seed), hash: HashMap::new() }
  }

  pub fn from_config(config: &Config, seed: u64) -> Player {
    Player::new(config.strategy, config.depth, seed)
  }

  /// Picks a direction that changes `board`, or `None` if there is none.
  pub fn choose(&mut self, board: Board) -> Option<Direction> {
    match self.strategy {
      StrategyKind::Random => {
        let legal: Vec<Direction> = Direction::ALL.iter().cloned().filter(|&dir| board.can_slide(dir)).collect();
        legal.choose(&mut self.rng).cloned()
      }
      StrategyKind::Greedy => {
        let mut best: Option<(Direction, u64)> = None;
        for &dir in PREFERENCE.iter() {
          let (next, merges) = board.slide(dir);
          if next == board {
            continue;
          }
          let gain: u64 = merges.iter().map(|&val| u64::from(val)).sum();
          if best.map_or(true, |(_, best_gain)| gain > best_gain) {
            best = Some((dir, gain));
          }
        }
        best.map(|(dir, _)| dir)
      }
      StrategyKind::Expectimax => {
        self.hash.clear();
        let mut best: Option<(Direction, f32)> = None;
        for &dir in PREFERENCE.iter() {
          let (next, _) = board.slide(dir);
          if next == board {
            continue;
          }
          let exp = self.comp_move(next, self.depth, 1.0);
          if best.map_or(true, |(_, best_exp)| exp > best_exp) {
            best = Some((dir, exp));
          }
        }
        best.map(|(dir, _)| dir)
      }
    }
  }

  // Average over every empty cell receiving the spawn tile.
  fn comp_move(&mut self, board: Board, depth: u8, prob: f32) -> f32 {
    if depth == 0 || prob < MIN_PROB {
      return heur_score(board);
    }

    if let Some(&(hash_depth, score)) = self.hash.get(&board) {
      if hash_depth >= depth {
        return score;
      }
    }

    let open = board.empty_cells();
    if open.is_empty() {
      return heur_score(board);
    }
    let cell_prob = prob / open.len() as f32;

    let mut score = 0f32;
    for &(row, col) in open.iter() {
      let mut next = board;
      next.set(row, col, SPAWN_VALUE);
      score += self.player_move(next, depth, cell_prob);
    }
    score /= open.len() as f32;

    self.hash.insert(board, (depth, score));
    score
  }

  // Best slide for the player; a board with no moves scores 0.
  fn player_move(&mut self, board: Board, depth: u8, prob: f32) -> f32 {
    let mut score = 0f32;
    for &dir in Direction::ALL.iter() {
      let (next, _) = board.slide(dir);
      if next == board {
        continue;
      }
      score = score.max(self.comp_move(next, depth - 1, prob));
    }
    score
  }
}
