use std::time::Instant;

use futures::Future;
use futures_cpupool::CpuPool;
use log::info;

use crate::board::Board;
use crate::config::Config;
use crate::error::Result;
use crate::expmax::Player;
use crate::game::Game;
use crate::movavg::MovAvg;

const AVG_WINDOW: usize = 100;

#[derive(Debug, Clone)]
pub struct GameSummary {
  pub index: u32,
  pub seed: u64,
  pub score: u64,
  pub max_tile: u32,
  pub moves: u64,
  pub board: Board,
  /// Saved state of the final position.
  pub state: Vec<u8>,
}

/// Plays `game` until no move is left, or until a tile of at least `until`
/// appears when `until` is non-zero.
pub fn play_game(game: &mut Game, player: &mut Player, until: u32, print: bool) -> Result<()> {
  if print {
    print!("{}", game.board());
  }
  loop {
    if until > 0 && game.max_tile() >= until {
      break;
    }
    let dir = match player.choose(game.board()) {
      Some(dir) => dir,
      None => break,
    };
    let outcome = game.play(dir)?;
    if print {
      println!("{} score: {}", dir, outcome.score);
      print!("{}", game.board());
    }
  }
  Ok(())
}

fn run_one(config: &Config, index: u32, seed: u64, print: bool) -> Result<GameSummary> {
  let mut game = Game::new(seed);
  let mut player = Player::from_config(config, seed);
  play_game(&mut game, &mut player, config.max_tile, print)?;
  Ok(GameSummary {
    index,
    seed,
    score: game.score(),
    max_tile: game.max_tile(),
    moves: game.moves(),
    board: game.board(),
    state: game.save()?,
  })
}

/// Plays `config.games` games, seeded `seed`, `seed + 1`, ... and returns
/// their summaries in order. More than one game runs on a thread pool.
pub fn play_batch(config: &Config) -> Result<Vec<GameSummary>> {
  let base_seed = config.seed.unwrap_or_else(rand::random);
  let now = Instant::now();

  let summaries = if config.games == 1 {
    vec![run_one(config, 0, base_seed, config.print)?]
  } else {
    let pool = if config.threads == 0 { CpuPool::new_num_cpus() } else { CpuPool::new(config.threads) };
    let jobs: Vec<_> = (0..config.games).map(|index| {
      let config = config.clone();
      let seed = base_seed.wrapping_add(u64::from(index));
      pool.spawn_fn(move || run_one(&config, index, seed, false))
    }).collect();
    futures::future::join_all(jobs).wait()?
  };

  let mut avg = MovAvg::<f64>::new(AVG_WINDOW);
  let mut total = 0u64;
  for s in summaries.iter() {
    avg.add(s.score as f64);
    total += s.score;
    info!("game {} (seed {}): score {}, max tile {}, {} moves, avg {:.1}",
          s.index, s.seed, s.score, s.max_tile, s.moves, avg.avg().unwrap_or(0.0));
  }

  let elapsed = now.elapsed();
  info!("{} games, average score {:.1}, time {:.3}s",
        summaries.len(), total as f64 / summaries.len() as f64, elapsed.as_secs_f64());
  Ok(summaries)
}
