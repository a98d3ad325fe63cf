use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// How the autoplayer picks its moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
  /// Uniform among legal directions.
  Random,
  /// Largest immediate merge score.
  Greedy,
  /// Depth-limited expectimax search.
  Expectimax,
}

impl FromStr for StrategyKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<StrategyKind> {
    match s {
      "random" => Ok(StrategyKind::Random),
      "greedy" => Ok(StrategyKind::Greedy),
      "expectimax" => Ok(StrategyKind::Expectimax),
      _ => Err(Error::Config(format!("unknown strategy '{}'", s))),
    }
  }
}

/// Settings for headless play. Every field may be omitted from the TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Seed of the first game; later games use `seed + i`. Random if unset.
  pub seed: Option<u64>,
  pub games: u32,
  /// Worker threads for batches. 0 means one per CPU.
  pub threads: usize,
  pub strategy: StrategyKind,
  /// Search depth for `expectimax`.
  pub depth: u8,
  /// Stop a game once a tile of this value appears. 0 plays to the end.
  pub max_tile: u32,
  /// Print the board after every move of a single game.
  pub print: bool,
  /// Where to write the final state of a single game.
  pub save: Option<PathBuf>,
}

mod defaults {
  pub const GAMES: u32 = 1;
  pub const DEPTH: u8 = 2;
  pub const MAX_DEPTH: u8 = 6;
}

impl Default for Config {
  fn default() -> Config {
    Config {
      seed: None,
      games: defaults::GAMES,
      threads: 0,
      strategy: StrategyKind::Expectimax,
      depth: defaults::DEPTH,
      max_tile: 0,
      print: false,
      save: None,
    }
  }
}

impl Config {
  pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    contents.parse()
  }

  pub fn validate(&self) -> Result<()> {
    if self.games == 0 {
      return Err(Error::Config("games must be at least 1".to_string()));
    }
    if self.depth == 0 || self.depth > defaults::MAX_DEPTH {
      return Err(Error::Config(format!("depth must be between 1 and {}", defaults::MAX_DEPTH)));
    }
    if self.max_tile != 0 && (self.max_tile < 4 || !self.max_tile.is_power_of_two()) {
      return Err(Error::Config(format!("max_tile {} is not a tile value above 2", self.max_tile)));
    }
    if self.save.is_some() && self.games > 1 {
      return Err(Error::Config("save needs a single game".to_string()));
    }
    if self.print && self.games > 1 {
      return Err(Error::Config("print needs a single game".to_string()));
    }
    Ok(())
  }
}

impl FromStr for Config {
  type Err = Error;

  fn from_str(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_fill_missing_keys() {
    let cfg: Config = "games = 8\nstrategy = \"greedy\"".parse().unwrap();
    assert_eq!(cfg.games, 8);
    assert_eq!(cfg.strategy, StrategyKind::Greedy);
    assert_eq!(cfg.depth, 2);
    assert_eq!(cfg.seed, None);

    let cfg: Config = "".parse().unwrap();
    assert_eq!(cfg, Config::default());
  }

  #[test]
  fn full_file() {
    let cfg: Config = r#"
      seed = 17
      games = 1
      threads = 2
      strategy = "expectimax"
      depth = 3
      max_tile = 2048
      print = true
      save = "game.s2k8"
    "#.parse().unwrap();
    assert_eq!(cfg.seed, Some(17));
    assert_eq!(cfg.threads, 2);
    assert_eq!(cfg.max_tile, 2048);
    assert_eq!(cfg.save, Some(PathBuf::from("game.s2k8")));
    assert!(cfg.print);
  }

  #[test]
  fn bundled_file() {
    let cfg: Config = include_str!("../swipe2048.toml").parse().unwrap();
    assert_eq!(cfg.games, 20);
    assert_eq!(cfg.strategy, StrategyKind::Expectimax);

    let path = std::env::temp_dir().join(format!("swipe2048-config-{}.toml", std::process::id()));
    std::fs::write(&path, "games = 3\ndepth = 1").unwrap();
    let cfg = Config::from_toml(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!((cfg.games, cfg.depth), (3, 1));

    match Config::from_toml("/nonexistent/swipe2048.toml") {
      Err(Error::Io(_)) => {}
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn rejects_bad_values() {
    assert!("strategy = \"minimax\"".parse::<Config>().is_err());
    assert!("games = 0".parse::<Config>().is_err());
    assert!("depth = 9".parse::<Config>().is_err());
    assert!("max_tile = 100".parse::<Config>().is_err());
    assert!("colour = \"red\"".parse::<Config>().is_err());
    assert!("games = 3\nsave = \"x\"".parse::<Config>().is_err());
    assert!("games = 3\nprint = true".parse::<Config>().is_err());
  }

  #[test]
  fn strategy_names() {
    assert_eq!("random".parse::<StrategyKind>().unwrap(), StrategyKind::Random);
    match "best".parse::<StrategyKind>() {
      Err(Error::Config(msg)) => assert!(msg.contains("best")),
      other => panic!("unexpected {:?}", other),
    }
  }
}
