use std::fs;
use std::path::{Path, PathBuf};

use env_logger::Env;
use getopts::{Matches, Options};
use log::{error, info};

use swipe2048::expmax::Player;
use swipe2048::runner::{self, play_game};
use swipe2048::{Config, Error, Game, Result};

enum Command {
  Play(Config),
  Help(String, Option<String>),
  Resume(Config, PathBuf),
  Show(PathBuf),
}

fn opt_parse<T: std::str::FromStr>(matches: &Matches, name: &str) -> Result<Option<T>> {
  match matches.opt_str(name) {
    Some(s) => s.parse().map(Some).map_err(|_| Error::Config(format!("bad value for --{}: {}", name, s))),
    None => Ok(None),
  }
}

fn build_config(matches: &Matches) -> Result<Config> {
  let mut config = match matches.opt_str("c") {
    Some(path) => Config::from_toml(path)?,
    None => Config::default(),
  };

  if let Some(games) = opt_parse(matches, "number")? {
    config.games = games;
  }
  if let Some(seed) = opt_parse(matches, "seed")? {
    config.seed = Some(seed);
  }
  if let Some(strategy) = opt_parse(matches, "strategy")? {
    config.strategy = strategy;
  }
  if let Some(depth) = opt_parse(matches, "depth")? {
    config.depth = depth;
  }
  if let Some(max_tile) = opt_parse(matches, "max-tile")? {
    config.max_tile = max_tile;
  }
  if let Some(threads) = opt_parse(matches, "threads")? {
    config.threads = threads;
  }
  if let Some(save) = matches.opt_str("o") {
    config.save = Some(PathBuf::from(save));
  }
  if matches.opt_present("p") {
    config.print = true;
  }

  config.validate()?;
  Ok(config)
}

fn parse_options(args: &[String]) -> Command {
  let mut opts = Options::new();
  opts.optflag("h", "help", "Print this message.");
  opts.optopt("c", "config", "TOML file with play settings. Flags override it.", "FILE");
  opts.optopt("n", "number", "Number of games to play. Defaults to 1.", "number");
  opts.optopt("s", "seed", "Seed of the first game. Later games add their index.", "number");
  opts.optopt("S", "strategy", "Move picker: random, greedy or expectimax.", "name");
  opts.optopt("d", "depth", "Expectimax search depth.", "number");
  opts.optopt("m", "max-tile", "Stop a game once a tile of this value appears.", "number");
  opts.optopt("t", "threads", "Worker threads for several games. 0 uses every CPU.", "number");
  opts.optopt("o", "save", "File to save the final state of a single game in.", "FILE");
  opts.optflag("p", "print", "Print the board after every move of a single game.");

  let program = args.first().map_or("swipe2048", |s| s.as_str());
  let brief = format!("Usage: {0} [options]\n       {0} resume FILE [options]\n       {0} show FILE", program);
  let options_str = opts.usage(&brief);

  let matches = match opts.parse(args.get(1..).unwrap_or(&[])) {
    Ok(m) => m,
    Err(e) => return Command::Help(options_str, Some(e.to_string())),
  };

  if matches.opt_present("h") {
    return Command::Help(options_str, None);
  }

  let free: Vec<&str> = matches.free.iter().map(|s| s.as_str()).collect();
  let config = match build_config(&matches) {
    Ok(config) => config,
    Err(e) => return Command::Help(options_str, Some(e.to_string())),
  };

  match free.as_slice() {
    [] => Command::Play(config),
    ["resume", file] => Command::Resume(config, PathBuf::from(file)),
    ["show", file] => Command::Show(PathBuf::from(file)),
    [arg, ..] => Command::Help(options_str, Some(format!("Unknown argument: {}", arg))),
  }
}

fn play(config: &Config) -> Result<()> {
  let summaries = runner::play_batch(config)?;
  if let (Some(path), [summary]) = (&config.save, summaries.as_slice()) {
    fs::write(path, &summary.state)?;
    info!("saved final state to {}", path.display());
  }
  if let [summary] = summaries.as_slice() {
    print!("{}", summary.board);
    println!("Score: {}", summary.score);
  }
  Ok(())
}

fn resume(config: &Config, path: &Path) -> Result<()> {
  let seed = config.seed.unwrap_or_else(rand::random);
  let mut game = match fs::read(path) {
    Ok(bytes) => Game::resume(&bytes, seed),
    Err(e) => {
      info!("cannot read {} ({}), starting a new game", path.display(), e);
      Game::new(seed)
    }
  };
  let mut player = Player::from_config(config, seed);
  play_game(&mut game, &mut player, config.max_tile, config.print)?;

  fs::write(path, game.save()?)?;
  print!("{}", game.board());
  println!("Score: {}", game.score());
  info!("saved state after {} moves to {}", game.moves(), path.display());
  Ok(())
}

fn show(path: &Path) -> Result<()> {
  let game = Game::restore(&fs::read(path)?)?;
  print!("{}", game.board());
  println!("Score: {}  Moves: {}{}", game.score(), game.moves(),
           if game.is_game_over() { "  Game over." } else { "" });
  let legal: String = game.legal_moves().directions().iter().map(|dir| dir.letter()).collect();
  println!("Legal: {}", legal);
  Ok(())
}

fn main() {
  env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

  let args: Vec<String> = std::env::args().collect();

  let result = match parse_options(&args) {
    Command::Help(options_str, err) => {
      if let Some(err_str) = err {
        println!("{}", err_str);
      }
      println!("{}", options_str);
      Ok(())
    }
    Command::Play(config) => play(&config),
    Command::Resume(config, file) => resume(&config, &file),
    Command::Show(file) => show(&file),
  };

  if let Err(e) = result {
    error!("{}", e);
    std::process::exit(1);
  }
}
