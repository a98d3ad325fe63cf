use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use swipe2048::expmax::Player;
use swipe2048::{Board, Direction, Game, StrategyKind};

fn corpus() -> Vec<Board> {
  let mut game = Game::new(42);
  let mut boards = vec![game.board()];
  for &dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down].iter().cycle().take(60) {
    if game.play(dir).map(|o| o.changed).unwrap_or(false) {
      boards.push(game.board());
    }
  }
  boards
}

fn bench_slide(c: &mut Criterion) {
  let boards = corpus();
  for &dir in Direction::ALL.iter() {
    c.bench_function(&format!("slide/{}", dir), |b| {
      b.iter(|| {
        let mut merged = 0usize;
        for &board in boards.iter() {
          merged += board.slide(dir).1.len();
        }
        black_box(merged)
      })
    });
  }
}

fn bench_play(c: &mut Criterion) {
  c.bench_function("play/greedy_game", |b| {
    b.iter(|| {
      let mut game = Game::new(7);
      let mut player = Player::new(StrategyKind::Greedy, 1, 7);
      while let Some(dir) = player.choose(game.board()) {
        if game.play(dir).is_err() {
          break;
        }
      }
      black_box(game.score())
    })
  });
}

fn bench_expectimax(c: &mut Criterion) {
  let boards = corpus();
  let mut player = Player::new(StrategyKind::Expectimax, 2, 0);
  c.bench_function("expectimax/depth2", |b| {
    b.iter(|| {
      for &board in boards.iter().take(8) {
        black_box(player.choose(board));
      }
    })
  });
}

criterion_group!(benches, bench_slide, bench_play, bench_expectimax);
criterion_main!(benches);
