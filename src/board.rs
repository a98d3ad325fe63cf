use std::fmt;

/// Rows and columns on the board.
pub const SIZE: usize = 4;

pub type Cells = [[u32; SIZE]; SIZE];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
  Right,
  Left,
  Up,
  Down,
}

impl Direction {
  pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];

  pub fn letter(self) -> char {
    match self {
      Direction::Right => 'R',
      Direction::Left => 'L',
      Direction::Up => 'U',
      Direction::Down => 'D',
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match *self {
      Direction::Right => "right",
      Direction::Left => "left",
      Direction::Up => "up",
      Direction::Down => "down",
    };
    f.write_str(name)
  }
}

/// A 4x4 grid of tile values in row-major order. Zero is an empty cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Board(Cells);

impl Board {
  pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

  pub fn from_cells(cells: Cells) -> Board {
    Board(cells)
  }

  pub fn cells(self) -> Cells {
    self.0
  }

  pub fn get(self, row: usize, col: usize) -> u32 {
    self.0[row][col]
  }

  pub fn set(&mut self, row: usize, col: usize, val: u32) {
    self.0[row][col] = val;
  }

  /// Open cells as `(row, col)` pairs, row-major.
  pub fn empty_cells(self) -> Vec<(usize, usize)> {
    let mut open = Vec::with_capacity(SIZE * SIZE);
    for row in 0..SIZE {
      for col in 0..SIZE {
        if self.0[row][col] == 0 {
          open.push((row, col));
        }
      }
    }
    open
  }

  pub fn empty(self) -> usize {
    self.0.iter().flat_map(|row| row.iter()).filter(|&&val| val == 0).count()
  }

  pub fn is_full(self) -> bool {
    self.empty() == 0
  }

  pub fn max_val(self) -> u32 {
    self.0.iter().flat_map(|row| row.iter()).cloned().max().unwrap_or(0)
  }

  pub fn sum(self) -> u64 {
    self.0.iter().flat_map(|row| row.iter()).map(|&val| u64::from(val)).sum()
  }

  /// Slides and merges every line toward the leading edge of `dir`.
  ///
  /// Returns the new board along with the value of every merged tile, line by
  /// line (rows top to bottom, columns left to right) and nearest the leading
  /// edge first within a line.
  pub fn slide(self, dir: Direction) -> (Board, Vec<u32>) {
    let mut merges = Vec::new();
    let board = match dir {
      Direction::Left => self.slide_left(&mut merges),
      Direction::Right => self.flip_horiz().slide_left(&mut merges).flip_horiz(),
      Direction::Up => self.transpose().slide_left(&mut merges).transpose(),
      Direction::Down => self.transpose().flip_horiz().slide_left(&mut merges).flip_horiz().transpose(),
    };
    (board, merges)
  }

  /// True if sliding toward `dir` would change at least one cell.
  pub fn can_slide(self, dir: Direction) -> bool {
    self.slide(dir).0 != self
  }

  /// Full, and no two orthogonal neighbours share a value.
  pub fn is_stuck(self) -> bool {
    if !self.is_full() {
      return false;
    }
    for row in 0..SIZE {
      for col in 0..SIZE {
        let val = self.0[row][col];
        if col + 1 < SIZE && self.0[row][col + 1] == val {
          return false;
        }
        if row + 1 < SIZE && self.0[row + 1][col] == val {
          return false;
        }
      }
    }
    true
  }

  pub fn transpose(self) -> Board {
    let mut res = [[0; SIZE]; SIZE];
    for row in 0..SIZE {
      for col in 0..SIZE {
        res[col][row] = self.0[row][col];
      }
    }
    Board(res)
  }

  pub fn flip_horiz(self) -> Board {
    let mut res = self.0;
    for row in res.iter_mut() {
      row.reverse();
    }
    Board(res)
  }

  fn slide_left(self, merges: &mut Vec<u32>) -> Board {
    let mut res = self.0;
    for row in res.iter_mut() {
      *row = slide_line(*row, merges);
    }
    Board(res)
  }
}

/// Merges and compacts a single line toward index 0.
///
/// `merge_val` holds the value of the last tile placed, or 0 once that tile
/// has absorbed a neighbour, so no tile merges twice in one slide.
pub fn slide_line(line: [u32; SIZE], merges: &mut Vec<u32>) -> [u32; SIZE] {
  let mut res = [0; SIZE];
  let mut filled = 0;
  let mut merge_val = 0;
  for &val in line.iter().filter(|&&val| val != 0) {
    if val == merge_val {
      res[filled - 1] += val;
      merges.push(res[filled - 1]);
      merge_val = 0;
    } else {
      res[filled] = val;
      filled += 1;
      merge_val = val;
    }
  }
  res
}

fn label(val: u32) -> String {
  match val {
    0 => String::new(),
    v if v < 1024 => v.to_string(),
    v => format!("{}K", v / 1024),
  }
}

impl fmt::Display for Board {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "+----+----+----+----+")?;
    for row in self.0.iter() {
      for &val in row.iter() {
        write!(f, "|{:>4}", label(val))?;
      }
      writeln!(f, "|")?;
      writeln!(f, "+----+----+----+----+")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row_board(row: [u32; SIZE]) -> Board {
    Board([row, [0; SIZE], [0; SIZE], [0; SIZE]])
  }

  #[test]
  fn scenarios() {
    let (b, merges) = row_board([2, 2, 4, 0]).slide(Direction::Left);
    assert_eq!(b, row_board([4, 4, 0, 0]));
    assert_eq!(merges, vec![4]);

    let (b, merges) = row_board([2, 0, 2, 2]).slide(Direction::Right);
    assert_eq!(b, row_board([0, 0, 2, 4]));
    assert_eq!(merges, vec![4]);

    for &dir in [Direction::Left, Direction::Right].iter() {
      let (b, merges) = row_board([2, 4, 8, 16]).slide(dir);
      assert_eq!(b, row_board([2, 4, 8, 16]));
      assert!(merges.is_empty());
    }

    // Full board of [2, 4, 8, 16]-style lines: no direction changes it.
    let full = Board([[2, 4, 8, 16],
                      [4, 8, 16, 32],
                      [8, 16, 32, 64],
                      [16, 32, 64, 128]]);
    for &dir in Direction::ALL.iter() {
      let (b, merges) = full.slide(dir);
      assert_eq!(b, full, "{}", dir);
      assert!(merges.is_empty(), "{}", dir);
    }
  }

  #[test]
  fn no_double_merge() {
    let mut merges = Vec::new();
    assert_eq!(slide_line([2, 2, 2, 2], &mut merges), [4, 4, 0, 0]);
    assert_eq!(merges, vec![4, 4]);

    merges.clear();
    assert_eq!(slide_line([4, 4, 8, 0], &mut merges), [8, 8, 0, 0]);
    assert_eq!(merges, vec![8]);

    merges.clear();
    assert_eq!(slide_line([2, 2, 2, 0], &mut merges), [4, 2, 0, 0]);
    assert_eq!(merges, vec![4]);

    merges.clear();
    assert_eq!(slide_line([8, 0, 0, 8], &mut merges), [16, 0, 0, 0]);
    assert_eq!(merges, vec![16]);

    merges.clear();
    assert_eq!(slide_line([2, 4, 2, 0], &mut merges), [2, 4, 2, 0]);
    assert!(merges.is_empty());
  }

  #[test]
  fn sliding() {
    let b = Board([[2, 0, 0, 2],
                   [0, 4, 4, 0],
                   [8, 0, 0, 0],
                   [2, 2, 4, 4]]);

    assert_eq!(b.slide(Direction::Left), (Board([[4, 0, 0, 0],
                                                 [8, 0, 0, 0],
                                                 [8, 0, 0, 0],
                                                 [4, 8, 0, 0]]), vec![4, 8, 4, 8]));
    assert_eq!(b.slide(Direction::Right), (Board([[0, 0, 0, 4],
                                                  [0, 0, 0, 8],
                                                  [0, 0, 0, 8],
                                                  [0, 0, 4, 8]]), vec![4, 8, 8, 4]));
    assert_eq!(b.slide(Direction::Up), (Board([[2, 4, 8, 2],
                                               [8, 2, 0, 4],
                                               [2, 0, 0, 0],
                                               [0, 0, 0, 0]]), vec![8]));
    assert_eq!(b.slide(Direction::Down), (Board([[0, 0, 0, 0],
                                                 [2, 0, 0, 0],
                                                 [8, 4, 0, 2],
                                                 [2, 2, 8, 4]]), vec![8]));
  }

  #[test]
  fn compaction() {
    let b = Board([[0, 2, 0, 4],
                   [16, 0, 0, 8],
                   [0, 0, 0, 0],
                   [2, 0, 4, 0]]);
    for &dir in Direction::ALL.iter() {
      let (moved, _) = b.slide(dir);
      let lines = match dir {
        Direction::Left => moved.cells(),
        Direction::Right => moved.flip_horiz().cells(),
        Direction::Up => moved.transpose().cells(),
        Direction::Down => moved.transpose().flip_horiz().cells(),
      };
      for line in lines.iter() {
        let occupied = line.iter().filter(|&&v| v != 0).count();
        assert!(line[..occupied].iter().all(|&v| v != 0), "{} {:?}", dir, line);
        assert!(line[occupied..].iter().all(|&v| v == 0), "{} {:?}", dir, line);
      }
    }
  }

  #[test]
  fn legality() {
    assert!(!Board::EMPTY.can_slide(Direction::Left));

    // A scan heuristic can misjudge gaps; the slide itself decides.
    let b = row_board([0, 2, 0, 2]);
    assert!(b.can_slide(Direction::Right));
    assert!(b.can_slide(Direction::Left));
    assert!(b.can_slide(Direction::Down));
    assert!(!b.can_slide(Direction::Up));

    let b = row_board([2, 4, 8, 16]);
    assert!(!b.can_slide(Direction::Left));
    assert!(!b.can_slide(Direction::Right));
    assert!(!b.can_slide(Direction::Up));
    assert!(b.can_slide(Direction::Down));
  }

  #[test]
  fn stuck() {
    let b = Board([[2, 4, 2, 4],
                   [4, 2, 4, 2],
                   [2, 4, 2, 4],
                   [4, 2, 4, 2]]);
    assert!(b.is_stuck());
    assert!(Direction::ALL.iter().all(|&dir| !b.can_slide(dir)));

    let mut b2 = b;
    b2.set(3, 3, 4);
    assert!(!b2.is_stuck());
    assert!(b2.can_slide(Direction::Right));
    assert!(b2.can_slide(Direction::Up));

    b2.set(3, 3, 0);
    assert!(!b2.is_stuck());
  }

  #[test]
  fn transposing() {
    let b = Board([[1, 2, 3, 4],
                   [5, 6, 7, 8],
                   [9, 10, 11, 12],
                   [13, 14, 15, 16]]);
    assert_eq!(b.transpose().get(0, 3), 13);
    assert_eq!(b.transpose().transpose(), b);
    assert_eq!(b.flip_horiz().get(1, 0), 8);
  }

  #[test]
  fn counting() {
    let b = row_board([2, 0, 2048, 0]);
    assert_eq!(b.empty(), 14);
    assert_eq!(b.empty_cells()[0], (0, 1));
    assert_eq!(b.max_val(), 2048);
    assert_eq!(b.sum(), 2050);
    assert!(!b.is_full());
  }

  #[test]
  fn display() {
    let s = row_board([2, 0, 2048, 128]).to_string();
    assert_eq!(s.lines().nth(1), Some("|   2|    |  2K| 128|"));
    assert_eq!(s.lines().count(), 9);
  }
}
