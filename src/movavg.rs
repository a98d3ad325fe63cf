use std::collections::VecDeque;
use std::ops::{Add, Div, Sub};

/// Average over the last `window` values added.
#[derive(Debug)]
pub struct MovAvg<T> {
  total: T,
  window: usize,
  vals: VecDeque<T>,
}

impl<T: Add<Output=T> + Sub<Output=T> + Div<Output=T> + From<u32> + Copy> MovAvg<T> {
  pub fn new(window: usize) -> MovAvg<T> {
    MovAvg { total: T::from(0), window, vals: VecDeque::with_capacity(window + 1) }
  }

  pub fn add(&mut self, val: T) {
    self.vals.push_back(val);
    self.total = self.total + val;
    if self.vals.len() > self.window {
      self.drop();
    }
  }

  fn drop(&mut self) {
    if let Some(val) = self.vals.pop_front() {
      self.total = self.total - val;
    }
  }

  pub fn len(&self) -> usize {
    self.vals.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vals.is_empty()
  }

  pub fn avg(&self) -> Option<T> {
    if self.vals.is_empty() {
      None
    } else {
      Some(self.total / T::from(self.vals.len() as u32))
    }
  }
}
