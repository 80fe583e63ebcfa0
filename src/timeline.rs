use crate::all::*;

// Timestamp-sorted container with one entry per tracked frame. Backed by a
// sorted vector and binary search, so lookups are O(log n) and trimming is a
// truncate. Values removed by `insert`, `trim_from` and `clear` are dropped,
// which releases any pixel buffers they own.
pub struct Timeline<T> {
  entries: Vec<(Timestamp, T)>,
}

impl<T> Timeline<T> {
  pub fn new() -> Timeline<T> {
    Timeline { entries: vec![] }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  // Inserting at an existing time overwrites that entry instead of
  // duplicating it, which happens when the user repositions an already
  // tracked frame.
  pub fn insert(&mut self, time: Timestamp, value: T) {
    match self.entries.binary_search_by_key(&time, |e| e.0) {
      Ok(i) => self.entries[i].1 = value,
      Err(i) => self.entries.insert(i, (time, value)),
    }
  }

  pub fn last(&self) -> Option<&(Timestamp, T)> {
    self.entries.last()
  }

  pub fn closest_at_or_before(&self, time: Timestamp) -> Option<&T> {
    match self.entries.binary_search_by_key(&time, |e| e.0) {
      Ok(i) => Some(&self.entries[i].1),
      Err(0) => None,
      Err(i) => Some(&self.entries[i - 1].1),
    }
  }

  // Discards every entry with time at or after the given time.
  pub fn trim_from(&mut self, time: Timestamp) {
    let keep = self.entries.partition_point(|e| e.0 < time);
    self.entries.truncate(keep);
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn iter(&self) -> impl Iterator<Item = &(Timestamp, T)> {
    self.entries.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn timeline(times: &[Timestamp]) -> Timeline<usize> {
    let mut t = Timeline::new();
    for (i, time) in times.iter().enumerate() {
      t.insert(*time, i);
    }
    t
  }

  #[test]
  fn test_insert_keeps_order_and_replaces() {
    let mut t = timeline(&[30, 10, 20]);
    let times: Vec<Timestamp> = t.iter().map(|e| e.0).collect();
    assert_eq!(times, vec![10, 20, 30]);
    assert_eq!(t.last().map(|e| e.0), Some(30));

    t.insert(20, 99);
    assert_eq!(t.len(), 3);
    assert_eq!(t.closest_at_or_before(20), Some(&99));
  }

  #[test]
  fn test_closest_at_or_before() {
    let t = timeline(&[10, 20, 30]);
    assert_eq!(t.closest_at_or_before(5), None);
    assert_eq!(t.closest_at_or_before(10), Some(&0));
    assert_eq!(t.closest_at_or_before(25), Some(&1));
    assert_eq!(t.closest_at_or_before(100), Some(&2));
  }

  #[test]
  fn test_trim_from() {
    let mut t = timeline(&[10, 20, 30, 40]);
    t.trim_from(30);
    assert_eq!(t.len(), 2);
    assert_eq!(t.last().map(|e| e.0), Some(20));
    // Trimming an empty timeline is a no-op.
    t.trim_from(0);
    assert!(t.is_empty());
    t.trim_from(0);
    assert!(t.is_empty());
  }
}
