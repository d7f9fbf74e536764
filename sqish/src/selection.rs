//! Which row of the current result set is selected.

use sqish_types::Record;

/// The displayed result set plus the selected index.
///
/// The index is `None` exactly when the result set is empty. It only moves
/// by user navigation, never wraps, and resets on every new result set.
#[derive(Debug, Default)]
pub struct Selection {
    results: Vec<Record>,
    index: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result set. Prior navigation never survives a new query.
    pub fn on_new_result_set(&mut self, results: Vec<Record>) {
        self.index = if results.is_empty() { None } else { Some(0) };
        self.results = results;
    }

    /// Move towards the top. Returns false at the first row.
    pub fn move_up(&mut self) -> bool {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Move towards the bottom. Returns false at the last row.
    pub fn move_down(&mut self) -> bool {
        match self.index {
            Some(i) if i + 1 < self.results.len() => {
                self.index = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&Record> {
        self.index.and_then(|i| self.results.get(i))
    }

    pub fn results(&self) -> &[Record] {
        &self.results
    }

    /// The selected record, consuming the selection.
    pub fn commit(mut self) -> Option<Record> {
        let index = self.index?;
        Some(self.results.swap_remove(index))
    }
}
