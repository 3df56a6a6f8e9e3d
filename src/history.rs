use std::collections::VecDeque;

pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Bounded undo/redo over whole-state snapshots.
///
/// `index` always points at the current snapshot, and there is always at least one.
/// All access goes through `&mut self`, so a write always sees the latest index.
#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<T>,
    index: usize,
    max_history: usize,
}

impl<T> History<T> {
    pub fn new(initial: T, max_history: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            max_history: max_history.max(1),
        }
    }

    /// Records `state`.
    ///
    /// Without `overwrite` the redo branch is dropped, the state is appended and becomes
    /// current, and the oldest entry is evicted past `max_history`. With `overwrite` the
    /// current entry is replaced in place and nothing else changes.
    pub fn set_state(&mut self, state: T, overwrite: bool) {
        if overwrite {
            self.entries[self.index] = state;
            return;
        }

        // Drop redo branch
        if self.index + 1 < self.entries.len() {
            log::debug!("discarding {} redo entries", self.entries.len() - self.index - 1);
            self.entries.truncate(self.index + 1);
        }
        self.entries.push_back(state);
        self.index = self.entries.len() - 1;

        while self.entries.len() > self.max_history {
            self.entries.pop_front();
            self.index = self.max_history - 1;
        }
    }

    /// Steps back one entry. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Steps forward one entry. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn clear_history(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.index = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_single_entry() {
        let history = History::new("a", 10);
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), "a");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn bounded_history_evicts_oldest() {
        let mut history = History::new(0, 3);
        for n in 1..=5 {
            history.set_state(n, false);
        }
        assert!(history.len() <= 3);
        assert_eq!(history.index(), 2);
        assert_eq!(*history.current(), 5);

        for _ in 0..3 {
            history.undo();
        }
        assert_eq!(*history.current(), 3);
        assert!(!history.undo());
        assert_eq!(*history.current(), 3);
        assert_eq!(history.entries().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn overwrite_replaces_current_only() {
        let mut history = History::new("s0", 10);
        history.set_state("s1", false);
        history.undo();
        let can_redo = history.can_redo();
        history.set_state("s2", true);
        assert_eq!(history.len(), 2);
        assert_eq!(*history.current(), "s2");
        assert_eq!(history.can_redo(), can_redo);
        assert!(history.redo());
        assert_eq!(*history.current(), "s1");
    }

    #[test]
    fn new_state_discards_redo_branch() {
        let mut history = History::new(0, 10);
        history.set_state(1, false);
        history.set_state(2, false);
        history.undo();
        history.undo();
        history.set_state(9, false);
        assert_eq!(history.entries().copied().collect::<Vec<_>>(), vec![0, 9]);
        assert!(!history.redo());
    }

    #[test]
    fn clear_resets_to_fresh_state() {
        let mut history = History::new(0, 10);
        history.set_state(1, false);
        history.set_state(2, false);
        history.clear_history(42);
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert_eq!(*history.current(), 42);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let mut history = History::new(0, 0);
        history.set_state(1, false);
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), 1);
    }
}
