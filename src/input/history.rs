//! Command history: most-recent-first recall with best-effort persistence.
//!
//! The store is loaded once at construction and mutated only through
//! [`History::add`]. Persistence failures are absorbed here and never
//! surfaced; a broken disk costs recall across sessions, nothing else.

use crate::storage::KeyValueStore;

/// The single storage key the history sequence persists under.
pub const HISTORY_KEY: &str = "command_history";

/// Ordered history of submitted lines with a recall cursor.
///
/// Entries are most-recent-first and duplicates are allowed. The cursor
/// is `None` while the user is editing a fresh line; the line being
/// composed is captured into the pending buffer when browsing begins so
/// navigating back past the newest entry restores it.
pub struct History {
    entries: Vec<String>,
    cursor: Option<usize>,
    pending: String,
    store: Box<dyn KeyValueStore>,
}

impl History {
    /// Load persisted history from `store`.
    ///
    /// Missing or malformed data yields an empty history; the failure
    /// is absorbed, never surfaced.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = store
            .get(HISTORY_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default();

        Self {
            entries,
            cursor: None,
            pending: String::new(),
            store,
        }
    }

    /// Record a submitted line.
    ///
    /// Prepends the line, resets the cursor, clears the pending buffer,
    /// and persists the full sequence best-effort.
    pub fn add(&mut self, line: &str) {
        self.entries.insert(0, line.to_string());
        self.cursor = None;
        self.pending.clear();

        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                if let Err(e) = self.store.set(HISTORY_KEY, &json) {
                    log::debug!("history not persisted: {e}");
                }
            }
            Err(e) => log::debug!("history not serialized: {e}"),
        }
    }

    /// Move one entry back in time.
    ///
    /// On the first call of a browse, `current` (the line being
    /// composed) is captured into the pending buffer. The cursor is
    /// clamped to the oldest entry; with an empty history this returns
    /// the pending buffer.
    pub fn navigate_up(&mut self, current: &str) -> String {
        if self.cursor.is_none() {
            self.pending = current.to_string();
        }

        self.cursor = match self.cursor {
            None if self.entries.is_empty() => None,
            None => Some(0),
            Some(i) => Some((i + 1).min(self.entries.len() - 1)),
        };

        self.recalled()
    }

    /// Move one entry forward in time.
    ///
    /// Clamped at "not browsing"; past the newest entry this returns
    /// the pending buffer captured when browsing began.
    pub fn navigate_down(&mut self) -> String {
        self.cursor = match self.cursor {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };

        self.recalled()
    }

    fn recalled(&self) -> String {
        match self.cursor {
            Some(i) => self.entries[i].clone(),
            None => self.pending.clone(),
        }
    }

    /// The stored lines, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lines are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn empty_history() -> History {
        History::load(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_round_trip_recall() {
        let mut history = empty_history();
        history.add("foo");
        history.add("bar");

        assert_eq!(history.navigate_up(""), "bar");
        assert_eq!(history.navigate_up("ignored"), "foo");
        assert_eq!(history.navigate_down(), "bar");
        assert_eq!(history.navigate_down(), "");
    }

    #[test]
    fn test_pending_line_restored() {
        let mut history = empty_history();
        history.add("older");

        assert_eq!(history.navigate_up("draft line"), "older");
        assert_eq!(history.navigate_down(), "draft line");
    }

    #[test]
    fn test_up_clamps_at_oldest() {
        let mut history = empty_history();
        history.add("one");
        history.add("two");

        for _ in 0..10 {
            history.navigate_up("");
        }
        assert_eq!(history.navigate_up(""), "one");
    }

    #[test]
    fn test_down_clamps_at_pending() {
        let mut history = empty_history();
        history.add("one");
        history.navigate_up("kept");

        for _ in 0..10 {
            assert_eq!(history.navigate_down(), "kept");
        }
    }

    #[test]
    fn test_empty_history_never_panics() {
        let mut history = empty_history();
        for _ in 0..5 {
            assert_eq!(history.navigate_up("draft"), "draft");
        }
        assert_eq!(history.navigate_down(), "draft");
    }

    #[test]
    fn test_add_resets_browse() {
        let mut history = empty_history();
        history.add("a");
        history.add("b");
        history.navigate_up("draft");
        history.navigate_up("");

        history.add("c");
        // cursor reset: the first browse starts at the newest entry
        assert_eq!(history.navigate_up(""), "c");
    }

    #[test]
    fn test_persists_as_json_array() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "[\"old\"]").unwrap();
        let mut history = History::load(Box::new(store));
        assert_eq!(history.entries(), ["old"]);

        history.add("new");
        assert_eq!(history.entries(), ["new", "old"]);
    }

    #[test]
    fn test_malformed_persisted_data_absorbed() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not an array").unwrap();
        let history = History::load(Box::new(store));
        assert!(history.is_empty());

        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{\"a\": 1}").unwrap();
        assert!(History::load(Box::new(store)).is_empty());
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut history = empty_history();
        history.add("same");
        history.add("same");
        assert_eq!(history.len(), 2);
    }
}
