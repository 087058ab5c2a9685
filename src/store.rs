use crate::storage::MAX_TEXT_BYTES;
use crate::task::{Category, Priority, Task};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

pub const DEFAULT_DUE_DAYS: i64 = 7;

/// Change notification sent to subscribers after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added(usize),
    Toggled(usize),
    Removed(usize),
}

/// Insertion-ordered task list. Rows are addressed by position only.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    due_offset: TimeDelta,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_due_offset(TimeDelta::days(DEFAULT_DUE_DAYS))
    }

    pub fn with_due_offset(due_offset: TimeDelta) -> Self {
        Self {
            tasks: Vec::new(),
            due_offset,
            subscribers: Vec::new(),
        }
    }

    pub fn set_due_offset(&mut self, due_offset: TimeDelta) {
        self.due_offset = due_offset;
    }

    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn add(&mut self, text: &str, category: Category, priority: Priority) -> Option<&Task> {
        self.add_at(text, category, priority, Utc::now())
    }

    pub fn add_at(
        &mut self,
        text: &str,
        category: Category,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Option<&Task> {
        // Longer text would not read back from the task file.
        if text.is_empty() || text.len() > MAX_TEXT_BYTES {
            return None;
        }
        let task = Task {
            text: text.to_string(),
            done: false,
            category,
            priority,
            // The task file keeps whole seconds only.
            due: (now + self.due_offset).trunc_subsecs(0),
        };
        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        debug!(index, "task added");
        self.notify(StoreEvent::Added(index));
        self.tasks.last()
    }

    /// Appends an already built task, as read back from disk.
    pub fn push(&mut self, task: Task) {
        if task.text.is_empty() {
            return;
        }
        self.tasks.push(task);
        self.notify(StoreEvent::Added(self.tasks.len() - 1));
    }

    pub fn toggle_done(&mut self, index: usize) -> Option<bool> {
        let task = self.tasks.get_mut(index)?;
        task.done = !task.done;
        let done = task.done;
        debug!(index, done, "task toggled");
        self.notify(StoreEvent::Toggled(index));
        Some(done)
    }

    pub fn remove(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        let task = self.tasks.remove(index);
        debug!(index, "task removed");
        self.notify(StoreEvent::Removed(index));
        Some(task)
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }

    pub fn completion_fraction(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.done_count() as f64 / self.tasks.len() as f64
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl<'a> IntoIterator for &'a TaskStore {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(texts: &[&str]) -> TaskStore {
        let mut store = TaskStore::new();
        for text in texts {
            store.add(text, Category::default(), Priority::default());
        }
        store
    }

    #[test]
    fn add_rejects_empty_text() {
        let mut store = TaskStore::new();
        assert!(store.add("", Category::new("Work"), Priority::High).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn add_appends_pending_task_due_in_a_week() {
        let mut store = store_with(&["Walk dog"]);
        let now = Utc::now();
        let task = store
            .add("Buy milk", Category::new("Work"), Priority::High)
            .cloned()
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(&task));
        assert!(!task.done);
        assert_eq!(task.category.as_str(), "Work");
        assert_eq!(task.priority, Priority::High);
        let drift = (task.due - (now + TimeDelta::days(7))).num_seconds().abs();
        assert!(drift <= 5, "due drifted by {drift}s");
    }

    #[test]
    fn add_rejects_text_over_limit() {
        let mut store = TaskStore::new();
        let max = "x".repeat(MAX_TEXT_BYTES);
        assert!(store.add(&max, Category::default(), Priority::Low).is_some());
        let over = "x".repeat(MAX_TEXT_BYTES + 1);
        assert!(store.add(&over, Category::default(), Priority::Low).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_at_uses_configured_offset() {
        let mut store = TaskStore::with_due_offset(TimeDelta::days(1));
        let now = Utc::now();
        let due = store
            .add_at("Call mom", Category::default(), Priority::Low, now)
            .map(|t| t.due)
            .unwrap();
        assert_eq!(due, (now + TimeDelta::days(1)).trunc_subsecs(0));
        assert_eq!(due.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut store = store_with(&["a", "b"]);
        assert_eq!(store.toggle_done(1), Some(true));
        assert_eq!(store.toggle_done(1), Some(false));
        assert!(!store.get(1).unwrap().done);
        assert!(!store.get(0).unwrap().done);
    }

    #[test]
    fn toggle_and_remove_ignore_bad_index() {
        let mut store = store_with(&["a"]);
        assert_eq!(store.toggle_done(3), None);
        assert!(store.remove(1).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_targets_position() {
        let mut store = store_with(&["a", "b", "c"]);
        let removed = store.remove(1).unwrap();
        assert_eq!(removed.text, "b");
        let texts: Vec<&str> = store.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "c"]);
    }

    #[test]
    fn completion_fraction_handles_empty_and_half() {
        let mut store = TaskStore::new();
        assert_eq!(store.completion_fraction(), 0.0);
        for text in ["a", "b", "c", "d"] {
            store.add(text, Category::default(), Priority::default());
        }
        store.toggle_done(0);
        store.toggle_done(2);
        assert_eq!(store.done_count(), 2);
        assert_eq!(store.completion_fraction(), 0.5);
    }

    #[test]
    fn subscribers_see_mutations_in_order() {
        let mut store = TaskStore::new();
        let rx = store.subscribe();
        store.add("a", Category::default(), Priority::default());
        store.add("", Category::default(), Priority::default());
        store.toggle_done(0);
        store.toggle_done(9);
        store.remove(0);
        let events: Vec<StoreEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            [StoreEvent::Added(0), StoreEvent::Toggled(0), StoreEvent::Removed(0)]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = TaskStore::new();
        drop(store.subscribe());
        let rx = store.subscribe();
        store.add("a", Category::default(), Priority::default());
        assert_eq!(store.subscribers.len(), 1);
        assert_eq!(rx.try_recv(), Ok(StoreEvent::Added(0)));
    }
}
