//! Line-oriented task file.
//!
//! Each task is one line:
//!
//! ```text
//! "<text>",<0|1>,<category>,<priority>,<unix-epoch-seconds>
//! ```
//!
//! Fields are not escaped. A task text holding a `"` (or a category holding a
//! `,`) does not survive a save/load cycle; such lines are skipped on load.
//! The format is kept as is so existing files stay readable.

use std::fs;
use std::path::Path;

use chrono::DateTime;
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::TaskStore;
use crate::task::{Category, Priority, Task};

pub const MAX_TEXT_BYTES: usize = 255;
pub const MAX_FIELD_BYTES: usize = 63;

pub fn serialize(store: &TaskStore) -> String {
    let mut out = String::new();
    for task in store {
        out.push_str(&format!(
            "\"{}\",{},{},{},{}\n",
            task.text,
            u8::from(task.done),
            task.category,
            task.priority,
            task.due.timestamp()
        ));
    }
    out
}

/// Builds a store from file contents, skipping every line that does not parse.
pub fn deserialize(contents: &str) -> TaskStore {
    let mut store = TaskStore::new();
    for (lineno, line) in contents.lines().enumerate() {
        match parse_line(line) {
            Some(task) => store.push(task),
            None => debug!(line = lineno + 1, "skipping malformed task line"),
        }
    }
    store
}

pub fn parse_line(line: &str) -> Option<Task> {
    let rest = line.strip_prefix('"')?;
    let end = rest.find('"')?;
    let text = &rest[..end];
    if text.is_empty() || text.len() > MAX_TEXT_BYTES {
        return None;
    }
    let rest = rest[end + 1..].strip_prefix(',')?;

    let (done, rest) = scan_int(rest)?;
    let rest = rest.strip_prefix(',')?;
    let (category, rest) = scan_field(rest)?;
    let rest = rest.strip_prefix(',')?;
    let (priority, rest) = scan_field(rest)?;
    let rest = rest.strip_prefix(',')?;
    // Trailing bytes after the timestamp are ignored.
    let (due, _) = scan_int(rest)?;
    let due = DateTime::from_timestamp(due, 0)?;

    Some(Task {
        text: text.to_string(),
        done: done != 0,
        category: Category::new(category),
        priority: Priority::parse(priority),
        due,
    })
}

/// Reads the task file. A missing or unreadable file gives an empty store.
pub fn load(path: &Path) -> TaskStore {
    if !path.exists() {
        debug!(path = %path.display(), "no task file yet");
        return TaskStore::new();
    }
    match fs::read_to_string(path) {
        Ok(data) => {
            let store = deserialize(&data);
            debug!(path = %path.display(), tasks = store.len(), "tasks loaded");
            store
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read task file");
            TaskStore::new()
        }
    }
}

pub fn save(path: &Path, store: &TaskStore) -> Result<()> {
    fs::write(path, serialize(store))?;
    debug!(path = %path.display(), tasks = store.len(), "tasks saved");
    Ok(())
}

/// Non-empty run of bytes up to the next comma.
fn scan_field(input: &str) -> Option<(&str, &str)> {
    let end = input.find(',').unwrap_or(input.len());
    if end == 0 || end > MAX_FIELD_BYTES {
        return None;
    }
    Some((&input[..end], &input[end..]))
}

/// Leading whitespace, an optional sign, then at least one digit.
fn scan_int(input: &str) -> Option<(i64, &str)> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    let value = trimmed[..end].parse().ok()?;
    Some((value, &trimmed[end..]))
}
