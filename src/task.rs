//! Task model and the flat-file task store.
//!
//! Tasks live one per line in `tasks.txt`. Appends extend the file in
//! place; every other mutation loads the full collection, transforms it in
//! memory and rewrites the file atomically. Records carry no identifier, so
//! positions from [`TaskStore::load`] are the only addressing scheme.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::record;
use crate::storage::Storage;

/// Completion state, stored as the `Yes`/`No` marker
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Complete,
    Incomplete,
}

impl Completion {
    pub const COMPLETE_MARKER: &'static str = "Yes";
    pub const INCOMPLETE_MARKER: &'static str = "No";

    pub fn marker(self) -> &'static str {
        match self {
            Completion::Complete => Self::COMPLETE_MARKER,
            Completion::Incomplete => Self::INCOMPLETE_MARKER,
        }
    }

    pub fn from_marker(value: &str) -> Option<Self> {
        match value {
            Self::COMPLETE_MARKER => Some(Completion::Complete),
            Self::INCOMPLETE_MARKER => Some(Completion::Incomplete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Task {
    pub assigned_to: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub created_on: NaiveDate,
    pub completion: Completion,
}

impl Task {
    /// New incomplete task created on `created_on`
    pub fn new(
        assigned_to: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            assigned_to: assigned_to.into(),
            title: title.into(),
            description: description.into(),
            due_date,
            created_on,
            completion: Completion::Incomplete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Complete
    }

    /// Incomplete and due strictly before `now`.
    ///
    /// A due date counts from the start of its day, so a task due today is
    /// overdue as soon as the day begins.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.is_complete() && self.due_date.and_time(NaiveTime::MIN) < now
    }

    pub fn mark_complete(&mut self) {
        self.completion = Completion::Complete;
    }

    pub fn reassign(&mut self, username: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.assigned_to = username.into();
        Ok(())
    }

    pub fn reschedule(&mut self, due_date: NaiveDate) -> Result<()> {
        self.ensure_editable()?;
        self.due_date = due_date;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_complete() {
            return Err(Error::TaskCompleted(self.title.clone()));
        }
        Ok(())
    }
}

/// A task together with its position in the store
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexedTask {
    pub index: usize,
    #[serde(flatten)]
    pub task: Task,
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
}

impl TaskStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Decode every stored task, in file order.
    ///
    /// A missing file is an empty store. One malformed line fails the whole
    /// load; blank lines are skipped.
    pub fn load(&self) -> Result<Vec<Task>> {
        let path = self.storage.tasks_file();
        let lines = match self.storage.read_lines(&path)? {
            Some(lines) => lines,
            None => return Ok(Vec::new()),
        };

        let mut tasks = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let task = record::decode_task(line)
                .map_err(|err| Error::malformed(&path, idx + 1, err.to_string()))?;
            tasks.push(task);
        }
        tracing::debug!(count = tasks.len(), path = %path.display(), "loaded tasks");
        Ok(tasks)
    }

    /// Add one task after all existing ones
    pub fn append(&self, task: &Task) -> Result<()> {
        let path = self.storage.tasks_file();
        self.storage.append_line(&path, &record::encode_task(task))?;
        tracing::info!(title = %task.title, assigned_to = %task.assigned_to, "task appended");
        Ok(())
    }

    /// Rewrite the store so it holds exactly `tasks`, in order
    pub fn replace_all(&self, tasks: &[Task]) -> Result<()> {
        let path = self.storage.tasks_file();
        let lines: Vec<String> = tasks.iter().map(record::encode_task).collect();
        self.storage.write_lines(&path, &lines)?;
        tracing::debug!(count = tasks.len(), "task store rewritten");
        Ok(())
    }

    /// Remove the task at `index` and return it
    pub fn delete_at(&self, index: usize) -> Result<Task> {
        let mut tasks = self.load()?;
        if index >= tasks.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: tasks.len(),
            });
        }
        let removed = tasks.remove(index);
        self.replace_all(&tasks)?;
        tracing::info!(index, title = %removed.title, "task deleted");
        Ok(removed)
    }

    /// Apply `edit` to the task at `index` and persist the result
    pub fn update_at<F>(&self, index: usize, edit: F) -> Result<Task>
    where
        F: FnOnce(&mut Task) -> Result<()>,
    {
        let mut tasks = self.load()?;
        let len = tasks.len();
        let task = tasks
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        edit(task)?;
        let updated = task.clone();
        self.replace_all(&tasks)?;
        tracing::info!(index, title = %updated.title, "task updated");
        Ok(updated)
    }

    /// Replace every stored task whose title matches an edited task.
    ///
    /// Titles are not unique: all tasks sharing a title receive the same
    /// edited value. Returns how many stored tasks were replaced.
    pub fn apply_edits(&self, edited: &[Task]) -> Result<usize> {
        let mut tasks = self.load()?;
        let mut replaced = 0;
        for task in tasks.iter_mut() {
            // Last edit wins when several edited tasks share a title
            if let Some(edit) = edited.iter().rev().find(|edit| edit.title == task.title) {
                *task = edit.clone();
                replaced += 1;
            }
        }
        self.replace_all(&tasks)?;
        tracing::info!(replaced, "edits applied by title");
        Ok(replaced)
    }

    /// Tasks assigned to `username`, with their store positions
    pub fn assigned_to(&self, username: &str) -> Result<Vec<IndexedTask>> {
        Ok(indexed(self.load()?)
            .filter(|entry| entry.task.assigned_to == username)
            .collect())
    }

    /// Completed tasks, with their store positions
    pub fn completed(&self) -> Result<Vec<IndexedTask>> {
        Ok(indexed(self.load()?)
            .filter(|entry| entry.task.is_complete())
            .collect())
    }

    /// Every task, with its store position
    pub fn list(&self) -> Result<Vec<IndexedTask>> {
        Ok(indexed(self.load()?).collect())
    }
}

fn indexed(tasks: Vec<Task>) -> impl Iterator<Item = IndexedTask> {
    tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| IndexedTask { index, task })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn task(user: &str, title: &str) -> Task {
        Task::new(user, title, "details", date(2030, 1, 15), date(2024, 1, 1))
    }

    fn setup_store() -> (tempfile::TempDir, TaskStore) {
        let dir = tempdir().expect("tempdir");
        let store = TaskStore::new(Storage::for_dir(dir.path().to_path_buf()));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = setup_store();
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn append_then_load() {
        let (_dir, store) = setup_store();
        let first = task("bob", "One");
        store.append(&first).expect("append");
        assert_eq!(store.load().expect("load"), vec![first.clone()]);

        let second = task("amy", "Two");
        store.append(&second).expect("append");
        assert_eq!(store.load().expect("load"), vec![first, second]);
    }

    #[test]
    fn malformed_line_fails_whole_load() {
        let (_dir, store) = setup_store();
        store.append(&task("bob", "One")).expect("append");
        let path = store.storage().tasks_file();
        let mut content = fs::read_to_string(&path).expect("read");
        content.push_str("\nbob, broken");
        fs::write(&path, content).expect("write");

        let err = store.load().expect_err("malformed");
        match err {
            Error::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (_dir, store) = setup_store();
        let path = store.storage().tasks_file();
        let line = record::encode_task(&task("bob", "One"));
        fs::write(&path, format!("{line}\n\n")).expect("write");

        assert_eq!(store.load().expect("load").len(), 1);
    }

    #[test]
    fn delete_preserves_relative_order() {
        let (_dir, store) = setup_store();
        let tasks: Vec<Task> = ["A", "B", "C", "D"]
            .iter()
            .map(|title| task("bob", title))
            .collect();
        store.replace_all(&tasks).expect("replace");

        let removed = store.delete_at(1).expect("delete");
        assert_eq!(removed.title, "B");

        let titles: Vec<String> = store
            .load()
            .expect("load")
            .into_iter()
            .map(|task| task.title)
            .collect();
        assert_eq!(titles, vec!["A", "C", "D"]);
    }

    #[test]
    fn delete_out_of_range_leaves_store_unchanged() {
        let (_dir, store) = setup_store();
        store
            .replace_all(&[task("bob", "A"), task("amy", "B")])
            .expect("replace");
        let path = store.storage().tasks_file();
        let before = fs::read_to_string(&path).expect("read");

        let err = store.delete_at(2).expect_err("out of range");
        assert!(matches!(err, Error::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(fs::read_to_string(&path).expect("read"), before);
    }

    #[test]
    fn replace_all_leaves_no_trailing_separator() {
        let (_dir, store) = setup_store();
        store
            .replace_all(&[task("bob", "A"), task("amy", "B")])
            .expect("replace");
        let content = fs::read_to_string(store.storage().tasks_file()).expect("read");
        assert!(!content.ends_with('\n'));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn apply_edits_replaces_by_title() {
        let (_dir, store) = setup_store();
        store
            .replace_all(&[task("bob", "Shared"), task("amy", "Other"), task("cat", "Shared")])
            .expect("replace");

        let mut edited = task("bob", "Shared");
        edited.mark_complete();
        let replaced = store.apply_edits(&[edited.clone()]).expect("apply");
        assert_eq!(replaced, 2);

        let tasks = store.load().expect("load");
        assert_eq!(tasks[0], edited);
        assert_eq!(tasks[1], task("amy", "Other"));
        // Duplicate titles are both overwritten with the edited value
        assert_eq!(tasks[2], edited);
    }

    #[test]
    fn update_at_rejects_completed_task_edits() {
        let (_dir, store) = setup_store();
        let mut done = task("bob", "Done");
        done.mark_complete();
        store.replace_all(&[done]).expect("replace");

        let err = store
            .update_at(0, |task| task.reassign("amy"))
            .expect_err("completed");
        assert!(matches!(err, Error::TaskCompleted(_)));
        assert_eq!(store.load().expect("load")[0].assigned_to, "bob");
    }

    #[test]
    fn update_at_persists_edit() {
        let (_dir, store) = setup_store();
        store
            .replace_all(&[task("bob", "A"), task("bob", "B")])
            .expect("replace");

        let updated = store
            .update_at(1, |task| task.reschedule(date(2031, 6, 1)))
            .expect("update");
        assert_eq!(updated.due_date, date(2031, 6, 1));
        assert_eq!(store.load().expect("load")[1].due_date, date(2031, 6, 1));

        let err = store.update_at(5, |_| Ok(())).expect_err("range");
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn assigned_to_keeps_store_positions() {
        let (_dir, store) = setup_store();
        store
            .replace_all(&[task("bob", "A"), task("amy", "B"), task("bob", "C")])
            .expect("replace");

        let mine = store.assigned_to("bob").expect("mine");
        let indexes: Vec<usize> = mine.iter().map(|entry| entry.index).collect();
        assert_eq!(indexes, vec![0, 2]);
    }

    #[test]
    fn overdue_requires_incomplete_and_past_due() {
        let now = date(2024, 6, 1).and_hms_opt(9, 0, 0).expect("time");
        let mut past = Task::new("bob", "Old", "d", date(2024, 5, 31), date(2024, 1, 1));
        assert!(past.is_overdue(now));
        past.mark_complete();
        assert!(!past.is_overdue(now));

        let today = Task::new("bob", "Today", "d", date(2024, 6, 1), date(2024, 1, 1));
        assert!(today.is_overdue(now));

        let future = Task::new("bob", "Later", "d", date(2024, 6, 2), date(2024, 1, 1));
        assert!(!future.is_overdue(now));
    }
}
