//! tasktrack task command implementations
//!
//! `complete` and `edit` address the caller's own tasks by their position in
//! `task list --mine`; `delete` addresses the whole store by position.

use chrono::{Local, NaiveDateTime};

use crate::cli::{Access, Session};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::record;
use crate::task::{IndexedTask, Task};

pub struct AddOptions {
    pub assign: String,
    pub title: String,
    pub description: String,
    pub due: String,
    pub access: Access,
    pub output: OutputOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListScope {
    All,
    Mine,
    Completed,
}

pub struct ListOptions {
    pub scope: ListScope,
    pub access: Access,
    pub output: OutputOptions,
}

pub struct CompleteOptions {
    pub number: usize,
    pub access: Access,
    pub output: OutputOptions,
}

pub struct EditOptions {
    pub number: usize,
    pub assign: Option<String>,
    pub due: Option<String>,
    pub access: Access,
    pub output: OutputOptions,
}

pub struct DeleteOptions {
    pub index: usize,
    pub access: Access,
    pub output: OutputOptions,
}

/// A task as shown to the caller
#[derive(serde::Serialize)]
struct TaskView {
    /// Position the caller uses to address the task
    position: usize,
    /// Position in the task store
    store_index: usize,
    overdue: bool,
    #[serde(flatten)]
    task: Task,
}

#[derive(serde::Serialize)]
struct TaskListReport {
    scope: ListScope,
    tasks: Vec<TaskView>,
}

#[derive(serde::Serialize)]
struct TaskChangeReport {
    action: &'static str,
    #[serde(flatten)]
    view: TaskView,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let session = Session::open(options.access)?;

    let assign = options.assign.trim();
    record::validate_field("assigned user", assign)?;
    record::validate_field("title", &options.title)?;
    record::validate_field("description", &options.description)?;
    if options.title.trim().is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    if !session.users().exists(assign)? {
        return Err(Error::UnknownUser(assign.to_string()));
    }
    let due_date = session.parse_due(&options.due)?;

    let task = Task::new(
        assign,
        options.title.trim(),
        options.description.trim(),
        due_date,
        Local::now().date_naive(),
    );
    let tasks = session.tasks();
    tasks.append(&task)?;
    let store_index = tasks.load()?.len().saturating_sub(1);

    let view = view(store_index, IndexedTask { index: store_index, task }, now());
    let human = render_change("Added task", &view);
    emit_success(
        options.output,
        "task add",
        &TaskChangeReport {
            action: "added",
            view,
        },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let session = Session::open(options.access)?;
    let tasks = session.tasks();
    let now = now();

    let entries = match options.scope {
        ListScope::All => tasks.list()?,
        ListScope::Mine => tasks.assigned_to(&session.username)?,
        ListScope::Completed => {
            session.require_admin("view completed tasks")?;
            tasks.completed()?
        }
    };

    let views: Vec<TaskView> = entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| match options.scope {
            ListScope::Mine => view(position, entry, now),
            _ => view(entry.index, entry, now),
        })
        .collect();

    let header = match options.scope {
        ListScope::All => format!("{} task(s)", views.len()),
        ListScope::Mine => format!("{} task(s) assigned to {}", views.len(), session.username),
        ListScope::Completed => format!("{} completed task(s)", views.len()),
    };
    let mut human = HumanOutput::new(header);
    for item in &views {
        human.push_detail(describe(item));
    }
    let overdue = views.iter().filter(|item| item.overdue).count();
    if overdue > 0 {
        human.push_warning(format!("{overdue} task(s) overdue"));
    }

    emit_success(
        options.output,
        "task list",
        &TaskListReport {
            scope: options.scope,
            tasks: views,
        },
        Some(&human),
    )
}

pub fn run_complete(options: CompleteOptions) -> Result<()> {
    let session = Session::open(options.access)?;
    let tasks = session.tasks();
    let entry = own_task(&session, options.number)?;

    let was_complete = entry.task.is_complete();
    let updated = tasks.update_at(entry.index, |task| {
        task.mark_complete();
        Ok(())
    })?;

    let view = view(
        options.number,
        IndexedTask {
            index: entry.index,
            task: updated,
        },
        now(),
    );
    let header = if was_complete {
        "Task already complete"
    } else {
        "Completed task"
    };
    let human = render_change(header, &view);
    emit_success(
        options.output,
        "task complete",
        &TaskChangeReport {
            action: "completed",
            view,
        },
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let session = Session::open(options.access)?;
    let tasks = session.tasks();
    let entry = own_task(&session, options.number)?;

    let assign = match options.assign.as_deref().map(str::trim) {
        Some(name) => {
            record::validate_field("assigned user", name)?;
            if !session.users().exists(name)? {
                return Err(Error::UnknownUser(name.to_string()));
            }
            Some(name.to_string())
        }
        None => None,
    };
    let due = options
        .due
        .as_deref()
        .map(|raw| session.parse_due(raw))
        .transpose()?;

    let updated = tasks.update_at(entry.index, |task| {
        if let Some(name) = assign {
            task.reassign(name)?;
        }
        if let Some(date) = due {
            task.reschedule(date)?;
        }
        Ok(())
    })?;

    let view = view(
        options.number,
        IndexedTask {
            index: entry.index,
            task: updated,
        },
        now(),
    );
    let human = render_change("Edited task", &view);
    emit_success(
        options.output,
        "task edit",
        &TaskChangeReport {
            action: "edited",
            view,
        },
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let session = Session::open(options.access)?;
    session.require_admin("delete tasks")?;

    let removed = session.tasks().delete_at(options.index)?;
    let view = view(
        options.index,
        IndexedTask {
            index: options.index,
            task: removed,
        },
        now(),
    );
    let mut human = render_change("Deleted task", &view);
    human.push_warning("positions after the deleted task shift down by one");
    emit_success(
        options.output,
        "task delete",
        &TaskChangeReport {
            action: "deleted",
            view,
        },
        Some(&human),
    )
}

/// The caller's `number`-th task, with its store position
fn own_task(session: &Session, number: usize) -> Result<IndexedTask> {
    let mut mine = session.tasks().assigned_to(&session.username)?;
    let len = mine.len();
    if number >= len {
        return Err(Error::IndexOutOfRange { index: number, len });
    }
    Ok(mine.swap_remove(number))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn view(position: usize, entry: IndexedTask, now: NaiveDateTime) -> TaskView {
    TaskView {
        position,
        store_index: entry.index,
        overdue: entry.task.is_overdue(now),
        task: entry.task,
    }
}

fn describe(item: &TaskView) -> String {
    let task = &item.task;
    let mut line = format!(
        "[{}] {} ({}) due {}, created {}, complete: {}",
        item.position,
        task.title,
        task.assigned_to,
        record::format_date(task.due_date),
        record::format_date(task.created_on),
        task.completion.marker(),
    );
    if item.overdue {
        line.push_str(" [overdue]");
    }
    if !task.description.is_empty() {
        line.push_str(&format!(": {}", task.description));
    }
    line
}

fn render_change(header: &str, item: &TaskView) -> HumanOutput {
    let mut human = HumanOutput::new(format!("{header}: {}", item.task.title));
    human.push_summary("assigned to", item.task.assigned_to.clone());
    human.push_summary("due", record::format_date(item.task.due_date));
    human.push_summary("complete", item.task.completion.marker());
    human.push_summary("position", item.position.to_string());
    human
}
