//! Line codec for task and user records.
//!
//! A record is one line of fields joined by `", "`. Task fields, in order:
//! assigned user, title, description, due date, creation date, completion
//! marker. User fields: username, credential. Dates use `DD Mon YYYY`.
//!
//! Fields are not escaped. Callers must keep the separator and line breaks
//! out of field values; [`validate_field`] checks that at the input edge.

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::task::{Completion, Task};
use crate::user::User;

/// Field separator within a record
pub const FIELD_SEPARATOR: &str = ", ";

/// chrono format for dates inside records, e.g. `05 Mar 2024`
pub const DATE_FORMAT: &str = "%d %b %Y";

const TASK_FIELDS: usize = 6;
const USER_FIELDS: usize = 2;

/// Why a single line failed to decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid {field} '{value}'")]
    Date { field: &'static str, value: String },

    #[error("invalid completion marker '{0}'")]
    Marker(String),
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn encode_task(task: &Task) -> String {
    let due = format_date(task.due_date);
    let created = format_date(task.created_on);
    [
        task.assigned_to.as_str(),
        task.title.as_str(),
        task.description.as_str(),
        due.as_str(),
        created.as_str(),
        task.completion.marker(),
    ]
    .join(FIELD_SEPARATOR)
}

pub fn decode_task(line: &str) -> std::result::Result<Task, DecodeError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != TASK_FIELDS {
        return Err(DecodeError::FieldCount {
            expected: TASK_FIELDS,
            found: fields.len(),
        });
    }

    let due_date = parse_date(fields[3]).ok_or_else(|| DecodeError::Date {
        field: "due date",
        value: fields[3].to_string(),
    })?;
    let created_on = parse_date(fields[4]).ok_or_else(|| DecodeError::Date {
        field: "creation date",
        value: fields[4].to_string(),
    })?;
    let completion = Completion::from_marker(fields[5])
        .ok_or_else(|| DecodeError::Marker(fields[5].to_string()))?;

    Ok(Task {
        assigned_to: fields[0].to_string(),
        title: fields[1].to_string(),
        description: fields[2].to_string(),
        due_date,
        created_on,
        completion,
    })
}

pub fn encode_user(user: &User) -> String {
    [user.username.as_str(), user.credential.as_str()].join(FIELD_SEPARATOR)
}

pub fn decode_user(line: &str) -> std::result::Result<User, DecodeError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != USER_FIELDS {
        return Err(DecodeError::FieldCount {
            expected: USER_FIELDS,
            found: fields.len(),
        });
    }
    Ok(User {
        username: fields[0].to_string(),
        credential: fields[1].to_string(),
    })
}

/// Reject values that would break the record layout
pub fn validate_field(name: &str, value: &str) -> Result<()> {
    if value.contains(FIELD_SEPARATOR) {
        return Err(Error::InvalidArgument(format!(
            "{name} cannot contain '{FIELD_SEPARATOR}'"
        )));
    }
    if value.contains('\n') || value.contains('\r') {
        return Err(Error::InvalidArgument(format!(
            "{name} cannot contain line breaks"
        )));
    }
    Ok(())
}
