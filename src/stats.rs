//! Task and user statistics.
//!
//! Percentages are computed exactly on integers and held as hundredths of
//! a percent, rounded once with round-half-to-even. The value written to a
//! report therefore reads back to the same number it was computed as.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::report::ReportStore;
use crate::task::{Task, TaskStore};
use crate::user::{UserDirectory, Users};

/// A percentage with two decimal digits, stored as hundredths.
///
/// Two zeros exist: `ZERO` (`0.0`) is a computed zero or the per-user guard;
/// `NO_TOTAL` (`0`) is the guard written when the whole store is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percentage {
    hundredths: u64,
    no_total: bool,
}

impl Percentage {
    pub const ZERO: Percentage = Percentage {
        hundredths: 0,
        no_total: false,
    };

    pub const NO_TOTAL: Percentage = Percentage {
        hundredths: 0,
        no_total: true,
    };

    pub fn from_hundredths(hundredths: u64) -> Self {
        Self {
            hundredths,
            no_total: false,
        }
    }

    /// `round(100 * part / whole, 2)` with ties to even; `ZERO` when `whole` is zero
    pub fn of(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let numerator = part as u128 * 10_000;
        let whole = whole as u128;
        let mut quotient = numerator / whole;
        let twice_remainder = (numerator % whole) * 2;
        if twice_remainder > whole || (twice_remainder == whole && quotient % 2 == 1) {
            quotient += 1;
        }
        Self::from_hundredths(quotient as u64)
    }

    /// Like [`Percentage::of`], but `NO_TOTAL` when `total` is zero
    pub fn of_total(part: usize, total: usize) -> Self {
        if total == 0 {
            return Self::NO_TOTAL;
        }
        Self::of(part, total)
    }

    pub fn hundredths(self) -> u64 {
        self.hundredths
    }

    pub fn as_f64(self) -> f64 {
        self.hundredths as f64 / 100.0
    }
}

/// Shortest form with at least one decimal digit: `30.0`, `12.5`, `33.33`.
/// `NO_TOTAL` prints as `0`.
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.no_total {
            return f.write_str("0");
        }
        let whole = self.hundredths / 100;
        let frac = self.hundredths % 100;
        if frac % 10 == 0 {
            write!(f, "{}.{}", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}", whole, frac)
        }
    }
}

impl FromStr for Percentage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || format!("invalid percentage '{s}'");
        if s == "0" {
            return Ok(Self::NO_TOTAL);
        }
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty()
            || frac.len() > 2
            || !whole.chars().all(|ch| ch.is_ascii_digit())
            || !frac.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        whole
            .checked_mul(100)
            .and_then(|value| value.checked_add(frac))
            .map(Percentage::from_hundredths)
            .ok_or_else(invalid)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TaskOverview {
    pub total: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub overdue: usize,
    pub incomplete_percentage: Percentage,
    pub overdue_percentage: Percentage,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserStats {
    pub username: String,
    pub task_count: usize,
    pub share_percentage: Percentage,
    pub completed_percentage: Percentage,
    pub incomplete_percentage: Percentage,
    pub overdue_percentage: Percentage,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserOverview {
    pub user_count: usize,
    pub total_tasks: usize,
    pub users: Vec<UserStats>,
}

/// Both reports from one generation run
#[derive(Debug, Clone, Serialize)]
pub struct Reports {
    pub task_overview: TaskOverview,
    pub user_overview: UserOverview,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: usize,
    completed: usize,
    incomplete: usize,
    overdue: usize,
}

impl Tally {
    fn count<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: NaiveDateTime) -> Self {
        let mut tally = Tally::default();
        for task in tasks {
            tally.total += 1;
            if task.is_complete() {
                tally.completed += 1;
            } else {
                tally.incomplete += 1;
                if task.is_overdue(now) {
                    tally.overdue += 1;
                }
            }
        }
        tally
    }
}

pub fn compute_task_overview(tasks: &[Task], now: NaiveDateTime) -> TaskOverview {
    let tally = Tally::count(tasks, now);
    TaskOverview {
        total: tally.total,
        completed: tally.completed,
        incomplete: tally.incomplete,
        overdue: tally.overdue,
        incomplete_percentage: Percentage::of_total(tally.incomplete, tally.total),
        overdue_percentage: Percentage::of_total(tally.overdue, tally.total),
    }
}

pub fn compute_user_overview(tasks: &[Task], users: &Users, now: NaiveDateTime) -> UserOverview {
    let total_tasks = tasks.len();
    let users: Vec<UserStats> = users
        .usernames()
        .map(|username| {
            let tally = Tally::count(
                tasks.iter().filter(|task| task.assigned_to == username),
                now,
            );
            UserStats {
                username: username.to_string(),
                task_count: tally.total,
                share_percentage: Percentage::of_total(tally.total, total_tasks),
                completed_percentage: Percentage::of(tally.completed, tally.total),
                incomplete_percentage: Percentage::of(tally.incomplete, tally.total),
                overdue_percentage: Percentage::of(tally.overdue, tally.total),
            }
        })
        .collect();

    UserOverview {
        user_count: users.len(),
        total_tasks,
        users,
    }
}

/// Recompute both reports from the stores and overwrite the report files
pub fn generate(
    tasks: &TaskStore,
    users: &UserDirectory,
    reports: &ReportStore,
    now: NaiveDateTime,
) -> Result<Reports> {
    let all_tasks = tasks.load()?;
    let all_users = users.require()?;

    // Compute both before writing either
    let task_overview = compute_task_overview(&all_tasks, now);
    let user_overview = compute_user_overview(&all_tasks, &all_users, now);
    reports.write_task_overview(&task_overview)?;
    reports.write_user_overview(&user_overview)?;

    tracing::info!(
        tasks = task_overview.total,
        users = user_overview.user_count,
        "reports generated"
    );
    Ok(Reports {
        task_overview,
        user_overview,
    })
}
