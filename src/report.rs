//! Persisted overview reports and their display form.
//!
//! Task overview file, one value per line: total, completed, incomplete,
//! overdue, incomplete percentage, overdue percentage.
//!
//! User overview file: user count, total tasks, then one line per user:
//! `username, tasks, share%, completed%, incomplete%, overdue%`.

use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::output::HumanOutput;
use crate::record::FIELD_SEPARATOR;
use crate::stats::{Percentage, TaskOverview, UserOverview, UserStats};
use crate::storage::Storage;

const TASK_OVERVIEW_LINES: usize = 6;
const USER_STATS_FIELDS: usize = 6;

#[derive(Debug, Clone)]
pub struct ReportStore {
    storage: Storage,
}

impl ReportStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn write_task_overview(&self, overview: &TaskOverview) -> Result<()> {
        let lines = vec![
            overview.total.to_string(),
            overview.completed.to_string(),
            overview.incomplete.to_string(),
            overview.overdue.to_string(),
            overview.incomplete_percentage.to_string(),
            overview.overdue_percentage.to_string(),
        ];
        self.storage
            .write_lines(&self.storage.task_overview_file(), &lines)
    }

    pub fn write_user_overview(&self, overview: &UserOverview) -> Result<()> {
        let mut lines = Vec::with_capacity(overview.users.len() + 2);
        lines.push(overview.user_count.to_string());
        lines.push(overview.total_tasks.to_string());
        for user in &overview.users {
            lines.push(
                [
                    user.username.clone(),
                    user.task_count.to_string(),
                    user.share_percentage.to_string(),
                    user.completed_percentage.to_string(),
                    user.incomplete_percentage.to_string(),
                    user.overdue_percentage.to_string(),
                ]
                .join(FIELD_SEPARATOR),
            );
        }
        self.storage
            .write_lines(&self.storage.user_overview_file(), &lines)
    }

    pub fn read_task_overview(&self) -> Result<TaskOverview> {
        let path = self.storage.task_overview_file();
        let lines = self.read_report(&path)?;
        if lines.len() != TASK_OVERVIEW_LINES {
            return Err(Error::malformed(
                &path,
                lines.len().min(TASK_OVERVIEW_LINES) + 1,
                format!("expected {TASK_OVERVIEW_LINES} lines, found {}", lines.len()),
            ));
        }

        Ok(TaskOverview {
            total: parse_at(&path, &lines, 0)?,
            completed: parse_at(&path, &lines, 1)?,
            incomplete: parse_at(&path, &lines, 2)?,
            overdue: parse_at(&path, &lines, 3)?,
            incomplete_percentage: parse_at(&path, &lines, 4)?,
            overdue_percentage: parse_at(&path, &lines, 5)?,
        })
    }

    pub fn read_user_overview(&self) -> Result<UserOverview> {
        let path = self.storage.user_overview_file();
        let lines = self.read_report(&path)?;
        if lines.len() < 2 {
            return Err(Error::malformed(
                &path,
                lines.len() + 1,
                "missing user count or total tasks",
            ));
        }

        let user_count: usize = parse_at(&path, &lines, 0)?;
        let total_tasks = parse_at(&path, &lines, 1)?;
        let mut users = Vec::with_capacity(lines.len() - 2);
        for (idx, line) in lines.iter().enumerate().skip(2) {
            let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            if fields.len() != USER_STATS_FIELDS {
                return Err(Error::malformed(
                    &path,
                    idx + 1,
                    format!(
                        "expected {USER_STATS_FIELDS} fields, found {}",
                        fields.len()
                    ),
                ));
            }
            users.push(UserStats {
                username: fields[0].to_string(),
                task_count: parse_field(&path, idx, fields[1])?,
                share_percentage: parse_field(&path, idx, fields[2])?,
                completed_percentage: parse_field(&path, idx, fields[3])?,
                incomplete_percentage: parse_field(&path, idx, fields[4])?,
                overdue_percentage: parse_field(&path, idx, fields[5])?,
            });
        }

        if users.len() != user_count {
            return Err(Error::malformed(
                &path,
                lines.len() + 1,
                format!("expected {user_count} user line(s), found {}", users.len()),
            ));
        }

        Ok(UserOverview {
            user_count,
            total_tasks,
            users,
        })
    }

    fn read_report(&self, path: &Path) -> Result<Vec<String>> {
        let lines = self
            .storage
            .read_lines(path)?
            .ok_or_else(|| Error::ReportNotFound(path.to_path_buf()))?;
        Ok(lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect())
    }
}

fn parse_at<T: FromStr>(path: &Path, lines: &[String], idx: usize) -> Result<T> {
    parse_field(path, idx, &lines[idx])
}

fn parse_field<T: FromStr>(path: &Path, idx: usize, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::malformed(path, idx + 1, format!("invalid value '{value}'")))
}

pub fn render_task_overview(overview: &TaskOverview) -> HumanOutput {
    let mut human = HumanOutput::new("Task overview");
    human.push_summary("Total tasks", overview.total.to_string());
    human.push_summary("Tasks completed", overview.completed.to_string());
    human.push_summary("Tasks incomplete", overview.incomplete.to_string());
    human.push_summary("Overdue tasks", overview.overdue.to_string());
    human.push_summary(
        "Percentage incomplete",
        percent(overview.incomplete_percentage),
    );
    human.push_summary("Percentage overdue", percent(overview.overdue_percentage));
    human
}

pub fn render_user_overview(overview: &UserOverview) -> HumanOutput {
    let mut human = HumanOutput::new("Users overview");
    human.push_summary("Total users", overview.user_count.to_string());
    human.push_summary("Total tasks", overview.total_tasks.to_string());
    for user in &overview.users {
        human.push_detail(format!(
            "{}: {} task(s), {} of all tasks, {} completed, {} incomplete, {} overdue",
            user.username,
            user.task_count,
            percent(user.share_percentage),
            percent(user.completed_percentage),
            percent(user.incomplete_percentage),
            percent(user.overdue_percentage),
        ));
    }
    if overview.users.is_empty() {
        human.push_warning("no registered users");
    }
    human
}

fn percent(value: Percentage) -> String {
    format!("{value}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn setup_reports() -> (tempfile::TempDir, ReportStore) {
        let dir = tempdir().expect("tempdir");
        let reports = ReportStore::new(Storage::for_dir(dir.path().to_path_buf()));
        (dir, reports)
    }

    fn sample_user_overview() -> UserOverview {
        UserOverview {
            user_count: 2,
            total_tasks: 3,
            users: vec![
                UserStats {
                    username: "admin".to_string(),
                    task_count: 0,
                    share_percentage: Percentage::ZERO,
                    completed_percentage: Percentage::ZERO,
                    incomplete_percentage: Percentage::ZERO,
                    overdue_percentage: Percentage::ZERO,
                },
                UserStats {
                    username: "bob".to_string(),
                    task_count: 3,
                    share_percentage: Percentage::of(3, 3),
                    completed_percentage: Percentage::of(1, 3),
                    incomplete_percentage: Percentage::of(2, 3),
                    overdue_percentage: Percentage::of(1, 3),
                },
            ],
        }
    }

    #[test]
    fn missing_reports_are_not_found() {
        let (_dir, reports) = setup_reports();
        assert!(matches!(
            reports.read_task_overview(),
            Err(Error::ReportNotFound(_))
        ));
        assert!(matches!(
            reports.read_user_overview(),
            Err(Error::ReportNotFound(_))
        ));
    }

    #[test]
    fn zero_report_is_a_valid_report() {
        let (_dir, reports) = setup_reports();
        reports
            .write_task_overview(&TaskOverview::default())
            .expect("write");
        assert_eq!(
            reports.read_task_overview().expect("read"),
            TaskOverview::default()
        );
    }

    #[test]
    fn task_overview_file_layout() {
        let (_dir, reports) = setup_reports();
        let overview = TaskOverview {
            total: 10,
            completed: 7,
            incomplete: 3,
            overdue: 1,
            incomplete_percentage: Percentage::of(3, 10),
            overdue_percentage: Percentage::of(1, 10),
        };
        reports.write_task_overview(&overview).expect("write");

        let content =
            fs::read_to_string(reports.storage().task_overview_file()).expect("read");
        assert_eq!(content, "10\n7\n3\n1\n30.0\n10.0");
        assert_eq!(reports.read_task_overview().expect("read"), overview);
    }

    #[test]
    fn user_overview_file_layout() {
        let (_dir, reports) = setup_reports();
        let overview = sample_user_overview();
        reports.write_user_overview(&overview).expect("write");

        let content =
            fs::read_to_string(reports.storage().user_overview_file()).expect("read");
        assert_eq!(
            content,
            "2\n3\nadmin, 0, 0.0, 0.0, 0.0, 0.0\nbob, 3, 100.0, 33.33, 66.67, 33.33"
        );
        assert_eq!(reports.read_user_overview().expect("read"), overview);
    }

    #[test]
    fn reads_integer_zero_percentages() {
        let (_dir, reports) = setup_reports();
        fs::write(
            reports.storage().task_overview_file(),
            "0\n0\n0\n0\n0\n0",
        )
        .expect("write");
        let overview = reports.read_task_overview().expect("read");
        assert_eq!(overview.total, 0);
        assert_eq!(overview.incomplete_percentage, Percentage::NO_TOTAL);
        assert_eq!(overview.overdue_percentage, Percentage::NO_TOTAL);
    }

    #[test]
    fn empty_store_guard_is_written_as_integer() {
        let (_dir, reports) = setup_reports();
        let overview = crate::stats::compute_task_overview(&[], chrono::NaiveDateTime::MIN);
        reports.write_task_overview(&overview).expect("write");

        let content =
            fs::read_to_string(reports.storage().task_overview_file()).expect("read");
        assert_eq!(content, "0\n0\n0\n0\n0\n0");
        assert_eq!(reports.read_task_overview().expect("read"), overview);
    }

    #[test]
    fn user_count_must_match_user_lines() {
        let (_dir, reports) = setup_reports();
        fs::write(
            reports.storage().user_overview_file(),
            "2\n3\nbob, 3, 100.0, 33.33, 66.67, 33.33",
        )
        .expect("write");
        assert!(matches!(
            reports.read_user_overview(),
            Err(Error::MalformedRecord { line: 4, .. })
        ));
    }

    #[test]
    fn truncated_report_is_malformed() {
        let (_dir, reports) = setup_reports();
        fs::write(reports.storage().task_overview_file(), "3\n1\n2").expect("write");
        assert!(matches!(
            reports.read_task_overview(),
            Err(Error::MalformedRecord { line: 4, .. })
        ));

        fs::write(reports.storage().user_overview_file(), "1\n2\nbob, 2, 100.0").expect("write");
        assert!(matches!(
            reports.read_user_overview(),
            Err(Error::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn rendering_lists_each_user() {
        let human = render_user_overview(&sample_user_overview());
        let text = crate::output::format_human(&human);
        assert!(text.contains("Total users: 2"));
        assert!(text.contains("bob: 3 task(s), 100.0% of all tasks, 33.33% completed"));
    }
}
