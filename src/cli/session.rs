//! Authenticated access to a data directory.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record;
use crate::report::ReportStore;
use crate::storage::Storage;
use crate::task::TaskStore;
use crate::user::UserDirectory;

/// Global flags that identify the data directory and the caller
#[derive(Debug, Clone, Default)]
pub struct Access {
    pub dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Resolve the data directory, defaulting to the current directory
pub(crate) fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(path) => Ok(path),
        None => Ok(std::env::current_dir()?),
    }
}

/// A logged-in user plus the stores of its data directory
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub storage: Storage,
    pub username: String,
}

impl Session {
    /// Load config and authenticate against the user store
    pub fn open(access: Access) -> Result<Self> {
        let root = resolve_dir(access.dir)?;
        let config = Config::load_from_dir(&root);
        let storage = Storage::new(root, config.files.clone());

        let username = access.user.ok_or_else(|| {
            Error::InvalidArgument("--user is required (or set TASKTRACK_USER)".to_string())
        })?;
        let password = access.password.ok_or_else(|| {
            Error::InvalidArgument("--password is required (or set TASKTRACK_PASSWORD)".to_string())
        })?;

        UserDirectory::new(storage.clone()).authenticate(&username, &password)?;
        tracing::debug!(username = %username, root = %storage.root().display(), "session opened");

        Ok(Self {
            config,
            storage,
            username,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.username == self.config.admin_user
    }

    pub fn role(&self) -> &'static str {
        if self.is_admin() {
            "admin"
        } else {
            "user"
        }
    }

    /// Fail with `PermissionDenied` unless the caller is the admin account
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }
        tracing::warn!(username = %self.username, action, "admin command refused");
        Err(Error::PermissionDenied(format!(
            "only {} can {action}",
            self.config.admin_user
        )))
    }

    pub fn tasks(&self) -> TaskStore {
        TaskStore::new(self.storage.clone())
    }

    pub fn users(&self) -> UserDirectory {
        UserDirectory::new(self.storage.clone())
    }

    pub fn reports(&self) -> ReportStore {
        ReportStore::new(self.storage.clone())
    }

    /// Parse a due date typed on the command line
    pub fn parse_due(&self, raw: &str) -> Result<NaiveDate> {
        parse_input_date(raw.trim(), &self.config.date_input_format)
    }
}

pub(crate) fn parse_input_date(raw: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, format)
        .or_else(|_| NaiveDate::parse_from_str(raw, record::DATE_FORMAT))
        .map_err(|_| {
            Error::InvalidArgument(format!(
                "invalid date '{raw}', expected format {format}"
            ))
        })
}
