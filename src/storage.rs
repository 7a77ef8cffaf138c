//! Storage layer for tasktrack
//!
//! All state lives as flat text files in a single data directory:
//!
//! ```text
//! <data dir>/
//!   .tasktrack.toml       # Optional configuration
//!   tasks.txt             # One task record per line
//!   user.txt              # One user record per line
//!   task_overview.txt     # Derived task overview report
//!   user_overview.txt     # Derived user overview report
//! ```
//!
//! Records are separated by `\n` with no trailing separator. Appends add a
//! separator only when the file already has content; full rewrites go
//! through a temp file in the same directory followed by a rename.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{FilesConfig, CONFIG_FILE};
use crate::error::{Error, Result};

/// Record separator used by every backing store
pub const RECORD_SEPARATOR: &str = "\n";

/// Storage manager for tasktrack state
#[derive(Debug, Clone)]
pub struct Storage {
    /// Data directory holding every backing store
    root: PathBuf,
    /// Backing store file names
    files: FilesConfig,
}

impl Storage {
    /// Create a storage manager rooted at `root` using the given file names
    pub fn new(root: PathBuf, files: FilesConfig) -> Self {
        Self { root, files }
    }

    /// Create storage with the default file names
    pub fn for_dir(root: PathBuf) -> Self {
        Self::new(root, FilesConfig::default())
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Path to the task records
    pub fn tasks_file(&self) -> PathBuf {
        self.root.join(&self.files.tasks)
    }

    /// Path to the user records
    pub fn users_file(&self) -> PathBuf {
        self.root.join(&self.files.users)
    }

    /// Path to the task overview report
    pub fn task_overview_file(&self) -> PathBuf {
        self.root.join(&self.files.task_overview)
    }

    /// Path to the user overview report
    pub fn user_overview_file(&self) -> PathBuf {
        self.root.join(&self.files.user_overview)
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create the data directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|err| Error::unavailable(&self.root, err))
    }

    /// Check if the data directory exists
    pub fn is_initialized(&self) -> bool {
        self.root.is_dir()
    }

    // =========================================================================
    // Line-oriented file I/O
    // =========================================================================

    /// Read every line of a store, or `None` if the file does not exist.
    ///
    /// Lines are returned as written, blank ones included, so callers can
    /// report 1-based line numbers.
    pub fn read_lines(&self, path: &Path) -> Result<Option<Vec<String>>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(
                content
                    .split(RECORD_SEPARATOR)
                    .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                    .collect(),
            )),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::unavailable(path, err)),
        }
    }

    /// Append one record to the end of a store, creating it if needed
    ///
    /// Not atomic: an interrupted append can leave a partial last line.
    pub fn append_line(&self, path: &Path, line: &str) -> Result<()> {
        self.append_line_inner(path, line)
            .map_err(|err| Error::unavailable(path, err))
    }

    fn append_line_inner(&self, path: &Path, line: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut buffer = String::new();
        if file.metadata()?.len() > 0 {
            buffer.push_str(RECORD_SEPARATOR);
        }
        buffer.push_str(line);
        file.write_all(buffer.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Replace a store with exactly `lines`, atomically
    pub fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        self.write_atomic(path, lines.join(RECORD_SEPARATOR).as_bytes())
    }

    /// Write data atomically using temp file + rename
    ///
    /// The file is either fully replaced or left as it was.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        write_atomic_inner(path, data).map_err(|err| Error::unavailable(path, err))
    }
}

fn write_atomic_inner(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    // Temp file in the same directory so the rename stays on one filesystem
    let mut temp = NamedTempFile::new_in(&parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;

    Ok(())
}
