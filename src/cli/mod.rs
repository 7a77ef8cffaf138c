//! Command-line interface for tasktrack
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::output::OutputOptions;

mod init;
mod report;
mod session;
mod task;
mod user;

pub(crate) use session::{Access, Session};

/// tasktrack - file-backed task tracking for a small team
///
/// Tasks and accounts live as plain text records in one data directory.
/// Every command except `init` runs as an authenticated user.
#[derive(Parser, Debug)]
#[command(name = "tasktrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the stores (defaults to current directory)
    #[arg(long, global = true, env = "TASKTRACK_DIR")]
    pub dir: Option<PathBuf>,

    /// Username to act as
    #[arg(long, global = true, env = "TASKTRACK_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, global = true, env = "TASKTRACK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and the admin account
    Init {
        /// Password for the admin account
        #[arg(long)]
        admin_password: String,
    },

    /// Check credentials and show the account role
    Login,

    /// Account management
    #[command(subcommand)]
    User(UserCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Overview reports (admin only)
    #[command(subcommand)]
    Report(ReportCommands),
}

/// Account subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new account (admin only)
    Register {
        /// Username for the new account
        name: String,

        /// Password for the new account
        #[arg(long)]
        new_password: String,
    },

    /// List registered usernames
    List,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task assigned to a registered user
    Add {
        /// Username the task is assigned to
        #[arg(long)]
        assign: String,

        /// Task title
        #[arg(long)]
        title: String,

        /// Task description
        #[arg(long)]
        description: String,

        /// Due date, in the configured input format (default DD/MM/YYYY)
        #[arg(long)]
        due: String,
    },

    /// List tasks
    List {
        /// Only tasks assigned to the current user
        #[arg(long, conflicts_with = "completed")]
        mine: bool,

        /// Only completed tasks (admin only)
        #[arg(long)]
        completed: bool,
    },

    /// Mark one of your tasks complete
    Complete {
        /// Position in `task list --mine`
        number: usize,
    },

    /// Reassign or reschedule one of your incomplete tasks
    Edit {
        /// Position in `task list --mine`
        number: usize,

        /// New assigned user
        #[arg(long, required_unless_present = "due")]
        assign: Option<String>,

        /// New due date
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task by store position (admin only)
    Delete {
        /// Position in `task list`
        index: usize,
    },
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Recompute both overview reports
    Generate,

    /// Show the last generated reports
    Show,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let access = Access {
            dir: self.dir,
            user: self.user,
            password: self.password,
        };

        match self.command {
            Commands::Init { admin_password } => init::run(init::InitOptions {
                dir: access.dir,
                admin_password,
                output,
            }),
            Commands::Login => user::run_login(access, output),
            Commands::User(cmd) => match cmd {
                UserCommands::Register { name, new_password } => {
                    user::run_register(user::RegisterOptions {
                        name,
                        new_password,
                        access,
                        output,
                    })
                }
                UserCommands::List => user::run_list(access, output),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    assign,
                    title,
                    description,
                    due,
                } => task::run_add(task::AddOptions {
                    assign,
                    title,
                    description,
                    due,
                    access,
                    output,
                }),
                TaskCommands::List { mine, completed } => task::run_list(task::ListOptions {
                    scope: if mine {
                        task::ListScope::Mine
                    } else if completed {
                        task::ListScope::Completed
                    } else {
                        task::ListScope::All
                    },
                    access,
                    output,
                }),
                TaskCommands::Complete { number } => {
                    task::run_complete(task::CompleteOptions {
                        number,
                        access,
                        output,
                    })
                }
                TaskCommands::Edit {
                    number,
                    assign,
                    due,
                } => task::run_edit(task::EditOptions {
                    number,
                    assign,
                    due,
                    access,
                    output,
                }),
                TaskCommands::Delete { index } => task::run_delete(task::DeleteOptions {
                    index,
                    access,
                    output,
                }),
            },
            Commands::Report(cmd) => match cmd {
                ReportCommands::Generate => report::run_generate(access, output),
                ReportCommands::Show => report::run_show(access, output),
            },
        }
    }
}
