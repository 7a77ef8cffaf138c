//! tasktrack init command implementation
//!
//! Creates the data directory, a default config, an empty task store and a
//! user store holding the admin account.

use std::path::PathBuf;

use crate::cli::session::resolve_dir;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::record;
use crate::storage::Storage;
use crate::user::UserDirectory;

pub struct InitOptions {
    pub dir: Option<PathBuf>,
    pub admin_password: String,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct InitReport {
    dir: PathBuf,
    admin_user: String,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    tasks: bool,
    users: bool,
}

pub fn run(options: InitOptions) -> Result<()> {
    let root = resolve_dir(options.dir)?;
    let config = Config::load_from_dir(&root);
    let storage = Storage::new(root.clone(), config.files.clone());

    let users_file = storage.users_file();
    if users_file.exists() {
        return Err(Error::InvalidArgument(format!(
            "already initialized: {} exists",
            users_file.display()
        )));
    }
    record::validate_field("admin_user", &config.admin_user)?;
    record::validate_field("password", &options.admin_password)?;

    storage.init()?;

    let config_file = storage.config_file();
    let created_config = !config_file.exists();
    if created_config {
        config.save(&config_file)?;
    }

    let tasks_file = storage.tasks_file();
    let created_tasks = !tasks_file.exists();
    if created_tasks {
        storage.write_atomic(&tasks_file, b"")?;
    }

    UserDirectory::new(storage.clone()).register(&config.admin_user, &options.admin_password)?;
    tracing::info!(root = %root.display(), admin = %config.admin_user, "data directory initialized");

    let report = InitReport {
        dir: root.clone(),
        admin_user: config.admin_user.clone(),
        created: InitCreated {
            config: created_config,
            tasks: created_tasks,
            users: true,
        },
    };

    let mut created_items = Vec::new();
    if created_config {
        created_items.push(crate::config::CONFIG_FILE);
    }
    if created_tasks {
        created_items.push(config.files.tasks.as_str());
    }
    created_items.push(config.files.users.as_str());

    let mut human = HumanOutput::new("tasktrack init: initialized data directory");
    human.push_summary("dir", root.display().to_string());
    human.push_summary("admin", config.admin_user.clone());
    human.push_summary("created", created_items.join(", "));
    human.push_next_step(format!(
        "tasktrack --user {} user register <name> --new-password <password>",
        config.admin_user
    ));

    emit_success(options.output, "init", &report, Some(&human))
}
