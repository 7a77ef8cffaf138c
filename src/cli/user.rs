//! tasktrack login and user command implementations

use crate::cli::{Access, Session};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::record;

pub struct RegisterOptions {
    pub name: String,
    pub new_password: String,
    pub access: Access,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct LoginReport {
    username: String,
    role: &'static str,
    assigned_tasks: usize,
}

#[derive(serde::Serialize)]
struct RegisterReport {
    username: String,
}

#[derive(serde::Serialize)]
struct UserListReport {
    users: Vec<String>,
}

pub fn run_login(access: Access, output: OutputOptions) -> Result<()> {
    let session = Session::open(access)?;
    let assigned = session.tasks().assigned_to(&session.username)?;

    let report = LoginReport {
        username: session.username.clone(),
        role: session.role(),
        assigned_tasks: assigned.len(),
    };

    let mut human = HumanOutput::new(format!("Logged in as {}", session.username));
    human.push_summary("role", session.role());
    human.push_summary("assigned tasks", assigned.len().to_string());
    if session.is_admin() {
        human.push_next_step("tasktrack report generate");
    } else {
        human.push_next_step("tasktrack task list --mine");
    }

    emit_success(output, "login", &report, Some(&human))
}

pub fn run_register(options: RegisterOptions) -> Result<()> {
    let session = Session::open(options.access)?;
    session.require_admin("register users")?;

    let name = options.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("username cannot be empty".to_string()));
    }
    record::validate_field("username", name)?;
    record::validate_field("password", &options.new_password)?;

    let user = session.users().register(name, &options.new_password)?;

    let mut human = HumanOutput::new(format!("Registered {}", user.username));
    human.push_next_step(format!(
        "tasktrack task add --assign {} --title <title> --description <text> --due <date>",
        user.username
    ));

    emit_success(
        options.output,
        "user register",
        &RegisterReport {
            username: user.username.clone(),
        },
        Some(&human),
    )
}

pub fn run_list(access: Access, output: OutputOptions) -> Result<()> {
    let session = Session::open(access)?;
    let users = session.users().require()?;
    let names: Vec<String> = users.usernames().map(str::to_string).collect();

    let mut human = HumanOutput::new(format!("{} registered user(s)", names.len()));
    for name in &names {
        if *name == session.config.admin_user {
            human.push_detail(format!("{name} (admin)"));
        } else {
            human.push_detail(name.clone());
        }
    }

    emit_success(
        output,
        "user list",
        &UserListReport { users: names },
        Some(&human),
    )
}
