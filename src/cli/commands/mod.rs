//! CLI command handlers for `coursemgr`.
//!
//! Each command group lives in its own submodule and works through the
//! [`Registrar`], which saves every change before returning.

pub mod config;
pub mod course;
pub mod data;
pub mod feedback;
pub mod grade;
pub mod user;

use crate::args::{Command, StudentAction};
use course_manager::core::error::ServiceResult;
use course_manager::core::models::Role;
use course_manager::core::services::Registrar;

/// Run any command other than `config`
pub fn dispatch(command: Command, registrar: &mut Registrar) -> ServiceResult<()> {
    match command {
        Command::Config { .. } => Ok(()),
        Command::Login {
            role,
            username,
            password,
        } => login(registrar, role.into(), &username, &password),
        Command::User { action } => user::run(action, registrar),
        Command::Course { action } => course::run(action, registrar),
        Command::Student { action } => match action {
            StudentAction::Enroll { username, course } => {
                registrar.enroll(&username, &course)?;
                println!("✓ Enrolled {username} in {course}");
                Ok(())
            }
            StudentAction::Grades { username } => grade::show_student(registrar, &username),
            StudentAction::Update {
                username,
                number,
                course,
                numeric,
                letter,
            } => grade::update_enrollment(registrar, &username, number, &course, numeric, &letter),
        },
        Command::Grade { action } => grade::run(action, registrar),
        Command::Feedback { action } => feedback::run(action, registrar),
        Command::Data { action } => data::run(action, registrar),
    }
}

fn login(registrar: &Registrar, role: Role, username: &str, password: &str) -> ServiceResult<()> {
    use course_manager::core::models::Identity;

    if let Some(user) = registrar.users().login(role, username, password) {
        println!("✓ Logged in as {} ({role})", user.display_name());
    } else {
        eprintln!("✗ Invalid {role} credentials for {username}");
        std::process::exit(1);
    }
    Ok(())
}
