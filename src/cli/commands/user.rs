//! User command handlers

use crate::args::UserAction;
use course_manager::core::error::ServiceResult;
use course_manager::core::models::{Admin, Identity, Instructor, Role, Student, User};
use course_manager::core::services::{Registrar, UserUpdate};
use course_manager::verbose;

/// Run a `user` subcommand
pub fn run(action: UserAction, registrar: &mut Registrar) -> ServiceResult<()> {
    match action {
        UserAction::Add {
            role,
            username,
            password,
            name,
        } => {
            let user: User = match Role::from(role) {
                Role::Admin => Admin::new(username.as_str(), password, name)?.into(),
                Role::Instructor => Instructor::new(username.as_str(), password, name)?.into(),
                Role::Student => Student::new(username.as_str(), password, name)?.into(),
            };
            let role = user.role();
            registrar.users_mut().add_user(user)?;
            println!("✓ Added {role} {username}");
        }
        UserAction::List { role } => list(registrar, role.map(Role::from)),
        UserAction::Delete { username } => {
            registrar.users_mut().delete_user(&username)?;
            println!("✓ Deleted {username}");
        }
        UserAction::Update {
            username,
            new_username,
            password,
            name,
        } => {
            let update = UserUpdate {
                username: new_username,
                password,
                name,
            };
            registrar.users_mut().update_user(&username, update)?;
            println!("✓ Updated {username}");
        }
        UserAction::Assign { username, courses } => {
            registrar
                .users_mut()
                .set_assigned_courses(&username, &courses)?;
            println!("✓ {username} now assigned: {}", describe_courses(&courses));
        }
    }
    Ok(())
}

fn list(registrar: &Registrar, role: Option<Role>) {
    let users = registrar.users();
    let shown: Vec<&User> = match role {
        Some(role) => users.users_with_role(role).collect(),
        None => users.users().iter().collect(),
    };
    if shown.is_empty() {
        println!("No users.");
        return;
    }

    println!("{:<12} {:<16} {:<24} Details", "Type", "Username", "Name");
    for user in shown {
        let details = match user {
            User::Admin(_) => String::new(),
            User::Instructor(instructor) => describe_courses(instructor.assigned_courses()),
            User::Student(student) => student
                .enrollments()
                .iter()
                .map(|e| format!("{} ({})", e.course(), e.letter_grade()))
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!(
            "{:<12} {:<16} {:<24} {details}",
            user.role().to_string(),
            user.username(),
            user.display_name()
        );
    }
    verbose!("{} user(s)", users.users().len());
}

fn describe_courses(courses: &[String]) -> String {
    if courses.is_empty() {
        "None".to_string()
    } else {
        courses.join(", ")
    }
}
