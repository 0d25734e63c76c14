//! Grade command handlers

use crate::args::GradeAction;
use course_manager::core::error::{ServiceResult, ValidationError};
use course_manager::core::models::records::latest_grades;
use course_manager::core::models::GradeLogEntry;
use course_manager::core::services::{GradeOutcome, Registrar};

/// Run a `grade` subcommand
pub fn run(action: GradeAction, registrar: &mut Registrar) -> ServiceResult<()> {
    match action {
        GradeAction::Record {
            student,
            course,
            numeric,
            letter,
            instructor,
        } => {
            match registrar.record_grade(
                &student,
                &course,
                numeric,
                letter.as_deref(),
                instructor.as_deref(),
            )? {
                GradeOutcome::Recorded(entry) => println!(
                    "✓ Recorded {} ({}) for {student} in {course}",
                    entry.numeric_grade, entry.letter_grade
                ),
                GradeOutcome::LogFailed(e) => {
                    println!("✓ Grade saved for {student} in {course}");
                    eprintln!("✗ Grade log not updated: {e}");
                }
            }
            Ok(())
        }
        GradeAction::Log { latest } => {
            let loaded = registrar.load_grades()?;
            if loaded.records.is_empty() {
                println!("No grades recorded.");
            } else if latest {
                for entry in latest_grades(&loaded.records).into_values() {
                    print_entry(entry);
                }
            } else {
                for entry in &loaded.records {
                    print_entry(entry);
                }
            }
            Ok(())
        }
    }
}

/// Print a student's current grades (`student grades`)
pub fn show_student(registrar: &Registrar, username: &str) -> ServiceResult<()> {
    let student = registrar.users().student(username)?;
    if student.enrollments().is_empty() {
        println!("{} has no registered courses.", student.name());
        return Ok(());
    }
    println!("Student: {}", student.name());
    for (index, enrollment) in student.enrollments().iter().enumerate() {
        println!(
            "{}. {:<25} {:>6} {}",
            index + 1,
            enrollment.course(),
            enrollment.numeric_grade(),
            enrollment.letter_grade()
        );
    }
    Ok(())
}

/// Replace one enrollment by its 1-based number (`student update`)
pub fn update_enrollment(
    registrar: &mut Registrar,
    username: &str,
    number: usize,
    course: &str,
    numeric: f32,
    letter: &str,
) -> ServiceResult<()> {
    let len = registrar.users().student(username)?.enrollments().len();
    let index = number
        .checked_sub(1)
        .ok_or(ValidationError::IndexOutOfRange { index: 0, len })?;
    registrar
        .users_mut()
        .update_enrollment(username, index, course, numeric, letter)?;
    println!("✓ Updated enrollment {number} for {username}");
    Ok(())
}

fn print_entry(entry: &GradeLogEntry) {
    println!(
        "{}  {:<16} {:<20} {:>6} {:<3} by {}",
        entry.timestamp,
        entry.student_username,
        entry.course_name,
        entry.numeric_grade,
        entry.letter_grade,
        entry.instructor_name
    );
}
