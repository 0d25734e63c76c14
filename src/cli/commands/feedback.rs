//! Feedback command handlers

use crate::args::FeedbackAction;
use course_manager::core::error::ServiceResult;
use course_manager::core::services::Registrar;

/// Run a `feedback` subcommand
pub fn run(action: FeedbackAction, registrar: &Registrar) -> ServiceResult<()> {
    match action {
        FeedbackAction::Submit {
            student,
            course,
            message,
        } => {
            registrar.submit_feedback(&student, &course, &message)?;
            println!("✓ Feedback submitted for {course}");
        }
        FeedbackAction::List => {
            let loaded = registrar.load_feedback()?;
            if loaded.records.is_empty() {
                println!("No feedback yet.");
            }
            for record in &loaded.records {
                println!(
                    "[{}] {} ({}) on {} / {}: {}",
                    record.timestamp,
                    record.student_name,
                    record.student_username,
                    record.course_name,
                    record.instructor_name,
                    record.message
                );
            }
            if !loaded.report.is_clean() {
                println!("({} unreadable line(s) skipped)", loaded.report.skipped.len());
            }
        }
    }
    Ok(())
}
