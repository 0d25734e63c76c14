//! Data directory and log file maintenance

use crate::args::{DataAction, LogFileArg};
use course_manager::core::error::ServiceResult;
use course_manager::core::services::Registrar;

/// Run a `data` subcommand
pub fn run(action: DataAction, registrar: &Registrar) -> ServiceResult<()> {
    let store = registrar.store();
    match action {
        DataAction::Init => {
            store.ensure_data_directory_exists()?;
            println!("✓ Data directory ready: {}", store.data_dir().display());
        }
        DataAction::Reset { target } => {
            match target {
                LogFileArg::Feedback => store.reset_feedback_file()?,
                LogFileArg::Grades => store.reset_grade_file()?,
            }
            println!("✓ {target:?} log reset");
        }
        DataAction::Convert { target } => {
            let report = match target {
                LogFileArg::Feedback => store.convert_feedback_file_to_utf8()?,
                LogFileArg::Grades => store.convert_grade_file_to_utf8()?,
            };
            println!(
                "✓ {target:?} log converted from {}: {} line(s) kept, {} discarded",
                report.encoding, report.kept, report.discarded
            );
        }
    }
    Ok(())
}
