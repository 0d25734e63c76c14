//! CLI argument definitions for `coursemgr`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use course_manager::config::ConfigOverrides;
use course_manager::core::models::Role;
use course_manager::logger::Level;

/// CLI log level argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(as_str)
    }
}

/// Kind of user account
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum RoleArg {
    /// Administrator
    Admin,
    /// Instructor
    Instructor,
    /// Student
    Student,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::Admin,
            RoleArg::Instructor => Self::Instructor,
            RoleArg::Student => Self::Student,
        }
    }
}

/// Append-only log file targeted by `data reset` and `data convert`
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFileArg {
    /// `feedbacks.txt`
    Feedback,
    /// `grades.txt`
    Grades,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key (e.g., `level`, `data_dir`, `admin_username`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Restore one configuration value to its default.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (asks for confirmation).
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Register a new user
    Add {
        /// Account kind
        #[arg(value_enum)]
        role: RoleArg,
        /// Unique username
        username: String,
        /// Password
        password: String,
        /// Display name (required for students)
        #[arg(default_value = "")]
        name: String,
    },
    /// List stored users
    List {
        /// Only show users of this kind
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
    /// Delete a user
    Delete {
        /// Username to delete
        username: String,
    },
    /// Change a user's username, password or name
    Update {
        /// Current username
        username: String,
        /// New username
        #[arg(long = "username", value_name = "NEW")]
        new_username: Option<String>,
        /// New password
        #[arg(long)]
        password: Option<String>,
        /// New display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Replace an instructor's assigned course list (course records are not changed)
    Assign {
        /// Instructor username
        username: String,
        /// Course names; none clears the list
        courses: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseAction {
    /// Add a course. Without room, branch or price the defaults TBD / Main / 0.0 apply.
    Add {
        /// Course name
        name: String,
        /// Instructor display name
        #[arg(long, default_value = "None")]
        instructor: String,
        /// Room
        #[arg(long)]
        room: Option<String>,
        /// Branch
        #[arg(long)]
        branch: Option<String>,
        /// Price
        #[arg(long)]
        price: Option<f64>,
        /// Start date (yyyy-MM-dd)
        #[arg(long, default_value = "")]
        start: String,
        /// End date (yyyy-MM-dd)
        #[arg(long, default_value = "")]
        end: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List courses
    List {
        /// Only print numbered course names
        #[arg(short, long)]
        numbered: bool,
    },
    /// List the instructor field of every course
    Instructors,
    /// Update a course by exact name, keeping room, branch and price
    Update {
        /// Current course name
        name: String,
        /// New name
        #[arg(long = "name", value_name = "NEW")]
        new_name: Option<String>,
        /// Instructor names (repeat for several); replaces the list
        #[arg(long = "instructor")]
        instructors: Vec<String>,
        /// New start date
        #[arg(long)]
        start: Option<String>,
        /// New end date
        #[arg(long)]
        end: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete every course with this name (case-insensitive)
    Delete {
        /// Course name
        name: String,
    },
    /// Show courses starting or ending within a few days
    Near {
        /// Window in days
        #[arg(long, default_value_t = 3)]
        days: i64,
    },
    /// Assign an instructor to a course
    Assign {
        /// Instructor username
        instructor: String,
        /// Course name
        course: String,
    },
    /// Show the students enrolled in a course
    Roster {
        /// Course name
        course: String,
    },
    /// Show the courses assigned to an instructor
    Schedule {
        /// Instructor username
        instructor: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum StudentAction {
    /// Enroll a student in a course
    Enroll {
        /// Student username
        username: String,
        /// Course name
        course: String,
    },
    /// Show a student's grades
    Grades {
        /// Student username
        username: String,
    },
    /// Replace one enrollment by its number in `student grades`
    Update {
        /// Student username
        username: String,
        /// Enrollment number (1-based)
        number: usize,
        /// Course name
        course: String,
        /// Numeric grade (0-100)
        numeric: f32,
        /// Letter grade
        letter: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum GradeAction {
    /// Record a grade and append it to the grade log
    Record {
        /// Student username
        student: String,
        /// Course name
        course: String,
        /// Numeric grade (0-100)
        numeric: f32,
        /// Letter grade (A+..D-, F); derived from the score when omitted
        letter: Option<String>,
        /// Username of the grading instructor; omit when grading as admin
        #[arg(long)]
        instructor: Option<String>,
    },
    /// Show the grade log
    Log {
        /// Only the latest entry per student and course
        #[arg(long)]
        latest: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum FeedbackAction {
    /// Submit feedback about a course
    Submit {
        /// Student username
        student: String,
        /// Course name
        course: String,
        /// Feedback text
        message: String,
    },
    /// Show all feedback
    List,
}

#[derive(Debug, Subcommand)]
pub enum DataAction {
    /// Create the data directory
    Init,
    /// Empty a log file, keeping its header
    Reset {
        /// Which log
        #[arg(value_enum)]
        target: LogFileArg,
    },
    /// Rewrite a log file as UTF-8, dropping malformed lines
    Convert {
        /// Which log
        #[arg(value_enum)]
        target: LogFileArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Check credentials for a role
    Login {
        /// Role to log in as
        #[arg(long, value_enum)]
        role: RoleArg,
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage courses and instructor assignments
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Student enrollment and grades
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Record grades and read the grade log
    Grade {
        #[command(subcommand)]
        action: GradeAction,
    },
    /// Submit and read course feedback
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },
    /// Data directory and log file maintenance
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "coursemgr",
    about = "Course management command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Data directory for this run
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides; `None` means no override
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            data_dir: self
                .data_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
