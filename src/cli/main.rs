//! Command-line interface entry point for `coursemgr`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use course_manager::config::Config;
use course_manager::core::models::Admin;
use course_manager::core::services::Registrar;
use course_manager::core::store::FileStore;
use course_manager::logger::{
    enable_debug, enable_verbose, init_file_logging, set_level, Level,
};
use course_manager::{error, info, warn};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag wins over config logging.level; fall back to warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    let config_log_path = (!config.logging.file.is_empty())
        .then(|| std::path::PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let command = match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
            return;
        }
        other => other,
    };

    // Everything else works on the data directory, which must exist first
    let store = FileStore::new(&config.paths.data_dir);
    if let Err(e) = store.ensure_data_directory_exists() {
        eprintln!("✗ Cannot prepare data directory: {e}");
        std::process::exit(1);
    }

    let root = match Admin::new(
        config.bootstrap.admin_username.as_str(),
        config.bootstrap.admin_password.as_str(),
        config.bootstrap.admin_name.as_str(),
    ) {
        Ok(admin) => Some(admin),
        Err(e) => {
            warn!("No root admin configured: {e}");
            None
        }
    };

    let mut registrar = match Registrar::open(store, root) {
        Ok(registrar) => registrar,
        Err(e) => {
            eprintln!("✗ Failed to load data: {e}");
            std::process::exit(1);
        }
    };
    report_skipped(&registrar);

    if let Err(e) = commands::dispatch(command, &mut registrar) {
        error!("{e}");
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

fn report_skipped(registrar: &Registrar) {
    let files = [
        ("users.txt", registrar.users().load_report()),
        ("courses.txt", registrar.courses().load_report()),
    ];
    for (file, report) in files {
        for skipped in &report.skipped {
            warn!("{file} line {} skipped: {}", skipped.line_number, skipped.error);
        }
    }
}
