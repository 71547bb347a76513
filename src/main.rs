use clap::Parser;
use mcfiles::{Cli, McFiles, McFilesError, OutputMode, Diagnostics, UserFriendlyError};
use std::io;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let mcfiles = match McFiles::from_cli(&cli) {
        Ok(mcfiles) => mcfiles,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let stdout = io::stdout();
    let result = match cli.input_path() {
        Some(path) => mcfiles.extract_file(path, stdout.lock()),
        None => mcfiles.extract(io::stdin().lock(), stdout.lock()),
    };

    match result {
        Ok(report) => {
            mcfiles.diagnostics().print_summary(&report);
            // Skipped entries and failed payloads were already reported
            0
        }
        Err(e) => {
            mcfiles.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &McFilesError) -> i32 {
    match error {
        McFilesError::Io(_) => 1,
        McFilesError::Yaml { .. } => 3,
        McFilesError::NotAMapping { .. } | McFilesError::InvalidItems { .. } => 4,
        McFilesError::UnsupportedKind { .. } => 5,
        McFilesError::Config { .. } => 6,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.config_output_path();

    match McFiles::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  oc get machineconfig -o yaml | mcfiles --config {}", config_path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &McFilesError) {
    let diagnostics = Diagnostics::new(OutputMode::Human, 0, false);
    diagnostics.print_user_friendly_error(error);
}
