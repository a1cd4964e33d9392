//! Entry point for the dupescan CLI.

use clap::Parser;
use dupescan::{
    cli::Cli,
    error::{ConfigError, ExitCode, StructuredError},
    logging,
};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);

    // Run the application logic
    match dupescan::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            // Unusable invocations get their own exit code
            let exit_code = if err.downcast_ref::<ConfigError>().is_some() {
                ExitCode::ConfigError
            } else {
                ExitCode::GeneralError
            };

            // Report the error
            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{json}");
                } else {
                    eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
