//! tweetsent - Command-line tool for the tweet sentiment pipeline

use std::process::ExitCode;

use tweetsent::cli;

fn main() -> ExitCode {
    cli::run()
}
