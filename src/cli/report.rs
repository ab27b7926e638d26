//! Report command implementations (stats, plot)

use std::path::Path;
use std::process::ExitCode;

use crate::analyze::format_report_text;
use crate::chart::render_all;
use crate::config::CliOverrides;
use crate::pipeline::analyze_file;

use super::{check_format, emit, fail, render, require_input, settings, EXIT_SUCCESS};

/// Execute the stats command
pub fn run_stats(
    config: Option<&Path>,
    overrides: &CliOverrides,
    input: Option<&Path>,
    format: &str,
    output: Option<&Path>,
) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }
    let settings = match settings(config, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let input = input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.paths.result(&settings.paths.twitter_predictions));
    if let Err(code) = require_input(&input) {
        return code;
    }

    let report = match analyze_file(&input, &settings.stats.options()) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    match render(&report, format, format_report_text) {
        Ok(text) => emit(&text, output),
        Err(code) => code,
    }
}

/// Execute the plot command
pub fn run_plot(config: Option<&Path>, input: Option<&Path>, out_dir: Option<&Path>) -> ExitCode {
    let settings = match settings(config, &CliOverrides::default()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let input = input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.paths.result(&settings.paths.twitter_predictions));
    if let Err(code) = require_input(&input) {
        return code;
    }
    let out_dir = out_dir.map(Path::to_path_buf).unwrap_or_else(|| settings.charts_dir());

    let report = match analyze_file(&input, &settings.stats.options()) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    match render_all(&report, &out_dir, &settings.charts.style()) {
        Ok(paths) => {
            for path in &paths {
                println!("{}", path.display());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail(e),
    }
}
