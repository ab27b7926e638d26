//! Pipeline command implementation (run)

use std::path::Path;
use std::process::ExitCode;

use crate::agreement::Metric;
use crate::analyze::format_report_text;
use crate::config::CliOverrides;
use crate::network::format_evaluation_text;
use crate::pipeline::{run_pipeline as run_stages, PipelineSummary};

use super::agreement::format_agreement_text;
use super::{emit, fail, settings};

fn format_summary_text(summary: &PipelineSummary, metric: Metric) -> String {
    let mut output = String::new();

    if let Some(training) = &summary.training {
        output.push_str("MODEL TRAINING\n");
        output.push_str(&format_evaluation_text(&training.dev));
        output.push('\n');
    }

    output.push_str("TEST SET ANALYSIS\n\n");
    output.push_str(&format_report_text(&summary.test_report));

    output.push_str("TWITTER DATASET ANALYSIS\n\n");
    output.push_str(&format_report_text(&summary.twitter_report));

    output.push_str(&format!("Charts written: {}\n", summary.charts.len()));
    for path in &summary.charts {
        output.push_str(&format!("  {}\n", path.display()));
    }
    output.push('\n');

    output.push_str(&format_agreement_text(metric, &summary.agreement));
    output
}

/// Execute the run command
pub fn run_pipeline(config: Option<&Path>, overrides: &CliOverrides, force: bool) -> ExitCode {
    let settings = match settings(config, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match run_stages(&settings, force) {
        Ok(summary) => emit(&format_summary_text(&summary, settings.stats.metric), None),
        Err(e) => fail(e),
    }
}
