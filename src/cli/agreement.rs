//! Agreement command implementation (iaa)

use std::path::Path;
use std::process::ExitCode;

use crate::agreement::{ClassAgreement, Metric};
use crate::config::CliOverrides;
use crate::pipeline::agreement_file;

use super::{check_format, emit, fail, render, require_input, settings};

/// Agreement rows as a text table.
pub(crate) fn format_agreement_text(metric: Metric, rows: &[ClassAgreement]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Krippendorff's alpha ({} metric)\n", metric));
    output.push_str(&"─".repeat(36));
    output.push('\n');
    for row in rows {
        let value = match (&row.alpha, &row.error) {
            (Some(alpha), _) => format!("{:.3}", alpha),
            (None, Some(error)) => format!("n/a ({})", error),
            (None, None) => "n/a".to_string(),
        };
        output.push_str(&format!(
            "  {:12} {:>6} items {:>7} judgments  {}\n",
            row.label, row.units, row.judgments, value
        ));
    }
    output
}

/// Execute the iaa command
pub fn run_iaa(config: Option<&Path>, input: Option<&Path>, metric: Option<Metric>, format: &str) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }
    let settings = match settings(config, &CliOverrides::default()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let input = input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.paths.data(&settings.paths.disambiguation));
    if let Err(code) = require_input(&input) {
        return code;
    }
    let metric = metric.unwrap_or(settings.stats.metric);

    let rows = match agreement_file(&input, metric) {
        Ok(rows) => rows,
        Err(e) => return fail(e),
    };
    match render(&rows, format, |rows| format_agreement_text(metric, rows)) {
        Ok(text) => emit(&text, None),
        Err(code) => code,
    }
}
