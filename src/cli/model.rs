//! Model command implementations (preprocess, train, evaluate, predict)

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::network::{format_evaluation_text, ModelFile, TrainEval};
use crate::pipeline::{evaluate_dataset, train_model, Embeddings};
use crate::preprocess::TweetPreprocessor;

use super::{check_format, emit, fail, from_cwd, render, require_input, settings, EXIT_SUCCESS};

/// Execute the preprocess command
pub fn run_preprocess(config: Option<&Path>, input: &Path, output: &Path, embeddings: Option<&Path>) -> ExitCode {
    let settings = match settings(config, &CliOverrides::default()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Err(code) = require_input(input) {
        return code;
    }
    let embeddings_path = match embeddings {
        Some(path) => path.to_path_buf(),
        None => settings.paths.data(&settings.paths.embeddings),
    };
    if let Err(code) = require_input(&embeddings_path) {
        return code;
    }

    let preprocessor = match TweetPreprocessor::load(&embeddings_path) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    match preprocessor.convert_dataset(input, output) {
        Ok(written) => {
            println!("Preprocessed {} tweets into {}", written, output.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail(e),
    }
}

fn format_training_text(result: &TrainEval) -> String {
    let mut output = String::new();
    if let (Some(first), Some(last)) = (result.losses.first(), result.losses.last()) {
        output.push_str(&format!("Epochs: {}  loss {:.4} -> {:.4}\n\n", result.losses.len(), first, last));
    }
    if let Some(train) = &result.train {
        output.push_str("Training set\n");
        output.push_str(&format_evaluation_text(train));
        output.push('\n');
    }
    output.push_str("Development set\n");
    output.push_str(&format_evaluation_text(&result.dev));
    output
}

/// Execute the train command
pub fn run_train(
    config: Option<&Path>,
    overrides: &CliOverrides,
    train: Option<&Path>,
    dev: Option<&Path>,
    eval_train: bool,
    format: &str,
) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }
    let mut settings = match settings(config, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Some(path) = train {
        settings.paths.train_dataset = from_cwd(path);
    }
    if let Some(path) = dev {
        settings.paths.dev_dataset = from_cwd(path);
    }
    for dataset in [&settings.paths.train_dataset, &settings.paths.dev_dataset] {
        if let Err(code) = require_input(&settings.paths.data(dataset)) {
            return code;
        }
    }

    let mut embeddings = Embeddings::from_config(&settings);
    let (model, result) = match train_model(&settings, &mut embeddings, eval_train) {
        Ok(trained) => trained,
        Err(e) => return fail(e),
    };
    let model_path = settings.paths.result(&settings.paths.model);
    if let Err(e) = model.save(&model_path) {
        return fail(e);
    }

    let text = match render(&result, format, format_training_text) {
        Ok(text) => text,
        Err(code) => return code,
    };
    emit(&text, None)
}

fn load_model(path: &Path) -> Result<ModelFile, ExitCode> {
    require_input(path)?;
    ModelFile::load(path).map_err(fail)
}

/// Execute the evaluate command
pub fn run_evaluate(config: Option<&Path>, overrides: &CliOverrides, dataset: Option<&Path>, format: &str) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }
    let settings = match settings(config, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let dataset = match dataset {
        Some(path) => path.to_path_buf(),
        None => settings.paths.data(&settings.paths.test_dataset),
    };
    if let Err(code) = require_input(&dataset) {
        return code;
    }
    let model = match load_model(&settings.paths.result(&settings.paths.model)) {
        Ok(m) => m,
        Err(code) => return code,
    };

    let mut embeddings = Embeddings::from_config(&settings);
    let evaluation = match evaluate_dataset(&model, &dataset, &mut embeddings) {
        Ok(e) => e,
        Err(e) => return fail(e),
    };
    match render(&evaluation, format, format_evaluation_text) {
        Ok(text) => emit(&text, None),
        Err(code) => code,
    }
}

/// Execute the predict command
pub fn run_predict(
    config: Option<&Path>,
    overrides: &CliOverrides,
    input: Option<&Path>,
    output: Option<&Path>,
) -> ExitCode {
    let settings = match settings(config, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let paths = &settings.paths;
    let input = input.map(Path::to_path_buf).unwrap_or_else(|| paths.data(&paths.twitter_dataset));
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| paths.result(&paths.twitter_predictions));
    if let Err(code) = require_input(&input) {
        return code;
    }
    let model = match load_model(&paths.result(&paths.model)) {
        Ok(m) => m,
        Err(code) => return code,
    };

    let mut embeddings = Embeddings::from_config(&settings);
    let preprocessor = match embeddings.preprocessor() {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    match preprocessor.preprocess_with_prediction(&input, &output, &model) {
        Ok(written) => {
            println!("Predicted {} tweets into {}", written, output.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail(e),
    }
}
