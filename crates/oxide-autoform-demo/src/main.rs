//! oxide-autoform demo CLI
//!
//! Renders, submits and describes forms for the example models.

mod models;

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use oxide_autoform::{
    render_page, BootstrapForm, FormSynthesizer, Presenter, SubmittedValues, SynthConfig,
};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::models::{with_model, ExampleModel};

/// Schema-driven forms for Rust structs.
#[derive(Parser)]
#[command(name = "oxide-autoform-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with synthesizer settings.
    #[arg(short, long, env = "AUTOFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Separator for comma-style list fields.
    #[arg(long, env = "AUTOFORM_SEPARATOR")]
    separator: Option<char>,

    /// Step of fractional number inputs.
    #[arg(long, env = "AUTOFORM_FLOAT_STEP")]
    float_step: Option<f64>,

    /// Rows of list and mapping textareas.
    #[arg(long, env = "AUTOFORM_TEXTAREA_ROWS")]
    rows: Option<usize>,

    /// Label of the submit button.
    #[arg(long, env = "AUTOFORM_SUBMIT_LABEL")]
    submit_label: Option<String>,

    /// Render boolean fields as switches.
    #[arg(long, env = "AUTOFORM_SWITCHES")]
    switches: bool,

    /// Leave out the "enter as JSON" hints.
    #[arg(long)]
    no_hints: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the example models.
    Models,

    /// Print the JSON Schema of a model.
    Schema {
        /// Model to describe.
        model: ExampleModel,
    },

    /// Print the Bootstrap form of a model.
    Render {
        /// Model to render.
        model: ExampleModel,

        /// Submitted value as NAME=VALUE (repeatable). Without any, the
        /// initial form is rendered.
        #[arg(short, long = "data", value_parser = parse_key_val)]
        data: Vec<(String, String)>,

        /// Form action URL.
        #[arg(short, long, default_value = "")]
        action: String,

        /// Form method.
        #[arg(short, long, default_value = "post")]
        method: String,

        /// Wrap the form in a standalone HTML page.
        #[arg(long)]
        page: bool,
    },

    /// Submit values and print the resulting instance.
    Submit {
        /// Model to fill in.
        model: ExampleModel,

        /// Submitted value as NAME=VALUE (repeatable). Nested fields use
        /// dotted names, such as `shipping_address.city`.
        #[arg(short, long = "data", value_parser = parse_key_val)]
        data: Vec<(String, String)>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    debug!(?config, "synthesizer configuration");
    let synth = FormSynthesizer::new(config.clone());

    match cli.command {
        Commands::Models => {
            for model in ExampleModel::value_variants() {
                let schema = model.schema();
                println!(
                    "{:<14} {} ({} fields)",
                    model.cli_name(),
                    schema.display_title(),
                    schema.len()
                );
            }
        }

        Commands::Schema { model } => {
            let schema = model.schema().json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }

        Commands::Render {
            model,
            data,
            action,
            method,
            page,
        } => {
            let values: HashMap<String, String> = data.into_iter().collect();
            let mut form = if values.is_empty() {
                BootstrapForm::new(config)
            } else {
                BootstrapForm::with_data(config, &values)
            };

            with_model!(model, |M| {
                let instance: Option<M> = synth.run(&mut form, None);
                if let (false, Some(instance)) = (values.is_empty(), instance) {
                    info!(model = %model.cli_name(), "submitted values are valid");
                    form.display_structured(&serde_json::to_value(&instance)?);
                }
            });

            let html = form.finish(&action, &method);
            if page {
                println!("{}", render_page(model.schema().display_title(), &html));
            } else {
                println!("{html}");
            }
        }

        Commands::Submit { model, data } => {
            let mut presenter = SubmittedValues::from_pairs(data);

            let instance = with_model!(model, |M| {
                synth
                    .run::<M, _>(&mut presenter, None)
                    .map(|instance| serde_json::to_value(&instance))
                    .transpose()?
            });

            match instance {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => {
                    for message in presenter.errors() {
                        eprintln!("{message}");
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds the synthesizer configuration: the config file if given, then
/// command-line and environment overrides.
fn load_config(cli: &Cli) -> anyhow::Result<SynthConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => SynthConfig::default(),
    };

    if let Some(separator) = cli.separator {
        config = config.list_separator(separator);
    }
    if let Some(step) = cli.float_step {
        config = config.float_step(step);
    }
    if let Some(rows) = cli.rows {
        config = config.textarea_rows(rows);
    }
    if let Some(label) = &cli.submit_label {
        config = config.submit_label(label);
    }
    if cli.switches {
        config = config.switches(true);
    }
    if cli.no_hints {
        config = config.json_hints(false);
    }

    Ok(config)
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid NAME=VALUE: no `=` found in `{s}`"))?;
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("tags=a=b, c"),
            Ok(("tags".to_string(), "a=b, c".to_string()))
        );
        assert!(parse_key_val("name").is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "oxide-autoform-demo",
            "--separator",
            ";",
            "--no-hints",
            "--float-step",
            "0.01",
            "submit",
            "user-profile",
            "-d",
            "name=Alice",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.list_separator, ';');
        assert!(!config.json_hints);
        assert_eq!(config.float_step, 0.01);
        assert!(matches!(cli.command, Commands::Submit { ref data, .. } if data.len() == 1));
    }

    #[test]
    fn test_submit_user_profile() {
        let mut presenter = SubmittedValues::from_pairs([
            ("name", "Alice"),
            ("age", "30"),
            ("interests", "x, y, z"),
        ]);
        let profile = with_model!(ExampleModel::UserProfile, |M| {
            FormSynthesizer::default()
                .run::<M, _>(&mut presenter, None)
                .map(|p| serde_json::to_value(&p).unwrap())
        });
        assert_eq!(
            profile,
            Some(serde_json::json!({ "name": "Alice", "age": 30, "interests": ["x", "y", "z"] }))
        );
    }
}
