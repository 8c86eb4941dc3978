use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use ofcurve_cli::commands;
use ofcurve_cli::config::{self, AppConfig, AppMode};
use ofcurve_core::catalog::Catalog;
use ofcurve_engine::factor::FactorValue;
use ofcurve_engine::prediction::{PredictionRequest, predict};
use serde_json::json;

#[derive(Parser)]
#[command(name = "ofcurve", version, about = "Food-allergy challenge probability curves")]
struct Cli {
    /// Formula catalog JSON; overrides the saved catalog path.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Display language tag, e.g. `en` or `ja`.
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List formulas in the catalog.
    List {
        /// Include plain formula models without a curve.
        #[arg(long)]
        all: bool,
    },
    /// Describe one formula.
    Show { name: String },
    /// Compute the probability curve for one formula.
    Predict {
        name: String,
        /// Input to sweep along the x-axis.
        #[arg(long)]
        primary: Option<String>,
        /// Input value as NAME=VALUE; repeatable.
        #[arg(long = "set", value_parser = commands::parse_assignment)]
        assignments: Vec<(String, FactorValue)>,
        /// Number of curve intervals.
        #[arg(long)]
        points: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show or change saved settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    SetLanguage { tag: String },
    SetMode { mode: AppMode },
    SetCatalog { path: PathBuf },
    Reset,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = config::load_config()?;
    let lang = cli.lang.clone().unwrap_or_else(|| settings.language.clone());

    match cli.command {
        Command::Settings { action } => run_settings(settings, action),
        Command::List { all } => {
            let catalog = open_catalog(cli.catalog, &settings)?;
            print!("{}", commands::list(&catalog, &lang, all, settings.mode));
            Ok(())
        }
        Command::Show { name } => {
            let catalog = open_catalog(cli.catalog, &settings)?;
            let formula = catalog
                .get(&name)
                .ok_or_else(|| eyre::eyre!("formula not found: {name}"))?;
            print!("{}", commands::show(formula, &lang));
            Ok(())
        }
        Command::Predict {
            name,
            primary,
            assignments,
            points,
            json,
        } => {
            let catalog = open_catalog(cli.catalog, &settings)?;
            let formula = catalog
                .get(&name)
                .ok_or_else(|| eyre::eyre!("formula not found: {name}"))?;
            commands::check_curve_options(formula, primary.as_deref(), points)?;
            let values = commands::entry_values(formula, assignments)?;

            if !formula.has_curve() {
                let probability = ofcurve_engine::prediction::formula_probability(formula, &values);
                if json {
                    let out = json!({ "formula": formula.name, "probability": probability });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                } else {
                    print!("{}", commands::render_formula_probability(formula, &values, &lang));
                }
                return Ok(());
            }

            let request = PredictionRequest {
                formula: name,
                values,
                primary,
                point_count: points,
            };
            let prediction = predict(&catalog, &request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                print!(
                    "{}",
                    commands::render_prediction(formula, &prediction, &request.values, &lang, settings.mode)
                );
            }
            Ok(())
        }
    }
}

fn open_catalog(flag: Option<PathBuf>, settings: &AppConfig) -> Result<Catalog> {
    let path = flag
        .or_else(|| settings.catalog_path.clone())
        .ok_or_else(|| {
            eyre::eyre!("no formula catalog configured; pass --catalog or run `ofcurve settings set-catalog PATH`")
        })?;
    commands::load_catalog(&path)
}

fn run_settings(mut settings: AppConfig, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }
        SettingsAction::Reset => {
            config::delete_config()?;
            println!("settings reset");
            return Ok(());
        }
        SettingsAction::SetLanguage { tag } => settings.language = tag,
        SettingsAction::SetMode { mode } => settings.mode = mode,
        SettingsAction::SetCatalog { path } => {
            let path = std::fs::canonicalize(&path)
                .map_err(|e| eyre::eyre!("cannot use catalog at {}: {e}", path.display()))?;
            commands::load_catalog(&path)?;
            settings.catalog_path = Some(path);
        }
    }
    let path = config::save_config(&settings)?;
    println!("saved {}", path.display());
    Ok(())
}
