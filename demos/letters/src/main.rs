//! Letters demo: attribute access, defaults, and template validation.

use anyhow::{Context, Result, ensure};
use attrconf_rs::core::{CheckError, FieldError};
use attrconf_rs::{Check, Config, ErrorMessages, Item, Template, ValueKind, config};
use clap::Parser;
use log::{debug, info};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use std::process::ExitCode;

const VALUES: &str = include_str!("../data/values.json5");
const DEFAULTS: &str = include_str!("../data/defaults.json5");
const MESSAGES: &str = include_str!("../data/messages.json5");

/// Command-line options for the letters demo.
#[derive(Parser)]
#[command(name = "letters", version)]
struct Cli {
    /// JSON5 file replacing the built-in letter values
    #[arg(long)]
    data: Option<PathBuf>,
    /// JSON5 file replacing the built-in defaults
    #[arg(long)]
    defaults: Option<PathBuf>,
    /// JSON5 file replacing the built-in error messages
    #[arg(long)]
    messages: Option<PathBuf>,
    /// Log lookups and validation steps
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .try_init();

    let values = load(cli.data.as_ref(), VALUES, "values")?;
    let defaults = load(cli.defaults.as_ref(), DEFAULTS, "defaults")?;
    let messages = load(cli.messages.as_ref(), MESSAGES, "messages")?;
    let messages =
        ErrorMessages::from_value(&messages).context("failed to read error messages")?;
    let cfg = Config::new(&values, Some(&defaults)).context("failed to build config view")?;

    if cli.data.is_none() && cli.defaults.is_none() {
        show_access(&cfg)?;
    }

    let mut print_error = |error: &FieldError| println!("{error}");
    let passed = cfg
        .follows_template_with(&letters_template(), &messages, &mut print_error)
        .context("a template check could not be evaluated")?;
    info!("letters follow template: {passed}");

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Load a source from `path`, or the embedded contents when none is given.
fn load(path: Option<&PathBuf>, embedded: &str, label: &str) -> Result<Value> {
    match path {
        Some(path) => config::load_value_from_path(path)
            .with_context(|| format!("failed to load {label} from {}", path.display())),
        None => {
            debug!("using embedded {label}");
            config::load_value_from_str(embedded, label)
                .with_context(|| format!("failed to parse embedded {label}"))
        }
    }
}

/// Show nested, corrected, and defaulted lookups on the built-in data.
fn show_access(cfg: &Config<'_>) -> Result<()> {
    let by_attr = cfg.attr("A").and_then(|a| a.attr("ASCII"))?;
    let by_key = cfg.get("A").and_then(|a| a.get("ASCII"))?;
    ensure!(by_attr == by_key, "attribute and indexed access disagree");
    println!("A.ASCII = {}", by_attr.to_value());

    ensure!(
        cfg.attr("_1337")? == cfg.get(1337)?,
        "identifier correction failed"
    );
    println!("_1337 = {}", cfg.attr("_1337")?.to_value());

    let b = cfg.attr("b").and_then(Item::node)?;
    ensure!(b.attr("case")? == json!("lower"), "defaults did not complete b");
    ensure!(b.attr("ASCII")? == json!(89), "defaults overrode b.ASCII");
    println!("b = {}", b.to_value());
    Ok(())
}

fn in_range(low: i64, high: i64) -> Check {
    Check::predicate(move |value| value.as_i64().is_some_and(|n| low <= n && n <= high))
}

fn accept_all(_: &Value, _: &[Value], _: &Map<String, Value>) -> Result<bool, CheckError> {
    Ok(true)
}

/// Template covering types, literal values, functions, and combinations.
fn letters_template() -> Template {
    let mut kwargs = Map::new();
    kwargs.insert("a".to_string(), json!("b"));

    Template::new()
        // type
        .section(
            "A",
            Template::new()
                .field("ASCII", ValueKind::Integer)
                .field("kind", ValueKind::String)
                // either one
                .field(
                    "case",
                    Check::any([ValueKind::String.into(), ValueKind::Bool.into()]),
                ),
        )
        // value
        .section(
            "a",
            Template::new()
                .field("ASCII", Check::equals(97))
                .field("kind", "alpha")
                .field("case", Check::any(["upper".into(), "lower".into()])),
        )
        // function
        .section(
            "B",
            Template::new()
                .field("ASCII", in_range(65, 90))
                .field(
                    "kind",
                    Check::call_with(accept_all, [json!(0), json!(1)], kwargs.clone()),
                )
                .field("case", Check::call_with_kwargs(accept_all, kwargs)),
        )
        // combinations
        .section(
            "b",
            Template::new()
                .field(
                    "ASCII",
                    Check::any([ValueKind::Bool.into(), in_range(65, 90)]),
                )
                .field(
                    "kind",
                    Check::all([
                        ValueKind::String.into(),
                        Check::predicate(|value| {
                            value.as_str().is_some_and(|text| text.starts_with("abc"))
                        }),
                    ]),
                ),
        )
}
