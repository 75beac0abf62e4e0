use crate::{
    core::planner::parse_max_attempts,
    prompts::{BudgetLevel, PlanOptions, TransportMode, TravelStyle},
    GenerationError, ItineraryPlanner, OpenAIClient,
};
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::time::Duration;
use tracing::{error, info};

fn command() -> Command {
    Command::new("tripgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn a free-text travel note into a structured itinerary")
        .arg(
            Arg::new("note")
                .help("The travel note (omit when using --file)")
                .required_unless_present("file")
                .index(1),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PATH")
                .help("Read the note from a file")
                .conflicts_with("note"),
        )
        .arg(
            Arg::new("style")
                .short('s')
                .long("style")
                .value_name("STYLE")
                .help("Travel style: leisure, adventure, cultural, relaxation"),
        )
        .arg(
            Arg::new("transport")
                .long("transport")
                .value_name("MODE")
                .help("Transport: car, public, walking, bike"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("LEVEL")
                .help("Budget: economy, standard, luxury"),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .value_name("TAG")
                .action(ArgAction::Append)
                .help("Interest to weave into the plan (repeatable)"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .value_name("YYYY-MM-DD")
                .help("Reference date for year inference (defaults to the local date)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Model identifier (or set TRIPGEN_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY / OPENROUTER_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Provider base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Overall deadline for the generation")
                .default_value("180"),
        )
        .arg(
            Arg::new("max-attempts")
                .short('a')
                .long("max-attempts")
                .value_name("COUNT")
                .help("Attempts when the model output fails validation (or set TRIPGEN_MAX_ATTEMPTS)"),
        )
}

fn parse_options(matches: &ArgMatches) -> anyhow::Result<PlanOptions> {
    let style = matches
        .get_one::<String>("style")
        .map(|value| value.parse::<TravelStyle>())
        .transpose()?;
    let transport = matches
        .get_one::<String>("transport")
        .map(|value| value.parse::<TransportMode>())
        .transpose()?;
    let budget = matches
        .get_one::<String>("budget")
        .map(|value| value.parse::<BudgetLevel>())
        .transpose()?;

    Ok(PlanOptions {
        style,
        transport,
        budget,
    })
}

fn read_note(matches: &ArgMatches) -> anyhow::Result<String> {
    if let Some(path) = matches.get_one::<String>("file") {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read note from {path}"));
    }

    matches
        .get_one::<String>("note")
        .cloned()
        .ok_or_else(|| anyhow!("a note or --file is required"))
}

/// Environment settings first, then command line overrides.
fn build_planner(matches: &ArgMatches) -> anyhow::Result<ItineraryPlanner<OpenAIClient>> {
    let mut client = match matches.get_one::<String>("api-key") {
        Some(api_key) => OpenAIClient::new(api_key.as_str())?.with_env_settings(),
        None => OpenAIClient::from_env()?,
    };
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        client = client.with_base_url(base_url.as_str());
    }
    if let Some(model) = matches.get_one::<String>("model") {
        client = client.with_model(model.as_str());
    }

    info!("Using model: {}", client.model());
    info!("Base URL: {}", client.base_url());

    let mut planner = ItineraryPlanner::new(client).with_env_settings()?;
    if let Some(value) = matches.get_one::<String>("max-attempts") {
        let max_attempts = parse_max_attempts(value).context("invalid --max-attempts")?;
        planner = planner.with_max_attempts(max_attempts);
    }

    Ok(planner)
}

/// CLI entry point for the tripgen tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let note = read_note(&matches)?;
    let options = parse_options(&matches)?;
    let tags: Vec<String> = matches
        .get_many::<String>("tag")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let today = match matches.get_one::<String>("today") {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("--today must be YYYY-MM-DD, got {value}"))?,
        None => chrono::Local::now().date_naive(),
    };
    let timeout_seconds: u64 = matches
        .get_one::<String>("timeout")
        .map(|value| value.parse())
        .transpose()
        .context("--timeout must be a number of seconds")?
        .unwrap_or(180);

    let planner = build_planner(&matches)?;

    let generation = planner.generate_plan_on(&note, Some(options), Some(tags.as_slice()), today);
    let outcome = tokio::time::timeout(Duration::from_secs(timeout_seconds), generation)
        .await
        .map_err(|_| anyhow!("plan generation timed out after {timeout_seconds}s"))?;

    match outcome {
        Ok(itinerary) => {
            println!("{}", serde_json::to_string_pretty(&itinerary)?);
            info!("Itinerary with {} days generated", itinerary.days.len());
            Ok(())
        }
        Err(err) => {
            error!(code = err.error_code(), "Plan generation failed: {}", err);
            eprintln!("{} [{}]", err.user_message(), err.error_code());
            if let GenerationError::RateLimit {
                retry_after: Some(secs),
            } = err
            {
                eprintln!("Retry after {secs}s.");
            }
            Err(anyhow!("plan generation failed: {}", err.error_code()))
        }
    }
}
