//! Worklist - Main Entry Point
//!
//! Prints a worklist page to stdout, scores questionnaire answers and manages
//! the remembered user profile.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use worklist::constants::LOG_FILE_PREFIX;
use worklist::data_table::accessor::value_text;
use worklist::data_table::{DataSourceBuilder, QueryState, SortDirection};
use worklist::domain::config::{AppConfig, config_path};
use worklist::domain::form_status::{status_legend, tag_groups_text};
use worklist::domain::segment::{Responses, calculate};
use worklist::domain::user::{UserProfile, UserStore};
use worklist::features::worklist::mock::{form_status_column, mock_orders, order_columns};
use worklist::features::worklist::{Worklist, WorklistOptions};
use worklist::helpers::{get_or_create_data_dir, is_development};
use worklist::services::{EmailNotifier, NotificationOutcome, block_on, generate_email_content};

#[derive(Parser, Debug)]
#[command(name = "worklist", about = "Sortable, filterable, paginated worklist")]
struct Cli {
    /// Config file (defaults to worklist.toml in the platform config directory)
    #[arg(long, env = "WORKLIST_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of the worklist (default)
    List(ListArgs),
    /// Score six answers (1-7) and optionally email the result
    Score(ScoreArgs),
    /// Forget the remembered user profile
    ForgetUser,
    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    /// Free-text search across every data column
    #[arg(long)]
    search: Option<String>,

    /// Column filter as KEY=TEXT, repeatable
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Column key to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Remote endpoint; overrides the config file
    #[arg(long, env = "WORKLIST_ENDPOINT")]
    endpoint: Option<String>,

    /// Add a column listing every form tag
    #[arg(long)]
    tags: bool,

    /// Print each row's tags grouped by status below the table
    #[arg(long)]
    expand_tags: bool,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Answers for Q1C, Q1D, Q1E, Q1G, Q1H, Q1I
    #[arg(long, value_delimiter = ',', required = true)]
    answers: Vec<u8>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Send the result email to the user
    #[arg(long)]
    send: bool,
}

fn parse_filter(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=TEXT, got `{text}`")),
    }
}

/// Console logs on stderr plus a daily log file in the data directory
fn init_tracing() -> Option<WorkerGuard> {
    let default_directive = if is_development() { "debug" } else { "info" };
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::rfc_3339())
        .with_filter(filter());

    match get_or_create_data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            tracing_subscriber::registry().with(console).with(file).init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(console).init();
            tracing::warn!(error = %e, "File logging disabled");
            None
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    config.context("failed to load worklist config")
}

fn run_list(config: &AppConfig, args: ListArgs) -> anyhow::Result<()> {
    let options = WorklistOptions::from(&config.worklist);
    let endpoint = args.endpoint.or_else(|| config.worklist.endpoint.clone());
    let builder = match endpoint {
        Some(endpoint) => DataSourceBuilder::new().endpoint(endpoint),
        None => DataSourceBuilder::new().rows(mock_orders()),
    };
    let wait = options.fetch_timeout + Duration::from_secs(1);

    let mut columns = order_columns();
    if args.tags {
        columns.push(form_status_column());
    }
    let mut worklist = Worklist::from_builder(columns, builder, options)?;
    if !worklist.state().load_state().is_fatal() {
        block_on(worklist.fetch_now())?;
    }

    let mut query = QueryState::default().with_search(args.search.unwrap_or_default());
    for (key, text) in args.filters {
        query = query.with_filter(key, text);
    }
    if let Some(key) = args.sort {
        let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
        query = query.with_sort(key, direction);
    }
    worklist.set_query(query);
    worklist.wait_for_idle(wait)?;
    worklist.set_page(args.page);

    println!("{}", worklist.render());
    if args.expand_tags {
        println!();
        for row in &worklist.state().visible_page().rows {
            let id = row.get("orderNumber").map_or_else(String::new, value_text);
            println!("{id}: {}", tag_groups_text(row.get("formStatuses")));
        }
    }
    println!();
    println!("{}", status_legend());
    Ok(())
}

fn run_init_config(path: Option<&PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    AppConfig::default()
        .save_to(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote default config");
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_score(config: &AppConfig, args: ScoreArgs) -> anyhow::Result<()> {
    let answers: [u8; 6] = args
        .answers
        .as_slice()
        .try_into()
        .context("exactly six answers are required")?;
    let result = calculate(&Responses::new(answers)?)?;

    println!("Segment {}: {}", result.segment, result.segment_name);
    println!("{}", result.scores_text());

    let store = UserStore::open_default()?;
    let user = match (args.first_name, args.last_name, args.email) {
        (Some(first), Some(last), Some(email)) => {
            let user = UserProfile::new(first, last, email)?;
            store.save(&user)?;
            Some(user)
        }
        (None, None, None) => store.load(),
        _ => bail!("--first-name, --last-name and --email must be given together"),
    };

    let Some(user) = user else {
        if args.send {
            bail!("no registered user; pass --first-name, --last-name and --email");
        }
        return Ok(());
    };

    println!();
    println!("{}", generate_email_content(&user, &result));

    if args.send {
        let notifier = EmailNotifier::new(config.email.clone(), config.worklist.fetch_timeout())?;
        match block_on(notifier.send_results(&user, &result)) {
            NotificationOutcome::Sent { message_id } => println!("\nEmail sent ({message_id})"),
            NotificationOutcome::Failed { error } => println!("\nEmail not sent: {error}"),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing();

    tracing::info!("Starting worklist...");
    match cli.cmd.unwrap_or(Command::List(ListArgs {
        page: 1,
        ..ListArgs::default()
    })) {
        Command::List(args) => run_list(&load_config(cli.config.as_ref())?, args),
        Command::Score(args) => run_score(&load_config(cli.config.as_ref())?, args),
        Command::ForgetUser => {
            UserStore::open_default()?.forget()?;
            println!("User profile removed");
            Ok(())
        }
        Command::InitConfig { force } => run_init_config(cli.config.as_ref(), force),
    }
}
