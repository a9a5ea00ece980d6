use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use gnews::config::Config;
use gnews::news::{GoogleNews, NewsRecord, NewsSource};

/// Get the config directory path (~/.config/gnews/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("gnews"))
}

#[derive(Parser, Debug)]
#[command(name = "gnews", about = "Google News headlines from the terminal", version)]
struct Args {
    /// Language code (overrides the config file), e.g. "en"
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Country code (overrides the config file), e.g. "US"
    #[arg(long, global = true)]
    country: Option<String>,

    /// Config file (default: ~/.config/gnews/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Print records as a JSON array
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Top stories for the locale
    Top,
    /// Headlines for a topic section (WORLD, NATION, BUSINESS, TECHNOLOGY, ...)
    Topic { topic: String },
    /// Headlines for a geographic section
    Geo { geo: String },
    /// Search headlines, optionally bounded by date (YYYY-MM-DD)
    Search {
        query: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

async fn run(source: &dyn NewsSource, command: &Command) -> Result<Vec<NewsRecord>> {
    let records = match command {
        Command::Top => source.top_news().await,
        Command::Topic { topic } => source.topic_headlines(topic).await,
        Command::Geo { geo } => source.geo_headlines(geo).await,
        Command::Search { query, from, to } => source.search(query, *from, *to).await,
    };
    records.context("Failed to fetch headlines")
}

fn print_records(out: &mut impl Write, records: &[NewsRecord]) -> std::io::Result<()> {
    for record in records {
        writeln!(out, "{}", record.title)?;
        let published = if record.has_unknown_date() {
            "unknown date".to_string()
        } else {
            record.published.format("%Y-%m-%d %H:%M UTC").to_string()
        };
        if record.source.is_empty() {
            writeln!(out, "  {published}")?;
        } else {
            writeln!(out, "  {} | {published}", record.source)?;
        }
        writeln!(out, "  {}", record.link)?;
        if !record.description.is_empty() && record.description != record.title {
            writeln!(out, "  {}", record.description)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable with --json
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;
    if let Some(lang) = &args.lang {
        config.language = lang.clone();
    }
    if let Some(country) = &args.country {
        config.country = country.clone();
    }

    let news = GoogleNews::new(config.to_options()?).context("Invalid client options")?;
    let records = run(&news, &args.command).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &records).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        print_records(&mut out, &records)?;
    }

    Ok(())
}
