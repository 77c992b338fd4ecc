use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use nd_core::{ApiConfig, FilterState, NewsApi, Tab};
use nd_dashboard::{init_logging, FeedViewController, PanelState};
use tracing::{info, Level};

mod dashboard;
mod print;

#[derive(Debug, Clone, PartialEq, Eq)]
struct HumanDuration(Duration);

const TOO_LARGE: &str = "Duration is too large";

fn add_scaled(total: u64, num: u64, scale: u64) -> std::result::Result<u64, String> {
    num.checked_mul(scale)
        .and_then(|secs| total.checked_add(secs))
        .ok_or_else(|| TOO_LARGE.to_string())
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let scale = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = add_scaled(total_seconds, num, scale)?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number means seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds = add_scaled(total_seconds, num, 1)?;
                    has_unit = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Timeout must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse a news aggregation API from the terminal", long_about = None)]
pub struct Cli {
    /// Base URL of the news API (falls back to NEWSDESK_API_BASE, then http://localhost:4000)
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Backend to read from: http or memory (built-in sample data)
    #[arg(long, global = true, default_value = "http")]
    backend: String,
    /// Per-request timeout (e.g. 15s, 1m30s)
    #[arg(long, global = true, default_value = "15s")]
    timeout: HumanDuration,
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the filtered news feed
    Feed {
        /// Free-text search
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value = "")]
        region: String,
        #[arg(short, long, default_value = "")]
        topic: String,
    },
    /// Print the briefs payload
    Briefs,
    /// Print backend health
    Health,
    /// Open the interactive dashboard
    Dashboard {
        /// Tab to start on: feed, briefs or health
        #[arg(long, default_value = "feed")]
        tab: Tab,
    },
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = log_level(cli.verbose);
    match (&cli.log_file, &cli.command) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            init_logging(level, Mutex::new(file), false);
        }
        // The dashboard owns the terminal; without a log file, logs are dropped.
        (None, Commands::Dashboard { .. }) => {
            init_logging(level, std::io::sink, false);
        }
        (None, _) => {
            init_logging(level, std::io::stderr, true);
        }
    }
    Ok(())
}

fn finish<T>(state: &PanelState<T>, rendered: String) -> anyhow::Result<()> {
    if let Some(e) = state.error() {
        bail!("{}", e.message);
    }
    print!("{}", rendered);
    Ok(())
}

async fn run_once(api: &dyn NewsApi, tab: Tab, filter: FilterState) -> anyhow::Result<()> {
    let mut controller = FeedViewController::new();
    controller.set_filter(filter);
    controller.switch_tab(tab);
    info!("📰 Loading {} from {}", tab, api.name());
    controller.load_active(api).await;

    match tab {
        Tab::Feed => finish(controller.feed(), print::render_feed(controller.feed())),
        Tab::Briefs => finish(controller.briefs(), print::render_briefs(controller.briefs())),
        Tab::Health => finish(controller.health(), print::render_health(controller.health())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let config = ApiConfig::resolve(cli.api_base.as_deref())?.with_timeout(cli.timeout.0);
    let api: Arc<dyn NewsApi> = nd_client::create_api(&cli.backend, config).await?;

    match cli.command {
        Commands::Feed { query, region, topic } => {
            run_once(api.as_ref(), Tab::Feed, FilterState::new(query, region, topic)).await
        }
        Commands::Briefs => run_once(api.as_ref(), Tab::Briefs, FilterState::default()).await,
        Commands::Health => run_once(api.as_ref(), Tab::Health, FilterState::default()).await,
        Commands::Dashboard { tab } => dashboard::run(api, tab).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_client::MemoryNewsApi;

    #[test]
    fn test_human_duration() {
        assert_eq!("15s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(15));
        assert_eq!("1m30s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert_eq!("45".parse::<HumanDuration>().unwrap().0, Duration::from_secs(45));
        assert_eq!("1h 5m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(3900));
        assert!("10x".parse::<HumanDuration>().is_err());
        assert!("".parse::<HumanDuration>().is_err());
        assert!("0s".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_human_duration_overflow_is_an_error() {
        assert_eq!(
            "6000000000000000h".parse::<HumanDuration>(),
            Err("Duration is too large".to_string())
        );
        assert_eq!(
            "18446744073709551615s 1s".parse::<HumanDuration>(),
            Err("Duration is too large".to_string())
        );
        assert_eq!(
            "18446744073709551615s 1".parse::<HumanDuration>(),
            Err("Duration is too large".to_string())
        );
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["nd", "feed", "-q", "rates", "--region", "EU"]).unwrap();
        assert_eq!(cli.backend, "http");
        assert_eq!(cli.timeout.0, Duration::from_secs(15));
        match cli.command {
            Commands::Feed { query, region, topic } => {
                assert_eq!(query, "rates");
                assert_eq!(region, "EU");
                assert_eq!(topic, "");
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["nd", "--backend", "memory", "dashboard", "--tab", "health", "-vv"]).unwrap();
        assert_eq!(cli.backend, "memory");
        assert_eq!(log_level(cli.verbose), Level::TRACE);
        assert!(matches!(cli.command, Commands::Dashboard { tab: Tab::Health }));

        assert!(Cli::try_parse_from(["nd", "dashboard", "--tab", "settings"]).is_err());
    }

    #[tokio::test]
    async fn test_run_once_against_memory_backend() {
        let api = MemoryNewsApi::sample().await;
        run_once(&api, Tab::Health, FilterState::default()).await.unwrap();
        run_once(&api, Tab::Feed, FilterState::new("", "US", "")).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_once_fails_on_unreachable_backend() {
        let config = ApiConfig::new("http://127.0.0.1:1").unwrap();
        let api = nd_client::HttpNewsApi::new(config).unwrap();
        let err = run_once(&api, Tab::Briefs, FilterState::default()).await.unwrap_err();
        assert!(err.to_string().starts_with("Could not reach the news service"));
    }
}
