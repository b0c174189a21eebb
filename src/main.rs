//! hkweather CLI
//!
//! One-shot checks and the HTTP trigger service.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};

use hkweather_service::checks::{Check, WeatherBot, WeatherChecks};
use hkweather_service::config::{self, DEFAULT_CONFIG_PATH, ServiceConfig};
use hkweather_service::logging::{self, DataSource, LogLevel};
use hkweather_service::server::{self, AppState};

#[derive(Parser)]
#[command(name = "hkweather")]
#[command(author, version, about = "Hong Kong Observatory weather bot", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Minimum log level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value_t = Level::Info)]
    log_level: Level,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warning,
            Level::Error => LogLevel::Error,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a check and send the result to IFTTT
    Check {
        /// currentweather or rainforecast
        option: String,

        /// IFTTT Webhooks key
        #[arg(short, long)]
        key: Option<String>,

        /// Only notify when rain is forecast (rainforecast only)
        #[arg(long)]
        silence: bool,
    },

    /// Run a check and print the result without notifying
    Show {
        /// currentweather or rainforecast
        option: String,
    },

    /// Serve the HTTP trigger endpoints
    Serve {
        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen address (overrides config)
        #[arg(long)]
        host: Option<IpAddr>,

        /// IFTTT Webhooks key
        #[arg(short, long)]
        key: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    config::load_dotenv();
    logging::init_logger(cli.log_level.into(), cli.log_file.as_deref(), cli.json_logs)
        .context("cannot open log file")?;

    let config = ServiceConfig::load(&cli.config)?;

    match cli.command {
        Commands::Check { option, key, silence } => {
            let check: Check = option.parse().map_err(anyhow::Error::msg)?;
            let Some(key) = config.resolve_api_key(key) else {
                bail!(
                    "IFTTT key is required via --key, {} or the config file",
                    config::API_KEY_ENV
                );
            };
            let bot = WeatherBot::from_config(config)?;
            println!("{}", bot.run(check, &key, silence)?);
        }

        Commands::Show { option } => {
            let check: Check = option.parse().map_err(anyhow::Error::msg)?;
            let bot = WeatherBot::from_config(config)?;
            match check {
                Check::CurrentWeather => {
                    let record = bot.current_weather()?;
                    println!("{}", record.short_summary_msg);
                    println!("{}", record.long_summary_msg);
                }
                Check::RainForecast => {
                    let forecast = bot.rain_forecast();
                    if !forecast.has_result {
                        println!("No nowcast result");
                    } else {
                        println!("{}", forecast.short_summary_msg);
                        println!("{}", forecast.long_summary_msg);
                        if forecast.inaccurate_result {
                            println!(
                                "(nowcast images partly unreadable; result may be inaccurate)"
                            );
                        }
                    }
                }
            }
        }

        Commands::Serve { port, host, key } => {
            let api_key = config.resolve_api_key(key);
            if api_key.is_none() {
                logging::warn(
                    DataSource::Server,
                    None,
                    "no IFTTT key configured; only routes carrying a key will run checks",
                );
            }

            let host = match host {
                Some(host) => host,
                None => config
                    .server
                    .host
                    .parse()
                    .with_context(|| format!("invalid server host {:?}", config.server.host))?,
            };
            let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

            // The blocking HTTP clients must be created, and finally dropped,
            // outside the async runtime.
            let bot: Arc<dyn WeatherChecks> = Arc::new(WeatherBot::from_config(config)?);
            let state = AppState {
                checks: Arc::clone(&bot),
                api_key,
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(state, addr))?;
            drop(runtime);
            drop(bot);
        }
    }

    Ok(())
}
