//! The two bot operations: report current weather, report the two-hour
//! rain outlook. Both build their record, then hand it to the webhook relay.

use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use thiserror::Error;

use crate::alert::webhook::{WebhookClient, WebhookValues};
use crate::analysis::rain_trend::forecast_rain;
use crate::config::{ConfigError, ServiceConfig};
use crate::endpoints::{EVENT_CURRENT_WEATHER, EVENT_RAIN_FORECAST};
use crate::ingest::current_weather::WeatherChecker;
use crate::ingest::hko_rss::FeedClient;
use crate::ingest::nowcast_renderer::{NodeRenderer, RainImageSource, build_nowcast_url};
use crate::logging::{self, DataSource};
use crate::model::{FeedError, RainForecast, WeatherRecord, WebhookError};

pub const WEATHER_ACK: &str = "OK! System checking current weather.";
pub const RAIN_ACK: &str = "OK! System checking 2 hours rainfall.";

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

// ---------------------------------------------------------------------------
// Check selection
// ---------------------------------------------------------------------------

/// Which report a trigger asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    CurrentWeather,
    RainForecast,
}

impl FromStr for Check {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "currentweather" => Ok(Check::CurrentWeather),
            // "rainforcast" is the spelling existing automations use
            "rainforecast" | "rainforcast" => Ok(Check::RainForecast),
            other => Err(format!("unknown option {other:?}")),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::CurrentWeather => write!(f, "currentweather"),
            Check::RainForecast => write!(f, "rainforecast"),
        }
    }
}

/// What the HTTP layer needs from the bot. Implementations block.
pub trait WeatherChecks: Send + Sync {
    fn check_weather(&self, key: &str) -> Result<&'static str, CheckError>;
    fn check_rain(&self, key: &str, silence: bool) -> Result<&'static str, CheckError>;

    fn run(&self, check: Check, key: &str, silence: bool) -> Result<&'static str, CheckError> {
        match check {
            Check::CurrentWeather => self.check_weather(key),
            Check::RainForecast => self.check_rain(key, silence),
        }
    }
}

// ---------------------------------------------------------------------------
// Bot
// ---------------------------------------------------------------------------

/// Production wiring: HKO feeds over HTTP, the node renderer, IFTTT.
pub struct WeatherBot {
    config: ServiceConfig,
    feeds: FeedClient,
    renderer: Box<dyn RainImageSource + Send + Sync>,
    webhook: WebhookClient,
    local_tz: Tz,
}

impl WeatherBot {
    /// Builds the HTTP clients. Must not be called from inside an async
    /// runtime (the blocking client owns its own).
    pub fn from_config(config: ServiceConfig) -> Result<Self, BotSetupError> {
        let local_tz = config.local_tz()?;
        let feeds = FeedClient::with_timeout(&config.http.user_agent, config.http.timeout())?;
        let webhook_client = reqwest::blocking::Client::builder()
            .user_agent(config.http.user_agent.clone())
            .timeout(config.http.timeout())
            .build()?;
        let renderer = NodeRenderer::new(
            config.nowcast.renderer_program.clone(),
            config.nowcast.renderer_script.clone(),
        );
        if !renderer.script.exists() {
            logging::warn(
                DataSource::Nowcast,
                None,
                &format!(
                    "renderer script {} not found; rain checks will have no result",
                    renderer.script.display()
                ),
            );
        }

        Ok(Self {
            webhook: WebhookClient::new(webhook_client, config.webhook.base_url.clone()),
            feeds,
            renderer: Box::new(renderer),
            local_tz,
            config,
        })
    }

    pub fn current_weather(&self) -> Result<WeatherRecord, FeedError> {
        let checker = WeatherChecker::new(self.config.feeds.clone(), &self.feeds, self.local_tz);
        checker.current_weather().inspect_err(|e| {
            logging::log_feed_failure("current_weather", "build weather record", e);
        })
    }

    pub fn rain_forecast(&self) -> RainForecast {
        let nowcast = &self.config.nowcast;
        let url = build_nowcast_url(&nowcast.page_url, nowcast.latitude, nowcast.longitude);
        forecast_rain(self.renderer.as_ref(), &url, nowcast.retry)
    }

    fn send(&self, event: &str, key: &str, values: &WebhookValues) -> Result<(), WebhookError> {
        self.webhook
            .send(event, key, values)
            .inspect_err(|e| logging::log_webhook_failure(event, "trigger", e))?;
        Ok(())
    }
}

impl WeatherChecks for WeatherBot {
    fn check_weather(&self, key: &str) -> Result<&'static str, CheckError> {
        let record = self.current_weather()?;
        let values = weather_values(&record);
        self.send(EVENT_CURRENT_WEATHER, key, &values)?;
        Ok(WEATHER_ACK)
    }

    fn check_rain(&self, key: &str, silence: bool) -> Result<&'static str, CheckError> {
        let forecast = self.rain_forecast();
        match rain_values(&forecast, silence) {
            Some(values) => self.send(EVENT_RAIN_FORECAST, key, &values)?,
            None => logging::info(
                DataSource::Nowcast,
                None,
                if forecast.has_result {
                    "no rain forecast, notification silenced"
                } else {
                    "no nowcast result, nothing sent"
                },
            ),
        }
        Ok(RAIN_ACK)
    }
}

/// Setup failures: bad config or an HTTP client that cannot be built.
#[derive(Debug, Error)]
pub enum BotSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Short summary, long message, weather icon.
pub fn weather_values(record: &WeatherRecord) -> WebhookValues {
    WebhookValues {
        value1: record.short_summary_msg.clone(),
        value2: record.long_summary_msg.clone(),
        value3: Some(record.weather_img_url.clone()).filter(|u| !u.is_empty()),
    }
}

/// Payload for a rain forecast, or `None` when nothing should be sent:
/// no result at all, or a dry window while silenced.
pub fn rain_values(forecast: &RainForecast, silence: bool) -> Option<WebhookValues> {
    if !forecast.has_result || (silence && forecast.no_rain) {
        return None;
    }
    Some(WebhookValues {
        value1: forecast.short_summary_msg.clone(),
        value2: forecast.long_summary_msg.clone(),
        value3: Some(forecast.rain_img_url.clone()).filter(|u| !u.is_empty()),
    })
}
