//! HTTP trigger endpoint.
//!
//! External automation (an IFTTT applet, cron + curl, a phone shortcut)
//! hits a GET route, the matching check runs on the blocking pool, and a
//! short plain-text acknowledgement is returned. Every route except
//! `/health` refuses to run unless the IFTTT key has the right length.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;

use crate::checks::{Check, WeatherChecks};
use crate::endpoints::IFTTT_KEY_LEN;
use crate::logging::{self, DataSource};

pub const WRONG_OPTION: &str = "Please specify the correct option";
pub const WRONG_OPTION_OR_KEY: &str = "Please specify the correct option & Key";
pub const SILENCE_SUFFIX: &str = " (Silence)";

#[derive(Clone)]
pub struct AppState {
    pub checks: Arc<dyn WeatherChecks>,
    /// Key used by routes that do not carry one.
    pub api_key: Option<String>,
}

fn valid_key(key: &str) -> bool {
    key.chars().count() == IFTTT_KEY_LEN
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/iftttbot/rainforecast/silence", get(rain_silence))
        .route("/iftttbot/rainforcast/silence", get(rain_silence))
        .route("/iftttbot/{option}", get(trigger_with_server_key))
        .route("/iftttbot/{option}/{apikey}", get(trigger_with_caller_key))
        .fallback(|| async { "Error" })
        .with_state(state)
}

async fn trigger_with_server_key(
    State(state): State<AppState>,
    Path(option): Path<String>,
) -> Response {
    let key = state.api_key.clone().filter(|k| valid_key(k));
    match (option.parse::<Check>(), key) {
        (Ok(check), Some(key)) => run_check(&state, check, key, false).await,
        _ => WRONG_OPTION.into_response(),
    }
}

async fn trigger_with_caller_key(
    State(state): State<AppState>,
    Path((option, apikey)): Path<(String, String)>,
) -> Response {
    match option.parse::<Check>() {
        Ok(check) if valid_key(&apikey) => run_check(&state, check, apikey, false).await,
        _ => WRONG_OPTION_OR_KEY.into_response(),
    }
}

async fn rain_silence(State(state): State<AppState>) -> Response {
    let Some(key) = state.api_key.clone().filter(|k| valid_key(k)) else {
        return WRONG_OPTION.into_response();
    };
    match execute(&state, Check::RainForecast, key, true).await {
        Ok(message) => format!("{message}{SILENCE_SUFFIX}").into_response(),
        Err(response) => response,
    }
}

async fn run_check(state: &AppState, check: Check, key: String, silence: bool) -> Response {
    match execute(state, check, key, silence).await {
        Ok(message) => message.into_response(),
        Err(response) => response,
    }
}

/// Runs a check on the blocking pool. Errors come back as a ready 500.
async fn execute(
    state: &AppState,
    check: Check,
    key: String,
    silence: bool,
) -> Result<&'static str, Response> {
    logging::info(DataSource::Server, Some(&check.to_string()), "check triggered");

    let checks = Arc::clone(&state.checks);
    let joined = tokio::task::spawn_blocking(move || checks.run(check, &key, silence)).await;

    match joined {
        Ok(Ok(message)) => Ok(message),
        Ok(Err(e)) => {
            logging::error(DataSource::Server, Some(&check.to_string()), &e.to_string());
            Err((StatusCode::INTERNAL_SERVER_ERROR, format!("Check failed: {e}")).into_response())
        }
        Err(e) => {
            logging::error(DataSource::Server, Some(&check.to_string()), &e.to_string());
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// Binds and serves until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    logging::info(
        DataSource::Server,
        None,
        &format!("listening on {}", listener.local_addr()?),
    );
    axum::serve(listener, create_router(state)).await
}
