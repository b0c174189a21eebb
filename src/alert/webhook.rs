//! IFTTT Maker webhook relay.
//!
//! A trigger is `POST {base}/trigger/{event}/with/key/{key}` with up to
//! three free-form values as JSON. Only a 200 response carries a body worth
//! returning; any other status is reported as "no response".

use serde::Serialize;

use crate::endpoints::IFTTT_MAKER_BASE_URL;
use crate::logging::{self, DataSource};
use crate::model::WebhookError;

/// The JSON body of a trigger. `value3` is left out when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookValues {
    pub value1: String,
    pub value2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value3: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WebhookClient {
    pub fn new(client: reqwest::blocking::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Client for the public IFTTT endpoint.
    pub fn ifttt(client: reqwest::blocking::Client) -> Self {
        Self::new(client, IFTTT_MAKER_BASE_URL)
    }

    pub fn trigger_url(&self, event: &str, key: &str) -> String {
        format!(
            "{}/trigger/{}/with/key/{}",
            self.base_url.trim_end_matches('/'),
            event,
            key
        )
    }

    /// Fires `event`. Returns the relay's response text on HTTP 200.
    pub fn send(
        &self,
        event: &str,
        key: &str,
        values: &WebhookValues,
    ) -> Result<Option<String>, WebhookError> {
        let response = self
            .client
            .post(self.trigger_url(event, key))
            .json(values)
            .send()?;

        if response.status() != reqwest::StatusCode::OK {
            logging::warn(
                DataSource::Webhook,
                Some(event),
                &format!("relay answered {}", response.status()),
            );
            return Ok(None);
        }

        let text = response.text()?;
        logging::info(DataSource::Webhook, Some(event), "trigger delivered");
        Ok(Some(text))
    }
}
