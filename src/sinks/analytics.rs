//! Remote analytics notifier.
//!
//! Each event is reported as one or two facts, each POSTed as JSON
//! `{dimension1, dimension2, dimension3}` with basic auth:
//! - door transitions: `{"Door", "HH:MM:SS", 5 | -5}`
//! - always: `{"Celsius", "HH:MM:SS", temperature}`

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Notifier;
use crate::analysis::DoorEvent;
use crate::config::RemoteConfig;
use crate::error::SinkError;

/// One analytics data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsFact {
    pub dimension1: String,
    pub dimension2: String,
    pub dimension3: serde_json::Value,
}

/// Facts reported for an event, door fact first.
pub fn facts_for(event: &DoorEvent) -> Vec<AnalyticsFact> {
    let time = event.time_of_day();
    let mut facts = Vec::with_capacity(2);
    if let Some(indicator) = event.kind.door_indicator() {
        facts.push(AnalyticsFact {
            dimension1: "Door".to_string(),
            dimension2: time.clone(),
            dimension3: serde_json::Value::from(indicator),
        });
    }
    facts.push(AnalyticsFact {
        dimension1: "Celsius".to_string(),
        dimension2: time,
        dimension3: serde_json::Value::from(event.temperature_celsius),
    });
    facts
}

/// Blocking HTTP notifier with a bounded request timeout.
pub struct AnalyticsNotifier {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl AnalyticsNotifier {
    pub fn new(config: &RemoteConfig) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|err| SinkError::NotifierSetup {
                details: err.to_string(),
            })?;
        if config.accept_invalid_certs {
            warn!(url = %config.url, "TLS certificate validation disabled for analytics endpoint");
        }
        Ok(Self {
            client,
            url: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn post(&self, fact: &AnalyticsFact) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .json(fact)
            .send()
            .map_err(|err| SinkError::NotifyFailed {
                status: err.status().map(|status| status.as_u16()),
                details: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::NotifyFailed {
                status: Some(status.as_u16()),
                details: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }
        Ok(())
    }
}

impl Notifier for AnalyticsNotifier {
    /// Post every fact for the event; all facts are attempted even if one
    /// fails, and the first failure is returned.
    fn notify(&mut self, event: &DoorEvent) -> Result<(), SinkError> {
        let mut first_error = None;
        for fact in facts_for(event) {
            match self.post(&fact) {
                Ok(()) => debug!(dimension = %fact.dimension1, time = %fact.dimension2, "Posted analytics fact"),
                Err(err) => {
                    warn!(dimension = %fact.dimension1, error = %err, "Analytics post failed");
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        format!("analytics:{}", self.url)
    }
}
