use serde::Serialize;
use std::time::Duration;

use crate::constants::*;
use crate::models::NotificationChannel;
use crate::utils::JobError;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SmsPayload<'a> {
    to: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailPayload<'a> {
    to: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Client for the notification gateway which owns the actual SMS and
/// email provider integrations. The gateway renders nothing, it gets the
/// final message text.
pub struct NotificationClient {
    base_url: String,
    client: reqwest::Client,
}

#[cfg_attr(test, automock)]
impl NotificationClient {
    pub fn new() -> Self {
        let base_url = std::env::var("NOTIFICATION_SERVICE_URL")
            .unwrap_or(NOTIFICATION_SERVICE_URL.to_owned());
        let timeout = Duration::from_secs(REQUEST_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Unable to build notification gateway client");
        Self { base_url, client }
    }

    /// Delivers a single rendered message through the gateway
    pub async fn send(
        &self,
        channel: NotificationChannel,
        to: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), JobError> {
        let response = match channel {
            NotificationChannel::SMS => {
                let url = format!("{}/sms", self.base_url);
                let payload = SmsPayload { to, message };
                self.client.post(url).json(&payload).send().await?
            }
            NotificationChannel::EMAIL => {
                let url = format!("{}/email", self.base_url);
                let payload = EmailPayload {
                    to,
                    subject,
                    message,
                };
                self.client.post(url).json(&payload).send().await?
            }
        };
        let status = response.status();
        if !status.is_success() {
            return Err(JobError::GatewayStatus(status));
        }
        Ok(())
    }
}
