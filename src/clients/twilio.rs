use anyhow::{Context, Result, anyhow};
use reqwest::Client;

use crate::config::NotifyConfig;

const TWILIO_API: &str = "https://api.twilio.com/2010-04-01";

/// Outbound SMS alerts through the Twilio REST API.
///
/// Construction returns `None` unless all four configuration values are set,
/// so an unconfigured deployment skips notifications silently. Send failures
/// are the caller's to swallow; a missed alert must never affect the write
/// that triggered it.
pub struct SmsClient {
    http: Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    to_number: String,
}

impl SmsClient {
    #[must_use]
    pub fn from_config(config: &NotifyConfig) -> Option<Self> {
        let account_sid = config.account_sid.clone()?;
        let auth_token = config.auth_token.clone()?;
        let from_number = config.from_number.clone()?;
        let to_number = config.to_number.clone()?;

        Some(Self {
            http: Client::new(),
            account_sid,
            auth_token,
            from_number,
            to_number,
        })
    }

    pub async fn send(&self, body: &str) -> Result<()> {
        let url = format!("{TWILIO_API}/Accounts/{}/Messages.json", self.account_sid);

        let params = [
            ("Body", body),
            ("From", self.from_number.as_str()),
            ("To", self.to_number.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .context("Failed to reach SMS provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("SMS provider returned {status}: {detail}"));
        }

        Ok(())
    }
}
