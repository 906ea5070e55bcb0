use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::CalendarProvider;
use crate::models::{CalendarEvent, TimeWindow};

/// Google-Calendar-shaped REST backend, reached with a bearer token.
pub struct GoogleCalendarProvider {
    base_url: String,
    calendar_id: String,
    token: String,
    client: reqwest::Client,
}

impl GoogleCalendarProvider {
    pub fn new(base_url: String, calendar_id: String, token: String, timeout: Duration) -> Self {
        Self {
            base_url,
            calendar_id,
            token,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn list_events(&self, window: &TimeWindow) -> anyhow::Result<Vec<CalendarEvent>> {
        let resp = self
            .client
            .get(self.events_url())
            .bearer_auth(&self.token)
            .query(&[
                ("timeMin", window.start().to_rfc3339()),
                ("timeMax", window.end().to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .context("failed to call calendar list API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse calendar list response")?;

        if !status.is_success() {
            anyhow::bail!("calendar list error ({}): {}", status, data);
        }

        let events = data["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| CalendarEvent {
                        title: item["summary"].as_str().unwrap_or("(untitled)").to_string(),
                        start: item["start"]["dateTime"]
                            .as_str()
                            .or_else(|| item["start"]["date"].as_str())
                            .unwrap_or_default()
                            .to_string(),
                        end: item["end"]["dateTime"]
                            .as_str()
                            .or_else(|| item["end"]["date"].as_str())
                            .unwrap_or_default()
                            .to_string(),
                        link: item["htmlLink"].as_str().map(|s| s.to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(events)
    }

    async fn insert_event(&self, title: &str, window: &TimeWindow) -> anyhow::Result<String> {
        let tz_name = window.start().timezone().name();
        let body = json!({
            "summary": title,
            "start": { "dateTime": window.start().to_rfc3339(), "timeZone": tz_name },
            "end": { "dateTime": window.end().to_rfc3339(), "timeZone": tz_name },
        });

        let resp = self
            .client
            .post(self.events_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("failed to call calendar insert API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse calendar insert response")?;

        if !status.is_success() {
            anyhow::bail!("calendar insert error ({}): {}", status, data);
        }

        data["htmlLink"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing htmlLink in calendar insert response"))
    }
}
