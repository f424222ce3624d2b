use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, info};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{Error, Result};
use crate::parser::parse_schedule;
use crate::{Config, Schedule};

/// Fetches and extracts the timetable. Holds no state between calls besides
/// the HTTP client.
pub struct Proxy {
    config: Config,
    source: Url,
    client: Client,
}

impl Proxy {
    pub fn new(config: Config) -> Result<Self> {
        let source = Url::parse(&config.source_url)?;
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(Error::Fetch)?;

        Ok(Self {
            config,
            source,
            client,
        })
    }

    /// The current wall-clock time in the configured zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.config.utc_offset)
    }

    pub async fn fetch_html(&self) -> Result<String> {
        debug!("Fetching {}", self.config.source_url);

        let response = self
            .client
            .get(self.source.clone())
            .send()
            .await
            .map_err(Error::Fetch)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UpstreamStatus(status));
        }

        response.text().await.map_err(Error::Body)
    }

    /// One full pass over the source page, anchored to the week containing `now`.
    pub async fn fetch_schedule_at(&self, now: DateTime<FixedOffset>) -> Result<Schedule> {
        let html = self.fetch_html().await?;
        let schedule = parse_schedule(html, &self.config.tables, &self.source, now);

        info!("Extracted {} classes from {}", schedule.len(), self.config.source_url);
        Ok(schedule)
    }

    pub async fn fetch_schedule(&self) -> Result<Schedule> {
        self.fetch_schedule_at(self.now()).await
    }
}
