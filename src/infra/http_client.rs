use crate::app::ports::SheetSourcePort;
use crate::config::SourceConfig;
use crate::error::{Result, SyncError};
use std::time::Duration;
use tracing::{info, instrument};

/// Downloads the published sheet as CSV over HTTP.
pub struct ReqwestSheetSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl ReqwestSheetSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            url: config.csv_url.clone(),
        })
    }
}

impl SheetSourcePort for ReqwestSheetSource {
    #[instrument(skip(self), fields(url = %self.url))]
    fn fetch_csv(&self) -> Result<String> {
        info!("📥 Downloading CSV from sheet...");
        let resp = self.client.get(&self.url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        let bytes = resp.bytes()?.to_vec();
        info!("HTTP response: status={}, size={} bytes", status.as_u16(), bytes.len());
        Ok(String::from_utf8(bytes)?)
    }
}
