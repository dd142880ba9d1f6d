pub mod csv;
pub mod gviz;

use futures::future::join_all;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::config::{Config, SheetSource, WireShape};
use crate::error::PortalError;
use crate::models::{Sheet, Snapshot, Table};
use crate::utils::http::fetch_with_retry;

const FETCH_RETRIES: u32 = 3;

/// Reads sheets from the remote feed and assembles full snapshots.
pub struct FeedClient {
    client: Client,
    base_url: Url,
}

impl FeedClient {
    pub fn new(client: Client, base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn table_url(&self, source: &SheetSource) -> anyhow::Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("spreadsheets/d/{}/gviz/tq", source.collection))?;
        let out = match source.shape {
            WireShape::Csv => "out:csv",
            WireShape::Gviz => "out:json",
        };
        url.query_pairs_mut()
            .append_pair("tqx", out)
            .append_pair("sheet", &source.sheet);
        Ok(url)
    }

    /// Fetch and decode one sheet.
    pub async fn fetch_table(
        &self,
        sheet: Sheet,
        source: &SheetSource,
    ) -> Result<Table, PortalError> {
        let fetch_error = |reason: String| PortalError::Fetch {
            sheet: sheet.key().to_string(),
            reason,
        };

        let url = self.table_url(source).map_err(|e| fetch_error(e.to_string()))?;

        let response = fetch_with_retry(&self.client, url.as_str(), FETCH_RETRIES)
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        match source.shape {
            WireShape::Csv => csv::decode_csv(&body),
            WireShape::Gviz => gviz::decode_gviz(&body),
        }
        .map_err(|e| PortalError::Parse {
            sheet: sheet.key().to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch every configured sheet concurrently.
    ///
    /// The roster is the only critical sheet: its failure fails the whole
    /// load. Any other failure degrades that one sheet to an empty table.
    pub async fn fetch_snapshot(&self, config: &Config) -> Result<Snapshot, PortalError> {
        let fetches = Sheet::ALL.iter().map(|&sheet| async move {
            let result = match config.source(sheet) {
                Some(source) => self.fetch_table(sheet, source).await,
                None => Ok(Table::default()),
            };
            (sheet, result)
        });

        let mut snapshot = Snapshot::default();
        for (sheet, result) in join_all(fetches).await {
            match result {
                Ok(table) => {
                    info!("Loaded sheet '{}' ({} rows)", sheet.key(), table.rows.len());
                    snapshot.set(sheet, table);
                }
                Err(err) if sheet.is_critical() => return Err(err),
                Err(err) => {
                    warn!("Sheet '{}' degraded to empty: {}", sheet.key(), err);
                    snapshot.set(sheet, Table::default());
                }
            }
        }
        Ok(snapshot)
    }
}
