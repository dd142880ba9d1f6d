use anyhow::Result;
use async_trait::async_trait;

use crate::models::Snapshot;

mod sqlite;
pub use sqlite::SqliteCache;

/// Best-effort local persistence of the last good snapshot, plus the active
/// session identifier so revisits skip the identifier gate.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn migrate(&self) -> Result<()>;
    async fn load(&self) -> Result<Option<Snapshot>>;
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
    async fn clear(&self) -> Result<()>;
    async fn active_nis(&self) -> Result<Option<String>>;
    async fn set_active_nis(&self, nis: Option<&str>) -> Result<()>;
}
