use super::*;

/// Append + ranked paginated read over retired-player records.
///
/// Implementations serialize their own writes; callers already run under
/// the engine lock, so a single connection suffices.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends one record.
    async fn save(&self, record: &RetiredRecord) -> anyhow::Result<()>;
    /// Reads a page of records ordered by (score DESC, play time ASC,
    /// name ASC). Limits above the façade cap never reach the store.
    async fn query(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<RetiredRecord>>;
    /// Cheap liveness probe for health endpoints.
    async fn ping(&self) -> anyhow::Result<()>;
}
