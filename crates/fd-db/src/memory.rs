use super::*;
use std::sync::Mutex;

/// In-process store with the same ranking contract as [`Postgres`].
/// Backs unit tests; production always runs on the durable store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<RetiredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn save(&self, record: &RetiredRecord) -> anyhow::Result<()> {
        self.records.lock().expect("store poisoned").push(record.clone());
        Ok(())
    }
    async fn query(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<RetiredRecord>> {
        let mut records = self.records.lock().expect("store poisoned").clone();
        records.sort_by(|a, b| a.rank().cmp(&b.rank()));
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
