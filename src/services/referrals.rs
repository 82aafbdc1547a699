use crate::models::ReferralRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keyed storage for created referrals
#[async_trait]
pub trait ReferralStore: Send + Sync {
    async fn insert(&self, record: ReferralRecord);

    async fn get(&self, referral_id: &str) -> Option<ReferralRecord>;

    async fn len(&self) -> usize;
}

/// Process-lifetime referral store
///
/// Unbounded: records are never evicted and do not expire, so memory grows
/// with every referral until the process restarts.
#[derive(Debug, Default)]
pub struct InMemoryReferralStore {
    records: RwLock<HashMap<String, ReferralRecord>>,
}

impl InMemoryReferralStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReferralStore for InMemoryReferralStore {
    async fn insert(&self, record: ReferralRecord) {
        let mut records = self.records.write().await;
        tracing::trace!("Storing referral {}", record.referral_id);
        records.insert(record.referral_id.clone(), record);
    }

    async fn get(&self, referral_id: &str) -> Option<ReferralRecord> {
        self.records.read().await.get(referral_id).cloned()
    }

    async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}
