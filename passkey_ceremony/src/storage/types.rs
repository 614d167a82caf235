use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data stored in the cache, with the instant it stops being valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheData {
    pub(crate) value: String,
    pub(crate) expires_at: DateTime<Utc>,
}
