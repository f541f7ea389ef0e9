//! Dashboard overview counters.

use serde::{Deserialize, Serialize};

/// `GET /api/stats` response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub users: i64,
    pub events: i64,
    pub images: i64,
    /// Face embeddings are only known to the upstream API; `None` when it is unreachable.
    pub embeddings: Option<i64>,
}

/// Envelope returned by the upstream `/api/admin/stats`.
#[derive(Debug, Deserialize)]
pub struct UpstreamStatsEnvelope {
    pub status: String,
    pub data: Option<UpstreamStats>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamStats {
    pub total_face_embeddings: i64,
}

impl UpstreamStatsEnvelope {
    /// The embeddings count, if the envelope reports success.
    pub fn embeddings(&self) -> Option<i64> {
        if self.status != "success" {
            return None;
        }
        self.data.as_ref().map(|d| d.total_face_embeddings)
    }
}
