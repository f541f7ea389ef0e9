//! Row ID generation.
//!
//! Events and images use UUID v7: unique without coordination and sortable by
//! creation time, so the newest-first listings agree with primary-key order.

use uuid::Uuid;

/// Generate a new time-sortable ID.
pub fn generate_id() -> Uuid {
    Uuid::now_v7()
}
