/// Client-side identifier generation for records created without a store.
use uuid::Uuid;

use crate::types::RecordId;

/// Generate a random version-4 UUID string.
pub fn generate() -> RecordId {
    Uuid::new_v4().to_string()
}

pub fn is_valid(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}
