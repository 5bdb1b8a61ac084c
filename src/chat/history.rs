use crate::error::AppResult;
use crate::storage::SharedStore;
use crate::types::ChatMessage;

/// Durable slot name for one user's history
pub fn history_key(prefix: &str, user_id: &str) -> String {
    format!("{prefix}{user_id}")
}

pub fn parse_history(raw: &str) -> AppResult<Vec<ChatMessage>> {
    Ok(serde_json::from_str(raw)?)
}

/// Load a user's history. A missing, unreadable or corrupt slot yields an
/// empty history; the corrupt value is left in place until the next write.
pub fn load_history(store: &SharedStore, key: &str) -> Vec<ChatMessage> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("{e}; starting with an empty history");
            return Vec::new();
        }
    };

    match parse_history(&raw) {
        Ok(messages) => messages,
        Err(e) => {
            log::warn!("discarding malformed history in '{key}': {e}");
            Vec::new()
        }
    }
}

/// Overwrite the slot with the complete list
pub fn save_history(store: &SharedStore, key: &str, messages: &[ChatMessage]) -> AppResult<()> {
    let raw = serde_json::to_string(messages)?;
    store.set(key, &raw)
}
