use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored contact-form submission.
///
/// Field names are camelCase on the wire and in the store file. `ip` and
/// `userAgent` are stamped from request headers at submission time and
/// default to "unknown" rather than being omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    /// Milliseconds since the epoch at submission time, as a decimal
    /// string. Unique among stored messages (see `MessageStore::append`).
    pub id: String,
    pub name: String,
    pub phone: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ContactMessage {
    /// Build a message from form input, trimming each field and stamping
    /// the id and timestamp from the current clock reading.
    pub fn new(name: &str, phone: &str, message: &str) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            message: message.trim().to_string(),
            timestamp: now,
            ip: None,
            user_agent: None,
        }
    }
}
