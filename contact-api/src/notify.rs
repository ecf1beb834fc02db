//! Best-effort email notification via an HTTP mail relay.

use std::time::Duration;

use message_store::ContactMessage;
use site_config::NotifyConfig;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Forwards accepted submissions to a configured HTTP mail relay.
/// Delivery is best-effort; a failure is logged and never propagated.
pub struct Notifier {
    client: reqwest::Client,
    endpoint: String,
    to: String,
    token: Option<String>,
}

impl Notifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            to: config.to.clone(),
            token: config.token.clone(),
        }
    }

    /// Send the notification, returning whether the relay accepted it.
    pub async fn send(&self, message: &ContactMessage) -> bool {
        let payload = serde_json::json!({
            "to": self.to,
            "subject": format!("New contact message from {}", message.name),
            "text": format!(
                "Name: {}\nPhone: {}\nReceived: {}\n\n{}",
                message.name,
                message.phone,
                message.timestamp.to_rfc3339(),
                message.message,
            ),
        });

        let mut request = self
            .client
            .post(&self.endpoint)
            .timeout(RELAY_TIMEOUT)
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    "notification relay returned {} for message {}",
                    response.status(),
                    message.id
                );
                false
            }
            Err(e) => {
                tracing::warn!("could not deliver notification for message {}: {}", message.id, e);
                false
            }
        }
    }
}
