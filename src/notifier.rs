use serde_json::json;

use crate::error::SlabError;
use crate::logging::log_info;
use crate::vendors::canonical::Slab;

/// One announcement: the slab summary plus its photo
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub content: String,
    pub image_url: String,
}

impl From<&Slab> for Notification {
    fn from(slab: &Slab) -> Self {
        Self {
            content: slab.to_string(),
            image_url: slab.photo.clone(),
        }
    }
}

/// Posts notifications to a Discord-style webhook
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    username: String,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            username: username.into(),
        }
    }

    pub async fn send(&self, notification: &Notification) -> Result<(), SlabError> {
        let payload = json!({
            "username": self.username,
            "content": notification.content,
            "embeds": [{ "image": { "url": notification.image_url } }],
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SlabError::Notify(format!("webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SlabError::Notify(format!(
                "webhook answered {}: {}",
                status, error_text
            )));
        }

        log_info("notifier", &format!("Announced: {}", notification.content)).unwrap_or_default();
        Ok(())
    }
}
