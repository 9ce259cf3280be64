use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient banner shown to the person filling in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub dismiss_after_ms: u64,
}

/// Builds the standard banners with a shared dismiss delay.
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) -> Notification {
        Notification {
            level,
            message: message.into(),
            dismiss_after_ms: u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn prediction_failed(&self) -> Notification {
        self.notify(
            NotificationLevel::Error,
            "Prediction failed. Please try again.",
        )
    }

    pub fn saved_to_wishlist(&self) -> Notification {
        self.notify(NotificationLevel::Success, "✓ Saved to Wishlist")
    }

    /// Search is a placeholder: it announces the query and reports no hits.
    /// A blank query produces no banners.
    pub fn search(&self, query: &str) -> Vec<Notification> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        vec![
            self.notify(
                NotificationLevel::Info,
                format!("Searching for \"{query}\"..."),
            ),
            self.notify(
                NotificationLevel::Info,
                format!("Found 0 results for \"{query}\". This is a demo interface."),
            ),
        ]
    }

    pub fn navigation(&self, link: &str) -> Notification {
        self.notify(
            NotificationLevel::Info,
            format!("Navigating to {}... This is a demo interface.", link.trim()),
        )
    }

    pub fn opening_saved(&self) -> Notification {
        self.notify(
            NotificationLevel::Info,
            "Opening My Predictions... This is a demo interface.",
        )
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(4000))
    }
}
