//! Alerting layer for tracing.
//!
//! Events at or above the configured level (ERROR by default) are queued
//! and dispatched by a background task, so a failed compensation or a lost
//! database connection surfaces outside the log stream.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

/// One alert raised from a tracing event.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub service: String,
    pub level: Level,
    pub message: String,
    pub target: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub fields: Vec<(String, String)>,
}

impl AlertMessage {
    /// Single-line rendering used by every sender.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "[{}] {} {}: {}",
            self.service, self.level, self.target, self.message
        );
        for (name, value) in &self.fields {
            text.push_str(&format!(" {}={}", name, value));
        }
        text
    }
}

#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub service_name: String,
    /// Least severe level that raises an alert.
    pub min_level: Level,
    /// Alerts beyond this many pending are dropped.
    pub buffer_size: usize,
}

impl AlertConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            min_level: Level::ERROR,
            buffer_size: 100,
        }
    }
}

/// Destination for alerts.
#[async_trait::async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Failed to send alert: {0}")]
    SendError(String),
}

/// Writes alerts to stderr.
pub struct ConsoleAlertSender;

#[async_trait::async_trait]
impl AlertSender for ConsoleAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        eprintln!("ALERT {} at {}", alert.summary(), alert.timestamp.to_rfc3339());
        Ok(())
    }
}

/// Posts alerts as `{"text": ...}` to a chat webhook.
pub struct WebhookAlertSender {
    url: String,
    client: reqwest::Client,
}

impl WebhookAlertSender {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl AlertSender for WebhookAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        let payload = serde_json::json!({
            "text": alert.summary(),
            "timestamp": alert.timestamp.to_rfc3339(),
        });

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AlertError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Tracing layer feeding alerts to an [`AlertSender`].
pub struct AlertLayer {
    sender: mpsc::Sender<AlertMessage>,
    config: AlertConfig,
}

impl AlertLayer {
    /// Must be called inside a tokio runtime.
    pub fn new(config: AlertConfig, alert_sender: Arc<dyn AlertSender>) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertMessage>(config.buffer_size.max(1));

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                if let Err(e) = alert_sender.send(alert).await {
                    // Not through tracing: this would re-enter the layer.
                    eprintln!("{}", e);
                }
            }
        });

        Self { sender: tx, config }
    }

    pub fn console(config: AlertConfig) -> Self {
        Self::new(config, Arc::new(ConsoleAlertSender))
    }

    pub fn webhook(config: AlertConfig, url: String) -> Self {
        Self::new(config, Arc::new(WebhookAlertSender::new(url)))
    }

    fn should_alert(&self, level: &Level) -> bool {
        // Level ordering: ERROR is the "smallest".
        *level <= self.config.min_level
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.should_alert(metadata.level()) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let alert = AlertMessage {
            service: self.config.service_name.clone(),
            level: *metadata.level(),
            message: visitor.message,
            target: metadata.target().to_string(),
            timestamp: chrono::Utc::now(),
            fields: visitor.fields,
        };

        // Full buffer: drop rather than block the logging thread.
        let _ = self.sender.try_send(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;
    use tracing_subscriber::layer::SubscriberExt;

    struct Collect(Arc<Mutex<Vec<AlertMessage>>>);

    #[async_trait::async_trait]
    impl AlertSender for Collect {
        async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
            self.0.lock().await.push(alert);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_only_errors_are_forwarded() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let layer = AlertLayer::new(AlertConfig::new("blog-api"), Arc::new(Collect(seen.clone())));
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("just a warning");
            tracing::error!(tag_id = "t1", "compensation failed");
        });

        for _ in 0..50 {
            if !seen.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let alerts = seen.lock().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "compensation failed");
        assert_eq!(alerts[0].service, "blog-api");
        assert!(alerts[0].summary().contains("tag_id=t1"));
    }
}
