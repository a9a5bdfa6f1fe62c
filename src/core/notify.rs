use tokio::sync::broadcast;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

/// A transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Fan-out of toasts to whichever views are listening. Sending with no
/// listener is not an error; the toast is simply dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "notify");
        self.publish(Level::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "notify");
        self.publish(Level::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        error!(%message, "notify");
        self.publish(Level::Error, message);
    }

    fn publish(&self, level: Level, message: String) {
        let _ = self.tx.send(Notification { level, message });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_every_subscriber() {
        let notifier = Notifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.error("Failed to load patient data");

        assert_eq!(first.recv().await.unwrap().level, Level::Error);
        assert_eq!(second.recv().await.unwrap().message, "Failed to load patient data");
    }

    #[test]
    fn publishing_without_listeners_is_silent() {
        Notifier::default().success("Backend is connected!");
    }
}
