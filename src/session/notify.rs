use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient toast-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub message: Option<String>,
    pub duration_ms: u64,
}

pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Writes notifications to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        let marker = match notification.level {
            NoticeLevel::Success => "\u{2713}",
            NoticeLevel::Error => "\u{2717}",
        };
        match &notification.message {
            Some(message) => eprintln!("{} {}: {}", marker, notification.title, message),
            None => eprintln!("{} {}", marker, notification.title),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
