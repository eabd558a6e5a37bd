//! Transient notifications shown in the status bar

use std::time::Duration;

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::admin_tui::ui::Styles;

/// Types of notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Notification with kind and content
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl Notification {
    pub fn new(message: String, kind: NotificationKind) -> Self {
        Self {
            message,
            kind,
            timestamp: chrono::Local::now(),
        }
    }

    pub fn info(message: String) -> Self {
        Self::new(message, NotificationKind::Info)
    }

    pub fn success(message: String) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn warning(message: String) -> Self {
        Self::new(message, NotificationKind::Warning)
    }

    pub fn error(message: String) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    fn icon(&self) -> &'static str {
        match self.kind {
            NotificationKind::Info => "ℹ",
            NotificationKind::Success => "✓",
            NotificationKind::Warning => "⚠",
            NotificationKind::Error => "✗",
        }
    }
}

/// Current notification plus a bounded history of past ones
pub struct Notifications {
    current: Option<Notification>,
    history: Vec<Notification>,
    max_history: usize,
    show_timestamp: bool,
    auto_clear_timeout: Option<Duration>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            current: None,
            history: Vec::new(),
            max_history: 100,
            show_timestamp: false,
            auto_clear_timeout: None,
        }
    }
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamp = true;
        self
    }

    pub fn with_auto_clear(mut self, timeout: Duration) -> Self {
        self.auto_clear_timeout = Some(timeout);
        self
    }

    pub fn push(&mut self, notification: Notification) {
        self.archive_current();
        self.current = Some(notification);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::info(message.into()));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::success(message.into()));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::warning(message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::error(message.into()));
    }

    pub fn clear(&mut self) {
        self.archive_current();
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current.take() {
            self.history.push(current);
            if self.history.len() > self.max_history {
                self.history.remove(0);
            }
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[Notification] {
        &self.history
    }

    /// Every notification shown so far, oldest first, including the current one
    pub fn all(&self) -> impl Iterator<Item = &Notification> {
        self.history.iter().chain(self.current.iter())
    }

    /// Clear the current notification once it has been visible long enough
    pub fn expire(&mut self) -> bool {
        let expired = match (self.auto_clear_timeout, &self.current) {
            (Some(timeout), Some(current)) => {
                let elapsed = chrono::Local::now().signed_duration_since(current.timestamp);
                elapsed.to_std().unwrap_or_default() > timeout
            }
            _ => false,
        };
        if expired {
            self.clear();
        }
        expired
    }

    fn format(&self, notification: &Notification) -> String {
        if self.show_timestamp {
            format!(
                "{} [{}] {}",
                notification.icon(),
                notification.timestamp.format("%H:%M:%S"),
                notification.message
            )
        } else {
            format!("{} {}", notification.icon(), notification.message)
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, hint: &str) {
        let (content, style) = match &self.current {
            Some(n) => {
                let style = match n.kind {
                    NotificationKind::Info => Styles::info(),
                    NotificationKind::Success => Styles::success(),
                    NotificationKind::Warning => Styles::warning(),
                    NotificationKind::Error => Styles::error(),
                };
                (self.format(n), style)
            }
            None => (hint.to_string(), Styles::inactive()),
        };

        let paragraph = Paragraph::new(content).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );

        f.render_widget(paragraph, area);
    }
}
