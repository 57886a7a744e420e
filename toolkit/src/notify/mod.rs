// Transient user-facing messages. Each notify call inserts an independent
// notification and schedules its own fade and removal; rapid calls stack.

pub mod surface;

pub use surface::{Board, ConsoleSurface, Surface, VisibleNotification};

use crate::config::NotificationSettings;
use chrono::{DateTime, Utc};
use shared::models::NotificationKind;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(Uuid);

impl NotificationId {
    fn new() -> Self {
        NotificationId(Uuid::new_v4())
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: &str, kind: NotificationKind) -> Self {
        Self {
            id: NotificationId::new(),
            message: message.to_string(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// HTML fragment for embedding in a page. The message is escaped.
    pub fn markup(&self) -> String {
        format!(
            concat!(
                r#"<div class="fixed top-4 right-4 p-4 rounded-lg shadow-lg z-50 fade-in {classes}">"#,
                r#"<div class="flex items-center">"#,
                r#"<i class="fas fa-{icon} mr-2"></i>"#,
                r#"<span>{message}</span>"#,
                r#"</div></div>"#
            ),
            classes = self.kind.css_classes(),
            icon = self.kind.icon(),
            message = ammonia::clean_text(&self.message),
        )
    }
}

/// When a notification starts fading and when it is removed, both measured
/// from the `notify` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissTiming {
    pub display: Duration,
    pub fade: Duration,
}

impl Default for DismissTiming {
    fn default() -> Self {
        DismissTiming {
            display: Duration::from_millis(3000),
            fade: Duration::from_millis(300),
        }
    }
}

impl From<&NotificationSettings> for DismissTiming {
    fn from(settings: &NotificationSettings) -> Self {
        DismissTiming {
            display: settings.display(),
            fade: settings.fade(),
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    surface: Arc<dyn Surface>,
    timing: DismissTiming,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier").field("timing", &self.timing).finish_non_exhaustive()
    }
}

impl Notifier {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            surface,
            timing: DismissTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: DismissTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn timing(&self) -> DismissTiming {
        self.timing
    }

    /// Shows `message` and schedules its dismissal. Never fails.
    pub fn notify(&self, message: &str, kind: NotificationKind) {
        let notification = Notification::new(message, kind);
        let id = notification.id;
        tracing::debug!(%id, %kind, text = message, "Showing notification");
        self.surface.insert(notification);

        // Dismissal needs a timer; without a runtime the notification stays up.
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%id, "No async runtime available, notification will not auto-dismiss");
            return;
        };

        let fade_at = Instant::now() + self.timing.display;
        let remove_at = fade_at + self.timing.fade;
        let surface = Arc::clone(&self.surface);
        runtime.spawn(async move {
            sleep_until(fade_at).await;
            tracing::debug!(%id, "Fading notification");
            surface.fade(id);
            sleep_until(remove_at).await;
            tracing::debug!(%id, "Removing notification");
            surface.remove(id);
        });
    }

    pub fn success(&self, message: &str) {
        self.notify(message, NotificationKind::Success);
    }

    pub fn error(&self, message: &str) {
        self.notify(message, NotificationKind::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_notifier() -> (Arc<Board>, Notifier) {
        let board = Arc::new(Board::new());
        let notifier = Notifier::new(board.clone());
        (board, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_notification_lifecycle() {
        let (board, notifier) = board_notifier();
        assert!(board.is_empty());

        notifier.notify("x", NotificationKind::Error);

        let visible = board.snapshot();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].notification.kind, NotificationKind::Error);
        assert_eq!(visible[0].notification.message, "x");
        assert!(!visible[0].faded);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(board.len(), 1);
        assert!(!board.snapshot()[0].faded);

        tokio::time::sleep(Duration::from_millis(2)).await; // 3001ms
        assert_eq!(board.len(), 1);
        assert!(board.snapshot()[0].faded);

        tokio::time::sleep(Duration::from_millis(300)).await; // 3301ms
        assert!(board.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_stack_and_expire_independently() {
        let (board, notifier) = board_notifier();

        notifier.success("first");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        notifier.error("second");
        notifier.success("second"); // no dedup

        let messages: Vec<String> = board
            .snapshot()
            .into_iter()
            .map(|v| v.notification.message)
            .collect();
        assert_eq!(messages, vec!["first", "second", "second"]);

        // first one is gone at 3300ms, the later two stay until 4300ms
        tokio::time::sleep(Duration::from_millis(2400)).await; // 3400ms
        assert_eq!(board.len(), 2);
        assert_eq!(board.count_of(NotificationKind::Error), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await; // 4400ms
        assert!(board.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_timing() {
        let (board, notifier) = board_notifier();
        let notifier = notifier.with_timing(DismissTiming {
            display: Duration::from_millis(100),
            fade: Duration::from_millis(50),
        });

        notifier.success("quick");
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(board.snapshot()[0].faded);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(board.is_empty());
    }

    #[test]
    fn test_notify_without_runtime_stays_visible() {
        let (board, notifier) = board_notifier();
        notifier.error("no timer");
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_markup_escapes_message() {
        let notification = Notification::new("<b>Saved</b> & done", NotificationKind::Success);
        let markup = notification.markup();
        assert!(markup.contains("bg-green-500 text-white"));
        assert!(markup.contains("fa-check-circle"));
        assert!(!markup.contains("<b>"));
        // ammonia escapes the slash as well
        assert!(markup.contains("&lt;b&gt;Saved&lt;&#47;b&gt;"));
    }

    #[test]
    fn test_error_markup_style() {
        let markup = Notification::new("Failed", NotificationKind::Error).markup();
        assert!(markup.contains("bg-red-500"));
        assert!(markup.contains("fa-exclamation-circle"));
    }

    #[test]
    fn test_timing_from_settings() {
        let settings = NotificationSettings {
            display_ms: 5000,
            fade_ms: 500,
        };
        let timing = DismissTiming::from(&settings);
        assert_eq!(timing.display, Duration::from_secs(5));
        assert_eq!(timing.fade, Duration::from_millis(500));
    }
}
