// Places where notifications are shown: an in-memory board and the console.
use super::{Notification, NotificationId};
use shared::models::NotificationKind;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The visible document a notifier mutates.
pub trait Surface: Send + Sync {
    fn insert(&self, notification: Notification);
    /// Starts the fade-out (opacity 0). Unknown ids are ignored.
    fn fade(&self, id: NotificationId);
    /// Unknown ids are ignored.
    fn remove(&self, id: NotificationId);
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleNotification {
    pub notification: Notification,
    pub faded: bool,
}

/// In-memory set of currently visible notifications, in display order.
#[derive(Debug, Default)]
pub struct Board {
    visible: Mutex<Vec<VisibleNotification>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<VisibleNotification>> {
        self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<VisibleNotification> {
        self.entries().clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.entries()
            .iter()
            .filter(|v| v.notification.kind == kind)
            .count()
    }
}

impl Surface for Board {
    fn insert(&self, notification: Notification) {
        self.entries().push(VisibleNotification {
            notification,
            faded: false,
        });
    }

    fn fade(&self, id: NotificationId) {
        if let Some(entry) = self.entries().iter_mut().find(|v| v.notification.id == id) {
            entry.faded = true;
        }
    }

    fn remove(&self, id: NotificationId) {
        self.entries().retain(|v| v.notification.id != id);
    }
}

/// Writes notifications to stderr as they appear. Dismissal is only logged.
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl ConsoleSurface {
    fn line(notification: &Notification) -> String {
        let marker = match notification.kind {
            NotificationKind::Success => "[ok]",
            NotificationKind::Error => "[error]",
        };
        format!("{} {}", marker, notification.message)
    }
}

impl Surface for ConsoleSurface {
    fn insert(&self, notification: Notification) {
        eprintln!("{}", Self::line(&notification));
    }

    fn fade(&self, id: NotificationId) {
        tracing::trace!(%id, "Console notification faded");
    }

    fn remove(&self, id: NotificationId) {
        tracing::trace!(%id, "Console notification removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_fade_and_remove_by_id() {
        let board = Board::new();
        let first = Notification::new("one", NotificationKind::Success);
        let second = Notification::new("two", NotificationKind::Error);
        let first_id = first.id;
        let second_id = second.id;
        board.insert(first);
        board.insert(second);

        board.fade(second_id);
        let snapshot = board.snapshot();
        assert!(!snapshot[0].faded);
        assert!(snapshot[1].faded);

        board.remove(first_id);
        assert_eq!(board.len(), 1);
        assert_eq!(board.snapshot()[0].notification.message, "two");
    }

    #[test]
    fn test_board_ignores_unknown_ids() {
        let board = Board::new();
        board.insert(Notification::new("kept", NotificationKind::Success));
        let stranger = Notification::new("never inserted", NotificationKind::Error);
        board.fade(stranger.id);
        board.remove(stranger.id);
        assert_eq!(board.len(), 1);
        assert!(!board.snapshot()[0].faded);
    }

    #[test]
    fn test_console_line_marks_kind() {
        let ok = Notification::new("Saved", NotificationKind::Success);
        let err = Notification::new("No data to export", NotificationKind::Error);
        assert_eq!(ConsoleSurface::line(&ok), "[ok] Saved");
        assert_eq!(ConsoleSurface::line(&err), "[error] No data to export");
    }
}
