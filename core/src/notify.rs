//! Transient success/error banners.
//!
//! The core never renders anything itself: a [`Notifier`] receives each
//! notice and the host decides how to show it. [`NoticeQueue`] is the stock
//! implementation, buffering notices until the host drains them.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

/// How long a banner stays on screen before it dismisses itself.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(4500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Screen corner a banner is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    pub placement: Placement,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Sink for user-facing notices. Reporting is best-effort and cannot fail.
pub trait Notifier {
    fn push(&mut self, notice: Notice);

    fn success(&mut self, title: &str, message: &str, placement: Option<Placement>) {
        self.push(Notice {
            level: NoticeLevel::Success,
            title: title.to_string(),
            message: message.to_string(),
            placement: placement.unwrap_or_default(),
            duration: DEFAULT_DURATION,
        });
    }

    fn error(&mut self, title: &str, message: &str, placement: Option<Placement>) {
        self.push(Notice {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.to_string(),
            placement: placement.unwrap_or_default(),
            duration: DEFAULT_DURATION,
        });
    }
}

/// Buffers notices for the host to render.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything reported since the last call, oldest first.
    pub fn take(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }

    pub fn peek(&self) -> impl Iterator<Item = &Notice> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Notifier for NoticeQueue {
    fn push(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                tracing::info!(title = %notice.title, message = %notice.message, "notice")
            }
            NoticeLevel::Error => {
                tracing::warn!(title = %notice.title, message = %notice.message, "notice")
            }
        }
        self.pending.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_order() {
        let mut q = NoticeQueue::new();
        q.success("Student deleted", "Student Tom was deleted", None);
        q.error("There was an issue", "boom", Some(Placement::BottomLeft));
        assert_eq!(q.len(), 2);
        let titles: Vec<&str> = q.peek().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Student deleted", "There was an issue"]);
        assert_eq!(q.len(), 2, "peek leaves notices queued");

        let notices = q.take();
        assert!(q.is_empty());
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].placement, Placement::TopRight);
        assert_eq!(notices[1].level, NoticeLevel::Error);
        assert_eq!(notices[1].placement, Placement::BottomLeft);
        assert_eq!(notices[1].duration, DEFAULT_DURATION);
    }

    #[test]
    fn notice_serializes_for_hosts() {
        let mut q = NoticeQueue::new();
        q.error("t", "m", Some(Placement::BottomLeft));
        let json = serde_json::to_value(q.take()).unwrap();
        assert_eq!(json[0]["level"], "error");
        assert_eq!(json[0]["placement"], "bottomLeft");
        assert_eq!(json[0]["duration_ms"], 4500);
    }
}
