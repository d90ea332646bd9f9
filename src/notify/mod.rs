//! Transient toast notifications.
//!
//! At most one toast is visible. A new `show` replaces the visible toast and
//! restarts the auto-dismiss timer instead of queueing behind it.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::session::SessionEvent;
use crate::timer::{EventSender, ScheduledTask, Sequence};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub visible_until: Instant,
}

pub struct NotificationQueue {
    duration: Duration,
    current: Option<Toast>,
    timer: Option<ScheduledTask>,
    seq: Sequence,
    events: EventSender,
    cancel: CancellationToken,
}

impl NotificationQueue {
    pub fn new(duration: Duration, events: EventSender, cancel: CancellationToken) -> Self {
        Self {
            duration,
            current: None,
            timer: None,
            seq: Sequence::default(),
            events,
            cancel,
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.cancel_timer();
        let message = message.into();
        let token = self.seq.next();
        tracing::debug!(token, message = %message, "toast shown");
        self.current = Some(Toast {
            message,
            visible_until: Instant::now() + self.duration,
        });
        self.timer = Some(ScheduledTask::schedule(
            token,
            self.duration,
            &self.cancel,
            &self.events,
            SessionEvent::ToastExpired { token },
        ));
    }

    /// Explicit close.
    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.current = None;
    }

    /// Timer expiry; ignored when the toast it belonged to was superseded.
    pub fn on_expired(&mut self, token: u64) -> bool {
        match &self.timer {
            Some(timer) if timer.seq() == token => {
                self.timer = None;
                self.current = None;
                tracing::debug!(token, "toast expired");
                true
            }
            _ => false,
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn shutdown(&mut self) {
        self.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn queue(duration_ms: u64) -> (NotificationQueue, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            NotificationQueue::new(Duration::from_millis(duration_ms), tx, CancellationToken::new()),
            rx,
        )
    }

    async fn expire_next(queue: &mut NotificationQueue, rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> bool {
        match rx.recv().await {
            Some(SessionEvent::ToastExpired { token }) => queue.on_expired(token),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses() {
        let (mut queue, mut rx) = queue(3200);
        let start = Instant::now();
        queue.show("Member Deleted");
        assert_eq!(queue.current().unwrap().message, "Member Deleted");
        assert_eq!(
            queue.current().unwrap().visible_until,
            start + Duration::from_millis(3200)
        );

        assert!(expire_next(&mut queue, &mut rx).await);
        assert!(queue.current().is_none());
        assert!(start.elapsed() >= Duration::from_millis(3200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_toast_supersedes_and_resets_timer() {
        let (mut queue, mut rx) = queue(3200);
        let start = Instant::now();
        queue.show("Member Updated");
        tokio::time::sleep(Duration::from_millis(2000)).await;
        queue.show("Member Deleted");

        assert!(expire_next(&mut queue, &mut rx).await);
        assert!(start.elapsed() >= Duration::from_millis(5200));
        assert!(queue.current().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_dismiss_cancels_timer() {
        let (mut queue, mut rx) = queue(100);
        queue.show("New Member Added");
        queue.dismiss();
        assert!(queue.current().is_none());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_expiry_is_ignored() {
        let (mut queue, _rx) = queue(10_000);
        queue.show("first");
        queue.show("second");
        assert!(!queue.on_expired(1));
        assert_eq!(queue.current().unwrap().message, "second");
    }
}
