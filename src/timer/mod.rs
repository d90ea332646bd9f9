//! Cancellable scheduled tasks.
//!
//! Every timer is a spawned task keyed by a sequence number. Superseding a
//! timer aborts its task, and the owner ignores any event whose sequence is
//! no longer current, so an event already in the channel cannot fire late.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::session::SessionEvent;

/// Sender side of the session event channel.
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;

/// Monotonic sequence used to key scheduled tasks.
#[derive(Debug, Default)]
pub struct Sequence(u64);

impl Sequence {
    pub fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }
}

/// Handle of a pending timer.
#[derive(Debug)]
pub struct ScheduledTask {
    seq: u64,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Send `event` after `delay` unless cancelled first.
    pub fn schedule(
        seq: u64,
        delay: Duration,
        cancel: &CancellationToken,
        events: &EventSender,
        event: SessionEvent,
    ) -> Self {
        let cancel = cancel.clone();
        let events = events.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = events.send(event);
                }
            }
        });
        Self { seq, handle }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

/// Spawn `work` and deliver its event unless the session is torn down first.
pub fn spawn_request<F>(cancel: &CancellationToken, events: &EventSender, work: F)
where
    F: std::future::Future<Output = SessionEvent> + Send + 'static,
{
    let cancel = cancel.clone();
    let events = events.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            event = work => {
                let _ = events.send(event);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_task_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let _task = ScheduledTask::schedule(
            1,
            Duration::from_millis(300),
            &cancel,
            &tx,
            SessionEvent::DebounceElapsed { seq: 1 },
        );

        let start = tokio::time::Instant::now();
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::DebounceElapsed { seq: 1 }));
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = ScheduledTask::schedule(
            1,
            Duration::from_millis(300),
            &cancel,
            &tx,
            SessionEvent::DebounceElapsed { seq: 1 },
        );
        task.cancel();

        let torn_down = ScheduledTask::schedule(
            2,
            Duration::from_millis(300),
            &cancel,
            &tx,
            SessionEvent::DebounceElapsed { seq: 2 },
        );
        cancel.cancel();
        assert_eq!(torn_down.seq(), 2);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let mut seq = Sequence::default();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }
}
