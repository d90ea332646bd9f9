//! Debounced remote reads.
//!
//! Query input changes are coalesced with a trailing-edge debounce: each
//! change restarts the quiet period and only the final inputs are fetched.
//! Every fetch is tagged with a store generation so superseded responses are
//! dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::RosterService;
use crate::models::{JobFunction, QueryDescriptor, QueryInputs, Role};
use crate::session::SessionEvent;
use crate::store::{Generation, RosterStore};
use crate::timer::{spawn_request, EventSender, ScheduledTask, Sequence};

pub struct DebouncedFetchController {
    service: Arc<dyn RosterService>,
    debounce: Duration,
    inputs: QueryInputs,
    target: QueryDescriptor,
    pending: Option<ScheduledTask>,
    seq: Sequence,
    events: EventSender,
    cancel: CancellationToken,
}

impl DebouncedFetchController {
    pub fn new(
        service: Arc<dyn RosterService>,
        debounce: Duration,
        events: EventSender,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            service,
            debounce,
            inputs: QueryInputs::default(),
            target: QueryDescriptor::default(),
            pending: None,
            seq: Sequence::default(),
            events,
            cancel,
        }
    }

    pub fn inputs(&self) -> &QueryInputs {
        &self.inputs
    }

    /// Descriptor the next (or last) fetch uses.
    pub fn target(&self) -> &QueryDescriptor {
        &self.target
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        self.inputs.text = text.to_string();
        self.reschedule()
    }

    pub fn set_function(&mut self, function: Option<JobFunction>) -> bool {
        self.inputs.function = function;
        self.reschedule()
    }

    pub fn set_role(&mut self, role: Option<Role>) -> bool {
        self.inputs.role = role;
        self.reschedule()
    }

    /// Restart the quiet period if the canonical descriptor changed.
    fn reschedule(&mut self) -> bool {
        let descriptor = self.inputs.descriptor();
        if descriptor == self.target {
            return false;
        }
        self.target = descriptor;

        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        let seq = self.seq.next();
        self.pending = Some(ScheduledTask::schedule(
            seq,
            self.debounce,
            &self.cancel,
            &self.events,
            SessionEvent::DebounceElapsed { seq },
        ));
        tracing::trace!(seq, "debounce window restarted");
        true
    }

    /// Handle the end of a quiet period; returns the issued generation, or
    /// `None` when the timer was superseded.
    pub fn on_debounce_elapsed(&mut self, seq: u64, store: &mut RosterStore) -> Option<Generation> {
        match &self.pending {
            Some(task) if task.seq() == seq => {
                self.pending = None;
                Some(self.issue(store))
            }
            _ => None,
        }
    }

    /// Fetch the current descriptor right away, skipping any pending quiet period.
    pub fn fetch_now(&mut self, store: &mut RosterStore) -> Generation {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        self.issue(store)
    }

    fn issue(&mut self, store: &mut RosterStore) -> Generation {
        let ticket = store.issue(self.target.clone());
        let generation = ticket.generation;
        tracing::debug!(
            generation = generation.value(),
            q = %ticket.query.text,
            function = ?ticket.query.function,
            role = ?ticket.query.role,
            "issuing fetch"
        );

        let service = Arc::clone(&self.service);
        spawn_request(&self.cancel, &self.events, async move {
            let result = service.list(&ticket.query).await;
            SessionEvent::FetchCompleted { ticket, result }
        });
        generation
    }

    /// Invalidate the pending timer and every in-flight response.
    pub fn shutdown(&mut self, store: &mut RosterStore) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        store.invalidate();
    }
}
