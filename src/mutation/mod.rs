//! Sequencing of create, update and delete writes.
//!
//! One write may be in flight at a time; a second attempt is rejected
//! locally rather than queued. Completions come back to the session as
//! [`SessionEvent::MutationCompleted`], which decides how to close modals,
//! re-fetch and notify.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::RosterService;
use crate::errors::ClientError;
use crate::interaction::{DeleteConfirmation, ModalEpoch};
use crate::models::{MemberId, MemberPayload, MutationKind};
use crate::session::SessionEvent;
use crate::timer::{spawn_request, EventSender, Sequence};

/// Identity of one issued write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    seq: u64,
    pub kind: MutationKind,
    /// Modal the write was submitted from.
    pub origin: ModalEpoch,
    pub target: Option<MemberId>,
}

pub struct MutationCoordinator {
    service: Arc<dyn RosterService>,
    in_flight: Option<MutationTicket>,
    seq: Sequence,
    events: EventSender,
    cancel: CancellationToken,
}

impl MutationCoordinator {
    pub fn new(service: Arc<dyn RosterService>, events: EventSender, cancel: CancellationToken) -> Self {
        Self {
            service,
            in_flight: None,
            seq: Sequence::default(),
            events,
            cancel,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&MutationTicket> {
        self.in_flight.as_ref()
    }

    pub fn create(&mut self, payload: MemberPayload, origin: ModalEpoch) -> Result<MutationTicket, ClientError> {
        let ticket = self.begin(MutationKind::Create, origin, None)?;
        let service = Arc::clone(&self.service);
        self.dispatch(ticket.clone(), async move {
            service.create(&payload).await.map(|member| {
                tracing::debug!(id = %member.id, "server accepted new member");
            })
        });
        Ok(ticket)
    }

    pub fn update(
        &mut self,
        id: MemberId,
        payload: MemberPayload,
        origin: ModalEpoch,
    ) -> Result<MutationTicket, ClientError> {
        let ticket = self.begin(MutationKind::Update, origin, Some(id.clone()))?;
        let service = Arc::clone(&self.service);
        self.dispatch(ticket.clone(), async move {
            service.update(&id, &payload).await.map(|_| ())
        });
        Ok(ticket)
    }

    /// Delete the confirmed member. A [`DeleteConfirmation`] only exists once
    /// the user confirmed in the delete modal.
    pub fn delete(&mut self, confirmation: DeleteConfirmation) -> Result<MutationTicket, ClientError> {
        let id = confirmation.target().clone();
        let ticket = self.begin(MutationKind::Delete, confirmation.origin(), Some(id.clone()))?;
        let service = Arc::clone(&self.service);
        self.dispatch(ticket.clone(), async move { service.delete(&id).await });
        Ok(ticket)
    }

    fn begin(
        &mut self,
        kind: MutationKind,
        origin: ModalEpoch,
        target: Option<MemberId>,
    ) -> Result<MutationTicket, ClientError> {
        if let Some(pending) = &self.in_flight {
            tracing::warn!(pending = %pending.kind, rejected = %kind, "mutation already in flight");
            return Err(ClientError::Busy);
        }
        let ticket = MutationTicket {
            seq: self.seq.next(),
            kind,
            origin,
            target,
        };
        tracing::info!(kind = %kind, target = ?ticket.target, "issuing mutation");
        self.in_flight = Some(ticket.clone());
        Ok(ticket)
    }

    fn dispatch<F>(&self, ticket: MutationTicket, work: F)
    where
        F: std::future::Future<Output = Result<(), ClientError>> + Send + 'static,
    {
        spawn_request(&self.cancel, &self.events, async move {
            let result = work.await;
            SessionEvent::MutationCompleted { ticket, result }
        });
    }

    /// Clear the in-flight slot for a completed write. Returns false for a
    /// completion the coordinator no longer tracks.
    pub fn finish(&mut self, ticket: &MutationTicket) -> bool {
        match &self.in_flight {
            Some(current) if current.seq == ticket.seq => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    pub fn shutdown(&mut self) {
        self.in_flight = None;
    }
}
