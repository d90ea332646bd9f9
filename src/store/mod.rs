//! Authoritative local snapshot of the roster.
//!
//! The snapshot is replaced wholesale by the fetch-apply step and nowhere
//! else; mutation responses never patch it.

use std::collections::BTreeSet;

use crate::models::{Member, MemberId, QueryDescriptor};

/// Monotonic tag of an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fetch the store has been told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub query: QueryDescriptor,
}

/// What happened to an arriving fetch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
pub struct RosterStore {
    members: Vec<Member>,
    latest: Generation,
    applied: Option<Generation>,
    applied_query: Option<QueryDescriptor>,
    in_flight: BTreeSet<Generation>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new fetch; it becomes the only generation whose response
    /// will be applied.
    pub fn issue(&mut self, query: QueryDescriptor) -> FetchTicket {
        self.latest = self.latest.next();
        self.in_flight.insert(self.latest);
        FetchTicket {
            generation: self.latest,
            query,
        }
    }

    /// Apply a successful response if it belongs to the latest generation.
    pub fn apply(&mut self, ticket: &FetchTicket, members: Vec<Member>) -> ApplyOutcome {
        self.in_flight.remove(&ticket.generation);
        if ticket.generation != self.latest {
            tracing::debug!(
                generation = ticket.generation.value(),
                latest = self.latest.value(),
                "dropping stale fetch response"
            );
            return ApplyOutcome::Stale;
        }
        self.members = members;
        self.applied = Some(ticket.generation);
        self.applied_query = Some(ticket.query.clone());
        ApplyOutcome::Applied
    }

    /// Record a failed fetch. The snapshot is kept either way; returns true
    /// when the failure belongs to the latest generation.
    pub fn fail(&mut self, ticket: &FetchTicket) -> bool {
        self.in_flight.remove(&ticket.generation);
        ticket.generation == self.latest
    }

    /// Make every outstanding response stale.
    pub fn invalidate(&mut self) {
        self.latest = self.latest.next();
        self.in_flight.clear();
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn latest_generation(&self) -> Generation {
        self.latest
    }

    pub fn applied_generation(&self) -> Option<Generation> {
        self.applied
    }

    /// Query the visible snapshot answers.
    pub fn applied_query(&self) -> Option<&QueryDescriptor> {
        self.applied_query.as_ref()
    }

    /// True while the latest issued fetch has not answered yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight.contains(&self.latest)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobFunction, Role};

    fn member(id: i64, name: &str) -> Member {
        Member {
            id: MemberId::from(id),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            function: JobFunction::Engineering,
            role: Role::Contributor,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_generations_are_monotonic() {
        let mut store = RosterStore::new();
        let a = store.issue(QueryDescriptor::default());
        let b = store.issue(QueryDescriptor::default());
        assert!(b.generation > a.generation);
        assert_eq!(store.latest_generation(), b.generation);
        assert_eq!(store.in_flight_count(), 2);
    }

    #[test]
    fn test_latest_response_replaces_snapshot() {
        let mut store = RosterStore::new();
        store.issue(QueryDescriptor::default());
        let first = store.issue(QueryDescriptor::default());
        assert_eq!(
            store.apply(&first, vec![member(1, "Jack"), member(2, "Ana")]),
            ApplyOutcome::Applied
        );
        assert_eq!(store.members().len(), 2);

        let second = store.issue(QueryDescriptor::build("ana", None, None));
        assert_eq!(store.apply(&second, vec![member(2, "Ana")]), ApplyOutcome::Applied);
        assert_eq!(store.members().len(), 1);
        assert_eq!(store.applied_query().unwrap().text, "ana");
        assert!(store.get(&MemberId::from(1)).is_none());
    }

    #[test]
    fn test_older_response_never_overwrites_newer() {
        let mut store = RosterStore::new();
        let slow = store.issue(QueryDescriptor::build("j", None, None));
        let fast = store.issue(QueryDescriptor::build("jack", None, None));

        assert_eq!(store.apply(&fast, vec![member(1, "Jack")]), ApplyOutcome::Applied);
        assert_eq!(
            store.apply(&slow, vec![member(1, "Jack"), member(3, "Jo")]),
            ApplyOutcome::Stale
        );
        assert_eq!(store.members().len(), 1);
        assert_eq!(store.applied_generation(), Some(fast.generation));
        assert_eq!(store.in_flight_count(), 0);
    }

    #[test]
    fn test_failure_keeps_snapshot() {
        let mut store = RosterStore::new();
        let ok = store.issue(QueryDescriptor::default());
        store.apply(&ok, vec![member(1, "Jack")]);

        let broken = store.issue(QueryDescriptor::build("x", None, None));
        assert!(store.is_loading());
        assert!(store.fail(&broken));
        assert!(!store.is_loading());
        assert_eq!(store.members().len(), 1);
    }

    #[test]
    fn test_invalidate_makes_in_flight_stale() {
        let mut store = RosterStore::new();
        let pending = store.issue(QueryDescriptor::default());
        store.invalidate();
        assert!(!store.is_loading());
        assert_eq!(store.apply(&pending, vec![member(1, "Jack")]), ApplyOutcome::Stale);
        assert!(store.is_empty());
        assert!(!store.fail(&pending));
    }
}
