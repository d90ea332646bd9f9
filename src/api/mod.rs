//! Remote collection endpoint.
//!
//! The core only depends on [`RosterService`]; [`HttpRosterService`] is the
//! reqwest-backed implementation used by the binary.

mod http;

pub use http::*;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::ClientError;
use crate::models::{Member, MemberId, MemberPayload, QueryDescriptor};

/// Minimal CRUD contract of the remote collection.
///
/// Every non-success outcome, transport errors included, is an `Err`.
#[async_trait]
pub trait RosterService: Send + Sync + 'static {
    /// LIST(query) -> members
    async fn list(&self, query: &QueryDescriptor) -> Result<Vec<Member>, ClientError>;

    /// CREATE(draft) -> member
    async fn create(&self, payload: &MemberPayload) -> Result<Member, ClientError>;

    /// UPDATE(id, draft) -> member
    async fn update(&self, id: &MemberId, payload: &MemberPayload) -> Result<Member, ClientError>;

    /// DELETE(id)
    async fn delete(&self, id: &MemberId) -> Result<(), ClientError>;
}

/// Success envelope some deployments wrap their payloads in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default)]
    pub revision_id: Option<i64>,
}

/// A response body that is either enveloped or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope(ApiResponse<T>),
    Bare(T),
}

/// Decode a success body, unwrapping the envelope when present.
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    match serde_json::from_str::<Payload<T>>(body)? {
        Payload::Envelope(envelope) if envelope.success => Ok(envelope.data),
        Payload::Envelope(_) => Err(ClientError::Decode(
            "Envelope reported success=false on a success status".to_string(),
        )),
        Payload::Bare(data) => Ok(data),
    }
}
