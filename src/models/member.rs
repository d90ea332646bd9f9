//! Team member model matching the remote collection's wire format.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned, opaque member identity.
///
/// Accepts either a JSON number or a string on the wire and is used verbatim
/// as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for MemberId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for MemberId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => MemberId(n.to_string()),
            RawId::Text(s) => MemberId(s),
        })
    }
}

/// Business function a member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobFunction {
    MarketingSales,
    Product,
    Engineering,
    It,
}

impl JobFunction {
    pub const ALL: [JobFunction; 4] = [
        JobFunction::MarketingSales,
        JobFunction::Product,
        JobFunction::Engineering,
        JobFunction::It,
    ];

    /// Wire value, e.g. `MARKETING_SALES`.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobFunction::MarketingSales => "MARKETING_SALES",
            JobFunction::Product => "PRODUCT",
            JobFunction::Engineering => "ENGINEERING",
            JobFunction::It => "IT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobFunction::MarketingSales => "Marketing & Sales",
            JobFunction::Product => "Product",
            JobFunction::Engineering => "Engineering",
            JobFunction::It => "IT",
        }
    }

    /// Parse a wire value or a display label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|f| {
            f.as_str().eq_ignore_ascii_case(value) || f.label().eq_ignore_ascii_case(value)
        })
    }
}

/// Permission level of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Contributor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Contributor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Contributor => "CONTRIBUTOR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Contributor => "Contributor",
        }
    }

    /// Badge style used when rendering the role column.
    pub fn badge(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Contributor => "contributor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(value) || r.label().eq_ignore_ascii_case(value))
    }
}

/// A team member as confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub full_name: String,
    pub email: String,
    pub function: JobFunction,
    pub role: Role,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Accepts RFC 3339 or naive ISO-8601 strings. Anything else, including
/// non-string forms such as Jackson's `[y, m, d, h, min, s]` arrays, is dropped.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Editable fields of a member, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    pub full_name: String,
    pub email: String,
    pub function: Option<JobFunction>,
    pub role: Option<Role>,
}

impl MemberDraft {
    /// Copy of a stored member's editable fields.
    pub fn from_member(member: &Member) -> Self {
        Self {
            full_name: member.full_name.clone(),
            email: member.email.clone(),
            function: Some(member.function),
            role: Some(member.role),
        }
    }
}

/// Request body for create and update.
///
/// Only [`crate::validation::FieldValidator::submit`] builds one, so every
/// payload that reaches the network has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) function: JobFunction,
    pub(crate) role: Role,
}

impl MemberPayload {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn function(&self) -> JobFunction {
        self.function
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Kind of write the mutation coordinator sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        })
    }
}
