//! Shared primitives for the accessgate client crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by an access-decision provider.
///
/// Remote failures are relayed to callers unchanged; `MissingResponse`
/// marks a batch response that could not be matched one-to-one back to
/// the submitted requests and signals a provider contract breach rather
/// than a transient condition.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("bad response status {status}: {body}")]
    BadStatus { status: u16, body: String },
    #[error("incomplete provider response: {0}")]
    MissingResponse(String),
}

/// Directory identifier for an employee whose access is evaluated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

/// Opaque national-identity string for an external user.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

/// Identifier for an organizational unit.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct OrgUnitId(pub String);

impl OrgUnitId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

/// Kind of access requested against a resource.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    Read,
    Write,
}

/// Structured description of an access question.
///
/// A closed set of shapes with structural equality and hashing; the
/// caching layer keys decisions by this value.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PolicyInput {
    ActorAccessToExternalUser {
        actor: ActorId,
        access_level: AccessLevel,
        person: PersonId,
    },
    ActorAccessToOrgUnit {
        actor: ActorId,
        org_unit: OrgUnitId,
    },
    ActorAccessToOrgUnitWithScreen {
        actor: ActorId,
        org_unit: OrgUnitId,
    },
    ActorHandlesStrictlyConfidentialUsers {
        actor: ActorId,
    },
    ActorHandlesConfidentialUsers {
        actor: ActorId,
    },
    ActorHandlesProtectedUsers {
        actor: ActorId,
    },
    ExternalUserAccessToExternalUser {
        requester: PersonId,
        resource: PersonId,
    },
}

/// Caller-chosen correlation identifier for one request in a batch.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One access question within a batch evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyRequest {
    pub request_id: RequestId,
    pub input: PolicyInput,
}

impl PolicyRequest {
    /// Wraps an input with a freshly generated correlation id.
    pub fn new(input: PolicyInput) -> Self {
        Self {
            request_id: RequestId::new(),
            input,
        }
    }
}

/// Outcome of an access-policy evaluation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    Permit,
    Deny {
        reason: String,
        reason_code: String,
    },
}

impl Decision {
    pub fn deny(reason: impl Into<String>, reason_code: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
            reason_code: reason_code.into(),
        }
    }

    pub fn is_permit(&self) -> bool {
        matches!(self, Self::Permit)
    }
}

/// Decision paired with the correlation id of the request it answers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyResult {
    pub request_id: RequestId,
    pub decision: Decision,
}

/// Directory group an actor belongs to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
}
