//! Registry error types.

use thiserror::Error;

use crate::access::Role;

/// Errors that can occur during registry operations.
///
/// Every mutating operation is all-or-nothing: any of these errors leaves
/// organization, evidence, and custody state exactly as before the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Caller lacks the role required for the requested operation, or is
    /// not bound to a verified organization where one is required.
    #[error("unauthorized: {identity} lacks the {required} role")]
    Unauthorized {
        /// The caller identity that was rejected.
        identity: String,
        /// The role the operation requires.
        required: Role,
    },

    /// Referenced organization id does not exist.
    #[error("organization not found: {org_id}")]
    OrganizationNotFound {
        /// The organization id that was not found.
        org_id: u64,
    },

    /// Referenced evidence id does not exist.
    #[error("evidence not found: {evidence_id}")]
    EvidenceNotFound {
        /// The evidence id that was not found.
        evidence_id: u64,
    },

    /// Evidence is inactive, or the requested status change is not
    /// permitted for the caller's role or the current status.
    #[error("invalid transition for evidence {evidence_id}: {reason}")]
    InvalidTransition {
        /// The evidence id the mutation targeted.
        evidence_id: u64,
        /// Why the transition was rejected.
        reason: String,
    },

    /// Transfer target is not bound to a verified organization.
    #[error("transfer recipient {identity} is not bound to a verified organization")]
    UnverifiedRecipient {
        /// The rejected recipient identity.
        identity: String,
    },

    /// A free-text field failed bounds or emptiness validation.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput {
        /// The field that failed validation.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A lock guarding registry state was poisoned by a panic in another
    /// thread.
    #[error("registry lock poisoned")]
    LockPoisoned,
}
