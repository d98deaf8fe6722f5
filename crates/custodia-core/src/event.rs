//! Committed-mutation events.
//!
//! Every successful ledger mutation is described by exactly one
//! [`LedgerEvent`]. Events carry the caller's inputs plus the ids the
//! ledger assigned, so replaying the event sequence from genesis rebuilds
//! identical state. The journal persists events; it never persists derived
//! state.

use serde::{Deserialize, Serialize};

use crate::evidence::{EvidenceId, EvidenceStatus};
use crate::identity::Identity;
use crate::organization::{OrgType, OrganizationId};

/// A committed registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum LedgerEvent {
    /// A new organization was registered (unverified).
    OrganizationRegistered {
        /// Assigned organization id.
        org_id: OrganizationId,
        /// Organization name.
        name: String,
        /// Organization type.
        org_type: OrgType,
        /// Identity bound to the organization.
        identity: Identity,
        /// Admin that performed the registration.
        registered_by: Identity,
        /// Commit timestamp in nanoseconds since the Unix epoch.
        timestamp_ns: u64,
    },

    /// An organization was verified, granting its type's role to the
    /// bound identity. A no-op when already verified.
    OrganizationVerified {
        /// The verified organization.
        org_id: OrganizationId,
        /// Admin that performed the verification.
        verified_by: Identity,
        /// Commit timestamp in nanoseconds since the Unix epoch.
        timestamp_ns: u64,
    },

    /// A new evidence item was collected.
    EvidenceCollected {
        /// Assigned evidence id.
        evidence_id: EvidenceId,
        /// Case the item belongs to.
        case_id: String,
        /// Free-text description.
        description: String,
        /// Free-text evidence type.
        evidence_type: String,
        /// Opaque content-addressed reference.
        content_reference: String,
        /// Free-text storage location.
        location: String,
        /// Collector identity.
        collected_by: Identity,
        /// Commit timestamp in nanoseconds since the Unix epoch.
        timestamp_ns: u64,
    },

    /// Custody of an evidence item moved to another verified
    /// organization's identity. Status is unchanged.
    EvidenceTransferred {
        /// The transferred item.
        evidence_id: EvidenceId,
        /// Receiving identity (the new custodian).
        to: Identity,
        /// Identity that initiated the transfer.
        transferred_by: Identity,
        /// Optional transfer notes.
        notes: Option<String>,
        /// Commit timestamp in nanoseconds since the Unix epoch.
        timestamp_ns: u64,
    },

    /// An evidence item moved to a new lifecycle status.
    EvidenceStatusUpdated {
        /// The updated item.
        evidence_id: EvidenceId,
        /// The status the item entered.
        new_status: EvidenceStatus,
        /// Identity that performed the update.
        handler: Identity,
        /// Optional update notes.
        notes: Option<String>,
        /// Commit timestamp in nanoseconds since the Unix epoch.
        timestamp_ns: u64,
    },

    /// An evidence item was irreversibly destroyed.
    EvidenceDestroyed {
        /// The destroyed item.
        evidence_id: EvidenceId,
        /// Admin that ordered the destruction.
        destroyed_by: Identity,
        /// Reason recorded in the custody log.
        reason: String,
        /// Commit timestamp in nanoseconds since the Unix epoch.
        timestamp_ns: u64,
    },
}

impl LedgerEvent {
    /// Stable event-type tag used for journal rows and logging.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::OrganizationRegistered { .. } => "organization.registered",
            Self::OrganizationVerified { .. } => "organization.verified",
            Self::EvidenceCollected { .. } => "evidence.collected",
            Self::EvidenceTransferred { .. } => "evidence.transferred",
            Self::EvidenceStatusUpdated { .. } => "evidence.status_updated",
            Self::EvidenceDestroyed { .. } => "evidence.destroyed",
        }
    }

    /// Identity that triggered the mutation.
    #[must_use]
    pub const fn actor(&self) -> &Identity {
        match self {
            Self::OrganizationRegistered { registered_by, .. } => registered_by,
            Self::OrganizationVerified { verified_by, .. } => verified_by,
            Self::EvidenceCollected { collected_by, .. } => collected_by,
            Self::EvidenceTransferred { transferred_by, .. } => transferred_by,
            Self::EvidenceStatusUpdated { handler, .. } => handler,
            Self::EvidenceDestroyed { destroyed_by, .. } => destroyed_by,
        }
    }

    /// Commit timestamp in nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp_ns(&self) -> u64 {
        match self {
            Self::OrganizationRegistered { timestamp_ns, .. }
            | Self::OrganizationVerified { timestamp_ns, .. }
            | Self::EvidenceCollected { timestamp_ns, .. }
            | Self::EvidenceTransferred { timestamp_ns, .. }
            | Self::EvidenceStatusUpdated { timestamp_ns, .. }
            | Self::EvidenceDestroyed { timestamp_ns, .. } => *timestamp_ns,
        }
    }
}
