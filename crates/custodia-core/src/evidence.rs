//! Evidence records and the lifecycle status machine.
//!
//! # State Machine
//!
//! ```text
//! Collected --> UnderAnalysis --> Analyzed --> InCourt --> Archived
//!     |              |               |            |           |
//!     +--------------+-------+-------+------------+-----------+
//!                            |
//!                            v  (destroy_evidence, Admin-only)
//!                        Destroyed (terminal)
//! ```
//!
//! # Valid Status Updates
//!
//! | From | To | Authorized role |
//! |------|----|-----------------|
//! | Collected | UnderAnalysis | Analyst |
//! | UnderAnalysis | Analyzed | Analyst |
//! | Analyzed | InCourt | Adjudicator |
//! | InCourt | Archived | Adjudicator |
//!
//! Status ordinals (0-5) exist for display ordering only; transition
//! validity is decided by the explicit edge table in
//! [`EvidenceStatus::can_transition_to`], never by ordinal comparison.
//! `Destroyed` is reachable from any active status, but only through
//! `destroy_evidence`, and is terminal: once an item is inactive no
//! further mutation of the record or its custody log is permitted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::access::Role;
use crate::identity::Identity;

/// Sequential evidence id, assigned from 1.
pub type EvidenceId = u64;

/// Lifecycle status of an evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EvidenceStatus {
    /// Initial status at collection.
    Collected,
    /// Analysis has started at a forensic lab.
    UnderAnalysis,
    /// Analysis is complete.
    Analyzed,
    /// Evidence has been submitted to a court.
    InCourt,
    /// Court proceedings are over; evidence is archived.
    Archived,
    /// Evidence was destroyed by administrative order. Terminal.
    Destroyed,
}

impl EvidenceStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Collected => "COLLECTED",
            Self::UnderAnalysis => "UNDER_ANALYSIS",
            Self::Analyzed => "ANALYZED",
            Self::InCourt => "IN_COURT",
            Self::Archived => "ARCHIVED",
            Self::Destroyed => "DESTROYED",
        }
    }

    /// Human-readable name used by presentation layers.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Collected => "Collected",
            Self::UnderAnalysis => "Under Analysis",
            Self::Analyzed => "Analyzed",
            Self::InCourt => "In Court",
            Self::Archived => "Archived",
            Self::Destroyed => "Destroyed",
        }
    }

    /// Numeric ordinal (0-5) in lifecycle order. Display only; never
    /// used for transition validation.
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        match self {
            Self::Collected => 0,
            Self::UnderAnalysis => 1,
            Self::Analyzed => 2,
            Self::InCourt => 3,
            Self::Archived => 4,
            Self::Destroyed => 5,
        }
    }

    /// Explicit allowed-edge table for status updates. There is no path
    /// back to an earlier status and no skipping of stages.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Collected, Self::UnderAnalysis)
                | (Self::UnderAnalysis, Self::Analyzed)
                | (Self::Analyzed, Self::InCourt)
                | (Self::InCourt, Self::Archived)
        )
    }

    /// Role authorized to set this status through a status update, if any.
    ///
    /// `Collected` is only ever set at collection and `Destroyed` only by
    /// destruction, so no role may select them as an update target.
    #[must_use]
    pub const fn update_role(&self) -> Option<Role> {
        match self {
            Self::UnderAnalysis | Self::Analyzed => Some(Role::Analyst),
            Self::InCourt | Self::Archived => Some(Role::Adjudicator),
            Self::Collected | Self::Destroyed => None,
        }
    }

    /// Custody log action recorded when an item enters this status.
    #[must_use]
    pub const fn custody_action(&self) -> &'static str {
        match self {
            Self::Collected => "Evidence Collected",
            Self::UnderAnalysis => "Evidence Under Analysis",
            Self::Analyzed => "Evidence Analyzed",
            Self::InCourt => "Evidence In Court",
            Self::Archived => "Evidence Archived",
            Self::Destroyed => "Evidence Destroyed",
        }
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked evidence item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct Evidence {
    /// Sequential id, never reused.
    pub id: EvidenceId,
    /// Case this item belongs to; many items may share a case.
    pub case_id: String,
    /// Free-text description.
    pub description: String,
    /// Free-text evidence type (e.g. "Digital", "Physical").
    pub evidence_type: String,
    /// Free-text storage location.
    pub location: String,
    /// Opaque content-addressed reference to externally stored content.
    /// Stored and compared, never recomputed or fetched.
    pub content_reference: String,
    /// Identity that collected the item.
    pub collected_by: Identity,
    /// Collection timestamp in nanoseconds since the Unix epoch.
    pub collected_at_ns: u64,
    /// Current lifecycle status.
    pub status: EvidenceStatus,
    /// True until the item is destroyed; false permanently afterwards.
    pub is_active: bool,
}
