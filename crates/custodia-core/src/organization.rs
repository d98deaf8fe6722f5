//! Organization records and verification state.
//!
//! Organizations are registered unverified; verification is the action
//! that actually grants the role matching the organization type to the
//! bound identity. Ids are sequential from 1, dense in commit order, and
//! never reused, so the registry stores records in a `Vec` indexed by
//! `id - 1`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::access::Role;
use crate::identity::Identity;

/// Sequential organization id, assigned from 1.
pub type OrganizationId = u64;

/// The kind of organization participating in the custody workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum OrgType {
    /// Collecting agency.
    LawEnforcement,
    /// Analysis lab.
    ForensicLab,
    /// Adjudicating body.
    Court,
}

impl OrgType {
    /// Returns the string representation of this organization type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LawEnforcement => "LAW_ENFORCEMENT",
            Self::ForensicLab => "FORENSIC_LAB",
            Self::Court => "COURT",
        }
    }

    /// Role granted to the bound identity when an organization of this
    /// type is verified.
    #[must_use]
    pub const fn granted_role(&self) -> Role {
        match self {
            Self::LawEnforcement => Role::Collector,
            Self::ForensicLab => Role::Analyst,
            Self::Court => Role::Adjudicator,
        }
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct Organization {
    /// Sequential id, never reused.
    pub id: OrganizationId,
    /// Organization name (non-empty).
    pub name: String,
    /// Organization type; decides the role granted on verification.
    pub org_type: OrgType,
    /// Caller identity bound to this organization.
    pub identity: Identity,
    /// False at registration; set true by verification, never reverted.
    pub is_verified: bool,
    /// Registration timestamp in nanoseconds since the Unix epoch.
    pub registered_at_ns: u64,
}

/// Records organizations in registration order and answers identity
/// lookups.
///
/// Identity uniqueness across organizations is deliberately not enforced;
/// lookups resolve the first matching registration in id order, which is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct OrganizationRegistry {
    records: Vec<Organization>,
}

impl OrganizationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next registration will be assigned.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_id(&self) -> OrganizationId {
        self.records.len() as u64 + 1
    }

    /// Appends a new unverified organization and returns its id.
    pub(crate) fn insert(
        &mut self,
        name: String,
        org_type: OrgType,
        identity: Identity,
        registered_at_ns: u64,
    ) -> OrganizationId {
        let id = self.next_id();
        self.records.push(Organization {
            id,
            name,
            org_type,
            identity,
            is_verified: false,
            registered_at_ns,
        });
        id
    }

    /// Looks up an organization by id.
    #[must_use]
    pub fn get(&self, id: OrganizationId) -> Option<&Organization> {
        id.checked_sub(1)
            .and_then(|index| self.records.get(index as usize))
    }

    pub(crate) fn get_mut(&mut self, id: OrganizationId) -> Option<&mut Organization> {
        id.checked_sub(1)
            .and_then(|index| self.records.get_mut(index as usize))
    }

    /// All organizations in ascending id order.
    #[must_use]
    pub fn all(&self) -> &[Organization] {
        &self.records
    }

    /// Number of registered organizations.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.records.len() as u64
    }

    /// First organization bound to `identity`, in id order, regardless of
    /// verification state. Used to resolve the organization name written
    /// into custody records.
    #[must_use]
    pub fn by_identity(&self, identity: &Identity) -> Option<&Organization> {
        self.records.iter().find(|org| org.identity == *identity)
    }

    /// First *verified* organization bound to `identity`, in id order.
    #[must_use]
    pub fn verified_by_identity(&self, identity: &Identity) -> Option<&Organization> {
        self.records
            .iter()
            .find(|org| org.is_verified && org.identity == *identity)
    }
}
