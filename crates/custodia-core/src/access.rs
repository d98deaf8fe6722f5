//! Role-based access control.
//!
//! Roles are capabilities granted to identities, stored as a bitmask per
//! identity and checked by explicit predicate functions. The deploying
//! identity receives [`Role::Admin`] at bootstrap; every other grant
//! happens exclusively as a side effect of organization verification.
//! There is no revocation path.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::identity::Identity;

/// A named capability gating specific registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Role {
    /// Registers, verifies, and destroys; granted to the bootstrap identity.
    Admin,
    /// Collects and transfers evidence (law-enforcement organizations).
    Collector,
    /// Moves evidence through analysis statuses (forensic labs).
    Analyst,
    /// Moves evidence through court statuses (adjudicating bodies).
    Adjudicator,
}

impl Role {
    /// Returns the string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Collector => "COLLECTOR",
            Self::Analyst => "ANALYST",
            Self::Adjudicator => "ADJUDICATOR",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Admin => 1,
            Self::Collector => 1 << 1,
            Self::Analyst => 1 << 2,
            Self::Adjudicator => 1 << 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of roles granted to a single identity, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(u8);

impl RoleSet {
    /// The empty role set.
    pub const EMPTY: Self = Self(0);

    /// Returns true if the set contains `role`.
    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Adds `role` to the set. Idempotent.
    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    /// Returns true if no roles are granted.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Holds the roles granted to each identity and answers capability checks.
#[derive(Debug, Clone)]
pub struct AccessControl {
    grants: HashMap<Identity, RoleSet>,
}

impl AccessControl {
    /// Creates the access table with `admin` granted [`Role::Admin`].
    #[must_use]
    pub fn bootstrap(admin: Identity) -> Self {
        let mut grants = HashMap::new();
        let mut roles = RoleSet::EMPTY;
        roles.insert(Role::Admin);
        grants.insert(admin, roles);
        Self { grants }
    }

    /// Grants `role` to `identity`. Idempotent.
    pub fn grant(&mut self, identity: Identity, role: Role) {
        self.grants.entry(identity).or_default().insert(role);
    }

    /// Returns true if `identity` holds `role`.
    #[must_use]
    pub fn has_role(&self, identity: &Identity, role: Role) -> bool {
        self.grants
            .get(identity)
            .is_some_and(|roles| roles.contains(role))
    }

    /// Returns the full role set granted to `identity`.
    #[must_use]
    pub fn roles(&self, identity: &Identity) -> RoleSet {
        self.grants.get(identity).copied().unwrap_or_default()
    }

    /// Fails with [`RegistryError::Unauthorized`] unless `identity` holds
    /// `role`.
    pub(crate) fn require(&self, identity: &Identity, role: Role) -> Result<(), RegistryError> {
        if self.has_role(identity, role) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                identity: identity.to_string(),
                required: role,
            })
        }
    }
}
