//! Evidence ledger state machine.
//!
//! The ledger owns the access table, the organization registry, the
//! evidence records, and the custody log, and enforces role preconditions
//! and lifecycle rules for every mutation.
//!
//! # Control Flow
//!
//! ```text
//! Command --> validate (AccessControl + lifecycle rules, pure)
//!                |
//!                v
//!          LedgerEvent --> apply (record mutation + custody append)
//! ```
//!
//! Every mutating request first passes the access check, then the
//! lifecycle validation; only then is a [`LedgerEvent`] produced and
//! applied. Validation never touches state and apply never fails for a
//! freshly validated event, so a rejected command leaves organization,
//! evidence, and custody state exactly as before — the record mutation and
//! its custody append commit as one indivisible unit.
//!
//! Events are also the replay format: feeding a committed event sequence
//! through [`EvidenceLedger::replay`] rebuilds identical state, which is
//! how the journal-backed service recovers on open.
//!
//! # Example
//!
//! ```rust
//! use custodia_core::identity::Identity;
//! use custodia_core::ledger::{Command, EvidenceLedger};
//! use custodia_core::organization::OrgType;
//!
//! let admin = Identity::from("0xadmin");
//! let mut ledger = EvidenceLedger::bootstrap(admin.clone());
//!
//! let register = Command::RegisterOrganization {
//!     name: "Metro Police".to_string(),
//!     org_type: OrgType::LawEnforcement,
//!     identity: Identity::from("0xmetro"),
//! };
//! ledger.submit(&admin, &register, 1_000)?;
//! ledger.submit(&admin, &Command::VerifyOrganization { org_id: 1 }, 2_000)?;
//! assert!(ledger.all_organizations()[0].is_verified);
//! # Ok::<(), custodia_core::error::RegistryError>(())
//! ```


use crate::access::{AccessControl, Role};
use crate::custody::{CustodyLog, CustodyRecord};
use crate::error::RegistryError;
use crate::event::LedgerEvent;
use crate::evidence::{Evidence, EvidenceId, EvidenceStatus};
use crate::identity::Identity;
use crate::organization::{OrgType, Organization, OrganizationId, OrganizationRegistry};

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum length of an organization name, in bytes.
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length of free-text evidence fields (case id, description,
/// evidence type, location), in bytes.
pub const MAX_TEXT_LEN: usize = 1024;

/// Maximum length of a content reference, in bytes.
pub const MAX_REFERENCE_LEN: usize = 512;

/// Maximum length of notes and destruction reasons, in bytes.
pub const MAX_NOTES_LEN: usize = 2048;

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), RegistryError> {
    if value.len() > max {
        return Err(RegistryError::InvalidInput {
            field,
            reason: format!("exceeds {max} bytes"),
        });
    }
    Ok(())
}

fn check_notes(field: &'static str, notes: Option<&str>) -> Result<(), RegistryError> {
    match notes {
        Some(value) => check_len(field, value, MAX_NOTES_LEN),
        None => Ok(()),
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Inputs for collecting a new evidence item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvidence {
    /// Case the item belongs to.
    pub case_id: String,
    /// Free-text description.
    pub description: String,
    /// Free-text evidence type.
    pub evidence_type: String,
    /// Opaque content-addressed reference to externally stored content.
    pub content_reference: String,
    /// Free-text storage location.
    pub location: String,
}

/// A mutation request, validated against the caller's roles and the
/// current ledger state before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// Register a new organization (Admin-only).
    RegisterOrganization {
        /// Organization name (non-empty).
        name: String,
        /// Organization type.
        org_type: OrgType,
        /// Identity to bind to the organization.
        identity: Identity,
    },
    /// Verify an organization, granting its type's role (Admin-only).
    VerifyOrganization {
        /// The organization to verify.
        org_id: OrganizationId,
    },
    /// Collect a new evidence item (Collector from a verified org).
    CollectEvidence {
        /// The item's fields.
        submission: NewEvidence,
    },
    /// Transfer custody to another verified organization's identity.
    TransferEvidence {
        /// The item to transfer.
        evidence_id: EvidenceId,
        /// Receiving identity.
        to: Identity,
        /// Optional transfer notes.
        notes: Option<String>,
    },
    /// Move an item to a new lifecycle status.
    UpdateEvidenceStatus {
        /// The item to update.
        evidence_id: EvidenceId,
        /// Target status.
        new_status: EvidenceStatus,
        /// Optional update notes.
        notes: Option<String>,
    },
    /// Irreversibly destroy an item (Admin-only).
    DestroyEvidence {
        /// The item to destroy.
        evidence_id: EvidenceId,
        /// Reason recorded in the custody log.
        reason: String,
    },
}

// =============================================================================
// EvidenceLedger
// =============================================================================

/// The registry state machine: organizations, evidence, custody log, and
/// the access table, mutated only through validated commands.
#[derive(Debug)]
pub struct EvidenceLedger {
    access: AccessControl,
    organizations: OrganizationRegistry,
    evidence: Vec<Evidence>,
    custody: CustodyLog,
}

impl EvidenceLedger {
    /// Creates an empty ledger with `admin` granted [`Role::Admin`].
    #[must_use]
    pub fn bootstrap(admin: Identity) -> Self {
        Self {
            access: AccessControl::bootstrap(admin),
            organizations: OrganizationRegistry::new(),
            evidence: Vec::new(),
            custody: CustodyLog::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Mutation path
    // -------------------------------------------------------------------------

    /// Validates and applies a command as one unit.
    ///
    /// # Errors
    ///
    /// Any [`RegistryError`] from validation; on error no state changes.
    pub fn submit(
        &mut self,
        caller: &Identity,
        command: &Command,
        timestamp_ns: u64,
    ) -> Result<LedgerEvent, RegistryError> {
        let event = self.validate(caller, command, timestamp_ns)?;
        self.apply(&event)?;
        Ok(event)
    }

    /// Validates a command against the caller's roles and current state,
    /// returning the event that would commit. Pure: never mutates.
    ///
    /// # Errors
    ///
    /// See [`RegistryError`]; each command documents its failure modes.
    pub fn validate(
        &self,
        caller: &Identity,
        command: &Command,
        timestamp_ns: u64,
    ) -> Result<LedgerEvent, RegistryError> {
        match command {
            Command::RegisterOrganization {
                name,
                org_type,
                identity,
            } => {
                self.access.require(caller, Role::Admin)?;
                if name.is_empty() {
                    return Err(RegistryError::InvalidInput {
                        field: "name",
                        reason: "must not be empty".to_string(),
                    });
                }
                check_len("name", name, MAX_NAME_LEN)?;
                Ok(LedgerEvent::OrganizationRegistered {
                    org_id: self.organizations.next_id(),
                    name: name.clone(),
                    org_type: *org_type,
                    identity: identity.clone(),
                    registered_by: caller.clone(),
                    timestamp_ns,
                })
            }

            Command::VerifyOrganization { org_id } => {
                self.access.require(caller, Role::Admin)?;
                if self.organizations.get(*org_id).is_none() {
                    return Err(RegistryError::OrganizationNotFound { org_id: *org_id });
                }
                Ok(LedgerEvent::OrganizationVerified {
                    org_id: *org_id,
                    verified_by: caller.clone(),
                    timestamp_ns,
                })
            }

            Command::CollectEvidence { submission } => {
                self.access.require(caller, Role::Collector)?;
                if self.organizations.verified_by_identity(caller).is_none() {
                    return Err(RegistryError::Unauthorized {
                        identity: caller.to_string(),
                        required: Role::Collector,
                    });
                }
                check_len("case_id", &submission.case_id, MAX_TEXT_LEN)?;
                check_len("description", &submission.description, MAX_TEXT_LEN)?;
                check_len("evidence_type", &submission.evidence_type, MAX_TEXT_LEN)?;
                check_len("location", &submission.location, MAX_TEXT_LEN)?;
                check_len(
                    "content_reference",
                    &submission.content_reference,
                    MAX_REFERENCE_LEN,
                )?;
                Ok(LedgerEvent::EvidenceCollected {
                    evidence_id: self.next_evidence_id(),
                    case_id: submission.case_id.clone(),
                    description: submission.description.clone(),
                    evidence_type: submission.evidence_type.clone(),
                    content_reference: submission.content_reference.clone(),
                    location: submission.location.clone(),
                    collected_by: caller.clone(),
                    timestamp_ns,
                })
            }

            Command::TransferEvidence {
                evidence_id,
                to,
                notes,
            } => {
                self.access.require(caller, Role::Collector)?;
                let item = self.evidence(*evidence_id)?;
                if !item.is_active {
                    return Err(RegistryError::InvalidTransition {
                        evidence_id: *evidence_id,
                        reason: "evidence is inactive".to_string(),
                    });
                }
                if self.organizations.verified_by_identity(to).is_none() {
                    return Err(RegistryError::UnverifiedRecipient {
                        identity: to.to_string(),
                    });
                }
                check_notes("notes", notes.as_deref())?;
                Ok(LedgerEvent::EvidenceTransferred {
                    evidence_id: *evidence_id,
                    to: to.clone(),
                    transferred_by: caller.clone(),
                    notes: notes.clone(),
                    timestamp_ns,
                })
            }

            Command::UpdateEvidenceStatus {
                evidence_id,
                new_status,
                notes,
            } => {
                let item = self.evidence(*evidence_id)?;
                if !item.is_active {
                    return Err(RegistryError::InvalidTransition {
                        evidence_id: *evidence_id,
                        reason: "evidence is inactive".to_string(),
                    });
                }
                let Some(required) = new_status.update_role() else {
                    return Err(RegistryError::InvalidTransition {
                        evidence_id: *evidence_id,
                        reason: format!("no role may set status {new_status} via an update"),
                    });
                };
                if !self.access.has_role(caller, required) {
                    return Err(RegistryError::InvalidTransition {
                        evidence_id: *evidence_id,
                        reason: format!(
                            "caller lacks the {required} role required to set status {new_status}"
                        ),
                    });
                }
                if !item.status.can_transition_to(*new_status) {
                    return Err(RegistryError::InvalidTransition {
                        evidence_id: *evidence_id,
                        reason: format!("{} -> {new_status} is not an allowed edge", item.status),
                    });
                }
                check_notes("notes", notes.as_deref())?;
                Ok(LedgerEvent::EvidenceStatusUpdated {
                    evidence_id: *evidence_id,
                    new_status: *new_status,
                    handler: caller.clone(),
                    notes: notes.clone(),
                    timestamp_ns,
                })
            }

            Command::DestroyEvidence {
                evidence_id,
                reason,
            } => {
                self.access.require(caller, Role::Admin)?;
                let item = self.evidence(*evidence_id)?;
                if !item.is_active {
                    return Err(RegistryError::InvalidTransition {
                        evidence_id: *evidence_id,
                        reason: "evidence is already destroyed".to_string(),
                    });
                }
                check_len("reason", reason, MAX_NOTES_LEN)?;
                Ok(LedgerEvent::EvidenceDestroyed {
                    evidence_id: *evidence_id,
                    destroyed_by: caller.clone(),
                    reason: reason.clone(),
                    timestamp_ns,
                })
            }
        }
    }

    /// Re-applies a committed event without authorization re-checks.
    ///
    /// This is the journal replay path: the event sequence is trusted to
    /// have been validated when it was first committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is inconsistent with current state
    /// (an out-of-sequence id or a dangling reference), which indicates a
    /// corrupt or truncated journal.
    pub fn replay(&mut self, event: &LedgerEvent) -> Result<(), RegistryError> {
        self.apply(event)
    }

    fn apply(&mut self, event: &LedgerEvent) -> Result<(), RegistryError> {
        match event {
            LedgerEvent::OrganizationRegistered {
                org_id,
                name,
                org_type,
                identity,
                registered_by: _,
                timestamp_ns,
            } => {
                if *org_id != self.organizations.next_id() {
                    return Err(RegistryError::InvalidInput {
                        field: "event",
                        reason: format!("organization id {org_id} out of sequence"),
                    });
                }
                self.organizations
                    .insert(name.clone(), *org_type, identity.clone(), *timestamp_ns);
                Ok(())
            }

            LedgerEvent::OrganizationVerified { org_id, .. } => {
                let Some(org) = self.organizations.get_mut(*org_id) else {
                    return Err(RegistryError::OrganizationNotFound { org_id: *org_id });
                };
                // Verification is monotonic; a second verify is a no-op.
                if !org.is_verified {
                    org.is_verified = true;
                    let role = org.org_type.granted_role();
                    let identity = org.identity.clone();
                    self.access.grant(identity, role);
                }
                Ok(())
            }

            LedgerEvent::EvidenceCollected {
                evidence_id,
                case_id,
                description,
                evidence_type,
                content_reference,
                location,
                collected_by,
                timestamp_ns,
            } => {
                if *evidence_id != self.next_evidence_id() {
                    return Err(RegistryError::InvalidInput {
                        field: "event",
                        reason: format!("evidence id {evidence_id} out of sequence"),
                    });
                }
                self.evidence.push(Evidence {
                    id: *evidence_id,
                    case_id: case_id.clone(),
                    description: description.clone(),
                    evidence_type: evidence_type.clone(),
                    location: location.clone(),
                    content_reference: content_reference.clone(),
                    collected_by: collected_by.clone(),
                    collected_at_ns: *timestamp_ns,
                    status: EvidenceStatus::Collected,
                    is_active: true,
                });
                self.append_custody(
                    *evidence_id,
                    collected_by.clone(),
                    EvidenceStatus::Collected.custody_action(),
                    None,
                    *timestamp_ns,
                );
                Ok(())
            }

            LedgerEvent::EvidenceTransferred {
                evidence_id,
                to,
                transferred_by: _,
                notes,
                timestamp_ns,
            } => {
                // Custody moves to the recipient; status is unchanged.
                self.evidence(*evidence_id)?;
                self.append_custody(
                    *evidence_id,
                    to.clone(),
                    "Evidence Transferred",
                    notes.clone(),
                    *timestamp_ns,
                );
                Ok(())
            }

            LedgerEvent::EvidenceStatusUpdated {
                evidence_id,
                new_status,
                handler,
                notes,
                timestamp_ns,
            } => {
                let item = self.evidence_mut(*evidence_id)?;
                item.status = *new_status;
                self.append_custody(
                    *evidence_id,
                    handler.clone(),
                    new_status.custody_action(),
                    notes.clone(),
                    *timestamp_ns,
                );
                Ok(())
            }

            LedgerEvent::EvidenceDestroyed {
                evidence_id,
                destroyed_by,
                reason,
                timestamp_ns,
            } => {
                let item = self.evidence_mut(*evidence_id)?;
                item.status = EvidenceStatus::Destroyed;
                item.is_active = false;
                self.append_custody(
                    *evidence_id,
                    destroyed_by.clone(),
                    EvidenceStatus::Destroyed.custody_action(),
                    Some(reason.clone()),
                    *timestamp_ns,
                );
                Ok(())
            }
        }
    }

    fn append_custody(
        &mut self,
        evidence_id: EvidenceId,
        handler: Identity,
        action: &str,
        notes: Option<String>,
        timestamp_ns: u64,
    ) {
        let organization_name = self
            .organizations
            .by_identity(&handler)
            .map(|org| org.name.clone());
        self.custody.append(CustodyRecord {
            evidence_id,
            handler,
            action: action.to_string(),
            notes,
            timestamp_ns,
            organization_name,
        });
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_evidence_id(&self) -> EvidenceId {
        self.evidence.len() as u64 + 1
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// All organizations in ascending id order.
    #[must_use]
    pub fn all_organizations(&self) -> &[Organization] {
        self.organizations.all()
    }

    /// Looks up an organization by id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::OrganizationNotFound`] for an unknown id.
    pub fn organization(&self, org_id: OrganizationId) -> Result<&Organization, RegistryError> {
        self.organizations
            .get(org_id)
            .ok_or(RegistryError::OrganizationNotFound { org_id })
    }

    /// Number of registered organizations.
    #[must_use]
    pub fn organization_count(&self) -> u64 {
        self.organizations.count()
    }

    /// Returns true if `identity` holds `role`.
    #[must_use]
    pub fn has_role(&self, identity: &Identity, role: Role) -> bool {
        self.access.has_role(identity, role)
    }

    /// All evidence items in creation order.
    #[must_use]
    pub fn all_evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    /// Looks up an evidence item by id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EvidenceNotFound`] for an unknown id.
    pub fn evidence(&self, evidence_id: EvidenceId) -> Result<&Evidence, RegistryError> {
        evidence_id
            .checked_sub(1)
            .and_then(|index| self.evidence.get(index as usize))
            .ok_or(RegistryError::EvidenceNotFound { evidence_id })
    }

    fn evidence_mut(&mut self, evidence_id: EvidenceId) -> Result<&mut Evidence, RegistryError> {
        evidence_id
            .checked_sub(1)
            .and_then(|index| self.evidence.get_mut(index as usize))
            .ok_or(RegistryError::EvidenceNotFound { evidence_id })
    }

    /// Evidence items whose `case_id` matches, in creation order. Empty
    /// when no item matches; never an error.
    #[must_use]
    pub fn evidence_by_case(&self, case_id: &str) -> Vec<&Evidence> {
        self.evidence
            .iter()
            .filter(|item| item.case_id == case_id)
            .collect()
    }

    /// Number of evidence items ever collected (destroyed items included).
    #[must_use]
    pub fn evidence_count(&self) -> u64 {
        self.evidence.len() as u64
    }

    /// Chain of custody for `evidence_id`, in append order.
    #[must_use]
    pub fn chain_of_custody(&self, evidence_id: EvidenceId) -> &[CustodyRecord] {
        self.custody.chain(evidence_id)
    }

    /// Compares the stored content reference with a caller-supplied one.
    ///
    /// This verifies consistency with a reference the caller already
    /// trusts; the ledger never fetches or re-hashes the content itself.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EvidenceNotFound`] for an unknown id.
    pub fn verify_integrity(
        &self,
        evidence_id: EvidenceId,
        candidate: &str,
    ) -> Result<bool, RegistryError> {
        Ok(self.evidence(evidence_id)?.content_reference == candidate)
    }
}
