//! Serialized service facade over the evidence ledger.
//!
//! [`CustodyService`] is the single ordering authority required by the
//! concurrency model: concurrent callers may submit mutations
//! simultaneously, but every mutation is applied one at a time against a
//! single consistent view of the state, under one write lock. The record
//! mutation and its custody append commit as one indivisible unit, and
//! sequential id allocation is atomic — two concurrent collections can
//! never be assigned the same id.
//!
//! # Durability
//!
//! With a journal configured, the commit order inside the write lock is
//! validate, append the event to the journal, then apply in memory. A
//! journal append failure therefore leaves the in-memory state untouched.
//! On open, the journal is replayed from genesis to rebuild state.
//!
//! # Example
//!
//! ```rust
//! use custodia_core::identity::Identity;
//! use custodia_core::ledger::NewEvidence;
//! use custodia_core::organization::OrgType;
//! use custodia_core::service::CustodyService;
//!
//! # fn example() -> Result<(), custodia_core::service::ServiceError> {
//! let admin = Identity::from("0xadmin");
//! let service = CustodyService::in_memory(admin.clone());
//!
//! let org_id = service.register_organization(
//!     &admin,
//!     "Metro Police",
//!     OrgType::LawEnforcement,
//!     Identity::from("0xmetro"),
//! )?;
//! service.verify_organization(&admin, org_id)?;
//!
//! let evidence_id = service.collect_evidence(
//!     &Identity::from("0xmetro"),
//!     NewEvidence {
//!         case_id: "CASE-001".to_string(),
//!         description: "Laptop hard drive".to_string(),
//!         evidence_type: "Digital".to_string(),
//!         content_reference: "QmTestHash123".to_string(),
//!         location: "Evidence Room 5".to_string(),
//!     },
//! )?;
//! assert!(service.verify_integrity(evidence_id, "QmTestHash123")?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::access::Role;
use crate::config::ServiceConfig;
use crate::custody::CustodyRecord;
use crate::error::RegistryError;
use crate::event::LedgerEvent;
use crate::evidence::{Evidence, EvidenceId, EvidenceStatus};
use crate::identity::{Identity, now_ns};
use crate::journal::{Journal, JournalError};
use crate::ledger::{Command, EvidenceLedger, NewEvidence};
use crate::organization::{OrgType, Organization, OrganizationId};

/// Number of journal entries read per batch during replay.
const REPLAY_BATCH: usize = 256;

/// Errors surfaced by the service facade.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    /// The ledger rejected the operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The journal failed to persist or read events.
    #[error(transparent)]
    Journal(#[from] JournalError),
}

/// Thread-safe, serialized facade over an [`EvidenceLedger`] with
/// optional journal-backed durability.
#[derive(Debug)]
pub struct CustodyService {
    ledger: RwLock<EvidenceLedger>,
    journal: Option<Journal>,
}

impl CustodyService {
    /// Creates an in-memory service with no durable journal.
    #[must_use]
    pub fn in_memory(admin: Identity) -> Self {
        Self {
            ledger: RwLock::new(EvidenceLedger::bootstrap(admin)),
            journal: None,
        }
    }

    /// Opens a service from configuration, replaying the journal (if any)
    /// to rebuild state.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Journal`] if the journal cannot be opened
    /// or read, or [`ServiceError::Registry`] if a journaled event no
    /// longer applies cleanly (a corrupt or truncated journal).
    pub fn open(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let mut ledger = EvidenceLedger::bootstrap(Identity::new(&config.admin_identity));
        let journal = match &config.journal_path {
            Some(path) => Some(Journal::open(path)?),
            None => None,
        };

        if let Some(journal) = &journal {
            let mut cursor = 0u64;
            let mut replayed = 0u64;
            loop {
                let batch = journal.read_from(cursor, REPLAY_BATCH)?;
                if batch.is_empty() {
                    break;
                }
                for entry in batch {
                    ledger.replay(&entry.event)?;
                    cursor = entry.seq;
                    replayed += 1;
                }
            }
            info!(events = replayed, "journal replayed");
        }

        Ok(Self {
            ledger: RwLock::new(ledger),
            journal,
        })
    }

    /// Validates, persists, and applies one mutation under the write lock.
    fn submit(&self, caller: &Identity, command: Command) -> Result<LedgerEvent, ServiceError> {
        let timestamp_ns = now_ns();
        let mut ledger = self
            .ledger
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;

        let event = match ledger.validate(caller, &command, timestamp_ns) {
            Ok(event) => event,
            Err(err) => {
                warn!(caller = %caller, error = %err, "mutation rejected");
                return Err(err.into());
            }
        };
        if let Some(journal) = &self.journal {
            let seq = journal.append(&event)?;
            debug!(seq, event = event.event_type(), "event journaled");
        }
        ledger.replay(&event)?;
        info!(event = event.event_type(), actor = %event.actor(), "mutation committed");
        Ok(event)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Registers a new organization. Admin-only.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Unauthorized`] for non-Admin callers;
    /// [`RegistryError::InvalidInput`] for an empty or oversized name.
    pub fn register_organization(
        &self,
        caller: &Identity,
        name: &str,
        org_type: OrgType,
        identity: Identity,
    ) -> Result<OrganizationId, ServiceError> {
        let event = self.submit(
            caller,
            Command::RegisterOrganization {
                name: name.to_string(),
                org_type,
                identity,
            },
        )?;
        match event {
            LedgerEvent::OrganizationRegistered { org_id, .. } => Ok(org_id),
            _ => unreachable!("register command committed a non-register event"),
        }
    }

    /// Verifies an organization, granting its type's role to the bound
    /// identity. Admin-only.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Unauthorized`] for non-Admin callers;
    /// [`RegistryError::OrganizationNotFound`] for an unknown id.
    pub fn verify_organization(
        &self,
        caller: &Identity,
        org_id: OrganizationId,
    ) -> Result<(), ServiceError> {
        self.submit(caller, Command::VerifyOrganization { org_id })?;
        Ok(())
    }

    /// Collects a new evidence item. Requires the Collector role and a
    /// verified organization bound to the caller.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Unauthorized`] when the role or verification
    /// precondition fails.
    pub fn collect_evidence(
        &self,
        caller: &Identity,
        submission: NewEvidence,
    ) -> Result<EvidenceId, ServiceError> {
        let event = self.submit(caller, Command::CollectEvidence { submission })?;
        match event {
            LedgerEvent::EvidenceCollected { evidence_id, .. } => Ok(evidence_id),
            _ => unreachable!("collect command committed a non-collect event"),
        }
    }

    /// Transfers custody of an evidence item to another verified
    /// organization's identity. Status is unchanged.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnverifiedRecipient`] when the recipient is not
    /// bound to a verified organization; [`RegistryError::EvidenceNotFound`]
    /// or [`RegistryError::InvalidTransition`] for unknown or inactive
    /// evidence.
    pub fn transfer_evidence(
        &self,
        caller: &Identity,
        evidence_id: EvidenceId,
        to: Identity,
        notes: Option<String>,
    ) -> Result<(), ServiceError> {
        self.submit(
            caller,
            Command::TransferEvidence {
                evidence_id,
                to,
                notes,
            },
        )?;
        Ok(())
    }

    /// Moves an evidence item to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidTransition`] when the item is inactive, the
    /// caller's role may not set the target status, or the edge is not
    /// allowed.
    pub fn update_evidence_status(
        &self,
        caller: &Identity,
        evidence_id: EvidenceId,
        new_status: EvidenceStatus,
        notes: Option<String>,
    ) -> Result<(), ServiceError> {
        self.submit(
            caller,
            Command::UpdateEvidenceStatus {
                evidence_id,
                new_status,
                notes,
            },
        )?;
        Ok(())
    }

    /// Irreversibly destroys an evidence item. Admin-only.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Unauthorized`] for non-Admin callers;
    /// [`RegistryError::EvidenceNotFound`] for an unknown id;
    /// [`RegistryError::InvalidTransition`] if already destroyed.
    pub fn destroy_evidence(
        &self,
        caller: &Identity,
        evidence_id: EvidenceId,
        reason: &str,
    ) -> Result<(), ServiceError> {
        self.submit(
            caller,
            Command::DestroyEvidence {
                evidence_id,
                reason: reason.to_string(),
            },
        )?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// All organizations in ascending id order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::LockPoisoned`] if the state lock is poisoned.
    pub fn all_organizations(&self) -> Result<Vec<Organization>, ServiceError> {
        let ledger = self.read_ledger()?;
        Ok(ledger.all_organizations().to_vec())
    }

    /// Looks up an organization by id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::OrganizationNotFound`] for an unknown id.
    pub fn organization(&self, org_id: OrganizationId) -> Result<Organization, ServiceError> {
        let ledger = self.read_ledger()?;
        Ok(ledger.organization(org_id)?.clone())
    }

    /// Number of registered organizations.
    ///
    /// # Errors
    ///
    /// [`RegistryError::LockPoisoned`] if the state lock is poisoned.
    pub fn organization_count(&self) -> Result<u64, ServiceError> {
        Ok(self.read_ledger()?.organization_count())
    }

    /// Returns true if `identity` holds `role`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::LockPoisoned`] if the state lock is poisoned.
    pub fn has_role(&self, identity: &Identity, role: Role) -> Result<bool, ServiceError> {
        Ok(self.read_ledger()?.has_role(identity, role))
    }

    /// All evidence items in creation order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::LockPoisoned`] if the state lock is poisoned.
    pub fn all_evidence(&self) -> Result<Vec<Evidence>, ServiceError> {
        Ok(self.read_ledger()?.all_evidence().to_vec())
    }

    /// Looks up an evidence item by id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EvidenceNotFound`] for an unknown id.
    pub fn evidence(&self, evidence_id: EvidenceId) -> Result<Evidence, ServiceError> {
        let ledger = self.read_ledger()?;
        Ok(ledger.evidence(evidence_id)?.clone())
    }

    /// Evidence items whose `case_id` matches, in creation order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::LockPoisoned`] if the state lock is poisoned.
    pub fn evidence_by_case(&self, case_id: &str) -> Result<Vec<Evidence>, ServiceError> {
        let ledger = self.read_ledger()?;
        Ok(ledger
            .evidence_by_case(case_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Number of evidence items ever collected.
    ///
    /// # Errors
    ///
    /// [`RegistryError::LockPoisoned`] if the state lock is poisoned.
    pub fn evidence_count(&self) -> Result<u64, ServiceError> {
        Ok(self.read_ledger()?.evidence_count())
    }

    /// Chain of custody for `evidence_id`, in append order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::LockPoisoned`] if the state lock is poisoned.
    pub fn chain_of_custody(
        &self,
        evidence_id: EvidenceId,
    ) -> Result<Vec<CustodyRecord>, ServiceError> {
        Ok(self.read_ledger()?.chain_of_custody(evidence_id).to_vec())
    }

    /// Compares the stored content reference with a caller-supplied one.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EvidenceNotFound`] for an unknown id.
    pub fn verify_integrity(
        &self,
        evidence_id: EvidenceId,
        candidate: &str,
    ) -> Result<bool, ServiceError> {
        Ok(self.read_ledger()?.verify_integrity(evidence_id, candidate)?)
    }

    fn read_ledger(&self) -> Result<std::sync::RwLockReadGuard<'_, EvidenceLedger>, ServiceError> {
        self.ledger
            .read()
            .map_err(|_| RegistryError::LockPoisoned.into())
    }
}
