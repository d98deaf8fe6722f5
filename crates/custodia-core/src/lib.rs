//! Core library for Custodia, a permissioned evidence-custody registry.
//!
//! The registry tracks organizations and the evidence items they handle,
//! gating every mutation by role and recording every custody-relevant
//! action in an append-only chain of custody.
//!
//! # Components
//!
//! - [`access`] — roles and the identity-to-role grant table
//! - [`organization`] — organization records and the registry over them
//! - [`evidence`] — evidence records and the lifecycle state machine
//! - [`custody`] — per-item append-only chains of custody
//! - [`ledger`] — the command/event core: validation, application, replay
//! - [`journal`] — `SQLite`-backed durable event journal
//! - [`service`] — serialized, thread-safe facade tying it all together
//! - [`config`] — TOML service configuration
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
//! // Admin registers and verifies a law-enforcement organization.
//! let org_id = service.register_organization(
//!     &admin,
//!     "Metro Police",
//!     OrgType::LawEnforcement,
//!     Identity::from("0xmetro"),
//! )?;
//! service.verify_organization(&admin, org_id)?;
//!
//! // The verified organization's identity can now collect evidence.
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
//!
//! let chain = service.chain_of_custody(evidence_id)?;
//! assert_eq!(chain[0].action, "Evidence Collected");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod access;
pub mod config;
pub mod custody;
pub mod error;
pub mod event;
pub mod evidence;
pub mod identity;
pub mod journal;
pub mod ledger;
pub mod organization;
pub mod service;

pub use access::Role;
pub use config::ServiceConfig;
pub use custody::CustodyRecord;
pub use error::RegistryError;
pub use evidence::{Evidence, EvidenceId, EvidenceStatus};
pub use identity::Identity;
pub use ledger::{Command, EvidenceLedger, NewEvidence};
pub use organization::{OrgType, Organization, OrganizationId};
pub use service::{CustodyService, ServiceError};
