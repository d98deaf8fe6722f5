//! Append-only chain of custody.
//!
//! One ordered sequence of [`CustodyRecord`]s exists per evidence id.
//! Records are written exclusively as a synchronous side effect of ledger
//! mutations; there is no independent write path, and entries are never
//! edited or removed. Entry 0 of every chain is the creation event.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceId;
use crate::identity::Identity;

/// A single handling event in an evidence item's chain of custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct CustodyRecord {
    /// The evidence item this record belongs to.
    pub evidence_id: EvidenceId,
    /// Identity holding the evidence after this event.
    pub handler: Identity,
    /// Lifecycle action, e.g. "Evidence Collected".
    pub action: String,
    /// Optional free-text notes supplied by the caller.
    pub notes: Option<String>,
    /// Event timestamp in nanoseconds since the Unix epoch.
    pub timestamp_ns: u64,
    /// Organization name resolved from the handler at write time; `None`
    /// when the handler is not bound to a registered organization.
    pub organization_name: Option<String>,
}

/// Append-only custody log: an arena of immutable records indexed by
/// evidence id.
#[derive(Debug, Clone, Default)]
pub struct CustodyLog {
    chains: HashMap<EvidenceId, Vec<CustodyRecord>>,
}

impl CustodyLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to its evidence chain. Internal-only: called
    /// exclusively by ledger mutations.
    pub(crate) fn append(&mut self, record: CustodyRecord) {
        self.chains.entry(record.evidence_id).or_default().push(record);
    }

    /// Every record for `evidence_id`, in append order. Empty for an id
    /// with no history.
    #[must_use]
    pub fn chain(&self, evidence_id: EvidenceId) -> &[CustodyRecord] {
        self.chains
            .get(&evidence_id)
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(evidence_id: EvidenceId, action: &str, timestamp_ns: u64) -> CustodyRecord {
        CustodyRecord {
            evidence_id,
            handler: Identity::from("0xhandler"),
            action: action.to_string(),
            notes: None,
            timestamp_ns,
            organization_name: Some("Metro Police".to_string()),
        }
    }

    #[test]
    fn chains_preserve_append_order_per_evidence() {
        let mut log = CustodyLog::new();
        log.append(record(1, "Evidence Collected", 10));
        log.append(record(2, "Evidence Collected", 11));
        log.append(record(1, "Evidence Transferred", 12));

        let chain = log.chain(1);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].action, "Evidence Collected");
        assert_eq!(chain[1].action, "Evidence Transferred");
        assert_eq!(log.chain(2).len(), 1);
    }

    #[test]
    fn unknown_evidence_has_empty_chain() {
        let log = CustodyLog::new();
        assert!(log.chain(99).is_empty());
    }
}
