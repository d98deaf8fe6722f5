//! Tests for the event journal.

use rusqlite::Connection;
use tempfile::TempDir;

use super::{Journal, JournalError};
use crate::event::LedgerEvent;
use crate::identity::Identity;
use crate::organization::OrgType;

fn registered_event(org_id: u64) -> LedgerEvent {
    LedgerEvent::OrganizationRegistered {
        org_id,
        name: "Metro Police".to_string(),
        org_type: OrgType::LawEnforcement,
        identity: Identity::from("0xlea"),
        registered_by: Identity::from("0xadmin"),
        timestamp_ns: 1_000,
    }
}

#[test]
fn append_assigns_sequence_numbers_from_one() {
    let journal = Journal::in_memory().unwrap();
    assert_eq!(journal.append(&registered_event(1)).unwrap(), 1);
    assert_eq!(journal.append(&registered_event(2)).unwrap(), 2);
    assert_eq!(journal.event_count().unwrap(), 2);
}

#[test]
fn read_from_returns_events_after_cursor_in_order() {
    let journal = Journal::in_memory().unwrap();
    for org_id in 1..=5 {
        journal.append(&registered_event(org_id)).unwrap();
    }

    let all = journal.read_from(0, 100).unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].seq, 1);
    assert_eq!(all[4].seq, 5);

    let tail = journal.read_from(3, 100).unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].seq, 4);

    let page = journal.read_from(0, 2).unwrap();
    assert_eq!(page.len(), 2);

    assert!(journal.read_from(5, 100).unwrap().is_empty());
}

#[test]
fn events_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.db");

    {
        let journal = Journal::open(&path).unwrap();
        journal.append(&registered_event(1)).unwrap();
    }

    let reopened = Journal::open(&path).unwrap();
    let entries = reopened.read_from(0, 100).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event, registered_event(1));
}

#[test]
fn triggers_reject_update_and_delete() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.db");

    let journal = Journal::open(&path).unwrap();
    journal.append(&registered_event(1)).unwrap();

    // Even a direct connection cannot rewrite history.
    let conn = Connection::open(&path).unwrap();
    let update = conn.execute("UPDATE events SET actor = '0xevil' WHERE seq = 1", []);
    assert!(update.is_err());
    let delete = conn.execute("DELETE FROM events WHERE seq = 1", []);
    assert!(delete.is_err());

    assert_eq!(journal.event_count().unwrap(), 1);
}

#[test]
fn corrupt_payload_is_reported_with_its_seq() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.db");

    let journal = Journal::open(&path).unwrap();
    journal.append(&registered_event(1)).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO events (event_type, actor, timestamp_ns, payload)
         VALUES ('bogus', '0x0', 0, 'not json')",
        [],
    )
    .unwrap();

    let err = journal.read_from(0, 100).unwrap_err();
    assert!(matches!(err, JournalError::Corrupt { seq: 2, .. }));
}
