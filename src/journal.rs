//! Durable journal of dispatched actions
//!
//! Registered as an ordinary consumer, the journal writes every envelope it sees
//! to its own sled tree. Keys are uuid7 bytes, so iterating the tree yields
//! entries in the order they were dispatched.
use super::action::{Action, Envelope, Source};
use super::dispatcher::Consumer;
use super::time::TimeStamp;
use anyhow::Context;
use uuid7::{Uuid, uuid7};

const JOURNAL_TREE: &str = "actions";

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct JournalEntry {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub recorded_at: TimeStamp,
    #[n(2)]
    pub source: Source,
    #[n(3)]
    pub fingerprint: String, // sha256 of the cbor-encoded action
    #[n(4)]
    pub action: Action,
}

pub struct ActionJournal {
    tree: sled::Tree,
}

impl ActionJournal {
    pub fn open(db: &sled::Db) -> anyhow::Result<Self> {
        let tree = db
            .open_tree(JOURNAL_TREE)
            .context("failed to open action journal tree")?;
        Ok(Self { tree })
    }

    fn record(&self, envelope: &Envelope) -> anyhow::Result<JournalEntry> {
        let key: Uuid = uuid7();
        let fingerprint = envelope.action.fingerprint()?;

        let entry = JournalEntry {
            id: key.to_string(),
            recorded_at: TimeStamp::now(),
            source: envelope.source,
            fingerprint,
            action: envelope.action.clone(),
        };

        self.tree.insert(key.as_bytes(), minicbor::to_vec(&entry)?)?;
        Ok(entry)
    }

    /// Every recorded entry, oldest first.
    pub fn entries(&self) -> anyhow::Result<Vec<JournalEntry>> {
        self.tree
            .iter()
            .values()
            .map(|value| {
                let value = value?;
                minicbor::decode::<JournalEntry>(&value)
                    .context("failed to decode journal entry")
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl Consumer for ActionJournal {
    fn handle(&self, envelope: &Envelope) {
        match self.record(envelope) {
            Ok(entry) => {
                tracing::trace!(id = %entry.id, action = %envelope.action.kind(), "journaled action")
            }
            Err(err) => {
                tracing::error!(error = %err, action = %envelope.action.kind(), "failed to journal action")
            }
        }
    }
}
