//! Database model (SlotMap-backed).
//!
//! Messages live in a **SlotMap** arena addressed by `MessageKey`, with an
//! `id → key` index for decoding and a case-insensitive `name → key` index.
//! Signal comments and value tables are kept apart from the signals, in maps
//! keyed by [`SignalRef`], and are applied by the decoder.
//!
//! A [`Database`] is only built by the DBC parser. Once returned it is
//! read-only: every field is private and exposed through `&self` accessors,
//! so it can be shared as `Arc<Database>` between decoding workers.

use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dbc::types::{message::Message, signal::Signal};

// --- Stable keys (SlotMap) ---
new_key_type! { pub(crate) struct MessageKey; }

/// Integer → label mapping from a `VAL_` record.
pub type ValueTable = BTreeMap<i64, String>;

/// Composite key addressing one signal of one message: `(message id, signal name)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SignalRef {
    pub message_id: u32,
    pub signal_name: String,
}

impl SignalRef {
    pub fn new(message_id: u32, signal_name: &str) -> Self {
        SignalRef {
            message_id,
            signal_name: signal_name.to_string(),
        }
    }
}

/// In-memory representation of a parsed DBC.
#[derive(Default, Clone, Debug)]
pub struct Database {
    // --- Main storage (stable-key map) ---
    messages: SlotMap<MessageKey, Message>,

    // --- Lookups ---
    msg_key_by_id: BTreeMap<u32, MessageKey>, // id → MessageKey, ordered for iteration
    msg_key_by_name: HashMap<String, MessageKey>, // lower(name) → MessageKey

    // --- Decode-time tables ---
    transmitters: BTreeSet<String>,
    signal_comments: HashMap<SignalRef, String>,
    value_tables: HashMap<SignalRef, ValueTable>,
}

impl Database {
    // ------------- Messages ------------
    /// Returns the message with the given numeric CAN id.
    pub fn message_by_id(&self, id: u32) -> Option<&Message> {
        let key: MessageKey = *self.msg_key_by_id.get(&id)?;
        self.messages.get(key)
    }

    /// Returns the message with the given name (case-insensitive).
    pub fn message_by_name(&self, name: &str) -> Option<&Message> {
        let key: MessageKey = *self.msg_key_by_name.get(&name.to_lowercase())?;
        self.messages.get(key)
    }

    /// Iterates messages in ascending id order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.msg_key_by_id
            .values()
            .filter_map(move |&key| self.messages.get(key))
    }

    pub fn message_count(&self) -> usize {
        self.msg_key_by_id.len()
    }

    /// Total number of signals across all messages.
    pub fn signal_count(&self) -> usize {
        self.messages().map(|m| m.signals.len()).sum()
    }

    // ------------- Nodes ------------
    /// Transmitter node names seen in `BO_` records, sorted.
    pub fn transmitters(&self) -> impl Iterator<Item = &str> + '_ {
        self.transmitters.iter().map(String::as_str)
    }

    pub fn transmitter_count(&self) -> usize {
        self.transmitters.len()
    }

    // ------------- Comments / value tables ------------
    pub fn signal_comment(&self, message_id: u32, signal_name: &str) -> Option<&str> {
        self.signal_comment_by_ref(&SignalRef::new(message_id, signal_name))
    }

    pub fn signal_comment_by_ref(&self, key: &SignalRef) -> Option<&str> {
        self.signal_comments.get(key).map(String::as_str)
    }

    pub fn signal_comment_count(&self) -> usize {
        self.signal_comments.len()
    }

    pub fn value_table(&self, message_id: u32, signal_name: &str) -> Option<&ValueTable> {
        self.value_table_by_ref(&SignalRef::new(message_id, signal_name))
    }

    pub fn value_table_by_ref(&self, key: &SignalRef) -> Option<&ValueTable> {
        self.value_tables.get(key)
    }

    pub fn value_table_count(&self) -> usize {
        self.value_tables.len()
    }
}

/// Mutable parsing state. Owns the [`Database`] until [`DatabaseBuilder::finish`]
/// hands it out, so no half-built database is ever visible to callers.
#[derive(Default, Debug)]
pub(crate) struct DatabaseBuilder {
    db: Database,
    // Parsing state: last message seen (used by SG_ decoder)
    current_msg: Option<MessageKey>,
}

impl DatabaseBuilder {
    /// Inserts a message and makes it the current one for subsequent `SG_` lines.
    /// A message already registered under the same id is replaced.
    pub(crate) fn open_message(&mut self, message: Message) -> MessageKey {
        let db: &mut Database = &mut self.db;

        if let Some(old_key) = db.msg_key_by_id.remove(&message.id)
            && let Some(old) = db.messages.remove(old_key)
        {
            tracing::debug!(
                id = message.id,
                old = %old.name,
                new = %message.name,
                "duplicate BO_ id, replacing message"
            );
            let old_name: String = old.name.to_lowercase();
            if db.msg_key_by_name.get(&old_name) == Some(&old_key) {
                db.msg_key_by_name.remove(&old_name);
            }
        }

        if !message.transmitter.is_empty() {
            db.transmitters.insert(message.transmitter.clone());
        }

        let id: u32 = message.id;
        let name: String = message.name.to_lowercase();
        let key: MessageKey = db.messages.insert(message);
        db.msg_key_by_id.insert(id, key);
        db.msg_key_by_name.insert(name, key);
        self.current_msg = Some(key);
        key
    }

    /// Appends a signal to the current message. Returns `false` when no message is open.
    pub(crate) fn push_signal(&mut self, signal: Signal) -> bool {
        let Some(key) = self.current_msg else {
            return false;
        };
        let Some(msg) = self.db.messages.get_mut(key) else {
            return false;
        };
        if signal.is_multiplexor()
            && let Some(switch) = msg.multiplexer()
        {
            tracing::debug!(
                message = %msg.name,
                switch = %switch.name,
                ignored = %signal.name,
                "second multiplexer switch declared; only the first one selects groups"
            );
        }
        msg.signals.push(signal);
        true
    }

    pub(crate) fn set_signal_comment(&mut self, key: SignalRef, comment: String) {
        self.db.signal_comments.insert(key, comment);
    }

    pub(crate) fn set_value_table(&mut self, key: SignalRef, table: ValueTable) {
        self.db.value_tables.insert(key, table);
    }

    pub(crate) fn finish(self) -> Database {
        self.db
    }
}
