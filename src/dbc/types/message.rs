use serde::Serialize;

use crate::dbc::types::signal::Signal;

/// Largest identifier that fits the 11-bit standard format.
const MAX_STANDARD_ID: u32 = 0x7FF;

/// CAN message defined in the database (`BO_` record).
///
/// Signals keep their declaration order: the decoder walks them in that order
/// and the first `M` signal is the multiplexer switch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Message {
    /// Numeric CAN ID (base 10, as written in the DBC).
    pub id: u32,
    /// Message name.
    pub name: String,
    /// Declared payload length in bytes.
    pub dlc: u16,
    /// Transmitting node (ECU).
    pub transmitter: String,
    /// Signals in file order.
    pub signals: Vec<Signal>,
}

impl Message {
    /// Returns the multiplexer switch signal, if the message has one.
    pub fn multiplexer(&self) -> Option<&Signal> {
        self.signals.iter().find(|s| s.is_multiplexor())
    }

    /// Returns a signal by name (exact match).
    pub fn signal_by_name(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn id_format(&self) -> IdFormat {
        IdFormat::of(self.id)
    }

    /// Canonical hexadecimal id, see [`format_id_hex`].
    pub fn id_hex(&self) -> String {
        format_id_hex(self.id)
    }
}

#[derive(Default, Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub enum IdFormat {
    #[default]
    Standard,
    Extended,
}

impl IdFormat {
    pub fn of(id: u32) -> Self {
        if id > MAX_STANDARD_ID {
            IdFormat::Extended
        } else {
            IdFormat::Standard
        }
    }

    pub fn to_str(&self) -> String {
        match self {
            IdFormat::Standard => "Standard".to_string(),
            IdFormat::Extended => "Extended".to_string(),
        }
    }
}

/// Uppercase hexadecimal id, zero-padded to 3 digits for standard ids
/// and to 8 digits for extended ids (candump's own convention).
pub fn format_id_hex(id: u32) -> String {
    match IdFormat::of(id) {
        IdFormat::Standard => format!("{:03X}", id),
        IdFormat::Extended => format!("{:08X}", id),
    }
}
