use serde::Serialize;

use crate::decode::bits::{BitLayout, to_signed};

/// Bit numbering convention of a signal, the `@0` / `@1` digit of an `SG_` record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ByteOrder {
    /// `@0`, Motorola: the start bit is the most significant bit of the field.
    BigEndian,
    /// `@1`, Intel: the start bit is the least significant bit of the field.
    #[default]
    LittleEndian,
}

impl ByteOrder {
    /// Maps the DBC byte-order digit. Anything other than `0` or `1` is rejected.
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(ByteOrder::BigEndian),
            '1' => Some(ByteOrder::LittleEndian),
            _ => None,
        }
    }

    pub fn to_str(&self) -> String {
        match self {
            ByteOrder::BigEndian => "Motorola".to_string(),
            ByteOrder::LittleEndian => "Intel".to_string(),
        }
    }
}

/// What role (if any) a signal plays in multiplexing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MuxRole {
    /// Not multiplexed (always present).
    #[default]
    None,
    /// This signal is the multiplexer switch (marked as `M` in DBC).
    Multiplexor,
    /// Present only when the switch raw value equals the group (marked as `mX`).
    Multiplexed(u64),
}

/// Definition of a signal within a CAN message (DBC).
///
/// Describes position/bit-length, byte order, sign, scaling (factor/offset),
/// advisory range, unit of measure, receiver nodes and multiplexing role.
/// Comments and value tables are not stored here: they live in the
/// [`Database`](crate::Database) lookup tables and are applied at decode time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Signal {
    /// Signal name.
    pub name: String,
    /// Start bit in the payload (bit 0 = LSB of the first byte).
    pub start_bit: u16,
    /// Bit length.
    pub length: u16,
    pub byte_order: ByteOrder,
    /// `true` for two's-complement signals (`-` in DBC).
    pub signed: bool,
    /// Scaling factor.
    pub factor: f64,
    /// Scaling offset.
    pub offset: f64,
    /// Minimum physical value. Advisory only, never enforced.
    pub min: f64,
    /// Maximum physical value. Advisory only, never enforced.
    pub max: f64,
    /// Unit of measure, `None` when the DBC declares `""`.
    pub unit: Option<String>,
    /// Receiver node names.
    pub receivers: Vec<String>,
    pub mux: MuxRole,
}

impl Signal {
    pub fn is_multiplexor(&self) -> bool {
        self.mux == MuxRole::Multiplexor
    }

    /// The group this signal belongs to, if it is multiplexed.
    pub fn mux_group(&self) -> Option<u64> {
        match self.mux {
            MuxRole::Multiplexed(group) => Some(group),
            _ => None,
        }
    }

    /// Extracts the raw integer from `payload`, sign-extended when the signal is signed.
    ///
    /// Bytes missing from `payload` read as zero. An unsigned 64-bit field
    /// holding a value above `i64::MAX` saturates to `i64::MAX`; decoding is
    /// exact for fields up to 63 bits.
    #[inline]
    pub fn raw_value(&self, payload: &[u8]) -> i64 {
        let layout: BitLayout = BitLayout::new(self.start_bit, self.length, self.byte_order);
        let raw_u: u64 = layout.extract(payload);
        if self.signed {
            to_signed(raw_u, self.length)
        } else {
            i64::try_from(raw_u).unwrap_or(i64::MAX)
        }
    }

    /// Linear conversion `raw * factor + offset`.
    #[inline]
    pub fn physical(&self, raw: i64) -> f64 {
        (raw as f64) * self.factor + self.offset
    }
}
