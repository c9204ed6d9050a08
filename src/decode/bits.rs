//! Bit-field extraction from CAN payloads.
//!
//! A field is described by its start bit, length and [`ByteOrder`]. It is
//! compiled into at most [`MAX_STEPS`] byte-aligned [`Step`]s, each copying a
//! run of bits from one payload byte into the result. Bytes past the end of
//! the payload read as zero.

use crate::dbc::types::signal::ByteOrder;

/// Widest field that can be extracted.
pub const MAX_BITS: u16 = 64;

/// A 64-bit field starting mid-byte touches at most 9 bytes.
const MAX_STEPS: usize = 9;

/// Elementary step for extracting a bit field from a payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Step {
    /// Source byte index.
    pub(crate) byte_index: usize,
    /// LSB within the source byte (0..7).
    pub(crate) src_lsb: u8,
    /// Number of bits to take (1..8).
    pub(crate) width: u8,
    /// Destination LSB in the final value (LSB-first).
    pub(crate) dst_lsb: u16,
}

/// Precomputed extraction plan for one bit field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitLayout {
    steps: [Step; MAX_STEPS],
    len: usize,
}

impl BitLayout {
    /// Compiles the steps for a field. Lengths above [`MAX_BITS`] are clamped.
    pub fn new(start_bit: u16, length: u16, byte_order: ByteOrder) -> Self {
        let mut layout: BitLayout = BitLayout {
            steps: [Step::default(); MAX_STEPS],
            len: 0,
        };
        let length: u16 = length.min(MAX_BITS);
        match byte_order {
            ByteOrder::LittleEndian => layout.compile_intel(start_bit, length),
            ByteOrder::BigEndian => layout.compile_motorola(start_bit, length),
        }
        layout
    }

    #[inline]
    fn push_step(&mut self, st: Step) {
        self.steps[self.len] = st;
        self.len += 1;
    }

    /// Intel: bits ascend from `start_bit`, spilling into the next byte at bit 0.
    fn compile_intel(&mut self, start_bit: u16, length: u16) {
        let mut remaining: u16 = length;
        let mut bit: usize = start_bit as usize;
        let mut dst: u16 = 0;

        while remaining > 0 {
            let bit_off: u8 = (bit % 8) as u8;
            let take: u8 = remaining.min(u16::from(8 - bit_off)) as u8;

            self.push_step(Step {
                byte_index: bit / 8,
                src_lsb: bit_off,
                width: take,
                dst_lsb: dst,
            });

            bit += take as usize;
            dst += u16::from(take);
            remaining -= u16::from(take);
        }
    }

    /// Motorola: `start_bit` is the MSB; bits descend within the byte and
    /// continue at bit 7 of the next byte.
    fn compile_motorola(&mut self, start_bit: u16, length: u16) {
        let mut remaining: u16 = length;
        let mut byte: usize = (start_bit / 8) as usize;
        let mut bit_msb: u8 = (start_bit % 8) as u8;

        while remaining > 0 {
            let can_take: u16 = u16::from(bit_msb + 1).min(remaining);
            let src_lsb: u8 = bit_msb + 1 - can_take as u8;

            self.push_step(Step {
                byte_index: byte,
                src_lsb,
                width: can_take as u8,
                dst_lsb: remaining - can_take,
            });

            remaining -= can_take;
            byte += 1;
            bit_msb = 7;
        }
    }

    pub(crate) fn steps(&self) -> &[Step] {
        &self.steps[..self.len]
    }

    /// Extracts the **unsigned** raw value (LSB-first accumulation) from the payload.
    #[inline]
    pub fn extract(&self, payload: &[u8]) -> u64 {
        let mut out: u64 = 0;
        for st in self.steps() {
            if let Some(&b) = payload.get(st.byte_index) {
                let mask: u8 = if st.width == 8 {
                    0xFF
                } else {
                    ((1u16 << st.width) - 1) as u8
                };
                let chunk: u64 = u64::from((b >> st.src_lsb) & mask);
                out |= chunk << st.dst_lsb;
            }
        }
        out
    }
}

/// Pulls an unsigned integer of `length` bits out of `payload`.
///
/// Missing bytes contribute zeros; this never fails.
///
/// ```
/// use can_decode::{ByteOrder, extract_bits};
///
/// assert_eq!(extract_bits(&[0xA5], 7, 8, ByteOrder::BigEndian), 0xA5);
/// assert_eq!(extract_bits(&[0xA5], 0, 8, ByteOrder::LittleEndian), 0xA5);
/// ```
pub fn extract_bits(payload: &[u8], start_bit: u16, length: u16, byte_order: ByteOrder) -> u64 {
    BitLayout::new(start_bit, length, byte_order).extract(payload)
}

/// Reinterprets the low `bit_width` bits of `value` as two's-complement.
pub fn to_signed(value: u64, bit_width: u16) -> i64 {
    let n: u16 = bit_width.min(MAX_BITS);
    if n == 0 {
        return 0;
    }
    if n == MAX_BITS {
        return value as i64;
    }
    let mask: u64 = (1u64 << n) - 1;
    let raw: u64 = value & mask;
    let sign_bit: u64 = 1u64 << (n - 1);
    if raw & sign_bit != 0 {
        (raw | !mask) as i64
    } else {
        raw as i64
    }
}
