//! Decoder of timed-data payloads.
//!
//! A payload `ZZZZ...` of `2n` characters splits the measure into `n` even slots. Each slot has a 2-character code, and `00` means nothing is in the slot.

use crate::sus::command::time::{Measure, MeasurePosition};

/// The code representing an empty slot.
pub const EMPTY_CODE: &str = "00";

/// A decoded, non-empty slot of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedObj<'a> {
    /// The index of the slot.
    pub index: u32,
    /// The number of slots in the line.
    pub slots: u32,
    /// The 2-character code in the slot.
    pub code: &'a str,
}

impl DecodedObj<'_> {
    /// The measure-space position of this slot on the line of `measure`.
    #[must_use]
    pub fn position(&self, measure: Measure) -> MeasurePosition {
        MeasurePosition::new(measure, self.index, self.slots)
            .unwrap_or_else(|| MeasurePosition::head_of(measure))
    }

    /// The first character of the code, which means the kind of the object.
    #[must_use]
    pub fn kind(&self) -> char {
        self.code.chars().next().unwrap_or('0')
    }

    /// The second character of the code, which means the width of notes.
    #[must_use]
    pub fn param(&self) -> char {
        self.code.chars().nth(1).unwrap_or('0')
    }
}

/// An iterator over the non-empty slots of a payload.
///
/// The payload must be checked as an even-length ASCII string in advance, see [`is_valid_payload`].
#[derive(Debug, Clone)]
pub struct ObjIter<'a> {
    payload: &'a str,
    next: u32,
    slots: u32,
}

impl<'a> ObjIter<'a> {
    /// Starts decoding `payload`.
    #[must_use]
    pub fn new(payload: &'a str) -> Self {
        Self {
            payload,
            next: 0,
            slots: (payload.len() / 2) as u32,
        }
    }
}

impl<'a> Iterator for ObjIter<'a> {
    type Item = DecodedObj<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.slots {
            let index = self.next;
            self.next += 1;
            let start = index as usize * 2;
            let code = self.payload.get(start..start + 2)?;
            if code == EMPTY_CODE {
                continue;
            }
            return Some(DecodedObj {
                index,
                slots: self.slots,
                code,
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some((self.slots - self.next) as usize))
    }
}

/// Checks whether `payload` is a sequence of 2-character alphanumeric codes.
#[must_use]
pub fn is_valid_payload(payload: &str) -> bool {
    !payload.is_empty()
        && payload.len() % 2 == 0
        && payload.chars().all(|c| c.is_ascii_alphanumeric())
}
