//! Definitions of command argument data.
//!
//! Structures in this module can be used in the [`lex`](crate::sus::lex) part, the timeline part and the output models.

pub mod mixin;
pub mod time;

/// The radix of digits used for a numeric field in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Radix {
    /// Decimal digits `0-9`.
    #[default]
    Base10,
    /// Case-insensitive alphanumeric digits `0-9A-Z`.
    Base36,
}

impl Radix {
    /// Returns the radix as a number.
    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::Base10 => 10,
            Self::Base36 => 36,
        }
    }

    /// Parses `digits` in this radix. Signs and empty strings are rejected.
    #[must_use]
    pub fn parse(self, digits: &str) -> Option<u32> {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(self.get())) {
            return None;
        }
        u32::from_str_radix(digits, self.get()).ok()
    }
}

/// Converts a base-36 character `0-9A-Za-z` into its value.
pub(crate) fn base36_digit(ch: char) -> Option<u32> {
    ch.to_digit(36)
}

/// The coarse event family of a timed line, selected by the first character of its column code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NoteFamily {
    /// `0x`: time signature, tempo references and other controls.
    Control,
    /// `1x`: tap notes.
    Tap,
    /// `2xy`: hold notes.
    Hold,
    /// `3xy`: slide notes.
    Slide,
    /// `4xy`: the secondary slide notes.
    SlideVariant,
    /// `5x`: flick/directional notes.
    Flick,
}

impl NoteFamily {
    /// Reads a family from the first character of a column code.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '0' => Self::Control,
            '1' => Self::Tap,
            '2' => Self::Hold,
            '3' => Self::Slide,
            '4' => Self::SlideVariant,
            '5' => Self::Flick,
            _ => return None,
        })
    }
}

impl std::fmt::Display for NoteFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Control => "control",
            Self::Tap => "tap",
            Self::Hold => "hold",
            Self::Slide => "slide",
            Self::SlideVariant => "slide variant",
            Self::Flick => "flick",
        };
        f.write_str(name)
    }
}

/// The column code of a timed line, the characters between the measure field and `:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Column {
    /// `02`: sets beats per measure from this measure.
    TimeSignature,
    /// `08`: places tempo-table references.
    TempoReference,
    /// `1x`: taps on the lane `x`.
    Tap {
        /// The left lane of taps.
        lane: u32,
    },
    /// `3xy`: slide fragments on the lane `x` and the channel `y`.
    Slide {
        /// The left lane of fragments.
        lane: u32,
        /// The channel pairing start and end fragments.
        channel: u32,
    },
    /// Other families this crate does not model.
    Unsupported(NoteFamily),
    /// Control columns other than `02` and `08`.
    OtherControl,
}

impl Column {
    /// Reads a column code such as `02`, `1a` or `3a1`.
    ///
    /// Returns `None` if the code is not a known shape.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let family = NoteFamily::from_char(chars.next()?)?;
        Some(match family {
            NoteFamily::Control => match code {
                "02" => Self::TimeSignature,
                "08" => Self::TempoReference,
                _ => Self::OtherControl,
            },
            NoteFamily::Tap => match (chars.next(), chars.next()) {
                (Some(lane), None) => Self::Tap {
                    lane: base36_digit(lane)?,
                },
                _ => return None,
            },
            NoteFamily::Slide => match (chars.next(), chars.next(), chars.next()) {
                (Some(lane), Some(channel), None) => Self::Slide {
                    lane: base36_digit(lane)?,
                    channel: base36_digit(channel)?,
                },
                _ => return None,
            },
            other => Self::Unsupported(other),
        })
    }
}
