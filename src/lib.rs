//! The SUS (Sliding Universal Score) chart parser, which resolves every note onto a beat and seconds timeline.
//!
//! The chart text is parsed by [`sus::parse_sus`] into a [`sus::model::Timeline`]. Notes, tempo changes and time signature changes in it carry both the position in beats and the time in seconds.
//!
//! # Features
//!
//! - `serde`: derives `Serialize` and `Deserialize` on models, configurations, warnings and errors.
//! - `diagnostics` (default): renders warnings and errors with [`ariadne`](https://docs.rs/ariadne), see the `diagnostics` module.

#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod sus;
mod util;
