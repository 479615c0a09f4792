//! Waveforms
//!
//!     A wave maps a phase onto a value in `[0, amplitude]` plus the direction it is moving
//!     in. One cycle is made of up to four segments:
//!
//!         rise (up_period) -> crest hold (crest_wait)
//!           -> fall (down_period) -> trough hold (trough_wait)
//!
//!     With no holds this is a plain wave. A trough hold alone gives a pulse, a crest hold
//!     alone an inverted pulse, both together a one-directional pulse (see [WaveMode]).
//!
//!     Phase is `time * velocity + offset`. All segment durations are scaled by velocity, so
//!     velocity changes how far apart characters with different offsets are in the cycle,
//!     not how long a cycle takes. A velocity of zero freezes time: the phase is the offset
//!     alone and durations stay in curve units.
//!
//!     Per-character offsets come from [offset], rise and fall shapes from [curve].

pub mod curve;
pub mod evaluator;
pub mod offset;

pub use curve::Curve;
pub use evaluator::{ExtremaTiming, Wave, WaveConfig, WaveMode};
pub use offset::OffsetKind;
