//! SMPTE timecode for arbitrary rational frame rates.
//!
//! This crate converts between 1-based frame counts and timecode text:
//!
//! - **Frame rates**: any positive rational rate; NTSC rates such as
//!   `29.97` are recognized and stored exactly as `30000/1001`
//! - **Drop-frame timecode**: label skipping for the 29.97 family
//! - **Millisecond and fractional-second display**: `HH:MM:SS.mmm`
//! - **Timestamps**: label-following system time and exact wall-clock
//!   real time
//!
//! # Quick Start
//!
//! ```rust
//! use framecode::{FrameRate, Timecode};
//!
//! let rate: FrameRate = "29.97".parse()?;
//! let tc = Timecode::parse("00:00:59;29", rate)?;
//! assert!(tc.is_drop_frame());
//! assert_eq!(tc.frames(), 1800);
//!
//! // ;00 and ;01 are skipped at the top of the minute.
//! assert_eq!(tc.next()?.to_string(), "00:01:00;02");
//! # Ok::<(), framecode::TimecodeError>(())
//! ```
//!
//! # Timestamps
//!
//! At NTSC rates the timecode labels run slightly ahead of the clock:
//!
//! ```rust
//! use framecode::{FrameRate, Timecode};
//!
//! let rate = FrameRate::from_ratio(30000, 1001)?;
//! let tc = Timecode::from_frames(107_893, rate)?;
//! assert_eq!(tc.to_string(), "01:00:00;00");
//! assert_eq!(tc.to_systemtime()?.to_string(), "01:00:00.033");
//! assert_eq!(tc.to_realtime()?.to_string(), "00:59:59.996");
//! # Ok::<(), framecode::TimecodeError>(())
//! ```
//!
//! # Arithmetic
//!
//! Results keep the left operand's rate and flags. Subtraction gives the
//! absolute difference:
//!
//! ```rust
//! use framecode::{FrameRate, Timecode};
//!
//! let rate = FrameRate::from_int(30)?;
//! let a = Timecode::from_frames(10, rate)?;
//! let b = Timecode::from_frames(5, rate)?;
//! assert_eq!((a + b)?.frames(), 15);
//! assert_eq!((b - a)?.frames(), 5);
//! # Ok::<(), framecode::TimecodeError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod codec;
pub mod dropframe;
pub mod error;
pub mod options;
pub mod rate;
pub mod smpte;
pub mod timestamp;

// Re-export main types
pub use codec::{parse_timecode, unpack_timecode, Rollover, TimecodeCodec, TimecodeFields};
pub use error::{Result, TimecodeError};
pub use options::{StartPosition, TimecodeBuilder, TimecodeOptions};
pub use rate::{FrameRate, StandardFrameRate};
pub use smpte::{Operand, Operation, Timecode};
pub use timestamp::{Timestamp, TimestampProjector};

pub use dropframe::DropFrameConfig;
pub use framecode_core::Rational;

/// Frames from `start` to `end`, negative if `end` comes first.
///
/// `None` when the rates differ.
#[must_use]
pub fn duration_frames(start: &Timecode, end: &Timecode) -> Option<i64> {
    (start.frame_rate() == end.frame_rate())
        .then(|| end.frames() as i64 - start.frames() as i64)
}

/// Wall-clock seconds from `start` to `end` at their shared exact rate.
///
/// `None` when the rates differ or the result overflows.
#[must_use]
pub fn duration_seconds(start: &Timecode, end: &Timecode) -> Option<Rational> {
    let frames = duration_frames(start, end)?;
    Rational::from_int(frames).checked_div(start.frame_rate().as_rational())
}
