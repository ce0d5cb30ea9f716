//! The timecode value type.
//!
//! A [`Timecode`] is a 1-based frame count at a classified frame rate plus
//! the display flags that decide how it is rendered. It is immutable: every
//! transition returns a new value.
//!
//! - Arithmetic combines frame counts and keeps the left operand's rate and
//!   flags
//! - Subtraction never goes negative; the result is the absolute difference
//! - Two timecodes are equal when both rate and frame count match

use crate::codec::{Rollover, TimecodeCodec, TimecodeFields};
use crate::error::{Result, TimecodeError};
use crate::options::{StartPosition, TimecodeOptions};
use crate::rate::FrameRate;
use crate::timestamp::{Timestamp, TimestampProjector};
use framecode_core::Rational;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use tracing::debug;

/// A frame count rendered as SMPTE timecode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "TimecodeRecord", into = "TimecodeRecord")]
pub struct Timecode {
    frames: u64,
    rate: FrameRate,
    drop_frame: bool,
    fractional: bool,
    display_reference: bool,
    usec_timestamps: bool,
}

/// Serialized form; validated on the way back in.
#[derive(Serialize, Deserialize)]
struct TimecodeRecord {
    frames: u64,
    rate: FrameRate,
    #[serde(default)]
    drop_frame: bool,
    #[serde(default)]
    fractional: bool,
    #[serde(default)]
    display_reference: bool,
    #[serde(default)]
    usec_timestamps: bool,
}

impl TryFrom<TimecodeRecord> for Timecode {
    type Error = TimecodeError;

    fn try_from(record: TimecodeRecord) -> Result<Self> {
        Ok(Self {
            frames: checked_frames(i128::from(record.frames))?,
            rate: record.rate,
            drop_frame: record.drop_frame && record.rate.supports_drop_frame(),
            fractional: record.fractional,
            display_reference: record.display_reference,
            usec_timestamps: record.usec_timestamps,
        })
    }
}

impl From<Timecode> for TimecodeRecord {
    fn from(tc: Timecode) -> Self {
        Self {
            frames: tc.frames,
            rate: tc.rate,
            drop_frame: tc.drop_frame,
            fractional: tc.fractional,
            display_reference: tc.display_reference,
            usec_timestamps: tc.usec_timestamps,
        }
    }
}

/// Validate a frame count: at least 1 and small enough for signed
/// arithmetic.
fn checked_frames(frames: i128) -> Result<u64> {
    if frames < 1 || frames > i128::from(i64::MAX) {
        let saturated = if frames < 0 { i64::MIN } else { i64::MAX };
        let reported = i64::try_from(frames).unwrap_or(saturated);
        return Err(TimecodeError::invalid_frame_count(reported));
    }
    Ok(frames as u64)
}

/// Right-hand side of a comparison or arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    /// A raw frame count.
    Frames(i64),
    /// Another timecode; its frame count is used.
    Timecode(&'a Timecode),
    /// Timecode text, read at the left operand's rate.
    Text(&'a str),
}

impl Operand<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Frames(_) => "frames",
            Self::Timecode(_) => "timecode",
            Self::Text(_) => "text",
        }
    }
}

impl From<i64> for Operand<'_> {
    fn from(frames: i64) -> Self {
        Self::Frames(frames)
    }
}

impl<'a> From<&'a Timecode> for Operand<'a> {
    fn from(tc: &'a Timecode) -> Self {
        Self::Timecode(tc)
    }
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

/// Frame count arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Sum of frame counts.
    Add,
    /// Absolute difference of frame counts.
    Sub,
    /// Product of frame counts.
    Mul,
    /// Quotient of frame counts, truncated toward zero.
    Div,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        };
        f.write_str(name)
    }
}

impl Timecode {
    /// Create a timecode at `00:00:00:00` with default options.
    #[must_use]
    pub fn new(rate: FrameRate) -> Self {
        Self::with_defaults(rate, TimecodeOptions::default())
    }

    /// Create a timecode from a start position and options.
    pub fn with_options(
        rate: FrameRate,
        options: TimecodeOptions,
        start: StartPosition,
    ) -> Result<Self> {
        let tc = Self::with_defaults(rate, options);
        match start {
            StartPosition::Timecode(text) => tc.with_timecode(&text),
            StartPosition::Packed(packed) => {
                let frames = tc.codec().decode_packed(packed)?;
                tc.with_frames(frames)
            }
            StartPosition::Frames(frames) => tc.with_frames(frames),
            StartPosition::Seconds(seconds) => tc.with_seconds(seconds),
            StartPosition::Start => Ok(tc),
        }
    }

    /// Create a timecode at a 1-based frame count.
    pub fn from_frames(frames: u64, rate: FrameRate) -> Result<Self> {
        Self::new(rate).with_frames(frames)
    }

    /// Read timecode text at `rate`.
    ///
    /// Drop-frame decoding follows the rate, not the separator. A `.`
    /// separator at a rate other than 1000 fps switches on fractional
    /// display.
    pub fn parse(text: &str, rate: FrameRate) -> Result<Self> {
        Self::new(rate).with_timecode(text)
    }

    /// Read a packed `0xHHMMSSFF` timecode at `rate`.
    pub fn from_packed(packed: u32, rate: FrameRate) -> Result<Self> {
        Self::with_options(rate, TimecodeOptions::default(), StartPosition::Packed(packed))
    }

    /// Start at a number of seconds, counted in nominal frames.
    ///
    /// `frames = trunc(seconds * nominal_fps)`. With a display reference one
    /// frame period is added to `seconds` first.
    pub fn from_seconds(seconds: f64, rate: FrameRate, options: TimecodeOptions) -> Result<Self> {
        Self::with_options(rate, options, StartPosition::Seconds(seconds))
    }

    fn with_defaults(rate: FrameRate, options: TimecodeOptions) -> Self {
        Self {
            frames: 1,
            rate,
            drop_frame: !options.force_non_drop_frame && rate.supports_drop_frame(),
            fractional: options.fractional,
            display_reference: options.display_reference,
            usec_timestamps: options.usec_timestamps,
        }
    }

    fn with_seconds(self, seconds: f64) -> Result<Self> {
        let nominal = i64::from(self.rate.nominal_fps());
        let mut start = Rational::from_f64(seconds).map_err(|_| {
            if seconds > 0.0 {
                TimecodeError::invalid_frame_count(i64::MAX)
            } else {
                TimecodeError::non_positive_seconds(seconds)
            }
        })?;
        if self.display_reference {
            start = start
                .checked_add(Rational::new(1, nominal))
                .ok_or_else(|| TimecodeError::invalid_frame_count(i64::MAX))?;
        }
        if !start.is_positive() {
            return Err(TimecodeError::non_positive_seconds(seconds));
        }

        let frames = start
            .checked_mul(Rational::from_int(nominal))
            .ok_or_else(|| TimecodeError::invalid_frame_count(i64::MAX))?
            .trunc();
        self.with_frame_count(i128::from(frames))
    }

    fn with_frame_count(self, frames: i128) -> Result<Self> {
        Ok(Self {
            frames: checked_frames(frames)?,
            ..self
        })
    }

    /// The codec for this value's rate and display flags.
    #[must_use]
    pub fn codec(&self) -> TimecodeCodec {
        TimecodeCodec::new(self.rate, self.drop_frame).with_fractional(self.fractional)
    }

    /// The timestamp projector for this value's rate and flags.
    #[must_use]
    pub fn projector(&self) -> TimestampProjector {
        TimestampProjector::new(self.codec(), self.display_reference, self.usec_timestamps)
    }

    /// 1-based frame count.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// 0-based frame number.
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.frames - 1
    }

    /// The frame rate.
    #[must_use]
    pub fn frame_rate(&self) -> FrameRate {
        self.rate
    }

    /// Whether drop-frame counting is active.
    #[must_use]
    pub fn is_drop_frame(&self) -> bool {
        self.drop_frame
    }

    /// Whether the frame field is shown as a fraction of a second.
    #[must_use]
    pub fn is_fractional(&self) -> bool {
        self.fractional
    }

    /// Whether the first frame is stamped at zero seconds.
    #[must_use]
    pub fn is_display_reference(&self) -> bool {
        self.display_reference
    }

    /// Whether timestamps display microseconds.
    #[must_use]
    pub fn usec_timestamps(&self) -> bool {
        self.usec_timestamps
    }

    fn fields(&self) -> TimecodeFields {
        self.codec().encode_fields(self.frames, Rollover::Wrap)
    }

    /// Hours field.
    #[must_use]
    pub fn hours(&self) -> u64 {
        self.fields().hours
    }

    /// Minutes field.
    #[must_use]
    pub fn minutes(&self) -> u64 {
        self.fields().minutes
    }

    /// Seconds field.
    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.fields().seconds
    }

    /// Frame field, as an integer frame even in fractional display.
    #[must_use]
    pub fn frame_field(&self) -> u64 {
        self.fields().frames
    }

    /// Separator written before the frame field.
    #[must_use]
    pub fn frame_delimiter(&self) -> char {
        self.codec().separator()
    }

    /// Elapsed nominal seconds: `(frames - display_reference) / nominal_fps`.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        let offset = u64::from(self.display_reference);
        (self.frames - offset) as f64 / f64::from(self.rate.nominal_fps())
    }

    /// Time following the coded labels.
    pub fn to_systemtime(&self) -> Result<Timestamp> {
        self.projector().system_time(self.frames)
    }

    /// Wall-clock time at the exact rate.
    pub fn to_realtime(&self) -> Result<Timestamp> {
        self.projector().real_time(self.frames)
    }

    /// Same flags, other frame count.
    pub fn with_frames(self, frames: u64) -> Result<Self> {
        self.with_frame_count(i128::from(frames))
    }

    /// Same flags, frame count read from timecode text.
    ///
    /// Text with a fractional-second field switches on fractional display.
    pub fn with_timecode(self, text: &str) -> Result<Self> {
        let decoded = self.codec().decode(text)?;
        let tc = self.with_frames(decoded.frames)?;
        Ok(Self {
            fractional: tc.fractional || decoded.fractional,
            ..tc
        })
    }

    /// Same frame count at another rate.
    ///
    /// Drop-frame counting is switched off when the new rate cannot carry
    /// it, and stays off if the rate later changes back.
    #[must_use]
    pub fn with_frame_rate(self, rate: FrameRate) -> Self {
        let drop_frame = self.drop_frame && rate.supports_drop_frame();
        if self.drop_frame && !drop_frame {
            debug!(rate = %rate, "Cleared drop frame for rate without drop-frame counting");
        }
        Self {
            rate,
            drop_frame,
            ..self
        }
    }

    /// Switch drop-frame counting. Ignored for rates that cannot carry it.
    #[must_use]
    pub fn with_drop_frame(self, drop_frame: bool) -> Self {
        let supported = self.rate.supports_drop_frame();
        if drop_frame && !supported {
            debug!(rate = %self.rate, "Ignored drop frame for rate without drop-frame counting");
        }
        Self {
            drop_frame: drop_frame && supported,
            ..self
        }
    }

    /// Switch fractional-second display.
    #[must_use]
    pub fn with_fractional(self, fractional: bool) -> Self {
        Self { fractional, ..self }
    }

    /// Switch the display reference used by timestamps.
    #[must_use]
    pub fn with_display_reference(self, display_reference: bool) -> Self {
        Self {
            display_reference,
            ..self
        }
    }

    /// Switch microsecond timestamp display.
    #[must_use]
    pub fn with_usec_timestamps(self, usec_timestamps: bool) -> Self {
        Self {
            usec_timestamps,
            ..self
        }
    }

    /// The following frame.
    pub fn next(self) -> Result<Self> {
        self.add_frames(1)
    }

    /// The previous frame. Fails on the first frame.
    pub fn back(self) -> Result<Self> {
        self.sub_frames(1)
    }

    /// Move by a signed number of frames.
    pub fn add_frames(self, frames: i64) -> Result<Self> {
        self.with_frame_count(i128::from(self.frames) + i128::from(frames))
    }

    /// Move back by a signed number of frames.
    pub fn sub_frames(self, frames: i64) -> Result<Self> {
        self.with_frame_count(i128::from(self.frames) - i128::from(frames))
    }

    /// Multiply the frame count.
    pub fn mul_frames(self, factor: i64) -> Result<Self> {
        self.with_frame_count(i128::from(self.frames) * i128::from(factor))
    }

    /// Divide the frame count, truncating toward zero.
    pub fn div_frames(self, divisor: i64) -> Result<Self> {
        if divisor == 0 {
            return Err(TimecodeError::DivisionByZero);
        }
        self.with_frame_count(i128::from(self.frames) / i128::from(divisor))
    }

    /// Apply frame count arithmetic. The result keeps this value's rate and
    /// flags.
    pub fn apply(&self, operation: Operation, operand: Operand<'_>) -> Result<Self> {
        let rhs = match operand {
            Operand::Frames(frames) => frames,
            Operand::Timecode(tc) => tc.frames as i64,
            Operand::Text(_) => {
                return Err(TimecodeError::unsupported_operand(
                    operation.to_string(),
                    operand.kind(),
                ))
            }
        };

        match operation {
            Operation::Add => self.add_frames(rhs),
            Operation::Sub => {
                let delta = i128::from(self.frames) - i128::from(rhs);
                self.with_frame_count(delta.abs())
            }
            Operation::Mul => self.mul_frames(rhs),
            Operation::Div => self.div_frames(rhs),
        }
    }

    /// Compare frame counts.
    #[must_use]
    pub fn compare_to_frames(&self, frames: i64) -> Ordering {
        i128::from(self.frames).cmp(&i128::from(frames))
    }

    /// Compare with timecode text read at this value's rate.
    pub fn compare_to_timecode(&self, text: &str) -> Result<Ordering> {
        let other = Self::parse(text, self.rate)?;
        Ok(self.frames.cmp(&other.frames))
    }

    /// Compare with another value. `None` when the rates differ.
    #[must_use]
    pub fn compare_to_value(&self, other: &Self) -> Option<Ordering> {
        (self.rate == other.rate).then(|| self.frames.cmp(&other.frames))
    }

    /// Compare with any operand.
    ///
    /// Fails only for text that is not a timecode.
    pub fn compare(&self, operand: Operand<'_>) -> Result<Option<Ordering>> {
        match operand {
            Operand::Frames(frames) => Ok(Some(self.compare_to_frames(frames))),
            Operand::Timecode(other) => Ok(self.compare_to_value(other)),
            Operand::Text(text) => self.compare_to_timecode(text).map(Some),
        }
    }

    /// Equality with any operand. Text that is not a timecode is unequal.
    #[must_use]
    pub fn equals(&self, operand: Operand<'_>) -> bool {
        matches!(self.compare(operand), Ok(Some(Ordering::Equal)))
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codec().encode(self.frames))
    }
}

impl PartialEq for Timecode {
    fn eq(&self, other: &Self) -> bool {
        self.rate == other.rate && self.frames == other.frames
    }
}

impl Eq for Timecode {}

impl PartialOrd for Timecode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare_to_value(other)
    }
}

impl PartialEq<u64> for Timecode {
    fn eq(&self, other: &u64) -> bool {
        self.frames == *other
    }
}

impl PartialOrd<u64> for Timecode {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        Some(self.frames.cmp(other))
    }
}

impl PartialEq<&str> for Timecode {
    fn eq(&self, other: &&str) -> bool {
        self.equals(Operand::Text(other))
    }
}

impl PartialOrd<&str> for Timecode {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        self.compare_to_timecode(other).ok()
    }
}

macro_rules! impl_frame_op {
    ($trait:ident, $method:ident, $operation:expr) => {
        impl $trait for Timecode {
            type Output = Result<Self>;

            fn $method(self, rhs: Self) -> Result<Self> {
                self.apply($operation, Operand::Timecode(&rhs))
            }
        }

        impl $trait<i64> for Timecode {
            type Output = Result<Self>;

            fn $method(self, rhs: i64) -> Result<Self> {
                self.apply($operation, Operand::Frames(rhs))
            }
        }
    };
}

impl_frame_op!(Add, add, Operation::Add);
impl_frame_op!(Sub, sub, Operation::Sub);
impl_frame_op!(Mul, mul, Operation::Mul);
impl_frame_op!(Div, div, Operation::Div);
