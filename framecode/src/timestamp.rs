//! Second-based timestamps derived from frame counts.
//!
//! Two time bases exist for NTSC-rate video:
//! - **System time** follows the timecode labels: `01:00:00;00` is exactly
//!   3600 s, because each coded second holds a whole number of frames.
//! - **Real time** is wall-clock time at the exact 1000/1001 rate, so it
//!   drifts from system time over long sequences.

use crate::codec::{Rollover, TimecodeCodec};
use crate::error::{Result, TimecodeError};
use framecode_core::Rational;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// A non-negative, exact number of seconds.
///
/// `Display` renders `HH:MM:SS.mmm`, or `HH:MM:SS.uuuuuu` with microsecond
/// precision. Both truncate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Timestamp {
    seconds: Rational,
    usec_precision: bool,
}

impl Timestamp {
    /// Create a timestamp, rejecting negative values.
    pub fn new(seconds: Rational, usec_precision: bool) -> Result<Self> {
        if seconds.is_negative() {
            return Err(TimecodeError::negative_timestamp(seconds));
        }
        Ok(Self {
            seconds,
            usec_precision,
        })
    }

    /// The exact value in seconds.
    #[must_use]
    pub fn exact(&self) -> Rational {
        self.seconds
    }

    /// The value in seconds as a float. Not exact.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds.to_f64()
    }

    /// Whether `Display` shows microseconds.
    #[must_use]
    pub fn usec_precision(&self) -> bool {
        self.usec_precision
    }

    /// Same instant, other display precision.
    #[must_use]
    pub fn with_usec_precision(self, usec_precision: bool) -> Self {
        Self {
            usec_precision,
            ..self
        }
    }

    /// Subdivisions of a second below the whole seconds, truncated.
    fn sub_second(&self, per_second: i64) -> i64 {
        let fract = self.seconds.fract();
        (i128::from(fract.num()) * i128::from(per_second) / i128::from(fract.den())) as i64
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.seconds.floor();
        let (hh, mm, ss) = (whole / 3600, (whole / 60) % 60, whole % 60);
        if self.usec_precision {
            write!(f, "{hh:02}:{mm:02}:{ss:02}.{:06}", self.sub_second(1_000_000))
        } else {
            write!(f, "{hh:02}:{mm:02}:{ss:02}.{:03}", self.sub_second(1000))
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds.cmp(&other.seconds)
    }
}

impl PartialEq<Rational> for Timestamp {
    fn eq(&self, other: &Rational) -> bool {
        self.seconds == *other
    }
}

impl PartialOrd<Rational> for Timestamp {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.seconds.cmp(other))
    }
}

impl PartialEq<f64> for Timestamp {
    fn eq(&self, other: &f64) -> bool {
        self.as_secs_f64() == *other
    }
}

impl PartialOrd<f64> for Timestamp {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.as_secs_f64().partial_cmp(other)
    }
}

impl From<Timestamp> for Duration {
    fn from(ts: Timestamp) -> Self {
        let secs = ts.seconds.floor() as u64;
        let nanos = ts.sub_second(1_000_000_000) as u32;
        Duration::new(secs, nanos)
    }
}

/// Projects frame counts onto system time and real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampProjector {
    codec: TimecodeCodec,
    display_reference: bool,
    usec_precision: bool,
}

impl TimestampProjector {
    /// Create a projector.
    ///
    /// With `display_reference` the first frame is stamped at the top of the
    /// raster; otherwise its drawing duration is counted in system time.
    #[must_use]
    pub fn new(codec: TimecodeCodec, display_reference: bool, usec_precision: bool) -> Self {
        Self {
            codec,
            display_reference,
            usec_precision,
        }
    }

    /// Time following the coded labels, without 24-hour rollover.
    ///
    /// `SS + 60 * (MM + 60 * HH) + (FF + delay) / nominal_fps`, where
    /// `delay` is 0 with a display reference and 1 without.
    pub fn system_time(&self, frames: u64) -> Result<Timestamp> {
        let fields = self.codec.encode_fields(frames, Rollover::Skip);
        let delay = u64::from(!self.display_reference);
        let nominal = i64::from(self.codec.rate().nominal_fps());

        let seconds = fields
            .hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(fields.minutes * 60 + fields.seconds))
            .and_then(|whole| i64::try_from(whole).ok())
            .and_then(|whole| {
                let partial = Rational::new((fields.frames + delay) as i64, nominal);
                Rational::from_int(whole).checked_add(partial)
            })
            .ok_or_else(|| TimecodeError::timestamp_overflow(frames))?;
        Ok(Timestamp {
            seconds,
            usec_precision: self.usec_precision,
        })
    }

    /// Wall-clock time at the exact rate.
    ///
    /// `frames / rate`, less one frame period without a display reference,
    /// so frame 1 starts at zero. Fails with
    /// [`TimecodeError::TimestampOverflow`] when the exact result does not
    /// fit in a [`Rational`], which takes more than `i64::MAX / rate.den()`
    /// frames.
    pub fn real_time(&self, frames: u64) -> Result<Timestamp> {
        let offset = u64::from(!self.display_reference);
        let seconds = i64::try_from(frames.saturating_sub(offset))
            .ok()
            .and_then(|elapsed| {
                Rational::from_int(elapsed).checked_div(self.codec.rate().as_rational())
            })
            .ok_or_else(|| TimecodeError::timestamp_overflow(frames))?;
        Ok(Timestamp {
            seconds,
            usec_precision: self.usec_precision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::{FrameRate, StandardFrameRate};
    use pretty_assertions::assert_eq;

    fn projector(rate: StandardFrameRate, drop_frame: bool, display_reference: bool) -> TimestampProjector {
        TimestampProjector::new(
            TimecodeCodec::new(rate.frame_rate(), drop_frame),
            display_reference,
            false,
        )
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        assert!(matches!(
            Timestamp::new(Rational::new(-1, 2), false),
            Err(TimecodeError::NegativeTimestamp { .. })
        ));
        assert!(Timestamp::new(Rational::zero(), false).is_ok());
    }

    #[test]
    fn test_display_truncates() {
        let ts = Timestamp::new(Rational::new(2900, 2997), false).unwrap();
        // 0.967634...
        assert_eq!(ts.to_string(), "00:00:00.967");
        assert_eq!(ts.with_usec_precision(true).to_string(), "00:00:00.967634");

        let ts = Timestamp::new(Rational::new(7_323_999, 1000), false).unwrap();
        assert_eq!(ts.to_string(), "02:02:03.999");
    }

    #[test]
    fn test_real_time_ntsc() {
        let p = projector(StandardFrameRate::Fps29_97, true, false);
        assert_eq!(p.real_time(1).unwrap().exact(), Rational::zero());
        // 29 frame periods at exactly 30000/1001 fps.
        assert_eq!(p.real_time(30).unwrap().exact(), Rational::new(29 * 1001, 30000));
    }

    #[test]
    fn test_real_time_with_display_reference() {
        let p = projector(StandardFrameRate::Fps25, false, true);
        assert_eq!(p.real_time(25).unwrap().exact(), Rational::one());
    }

    #[test]
    fn test_system_time_follows_labels() {
        let p = projector(StandardFrameRate::Fps29_97, true, true);
        // 01:00:00;00 is frame 107893.
        assert_eq!(p.system_time(107_893).unwrap().exact(), Rational::from_int(3600));

        let p = projector(StandardFrameRate::Fps29_97, true, false);
        assert_eq!(
            p.system_time(107_893).unwrap().exact(),
            Rational::from_int(3600) + Rational::new(1, 30)
        );
        let real = p.real_time(107_893).unwrap();
        assert!(real < Rational::from_int(3600));
        assert!(real > 3599.9);
    }

    #[test]
    fn test_system_time_display_delay() {
        let p = projector(StandardFrameRate::Fps30, false, false);
        assert_eq!(p.system_time(1).unwrap().exact(), Rational::new(1, 30));
        let p = projector(StandardFrameRate::Fps30, false, true);
        assert_eq!(p.system_time(1).unwrap().exact(), Rational::zero());
    }

    #[test]
    fn test_system_time_skips_rollover() {
        let p = projector(StandardFrameRate::Fps30, false, true);
        let frames = 30 * 86_400 + 1;
        assert_eq!(p.system_time(frames).unwrap().exact(), Rational::from_int(86_400));
    }

    #[test]
    fn test_ordering_and_duration() {
        let rate = FrameRate::from_int(4).unwrap();
        let p = TimestampProjector::new(TimecodeCodec::new(rate, false), false, true);
        let a = p.real_time(2).unwrap();
        let b = p.real_time(3).unwrap();
        assert!(a < b);
        assert_eq!(a, 0.25);
        assert_eq!(Duration::from(b), Duration::from_millis(500));
        assert_eq!(b.to_string(), "00:00:00.500000");
    }

    #[test]
    fn test_projection_overflow_is_an_error() {
        let p = projector(StandardFrameRate::Fps29_97, true, false);
        let frames = i64::MAX as u64;
        assert_eq!(
            p.real_time(frames),
            Err(TimecodeError::TimestampOverflow { frames })
        );
        assert_eq!(
            p.system_time(frames),
            Err(TimecodeError::TimestampOverflow { frames })
        );
    }
}
