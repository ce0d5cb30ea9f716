//! Frame count ⇄ timecode text conversion.
//!
//! Frame counts here are 1-based: the first frame of a sequence is frame 1
//! and displays as `00:00:00:00`. The codec handles:
//! - Drop-frame label compensation for the 29.97 family
//! - 24-hour rollover
//! - Millisecond (`HH:MM:SS.mmm` at 1000 fps) and fractional-second
//!   (`HH:MM:SS.fff` at any rate) display
//! - The packed-integer form, whose hex digits spell `HHMMSSFF`
//!
//! Fractional-second display rounds the frame to a thousandth of a second,
//! so decoding it does not always give back the original frame count.

use crate::dropframe::DropFrameConfig;
use crate::error::{Result, TimecodeError};
use crate::rate::FrameRate;
use framecode_core::Rational;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Separator before the frame field in non-drop-frame timecode.
pub const NON_DROP_SEPARATOR: char = ':';

/// Separator before the frame field in drop-frame timecode.
pub const DROP_SEPARATOR: char = ';';

/// Separator before millisecond or fractional-second fields.
pub const FRACTION_SEPARATOR: char = '.';

/// Whether encoding wraps frame counts past 24 hours back to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rollover {
    /// Wrap at 24 hours.
    #[default]
    Wrap,
    /// Let the hours field grow past 23.
    Skip,
}

/// Hours, minutes, seconds and frames of a timecode label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimecodeFields {
    /// Hours (0-23 unless rollover is skipped)
    pub hours: u64,
    /// Minutes (0-59)
    pub minutes: u64,
    /// Seconds (0-59)
    pub seconds: u64,
    /// Frames (0 to nominal fps - 1)
    pub frames: u64,
}

impl TimecodeFields {
    /// Create fields from their components.
    #[must_use]
    pub const fn new(hours: u64, minutes: u64, seconds: u64, frames: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            frames,
        }
    }

    /// Split a label index into fields using an integer rate.
    #[must_use]
    pub fn from_label_index(index: u64, nominal_fps: u64) -> Self {
        let total_seconds = index / nominal_fps;
        Self {
            hours: total_seconds / 3600,
            minutes: (total_seconds / 60) % 60,
            seconds: total_seconds % 60,
            frames: index % nominal_fps,
        }
    }

    /// Minutes elapsed since 00:00, or `None` on overflow.
    #[must_use]
    pub fn total_minutes(&self) -> Option<u64> {
        self.hours.checked_mul(60)?.checked_add(self.minutes)
    }
}

/// A timecode string split into its parts, before any rate is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTimecode {
    /// The four numeric fields.
    pub fields: TimecodeFields,
    /// The separator written before the frame field.
    pub separator: char,
    /// Digits after a `.` separator, kept as text so that leading zeros
    /// survive (`.040` is not `.40`).
    pub fraction_digits: Option<String>,
}

/// Split `HH:MM:SS<sep>FF` into fields.
///
/// Any of `:`, `;` and `.` is accepted between any two fields; the
/// separator does not decide drop-frame decoding.
pub fn parse_timecode(text: &str) -> Result<ParsedTimecode> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split([':', ';', '.']).collect();
    if parts.len() != 4 {
        return Err(TimecodeError::malformed(
            text,
            format!("expected 4 fields, found {}", parts.len()),
        ));
    }

    let mut values = [0u64; 4];
    for (value, (name, part)) in values
        .iter_mut()
        .zip(["hours", "minutes", "seconds", "frames"].iter().zip(&parts))
    {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimecodeError::malformed(
                text,
                format!("invalid {name}: {part:?}"),
            ));
        }
        *value = part
            .parse()
            .map_err(|_| TimecodeError::malformed(text, format!("{name} out of range")))?;
    }

    let frame_field = parts[3];
    // The frame field is the tail of the string, so the separator is the
    // character right before it.
    let separator = trimmed[..trimmed.len() - frame_field.len()]
        .chars()
        .next_back()
        .unwrap_or(NON_DROP_SEPARATOR);
    let fraction_digits = (separator == FRACTION_SEPARATOR
        && trimmed.matches(FRACTION_SEPARATOR).count() == 1)
        .then(|| frame_field.to_string());

    Ok(ParsedTimecode {
        fields: TimecodeFields::new(values[0], values[1], values[2], values[3]),
        separator,
        fraction_digits,
    })
}

/// Read a packed timecode: the hexadecimal digits of `packed`, zero-padded
/// to eight, taken two at a time as decimal `HH`, `MM`, `SS`, `FF`.
///
/// `0x01302412` is `01:30:24:12`. A pair containing `a`-`f` is rejected.
pub fn unpack_timecode(packed: u32) -> Result<TimecodeFields> {
    let hex = format!("{packed:08x}");
    let mut values = [0u64; 4];
    for (i, value) in values.iter_mut().enumerate() {
        let pair = &hex[i * 2..i * 2 + 2];
        *value = pair.parse().map_err(|_| {
            TimecodeError::malformed(
                format!("{packed:#010x}"),
                format!("hex digits {pair:?} are not a decimal pair"),
            )
        })?;
    }
    trace!(packed, %hex, "Unpacked timecode");
    Ok(TimecodeFields::new(values[0], values[1], values[2], values[3]))
}

/// Result of decoding timecode text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTimecode {
    /// 1-based frame count.
    pub frames: u64,
    /// Whether the text used a fractional-second frame field.
    pub fractional: bool,
}

/// Bidirectional frame count ⇄ timecode conversion for one rate and
/// display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimecodeCodec {
    rate: FrameRate,
    drop: Option<DropFrameConfig>,
    fractional: bool,
}

impl TimecodeCodec {
    /// Create a codec. `drop_frame` is ignored for rates that cannot carry
    /// drop-frame counting.
    #[must_use]
    pub fn new(rate: FrameRate, drop_frame: bool) -> Self {
        let drop = if drop_frame {
            DropFrameConfig::for_rate(&rate)
        } else {
            None
        };
        Self {
            rate,
            drop,
            fractional: false,
        }
    }

    /// Display the frame field as a fraction of a second.
    #[must_use]
    pub fn with_fractional(mut self, fractional: bool) -> Self {
        self.fractional = fractional;
        self
    }

    /// The frame rate.
    #[must_use]
    pub fn rate(&self) -> &FrameRate {
        &self.rate
    }

    /// Whether drop-frame counting is active.
    #[must_use]
    pub fn is_drop_frame(&self) -> bool {
        self.drop.is_some()
    }

    /// Whether the frame field is shown as a fraction of a second.
    #[must_use]
    pub fn is_fractional(&self) -> bool {
        self.fractional
    }

    /// Drop-frame parameters, when drop-frame counting is active.
    #[must_use]
    pub fn drop_config(&self) -> Option<&DropFrameConfig> {
        self.drop.as_ref()
    }

    /// Frames in 24 hours of timecode.
    #[must_use]
    pub fn frames_per_24_hours(&self) -> u64 {
        match &self.drop {
            Some(config) => config.frames_per_24_hours,
            None => self.nominal() * 86_400,
        }
    }

    /// Separator written before the frame field.
    #[must_use]
    pub fn separator(&self) -> char {
        if self.drop.is_some() {
            DROP_SEPARATOR
        } else if self.rate.is_ms_rate() || self.fractional {
            FRACTION_SEPARATOR
        } else {
            NON_DROP_SEPARATOR
        }
    }

    /// Encode a 1-based frame count as timecode text.
    #[must_use]
    pub fn encode(&self, frames: u64) -> String {
        self.format_fields(&self.encode_fields(frames, Rollover::Wrap))
    }

    /// Split a 1-based frame count into timecode fields.
    ///
    /// Drop-frame compensation is applied, so the fields are the ones shown
    /// on screen. The frame field is always an integer frame here.
    #[must_use]
    pub fn encode_fields(&self, frames: u64, rollover: Rollover) -> TimecodeFields {
        let mut index = frames.saturating_sub(1);
        if rollover == Rollover::Wrap {
            index %= self.frames_per_24_hours();
        }
        if let Some(config) = &self.drop {
            index = config.insert_dropped(index);
        }
        TimecodeFields::from_label_index(index, self.nominal())
    }

    /// Render fields in this codec's display mode.
    #[must_use]
    pub fn format_fields(&self, fields: &TimecodeFields) -> String {
        let TimecodeFields {
            hours,
            minutes,
            seconds,
            frames,
        } = *fields;

        if self.fractional {
            let thousandths = Rational::new(frames as i64 * 1000, self.nominal() as i64).round();
            let total = seconds as i64 * 1000 + thousandths;
            return format!(
                "{hours:02}:{minutes:02}:{:02}.{:03}",
                total / 1000,
                total % 1000
            );
        }

        let separator = self.separator();
        if self.rate.is_ms_rate() {
            format!("{hours:02}:{minutes:02}:{seconds:02}{separator}{frames:03}")
        } else {
            format!("{hours:02}:{minutes:02}:{seconds:02}{separator}{frames:02}")
        }
    }

    /// Decode timecode text to a 1-based frame count.
    ///
    /// Drop-frame correction follows this codec, not the separator in the
    /// text. A `.` separator at a rate other than 1000 fps reads the last
    /// field as a decimal fraction of a second.
    pub fn decode(&self, text: &str) -> Result<DecodedTimecode> {
        let parsed = parse_timecode(text)?;
        let mut fields = parsed.fields;

        let fraction = parsed
            .fraction_digits
            .as_deref()
            .filter(|_| !self.rate.is_ms_rate());
        if let Some(digits) = fraction {
            let fraction: f64 = format!("0.{digits}")
                .parse()
                .map_err(|_| TimecodeError::malformed(text, "invalid fraction"))?;
            fields.frames = (fraction * self.rate.as_f64()).round_ties_even() as u64;
        }

        let frames = self.fields_to_frames(&fields).ok_or_else(|| {
            TimecodeError::malformed(text, "value out of range")
        })?;
        trace!(text, frames, drop_frame = self.is_drop_frame(), "Decoded timecode");

        Ok(DecodedTimecode {
            frames,
            fractional: fraction.is_some(),
        })
    }

    /// Decode a packed timecode (see [`unpack_timecode`]).
    pub fn decode_packed(&self, packed: u32) -> Result<u64> {
        let fields = unpack_timecode(packed)?;
        self.fields_to_frames(&fields)
            .ok_or_else(|| TimecodeError::malformed(format!("{packed:#010x}"), "value out of range"))
    }

    /// Convert fields to a 1-based frame count, removing skipped drop-frame
    /// labels. Returns `None` on arithmetic overflow.
    #[must_use]
    pub fn fields_to_frames(&self, fields: &TimecodeFields) -> Option<u64> {
        let fps = self.nominal();
        let dropped = match &self.drop {
            Some(config) => config.frames_dropped_until(fields.total_minutes()?)?,
            None => 0,
        };

        fields
            .hours
            .checked_mul(fps.checked_mul(3600)?)?
            .checked_add(fields.minutes.checked_mul(fps.checked_mul(60)?)?)?
            .checked_add(fields.seconds.checked_mul(fps)?)?
            .checked_add(fields.frames)?
            .checked_sub(dropped)?
            .checked_add(1)
    }

    fn nominal(&self) -> u64 {
        self.rate.nominal_fps() as u64
    }
}

impl fmt::Display for TimecodeFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}
