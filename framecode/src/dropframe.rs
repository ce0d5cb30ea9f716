//! Drop-frame timecode support for the 29.97 family of rates.
//!
//! Drop-frame timecode compensates for the difference between a nominal rate
//! (30, 60, 120 fps) and its NTSC rate (29.97, 59.94, 119.88 fps) by
//! skipping frame *labels* at specific intervals. No picture is dropped.
//!
//! The rules are:
//! - Skip the first few frame labels at the start of each minute
//!   (`;00`-`;01` at 29.97, `;00`-`;03` at 59.94)
//! - Except for minutes 0, 10, 20, 30, 40, 50
//!
//! The number of skipped labels is `round(rate * 0.066666)`, using the rate
//! rounded to two decimals. `0.066666` is the SMPTE approximation of 1/15;
//! it must not be replaced by an exact 1000/1001 derivation.

use crate::rate::FrameRate;
use framecode_core::Rational;
use serde::{Deserialize, Serialize};

/// Factor applied to the rate to get the labels skipped per minute.
pub const SMPTE_DROP_FACTOR: f64 = 0.066666;

/// Drop-frame counting parameters for one frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropFrameConfig {
    /// Number of labels skipped per minute (except every 10th minute)
    pub frames_dropped_per_minute: u64,
    /// Nominal frame rate
    pub nominal_fps: u64,
    /// Frames per 10 minutes (accounting for drops)
    pub frames_per_10_minutes: u64,
    /// Frames per minute (accounting for drops, for non-10th minutes)
    pub frames_per_minute: u64,
    /// Frames before the timecode rolls over at 24 hours
    pub frames_per_24_hours: u64,
}

impl DropFrameConfig {
    /// Get the configuration for a frame rate, if it supports drop-frame.
    #[must_use]
    pub fn for_rate(rate: &FrameRate) -> Option<Self> {
        if !rate.supports_drop_frame() {
            return None;
        }

        let rounded = rate.as_rational().round_to(2);
        let dropped = (rounded.to_f64() * SMPTE_DROP_FACTOR).round_ties_even() as u64;
        let nominal_fps = rate.nominal_fps() as u64;

        Some(Self {
            frames_dropped_per_minute: dropped,
            nominal_fps,
            frames_per_10_minutes: rounded.mul_round(Rational::from_int(600)) as u64,
            frames_per_minute: nominal_fps * 60 - dropped,
            frames_per_24_hours: rounded.mul_round(Rational::from_int(86_400)) as u64,
        })
    }

    /// Map a 0-based frame index to its label index, re-inserting every
    /// skipped label before it.
    ///
    /// The result can be split into HH:MM:SS:FF with the nominal rate.
    #[must_use]
    pub fn insert_dropped(&self, frame_index: u64) -> u64 {
        let drop = self.frames_dropped_per_minute;
        let ten_minute_blocks = frame_index / self.frames_per_10_minutes;
        let remainder = frame_index % self.frames_per_10_minutes;

        let mut label = frame_index + drop * 9 * ten_minute_blocks;
        // The first minute of each block keeps all its labels.
        if remainder > drop {
            label += drop * ((remainder - drop) / self.frames_per_minute);
        }
        label
    }

    /// Number of labels skipped before the start of `total_minutes`
    /// (counted from 00:00). `None` on overflow.
    #[must_use]
    pub fn frames_dropped_until(&self, total_minutes: u64) -> Option<u64> {
        self.frames_dropped_per_minute
            .checked_mul(total_minutes - total_minutes / 10)
    }

    /// Check if a label is one that drop-frame counting never shows.
    #[must_use]
    pub fn is_dropped_frame(&self, minutes: u64, seconds: u64, frames: u64) -> bool {
        seconds == 0 && minutes % 10 != 0 && frames < self.frames_dropped_per_minute
    }
}
