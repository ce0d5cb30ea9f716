//! Construction options and the timecode builder.

use crate::error::Result;
use crate::rate::FrameRate;
use crate::smpte::Timecode;
use serde::{Deserialize, Serialize};

/// Display and timing options for a [`Timecode`].
///
/// Every field defaults to `false`, so a partial config deserializes to the
/// standard behaviour: drop frame on for the 29.97 family, bottom-of-raster
/// timing and millisecond timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimecodeOptions {
    /// Never use drop-frame counting, even at 29.97 fps.
    pub force_non_drop_frame: bool,
    /// Show the frame field as a fraction of a second (`SS.fff`).
    pub fractional: bool,
    /// Stamp the first frame at zero seconds instead of one frame period.
    pub display_reference: bool,
    /// Show timestamps with microsecond precision.
    pub usec_timestamps: bool,
}

/// Where a new timecode starts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum StartPosition {
    /// Timecode text such as `01:00:00;00`.
    Timecode(String),
    /// Packed `0xHHMMSSFF` timecode.
    Packed(u32),
    /// 1-based frame count.
    Frames(u64),
    /// Seconds from the start, counted in nominal frames. Must be positive.
    Seconds(f64),
    /// `00:00:00:00`.
    #[default]
    Start,
}

/// Pre-configured construction of timecodes at one rate.
///
/// Several start candidates may be given; timecode text (or packed
/// timecode) wins over a frame count, which wins over seconds.
#[derive(Debug, Clone)]
pub struct TimecodeBuilder {
    rate: FrameRate,
    options: TimecodeOptions,
    timecode: Option<StartPosition>,
    frames: Option<u64>,
    seconds: Option<f64>,
}

impl TimecodeBuilder {
    /// Create a builder with default options.
    pub fn new(rate: FrameRate) -> Self {
        Self {
            rate,
            options: TimecodeOptions::default(),
            timecode: None,
            frames: None,
            seconds: None,
        }
    }

    /// Replace all options.
    pub fn options(mut self, options: TimecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Set force non-drop-frame.
    pub fn force_non_drop_frame(mut self, enabled: bool) -> Self {
        self.options.force_non_drop_frame = enabled;
        self
    }

    /// Set fractional-second display.
    pub fn fractional(mut self, enabled: bool) -> Self {
        self.options.fractional = enabled;
        self
    }

    /// Set the display reference.
    pub fn display_reference(mut self, enabled: bool) -> Self {
        self.options.display_reference = enabled;
        self
    }

    /// Set microsecond timestamps.
    pub fn usec_timestamps(mut self, enabled: bool) -> Self {
        self.options.usec_timestamps = enabled;
        self
    }

    /// Start at timecode text.
    pub fn timecode(mut self, text: impl Into<String>) -> Self {
        self.timecode = Some(StartPosition::Timecode(text.into()));
        self
    }

    /// Start at a packed timecode.
    pub fn packed(mut self, packed: u32) -> Self {
        self.timecode = Some(StartPosition::Packed(packed));
        self
    }

    /// Start at a 1-based frame count.
    pub fn frames(mut self, frames: u64) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Start at a number of seconds.
    pub fn seconds(mut self, seconds: f64) -> Self {
        self.seconds = Some(seconds);
        self
    }

    /// Add a start candidate.
    pub fn start(self, start: StartPosition) -> Self {
        match start {
            StartPosition::Timecode(text) => self.timecode(text),
            StartPosition::Packed(packed) => self.packed(packed),
            StartPosition::Frames(frames) => self.frames(frames),
            StartPosition::Seconds(seconds) => self.seconds(seconds),
            StartPosition::Start => self,
        }
    }

    /// The configured options.
    pub fn current_options(&self) -> TimecodeOptions {
        self.options
    }

    /// The start candidate that `build` will use.
    pub fn start_position(&self) -> StartPosition {
        if let Some(start) = &self.timecode {
            start.clone()
        } else if let Some(frames) = self.frames {
            StartPosition::Frames(frames)
        } else if let Some(seconds) = self.seconds {
            StartPosition::Seconds(seconds)
        } else {
            StartPosition::Start
        }
    }

    /// Build a timecode.
    pub fn build(&self) -> Result<Timecode> {
        Timecode::with_options(self.rate, self.options, self.start_position())
    }

    /// Build a timecode at `start`, ignoring the configured candidates.
    pub fn build_at(&self, start: StartPosition) -> Result<Timecode> {
        Timecode::with_options(self.rate, self.options, start)
    }
}
