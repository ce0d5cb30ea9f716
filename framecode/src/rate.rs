//! Frame rate classification.
//!
//! A [`FrameRate`] is an exact rational rate plus the facts the timecode
//! codec needs about it: whether it is an NTSC (`n * 1000/1001`) rate, the
//! integer rate used to count timecode frames, and whether it is the
//! 1000 fps "milliseconds" pseudo-rate.

use crate::error::{Result, TimecodeError};
use framecode_core::Rational;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The millisecond pseudo-rate, in frames per second.
pub const MS_RATE: u32 = 1000;

/// Maximum distance, in frames per second, between a rate and
/// `n * 1000/1001` for it to be treated as that NTSC rate.
pub const NTSC_TOLERANCE: f64 = 0.005;

/// A classified frame rate.
///
/// NTSC rates are stored canonically as `nominal * 1000/1001`, so
/// `"29.97"`, `"2997/100"` and `30000/1001` all produce identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Rational", into = "Rational")]
pub struct FrameRate {
    rate: Rational,
    ntsc: bool,
    nominal: u32,
    ms: bool,
}

impl FrameRate {
    /// Classify an exact rational rate.
    ///
    /// A rate is NTSC when it is not a whole number and lies within
    /// [`NTSC_TOLERANCE`] of `n * 1000/1001` for `n = round(rate * 1.001)`.
    /// Whole-number rates are never NTSC, so `"frames"` and rates such as 1
    /// or 5 fps keep their exact value instead of becoming `n * 1000/1001`.
    pub fn new(rate: Rational) -> Result<Self> {
        if !rate.is_positive() {
            return Err(TimecodeError::invalid_frame_rate(rate.to_string()));
        }

        if rate == Rational::from(MS_RATE) {
            return Ok(Self {
                rate,
                ntsc: false,
                nominal: MS_RATE,
                ms: true,
            });
        }

        let candidate = rate.mul_round(Rational::new(1001, 1000));
        let nominal = u32::try_from(candidate)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| TimecodeError::invalid_frame_rate(rate.to_string()))?;

        // Whole-number rates are already nominal; only fractional rates can
        // be NTSC.
        let expected = nominal as f64 * 1000.0 / 1001.0;
        let ntsc = !rate.is_integer() && (rate.to_f64() - expected).abs() < NTSC_TOLERANCE;

        let canonical = if ntsc {
            Rational::new(nominal as i64 * 1000, 1001)
        } else {
            rate
        };
        if canonical != rate {
            debug!(
                input = %rate,
                canonical = %canonical,
                "Canonicalized NTSC frame rate"
            );
        }

        Ok(Self {
            rate: canonical,
            ntsc,
            nominal,
            ms: false,
        })
    }

    /// Classify a rate given as numerator and denominator.
    pub fn from_ratio(numerator: i64, denominator: i64) -> Result<Self> {
        let rate = Rational::try_new(numerator, denominator)
            .map_err(|_| TimecodeError::invalid_frame_rate(format!("{numerator}/{denominator}")))?;
        Self::new(rate)
    }

    /// Classify a rate given as a float, read as its shortest decimal form.
    pub fn from_f64(fps: f64) -> Result<Self> {
        let rate =
            Rational::from_f64(fps).map_err(|_| TimecodeError::invalid_frame_rate(fps.to_string()))?;
        Self::new(rate)
    }

    /// Classify an integer rate.
    pub fn from_int(fps: u32) -> Result<Self> {
        Self::new(Rational::from(fps))
    }

    /// The millisecond pseudo-rate (1000 fps).
    #[must_use]
    pub fn milliseconds() -> Self {
        Self {
            rate: Rational::from(MS_RATE),
            ntsc: false,
            nominal: MS_RATE,
            ms: true,
        }
    }

    /// The exact rate in frames per second.
    #[must_use]
    pub fn as_rational(&self) -> Rational {
        self.rate
    }

    /// The rate as a float.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.rate.to_f64()
    }

    /// Integer rate used to count timecode frames (24 for 23.976).
    #[must_use]
    pub fn nominal_fps(&self) -> u32 {
        self.nominal
    }

    /// Whether this is an `n * 1000/1001` rate.
    #[must_use]
    pub fn is_ntsc(&self) -> bool {
        self.ntsc
    }

    /// Whether this is the 1000 fps millisecond pseudo-rate.
    #[must_use]
    pub fn is_ms_rate(&self) -> bool {
        self.ms
    }

    /// Whether drop-frame counting applies (29.97, 59.94, 119.88, ...).
    #[must_use]
    pub fn supports_drop_frame(&self) -> bool {
        self.ntsc && self.nominal % 30 == 0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rate)
    }
}

impl FromStr for FrameRate {
    type Err = TimecodeError;

    /// Accepts `"ms"`, `"frames"`, `"num/den"` and decimal or integer text.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "ms" => Ok(Self::milliseconds()),
            "frames" => Self::from_int(1),
            other => {
                let rate: Rational = other
                    .parse()
                    .map_err(|_| TimecodeError::invalid_frame_rate(s))?;
                Self::new(rate)
            }
        }
    }
}

impl TryFrom<Rational> for FrameRate {
    type Error = TimecodeError;

    fn try_from(rate: Rational) -> Result<Self> {
        Self::new(rate)
    }
}

impl TryFrom<(i64, i64)> for FrameRate {
    type Error = TimecodeError;

    fn try_from((num, den): (i64, i64)) -> Result<Self> {
        Self::from_ratio(num, den)
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = TimecodeError;

    fn try_from(fps: f64) -> Result<Self> {
        Self::from_f64(fps)
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = TimecodeError;

    fn try_from(fps: u32) -> Result<Self> {
        Self::from_int(fps)
    }
}

impl TryFrom<&str> for FrameRate {
    type Error = TimecodeError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl From<FrameRate> for Rational {
    fn from(rate: FrameRate) -> Self {
        rate.rate
    }
}

impl From<StandardFrameRate> for FrameRate {
    fn from(rate: StandardFrameRate) -> Self {
        rate.frame_rate()
    }
}

/// Common broadcast frame rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardFrameRate {
    /// 23.976 fps (24000/1001, NTSC film)
    Fps23_976,
    /// 24 fps (film)
    Fps24,
    /// 25 fps (PAL)
    Fps25,
    /// 29.97 fps (30000/1001, NTSC)
    Fps29_97,
    /// 30 fps
    Fps30,
    /// 50 fps (PAL)
    Fps50,
    /// 59.94 fps (60000/1001, NTSC)
    Fps59_94,
    /// 60 fps
    Fps60,
}

impl StandardFrameRate {
    /// Every standard rate, slowest first.
    pub const ALL: [Self; 8] = [
        Self::Fps23_976,
        Self::Fps24,
        Self::Fps25,
        Self::Fps29_97,
        Self::Fps30,
        Self::Fps50,
        Self::Fps59_94,
        Self::Fps60,
    ];

    /// Exact rational rate.
    #[must_use]
    pub fn as_rational(&self) -> Rational {
        match self {
            Self::Fps23_976 => Rational::new(24000, 1001),
            Self::Fps24 => Rational::from_int(24),
            Self::Fps25 => Rational::from_int(25),
            Self::Fps29_97 => Rational::new(30000, 1001),
            Self::Fps30 => Rational::from_int(30),
            Self::Fps50 => Rational::from_int(50),
            Self::Fps59_94 => Rational::new(60000, 1001),
            Self::Fps60 => Rational::from_int(60),
        }
    }

    /// The classified rate.
    #[must_use]
    pub fn frame_rate(&self) -> FrameRate {
        let (ntsc, nominal) = match self {
            Self::Fps23_976 => (true, 24),
            Self::Fps24 => (false, 24),
            Self::Fps25 => (false, 25),
            Self::Fps29_97 => (true, 30),
            Self::Fps30 => (false, 30),
            Self::Fps50 => (false, 50),
            Self::Fps59_94 => (true, 60),
            Self::Fps60 => (false, 60),
        };
        FrameRate {
            rate: self.as_rational(),
            ntsc,
            nominal,
            ms: false,
        }
    }
}

impl fmt::Display for StandardFrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fps23_976 => "23.976",
            Self::Fps24 => "24",
            Self::Fps25 => "25",
            Self::Fps29_97 => "29.97",
            Self::Fps30 => "30",
            Self::Fps50 => "50",
            Self::Fps59_94 => "59.94",
            Self::Fps60 => "60",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ntsc_canonicalization() {
        let a: FrameRate = "23.976".parse().unwrap();
        let b = FrameRate::from_ratio(24000, 1001).unwrap();
        let c = FrameRate::from_f64(23.976_023_976_023_976).unwrap();
        let d: FrameRate = "23976/1000".parse().unwrap();
        let e: FrameRate = "23.98".parse().unwrap();

        for rate in [a, b, c, d, e] {
            assert_eq!(rate, b);
            assert_eq!(rate.as_rational(), Rational::new(24000, 1001));
            assert_eq!(rate.nominal_fps(), 24);
            assert!(rate.is_ntsc());
        }
    }

    #[test]
    fn test_standard_rates_classify_from_decimals() {
        for standard in StandardFrameRate::ALL {
            let parsed: FrameRate = standard.to_string().parse().unwrap();
            assert_eq!(parsed, standard.frame_rate(), "{standard}");
        }
    }

    #[test]
    fn test_integer_rates_are_not_ntsc() {
        for fps in [1, 2, 5, 24, 25, 30, 48, 50, 60, 120] {
            let rate = FrameRate::from_int(fps).unwrap();
            assert!(!rate.is_ntsc(), "{fps}");
            assert_eq!(rate.nominal_fps(), fps);
            assert_eq!(rate.as_rational(), Rational::from(fps));
        }
    }

    #[test]
    fn test_special_tokens() {
        let ms: FrameRate = "ms".parse().unwrap();
        assert!(ms.is_ms_rate());
        assert!(!ms.is_ntsc());
        assert_eq!(ms.nominal_fps(), 1000);
        assert_eq!(FrameRate::from_int(1000).unwrap(), ms);

        let frames: FrameRate = "frames".parse().unwrap();
        assert_eq!(frames.as_rational(), Rational::one());
        assert_eq!(frames.nominal_fps(), 1);
    }

    #[test]
    fn test_drop_frame_support() {
        assert!(StandardFrameRate::Fps29_97.frame_rate().supports_drop_frame());
        assert!(StandardFrameRate::Fps59_94.frame_rate().supports_drop_frame());
        assert!(FrameRate::from_ratio(120000, 1001).unwrap().supports_drop_frame());
        assert!(!StandardFrameRate::Fps23_976.frame_rate().supports_drop_frame());
        assert!(!StandardFrameRate::Fps30.frame_rate().supports_drop_frame());
    }

    #[test]
    fn test_invalid_rates() {
        assert!(FrameRate::from_int(0).is_err());
        assert!(FrameRate::from_ratio(-30, 1).is_err());
        assert!(FrameRate::from_ratio(30, 0).is_err());
        assert!(FrameRate::from_f64(f64::INFINITY).is_err());
        assert!("fast".parse::<FrameRate>().is_err());
        // Rounds to a nominal rate of zero frames per second.
        assert!(FrameRate::from_ratio(1, 10).is_err());
    }

    #[test]
    fn test_non_ntsc_fraction_keeps_exact_value() {
        let rate: FrameRate = "12.5".parse().unwrap();
        assert!(!rate.is_ntsc());
        assert_eq!(rate.as_rational(), Rational::new(25, 2));
        assert_eq!(rate.nominal_fps(), 13);
    }

    #[test]
    fn test_serde_reclassifies() {
        let rate = StandardFrameRate::Fps29_97.frame_rate();
        let json = serde_json::to_string(&rate).unwrap();
        assert_eq!(json, r#"{"num":30000,"den":1001}"#);

        let decoded: FrameRate = serde_json::from_str(r#"{"num":2997,"den":100}"#).unwrap();
        assert_eq!(decoded, rate);
    }
}
