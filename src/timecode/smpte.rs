use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};

use super::{FrameRate, format_clock_time, thousand};
use crate::errors::TimecodeError;

// @module: Signed SMPTE timecodes

/// Direction of a timecode; a negative value denotes a backwards shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

/// Parsed `[+|-]HH:MM:SS:FF` (or drop-frame `HH:MM:SS;FF`) timecode.
///
/// Frames are not checked against any frame rate: `00:00:00:40` is accepted
/// at 24 fps and simply converts to more than one second.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SmpteTimecode {
    pub sign: Sign,
    pub hours: u64,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u64,
}

impl SmpteTimecode {
    /// Positive timecode from its fields
    pub fn new(hours: u64, minutes: u32, seconds: u32, frames: u64) -> Self {
        Self {
            sign: Sign::Positive,
            hours,
            minutes,
            seconds,
            frames,
        }
    }

    /// Same magnitude, negative direction
    pub fn negated(mut self) -> Self {
        self.sign = match self.sign {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        };
        self
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative
    }

    /// Parse SMPTE text.
    ///
    /// `;` separators are read as `:`, an optional leading `+`/`-` sets the
    /// sign, and exactly four numeric fields must remain.
    pub fn parse(text: &str) -> Result<Self, TimecodeError> {
        let normalized = text.trim().replace(';', ":");
        let (sign, body) = match normalized.strip_prefix('-') {
            Some(rest) => (Sign::Negative, rest),
            None => (
                Sign::Positive,
                normalized.strip_prefix('+').unwrap_or(&normalized),
            ),
        };

        let fields: Vec<&str> = body.split(':').collect();
        if fields.len() != 4 {
            return Err(TimecodeError::Format {
                value: text.to_string(),
                reason: format!("expected HH:MM:SS:FF, found {} field(s)", fields.len()),
            });
        }

        let field = |name: &str, raw: &str| -> Result<i64, TimecodeError> {
            raw.parse::<i64>().map_err(|e| TimecodeError::Format {
                value: text.to_string(),
                reason: format!("invalid {} '{}': {}", name, raw, e),
            })
        };
        let hours = field("hours", fields[0])?;
        let minutes = field("minutes", fields[1])?;
        let seconds = field("seconds", fields[2])?;
        let frames = field("frames", fields[3])?;

        if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) || frames < 0 {
            return Err(TimecodeError::Range {
                value: text.to_string(),
            });
        }

        Ok(Self {
            sign,
            hours: hours as u64,
            minutes: minutes as u32,
            seconds: seconds as u32,
            frames: frames as u64,
        })
    }

    /// Exact signed milliseconds:
    /// `((h*3600 + m*60 + s) + frames/rate) * 1000`.
    pub fn to_milliseconds(&self, frame_rate: &FrameRate) -> Result<BigRational, TimecodeError> {
        if frame_rate.is_zero() {
            return Err(TimecodeError::ZeroFrameRate);
        }

        let whole_seconds = BigInt::from(self.hours) * BigInt::from(3600)
            + BigInt::from(self.minutes) * BigInt::from(60)
            + BigInt::from(self.seconds);
        let frame_seconds =
            BigRational::from_integer(BigInt::from(self.frames)) / frame_rate.as_ratio();
        let milliseconds = (BigRational::from_integer(whole_seconds) + frame_seconds) * thousand();

        Ok(match self.sign {
            Sign::Positive => milliseconds,
            Sign::Negative => -milliseconds,
        })
    }

    /// Inverse of [`to_milliseconds`](Self::to_milliseconds).
    ///
    /// Whole seconds come from floor division of the magnitude; the leftover
    /// fraction of a second becomes frames, rounded half away from zero.
    pub fn from_milliseconds(
        milliseconds: &BigRational,
        frame_rate: &FrameRate,
    ) -> Result<Self, TimecodeError> {
        if frame_rate.is_zero() {
            return Err(TimecodeError::ZeroFrameRate);
        }

        let sign = if milliseconds.is_negative() {
            Sign::Negative
        } else {
            Sign::Positive
        };

        let total_seconds = milliseconds.abs() / thousand();
        let floor = total_seconds.floor();
        let whole = floor.to_integer();
        let frames = ((total_seconds - floor) * frame_rate.as_ratio())
            .round()
            .to_integer();

        let (hours, rest) = whole.div_rem(&BigInt::from(3600));
        let (minutes, seconds) = rest.div_rem(&BigInt::from(60));

        let overflow = |what: &str, value: &BigInt| TimecodeError::Overflow(format!("{} {}", what, value));
        Ok(Self {
            sign,
            hours: hours.to_u64().ok_or_else(|| overflow("hours", &hours))?,
            minutes: minutes.to_u32().ok_or_else(|| overflow("minutes", &minutes))?,
            seconds: seconds.to_u32().ok_or_else(|| overflow("seconds", &seconds))?,
            frames: frames.to_u64().ok_or_else(|| overflow("frames", &frames))?,
        })
    }

    /// Clock time `[-]HH:MM:SS.fff` with `precision` fractional digits.
    ///
    /// Rounds the fractional second on its own; this is independent of the
    /// frame rounding in [`from_milliseconds`](Self::from_milliseconds).
    pub fn to_clock_time(&self, frame_rate: &FrameRate, precision: usize) -> Result<String, TimecodeError> {
        let milliseconds = self.to_milliseconds(frame_rate)?;
        Ok(format_clock_time(&milliseconds, precision))
    }
}

impl FromStr for SmpteTimecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SmpteTimecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}
