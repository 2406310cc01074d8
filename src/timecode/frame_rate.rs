use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::errors::TimecodeError;

// @module: Rational frame rates

/// Exact frame rate, e.g. `23.976` is held as `2997/125`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameRate(BigRational);

impl FrameRate {
    /// Parse an integer (`"24"`) or decimal (`"29.97"`) frame rate.
    ///
    /// A decimal is read digit for digit as `digits / 10^k`, where `k` is the
    /// number of fractional digits, so no binary floating point is involved.
    pub fn parse(text: &str) -> Result<Self, TimecodeError> {
        let invalid = || TimecodeError::InvalidFrameRate {
            value: text.to_string(),
        };

        let trimmed = text.trim();
        let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer
            .bytes()
            .chain(fraction.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let numer: BigInt = format!("{}{}", integer, fraction)
            .parse()
            .map_err(|_| invalid())?;
        let denom = num_traits::pow(BigInt::from(10), fraction.len());

        Ok(Self(BigRational::new(numer, denom)))
    }

    /// Integer frame rate `n/1`
    pub fn from_integer(frames_per_second: u32) -> Self {
        Self(BigRational::from_integer(BigInt::from(frames_per_second)))
    }

    /// Exact value in frames per second
    pub fn as_ratio(&self) -> &BigRational {
        &self.0
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Apply a frameRateMultiplier.
    ///
    /// Only integer base rates are multiplied; a fractional base already
    /// encodes its pull-down and yields `None`, leaving the caller to keep the
    /// base rate unchanged.
    pub fn with_multiplier(&self, multiplier: &FrameRateMultiplier) -> Option<Self> {
        if !self.is_integer() {
            return None;
        }
        Some(Self(&self.0 * multiplier.as_ratio()))
    }
}

impl FromStr for FrameRate {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

/// Parsed `ttp:frameRateMultiplier`, e.g. `"1000 1001"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRateMultiplier {
    pub numerator: u64,
    pub denominator: u64,
}

impl FrameRateMultiplier {
    /// Parse two whitespace-separated positive integers
    pub fn parse(text: &str) -> Result<Self, TimecodeError> {
        let invalid = |reason: String| TimecodeError::InvalidMultiplier {
            value: text.to_string(),
            reason,
        };

        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(invalid(format!(
                "expected two integers, found {} value(s)",
                parts.len()
            )));
        }

        let numerator: u64 = parts[0]
            .parse()
            .map_err(|e| invalid(format!("numerator '{}': {}", parts[0], e)))?;
        let denominator: u64 = parts[1]
            .parse()
            .map_err(|e| invalid(format!("denominator '{}': {}", parts[1], e)))?;

        if numerator == 0 || denominator == 0 {
            return Err(invalid("values must be positive".to_string()));
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn as_ratio(&self) -> BigRational {
        BigRational::new(BigInt::from(self.numerator), BigInt::from(self.denominator))
    }
}

impl fmt::Display for FrameRateMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.numerator, self.denominator)
    }
}
