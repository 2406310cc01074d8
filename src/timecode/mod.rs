/*!
 * Frame-accurate timecode arithmetic.
 *
 * All values are exact rationals (`num_rational::BigRational`): frame rates
 * such as 23.976 become 2997/125 and millisecond timestamps keep their full
 * fractional part, so repeated conversions never drift.
 *
 * - `frame_rate`: rational frame rates and the frameRateMultiplier rule
 * - `smpte`: signed `HH:MM:SS:FF` timecodes and their conversions
 */

pub mod frame_rate;
pub mod smpte;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

pub use frame_rate::{FrameRate, FrameRateMultiplier};
pub use smpte::{Sign, SmpteTimecode};

/// Milliseconds per second as an exact rational
pub(crate) fn thousand() -> BigRational {
    BigRational::from_integer(BigInt::from(1000))
}

/// Format a millisecond value as `[-]HH:MM:SS.<precision digits>`.
///
/// The fractional second is rounded once, half away from zero, at the
/// requested precision. A rounding carry moves into the seconds field.
/// With a precision of zero the fractional part and its dot are omitted.
pub fn format_clock_time(milliseconds: &BigRational, precision: usize) -> String {
    let total_seconds = milliseconds.abs() / thousand();
    let floor = total_seconds.floor();
    let scale = num_traits::pow(BigInt::from(10), precision);

    let mut whole = floor.to_integer();
    let mut fraction = ((total_seconds - floor) * BigRational::from_integer(scale.clone()))
        .round()
        .to_integer();
    if fraction >= scale {
        fraction -= &scale;
        whole += 1;
    }

    let (hours, rest) = whole.div_rem(&BigInt::from(3600));
    let (minutes, seconds) = rest.div_rem(&BigInt::from(60));

    let sign = if milliseconds.is_negative() && !(whole.is_zero() && fraction.is_zero()) {
        "-"
    } else {
        ""
    };

    if precision == 0 {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    } else {
        format!(
            "{}{:02}:{:02}:{:02}.{:0width$}",
            sign,
            hours,
            minutes,
            seconds,
            fraction,
            width = precision
        )
    }
}
