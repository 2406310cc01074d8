/*!
 * Output formats for parsed ITT documents.
 *
 * - `ttml`: indented TTML with a structural self-check (`validator`)
 * - `vtt`: WebVTT with optional style block and region-derived cue settings
 *
 * Both formats print cue times with [`format_timestamp`].
 */

pub mod ttml;
pub mod validator;
pub mod vtt;

pub use ttml::to_ttml;
pub use validator::validate_ttml;
pub use vtt::to_vtt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::timecode::thousand;

/// `HH:MM:SS.mmm` for an absolute millisecond value.
///
/// Sub-millisecond fractions are truncated; a missing value or a negative one
/// renders as `00:00:00.000`. Hours grow past two digits when needed.
pub fn format_timestamp(milliseconds: Option<&BigRational>) -> String {
    let total = match milliseconds {
        Some(value) if value.is_positive() => value.floor().to_integer(),
        _ => BigInt::zero(),
    };

    let (total_seconds, millis) = total.div_rem(&thousand().to_integer());
    let (hours, rest) = total_seconds.div_rem(&BigInt::from(3600));
    let (minutes, seconds) = rest.div_rem(&BigInt::from(60));

    format!(
        "{:02}:{:02}:{:02}.{:03}",
        hours,
        minutes.to_u32().unwrap_or_default(),
        seconds.to_u32().unwrap_or_default(),
        millis.to_u32().unwrap_or_default()
    )
}
