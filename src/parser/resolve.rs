/*!
 * Timing resolution.
 *
 * Second pass over a parsed document: converts every cue timecode to absolute
 * milliseconds with the document frame rate and applies the container shift
 * the cue inherited.
 */

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::diagnostics::Diagnostics;
use crate::document::{Cue, CueSide, IttDocument};
use crate::errors::ParseError;
use crate::timecode::FrameRate;

/// Fill `begin`/`end` of every cue.
///
/// Negative results are clamped to zero with a warning. A cue whose begin is
/// not strictly before its end aborts resolution.
pub fn resolve_timings(document: &mut IttDocument, diagnostics: &Diagnostics) -> Result<(), ParseError> {
    let frame_rate = document
        .frame_rate_value
        .clone()
        .ok_or(ParseError::MissingFrameRate)?;

    for cue in &mut document.cues {
        let begin = resolve_side(cue, CueSide::Begin, &frame_rate, diagnostics)?;
        let end = resolve_side(cue, CueSide::End, &frame_rate, diagnostics)?;

        if let (Some(begin), Some(end)) = (&begin, &end) {
            if begin >= end {
                return Err(ParseError::InvalidTimeRange {
                    cue_id: cue.id.clone(),
                    begin: begin.clone(),
                    end: end.clone(),
                });
            }
        }

        cue.begin = begin;
        cue.end = end;
    }

    diagnostics.info(format_args!(
        "Resolved timings for {} cues at {} fps",
        document.cues.len(),
        frame_rate
    ));
    Ok(())
}

fn resolve_side(
    cue: &Cue,
    side: CueSide,
    frame_rate: &FrameRate,
    diagnostics: &Diagnostics,
) -> Result<Option<BigRational>, ParseError> {
    let Some(timecode) = cue.timecode(side) else {
        return Ok(None);
    };

    let mut milliseconds = timecode
        .to_milliseconds(frame_rate)
        .map_err(|source| ParseError::Conversion {
            cue_id: cue.id.clone(),
            side,
            source,
        })?;
    if let Some(offset) = &cue.offset {
        milliseconds += offset;
    }

    if milliseconds.is_negative() {
        diagnostics.warn(format_args!(
            "Cue {} {} time {} ms is negative after offset, clamping to zero",
            cue.id, side, milliseconds
        ));
        milliseconds = BigRational::zero();
    }
    Ok(Some(milliseconds))
}
