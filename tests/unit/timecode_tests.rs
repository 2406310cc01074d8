/*!
 * Tests for frame rate and SMPTE timecode arithmetic
 */

use ittconv::timecode::{FrameRate, FrameRateMultiplier, Sign, SmpteTimecode, format_clock_time};
use ittconv::TimecodeError;
use num_bigint::BigInt;
use num_rational::BigRational;

fn ms(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Test that half a second of frames converts exactly at 24 fps
#[test]
fn test_toMilliseconds_withTwelveFramesAt24_shouldBeFiveHundred() {
    let rate = FrameRate::parse("24").unwrap();
    let timecode = SmpteTimecode::parse("00:00:00:12").unwrap();
    assert_eq!(timecode.to_milliseconds(&rate).unwrap(), ms(500, 1));
}

/// Test that 29.97 is kept as an exact fraction
#[test]
fn test_frameRateParse_with2997_shouldBeExact() {
    let rate = FrameRate::parse("29.97").unwrap();
    assert_eq!(rate.as_ratio(), &ms(2997, 100));
}

/// Test that a negative timecode keeps its sign through conversion
#[test]
fn test_toMilliseconds_withNegativeSign_shouldStayNegative() {
    let rate = FrameRate::parse("24").unwrap();
    let timecode = SmpteTimecode::parse("-00:00:01:00").unwrap();
    assert_eq!(timecode.sign, Sign::Negative);
    assert_eq!(timecode.to_milliseconds(&rate).unwrap(), ms(-1000, 1));
}

/// Test that the drop-frame separator is accepted
#[test]
fn test_parse_withSemicolonSeparator_shouldNormalize() {
    let timecode = SmpteTimecode::parse("01:02:03;04").unwrap();
    assert_eq!(timecode, SmpteTimecode::new(1, 2, 3, 4));
}

/// Test that out-of-range minutes are rejected
#[test]
fn test_parse_withSixtyMinutes_shouldFailWithRange() {
    assert!(matches!(
        SmpteTimecode::parse("00:60:00:00"),
        Err(TimecodeError::Range { .. })
    ));
}

/// Test that a wrong field count is a format error
#[test]
fn test_parse_withThreeFields_shouldFailWithFormat() {
    assert!(matches!(
        SmpteTimecode::parse("00:00:01"),
        Err(TimecodeError::Format { .. })
    ));
}

/// Test that frames larger than the rate are carried into seconds
#[test]
fn test_toMilliseconds_withFramesAboveRate_shouldCarry() {
    let rate = FrameRate::from_integer(25);
    let timecode = SmpteTimecode::parse("00:00:00:30").unwrap();
    assert_eq!(timecode.to_milliseconds(&rate).unwrap(), ms(1200, 1));
}

/// Test that a multiplied NTSC rate round-trips through milliseconds
#[test]
fn test_fromMilliseconds_withNtscRate_shouldRoundTrip() {
    let multiplier = FrameRateMultiplier::parse("1000 1001").unwrap();
    let rate = FrameRate::from_integer(30).with_multiplier(&multiplier).unwrap();
    let timecode = SmpteTimecode::parse("01:23:45:29").unwrap();

    let milliseconds = timecode.to_milliseconds(&rate).unwrap();
    let back = SmpteTimecode::from_milliseconds(&milliseconds, &rate).unwrap();

    assert_eq!(back, timecode);
}

/// Test that the multiplier is ignored for fractional base rates
#[test]
fn test_withMultiplier_withFractionalBase_shouldReturnNone() {
    let multiplier = FrameRateMultiplier::parse("1000 1001").unwrap();
    assert!(FrameRate::parse("23.976").unwrap().with_multiplier(&multiplier).is_none());
}

/// Test that clock time rounds the fraction and carries into seconds
#[test]
fn test_formatClockTime_withCarry_shouldRollOver() {
    assert_eq!(format_clock_time(&ms(599_996, 10), 3), "00:01:00.000");
    assert_eq!(format_clock_time(&ms(1500, 1), 0), "00:00:02");
}

/// Test that a zero frame rate cannot be used for conversion
#[test]
fn test_toMilliseconds_withZeroRate_shouldFail() {
    let rate = FrameRate::parse("0").unwrap();
    let timecode = SmpteTimecode::new(0, 0, 1, 0);
    assert_eq!(timecode.to_milliseconds(&rate), Err(TimecodeError::ZeroFrameRate));
}
