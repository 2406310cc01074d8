/*!
 * End-to-end conversion tests from ITT fixtures to TTML and WebVTT
 */

use ittconv::app_config::{Config, OutputFormat};
use ittconv::formats::validate_ttml;
use ittconv::{Diagnostics, convert, to_ttml, to_vtt};

use crate::common;

/// Test that the sample converts to the expected WebVTT document
#[test]
fn test_toVtt_withValidInput_shouldRenderStylesRegionsAndBreaks() {
    let output = to_vtt(&common::read_fixture("valid_input.itt")).unwrap();

    let expected = "WEBVTT

STYLE
::cue(.s1) {
  color: white;
}

00:00:01.000 --> 00:00:03.500 line:80% size:80% align:center position:50%
<c.s1><i>This is the first subtitle</i></c>

00:00:04.000 --> 00:00:06.000 line:80% size:80% align:center position:50%
<b>This is the second subtitle</b>

00:00:07.000 --> 00:00:09.750 line:80% size:80% align:center position:50%
A third one
on two lines

";
    assert_eq!(output, expected);
}

/// Test that the sample converts to valid TTML
#[test]
fn test_toTtml_withValidInput_shouldRenderDocument() {
    let output = to_ttml(&common::read_fixture("valid_input.itt")).unwrap();

    assert!(output.starts_with("<?xml version"));
    assert!(output.contains("<tt xmlns=\"http://www.w3.org/ns/ttml\""));
    assert!(output.contains("xml:lang=\"en-US\""));
    assert!(output.contains(r#"<p begin="00:00:01.000" end="00:00:03.500" style="s1" region="bottom">This is the first subtitle</p>"#));
    assert!(output.contains("A third one<br/>on two lines</p>"));
    assert!(output.contains(r#"tts:displayAlign="after""#));
    assert!(validate_ttml(&output).is_ok());
}

/// Test that markup characters stay escaped in TTML
#[test]
fn test_toTtml_withBrackets_shouldKeepEntitiesEscaped() {
    let output = to_ttml(&common::read_fixture("brackets.itt")).unwrap();

    for snippet in ["&lt;FLASH SALE&gt;", "&lt;promo&gt;", "AT&amp;T", "Butter &amp; ", "&quot;run&quot;", "© and —"] {
        assert!(output.contains(snippet), "TTML output missing {:?}", snippet);
    }
    assert!(output.contains(r#"<span style="hl">Jam</span>"#));
}

/// Test that a newline inside a copied attribute stays out of the line breaks
#[test]
fn test_toTtml_withNewlineInSpanAttribute_shouldStayWellFormed() {
    for title in ["x\ny", "x&#10;y"] {
        let source = common::itt_document(
            "24",
            &format!(
                r#"<div><p begin="00:00:01:00" end="00:00:02:00">a <span title="{}">b</span></p></div>"#,
                title
            ),
        );
        let output = to_ttml(&source).unwrap();

        assert!(output.contains(r#"a <span title="x&#xA;y">b</span></p>"#), "unexpected TTML: {}", output);
        assert!(!output.contains("x<br/>y"));
        assert!(validate_ttml(&output).is_ok());
    }
}

/// Test that WebVTT only escapes what it must
#[test]
fn test_toVtt_withBrackets_shouldEscapeForWebVtt() {
    let output = to_vtt(&common::read_fixture("brackets.itt")).unwrap();

    for snippet in ["&lt;FLASH SALE>", "&lt;promo>", "AT&amp;T", "\"run\" &amp; vanished", "©", "—"] {
        assert!(output.contains(snippet), "WebVTT output missing {:?}", snippet);
    }
    assert!(output.contains("Butter &amp; <c.hl><b>Jam</b></c> &lt;promo>"));
}

/// Test that NTSC cues are sorted and truncated to whole milliseconds
#[test]
fn test_toVtt_withNtscRate_shouldSortAndTruncate() {
    let output = to_vtt(&common::read_fixture("brackets.itt")).unwrap();

    let first = output.find("00:00:00.500 --> 00:00:01.967").unwrap();
    let second = output.find("00:00:02.000 --> 00:00:04.000").unwrap();
    assert!(first < second);
}

/// Test that shifted cues keep their region placement in WebVTT
#[test]
fn test_toVtt_withShiftedInput_shouldUseRegionSettings() {
    let output = to_vtt(&common::read_fixture("shifted.itt")).unwrap();

    assert!(output.contains(" line:0% size:100% align:center position:50%\nOben"));
    assert!(output.contains(" line:85% size:100% align:center position:50%\nErste Zeile"));
    assert!(!output.contains("STYLE"));
}

/// Test that config switches change the rendered output
#[test]
fn test_convert_withConfigOptions_shouldHonorThem() {
    let mut config = Config::default();
    config.vtt.style_block = false;
    config.vtt.cue_settings = false;
    let source = common::read_fixture("valid_input.itt");

    let output = convert(&source, OutputFormat::Vtt, &config, &Diagnostics::silent()).unwrap();

    assert!(!output.contains("STYLE"));
    assert!(output.contains("00:00:01.000 --> 00:00:03.500\n"));
}

/// Test that a parse failure produces no output at all
#[test]
fn test_convert_withInvalidTimeRange_shouldFail() {
    let source = common::read_fixture("invalid_time_range.itt");
    assert!(to_vtt(&source).is_err());
    assert!(to_ttml(&source).is_err());
}
