use availabilityGrid::models::time_of_day::{FallbackKind, Interval, TimeOfDay};
use availabilityGrid::service::range_parser::{
    MalformedRangePolicy, RangeParseError, parse_day_ranges, parse_day_ranges_with,
};
use availabilityGrid::service::time_parser::{TimeParseError, parse_time_token};

fn t(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap()
}

#[test]
fn hour_only_tokens_match_their_normalized_form() {
    let pairs = [
        ("8am", "8:00am"),
        ("12am", "12:00am"),
        ("12pm", "12:00pm"),
        ("11pm", "11:00pm"),
    ];
    for (short, long) in pairs {
        assert_eq!(
            parse_time_token(short, FallbackKind::DayStart),
            parse_time_token(long, FallbackKind::DayStart),
            "{short} vs {long}"
        );
    }
    assert_eq!(parse_time_token("8am", FallbackKind::DayStart), Ok(t(8, 0)));
    assert_eq!(parse_time_token("12am", FallbackKind::DayStart), Ok(t(0, 0)));
    assert_eq!(parse_time_token("12pm", FallbackKind::DayEnd), Ok(t(12, 0)));
}

#[test]
fn empty_tokens_fall_back_to_day_boundaries() {
    assert_eq!(parse_time_token("", FallbackKind::DayStart), Ok(t(0, 0)));
    assert_eq!(parse_time_token("", FallbackKind::DayEnd), Ok(t(23, 59)));
}

#[test]
fn upper_case_and_padding_parse_the_same() {
    assert_eq!(
        parse_time_token(" 5:30PM ", FallbackKind::DayStart),
        parse_time_token("5:30pm", FallbackKind::DayStart)
    );
}

#[test]
fn tokens_outside_the_grammar_are_malformed() {
    for token in ["13pm", "8:5pm", "noon", "8"] {
        assert!(matches!(
            parse_time_token(token, FallbackKind::DayStart),
            Err(TimeParseError::MalformedTimeToken { .. })
        ));
    }
}

#[test]
fn empty_or_absent_day_is_available_all_day() {
    let all_day = vec![Interval::new(t(0, 0), t(23, 59))];
    assert_eq!(parse_day_ranges(Some("")), all_day);
    assert_eq!(parse_day_ranges(None), all_day);
}

#[test]
fn two_ranges_keep_their_order() {
    assert_eq!(
        parse_day_ranges(Some("9am-11am;1pm-3pm")),
        vec![Interval::new(t(9, 0), t(11, 0)), Interval::new(t(13, 0), t(15, 0))]
    );
}

#[test]
fn skip_and_abort_policies_differ_on_bad_tokens() {
    let raw = Some("9am-11am;;bogus;1pm-3pm;");

    let skipped = parse_day_ranges_with(raw, MalformedRangePolicy::Skip).unwrap();
    assert_eq!(skipped.intervals.len(), 2);
    assert_eq!(
        skipped.skipped,
        vec![RangeParseError::MalformedRangeToken {
            token: "bogus".to_string(),
            reason: "missing '-' separator".to_string(),
        }]
    );

    assert!(parse_day_ranges_with(raw, MalformedRangePolicy::AbortDay).is_err());
}

#[test]
fn wholly_malformed_day_is_not_the_all_day_fallback() {
    assert!(parse_day_ranges(Some("bogus;also bogus")).is_empty());
}
