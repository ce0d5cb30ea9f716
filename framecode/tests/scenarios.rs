//! End-to-end scenarios for frame rates, codec, arithmetic and timestamps.

use framecode::{
    FrameRate, Rational, StandardFrameRate, Timecode, TimecodeBuilder, TimecodeError,
    TimecodeOptions,
};
use pretty_assertions::assert_eq;

fn ntsc_29_97() -> FrameRate {
    StandardFrameRate::Fps29_97.frame_rate()
}

#[test]
fn test_ntsc_rate_spellings_are_identical() {
    let expected = FrameRate::from_ratio(24000, 1001).unwrap();
    let spellings = [
        "23.976".parse::<FrameRate>().unwrap(),
        "24000/1001".parse().unwrap(),
        "23976/1000".parse().unwrap(),
        "23.98".parse().unwrap(),
        "23.97602397602397602398".parse().unwrap(),
        "23.976023976023976023976023976".parse().unwrap(),
        FrameRate::from_f64(23.976_023_976_023_978).unwrap(),
    ];
    for rate in spellings {
        assert_eq!(rate, expected);
        assert_eq!(rate.as_rational(), Rational::new(24000, 1001));
        assert_eq!(rate.nominal_fps(), 24);
    }
}

#[test]
fn test_standard_rates() {
    let cases = [
        ("23.976", true, 24),
        ("24", false, 24),
        ("25", false, 25),
        ("29.97", true, 30),
        ("30", false, 30),
        ("50", false, 50),
        ("59.94", true, 60),
        ("60", false, 60),
    ];
    for (text, ntsc, nominal) in cases {
        let rate: FrameRate = text.parse().unwrap();
        assert_eq!(rate.is_ntsc(), ntsc, "{text}");
        assert_eq!(rate.nominal_fps(), nominal, "{text}");
    }
}

#[test]
fn test_drop_frame_skip_law() {
    let tc = Timecode::parse("00:00:59;29", ntsc_29_97()).unwrap();
    assert_eq!(tc.next().unwrap().to_string(), "00:01:00;02");

    let tc = Timecode::parse("00:09:59;29", ntsc_29_97()).unwrap();
    assert_eq!(tc.next().unwrap().to_string(), "00:10:00;00");
}

#[test]
fn test_rollover_at_24_hours() {
    let rate = FrameRate::from_int(30).unwrap();
    let tc = Timecode::parse("23:59:59:29", rate).unwrap();
    assert_eq!((tc + 1).unwrap().to_string(), "00:00:00:00");
}

#[test]
fn test_arithmetic_examples() {
    let rate = FrameRate::from_int(30).unwrap();
    let ten = Timecode::from_frames(10, rate).unwrap();
    let five = Timecode::from_frames(5, rate).unwrap();

    let sum = (ten + five).unwrap();
    assert_eq!(sum.frames(), 15);
    assert_eq!(sum.frame_rate(), rate);

    let diff = (five - ten).unwrap();
    assert_eq!(diff.frames(), 5);
}

#[test]
fn test_real_time_at_29_97() {
    let first = Timecode::from_frames(1, ntsc_29_97()).unwrap();
    assert_eq!(first.to_realtime().unwrap().exact(), Rational::zero());

    let thirtieth = Timecode::from_frames(30, ntsc_29_97()).unwrap();
    let real = thirtieth.to_realtime().unwrap();
    assert_eq!(real.exact(), Rational::new(29_029, 30_000));
    assert_eq!(real.to_string(), "00:00:00.967");
}

#[test]
fn test_system_and_real_time_diverge() {
    let options = TimecodeOptions {
        display_reference: true,
        ..TimecodeOptions::default()
    };
    let tc = TimecodeBuilder::new(ntsc_29_97())
        .options(options)
        .timecode("01:00:00;00")
        .build()
        .unwrap();
    let system = tc.to_systemtime().unwrap();
    assert_eq!(system.exact(), Rational::from_int(3600));
    assert!(tc.to_realtime().unwrap() > system);
}

#[test]
fn test_millisecond_rate() {
    let rate: FrameRate = "ms".parse().unwrap();
    let tc = Timecode::parse("00:11:01.040", rate).unwrap();
    assert!(!tc.is_fractional());
    assert_eq!(tc.frames(), 661_041);
    assert_eq!(tc.to_string(), "00:11:01.040");
    assert_eq!(tc.frame_delimiter(), '.');
}

#[test]
fn test_frames_rate() {
    let rate: FrameRate = "frames".parse().unwrap();
    let tc = Timecode::from_frames(3601, rate).unwrap();
    assert_eq!(tc.to_string(), "01:00:00:00");
}

#[test]
fn test_error_kinds() {
    assert!(matches!(
        "-24".parse::<FrameRate>(),
        Err(TimecodeError::InvalidFrameRate { .. })
    ));
    assert!(matches!(
        Timecode::from_frames(0, ntsc_29_97()),
        Err(TimecodeError::InvalidFrameCount { frames: 0 })
    ));
    assert!(matches!(
        Timecode::parse("1:2:x:4", ntsc_29_97()),
        Err(TimecodeError::MalformedTimecode { .. })
    ));
    assert!(matches!(
        framecode::Timestamp::new(Rational::new(-1, 30), false),
        Err(TimecodeError::NegativeTimestamp { .. })
    ));
}
