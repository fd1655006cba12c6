use benchtrack::units::{
    MetricUnit, TimeScale, auto_scale, format_nanos, format_value, round_to, scale_for_nanos,
};

#[test]
fn test_scale_boundaries() {
    assert_eq!(scale_for_nanos(999.0), TimeScale::NANOS);
    assert_eq!(scale_for_nanos(1_000.0), TimeScale::MICROS);
    assert_eq!(scale_for_nanos(999_999.0), TimeScale::MICROS);
    assert_eq!(scale_for_nanos(1_000_000.0), TimeScale::MILLIS);
    assert_eq!(scale_for_nanos(999_999_999.0), TimeScale::MILLIS);
    assert_eq!(scale_for_nanos(1_000_000_000.0), TimeScale::SECS);
}

#[test]
fn test_format_nanos_per_magnitude() {
    assert_eq!(format_nanos(12.34), "12.3 ns");
    assert_eq!(format_nanos(1_500.0), "1.50 us");
    assert_eq!(format_nanos(2_500_000.0), "2.50 ms");
    assert_eq!(format_nanos(3_000_000_000.0), "3.00 s");
}

#[test]
fn test_seconds_use_fixed_precision() {
    assert_eq!(format_value(MetricUnit::Seconds, 65.5), "65.50s");
    assert_eq!(format_value(MetricUnit::Nanoseconds, 65.5), "65.5 ns");
}

#[test]
fn test_auto_scale_uses_largest_value() {
    let scale = auto_scale(MetricUnit::Nanoseconds, &[10.0, 2_000.0, 500.0]);
    assert_eq!(scale, TimeScale::MICROS);
    assert_eq!(scale.apply(2_000.0), 2.0);
    assert_eq!(auto_scale(MetricUnit::Nanoseconds, &[]), TimeScale::NANOS);
    assert_eq!(
        auto_scale(MetricUnit::Seconds, &[5e9]),
        TimeScale::WALL_SECONDS
    );
}

#[test]
fn test_round_to() {
    assert_eq!(round_to(1.23456, 2), 1.23);
    assert_eq!(round_to(0.123456, 4), 0.1235);
    assert_eq!(round_to(1500.0, 2), 1500.0);
}

#[test]
fn test_format_nanos_boundaries() {
    assert_eq!(format_nanos(999.0), "999.0 ns");
    assert_eq!(format_nanos(1_000.0), "1.00 us");
    assert_eq!(format_nanos(1_000_000.0), "1.00 ms");
    assert_eq!(format_nanos(1_000_000_000.0), "1.00 s");
}
