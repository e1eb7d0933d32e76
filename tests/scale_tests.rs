use approx::assert_relative_eq;
use chrono::{DateTime, NaiveDate, Utc};
use glucochart::core::{
    AxisTuning, DayScale, GlucoseScale, LinearScale, Sample, TimeSeries, Viewport,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 17).expect("date")
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    day()
        .and_hms_opt(hour, minute, 0)
        .expect("time")
        .and_utc()
}

#[test]
fn linear_scale_round_trips() {
    let scale = LinearScale::new(0.0, 100.0).expect("scale");
    let px = scale.domain_to_pixel(25.0, 400.0).expect("to pixel");
    assert_relative_eq!(px, 100.0);
    let value = scale.pixel_to_domain(px, 400.0).expect("from pixel");
    assert_relative_eq!(value, 25.0);
}

#[test]
fn linear_scale_rejects_degenerate_domain() {
    assert!(LinearScale::new(5.0, 5.0).is_err());
    assert!(LinearScale::new(f64::NAN, 1.0).is_err());
}

#[test]
fn day_scale_spans_the_full_day() {
    let scale = DayScale::for_day(day()).expect("day scale");
    let viewport = Viewport::new(1440, 600);

    let start_px = scale.time_to_pixel(at(0, 0), viewport).expect("start");
    let noon_px = scale.time_to_pixel(at(12, 0), viewport).expect("noon");
    assert_relative_eq!(start_px, 0.0);
    assert_relative_eq!(noon_px, 720.0);
}

#[test]
fn day_scale_rejects_invalid_viewport() {
    let scale = DayScale::for_day(day()).expect("day scale");
    assert!(scale.time_to_pixel(at(12, 0), Viewport::new(0, 600)).is_err());
}

#[test]
fn hour_ticks_include_both_edges() {
    let scale = DayScale::for_day(day()).expect("day scale");

    let ticks = scale.hour_ticks(6).expect("ticks");
    assert_eq!(ticks.len(), 5);
    assert_eq!(ticks[0], at(0, 0));
    assert_eq!(ticks[4], ticks[0] + chrono::TimeDelta::hours(24));

    let odd = scale.hour_ticks(7).expect("ticks");
    assert_eq!(*odd.last().expect("last"), ticks[4]);

    assert!(scale.hour_ticks(0).is_err());
    assert!(scale.hour_ticks(25).is_err());
}

#[test]
fn glucose_axis_range_follows_the_floor_policy() {
    // min 5.0 is well above the floor: the axis keeps the reference band
    // visible by pinning its bottom at the floor.
    let scale = GlucoseScale::from_bounds(5.0, 9.0, AxisTuning::default()).expect("scale");
    let (axis_min, axis_max) = scale.domain();
    assert_relative_eq!(axis_min, 3.5);
    assert_relative_eq!(axis_max, 12.5);

    // A hypoglycemic dip pushes the bottom below the floor.
    let scale = GlucoseScale::from_bounds(2.4, 9.0, AxisTuning::default()).expect("scale");
    assert_relative_eq!(scale.domain().0, 1.9);

    // Never below zero.
    let scale = GlucoseScale::from_bounds(0.2, 9.0, AxisTuning::default()).expect("scale");
    assert_relative_eq!(scale.domain().0, 0.0);
}

#[test]
fn glucose_scale_is_inverted_in_pixel_space() {
    let scale = GlucoseScale::from_bounds(4.0, 8.0, AxisTuning::default()).expect("scale");
    let viewport = Viewport::new(800, 600);

    let (axis_min, axis_max) = scale.domain();
    let bottom = scale.value_to_pixel(axis_min, viewport).expect("bottom");
    let top = scale.value_to_pixel(axis_max, viewport).expect("top");
    assert_relative_eq!(bottom, 600.0);
    assert_relative_eq!(top, 0.0);

    let value = scale.pixel_to_value(300.0, viewport).expect("round trip");
    assert_relative_eq!(
        scale.value_to_pixel(value, viewport).expect("back"),
        300.0,
        max_relative = 1e-9
    );
}

#[test]
fn axis_tuning_rejects_bad_margins() {
    assert!(
        GlucoseScale::from_bounds(
            4.0,
            8.0,
            AxisTuning {
                top_margin: 0.0,
                ..AxisTuning::default()
            }
        )
        .is_err()
    );
    assert!(
        GlucoseScale::from_bounds(
            4.0,
            8.0,
            AxisTuning {
                floor: -1.0,
                ..AxisTuning::default()
            }
        )
        .is_err()
    );
}

#[test]
fn series_value_bounds_and_nearest_lookup() {
    let series = TimeSeries::new(vec![
        Sample::new(at(7, 0), 4.8).expect("sample"),
        Sample::new(at(7, 5), 5.6).expect("sample"),
        Sample::new(at(7, 10), 5.2).expect("sample"),
    ])
    .expect("series");

    assert_eq!(series.value_bounds(), (4.8, 5.6));
    assert_eq!(series.day(), day());
    assert_eq!(series.nearest_sample(at(7, 3)).time, at(7, 5));
    // Equidistant lookup resolves to the earliest sample.
    let midpoint = at(7, 2) + chrono::TimeDelta::seconds(30);
    assert_eq!(series.nearest_sample(midpoint).time, at(7, 0));
}
