use chrono::{DateTime, NaiveDate, Utc};
use glucochart::compose::{ChartComposer, ComposeConfig};
use glucochart::core::{Sample, TimeSeries, Viewport};
use glucochart::layout::Annotation;
use glucochart::overlay::{DayInput, normalize_series, normalize_time, reference_day};
use glucochart::render::{LineStrokeStyle, day_annotation_color, day_color};
use indexmap::IndexMap;

fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    date.and_hms_opt(hour, minute, 0).expect("time").and_utc()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 17).expect("date")
}

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 18).expect("date")
}

fn series(date: NaiveDate, samples: &[(u32, u32, f64)]) -> TimeSeries {
    TimeSeries::new(
        samples
            .iter()
            .map(|(h, m, v)| Sample::new(at(date, *h, *m), *v).expect("sample"))
            .collect(),
    )
    .expect("series")
}

fn two_flat_days(annotations_per_day: &[Vec<Annotation>; 2]) -> IndexMap<NaiveDate, DayInput> {
    let mut days = IndexMap::new();
    for (date, annotations) in [monday(), tuesday()].into_iter().zip(annotations_per_day) {
        let samples: Vec<(u32, u32, f64)> = (0..24).map(|h| (h, 0, 5.5)).collect();
        days.insert(date, DayInput::new(series(date, &samples), annotations.clone()));
    }
    days
}

#[test]
fn normalization_rebases_onto_the_reference_date() {
    let reference = reference_day();
    assert_eq!(reference, NaiveDate::from_ymd_opt(2000, 1, 1).expect("date"));

    let from_monday = normalize_time(at(monday(), 8, 30), reference);
    let from_tuesday = normalize_time(at(tuesday(), 8, 30), reference);
    assert_eq!(from_monday, from_tuesday);
    assert_eq!(from_monday, at(reference, 8, 30));

    let normalized =
        normalize_series(&series(monday(), &[(7, 0, 5.0), (8, 0, 6.0)]), reference)
            .expect("normalized");
    assert_eq!(normalized.day(), reference);
    assert_eq!(normalized.first().value, 5.0);
}

#[test]
fn empty_overlay_input_is_rejected() {
    let composer = ChartComposer::new(ComposeConfig::overlay()).expect("composer");
    let days: IndexMap<NaiveDate, DayInput> = IndexMap::new();
    assert!(composer.compose_overlay(&days, Viewport::new(1440, 600)).is_err());
}

#[test]
fn same_time_of_day_lands_on_the_same_x_across_days() {
    let mut days = IndexMap::new();
    days.insert(
        monday(),
        DayInput::new(series(monday(), &[(8, 0, 5.0), (9, 0, 6.0)]), Vec::new()),
    );
    days.insert(
        tuesday(),
        DayInput::new(series(tuesday(), &[(8, 0, 4.6), (9, 0, 5.4)]), Vec::new()),
    );

    let composer = ChartComposer::new(ComposeConfig::overlay()).expect("composer");
    let frame = composer
        .compose_overlay(&days, Viewport::new(1440, 600))
        .expect("frame");

    // One in-band line per day plus two reference lines.
    assert_eq!(frame.lines.len(), 4);
    assert_eq!(frame.lines[0].x1, frame.lines[1].x1);
    assert_eq!(frame.lines[0].x2, frame.lines[1].x2);
    // 08:00 on a 1440 px day axis.
    assert!((frame.lines[0].x1 - 480.0).abs() < 1e-9);
}

#[test]
fn out_of_band_overlay_segments_go_dashed_in_the_day_color() {
    let mut days = IndexMap::new();
    days.insert(
        monday(),
        DayInput::new(series(monday(), &[(8, 0, 5.0), (9, 0, 6.0)]), Vec::new()),
    );
    days.insert(
        tuesday(),
        DayInput::new(series(tuesday(), &[(8, 0, 6.0), (9, 0, 9.5)]), Vec::new()),
    );

    let composer = ChartComposer::new(ComposeConfig::overlay()).expect("composer");
    let frame = composer
        .compose_overlay(&days, Viewport::new(1440, 600))
        .expect("frame");

    let monday_lines: Vec<_> = frame
        .lines
        .iter()
        .filter(|line| line.color == day_color(0))
        .collect();
    let tuesday_lines: Vec<_> = frame
        .lines
        .iter()
        .filter(|line| line.color == day_color(1))
        .collect();

    assert_eq!(monday_lines.len(), 1);
    assert_eq!(monday_lines[0].style, LineStrokeStyle::Solid);

    // Tuesday crosses 7.8 once: an in-band piece and a dashed excursion.
    assert_eq!(tuesday_lines.len(), 2);
    assert_eq!(tuesday_lines[0].style, LineStrokeStyle::Solid);
    assert_eq!(tuesday_lines[1].style, LineStrokeStyle::Dashed);
}

#[test]
fn overlay_frames_carry_no_area_fill() {
    let days = two_flat_days(&[Vec::new(), Vec::new()]);
    let composer = ChartComposer::new(ComposeConfig::overlay()).expect("composer");
    let frame = composer
        .compose_overlay(&days, Viewport::new(1440, 600))
        .expect("frame");
    assert!(frame.fills.is_empty());
}

#[test]
fn overlay_labels_show_only_the_event_time() {
    let days = two_flat_days(&[
        vec![Annotation::new(at(monday(), 8, 30), "breakfast, two eggs")],
        vec![Annotation::new(at(tuesday(), 12, 10), "lunch")],
    ]);
    let composer = ChartComposer::new(ComposeConfig::overlay()).expect("composer");
    let frame = composer
        .compose_overlay(&days, Viewport::new(1440, 600))
        .expect("frame");

    assert_eq!(frame.labels.len(), 2);
    assert_eq!(frame.labels[0].text, "08:30");
    assert_eq!(frame.labels[1].text, "12:10");
    assert_eq!(frame.labels[0].text_color, day_annotation_color(0));
    assert_eq!(frame.labels[1].text_color, day_annotation_color(1));
}

#[test]
fn days_compete_for_the_same_hour_slots() {
    // Both days annotate 09:00 on a flat curve. With a shared placement state
    // the second day's label must be pushed further from the anchor than the
    // first day's, and the two boxes must not coincide.
    let days = two_flat_days(&[
        vec![Annotation::new(at(monday(), 9, 0), "walk")],
        vec![Annotation::new(at(tuesday(), 9, 0), "walk")],
    ]);
    let composer = ChartComposer::new(ComposeConfig::overlay()).expect("composer");
    let frame = composer
        .compose_overlay(&days, Viewport::new(1440, 600))
        .expect("frame");

    assert_eq!(frame.labels.len(), 2);
    let anchor_y = frame.connectors[0].to_y;
    assert_eq!(frame.connectors[1].to_y, anchor_y);

    let first_distance = (frame.labels[0].y - anchor_y).abs();
    let second_distance = (frame.labels[1].y - anchor_y).abs();
    assert!(
        second_distance > first_distance,
        "second day's label must sit further out ({second_distance} vs {first_distance})"
    );
    assert_ne!(frame.labels[0].y, frame.labels[1].y);
}

#[test]
fn overlay_axis_covers_the_global_value_range() {
    let mut days = IndexMap::new();
    days.insert(
        monday(),
        DayInput::new(series(monday(), &[(8, 0, 4.1), (9, 0, 6.0)]), Vec::new()),
    );
    days.insert(
        tuesday(),
        DayInput::new(series(tuesday(), &[(8, 0, 5.0), (9, 0, 11.2)]), Vec::new()),
    );

    let composer = ChartComposer::new(ComposeConfig::overlay()).expect("composer");
    let frame = composer
        .compose_overlay(&days, Viewport::new(1440, 600))
        .expect("frame");

    // Floor wins below, overlay headroom of 1.5 above the global maximum.
    assert!((frame.axes.value_min - 3.5).abs() < 1e-9);
    assert!((frame.axes.value_max - 12.7).abs() < 1e-9);
    // Denser hour grid than the single-day view: every 3 hours.
    assert_eq!(frame.axes.hour_ticks.len(), 9);
    assert_eq!(frame.axes.time_start, at(reference_day(), 0, 0));
}

#[test]
fn day_palettes_cycle_past_their_length() {
    assert_eq!(day_color(7), day_color(0));
    assert_eq!(day_annotation_color(9), day_annotation_color(2));
    assert_ne!(day_color(0), day_color(1));
}
