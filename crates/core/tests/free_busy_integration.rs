//! Free/busy engine over realistic calendars and timezone transitions.

mod support;

use calcopilot_core::{busy_intervals_from_events, compute_free_slots};
use calcopilot_domain::{BusyInterval, FreeSlotQuery, WorkingHoursPolicy};
use chrono::{DateTime, Duration, TimeZone, Utc};
use support::{all_day_event, date, timed_event};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn new_york(start_hour: u32, end_hour: u32) -> WorkingHoursPolicy {
    WorkingHoursPolicy::new(start_hour, end_hour, "America/New_York")
}

#[test]
fn test_events_outside_working_hours_leave_full_days() {
    let events = vec![
        timed_event("early", "Gym", "2026-03-02T06:00:00-05:00", "2026-03-02T08:00:00-05:00"),
        timed_event("late", "Dinner", "2026-03-02T19:00:00-05:00", "2026-03-02T21:00:00-05:00"),
        timed_event("edge", "Overnight", "2026-03-02T18:00:00-05:00", "2026-03-03T09:00:00-05:00"),
    ];
    let busy = busy_intervals_from_events(&events);
    let query = FreeSlotQuery::new(date(2026, 3, 2), date(2026, 3, 3), 30);

    let report = compute_free_slots(&busy, &query, &new_york(9, 18)).unwrap();

    assert_eq!(report.total_found, 2);
    assert!(report.slots.iter().all(|slot| slot.available_minutes == 540));
    assert_eq!(report.slots[0].start, utc(2026, 3, 2, 14, 0));
    assert_eq!(report.slots[1].end, utc(2026, 3, 3, 23, 0));
}

#[test]
fn test_multi_day_all_day_event_blocks_each_date() {
    // Exclusive end: the 3rd and 4th are blocked, the 5th is not.
    let events = vec![all_day_event("trip", date(2026, 3, 3), date(2026, 3, 5))];
    let busy = busy_intervals_from_events(&events);
    let query = FreeSlotQuery::new(date(2026, 3, 2), date(2026, 3, 5), 60);

    let report = compute_free_slots(&busy, &query, &new_york(9, 18)).unwrap();

    let days: Vec<_> = report.slots.iter().map(|s| s.start.date_naive()).collect();
    assert_eq!(days, vec![date(2026, 3, 2), date(2026, 3, 5)]);
}

#[test]
fn test_working_window_follows_spring_forward() {
    let query = FreeSlotQuery::new(date(2026, 3, 6), date(2026, 3, 9), 30);

    let report = compute_free_slots(&[], &query, &new_york(9, 18)).unwrap();

    let starts: Vec<_> = report.slots.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![
            utc(2026, 3, 6, 14, 0),
            utc(2026, 3, 7, 14, 0),
            utc(2026, 3, 8, 13, 0),
            utc(2026, 3, 9, 13, 0),
        ]
    );
    assert!(report.slots.iter().all(|slot| slot.available_minutes == 540));
}

#[test]
fn test_start_hour_inside_the_gap_shifts_forward() {
    // 02:00 does not exist on 2026-03-08 in New York; the window opens at 03:00 EDT.
    let query = FreeSlotQuery::new(date(2026, 3, 8), date(2026, 3, 8), 30);

    let report = compute_free_slots(&[], &query, &new_york(2, 5)).unwrap();

    assert_eq!(report.slots.len(), 1);
    assert_eq!(report.slots[0].start, utc(2026, 3, 8, 7, 0));
    assert_eq!(report.slots[0].end, utc(2026, 3, 8, 9, 0));
    assert_eq!(report.slots[0].available_minutes, 120);
}

#[test]
fn test_fall_back_day_includes_repeated_hour() {
    let query = FreeSlotQuery::new(date(2026, 11, 1), date(2026, 11, 1), 30);

    let report = compute_free_slots(&[], &query, &new_york(0, 3)).unwrap();

    assert_eq!(report.slots[0].start, utc(2026, 11, 1, 4, 0));
    assert_eq!(report.slots[0].end, utc(2026, 11, 1, 8, 0));
    assert_eq!(report.slots[0].available_minutes, 240);
}

#[test]
fn test_input_order_does_not_matter() {
    let mut busy = vec![
        BusyInterval::timed(utc(2026, 3, 2, 15, 0), utc(2026, 3, 2, 16, 0)).unwrap(),
        BusyInterval::timed(utc(2026, 3, 2, 15, 30), utc(2026, 3, 2, 17, 0)).unwrap(),
        BusyInterval::all_day(date(2026, 3, 4)),
        BusyInterval::timed(utc(2026, 3, 3, 20, 0), utc(2026, 3, 3, 20, 45)).unwrap(),
    ];
    let query = FreeSlotQuery::new(date(2026, 3, 2), date(2026, 3, 5), 15);
    let policy = new_york(9, 18);

    let forward = compute_free_slots(&busy, &query, &policy).unwrap();
    busy.reverse();
    let backward = compute_free_slots(&busy, &query, &policy).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(forward, compute_free_slots(&busy, &query, &policy).unwrap());
}

/// Small deterministic generator so the property check needs no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

fn merged_minutes(mut spans: Vec<(DateTime<Utc>, DateTime<Utc>)>) -> i64 {
    spans.sort();
    let mut total = 0;
    let mut current: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    for (start, end) in spans {
        current = match current {
            Some((s, e)) if start <= e => Some((s, e.max(end))),
            Some((s, e)) => {
                total += (e - s).num_minutes();
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((s, e)) = current {
        total += (e - s).num_minutes();
    }
    total
}

#[test]
fn test_free_and_busy_minutes_cover_each_window() {
    let policy = WorkingHoursPolicy::new(9, 18, "UTC");
    let mut rng = Lcg(42);

    for day_offset in 0..20u64 {
        let day = date(2026, 6, 1) + Duration::days(day_offset as i64);
        let midnight = Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap());
        let window = (midnight + Duration::hours(9), midnight + Duration::hours(18));

        let mut busy = Vec::new();
        let mut clipped = Vec::new();
        for _ in 0..rng.next(8) {
            let start = midnight + Duration::minutes(rng.next(24 * 60) as i64);
            let end = start + Duration::minutes(1 + rng.next(180) as i64);
            busy.push(BusyInterval::timed(start, end).unwrap());
            if start < window.1 && end > window.0 {
                clipped.push((start.max(window.0), end.min(window.1)));
            }
        }

        let query = FreeSlotQuery::new(day, day, 1).with_max_slots(usize::MAX);
        let report = compute_free_slots(&busy, &query, &policy).unwrap();

        let free: i64 = report.slots.iter().map(|s| s.available_minutes).sum();
        assert_eq!(free + merged_minutes(clipped), 9 * 60, "day {day}");
        for pair in report.slots.windows(2) {
            assert!(pair[0].end < pair[1].start, "slots must not touch or overlap on {day}");
        }
    }
}

#[test]
fn test_cap_keeps_chronological_prefix() {
    let query = FreeSlotQuery::new(date(2026, 3, 2), date(2026, 3, 31), 30).with_max_slots(10);

    let report = compute_free_slots(&[], &query, &new_york(9, 18)).unwrap();

    assert_eq!(report.total_found, 30);
    assert_eq!(report.slots.len(), 10);
    assert!(report.is_truncated());
    assert_eq!(report.slots[9].start.date_naive(), date(2026, 3, 11));
}
