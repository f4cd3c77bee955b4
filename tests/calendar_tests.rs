use chrono::{Datelike, NaiveDate, Weekday};
use roster_tool::{MonthKey, WorkCalendar};

#[test]
fn default_calendar_weekends_are_not_business_days() {
    let cal = WorkCalendar::default();
    // 2025-01-04 is a Saturday, 2025-01-05 is a Sunday
    let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
    let sun = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    assert!(!cal.is_business_day(sat));
    assert!(!cal.is_business_day(sun));
    assert!(cal.is_business_day(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()));
}

#[test]
fn next_business_day_skips_weekend() {
    let cal = WorkCalendar::default();
    let fri = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    let next = cal.next_business_day(fri).unwrap();
    assert_eq!(next.weekday(), Weekday::Mon);
    assert_eq!(next, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());

    // a Saturday also steps to Monday
    let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
    assert_eq!(cal.next_business_day(sat), Some(next));
}

#[test]
fn business_days_in_range_are_inclusive() {
    let cal = WorkCalendar::default();
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(); // Mon
    let end = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(); // Sun
    let days = cal.business_days_in_range(start, end);
    assert_eq!(days.len(), 5);
    assert_eq!(days.first().copied().unwrap(), start);
    assert_eq!(
        days.last().copied().unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    );
}

#[test]
fn month_enumeration_covers_february_of_a_leap_year() {
    let cal = WorkCalendar::default();
    let days = cal.business_days_in_month(MonthKey::new(2024, 2).unwrap());
    assert_eq!(days.len(), 21);
    assert_eq!(days.last().copied().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn six_day_week_includes_saturday() {
    let cal = WorkCalendar::with_working_days([
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ])
    .unwrap();
    let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
    assert!(cal.is_business_day(sat));
    assert_eq!(
        cal.next_business_day(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()),
        Some(sat)
    );
}
