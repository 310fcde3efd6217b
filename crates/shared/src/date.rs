use time::{Date, Duration, OffsetDateTime, Weekday};

pub const DAYS_PER_WEEK: u8 = 7;

/// Today's date in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Returns the Monday that starts the upcoming planning week.
///
/// A Monday is its own boundary; any other day rolls forward to the next Monday.
pub fn upcoming_week_start(from: Date) -> Date {
    if from.weekday() == Weekday::Monday {
        return from;
    }

    from.next_occurrence(Weekday::Monday)
}

/// Every date of the week beginning at `start`, in order.
pub fn week_days(start: Date) -> Vec<Date> {
    (0..DAYS_PER_WEEK)
        .map(|offset| start + Duration::days(offset.into()))
        .collect()
}

/// Lower-case weekday label, e.g. `"monday"`.
pub fn day_label(date: Date) -> String {
    date.weekday().to_string().to_lowercase()
}
