use chrono::NaiveDateTime;

/// Substitutes the calendar date of a timestamp when it falls before the
/// minimum or after the maximum date, keeping the original time-of-day.
///
/// The min check runs first and only one branch ever fires, so a caller
/// supplying `min > max` gets whichever branch matches first.
pub fn clamp_date_time(
    dt: NaiveDateTime,
    min: NaiveDateTime,
    max: NaiveDateTime,
) -> NaiveDateTime {
    if dt < min {
        min.date().and_time(dt.time())
    } else if dt > max {
        max.date().and_time(dt.time())
    } else {
        dt
    }
}
