use chrono::{Duration, NaiveDate};

/// Week number of `today` in a semester whose week 1 starts on `first_monday`.
/// Days before the semester count as week 1.
#[must_use]
pub fn current_week(first_monday: NaiveDate, today: NaiveDate) -> u32 {
    let delta_days = (today - first_monday).num_days();
    if delta_days < 0 {
        return 1;
    }

    u32::try_from(delta_days / 7 + 1).unwrap_or(u32::MAX)
}

/// Calendar date of `weekday` (Monday = 1) in semester week `week`.
#[must_use]
pub fn occurrence_date(first_monday: NaiveDate, week: u32, weekday: u8) -> Option<NaiveDate> {
    let week_offset = i64::from(week.checked_sub(1)?);
    let day_offset = i64::from(weekday.checked_sub(1)?);
    first_monday.checked_add_signed(Duration::try_days(week_offset * 7 + day_offset)?)
}
