use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Sunday-start week bucket stored on every event, e.g. `2024-W10`.
///
/// This is not ISO-8601: week 1 is the (possibly partial) week holding
/// January 1st and every following Sunday opens a new week. Stored events
/// carry keys produced by this exact formula, so it must not change.
pub fn week_key(date: NaiveDate) -> String {
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
    let days_since_jan1 = (date - jan1).num_days();
    let first_weekday = i64::from(jan1.weekday().num_days_from_sunday());
    let week = (days_since_jan1 + first_weekday + 1 + 6).div_euclid(7);
    format!("{}-W{}", date.year(), week)
}

/// `YYYY-MM` prefix of the date.
pub fn month_key(date: NaiveDate) -> String {
    date_key(date)[..7].to_string()
}

/// The `W{n}` half of a week key.
pub fn week_label(week_key: &str) -> &str {
    week_key.split_once('-').map(|(_, week)| week).unwrap_or(week_key)
}

pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_key_is_date_prefix() {
        let mut date = day(2023, 12, 25);
        for _ in 0..400 {
            assert_eq!(month_key(date), date_key(date)[..7]);
            date += Duration::days(1);
        }
        assert_eq!(month_key(day(2024, 3, 9)), "2024-03");
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2023-01-01 is a Sunday.
        assert_eq!(week_key(day(2023, 1, 1)), "2023-W1");
        assert_eq!(week_key(day(2023, 1, 7)), "2023-W1");
        assert_eq!(week_key(day(2023, 1, 8)), "2023-W2");

        // 2022-01-01 is a Saturday: a one-day first week.
        assert_eq!(week_key(day(2022, 1, 1)), "2022-W1");
        assert_eq!(week_key(day(2022, 1, 2)), "2022-W2");
    }

    #[test]
    fn week_numbers_follow_the_stored_formula() {
        // 2024-01-01 is a Monday (offset 1).
        assert_eq!(week_key(day(2024, 1, 1)), "2024-W1");
        assert_eq!(week_key(day(2024, 1, 6)), "2024-W1");
        assert_eq!(week_key(day(2024, 1, 7)), "2024-W2");
        assert_eq!(week_key(day(2024, 3, 5)), "2024-W10");
        assert_eq!(week_key(day(2024, 12, 31)), "2024-W53");
    }

    #[test]
    fn week_key_disagrees_with_iso_near_year_end() {
        let date = day(2024, 12, 30);
        let iso = date.iso_week();
        assert_eq!((iso.year(), iso.week()), (2025, 1));
        assert_eq!(week_key(date), "2024-W53");
    }

    #[test]
    fn week_key_is_stable_and_non_decreasing_within_a_year() {
        let mut date = day(2025, 1, 1);
        let mut previous = 0u32;
        while date.year() == 2025 {
            let key = week_key(date);
            assert_eq!(key, week_key(date));
            let week: u32 = week_label(&key)[1..].parse().unwrap();
            assert!(week >= previous, "{key} went backwards");
            previous = week;
            date += Duration::days(1);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(week_label("2024-W10"), "W10");
        assert_eq!(month_label(day(2024, 3, 1)), "March 2024");
        assert_eq!(parse_date(" 2024-03-05 "), Some(day(2024, 3, 5)));
        assert_eq!(parse_date("05/03/2024"), None);
    }
}
