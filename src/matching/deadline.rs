use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineStatus {
    pub days_left: Option<i64>,
    pub is_closing_soon: bool,
}

/// Days from `today` to a `YYYY-MM-DD` deadline; `None` when the deadline
/// does not parse. Negative values mean the deadline has passed.
pub fn days_until(deadline: &str, today: NaiveDate) -> Option<i64> {
    NaiveDate::parse_from_str(deadline, "%Y-%m-%d")
        .ok()
        .map(|date| (date - today).num_days())
}

/// Fail-open classification: an unparseable deadline is never closing soon
/// and never filters a scholarship out. The window is a parameter because
/// every caller has its own configured value.
pub fn classify(deadline: &str, today: NaiveDate, window_days: i64) -> DeadlineStatus {
    let days_left = days_until(deadline, today);

    DeadlineStatus {
        days_left,
        is_closing_soon: days_left.map_or(false, |days| (0..=window_days).contains(&days)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_none;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn four_days_out_is_closing_soon() {
        let status = classify("2024-01-05", date(2024, 1, 1), 7);
        assert_eq!(status.days_left, Some(4));
        assert!(status.is_closing_soon);
    }

    #[test]
    fn deadline_today_is_closing_soon() {
        let status = classify("2024-01-01", date(2024, 1, 1), 7);
        assert_eq!(status.days_left, Some(0));
        assert!(status.is_closing_soon);
    }

    #[test]
    fn past_deadline_is_not_closing_soon() {
        let status = classify("2023-12-30", date(2024, 1, 1), 7);
        assert_eq!(status.days_left, Some(-2));
        assert!(!status.is_closing_soon);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        assert!(classify("2024-01-08", date(2024, 1, 1), 7).is_closing_soon);
        assert!(!classify("2024-01-09", date(2024, 1, 1), 7).is_closing_soon);
    }

    #[test]
    fn unparseable_deadline_fails_open() {
        let status = classify("next friday", date(2024, 1, 1), 7);
        assert_none!(status.days_left);
        assert!(!status.is_closing_soon);
    }

    #[test]
    fn windows_are_independent_per_call() {
        // the saved-alert path runs a narrower window than the results view
        assert!(classify("2024-01-06", date(2024, 1, 1), 7).is_closing_soon);
        assert!(!classify("2024-01-06", date(2024, 1, 1), 3).is_closing_soon);
    }
}
