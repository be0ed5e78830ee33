use chrono::{Duration, NaiveDate};

use crate::models::user::User;

/// Applies one study activity (login, practice submission, mock-test
/// submission) to the user's streak state for the given calendar day:
///
/// - no previous study date: streak starts at 1
/// - already studied today: unchanged, extra activity the same day is free
/// - studied yesterday: streak extends by one
/// - any gap (or a bogus future date): streak resets to 1
///
/// Mutates the user in place and does NOT persist; the caller writes the
/// `streak` / `last_study_date` columns.
pub fn update_streak(user: &mut User, today: NaiveDate) {
    let yesterday = today - Duration::days(1);

    match user.last_study_date {
        None => {
            user.streak = 1;
            user.last_study_date = Some(today);
        }
        Some(last) if last == today => {}
        Some(last) if last == yesterday => {
            user.streak += 1;
            user.last_study_date = Some(today);
        }
        Some(_) => {
            user.streak = 1;
            user.last_study_date = Some(today);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::test_fixtures::user;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_activity_starts_a_streak() {
        let mut u = user();
        let today = day(2025, 3, 10);
        update_streak(&mut u, today);
        assert_eq!(u.streak, 1);
        assert_eq!(u.last_study_date, Some(today));
    }

    #[test]
    fn same_day_activity_is_idempotent() {
        let mut u = user();
        let today = day(2025, 3, 10);
        u.streak = 4;
        u.last_study_date = Some(today);
        update_streak(&mut u, today);
        assert_eq!(u.streak, 4);
        assert_eq!(u.last_study_date, Some(today));
    }

    #[test]
    fn consecutive_day_extends_the_streak() {
        let mut u = user();
        u.streak = 5;
        u.last_study_date = Some(day(2025, 3, 9));
        update_streak(&mut u, day(2025, 3, 10));
        assert_eq!(u.streak, 6);
        assert_eq!(u.last_study_date, Some(day(2025, 3, 10)));
    }

    #[test]
    fn streak_survives_a_month_boundary() {
        let mut u = user();
        u.streak = 2;
        u.last_study_date = Some(day(2025, 2, 28));
        update_streak(&mut u, day(2025, 3, 1));
        assert_eq!(u.streak, 3);
    }

    #[test]
    fn a_gap_resets_to_one() {
        let mut u = user();
        u.streak = 10;
        u.last_study_date = Some(day(2025, 3, 7));
        update_streak(&mut u, day(2025, 3, 10));
        assert_eq!(u.streak, 1);
        assert_eq!(u.last_study_date, Some(day(2025, 3, 10)));
    }

    #[test]
    fn a_future_study_date_resets_to_one() {
        let mut u = user();
        u.streak = 7;
        u.last_study_date = Some(day(2025, 3, 12));
        update_streak(&mut u, day(2025, 3, 10));
        assert_eq!(u.streak, 1);
        assert_eq!(u.last_study_date, Some(day(2025, 3, 10)));
    }
}
