use serde::{Deserialize, Serialize};
use time::{Date, Month};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    Years,
    Months,
}

/// Calendar age in whole years and months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    pub years: i32,
    pub months: i32,
}

/// Age at `today`, by calendar-field difference with a month borrow.
///
/// A birth date after `today` yields negative years; the source system never
/// validated this and callers rely on the permissive result.
pub fn age_at(birth: Date, today: Date) -> Age {
    let mut years = today.year() - birth.year();
    let mut months = u8::from(today.month()) as i32 - u8::from(birth.month()) as i32;
    if months < 0 {
        years -= 1;
        months += 12;
    }
    Age { years, months }
}

/// Back-compute an approximate birth date from a relative age.
///
/// Calendar subtraction, not a day-count offset: the day of month is kept and
/// clamped to the length of the target month (Feb 29 -> Feb 28 on non-leap
/// years, Mar 31 minus one month -> Feb 28/29).
pub fn birth_date_from_age(magnitude: u32, unit: AgeUnit, today: Date) -> Date {
    let (year, month) = match unit {
        AgeUnit::Years => (today.year() - magnitude as i32, today.month()),
        AgeUnit::Months => {
            let total =
                i64::from(today.year()) * 12 + i64::from(u8::from(today.month())) - 1
                    - i64::from(magnitude);
            let year = total.div_euclid(12) as i32;
            // rem_euclid(12) + 1 is always in 1..=12
            let month = Month::try_from((total.rem_euclid(12) + 1) as u8)
                .expect("month index in 1..=12");
            (year, month)
        }
    };
    let day = today.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).expect("clamped day fits the month")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn whole_years_since_birthday() {
        let age = age_at(date!(2020 - 03 - 10), date!(2025 - 03 - 10));
        assert_eq!(age, Age { years: 5, months: 0 });
    }

    #[test]
    fn month_borrow_before_birthday() {
        // Birthday month not reached yet this year
        let age = age_at(date!(2020 - 11 - 05), date!(2025 - 03 - 20));
        assert_eq!(age, Age { years: 4, months: 4 });
    }

    #[test]
    fn future_birth_date_goes_negative() {
        let age = age_at(date!(2026 - 06 - 01), date!(2025 - 03 - 01));
        assert_eq!(age.years, -2);
        assert_eq!(age.months, 9);
    }

    #[test]
    fn months_stay_within_a_year() {
        let birth = date!(2019 - 08 - 14);
        let today = date!(2025 - 02 - 02);
        let age = age_at(birth, today);
        assert!((0..12).contains(&age.months));
        // years*12 + months equals the whole-month distance between the dates
        let total = (today.year() - birth.year()) * 12 + u8::from(today.month()) as i32
            - u8::from(birth.month()) as i32;
        assert_eq!(age.years * 12 + age.months, total);
    }

    #[test]
    fn back_compute_years_keeps_month_and_day() {
        let birth = birth_date_from_age(3, AgeUnit::Years, date!(2025 - 07 - 21));
        assert_eq!(birth, date!(2022 - 07 - 21));
    }

    #[test]
    fn back_compute_months_borrows_across_year() {
        let birth = birth_date_from_age(18, AgeUnit::Months, date!(2025 - 03 - 15));
        assert_eq!(birth, date!(2023 - 09 - 15));
    }

    #[test]
    fn back_compute_clamps_day_to_target_month() {
        // Mar 31 minus one month lands in February
        let birth = birth_date_from_age(1, AgeUnit::Months, date!(2025 - 03 - 31));
        assert_eq!(birth, date!(2025 - 02 - 28));

        let leap = birth_date_from_age(1, AgeUnit::Years, date!(2024 - 02 - 29));
        assert_eq!(leap, date!(2023 - 02 - 28));
    }

    #[test]
    fn back_computed_age_round_trips() {
        let today = date!(2025 - 06 - 10);
        let birth = birth_date_from_age(30, AgeUnit::Months, today);
        let age = age_at(birth, today);
        assert_eq!(age.years * 12 + age.months, 30);
    }
}
