//! Directory query parameters and filter resolution.
//!
//! [`resolve_filter`] turns the caller-supplied [`MemberParams`] into a fully
//! specified [`DirectoryFilter`]: default gender derived through a
//! [`CounterpartPolicy`], age range converted to birth-date bounds and
//! pagination clamped. The db crate executes the result.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Deserialize;

use crate::error::CoreError;
use crate::gender::{CounterpartPolicy, Gender};
use crate::pagination::{clamp_page_number, clamp_page_size, page_offset};

pub const DEFAULT_MIN_AGE: i32 = 18;
pub const DEFAULT_MAX_AGE: i32 = 100;

/// Upper bound accepted for `maxAge`.
const AGE_CEILING: i32 = 150;

/// Sort key for the directory listing. Always descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderBy {
    #[default]
    LastActive,
    Created,
}

/// Query-string parameters for `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberParams {
    pub gender: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub order_by: Option<OrderBy>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// Fully resolved listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// The requester never sees themselves.
    pub exclude_username: String,
    /// `None` lists every gender.
    pub gender: Option<Gender>,
    /// Inclusive lower bound on date of birth (oldest allowed).
    pub min_dob: NaiveDate,
    /// Inclusive upper bound on date of birth (youngest allowed).
    pub max_dob: NaiveDate,
    pub order_by: OrderBy,
    pub page_number: i64,
    pub page_size: i64,
}

impl DirectoryFilter {
    pub fn offset(&self) -> i64 {
        page_offset(self.page_number, self.page_size)
    }
}

/// Resolve the effective listing filter for `requester`.
///
/// `requester_gender` is `None` when the requester could not be found (or
/// has no gender on file); in that case no default gender is applied.
pub fn resolve_filter(
    requester: &str,
    requester_gender: Option<&Gender>,
    params: &MemberParams,
    policy: &dyn CounterpartPolicy,
    today: NaiveDate,
) -> Result<DirectoryFilter, CoreError> {
    let gender = match params.gender.as_deref().and_then(Gender::parse) {
        Some(explicit) => Some(explicit),
        None => requester_gender.and_then(|g| policy.default_filter(g)),
    };

    let min_age = params.min_age.unwrap_or(DEFAULT_MIN_AGE);
    let max_age = params.max_age.unwrap_or(DEFAULT_MAX_AGE);
    let (min_dob, max_dob) = birth_date_bounds(today, min_age, max_age)?;

    Ok(DirectoryFilter {
        exclude_username: requester.to_string(),
        gender,
        min_dob,
        max_dob,
        order_by: params.order_by.unwrap_or_default(),
        page_number: clamp_page_number(params.page_number),
        page_size: clamp_page_size(params.page_size),
    })
}

/// Convert an inclusive age range into inclusive date-of-birth bounds.
///
/// Someone is `max_age` until the day before their `max_age + 1` birthday,
/// so the oldest allowed birth date is one day after
/// `today - (max_age + 1) years`.
pub fn birth_date_bounds(
    today: NaiveDate,
    min_age: i32,
    max_age: i32,
) -> Result<(NaiveDate, NaiveDate), CoreError> {
    if min_age < 0 {
        return Err(CoreError::Validation("minAge must not be negative".into()));
    }
    if max_age > AGE_CEILING {
        return Err(CoreError::Validation(format!(
            "maxAge must not exceed {AGE_CEILING}"
        )));
    }
    if min_age > max_age {
        return Err(CoreError::Validation(format!(
            "minAge ({min_age}) must not exceed maxAge ({max_age})"
        )));
    }

    let max_dob = years_before(today, min_age)?;
    let min_dob = years_before(today, max_age + 1)? + Duration::days(1);
    Ok((min_dob, max_dob))
}

/// Age in whole years on `today` for someone born on `dob`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

fn years_before(date: NaiveDate, years: i32) -> Result<NaiveDate, CoreError> {
    // `years` is already validated to 0..=AGE_CEILING + 1.
    let months = Months::new(years as u32 * 12);
    date.checked_sub_months(months)
        .ok_or_else(|| CoreError::Validation("Age range out of bounds".into()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::gender::BinaryCounterpart;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn resolve(requester_gender: Option<&Gender>, params: &MemberParams) -> DirectoryFilter {
        resolve_filter("lisa", requester_gender, params, &BinaryCounterpart, today()).unwrap()
    }

    #[test]
    fn male_requester_defaults_to_female() {
        let filter = resolve(Some(&Gender::male()), &MemberParams::default());
        assert_eq!(filter.gender, Some(Gender::female()));
    }

    #[test]
    fn female_requester_defaults_to_male() {
        let filter = resolve(Some(&Gender::female()), &MemberParams::default());
        assert_eq!(filter.gender, Some(Gender::male()));
    }

    #[test]
    fn unknown_requester_gets_no_default() {
        let filter = resolve(None, &MemberParams::default());
        assert_eq!(filter.gender, None);
    }

    #[test]
    fn explicit_gender_wins_over_default() {
        let params = MemberParams {
            gender: Some("Male".into()),
            ..Default::default()
        };
        let filter = resolve(Some(&Gender::male()), &params);
        assert_eq!(filter.gender, Some(Gender::male()));
    }

    #[test]
    fn blank_gender_is_treated_as_unspecified() {
        let params = MemberParams {
            gender: Some("  ".into()),
            ..Default::default()
        };
        let filter = resolve(Some(&Gender::female()), &params);
        assert_eq!(filter.gender, Some(Gender::male()));
    }

    #[test]
    fn requester_is_excluded_and_defaults_applied() {
        let filter = resolve(None, &MemberParams::default());
        assert_eq!(filter.exclude_username, "lisa");
        assert_eq!(filter.order_by, OrderBy::LastActive);
        assert_eq!(filter.page_number, 1);
        assert_eq!(filter.page_size, 10);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn birth_date_bounds_are_inclusive() {
        let (min_dob, max_dob) = birth_date_bounds(today(), 18, 30).unwrap();
        // Turned 18 today.
        assert_eq!(max_dob, NaiveDate::from_ymd_opt(2006, 6, 15).unwrap());
        // Turns 31 tomorrow, so still 30.
        assert_eq!(min_dob, NaiveDate::from_ymd_opt(1993, 6, 16).unwrap());
        assert_eq!(age_on(max_dob, today()), 18);
        assert_eq!(age_on(min_dob, today()), 30);
    }

    #[test]
    fn inverted_age_range_is_rejected() {
        assert_matches!(
            birth_date_bounds(today(), 40, 30),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn negative_min_age_is_rejected() {
        assert_matches!(
            birth_date_bounds(today(), -1, 30),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn age_accounts_for_birthday_not_yet_reached() {
        let dob = NaiveDate::from_ymd_opt(1990, 12, 1).unwrap();
        assert_eq!(age_on(dob, today()), 33);
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(age_on(dob, today()), 34);
    }
}
