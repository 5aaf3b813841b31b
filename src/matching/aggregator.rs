use std::collections::HashSet;

use chrono::NaiveDate;

use crate::matching::amount::normalize_amount;
use crate::matching::deadline::classify;
use crate::matching::eligibility::is_eligible;
use crate::models::profiles::Profile;
use crate::models::scholarships::{MatchQuery, MatchedScholarship, Scholarship};

/// Optional client-side narrowing applied after eligibility. All filters are
/// conjunctive; an empty string counts as "no filter", matching how the
/// results form submits untouched dropdowns.
#[derive(Debug, Default, Clone)]
pub struct MatchFilters {
    pub category: Option<String>,
    pub education: Option<String>,
    pub search: Option<String>,
    pub max_income: Option<i64>,
    pub min_amount: Option<i64>,
}

impl From<MatchQuery> for MatchFilters {
    fn from(query: MatchQuery) -> Self {
        MatchFilters {
            category: query.category,
            education: query.education,
            search: query.search,
            max_income: query.max_income,
            min_amount: query.min_amount,
        }
    }
}

impl MatchFilters {
    fn admits(&self, scholarship: &Scholarship) -> bool {
        let by_category = self.category.as_deref().map_or(true, |category| {
            category.is_empty() || scholarship.category.eq_ignore_ascii_case(category)
        });
        let by_education = self.education.as_deref().map_or(true, |education| {
            education.is_empty() || scholarship.education.eq_ignore_ascii_case(education)
        });
        let by_search = self.search.as_deref().map_or(true, |needle| {
            needle.is_empty()
                || scholarship
                    .name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
        });
        // an income value is admitted when the scholarship's ceiling covers it
        let by_income = self.max_income.map_or(true, |income| {
            scholarship
                .max_income
                .map_or(true, |ceiling| income <= ceiling)
        });
        let by_amount = self
            .min_amount
            .map_or(true, |min| normalize_amount(&scholarship.amount) >= min);

        by_category && by_education && by_search && by_income && by_amount
    }
}

/// Matched scholarships for one profile: eligibility first, then the
/// exclusion set (already saved/applied views), then the optional filters,
/// annotated with the closing-soon classification.
///
/// Results are ordered soonest deadline first with undated entries at the
/// end; the store streams collections in no particular order, so the sort
/// keeps responses deterministic.
pub fn find_matches(
    profile: &Profile,
    scholarships: &[Scholarship],
    filters: &MatchFilters,
    exclude_ids: &HashSet<String>,
    today: NaiveDate,
    closing_window_days: i64,
) -> Vec<MatchedScholarship> {
    let mut matches: Vec<MatchedScholarship> = scholarships
        .iter()
        .filter(|s| is_eligible(s, profile))
        .filter(|s| !exclude_ids.contains(&s.id))
        .filter(|s| filters.admits(s))
        .map(|s| {
            let status = classify(&s.deadline, today, closing_window_days);
            MatchedScholarship {
                scholarship: s.clone(),
                is_closing_soon: status.is_closing_soon,
                days_left: status.days_left,
            }
        })
        .collect();

    matches.sort_by(|a, b| {
        (a.days_left.unwrap_or(i64::MAX), a.scholarship.name.as_str())
            .cmp(&(b.days_left.unwrap_or(i64::MAX), b.scholarship.name.as_str()))
    });

    matches
}
