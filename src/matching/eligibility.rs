use crate::models::profiles::Profile;
use crate::models::scholarships::Scholarship;

/// Evaluates the eight eligibility criteria between a scholarship and a
/// profile. Case handling differs per criterion: gender, religion and
/// disability compare exactly against the sentinel "Any"; education, category
/// and state compare case-insensitively, with "any"/"all" as their
/// permissive forms. An absent income ceiling admits every income.
pub fn is_eligible(scholarship: &Scholarship, profile: &Profile) -> bool {
    let category = scholarship.category.to_lowercase();
    let state = scholarship.state.to_lowercase();

    (scholarship.gender == "Any" || scholarship.gender == profile.gender)
        && scholarship.education.eq_ignore_ascii_case(&profile.education)
        && (category == "any" || category == profile.category.to_lowercase())
        && (state == "all" || state == profile.state.to_lowercase())
        && scholarship
            .max_income
            .map_or(true, |ceiling| profile.income <= ceiling)
        && (scholarship.religion == "Any" || scholarship.religion == profile.religion)
        && (scholarship.disability == "Any" || scholarship.disability == profile.disability)
        && profile.percentage >= scholarship.min_percentage
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn open_scholarship() -> Scholarship {
        Scholarship {
            id: "s-1".to_string(),
            name: "National Merit Scholarship".to_string(),
            gender: "Any".to_string(),
            education: "UG".to_string(),
            category: "Any".to_string(),
            state: "All".to_string(),
            max_income: Some(300000),
            min_percentage: 60,
            religion: "Any".to_string(),
            disability: "Any".to_string(),
            deadline: "2024-06-30".to_string(),
            amount: "₹50,000".to_string(),
            apply_link: "https://example.com/apply".to_string(),
            created_at: None,
        }
    }

    fn eligible_profile() -> Profile {
        Profile {
            email: "student@example.com".to_string(),
            gender: "F".to_string(),
            education: "ug".to_string(),
            category: "General".to_string(),
            state: "Karnataka".to_string(),
            income: 250000,
            dob: "2004-05-17".to_string(),
            religion: "Hindu".to_string(),
            disability: "No".to_string(),
            course: "BSc".to_string(),
            percentage: 75,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn open_scholarship_matches_profile_under_the_ceiling() {
        // education compares case-insensitively; income 250000 <= 300000
        assert!(is_eligible(&open_scholarship(), &eligible_profile()));
    }

    #[test]
    fn income_over_the_ceiling_does_not_match() {
        let mut profile = eligible_profile();
        profile.income = 350000;
        assert!(!is_eligible(&open_scholarship(), &profile));
    }

    #[test]
    fn gender_restriction_is_case_sensitive() {
        let mut scholarship = open_scholarship();
        scholarship.gender = "F".to_string();
        assert!(is_eligible(&scholarship, &eligible_profile()));

        let mut profile = eligible_profile();
        profile.gender = "f".to_string();
        assert!(!is_eligible(&scholarship, &profile));
    }

    #[test]
    fn state_restriction_compares_case_insensitively() {
        let mut scholarship = open_scholarship();
        scholarship.state = "KARNATAKA".to_string();
        assert!(is_eligible(&scholarship, &eligible_profile()));

        scholarship.state = "Kerala".to_string();
        assert!(!is_eligible(&scholarship, &eligible_profile()));
    }

    #[test]
    fn percentage_below_the_floor_does_not_match() {
        let mut profile = eligible_profile();
        profile.percentage = 59;
        assert!(!is_eligible(&open_scholarship(), &profile));
    }

    #[test]
    fn absent_income_ceiling_admits_any_income() {
        let mut scholarship = open_scholarship();
        scholarship.max_income = None;
        let mut profile = eligible_profile();
        profile.income = 99_000_000;
        assert!(is_eligible(&scholarship, &profile));
    }

    #[quickcheck]
    fn any_gender_scholarship_ignores_profile_gender(gender: String) -> bool {
        let scholarship = open_scholarship();
        let mut profile = eligible_profile();
        profile.gender = gender;
        is_eligible(&scholarship, &profile)
    }

    #[quickcheck]
    fn income_above_the_ceiling_never_matches(income: i64, ceiling: i64) -> TestResult {
        if income <= ceiling {
            return TestResult::discard();
        }
        let mut scholarship = open_scholarship();
        scholarship.max_income = Some(ceiling);
        let mut profile = eligible_profile();
        profile.income = income;
        TestResult::from_bool(!is_eligible(&scholarship, &profile))
    }
}
