use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::core::config::NotificationsConfig;
use crate::core::{AppError, EmailService, Mailer};
use crate::db::store::{DocumentStore, MySqlDocStore};
use crate::db::{interactions, profiles, scholarships, users};
use crate::matching::aggregator::{find_matches, MatchFilters};
use crate::matching::deadline::{classify, days_until};
use crate::matching::eligibility::is_eligible;
use crate::models::interactions::InteractionKind;
use crate::models::scholarships::{MatchedScholarship, Scholarship};

/// Counters reported by one pass of the main sweep.
#[derive(Debug, Default, Serialize)]
pub struct SweepOutcome {
    pub users_processed: u32,
    pub new_match_emails: u32,
    pub closing_soon_emails: u32,
    pub failed_sends: u32,
}

/// Background job that runs every notification pass on a fixed interval.
pub async fn start_notification_scheduler(
    store: MySqlDocStore,
    email_service: EmailService,
    notifications: NotificationsConfig,
) {
    info!("Starting notification sweep background job");

    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(notifications.sweep_interval_hours * 3600));

        loop {
            interval.tick().await;

            let today = notifications.today();
            let now = Utc::now();

            match run_notification_sweep(&store, &email_service, &notifications, today).await {
                Ok(outcome) => info!("Notification sweep finished: {:?}", outcome),
                Err(e) => error!("Notification sweep failed: {}", e),
            }
            if let Err(e) = run_deadline_reminders(&store, &email_service, &notifications, today).await
            {
                error!("Deadline reminder pass failed: {}", e);
            }
            if let Err(e) =
                run_new_scholarship_announcements(&store, &email_service, &notifications, now).await
            {
                error!("New scholarship announcement pass failed: {}", e);
            }
            if let Err(e) =
                run_saved_deadline_alerts(&store, &email_service, &notifications, today).await
            {
                error!("Saved deadline alert pass failed: {}", e);
            }
        }
    });
}

/// Main sweep: for every registered user with a profile, one email listing
/// matches not yet saved or applied, and one listing tracked scholarships
/// closing inside the window. There is no notified-ledger; each sweep
/// recomputes from scratch, so a scholarship still inside the window is
/// announced again on the next sweep.
pub async fn run_notification_sweep<S, M>(
    store: &S,
    mailer: &M,
    notifications: &NotificationsConfig,
    today: NaiveDate,
) -> Result<SweepOutcome, AppError>
where
    S: DocumentStore,
    M: Mailer,
{
    // one scholarship fetch serves every user in the sweep
    let all_scholarships = scholarships::list_scholarships(store).await?;
    let accounts = users::list_users(store).await?;

    let mut outcome = SweepOutcome::default();

    for account in &accounts {
        let Some(profile) = profiles::find_profile(store, &account.email).await? else {
            continue;
        };

        outcome.users_processed += 1;

        let tracked = interactions::tracked_ids(store, &account.email).await?;

        let new_matches = find_matches(
            &profile,
            &all_scholarships,
            &MatchFilters::default(),
            &tracked,
            today,
            notifications.closing_window_days,
        );
        if !new_matches.is_empty() {
            let body = new_matches_body(&new_matches);
            match mailer.send_email(&account.email, "New Scholarships Available", &body) {
                Ok(()) => outcome.new_match_emails += 1,
                Err(e) => {
                    error!("Failed to notify {} about new matches: {}", account.email, e);
                    outcome.failed_sends += 1;
                }
            }
        }

        let closing = closing_soon_tracked(
            &all_scholarships,
            &tracked,
            today,
            notifications.closing_window_days,
        );
        if !closing.is_empty() {
            let body = closing_soon_body(&closing);
            match mailer.send_email(&account.email, "Scholarships Closing Soon", &body) {
                Ok(()) => outcome.closing_soon_emails += 1,
                Err(e) => {
                    error!(
                        "Failed to notify {} about closing scholarships: {}",
                        account.email, e
                    );
                    outcome.failed_sends += 1;
                }
            }
        }
    }

    Ok(outcome)
}

/// Tiered reminders: scholarships whose deadline is exactly one of the
/// configured day counts away are announced to every eligible profiled user,
/// one message per user and scholarship.
pub async fn run_deadline_reminders<S, M>(
    store: &S,
    mailer: &M,
    notifications: &NotificationsConfig,
    today: NaiveDate,
) -> Result<u32, AppError>
where
    S: DocumentStore,
    M: Mailer,
{
    let all_scholarships = scholarships::list_scholarships(store).await?;
    let all_profiles = profiles::list_profiles(store).await?;
    let account_emails: HashSet<String> = users::list_users(store)
        .await?
        .into_iter()
        .map(|account| account.email)
        .collect();

    let mut sent = 0;

    for scholarship in &all_scholarships {
        let Some(days_left) = days_until(&scholarship.deadline, today) else {
            continue;
        };
        if !notifications.reminder_days.contains(&days_left) {
            continue;
        }

        for profile in &all_profiles {
            if !account_emails.contains(&profile.email) || !is_eligible(scholarship, profile) {
                continue;
            }

            let subject = format!("Scholarship Closing Soon: {}", scholarship.name);
            let body = reminder_body(scholarship, days_left);
            match mailer.send_email(&profile.email, &subject, &body) {
                Ok(()) => sent += 1,
                Err(e) => error!(
                    "Failed to remind {} about {}: {}",
                    profile.email, scholarship.name, e
                ),
            }
        }
    }

    Ok(sent)
}

/// Announces scholarships created inside the lookback window to every
/// eligible profiled user, one message per user and scholarship.
pub async fn run_new_scholarship_announcements<S, M>(
    store: &S,
    mailer: &M,
    notifications: &NotificationsConfig,
    now: DateTime<Utc>,
) -> Result<u32, AppError>
where
    S: DocumentStore,
    M: Mailer,
{
    let cutoff = now - chrono::Duration::hours(notifications.new_scholarship_lookback_hours);
    let recent: Vec<Scholarship> = scholarships::list_scholarships(store)
        .await?
        .into_iter()
        .filter(|s| s.created_at.map_or(false, |created| created > cutoff))
        .collect();

    if recent.is_empty() {
        return Ok(0);
    }

    let all_profiles = profiles::list_profiles(store).await?;
    let mut sent = 0;

    for scholarship in &recent {
        for profile in &all_profiles {
            if !is_eligible(scholarship, profile) {
                continue;
            }

            let subject = format!("New Scholarship: {}", scholarship.name);
            let body = announcement_body(scholarship);
            match mailer.send_email(&profile.email, &subject, &body) {
                Ok(()) => sent += 1,
                Err(e) => error!(
                    "Failed to announce {} to {}: {}",
                    scholarship.name, profile.email, e
                ),
            }
        }
    }

    Ok(sent)
}

/// Secondary saved-only path with its own (narrower) window: one email per
/// user listing saved scholarships about to close.
pub async fn run_saved_deadline_alerts<S, M>(
    store: &S,
    mailer: &M,
    notifications: &NotificationsConfig,
    today: NaiveDate,
) -> Result<u32, AppError>
where
    S: DocumentStore,
    M: Mailer,
{
    let all_scholarships = scholarships::list_scholarships(store).await?;
    let accounts = users::list_users(store).await?;

    let mut sent = 0;

    for account in &accounts {
        let saved = interactions::list_ids(store, &account.email, InteractionKind::Saved).await?;
        let soon = closing_soon_tracked(
            &all_scholarships,
            &saved,
            today,
            notifications.saved_alert_window_days,
        );
        if soon.is_empty() {
            continue;
        }

        let body = closing_soon_body(&soon);
        match mailer.send_email(&account.email, "Scholarships Closing Soon", &body) {
            Ok(()) => sent += 1,
            Err(e) => error!(
                "Failed to alert {} about saved scholarships: {}",
                account.email, e
            ),
        }
    }

    Ok(sent)
}

/// Tracked scholarships whose deadline falls inside the window.
pub fn closing_soon_tracked<'a>(
    scholarships: &'a [Scholarship],
    tracked: &HashSet<String>,
    today: NaiveDate,
    window_days: i64,
) -> Vec<&'a Scholarship> {
    scholarships
        .iter()
        .filter(|s| tracked.contains(&s.id))
        .filter(|s| classify(&s.deadline, today, window_days).is_closing_soon)
        .collect()
}

fn new_matches_body(matches: &[MatchedScholarship]) -> String {
    let mut body = String::from("<p>New scholarships matching your profile:</p><ul>");
    for entry in matches {
        body.push_str(&format!(
            "<li><strong>{}</strong> | Amount: {} | Deadline: {} | <a href=\"{}\">Apply Now</a></li>",
            entry.scholarship.name,
            entry.scholarship.amount,
            entry.scholarship.deadline,
            entry.scholarship.apply_link
        ));
    }
    body.push_str("</ul><p>- ScholarMatch</p>");
    body
}

fn closing_soon_body(closing: &[&Scholarship]) -> String {
    let mut body = String::from("<p>The following scholarships are closing soon:</p><ul>");
    for scholarship in closing {
        body.push_str(&format!(
            "<li><strong>{}</strong> | Deadline: {} | <a href=\"{}\">Apply Now</a></li>",
            scholarship.name, scholarship.deadline, scholarship.apply_link
        ));
    }
    body.push_str("</ul><p>- ScholarMatch</p>");
    body
}

fn reminder_body(scholarship: &Scholarship, days_left: i64) -> String {
    format!(
        "<p>The scholarship <strong>{}</strong> is closing in <strong>{} day(s)</strong>.</p>\
         <p><strong>Amount:</strong> {}</p>\
         <p><strong>Deadline:</strong> {}</p>\
         <p><a href=\"{}\">Apply Now</a></p>",
        scholarship.name,
        days_left,
        scholarship.amount,
        scholarship.deadline,
        scholarship.apply_link
    )
}

fn announcement_body(scholarship: &Scholarship) -> String {
    format!(
        "<p>A new scholarship <strong>{}</strong> matches your profile!</p>\
         <p><strong>Amount:</strong> {}</p>\
         <p><strong>Deadline:</strong> {}</p>\
         <p><a href=\"{}\">Apply Now</a></p>\
         <p>- ScholarMatch</p>",
        scholarship.name,
        scholarship.amount,
        scholarship.deadline,
        scholarship.apply_link
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryStore;
    use chrono::Duration as ChronoDuration;
    use claim::assert_ok;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
        fail_for: Option<String>,
    }

    impl RecordingMailer {
        fn failing_for(email: &str) -> Self {
            RecordingMailer {
                sent: Mutex::new(Vec::new()),
                fail_for: Some(email.to_string()),
            }
        }

        fn sent(&self) -> Vec<(String, String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Mailer for RecordingMailer {
        fn send_email(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
            if self.fail_for.as_deref() == Some(to_email) {
                return Err(AppError::email_error("smtp unavailable"));
            }
            self.sent.lock().unwrap().push((
                to_email.to_string(),
                subject.to_string(),
                html_body.to_string(),
            ));
            Ok(())
        }
    }

    fn config() -> NotificationsConfig {
        NotificationsConfig {
            sweep_interval_hours: 24,
            closing_window_days: 7,
            reminder_days: vec![10, 5, 1],
            saved_alert_window_days: 3,
            new_scholarship_lookback_hours: 24,
            timezone: "Asia/Kolkata".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    async fn seed_user(store: &MemoryStore, email: &str) {
        store
            .set(
                "users",
                email,
                json!({
                    "email": email,
                    "password_hash": "unused",
                    "role": "user",
                    "created_at": "2023-11-01T00:00:00Z",
                }),
            )
            .await
            .unwrap();
    }

    async fn seed_profile(store: &MemoryStore, email: &str) {
        store
            .set(
                "profiles",
                email,
                json!({
                    "email": email,
                    "gender": "F",
                    "education": "UG",
                    "category": "General",
                    "income": 250000,
                    "state": "Karnataka",
                    "dob": "2004-05-17",
                    "religion": "Hindu",
                    "disability": "No",
                    "course": "BSc",
                    "percentage": 75,
                    "submitted_at": "2023-12-01T00:00:00Z",
                }),
            )
            .await
            .unwrap();
    }

    async fn seed_scholarship(store: &MemoryStore, id: &str, name: &str, deadline: &str) {
        store
            .set(
                "scholarships",
                id,
                json!({
                    "id": id,
                    "name": name,
                    "education": "UG",
                    "deadline": deadline,
                    "amount": "₹50,000",
                    "apply_link": "https://example.com/apply",
                }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sweep_sends_new_match_and_closing_soon_emails() {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::default();

        seed_user(&store, "a@example.com").await;
        seed_profile(&store, "a@example.com").await;
        seed_scholarship(&store, "s-new", "Fresh Grant", "2024-03-01").await;
        seed_scholarship(&store, "s-tracked", "Tracked Grant", "2024-01-04").await;
        // ineligible for a UG profile, must appear nowhere
        store
            .set(
                "scholarships",
                "s-pg",
                json!({
                    "id": "s-pg",
                    "name": "PG Grant",
                    "education": "PG",
                    "deadline": "2024-01-02",
                }),
            )
            .await
            .unwrap();

        assert_ok!(
            interactions::mark(
                &store,
                "a@example.com",
                "s-tracked",
                InteractionKind::Saved,
                Utc::now()
            )
            .await
        );

        let outcome =
            assert_ok!(run_notification_sweep(&store, &mailer, &config(), today()).await);

        assert_eq!(outcome.users_processed, 1);
        assert_eq!(outcome.new_match_emails, 1);
        assert_eq!(outcome.closing_soon_emails, 1);
        assert_eq!(outcome.failed_sends, 0);

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);

        let (to, subject, body) = &sent[0];
        assert_eq!(to, "a@example.com");
        assert_eq!(subject, "New Scholarships Available");
        assert!(body.contains("Fresh Grant"));
        // tracked and ineligible scholarships are not "new matches"
        assert!(!body.contains("Tracked Grant"));
        assert!(!body.contains("PG Grant"));

        let (_, subject, body) = &sent[1];
        assert_eq!(subject, "Scholarships Closing Soon");
        assert!(body.contains("Tracked Grant"));
        assert!(!body.contains("Fresh Grant"));
    }

    #[tokio::test]
    async fn sweep_skips_users_without_a_profile() {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::default();

        seed_user(&store, "noprofile@example.com").await;
        seed_scholarship(&store, "s-1", "Open Grant", "2024-02-01").await;

        let outcome =
            assert_ok!(run_notification_sweep(&store, &mailer, &config(), today()).await);

        assert_eq!(outcome.users_processed, 0);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_send_is_counted_and_does_not_abort_the_sweep() {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::failing_for("a@example.com");

        for email in ["a@example.com", "b@example.com"] {
            seed_user(&store, email).await;
            seed_profile(&store, email).await;
        }
        seed_scholarship(&store, "s-1", "Open Grant", "2024-02-01").await;

        let outcome =
            assert_ok!(run_notification_sweep(&store, &mailer, &config(), today()).await);

        assert_eq!(outcome.users_processed, 2);
        assert_eq!(outcome.failed_sends, 1);
        assert_eq!(outcome.new_match_emails, 1);

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "b@example.com");
    }

    #[tokio::test]
    async fn reminders_fire_only_on_tier_days() {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::default();

        seed_user(&store, "a@example.com").await;
        seed_profile(&store, "a@example.com").await;
        seed_scholarship(&store, "s-five", "Five Days Out", "2024-01-06").await;
        seed_scholarship(&store, "s-four", "Four Days Out", "2024-01-05").await;

        let sent = assert_ok!(run_deadline_reminders(&store, &mailer, &config(), today()).await);

        assert_eq!(sent, 1);
        let messages = mailer.sent();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, "Scholarship Closing Soon: Five Days Out");
        assert!(messages[0].2.contains("5 day(s)"));
    }

    #[tokio::test]
    async fn reminders_skip_profiles_without_an_account() {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::default();

        // profile exists but the account was never registered
        seed_profile(&store, "ghost@example.com").await;
        seed_scholarship(&store, "s-one", "Last Call", "2024-01-02").await;

        let sent = assert_ok!(run_deadline_reminders(&store, &mailer, &config(), today()).await);

        assert_eq!(sent, 0);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn announcements_cover_only_the_lookback_window() {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::default();
        let now = Utc::now();

        seed_profile(&store, "a@example.com").await;

        store
            .set(
                "scholarships",
                "s-recent",
                json!({
                    "id": "s-recent",
                    "name": "Just Added",
                    "education": "UG",
                    "deadline": "2024-06-30",
                    "created_at": (now - ChronoDuration::hours(2)).to_rfc3339(),
                }),
            )
            .await
            .unwrap();
        store
            .set(
                "scholarships",
                "s-old",
                json!({
                    "id": "s-old",
                    "name": "Old News",
                    "education": "UG",
                    "deadline": "2024-06-30",
                    "created_at": (now - ChronoDuration::hours(48)).to_rfc3339(),
                }),
            )
            .await
            .unwrap();

        let sent =
            assert_ok!(run_new_scholarship_announcements(&store, &mailer, &config(), now).await);

        assert_eq!(sent, 1);
        let messages = mailer.sent();
        assert_eq!(messages[0].1, "New Scholarship: Just Added");
    }

    #[tokio::test]
    async fn saved_alerts_use_their_own_narrow_window() {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::default();

        seed_user(&store, "a@example.com").await;
        seed_profile(&store, "a@example.com").await;
        // inside the 3-day saved window
        seed_scholarship(&store, "s-close", "Very Close", "2024-01-03").await;
        // inside the 7-day sweep window but outside the saved window
        seed_scholarship(&store, "s-week", "Next Week", "2024-01-07").await;

        for id in ["s-close", "s-week"] {
            assert_ok!(
                interactions::mark(
                    &store,
                    "a@example.com",
                    id,
                    InteractionKind::Saved,
                    Utc::now()
                )
                .await
            );
        }

        let sent =
            assert_ok!(run_saved_deadline_alerts(&store, &mailer, &config(), today()).await);

        assert_eq!(sent, 1);
        let messages = mailer.sent();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].2.contains("Very Close"));
        assert!(!messages[0].2.contains("Next Week"));
    }
}
