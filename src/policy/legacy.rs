//! Built-in period-based account validity policy.
//!
//! Synthesized as a one-element chain when the deprecated single-policy
//! configuration shape is used. Accounts carry an expiration stamp: set at
//! registration, checked decisively on every expiry query.

use super::{AccountValidityModule, PolicyError};
use crate::config::LegacyValidityConfig;
use crate::db::Database;
use async_trait::async_trait;
use hearth_ident::UserId;
use rand::Rng;

/// The built-in account validity module.
pub struct LegacyAccountValidity {
    db: Database,
    period_ms: i64,
    backfill_jitter_ms: i64,
}

impl LegacyAccountValidity {
    /// Build from the validated legacy configuration.
    pub fn new(db: Database, config: &LegacyValidityConfig) -> Self {
        // Config resolution guarantees a period whenever the policy is
        // enabled, which is the only way this module gets constructed.
        let period_ms = config.period.unwrap_or(0) as i64 * 1000;
        Self {
            db,
            period_ms,
            // Backfilled stamps are spread over 10% of the period so
            // accounts that predate the policy don't all expire at once.
            backfill_jitter_ms: period_ms / 10,
        }
    }
}

#[async_trait]
impl AccountValidityModule for LegacyAccountValidity {
    fn name(&self) -> &str {
        "legacy-account-validity"
    }

    async fn user_expired(&self, user_id: &UserId) -> Result<Option<bool>, PolicyError> {
        let now = chrono::Utc::now().timestamp_millis();
        let repo = self.db.account_validity();

        let expiration = match repo.expiration_ts(user_id).await? {
            Some(ts) => ts,
            None => {
                // Account predates the policy: stamp it on first check.
                let jitter = if self.backfill_jitter_ms > 0 {
                    rand::thread_rng().gen_range(0..=self.backfill_jitter_ms)
                } else {
                    0
                };
                repo.stamp_if_absent(user_id, now + self.period_ms + jitter)
                    .await?
            }
        };

        Ok(Some(expiration <= now))
    }

    async fn on_user_registration(&self, user_id: &UserId) -> Result<(), PolicyError> {
        let now = chrono::Utc::now().timestamp_millis();
        self.db
            .account_validity()
            .set_expiration_ts(user_id, now + self.period_ms)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD_SECS: u64 = 2_592_000; // 30 days

    fn legacy_config() -> LegacyValidityConfig {
        LegacyValidityConfig {
            enabled: true,
            period: Some(PERIOD_SECS),
            renew_at: None,
            renew_email_subject: "Renew your %(app)s account".to_string(),
        }
    }

    fn user(s: &str) -> UserId {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_registration_stamps_full_period() {
        let db = Database::new(":memory:").await.unwrap();
        let module = LegacyAccountValidity::new(db.clone(), &legacy_config());
        let ada = user("@ada:example.org");

        let before = chrono::Utc::now().timestamp_millis();
        module.on_user_registration(&ada).await.unwrap();
        let after = chrono::Utc::now().timestamp_millis();

        let period_ms = PERIOD_SECS as i64 * 1000;
        let ts = db
            .account_validity()
            .expiration_ts(&ada)
            .await
            .unwrap()
            .unwrap();
        assert!(ts >= before + period_ms && ts <= after + period_ms);

        assert_eq!(module.user_expired(&ada).await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_first_check_backfills_with_bounded_jitter() {
        let db = Database::new(":memory:").await.unwrap();
        let module = LegacyAccountValidity::new(db.clone(), &legacy_config());
        let bob = user("@bob:example.org");

        let before = chrono::Utc::now().timestamp_millis();
        assert_eq!(module.user_expired(&bob).await.unwrap(), Some(false));
        let after = chrono::Utc::now().timestamp_millis();

        let period_ms = PERIOD_SECS as i64 * 1000;
        let ts = db
            .account_validity()
            .expiration_ts(&bob)
            .await
            .unwrap()
            .unwrap();
        assert!(ts >= before + period_ms);
        assert!(ts <= after + period_ms + period_ms / 10);
    }

    #[tokio::test]
    async fn test_past_stamp_reads_expired() {
        let db = Database::new(":memory:").await.unwrap();
        let module = LegacyAccountValidity::new(db.clone(), &legacy_config());
        let eve = user("@eve:example.org");

        let past = chrono::Utc::now().timestamp_millis() - 1_000;
        db.account_validity()
            .set_expiration_ts(&eve, past)
            .await
            .unwrap();

        assert_eq!(module.user_expired(&eve).await.unwrap(), Some(true));
    }
}
