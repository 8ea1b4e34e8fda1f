//! Persistence of user profiles and their daily tip sets.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    models::profile::{NewUserTips, TIPS_RETENTION, UpdateProfileRequest, UserProfile, UserTips},
    services::quiz_store::StoreError,
};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError>;

    /// Creates the profile or replaces every field of the existing one.
    async fn upsert_profile(
        &self,
        user_id: i64,
        update: &UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, StoreError>;

    /// The user's stored tip sets, newest first.
    async fn recent_tips(&self, user_id: i64) -> Result<Vec<UserTips>, StoreError>;

    /// Stores a tip set and deletes all but the newest `TIPS_RETENTION` sets of that user.
    ///
    /// Returns `None` without writing when the user already has a set for `tips_day`.
    async fn record_tips(&self, new: NewUserTips) -> Result<Option<UserTips>, StoreError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT
                user_id, age, gender, marital_status, occupation, income,
                education, has_children, residence_type, location, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn upsert_profile(
        &self,
        user_id: i64,
        update: &UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (
                user_id, age, gender, marital_status, occupation, income,
                education, has_children, residence_type, location, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                marital_status = EXCLUDED.marital_status,
                occupation = EXCLUDED.occupation,
                income = EXCLUDED.income,
                education = EXCLUDED.education,
                has_children = EXCLUDED.has_children,
                residence_type = EXCLUDED.residence_type,
                location = EXCLUDED.location,
                updated_at = EXCLUDED.updated_at
            RETURNING
                user_id, age, gender, marital_status, occupation, income,
                education, has_children, residence_type, location, updated_at
            "#,
        )
        .bind(user_id)
        .bind(update.age)
        .bind(update.gender)
        .bind(update.marital_status)
        .bind(&update.occupation)
        .bind(update.income)
        .bind(update.education)
        .bind(update.has_children)
        .bind(update.residence_type)
        .bind(&update.location)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn recent_tips(&self, user_id: i64) -> Result<Vec<UserTips>, StoreError> {
        let tips = sqlx::query_as::<_, UserTips>(
            r#"
            SELECT id, user_id, tips, tips_day, created_at
            FROM user_tips
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tips)
    }

    async fn record_tips(&self, new: NewUserTips) -> Result<Option<UserTips>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, UserTips>(
            r#"
            INSERT INTO user_tips (user_id, tips, tips_day, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, tips_day) DO NOTHING
            RETURNING id, user_id, tips, tips_day, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.tips)
        .bind(new.tips_day)
        .bind(new.created_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(inserted) = inserted else {
            tx.rollback().await?;
            return Ok(None);
        };

        let pruned = sqlx::query(
            r#"
            DELETE FROM user_tips
            WHERE user_id = $1
              AND id NOT IN (
                SELECT id FROM user_tips
                WHERE user_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
              )
            "#,
        )
        .bind(new.user_id)
        .bind(TIPS_RETENTION)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if pruned > 0 {
            tracing::debug!(user_id = new.user_id, pruned, "old tip sets deleted");
        }

        Ok(Some(inserted))
    }
}

#[derive(Default)]
struct MemoryTables {
    profiles: Vec<UserProfile>,
    tips: Vec<UserTips>,
    next_tips_id: i64,
}

/// In-process store with the same guarantees as `PgProfileStore`. Used by the test suites.
#[derive(Default)]
pub struct MemoryProfileStore {
    tables: Mutex<MemoryTables>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tip sets for a user.
    pub fn tips_count(&self, user_id: i64) -> usize {
        self.lock().tips.iter().filter(|t| t.user_id == user_id).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryTables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        let tables = self.lock();
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        user_id: i64,
        update: &UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, StoreError> {
        let profile = UserProfile {
            user_id,
            age: update.age,
            gender: update.gender,
            marital_status: update.marital_status,
            occupation: update.occupation.clone(),
            income: update.income,
            education: update.education,
            has_children: update.has_children,
            residence_type: update.residence_type,
            location: update.location.clone(),
            updated_at: now,
        };

        let mut tables = self.lock();
        tables.profiles.retain(|p| p.user_id != user_id);
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn recent_tips(&self, user_id: i64) -> Result<Vec<UserTips>, StoreError> {
        let tables = self.lock();
        let mut tips: Vec<UserTips> = tables
            .tips
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tips.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tips)
    }

    async fn record_tips(&self, new: NewUserTips) -> Result<Option<UserTips>, StoreError> {
        let mut tables = self.lock();
        if tables
            .tips
            .iter()
            .any(|t| t.user_id == new.user_id && t.tips_day == new.tips_day)
        {
            return Ok(None);
        }

        tables.next_tips_id += 1;
        let inserted = UserTips {
            id: tables.next_tips_id,
            user_id: new.user_id,
            tips: new.tips,
            tips_day: new.tips_day,
            created_at: new.created_at,
        };
        tables.tips.push(inserted.clone());

        let mut keep: Vec<(DateTime<Utc>, i64)> = tables
            .tips
            .iter()
            .filter(|t| t.user_id == new.user_id)
            .map(|t| (t.created_at, t.id))
            .collect();
        keep.sort_by(|a, b| b.cmp(a));
        keep.truncate(TIPS_RETENTION as usize);
        tables
            .tips
            .retain(|t| t.user_id != new.user_id || keep.contains(&(t.created_at, t.id)));

        Ok(Some(inserted))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone};

    use super::*;

    fn tips_on(user_id: i64, day: u32) -> NewUserTips {
        NewUserTips {
            user_id,
            tips: vec![format!("tip for day {}", day)],
            tips_day: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 3, day, 8, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn keeps_only_the_newest_seven_sets() {
        let store = MemoryProfileStore::new();
        for day in 1..=9 {
            assert!(store.record_tips(tips_on(1, day)).await.unwrap().is_some());
        }
        store.record_tips(tips_on(2, 1)).await.unwrap();

        let recent = store.recent_tips(1).await.unwrap();
        assert_eq!(recent.len(), 7);
        assert_eq!(recent[0].tips, vec!["tip for day 9".to_string()]);
        assert_eq!(recent[6].tips, vec!["tip for day 3".to_string()]);
        assert_eq!(store.tips_count(2), 1);
    }

    #[tokio::test]
    async fn one_set_per_user_per_day() {
        let store = MemoryProfileStore::new();
        assert!(store.record_tips(tips_on(1, 4)).await.unwrap().is_some());
        assert!(store.record_tips(tips_on(1, 4)).await.unwrap().is_none());
        assert_eq!(store.tips_count(1), 1);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_profile() {
        let store = MemoryProfileStore::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();

        let first = UpdateProfileRequest {
            age: Some(30),
            occupation: Some("Librarian".to_string()),
            ..Default::default()
        };
        store.upsert_profile(5, &first, now).await.unwrap();

        let second = UpdateProfileRequest {
            age: Some(31),
            ..Default::default()
        };
        let later = now + Duration::days(1);
        let profile = store.upsert_profile(5, &second, later).await.unwrap();

        assert_eq!(profile.age, Some(31));
        assert_eq!(profile.occupation, None);
        assert_eq!(store.profile(5).await.unwrap(), Some(profile));
        assert_eq!(store.profile(6).await.unwrap(), None);
    }
}
