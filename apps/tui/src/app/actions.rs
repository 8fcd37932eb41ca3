use crate::app::state::CurrentUser;
use crate::config;
use crate::db::create_database_pool;
use crate::db::models::{
    EvaluationParams, EvaluationRecord, OccurrenceParams, OccurrenceRecord, RankingEntry,
    UserRecord,
};
use crate::db::queries;
use crate::net::Providers;
use chrono::Local;
use color_eyre::Result;
use sqlx::SqlitePool;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Outcome of a login or signup attempt. Failures are user errors, not
/// system errors, and carry the message to show on the form.
#[derive(Debug)]
pub enum AuthOutcome {
    Success(CurrentUser),
    Failure(&'static str),
}

/// Gateway to the database and the network providers. Owned by [`App`] so
/// input handlers stay synchronous and the event loop drives the async work.
///
/// [`App`]: crate::app::state::App
#[derive(Debug)]
pub struct AppActions {
    pub db_pool: Option<SqlitePool>,
    pub providers: Providers,
}

impl AppActions {
    pub fn new() -> Self {
        Self {
            db_pool: None,
            // Offline until initialize() reads the real configuration
            providers: Providers::new(None, true),
        }
    }

    pub async fn initialize(&mut self) -> Result<()> {
        self.providers = Providers::new(config::mapbox_token(), config::offline_mode());
        self.db_pool = Some(create_database_pool().await?);

        Ok(())
    }

    pub async fn fetch_occurrences(&self) -> Result<Vec<OccurrenceRecord>> {
        let pool = self.pool()?;
        queries::get_occurrences(pool).await.map_err(Into::into)
    }

    pub async fn save_occurrence(&self, params: &OccurrenceParams) -> Result<()> {
        let pool = self.pool()?;
        queries::upsert_occurrence(pool, params)
            .await
            .map_err(Into::into)
    }

    pub async fn delete_occurrence(&self, id: &str) -> Result<()> {
        let pool = self.pool()?;
        queries::delete_occurrence(pool, id)
            .await
            .map_err(Into::into)
    }

    pub async fn fetch_evaluations(&self, occurrence_id: &str) -> Result<Vec<EvaluationRecord>> {
        let pool = self.pool()?;
        queries::get_evaluations(pool, occurrence_id)
            .await
            .map_err(Into::into)
    }

    /// Records an evaluation. Ratings outside 1..=5 are clamped, never
    /// rejected.
    pub async fn add_evaluation(
        &self,
        occurrence_id: &str,
        user_id: &str,
        rating: i64,
        comment: Option<String>,
    ) -> Result<()> {
        let pool = self.pool()?;
        let params = EvaluationParams {
            occurrence_id: occurrence_id.to_string(),
            user_id: user_id.to_string(),
            rating: rating.clamp(1, 5),
            comment,
            created_at: Local::now().to_rfc3339(),
        };
        queries::insert_evaluation(pool, &params)
            .await
            .map_err(Into::into)
    }

    pub async fn ranking(&self, limit: i64) -> Result<Vec<RankingEntry>> {
        let pool = self.pool()?;
        queries::ranking(pool, limit).await.map_err(Into::into)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        let pool = self.pool()?;
        let key = username_key(username);
        if key.is_empty() {
            return Ok(AuthOutcome::Failure("Enter a username"));
        }

        let Some(user) = queries::get_user(pool, &key).await? else {
            return Ok(AuthOutcome::Failure("Unknown username"));
        };
        if user.password != password {
            return Ok(AuthOutcome::Failure("Wrong password"));
        }

        queries::set_session_user(pool, &key).await?;
        Ok(AuthOutcome::Success(current_user(&user)))
    }

    pub async fn signup(
        &self,
        name: &str,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<AuthOutcome> {
        let pool = self.pool()?;
        let key = username_key(username);
        if name.trim().is_empty() {
            return Ok(AuthOutcome::Failure("Enter your name"));
        }
        if key.is_empty() {
            return Ok(AuthOutcome::Failure("Enter a username"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Ok(AuthOutcome::Failure("Password needs at least 6 characters"));
        }
        if password != confirm {
            return Ok(AuthOutcome::Failure("Passwords do not match"));
        }
        if queries::get_user(pool, &key).await?.is_some() {
            return Ok(AuthOutcome::Failure("Username already taken"));
        }

        let user = UserRecord {
            username: key.clone(),
            password: password.to_string(),
            name: name.trim().to_string(),
        };
        queries::insert_user(pool, &user).await?;
        queries::set_session_user(pool, &key).await?;
        Ok(AuthOutcome::Success(current_user(&user)))
    }

    pub async fn logout(&self) -> Result<()> {
        let pool = self.pool()?;
        queries::clear_session_user(pool).await.map_err(Into::into)
    }

    /// Restores the signed-in user from the stored session, if any.
    pub async fn restore_session(&self) -> Result<Option<CurrentUser>> {
        let pool = self.pool()?;
        let Some(key) = queries::get_session_user(pool).await? else {
            return Ok(None);
        };
        let user = queries::get_user(pool, &key).await?;
        Ok(user.as_ref().map(current_user))
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database not initialized"))
    }
}

impl Default for AppActions {
    fn default() -> Self {
        Self::new()
    }
}

/// Usernames are case-insensitive: the storage key is the trimmed,
/// lowercased form.
fn username_key(username: &str) -> String {
    username.trim().to_lowercase()
}

fn current_user(user: &UserRecord) -> CurrentUser {
    CurrentUser {
        id: format!("user:{}", user.username),
        username: user.username.clone(),
        name: user.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_database_pool_with_url;

    async fn actions() -> AppActions {
        let pool = create_database_pool_with_url("sqlite::memory:")
            .await
            .unwrap();
        AppActions {
            db_pool: Some(pool),
            providers: Providers::new(None, true),
        }
    }

    #[tokio::test]
    async fn signup_then_login_round_trip() {
        let actions = actions().await;

        let outcome = actions
            .signup("Ana", "  Ana.Silva ", "secret1", "secret1")
            .await
            .unwrap();
        let AuthOutcome::Success(user) = outcome else {
            panic!("signup should succeed");
        };
        assert_eq!(user.username, "ana.silva");
        assert_eq!(user.id, "user:ana.silva");

        // Login is case-insensitive on the username
        let outcome = actions.login("ANA.SILVA", "secret1").await.unwrap();
        assert!(matches!(outcome, AuthOutcome::Success(_)));

        let outcome = actions.login("ana.silva", "wrong").await.unwrap();
        assert!(matches!(outcome, AuthOutcome::Failure("Wrong password")));
    }

    #[tokio::test]
    async fn signup_enforces_password_rules_and_uniqueness() {
        let actions = actions().await;

        let outcome = actions.signup("Ana", "ana", "short", "short").await.unwrap();
        assert!(matches!(outcome, AuthOutcome::Failure(_)));

        let outcome = actions
            .signup("Ana", "ana", "secret1", "secret2")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Failure("Passwords do not match")
        ));

        let outcome = actions
            .signup("Ana", "ana", "secret1", "secret1")
            .await
            .unwrap();
        assert!(matches!(outcome, AuthOutcome::Success(_)));

        let outcome = actions
            .signup("Outra Ana", "Ana", "secret2", "secret2")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Failure("Username already taken")
        ));
    }

    #[tokio::test]
    async fn session_survives_restart_and_logout_clears_it() {
        let actions = actions().await;
        actions
            .signup("Ana", "ana", "secret1", "secret1")
            .await
            .unwrap();

        let restored = actions.restore_session().await.unwrap().unwrap();
        assert_eq!(restored.id, "user:ana");

        actions.logout().await.unwrap();
        assert!(actions.restore_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn evaluation_ratings_are_clamped_to_range() {
        let actions = actions().await;
        // Seeded occurrence "1" exists
        actions.add_evaluation("1", "user:ana", 9, None).await.unwrap();
        actions.add_evaluation("1", "user:ana", -3, None).await.unwrap();

        let evaluations = actions.fetch_evaluations("1").await.unwrap();
        let ratings: Vec<i64> = evaluations.iter().map(|e| e.rating).collect();
        assert_eq!(ratings, vec![5, 1]);
    }
}
