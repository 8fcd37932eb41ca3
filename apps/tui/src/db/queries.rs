use sqlx::{query, query_as, query_scalar, SqlitePool};

use crate::db::models::{
    EvaluationParams, EvaluationRecord, OccurrenceParams, OccurrenceRecord, RankingEntry,
    UserRecord,
};

/// Retrieves all occurrence records, newest first
pub async fn get_occurrences(pool: &SqlitePool) -> Result<Vec<OccurrenceRecord>, sqlx::Error> {
    let occurrences = query_as::<_, OccurrenceRecord>(
        "SELECT id, title, description, latitude, longitude, level, disability_types, \
         category, problem_type, problem_other_text, photo_url, created_at, created_by \
         FROM occurrence ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(occurrences)
}

pub async fn get_occurrence(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<OccurrenceRecord>, sqlx::Error> {
    let occurrence = query_as::<_, OccurrenceRecord>(
        "SELECT id, title, description, latitude, longitude, level, disability_types, \
         category, problem_type, problem_other_text, photo_url, created_at, created_by \
         FROM occurrence WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(occurrence)
}

/// Inserts a new occurrence, or updates every field of an existing one with
/// the same id. `created_at` is preserved on update.
pub async fn upsert_occurrence(
    pool: &SqlitePool,
    params: &OccurrenceParams,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO occurrence \
         (id, title, description, latitude, longitude, level, disability_types, \
          category, problem_type, problem_other_text, photo_url, created_at, created_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
         title = excluded.title, description = excluded.description, \
         latitude = excluded.latitude, longitude = excluded.longitude, \
         level = excluded.level, disability_types = excluded.disability_types, \
         category = excluded.category, problem_type = excluded.problem_type, \
         problem_other_text = excluded.problem_other_text, photo_url = excluded.photo_url",
    )
    .bind(&params.id)
    .bind(&params.title)
    .bind(&params.description)
    .bind(params.latitude)
    .bind(params.longitude)
    .bind(params.level)
    .bind(&params.disability_types)
    .bind(params.category)
    .bind(params.problem_type)
    .bind(&params.problem_other_text)
    .bind(&params.photo_url)
    .bind(&params.created_at)
    .bind(&params.created_by)
    .execute(pool)
    .await?;

    Ok(())
}

/// Deletes an occurrence and every evaluation attached to it
pub async fn delete_occurrence(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
    query("DELETE FROM evaluation WHERE occurrence_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    query("DELETE FROM occurrence WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Evaluations for one occurrence in submission order
pub async fn get_evaluations(
    pool: &SqlitePool,
    occurrence_id: &str,
) -> Result<Vec<EvaluationRecord>, sqlx::Error> {
    let evaluations = query_as::<_, EvaluationRecord>(
        "SELECT id, occurrence_id, user_id, rating, comment, created_at \
         FROM evaluation WHERE occurrence_id = ? ORDER BY id",
    )
    .bind(occurrence_id)
    .fetch_all(pool)
    .await?;

    Ok(evaluations)
}

pub async fn insert_evaluation(
    pool: &SqlitePool,
    params: &EvaluationParams,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO evaluation (occurrence_id, user_id, rating, comment, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&params.occurrence_id)
    .bind(&params.user_id)
    .bind(params.rating)
    .bind(&params.comment)
    .bind(&params.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Most-evaluated occurrences: ordered by evaluation count, ties broken by
/// average rating, both descending.
pub async fn ranking(pool: &SqlitePool, limit: i64) -> Result<Vec<RankingEntry>, sqlx::Error> {
    let entries = query_as::<_, RankingEntry>(
        "SELECT o.id AS occurrence_id, o.title, o.level, \
         COUNT(e.id) AS evaluation_count, AVG(e.rating) AS average_rating \
         FROM occurrence o JOIN evaluation e ON e.occurrence_id = o.id \
         GROUP BY o.id \
         ORDER BY evaluation_count DESC, average_rating DESC \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn count_occurrences(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM occurrence")
        .fetch_one(pool)
        .await
}

pub async fn count_evaluations(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM evaluation")
        .fetch_one(pool)
        .await
}

pub async fn count_occurrences_by_level(
    pool: &SqlitePool,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows =
        query_as::<_, (String, i64)>("SELECT level, COUNT(*) FROM occurrence GROUP BY level")
            .fetch_all(pool)
            .await?;

    Ok(rows)
}

pub async fn count_occurrences_by_category(
    pool: &SqlitePool,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = query_as::<_, (String, i64)>(
        "SELECT category, COUNT(*) FROM occurrence GROUP BY category",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn recent_occurrences(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<OccurrenceRecord>, sqlx::Error> {
    let occurrences = query_as::<_, OccurrenceRecord>(
        "SELECT id, title, description, latitude, longitude, level, disability_types, \
         category, problem_type, problem_other_text, photo_url, created_at, created_by \
         FROM occurrence ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(occurrences)
}

pub async fn get_user(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let user = query_as::<_, UserRecord>(
        "SELECT username, password, name FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn insert_user(pool: &SqlitePool, user: &UserRecord) -> Result<(), sqlx::Error> {
    query("INSERT INTO users (username, password, name) VALUES (?, ?, ?)")
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.name)
        .execute(pool)
        .await?;

    Ok(())
}

const SESSION_USER_KEY: &str = "current_user";

pub async fn set_session_user(pool: &SqlitePool, username: &str) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO session (key, value) VALUES (?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(SESSION_USER_KEY)
    .bind(username)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_session_user(pool: &SqlitePool) -> Result<Option<String>, sqlx::Error> {
    query_scalar("SELECT value FROM session WHERE key = ?")
        .bind(SESSION_USER_KEY)
        .fetch_optional(pool)
        .await
}

pub async fn clear_session_user(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query("DELETE FROM session WHERE key = ?")
        .bind(SESSION_USER_KEY)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_database_pool_with_url, setup_database};
    use crate::domain::{AccessibilityLevel, LocationCategory, ProblemType};

    async fn memory_pool() -> SqlitePool {
        create_database_pool_with_url("sqlite::memory:")
            .await
            .unwrap()
    }

    fn occurrence(id: &str, title: &str) -> OccurrenceParams {
        OccurrenceParams {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            latitude: -23.55,
            longitude: -46.63,
            level: AccessibilityLevel::Inaccessible,
            disability_types: "motor".to_string(),
            category: LocationCategory::Sidewalks,
            problem_type: ProblemType::Pothole,
            problem_other_text: None,
            photo_url: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            created_by: None,
        }
    }

    fn evaluation(occurrence_id: &str, rating: i64) -> EvaluationParams {
        EvaluationParams {
            occurrence_id: occurrence_id.to_string(),
            user_id: "user:ana".to_string(),
            rating,
            comment: None,
            created_at: "2024-01-02T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn fresh_store_is_seeded_with_samples() {
        let pool = memory_pool().await;
        assert_eq!(count_occurrences(&pool).await.unwrap(), 3);

        // Re-running setup must not duplicate the seed
        setup_database(&pool).await.unwrap();
        assert_eq!(count_occurrences(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn upsert_inserts_then_updates_in_place() {
        let pool = memory_pool().await;
        let mut params = occurrence("abc", "Buraco na calçada");
        upsert_occurrence(&pool, &params).await.unwrap();

        params.title = "Buraco grande na calçada".to_string();
        params.level = AccessibilityLevel::Partial;
        upsert_occurrence(&pool, &params).await.unwrap();

        let stored = get_occurrence(&pool, "abc").await.unwrap().unwrap();
        assert_eq!(stored.title, "Buraco grande na calçada");
        assert_eq!(stored.level, AccessibilityLevel::Partial);
        assert_eq!(stored.disability_types(), vec![crate::domain::DisabilityType::Motor]);
        assert_eq!(count_occurrences(&pool).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn delete_removes_occurrence_and_its_evaluations() {
        let pool = memory_pool().await;
        upsert_occurrence(&pool, &occurrence("abc", "Rampa bloqueada"))
            .await
            .unwrap();
        insert_evaluation(&pool, &evaluation("abc", 4)).await.unwrap();
        insert_evaluation(&pool, &evaluation("abc", 2)).await.unwrap();
        assert_eq!(count_evaluations(&pool).await.unwrap(), 2);

        delete_occurrence(&pool, "abc").await.unwrap();
        assert!(get_occurrence(&pool, "abc").await.unwrap().is_none());
        assert_eq!(count_evaluations(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn evaluations_come_back_in_submission_order() {
        let pool = memory_pool().await;
        upsert_occurrence(&pool, &occurrence("abc", "Degrau alto"))
            .await
            .unwrap();
        for rating in [5, 1, 3] {
            insert_evaluation(&pool, &evaluation("abc", rating)).await.unwrap();
        }

        let stored = get_evaluations(&pool, "abc").await.unwrap();
        let ratings: Vec<i64> = stored.iter().map(|e| e.rating).collect();
        assert_eq!(ratings, vec![5, 1, 3]);
    }

    #[tokio::test]
    async fn ranking_orders_by_count_then_average() {
        let pool = memory_pool().await;
        upsert_occurrence(&pool, &occurrence("a", "A")).await.unwrap();
        upsert_occurrence(&pool, &occurrence("b", "B")).await.unwrap();
        upsert_occurrence(&pool, &occurrence("c", "C")).await.unwrap();

        // a: 2 evaluations avg 3.0; b: 2 evaluations avg 5.0; c: 1 evaluation
        for (id, rating) in [("a", 2), ("a", 4), ("b", 5), ("b", 5), ("c", 5)] {
            insert_evaluation(&pool, &evaluation(id, rating)).await.unwrap();
        }

        let entries = ranking(&pool, 20).await.unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.occurrence_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!((entries[0].average_rating - 5.0).abs() < 1e-9);
        assert_eq!(entries[1].evaluation_count, 2);

        // Unevaluated occurrences never appear
        assert!(!ids.contains(&"1"));
    }

    #[tokio::test]
    async fn session_round_trip() {
        let pool = memory_pool().await;
        assert!(get_session_user(&pool).await.unwrap().is_none());

        set_session_user(&pool, "user:ana").await.unwrap();
        assert_eq!(
            get_session_user(&pool).await.unwrap().as_deref(),
            Some("user:ana")
        );

        // Signing in as someone else replaces the session
        set_session_user(&pool, "user:bia").await.unwrap();
        assert_eq!(
            get_session_user(&pool).await.unwrap().as_deref(),
            Some("user:bia")
        );

        clear_session_user(&pool).await.unwrap();
        assert!(get_session_user(&pool).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn users_are_stored_and_looked_up_by_username() {
        let pool = memory_pool().await;
        let user = UserRecord {
            username: "ana".to_string(),
            password: "secret1".to_string(),
            name: "Ana".to_string(),
        };
        insert_user(&pool, &user).await.unwrap();

        let stored = get_user(&pool, "ana").await.unwrap().unwrap();
        assert_eq!(stored.name, "Ana");
        assert!(get_user(&pool, "bia").await.unwrap().is_none());

        // Duplicate usernames are rejected by the primary key
        assert!(insert_user(&pool, &user).await.is_err());
    }
}
