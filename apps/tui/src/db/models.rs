use sqlx::FromRow;

use crate::domain::{
    parse_disability_list, AccessibilityLevel, DisabilityType, LocationCategory, ProblemType,
};

/// An occurrence record as stored in the database. `disability_types` keeps
/// the comma-joined storage form; use [`OccurrenceRecord::disability_types`]
/// for the decoded list.
#[derive(Debug, FromRow, Clone)]
pub struct OccurrenceRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub level: AccessibilityLevel,
    pub disability_types: String,
    pub category: LocationCategory,
    pub problem_type: ProblemType,
    pub problem_other_text: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub created_by: Option<String>,
}

impl OccurrenceRecord {
    pub fn disability_types(&self) -> Vec<DisabilityType> {
        parse_disability_list(&self.disability_types)
    }

    /// Display name for the problem, substituting the free-text description
    /// when the reported type is `Other`.
    pub fn problem_label(&self) -> String {
        if self.problem_type == ProblemType::Other {
            if let Some(text) = &self.problem_other_text {
                if !text.trim().is_empty() {
                    return text.clone();
                }
            }
        }
        self.problem_type.label().to_string()
    }
}

/// A user evaluation of an occurrence. Ratings are always within 1..=5.
#[derive(Debug, FromRow, Clone)]
pub struct EvaluationRecord {
    pub id: i64,
    pub occurrence_id: String,
    pub user_id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

/// Parameters for creating or updating an occurrence
#[derive(Debug, Clone)]
pub struct OccurrenceParams {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub level: AccessibilityLevel,
    pub disability_types: String,
    pub category: LocationCategory,
    pub problem_type: ProblemType,
    pub problem_other_text: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub created_by: Option<String>,
}

/// Parameters for recording a new evaluation
#[derive(Debug, Clone)]
pub struct EvaluationParams {
    pub occurrence_id: String,
    pub user_id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

/// Aggregated evaluation standing for one occurrence, used by the ranking
/// screen. Ordered by evaluation count, then by average rating.
#[derive(Debug, FromRow, Clone)]
pub struct RankingEntry {
    pub occurrence_id: String,
    pub title: String,
    pub level: AccessibilityLevel,
    pub evaluation_count: i64,
    pub average_rating: f64,
}

/// Represents a registered user. Credentials are stored in plain text; this
/// is a local single-machine store, not an identity system.
#[derive(Debug, FromRow, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub name: String,
}
