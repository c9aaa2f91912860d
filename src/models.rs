// models.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    #[sqlx(rename = "question_text")]
    pub text: String,
    #[sqlx(rename = "pub_date")]
    pub publication_time: DateTime<Utc>,
}

impl Question {
    /// A question is visible to voters once its publication time has passed.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.publication_time <= now
    }

    /// Published within the last day. Display only, never used to gate access.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.publication_time && self.publication_time <= now
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    #[sqlx(rename = "choice_text")]
    pub text: String,
    #[sqlx(rename = "votes")]
    pub vote_count: i32,
}

impl Choice {
    pub fn votes_label(&self) -> String {
        match self.vote_count {
            1 => "1 vote".to_string(),
            n => format!("{n} votes"),
        }
    }
}

/// Submitted vote form. `choice` is absent when the voter picked nothing.
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}
