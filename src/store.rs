// store.rs
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Choice, Question};

/// Persistence seam for questions and choices.
#[async_trait]
pub trait PollStore: Send + Sync {
    /// Published questions, newest first, at most `limit` of them.
    async fn find_published(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Question>>;

    /// Looks a question up regardless of its publication time.
    async fn find_by_id(&self, id: i64) -> Result<Option<Question>>;

    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>>;

    /// Adds one vote to `choice_id` if it belongs to `question_id`.
    /// Returns `false` when no such choice exists.
    async fn increment_vote(&self, question_id: i64, choice_id: i64) -> Result<bool>;

    async fn create_question(&self, text: &str, publication_time: DateTime<Utc>) -> Result<Question>;

    async fn create_choice(&self, question_id: i64, text: &str, vote_count: i32) -> Result<Choice>;

    /// Removes a question together with its choices.
    async fn delete_question(&self, id: i64) -> Result<bool>;
}

#[derive(Default)]
struct Tables {
    questions: BTreeMap<i64, Question>,
    choices: BTreeMap<i64, Choice>,
    next_question_id: i64,
    next_choice_id: i64,
}

/// Process-local store. Every mutation runs under the write lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn find_published(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        let mut questions: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| q.is_published(now))
            .cloned()
            .collect();

        questions.sort_by(|a, b| b.publication_time.cmp(&a.publication_time));
        questions.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(questions)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>> {
        let tables = self.tables.read().await;
        Ok(tables
            .choices
            .values()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn increment_vote(&self, question_id: i64, choice_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.choices.get_mut(&choice_id) {
            Some(choice) if choice.question_id == question_id => {
                choice.vote_count = choice.vote_count.checked_add(1).ok_or_else(|| {
                    AppError::InvalidVoteCount {
                        message: format!("choice {choice_id} is already at {}", choice.vote_count),
                    }
                })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_question(&self, text: &str, publication_time: DateTime<Utc>) -> Result<Question> {
        let mut tables = self.tables.write().await;
        tables.next_question_id += 1;
        let question = Question {
            id: tables.next_question_id,
            text: text.to_string(),
            publication_time,
        };
        tables.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn create_choice(&self, question_id: i64, text: &str, vote_count: i32) -> Result<Choice> {
        if vote_count < 0 {
            return Err(AppError::InvalidVoteCount {
                message: format!("{vote_count} is negative"),
            });
        }

        let mut tables = self.tables.write().await;
        tables.next_choice_id += 1;
        let choice = Choice {
            id: tables.next_choice_id,
            question_id,
            text: text.to_string(),
            vote_count,
        };
        tables.choices.insert(choice.id, choice.clone());
        Ok(choice)
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.questions.remove(&id).is_none() {
            return Ok(false);
        }
        tables.choices.retain(|_, c| c.question_id != id);
        Ok(true)
    }
}

/// Adds a sample question when nothing is published yet.
pub async fn seed_sample(store: &dyn PollStore) -> Result<()> {
    let now = Utc::now();
    if !store.find_published(now, 1).await?.is_empty() {
        return Ok(());
    }

    let question = store.create_question("What's up?", now).await?;
    for text in ["Not much", "The sky", "Just hacking again"] {
        store.create_choice(question.id, text, 0).await?;
    }
    info!(question_id = question.id, "Seeded sample question");
    Ok(())
}
