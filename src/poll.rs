// src/poll.rs
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{Question, VoteForm};
use crate::store::PollStore;
use crate::templates::{DetailView, IndexView, ResultsView, NO_CHOICE_SELECTED};

/// How many questions the index page lists.
pub const LATEST_LIMIT: i64 = 5;

#[derive(Debug)]
pub enum VoteOutcome {
    /// The vote was counted; the client should be sent to the results page.
    Recorded { question_id: i64 },
    /// Nothing usable was selected; show the detail page again with an error.
    InvalidSelection(DetailView),
}

pub async fn latest_questions(store: &dyn PollStore, now: DateTime<Utc>) -> Result<IndexView> {
    let latest_question_list = store.find_published(now, LATEST_LIMIT).await?;
    Ok(IndexView {
        latest_question_list,
        now,
    })
}

/// Unknown and not-yet-published questions are indistinguishable here.
async fn published_question(store: &dyn PollStore, id: i64, now: DateTime<Utc>) -> Result<Question> {
    match store.find_by_id(id).await? {
        Some(question) if question.is_published(now) => Ok(question),
        Some(_) => {
            debug!(question_id = id, "Question not published yet");
            Err(AppError::NotFound)
        }
        None => Err(AppError::NotFound),
    }
}

pub async fn question_detail(store: &dyn PollStore, id: i64, now: DateTime<Utc>) -> Result<DetailView> {
    let question = published_question(store, id, now).await?;
    let choices = store.choices_for(question.id).await?;
    Ok(DetailView {
        question,
        choices,
        error_message: None,
    })
}

/// Records a vote. Publication time is not checked, only existence.
pub async fn vote(store: &dyn PollStore, id: i64, form: VoteForm) -> Result<VoteOutcome> {
    let question = store.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    let choice_id = form.choice.as_deref().and_then(|c| c.trim().parse::<i64>().ok());
    if let Some(choice_id) = choice_id {
        if store.increment_vote(question.id, choice_id).await? {
            info!(question_id = question.id, choice_id, "Vote recorded");
            return Ok(VoteOutcome::Recorded {
                question_id: question.id,
            });
        }
    }

    debug!(question_id = question.id, choice = ?form.choice, "Vote without a valid choice");
    let choices = store.choices_for(question.id).await?;
    Ok(VoteOutcome::InvalidSelection(DetailView {
        question,
        choices,
        error_message: Some(NO_CHOICE_SELECTED.to_string()),
    }))
}

pub async fn question_results(store: &dyn PollStore, id: i64, now: DateTime<Utc>) -> Result<ResultsView> {
    let question = published_question(store, id, now).await?;
    let choices = store.choices_for(question.id).await?;
    Ok(ResultsView { question, choices })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::MemoryStore;

    fn form(choice: Option<&str>) -> VoteForm {
        VoteForm {
            choice: choice.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn latest_questions_skips_future_ones() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.create_question("Past question.", now - Duration::days(30)).await.unwrap();
        store.create_question("Future question.", now + Duration::days(30)).await.unwrap();

        let view = latest_questions(&store, now).await.unwrap();
        let texts: Vec<&str> = view.latest_question_list.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["Past question."]);
    }

    #[tokio::test]
    async fn latest_questions_are_newest_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.create_question("Past question 1.", now - Duration::days(30)).await.unwrap();
        store.create_question("Past question 2.", now - Duration::days(5)).await.unwrap();

        let view = latest_questions(&store, now).await.unwrap();
        let texts: Vec<&str> = view.latest_question_list.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["Past question 2.", "Past question 1."]);
    }

    #[tokio::test]
    async fn detail_and_results_hide_unpublished_questions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let future = store.create_question("Future question.", now + Duration::days(5)).await.unwrap();

        assert!(matches!(question_detail(&store, future.id, now).await, Err(AppError::NotFound)));
        assert!(matches!(question_results(&store, future.id, now).await, Err(AppError::NotFound)));
        assert!(matches!(question_detail(&store, 999, now).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn vote_on_missing_question_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(vote(&store, 1, form(Some("1"))).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn vote_with_bad_choice_redisplays_detail() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let question = store.create_question("Pick one", now - Duration::days(1)).await.unwrap();
        let other = store.create_question("Other", now - Duration::days(1)).await.unwrap();
        let foreign = store.create_choice(other.id, "Elsewhere", 0).await.unwrap();

        for choice in [None, Some("abc"), Some("999"), Some(foreign.id.to_string().as_str())] {
            match vote(&store, question.id, form(choice)).await.unwrap() {
                VoteOutcome::InvalidSelection(view) => {
                    assert_eq!(view.question.id, question.id);
                    assert_eq!(view.error_message.as_deref(), Some(NO_CHOICE_SELECTED));
                }
                outcome => panic!("unexpected outcome {outcome:?}"),
            }
        }
        assert_eq!(store.choices_for(other.id).await.unwrap()[0].vote_count, 0);
    }

    #[tokio::test]
    async fn vote_counts_exactly_once() {
        let store = MemoryStore::new();
        let question = store.create_question("Pick one", Utc::now() - Duration::days(5)).await.unwrap();
        let choice = store.create_choice(question.id, "This one", 0).await.unwrap();

        let outcome = vote(&store, question.id, form(Some(&choice.id.to_string()))).await.unwrap();
        assert!(matches!(outcome, VoteOutcome::Recorded { question_id } if question_id == question.id));
        assert_eq!(store.choices_for(question.id).await.unwrap()[0].vote_count, 1);
    }

    #[tokio::test]
    async fn vote_accepts_unpublished_question() {
        // Only existence is checked when voting; detail and results still 404.
        let store = MemoryStore::new();
        let now = Utc::now();
        let question = store.create_question("Not yet", now + Duration::days(5)).await.unwrap();
        let choice = store.create_choice(question.id, "Early", 0).await.unwrap();

        let outcome = vote(&store, question.id, form(Some(&choice.id.to_string()))).await.unwrap();
        assert!(matches!(outcome, VoteOutcome::Recorded { .. }));
        assert!(matches!(question_results(&store, question.id, now).await, Err(AppError::NotFound)));
    }
}
