// src/templates.rs
use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Choice, Question};

pub const NO_CHOICE_SELECTED: &str = "your didn't select a choice";

#[derive(Template, Debug)]
#[template(path = "polls/index.html")]
pub struct IndexView {
    pub latest_question_list: Vec<Question>,
    pub now: DateTime<Utc>,
}

#[derive(Template, Debug)]
#[template(path = "polls/detail.html")]
pub struct DetailView {
    pub question: Question,
    pub choices: Vec<Choice>,
    pub error_message: Option<String>,
}

#[derive(Template, Debug)]
#[template(path = "polls/results.html")]
pub struct ResultsView {
    pub question: Question,
    pub choices: Vec<Choice>,
}

/// Renders any page template into an HTML response.
pub fn render<T: Template>(view: &T) -> Result<Response, AppError> {
    Ok(Html(view.render()?).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            id: 7,
            text: "Tea or coffee?".to_string(),
            publication_time: Utc::now(),
        }
    }

    #[test]
    fn empty_index_says_so() {
        let view = IndexView {
            latest_question_list: vec![],
            now: Utc::now(),
        };
        assert!(view.render().unwrap().contains("No polls are available."));
    }

    #[test]
    fn detail_escapes_error_message() {
        let view = DetailView {
            question: question(),
            choices: vec![],
            error_message: Some(NO_CHOICE_SELECTED.to_string()),
        };
        let html = view.render().unwrap();
        assert!(html.contains("your didn&#x27;t select a choice"));
        assert!(html.contains(r#"action="/polls/7/vote""#));
    }

    #[test]
    fn results_pluralize_votes() {
        let view = ResultsView {
            question: question(),
            choices: vec![
                Choice { id: 1, question_id: 7, text: "Tea".to_string(), vote_count: 1 },
                Choice { id: 2, question_id: 7, text: "Coffee".to_string(), vote_count: 3 },
            ],
        };
        let html = view.render().unwrap();
        assert!(html.contains("Tea -- 1 vote<"));
        assert!(html.contains("Coffee -- 3 votes"));
    }
}
