//! Vacation recommendations from a language model.
//!
//! [`Recommender`] is the seam between the planner and the model. The
//! production implementation is [`OpenAiRecommender`]; tests substitute their
//! own.

mod openai;

pub use openai::{API_KEY_ENV, OpenAiRecommender, openai_key_present};

use std::fmt;

use chrono::NaiveDate;

use crate::error::LeaveCalResult;

/// What to ask the model for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    /// Holiday dates, sorted ascending.
    holiday_dates: Vec<NaiveDate>,
    pub extra_days: u32,
    pub question: Option<String>,
}

impl RecommendationRequest {
    pub fn new(mut holiday_dates: Vec<NaiveDate>, extra_days: u32) -> Self {
        holiday_dates.sort();
        RecommendationRequest {
            holiday_dates,
            extra_days,
            question: None,
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn holiday_dates(&self) -> &[NaiveDate] {
        &self.holiday_dates
    }

    pub fn prompt(&self) -> String {
        let dates = self
            .holiday_dates
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = format!(
            "I have the following holiday dates in my calendar:\n\
             {dates}\n\
             \n\
             I am looking to maximize my vacation by taking {} extra days off.\n\
             Please suggest the best period(s) for an extended vacation by combining weekends and these holidays.\n\
             List the optimal vacation period(s) along with the dates I would need to take off.\n",
            self.extra_days
        );

        if let Some(question) = self.question.as_deref().filter(|q| !q.trim().is_empty()) {
            prompt.push_str(&format!("\nAlso: {}\n", question.trim()));
        }

        prompt
    }
}

/// Produces free-text vacation advice.
#[allow(async_fn_in_trait)]
pub trait Recommender {
    async fn recommend(&self, request: &RecommendationRequest) -> LeaveCalResult<String>;
}

/// Outcome of a recommendation request as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Advice(String),
    /// No stored holidays to plan around; the model was not called.
    NoHolidayDates,
    /// The model call failed; holds the error text.
    Failed(String),
}

impl Recommendation {
    pub fn from_result(result: LeaveCalResult<String>) -> Self {
        match result {
            Ok(advice) => Recommendation::Advice(advice),
            Err(e) => {
                tracing::warn!("recommendation failed: {e}");
                Recommendation::Failed(e.to_string())
            }
        }
    }

    pub fn is_advice(&self) -> bool {
        matches!(self, Recommendation::Advice(_))
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Advice(advice) => write!(f, "{advice}"),
            Recommendation::NoHolidayDates => {
                write!(f, "No holiday dates found in the stored events.")
            }
            Recommendation::Failed(e) => write!(f, "Error calling the language model: {e}"),
        }
    }
}
