//! Ingestion and recommendation flow.
//!
//! A [`Planner`] ties the extractors, the weekend classifier, the event store
//! and a [`Recommender`] together. It keeps no event state of its own: every
//! call reads what it needs from the store.

use chrono::NaiveDate;

use crate::config::LeaveCalConfig;
use crate::constants::{DEFAULT_ASK_EXTRA_DAYS, DEFAULT_EXTRA_DAYS};
use crate::error::LeaveCalResult;
use crate::event::{StoredEvent, holiday_dates};
use crate::extract::Extractors;
use crate::recommend::{Recommendation, RecommendationRequest, Recommender};
use crate::store::EventStore;
use crate::weekend::is_weekend;

/// Outcome of ingesting one file.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub file_type: String,
    /// Events read from the file, duplicates included.
    pub extracted: usize,
    /// Rows newly written to the store.
    pub inserted: usize,
    pub diagnostic: Option<String>,
    /// Whole store after ingestion, ordered by date.
    pub events: Vec<StoredEvent>,
    /// Holiday dates across the whole store.
    pub holiday_dates: Vec<NaiveDate>,
}

pub struct Planner<R> {
    store: EventStore,
    extractors: Extractors,
    recommender: R,
    extra_days: u32,
    ask_extra_days: u32,
}

impl<R: Recommender> Planner<R> {
    pub fn new(store: EventStore, recommender: R) -> Self {
        Planner {
            store,
            extractors: Extractors::default(),
            recommender,
            extra_days: DEFAULT_EXTRA_DAYS,
            ask_extra_days: DEFAULT_ASK_EXTRA_DAYS,
        }
    }

    /// Open the configured store and take the configured budgets.
    pub fn from_config(config: &LeaveCalConfig, recommender: R) -> LeaveCalResult<Self> {
        let store = EventStore::open(&config.database_path())?;
        Ok(Planner::new(store, recommender).with_extra_days(config.extra_days, config.ask_extra_days))
    }

    pub fn with_extra_days(mut self, extra_days: u32, ask_extra_days: u32) -> Self {
        self.extra_days = extra_days;
        self.ask_extra_days = ask_extra_days;
        self
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn extractors(&self) -> &Extractors {
        &self.extractors
    }

    /// Extract events from `bytes`, flag weekends and store what is new.
    pub fn ingest(&self, bytes: &[u8], file_type: &str) -> LeaveCalResult<IngestReport> {
        let extraction = self.extractors.extract(file_type, bytes);

        let mut inserted = 0;
        for event in &extraction.events {
            if self.store.insert_if_absent(event, is_weekend(event.date))? {
                inserted += 1;
            }
        }

        let events = self.store.all()?;
        let holiday_dates = holiday_dates(&events);

        tracing::info!(
            file_type,
            extracted = extraction.events.len(),
            inserted,
            stored = events.len(),
            "ingested calendar file"
        );

        Ok(IngestReport {
            file_type: file_type.to_string(),
            extracted: extraction.events.len(),
            inserted,
            diagnostic: extraction.diagnostic,
            events,
            holiday_dates,
        })
    }

    /// Holiday dates across every stored event, ordered by date.
    pub fn holiday_dates(&self) -> LeaveCalResult<Vec<NaiveDate>> {
        Ok(holiday_dates(&self.store.all()?))
    }

    /// Ask for a plan around `holiday_dates`. The model is only called when
    /// there is at least one date.
    pub async fn recommend(
        &self,
        holiday_dates: &[NaiveDate],
        extra_days: Option<u32>,
    ) -> Recommendation {
        if holiday_dates.is_empty() {
            return Recommendation::NoHolidayDates;
        }

        let request =
            RecommendationRequest::new(holiday_dates.to_vec(), extra_days.unwrap_or(self.extra_days));
        Recommendation::from_result(self.recommender.recommend(&request).await)
    }

    /// [`Planner::recommend`] over the holidays currently in the store.
    pub async fn recommend_stored(&self, extra_days: Option<u32>) -> LeaveCalResult<Recommendation> {
        let dates = self.holiday_dates()?;
        Ok(self.recommend(&dates, extra_days).await)
    }

    /// Free-form question, independent of anything stored. Sends an empty
    /// date list.
    pub async fn ask(&self, question: Option<&str>, extra_days: Option<u32>) -> Recommendation {
        let mut request =
            RecommendationRequest::new(Vec::new(), extra_days.unwrap_or(self.ask_extra_days));
        if let Some(question) = question {
            request = request.with_question(question);
        }
        Recommendation::from_result(self.recommender.recommend(&request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeaveCalError;
    use std::cell::RefCell;

    /// Records every request and answers with a canned reply.
    #[derive(Default)]
    struct FakeRecommender {
        requests: RefCell<Vec<RecommendationRequest>>,
        fail: bool,
    }

    impl Recommender for FakeRecommender {
        async fn recommend(&self, request: &RecommendationRequest) -> LeaveCalResult<String> {
            self.requests.borrow_mut().push(request.clone());
            if self.fail {
                Err(LeaveCalError::ModelApi {
                    status: 429,
                    message: "rate limited".to_string(),
                })
            } else {
                Ok(format!("plan for {} dates", request.holiday_dates().len()))
            }
        }
    }

    fn planner() -> Planner<FakeRecommender> {
        Planner::new(EventStore::open_in_memory().unwrap(), FakeRecommender::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Sat 2025-07-05, Fri 2025-07-04, Sun 2025-12-28
    const HOLIDAYS_CSV: &str = "date,event_name\n\
        2025-12-28,Boxing Weekend\n\
        2025-07-04,Independence Day\n\
        2025-07-05,Fireworks\n\
        2025-13-01,Bad\n";

    #[test]
    fn test_ingest_flags_weekends_and_counts_new_rows() {
        let planner = planner();
        let report = planner.ingest(HOLIDAYS_CSV.as_bytes(), "csv").unwrap();

        assert_eq!(report.extracted, 3);
        assert_eq!(report.inserted, 3);
        assert!(report.diagnostic.is_none());

        let flags: Vec<(NaiveDate, bool)> =
            report.events.iter().map(|e| (e.date, e.is_holiday)).collect();
        assert_eq!(
            flags,
            vec![
                (date(2025, 7, 4), false),
                (date(2025, 7, 5), true),
                (date(2025, 12, 28), true),
            ]
        );
        assert_eq!(report.holiday_dates, vec![date(2025, 7, 5), date(2025, 12, 28)]);
    }

    #[test]
    fn test_ingesting_twice_adds_nothing() {
        let planner = planner();
        planner.ingest(HOLIDAYS_CSV.as_bytes(), "csv").unwrap();
        let before = planner.store().all().unwrap().len();

        let second = planner.ingest(HOLIDAYS_CSV.as_bytes(), "csv").unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.extracted, 3);
        assert_eq!(planner.store().all().unwrap().len(), before);
    }

    #[test]
    fn test_holiday_dates_span_whole_store() {
        let planner = planner();
        planner.ingest(HOLIDAYS_CSV.as_bytes(), "csv").unwrap();

        let ics = "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nUID:a\n\
                   DTSTART;VALUE=DATE:20250301\nSUMMARY:Carnival\nEND:VEVENT\nEND:VCALENDAR\n";
        let report = planner.ingest(ics.as_bytes(), "ics").unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(
            report.holiday_dates,
            vec![date(2025, 3, 1), date(2025, 7, 5), date(2025, 12, 28)]
        );
    }

    #[test]
    fn test_unknown_file_type_stores_nothing() {
        let planner = planner();
        let report = planner.ingest(HOLIDAYS_CSV.as_bytes(), "xlsx").unwrap();

        assert_eq!(report.extracted, 0);
        assert_eq!(report.inserted, 0);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_diagnostic_is_reported() {
        let planner = planner();
        let truncated = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nDTSTART;VALUE=DATE:20250104\n\
                         SUMMARY:Ski trip\nEND:VEVENT\nBEGIN:VEVENT\nDTSTART:2025";
        let report = planner.ingest(truncated.as_bytes(), "ics").unwrap();

        assert_eq!(report.inserted, 1);
        assert!(report.diagnostic.is_some());
    }

    #[tokio::test]
    async fn test_recommend_skips_model_without_holidays() {
        let planner = planner();
        let outcome = planner.recommend_stored(None).await.unwrap();

        assert_eq!(outcome, Recommendation::NoHolidayDates);
        assert!(planner.recommender.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_recommend_sends_sorted_stored_holidays() {
        let planner = planner().with_extra_days(3, 1);
        planner.ingest(HOLIDAYS_CSV.as_bytes(), "csv").unwrap();

        let outcome = planner
            .recommend(&[date(2025, 12, 28), date(2025, 7, 5)], None)
            .await;
        assert_eq!(outcome, Recommendation::Advice("plan for 2 dates".to_string()));

        let requests = planner.recommender.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].holiday_dates(),
            &[date(2025, 7, 5), date(2025, 12, 28)]
        );
        assert_eq!(requests[0].extra_days, 3);
    }

    #[tokio::test]
    async fn test_recommend_extra_days_override() {
        let planner = planner();
        planner.ingest(HOLIDAYS_CSV.as_bytes(), "csv").unwrap();

        planner.recommend_stored(Some(6)).await.unwrap();
        assert_eq!(planner.recommender.requests.borrow()[0].extra_days, 6);
    }

    #[tokio::test]
    async fn test_ask_sends_empty_list_with_its_own_budget() {
        let planner = planner().with_extra_days(5, 2);
        planner.ingest(HOLIDAYS_CSV.as_bytes(), "csv").unwrap();

        let outcome = planner.ask(Some("Where should I go in spring?"), None).await;
        assert!(outcome.is_advice());

        let requests = planner.recommender.requests.borrow();
        assert!(requests[0].holiday_dates().is_empty());
        assert_eq!(requests[0].extra_days, 2);
        assert_eq!(
            requests[0].question.as_deref(),
            Some("Where should I go in spring?")
        );
    }

    #[tokio::test]
    async fn test_model_failure_becomes_text() {
        let planner = Planner::new(
            EventStore::open_in_memory().unwrap(),
            FakeRecommender {
                fail: true,
                ..FakeRecommender::default()
            },
        );

        let outcome = planner.ask(None, None).await;
        assert_eq!(
            outcome.to_string(),
            "Error calling the language model: Model API returned 429: rate limited"
        );
    }
}
