//! Core library for leavecal.
//!
//! - `extract` turns PDF, ICS and CSV calendar files into dated events
//! - `weekend` classifies dates as holidays
//! - `store` keeps ingested events in SQLite
//! - `recommend` asks a language model for vacation plans
//! - `planner` wires the above into the ingest and recommend flows

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod extract;
pub mod planner;
pub mod recommend;
pub mod store;
pub mod weekend;

pub use error::{LeaveCalError, LeaveCalResult};
pub use event::{CalendarEvent, StoredEvent};
