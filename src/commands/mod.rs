pub mod ask;
pub mod config;
pub mod events;
pub mod ingest;
pub mod recommend;
