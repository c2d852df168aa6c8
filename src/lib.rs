//! Reading club manager: members, books, loans and scored comments kept in a
//! local SQLite file, driven from a terminal UI.
//!
//! The library half is usable without the UI. [`Club`] is the entry point for
//! every operation; [`Store`] says where the database lives.
pub mod club;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod sentiment;
pub mod ui;

pub use club::Club;
pub use config::Config;
pub use db::{ensure_schema, LendOutcome, ReturnOutcome, Store};
pub use error::StoreError;
pub use models::{Book, Comment, Loan, Member};
pub use sentiment::{SentimentScorer, VaderScorer};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
