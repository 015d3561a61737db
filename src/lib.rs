//! Paginated JSON API over a remote CSV of daily stock-index records.
//!
//! The CSV is downloaded once at startup in the background, parsed into an
//! in-memory [`models::Dataset`], and served page by page from
//! `GET /get-csv-data?page=&limit=`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
