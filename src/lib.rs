//! Partner Webhooks API Library
//!
//! Three small HTTP endpoints: a JSON echo, a partner document ingestion
//! webhook that fans a fetched document out into table rows, and a call
//! analytics webhook that emails a formatted report.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `call_report`: Call report projection and HTML rendering.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Partner service store trait and PostgreSQL implementation.
//! - `email_client`: Transactional email client (Resend).
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and shared state.
//! - `ingestion`: Partner document fetch, sanitization and row building.
//! - `models`: Request, response and row models.
//! - `rest_storage`: Table API (PostgREST) store implementation.
//! - `router`: Route table and middleware.
//! - `webhook_handler`: Call analytics webhook handler.
//! - `webhook_models`: Call analytics payload models.

pub mod api;
pub mod core;
pub mod integrations;

pub mod call_report;
pub mod config;
pub mod db;
pub mod db_storage;
pub mod email_client;
pub mod errors;
pub mod handlers;
pub mod ingestion;
pub mod models;
pub mod rest_storage;
pub mod router;
pub mod webhook_handler;
pub mod webhook_models;
