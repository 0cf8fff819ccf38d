//! Lead IA Toggle API Library
//!
//! Looks up leads by Brazilian phone number and switches their AI assistant
//! flag (`ia_on_off`) off, over either a Supabase (PostgREST) project or a
//! direct Postgres connection.
//!
//! # Modules
//!
//! - `app`: Router assembly and datastore bootstrap.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Postgres lead store.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Lead and request/response models.
//! - `openapi`: OpenAPI document.
//! - `phone`: Phone candidate generation.
//! - `services`: Lead lookup and AI toggle.
//! - `store`: Datastore contract.
//! - `supabase_client`: Supabase lead store.

pub mod app;
pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod phone;
pub mod services;
pub mod store;
pub mod supabase_client;
