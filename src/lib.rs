//! # Tronics
//!
//! HTTP backend for an electronics product catalog: public product
//! listing and lookup, token-protected product writes, and user
//! registration and login.
//!
//! # Modules
//!
//! - [`store`] - identifiers, equality filters and the document store contract
//! - [`validation`] - per-field rule checking
//! - [`auth`] - password hashing and signed tokens
//! - [`models`] - product and user records and request bodies
//! - [`api`] - request handlers and the error boundary
//! - [`http_server`] - router, configuration and middleware
//! - [`observability`] - logging setup
//! - [`cli`] - command-line entry

pub mod api;
pub mod auth;
pub mod cli;
pub mod http_server;
pub mod models;
pub mod observability;
pub mod store;
pub mod validation;
