//! # Records and Payloads
//!
//! Stored record types and the request payloads they are built from.
//! Payload fields are optional so that a missing field surfaces as a
//! `required` violation instead of a decode error.

pub mod product;
pub mod user;

pub use product::{Product, ProductPayload};
pub use user::{User, UserPayload, UserView};
