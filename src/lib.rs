//! Accept-Language negotiation matcher.
//!
//! Compares a client's weighted language preferences against a configured
//! set of offered language tags, picks the best one, and exposes the outcome
//! to an HTTP service as a route matcher plus a request variable.

pub mod config;
pub mod negotiation;
pub mod server;
