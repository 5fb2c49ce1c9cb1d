// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ReviewBar Fetch
//!
//! HTTP plumbing and host probes for the ReviewBar application.
//!
//! This crate provides the transport layer the provider checks sit on:
//!
//! - [`client::HttpClient`] - HTTP client with tracing, timeout, and a
//!   domain allowlist restricting requests to the known provider hosts
//! - [`session::SessionStore`] - ambient session-cookie probe over the
//!   browser cookie databases (the "is the user signed in?" question)
//! - [`error`] - transport and cookie error types and their mapping into
//!   the core check-error classification

pub mod client;
pub mod error;
pub mod session;

pub use client::HttpClient;
pub use error::{CookieError, HttpError};
pub use session::{Browser, Cookie, SessionStore};
