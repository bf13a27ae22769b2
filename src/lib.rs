//! # Cimo (Bug Tracking Core)
//!
//! `cimo` is the core of a single-tenant bug tracker: users authenticate with
//! email and password, confirm a one-time code sent to that address, and then
//! create, edit, comment on, and filter bug reports.
//!
//! ## Two-Factor Flow
//!
//! Primary credentials are checked by an external identity provider behind the
//! [`auth::SessionStore`] capability. A successful sign-in or sign-up only
//! reaches `CredentialsAccepted`; access is gated on a second factor, a
//! 6-digit one-time code delivered through an [`auth::OtpSender`] and tracked
//! by [`auth::AuthFlow`]. The flow's own [`auth::AuthState`] is deliberately
//! distinct from the provider's session object, so callers can require
//! `is_verified` without trusting the session alone.
//!
//! - **Codes:** uniform draw over `100000..=999999`, bound to one email,
//!   valid for five minutes by default.
//! - **Expiry:** checked lazily at verification time; there is no background
//!   timer.
//! - **Retry:** a wrong code keeps the record for another attempt; an expired
//!   or consumed code requires a resend. Nothing here is fatal.
//!
//! ## Bug Repository
//!
//! [`bugs::BugRepository`] holds the report list in memory and mirrors it as a
//! JSON snapshot into a [`storage::ScratchStorage`], the crate's stand-in for
//! browser local storage. Filtering, comments, per-bug activity trails, and
//! status/severity breakdowns for dashboard charts live alongside it.

pub mod auth;
pub mod bugs;
pub mod storage;

/// User agent for outbound HTTP calls made by delivery collaborators.
pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
