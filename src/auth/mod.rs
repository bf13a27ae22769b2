//! Two-factor authentication flow: primary credentials against a session
//! store, then a one-time code verified by [`AuthFlow`].

pub mod clock;
pub mod dispatch;
pub mod error;
pub mod flow;
pub mod otp;
pub mod session;
pub mod state;
pub mod store;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::dispatch::{HttpOtpSender, LogOtpSender, OtpSender};
pub use self::error::AuthError;
pub use self::flow::AuthFlow;
pub use self::otp::{CodeGenerator, OtpRecord, SequenceCodeGenerator, ThreadRngCodeGenerator};
pub use self::session::{
    CredentialError, InMemorySessionStore, Session, SessionStore,
};
pub use self::state::{AuthConfig, AuthState};
pub use self::store::{OtpStore, ScratchOtpStore};

use regex::Regex;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}
