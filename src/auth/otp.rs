//! One-time code records and code generation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest and highest values a code can take; every draw is uniform over the
/// inclusive range, so codes are always exactly six digits.
pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// A pending one-time code, bound to the address it was sent to.
///
/// Transient by design: overwritten by resend, deleted on successful
/// verification, and purged when presented after `expires_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    pub code: String,
    pub email: String,
    /// Unix milliseconds.
    pub expires_at: i64,
}

impl OtpRecord {
    #[must_use]
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis > self.expires_at
    }

    /// Exact string comparison; no normalization of the candidate.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.code == candidate
    }
}

/// Injectable code source so tests can pin the draw.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator drawing from the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngCodeGenerator;

impl CodeGenerator for ThreadRngCodeGenerator {
    fn generate(&self) -> String {
        let code = rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX);
        code.to_string()
    }
}

/// Deterministic generator replaying a fixed sequence, for tests.
#[derive(Debug)]
pub struct SequenceCodeGenerator {
    codes: std::sync::Mutex<std::collections::VecDeque<String>>,
}

impl SequenceCodeGenerator {
    #[must_use]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: std::sync::Mutex::new(codes.into_iter().map(Into::into).collect()),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| "000000".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits_in_range() {
        let generator = ThreadRngCodeGenerator;
        for _ in 0..200 {
            let code = generator.generate();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().expect("numeric code");
            assert!((CODE_MIN..=CODE_MAX).contains(&value));
        }
    }

    #[test]
    fn sequence_generator_replays_in_order() {
        let generator = SequenceCodeGenerator::new(["111111", "222222"]);
        assert_eq!(generator.generate(), "111111");
        assert_eq!(generator.generate(), "222222");
        // Exhausted sequences fall back to a fixed code rather than panic.
        assert_eq!(generator.generate(), "000000");
    }

    #[test]
    fn record_expiry_is_strictly_after_deadline() {
        let record = OtpRecord {
            code: "123456".to_string(),
            email: "a@x.com".to_string(),
            expires_at: 1_000,
        };
        assert!(!record.is_expired(999));
        assert!(!record.is_expired(1_000));
        assert!(record.is_expired(1_001));
    }

    #[test]
    fn record_matching_is_exact() {
        let record = OtpRecord {
            code: "123456".to_string(),
            email: "a@x.com".to_string(),
            expires_at: 1_000,
        };
        assert!(record.matches("123456"));
        assert!(!record.matches("123457"));
        assert!(!record.matches(" 123456"));
        assert!(!record.matches(""));
    }
}
