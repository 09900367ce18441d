//! API key secret and credential verification.
//!
//! The gateway authenticates callers against a single configured secret.
//! Extraction of the supplied token from the request lives in the HTTP
//! adapter; this module owns the comparison and its outcome.

use std::fmt;

use zeroize::Zeroizing;

use super::Error;

/// Configured API key secret.
///
/// ## Invariants
/// - Never empty; blank configuration values produce `None` from
///   [`ApiKey::new`].
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    /// Wrap a configured secret, rejecting blank values.
    ///
    /// # Examples
    /// ```
    /// use comms_gateway::domain::auth::ApiKey;
    ///
    /// assert!(ApiKey::new("s3cret").is_some());
    /// assert!(ApiKey::new("  ").is_none());
    /// ```
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(value)))
        }
    }

    /// Compare a supplied token against the secret without early exit.
    pub fn matches(&self, supplied: &str) -> bool {
        timing_safe_eq(supplied, self.0.as_str())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Decide whether a request may proceed.
///
/// `configured` is the operator-supplied secret and `supplied` the first
/// non-empty token found on the request.
///
/// # Errors
/// - [`Error::server_misconfigured`] when no secret is configured.
/// - [`Error::missing_credential`] when the caller supplied no token.
/// - [`Error::invalid_credential`] when the token does not match.
pub fn verify(configured: Option<&ApiKey>, supplied: Option<&str>) -> Result<(), Error> {
    let key = configured
        .ok_or_else(|| Error::server_misconfigured("API key is not configured on the server"))?;
    let token = supplied
        .filter(|token| !token.is_empty())
        .ok_or_else(Error::missing_credential)?;
    if key.matches(token) {
        Ok(())
    } else {
        Err(Error::invalid_credential())
    }
}

/// Constant-time string equality.
///
/// Inputs of different byte length are rejected immediately. Equal-length
/// inputs are XOR-accumulated over every byte and the accumulator is tested
/// once at the end.
///
/// # Examples
/// ```
/// use comms_gateway::domain::auth::timing_safe_eq;
///
/// assert!(timing_safe_eq("abc", "abc"));
/// assert!(!timing_safe_eq("abc", "abd"));
/// assert!(!timing_safe_eq("abc", "ab"));
/// ```
pub fn timing_safe_eq(supplied: &str, expected: &str) -> bool {
    let supplied = supplied.as_bytes();
    let expected = expected.as_bytes();
    if supplied.len() != expected.len() {
        return false;
    }
    let (difference, _) = accumulate_difference(supplied, expected);
    difference == 0
}

/// XOR-accumulate two equal-length byte slices, returning the accumulator
/// and the number of positions visited.
fn accumulate_difference(left: &[u8], right: &[u8]) -> (u8, usize) {
    left.iter()
        .zip(right)
        .fold((0_u8, 0_usize), |(acc, steps), (a, b)| (acc | (a ^ b), steps + 1))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const SECRET: &str = "k3y-0123456789";

    fn configured() -> ApiKey {
        ApiKey::new(SECRET).expect("non-empty secret")
    }

    #[rstest]
    #[case("abc", "abc", true)]
    #[case("abc", "abd", false)]
    #[case("xbc", "abc", false)]
    #[case("abc", "ab", false)]
    #[case("", "a", false)]
    #[case("", "", true)]
    fn timing_safe_eq_matches_string_equality(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(timing_safe_eq(left, right), expected);
        assert_eq!(left == right, expected);
    }

    #[rstest]
    fn comparison_visits_every_position_regardless_of_first_difference() {
        let expected = SECRET.as_bytes();
        let first = b"X3y-0123456789";
        let last = b"k3y-012345678X";

        let (first_diff, first_steps) = accumulate_difference(first, expected);
        let (last_diff, last_steps) = accumulate_difference(last, expected);
        let (same_diff, same_steps) = accumulate_difference(expected, expected);

        assert_ne!(first_diff, 0);
        assert_ne!(last_diff, 0);
        assert_eq!(same_diff, 0);
        assert_eq!(first_steps, expected.len());
        assert_eq!(last_steps, expected.len());
        assert_eq!(same_steps, expected.len());
    }

    #[rstest]
    fn verify_accepts_matching_key() {
        assert!(verify(Some(&configured()), Some(SECRET)).is_ok());
    }

    #[rstest]
    #[case(None, Some(SECRET), ErrorCode::ServerMisconfigured)]
    #[case(Some(configured()), None, ErrorCode::MissingCredential)]
    #[case(Some(configured()), Some(""), ErrorCode::MissingCredential)]
    #[case(Some(configured()), Some("short"), ErrorCode::InvalidCredential)]
    #[case(Some(configured()), Some("k3y-0123456780"), ErrorCode::InvalidCredential)]
    fn verify_rejects(
        #[case] key: Option<ApiKey>,
        #[case] supplied: Option<&str>,
        #[case] expected: ErrorCode,
    ) {
        let error = verify(key.as_ref(), supplied).expect_err("verification should fail");
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn misconfiguration_wins_over_missing_credential() {
        let error = verify(None, None).expect_err("no key configured");
        assert_eq!(error.code(), ErrorCode::ServerMisconfigured);
    }

    #[rstest]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", configured());
        assert!(!rendered.contains(SECRET));
    }
}
