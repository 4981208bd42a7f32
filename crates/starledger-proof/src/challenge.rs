//! Challenge issuance and the expiry window.
//!
//! A challenge is a plain string binding an address to an issue time.
//! Nothing is stored: the timestamp embedded in the string is the state,
//! and it is re-parsed and re-checked at submission time.

use crate::error::VerifyError;

/// Fixed suffix of every challenge message.
pub const CHALLENGE_SUFFIX: &str = "starRegistry";

/// Seconds a challenge stays valid after issuance.
pub const CHALLENGE_WINDOW_SECS: i64 = 300;

/// Format a challenge binding `address` to the issue time `now`
/// (seconds since epoch): `"{address}:{now}:starRegistry"`.
pub fn issue_challenge(address: &str, now: i64) -> String {
    format!("{address}:{now}:{CHALLENGE_SUFFIX}")
}

/// Extract the issue time: the second colon-delimited field.
pub fn parse_issue_time(message: &str) -> Result<i64, VerifyError> {
    let field = message
        .split(':')
        .nth(1)
        .ok_or_else(|| VerifyError::MalformedChallenge("missing timestamp field".into()))?;
    field.parse::<i64>().map_err(|_| {
        VerifyError::MalformedChallenge(format!("timestamp field is not an integer: {field:?}"))
    })
}

/// Check the expiry window against a caller-supplied clock.
///
/// A challenge is expired once `now - issue_time >= CHALLENGE_WINDOW_SECS`;
/// the boundary second itself is already expired. The issue time comes
/// straight from the caller's message, so the subtraction must tolerate
/// the full `i64` range; a difference too large to represent is expired.
pub fn check_window(issue_time: i64, now: i64) -> Result<(), VerifyError> {
    let elapsed = now.checked_sub(issue_time).unwrap_or(i64::MAX);
    if elapsed >= CHALLENGE_WINDOW_SECS {
        return Err(VerifyError::Expired {
            elapsed,
            window: CHALLENGE_WINDOW_SECS,
        });
    }
    Ok(())
}
