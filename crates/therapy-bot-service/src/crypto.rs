//! Constant-time comparison for secrets carried in request paths.

/// Constant-time string comparison to prevent timing attacks.
///
/// Used to check the bot token segment of the Telegram webhook path.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
