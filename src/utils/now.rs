use chrono::Utc;

/// Returns the current wall-clock time as whole seconds since the UNIX epoch
/// (January 1, 1970, UTC).
///
/// Values before the epoch are negative, which is why the return type is a
/// signed 64-bit integer rather than the `u64` used for durations.
///
/// # Example:
/// ```rust
/// use timerpc::utils::now_unix_secs;
/// let timestamp = now_unix_secs();
/// assert!(timestamp > 0);
/// ```
pub fn now_unix_secs() -> i64 {
    Utc::now().timestamp()
}
