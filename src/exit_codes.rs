//! Exit code constants for the pkg-cleaner CLI.
//!
//! - 0: Success
//! - 1: Configuration error (missing pattern file, bad working dir, bad config)
//! - 2: Pattern error (a glob that cannot be compiled)
//! - 3: Filesystem failure (stat, delete, copy or move)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Configuration error: detected before any filesystem mutation.
pub const CONFIG_ERROR: i32 = 1;

/// Pattern error: a glob in the pattern list is invalid.
pub const PATTERN_ERROR: i32 = 2;

/// Filesystem failure during stat, delete, copy or move.
pub const FS_FAILURE: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, CONFIG_ERROR, PATTERN_ERROR, FS_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn failure_codes_are_non_zero() {
        assert_eq!(SUCCESS, 0);
        assert_ne!(CONFIG_ERROR, 0);
        assert_ne!(PATTERN_ERROR, 0);
        assert_ne!(FS_FAILURE, 0);
    }
}
