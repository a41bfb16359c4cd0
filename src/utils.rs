use std::time::Duration;

/// Wait before retrying after `attempt` failures (1-based): `base * attempt`
pub fn linear_backoff(base: Duration, attempt: usize) -> Duration {
    base.saturating_mul(attempt as u32)
}

/// Capped exponential backoff used for the embedding service
pub fn exponential_backoff(base: Duration, attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    base.saturating_mul(1 << capped)
}

/// Shorten a string for log output
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_backoff_grows_with_attempt() {
        let base = Duration::from_millis(1500);
        assert_eq!(linear_backoff(base, 1), Duration::from_millis(1500));
        assert_eq!(linear_backoff(base, 2), Duration::from_millis(3000));
        assert_eq!(linear_backoff(base, 3), Duration::from_millis(4500));
        assert_eq!(linear_backoff(base, 0), Duration::ZERO);
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let base = Duration::from_millis(500);
        assert_eq!(exponential_backoff(base, 1), Duration::from_millis(1000));
        assert_eq!(exponential_backoff(base, 5), exponential_backoff(base, 50));
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdefghij", 4), "abcd...");
    }
}
