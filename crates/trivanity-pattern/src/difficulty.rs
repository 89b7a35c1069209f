//! Difficulty estimation for vanity patterns

use crate::VanityPattern;

/// Expected number of attempts before one address matches `pattern`.
///
/// Each pinned character is treated as an independent uniform draw from
/// `alphabet`, except the first prefix character, which is drawn from
/// `lead`. With case-insensitive matching a character counts every member
/// it folds to, so `a` against base58 hits both `a` and `A` while against
/// lowercase hex it still hits only `a`.
pub fn calculate_difficulty(pattern: &VanityPattern, alphabet: &str, lead: &str) -> f64 {
    let mut prefix = pattern.prefix.chars();
    let first = prefix
        .next()
        .map_or(1.0, |c| odds(lead, c, pattern.case_sensitive));

    prefix
        .chain(pattern.suffix.chars())
        .map(|c| odds(alphabet, c, pattern.case_sensitive))
        .product::<f64>()
        * first
}

/// One in how many draws from `set` lands on `c`
fn odds(set: &str, c: char, case_sensitive: bool) -> f64 {
    let size = set.chars().count() as f64;
    let hits = set
        .chars()
        .filter(|&a| {
            if case_sensitive {
                a == c
            } else {
                a.eq_ignore_ascii_case(&c)
            }
        })
        .count() as f64;

    if hits == 0.0 {
        f64::INFINITY
    } else {
        size / hits
    }
}

/// Probability that at least one of `attempts` tries has matched
pub fn match_probability(difficulty: f64, attempts: u64) -> f64 {
    if difficulty <= 0.0 || !difficulty.is_finite() {
        return 0.0;
    }
    1.0 - (-(attempts as f64) / difficulty).exp()
}

/// Seconds until the cumulative match probability reaches 50%
pub fn estimate_time_50pct(difficulty: f64, attempts: u64, attempts_per_second: f64) -> f64 {
    if attempts_per_second <= 0.0 {
        return f64::INFINITY;
    }
    let needed = difficulty * std::f64::consts::LN_2 - attempts as f64;
    needed.max(0.0) / attempts_per_second
}

/// Format difficulty as human-readable string
pub fn format_difficulty(difficulty: f64) -> String {
    if !difficulty.is_finite() {
        "impossible".to_string()
    } else if difficulty >= 1e15 {
        format!("{:.2}P", difficulty / 1e15)
    } else if difficulty >= 1e12 {
        format!("{:.2}T", difficulty / 1e12)
    } else if difficulty >= 1e9 {
        format!("{:.2}G", difficulty / 1e9)
    } else if difficulty >= 1e6 {
        format!("{:.2}M", difficulty / 1e6)
    } else if difficulty >= 1e3 {
        format!("{:.2}K", difficulty / 1e3)
    } else {
        format!("{:.0}", difficulty)
    }
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        "never".to_string()
    } else if seconds <= 0.0 {
        "now".to_string()
    } else if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else if seconds < 86400.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds < 86400.0 * 365.0 {
        format!("{:.1}d", seconds / 86400.0)
    } else {
        format!("{:.1}y", seconds / (86400.0 * 365.0))
    }
}
