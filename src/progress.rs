use crate::session::GoalType;

/// Number of whitespace-delimited, non-empty tokens in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Percentage of the goal reached, clamped to `0.0..=100.0`.
///
/// For a words goal `goal_value` is the target word count; for a time goal it
/// is the target in minutes and only `writing_time_secs` matters.
pub fn progress(
    goal_type: GoalType,
    goal_value: u32,
    word_count: usize,
    writing_time_secs: u64,
) -> f64 {
    if goal_value == 0 {
        return 0.0;
    }

    let pct = match goal_type {
        GoalType::Words => (word_count as f64 / goal_value as f64) * 100.0,
        GoalType::Time => {
            let elapsed_minutes = writing_time_secs as f64 / 60.0;
            (elapsed_minutes / goal_value as f64) * 100.0
        }
    };

    pct.clamp(0.0, 100.0)
}
