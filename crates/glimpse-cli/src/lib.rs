use glimpse_core::models::FeedStory;
use glimpse_services::StoryView;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One line of `glimpse feed`: id, time of day, owner and caption.
pub fn feed_line(story: &FeedStory) -> String {
    let view = StoryView::present(story);
    format!(
        "{}  {}  {:<16}  {}",
        story.id,
        view.time_of_day,
        truncate_string(&view.username, 16),
        truncate_string(view.caption.as_deref().unwrap_or(""), 40)
    )
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_characters() {
        assert_eq!(truncate_string("ééééé", 5), "ééééé");
        assert_eq!(truncate_string("éééééé", 5), "éé...");
    }
}
