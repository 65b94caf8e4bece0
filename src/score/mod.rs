//! Score aggregation
//!
//! The score only ever grows, and only through `increase_score`. Every
//! change re-renders `"Score: n"` through the attached display.

pub mod rainbow;

pub use rainbow::{RainbowText, RenderedText, build_rainbow};

use crate::consts::SCORE_PREFIX;
use crate::sim::task::TaskStatus;

/// Where the score line is shown
#[derive(Debug, Clone)]
pub enum ScoreDisplay {
    /// Color-cycling text
    Rainbow(RainbowText),
    /// Plain text fallback
    Plain(String),
    /// No output attached
    Detached,
}

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    score: u64,
    display: ScoreDisplay,
}

impl ScoreAggregator {
    /// Attach `display` and render the initial `"Score: 0"`
    pub fn new(display: ScoreDisplay) -> Self {
        if matches!(display, ScoreDisplay::Detached) {
            log::warn!("Score has no display attached; score changes are only logged");
        }
        let mut aggregator = Self { score: 0, display };
        aggregator.increase_score(0);
        aggregator
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn display(&self) -> &ScoreDisplay {
        &self.display
    }

    pub fn rainbow(&self) -> Option<&RainbowText> {
        match &self.display {
            ScoreDisplay::Rainbow(text) => Some(text),
            _ => None,
        }
    }

    /// Current score text as shown (markup for rainbow displays)
    pub fn displayed_text(&self) -> Option<String> {
        match &self.display {
            ScoreDisplay::Rainbow(text) => Some(text.markup()),
            ScoreDisplay::Plain(text) => Some(text.clone()),
            ScoreDisplay::Detached => None,
        }
    }

    /// Add `delta` and re-render; returns the new total
    pub fn increase_score(&mut self, delta: u32) -> u64 {
        self.score = self.score.saturating_add(u64::from(delta));
        let text = format!("{SCORE_PREFIX}{}", self.score);

        match &mut self.display {
            ScoreDisplay::Rainbow(rainbow) => rainbow.set_plain_text_and_refresh(&text),
            ScoreDisplay::Plain(plain) => *plain = text,
            ScoreDisplay::Detached => {}
        }

        log::info!("Score now {}", self.score);
        self.score
    }

    pub fn advance(&mut self, unscaled_dt: f32) -> TaskStatus {
        match &mut self.display {
            ScoreDisplay::Rainbow(rainbow) => rainbow.advance(unscaled_dt),
            _ => TaskStatus::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::tuning::RainbowSettings;

    #[test]
    fn test_initial_render() {
        let score = ScoreAggregator::new(ScoreDisplay::Plain(String::new()));
        assert_eq!(score.score(), 0);
        assert_eq!(score.displayed_text().as_deref(), Some("Score: 0"));
    }

    #[test]
    fn test_increase_returns_total() {
        let mut score = ScoreAggregator::new(ScoreDisplay::Plain(String::new()));
        assert_eq!(score.increase_score(20), 20);
        assert_eq!(score.increase_score(0), 20);
        assert_eq!(score.increase_score(100), 120);
        assert_eq!(score.displayed_text().as_deref(), Some("Score: 120"));
    }

    #[test]
    fn test_rainbow_display_receives_text() {
        let display = RainbowText::new(&RainbowSettings {
            palette: vec![Rgba::RED, Rgba::CYAN],
            ..Default::default()
        });
        let mut score = ScoreAggregator::new(ScoreDisplay::Rainbow(display));
        score.increase_score(50);
        let rainbow = score.rainbow().unwrap();
        assert_eq!(rainbow.plain_text(), "Score: 50");
        assert!(rainbow.is_animating());
        assert!(score.displayed_text().unwrap().starts_with("<color=#"));
    }

    #[test]
    fn test_detached_still_counts() {
        let mut score = ScoreAggregator::new(ScoreDisplay::Detached);
        assert_eq!(score.increase_score(5), 5);
        assert_eq!(score.displayed_text(), None);
    }
}
