use chrono::Weekday;

/// Settings shared by every report built through [`crate::reports::Reports`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportsConfig {
    /// First day of a reporting week.
    pub week_start: Weekday,
}

impl ReportsConfig {
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;

        self
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_week_starts_on_monday() {
        assert_eq!(ReportsConfig::default().week_start, Weekday::Mon);
    }

    #[test]
    fn test_with_week_start() {
        let config = ReportsConfig::default().with_week_start(Weekday::Sun);
        assert_eq!(config.week_start, Weekday::Sun);
    }
}
