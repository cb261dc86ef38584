use log::LevelFilter;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { full_screen: false, log_level: LevelFilter::Error }
    }
}

impl AppSettings {
    /// Read `MATCHDAY_LOG_LEVEL` (`off`, `error` … `trace`); unknown values keep the default.
    pub fn load() -> Self {
        Self::from_level(std::env::var("MATCHDAY_LOG_LEVEL").ok().as_deref())
    }

    fn from_level(level: Option<&str>) -> Self {
        let log_level = level
            .and_then(|l| LevelFilter::from_str(l.trim()).ok())
            .unwrap_or(LevelFilter::Error);
        Self { log_level, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!(AppSettings::from_level(Some("DEBUG")).log_level, LevelFilter::Debug);
        assert_eq!(AppSettings::from_level(Some(" warn ")).log_level, LevelFilter::Warn);
    }

    #[test]
    fn unknown_log_level_falls_back_to_error() {
        assert_eq!(AppSettings::from_level(Some("loud")).log_level, LevelFilter::Error);
        assert_eq!(AppSettings::from_level(None).log_level, LevelFilter::Error);
    }
}
