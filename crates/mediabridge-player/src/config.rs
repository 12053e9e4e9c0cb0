use std::time::Duration;

/// Per-player configuration.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Interval of the best-effort out-of-band snapshot push. Covers state
    /// changes the native engine does not reliably notify (volume and speed
    /// on some platforms); not required for correctness of any single
    /// command.
    pub refresh_interval: Duration,
    /// Preferred audio language, re-applied after every successful media
    /// item load.
    pub audio_language: Option<String>,
    /// Preferred subtitle language, re-applied after every successful media
    /// item load.
    pub subtitle_language: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(15),
            audio_language: None,
            subtitle_language: None,
        }
    }
}
