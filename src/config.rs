use crate::Amount;
use crate::settlement::Merge;

/// Per-session settings.
///
/// Everything beyond who we are, who opened the channel and how much is at
/// stake has a default, so a minimal JSON document like
/// `{"unique_id":"abc","i_started":true,"amount":100}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub unique_id: String,
    pub i_started: bool,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_game_amount: Option<Amount>,
    #[serde(default = "Config::default_channel_timeout")]
    pub channel_timeout: u64,
    #[serde(default = "Config::default_unroll_timeout")]
    pub unroll_timeout: u64,
    #[serde(default = "Config::default_game_timeout")]
    pub game_timeout: u64,
    /// Seconds between resubmissions of an unconfirmed-spend transaction.
    #[serde(default = "Config::default_retry_delay")]
    pub retry_delay: u64,
    #[serde(default)]
    pub merge: Merge,
    #[serde(default = "Config::default_game_type")]
    pub game_type: String,
}

impl Config {
    pub fn new(unique_id: impl Into<String>, i_started: bool, amount: Amount) -> Self {
        Self {
            unique_id: unique_id.into(),
            i_started,
            amount,
            per_game_amount: None,
            channel_timeout: Self::default_channel_timeout(),
            unroll_timeout: Self::default_unroll_timeout(),
            game_timeout: Self::default_game_timeout(),
            retry_delay: Self::default_retry_delay(),
            merge: Merge::default(),
            game_type: Self::default_game_type(),
        }
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Each side's stake in a single hand.
    pub fn per_game(&self) -> Amount {
        self.per_game_amount
            .unwrap_or(self.amount / crate::PER_HAND_DIVISOR)
    }

    pub fn retry(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.retry_delay)
    }
}

impl Config {
    fn default_channel_timeout() -> u64 {
        crate::CHANNEL_TIMEOUT
    }
    fn default_unroll_timeout() -> u64 {
        crate::UNROLL_TIMEOUT
    }
    fn default_game_timeout() -> u64 {
        crate::GAME_TIMEOUT
    }
    fn default_retry_delay() -> u64 {
        crate::SUBMIT_RETRY_SECS
    }
    fn default_game_type() -> String {
        crate::GAME_TYPE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json() {
        let config =
            Config::from_json(r#"{"unique_id":"abc","i_started":true,"amount":100}"#).unwrap();
        assert_eq!(config, Config::new("abc", true, 100));
        assert_eq!(config.per_game(), 10);
        assert_eq!(config.retry(), std::time::Duration::from_secs(30));
        assert_eq!(config.game_type, "calpoker");
        assert_eq!(config.merge, Merge::Concatenate);
    }

    #[test]
    fn overrides() {
        let json = r#"{"unique_id":"x","i_started":false,"amount":100,
            "per_game_amount":25,"retry_delay":60,"merge":"deduplicate"}"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.per_game(), 25);
        assert_eq!(config.retry_delay, 60);
        assert_eq!(config.merge, Merge::Deduplicate);
    }

    #[test]
    fn missing_required() {
        assert!(Config::from_json(r#"{"unique_id":"x"}"#).is_err());
    }
}
