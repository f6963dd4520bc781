use shared::{Dataset, DatasetError, PlaybackConfig, PlaybackContext};

const PLAYBACK_CONFIG_TOML: &str = include_str!("../config/playback.toml");
const WILD_PIG_DATA_JSON: &str = include_str!("../data/wild-pig-data.json");

/// Embedded playback settings; an invalid file falls back to defaults.
pub fn load_playback_config() -> PlaybackConfig {
    match PlaybackConfig::from_toml_str(PLAYBACK_CONFIG_TOML) {
        Ok(config) => config,
        Err(error) => {
            zoon::eprintln!("Invalid playback.toml, using defaults: {}", error);
            PlaybackConfig::default()
        }
    }
}

/// Decode the embedded dataset and derive the year sequence from it.
pub fn load_playback_context(config: &PlaybackConfig) -> Result<PlaybackContext, DatasetError> {
    let dataset = Dataset::from_json(WILD_PIG_DATA_JSON)?;
    PlaybackContext::new(dataset, config)
}
