use crate::generator::patterns::Pattern;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Describes one synthetic capture session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub pattern: Pattern,
    pub frames: usize,
    pub rate_hz: f32,
    pub noise: f32,
    pub seed: u64,
    /// A step event is published every this many frames; 0 disables them.
    pub steps_every: usize,
    pub description: Option<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random,
            frames: 200,
            rate_hz: 20.0,
            noise: 0.05,
            seed: 0,
            steps_every: 10,
            description: None,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let scenario: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_cover_every_field() {
        let scenario = ScenarioConfig::default();
        assert_eq!(scenario.pattern, Pattern::Random);
        assert_eq!(scenario.frames, 200);
        assert!(scenario.description.is_none());
    }

    #[test]
    fn scenario_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"pattern: wave\nframes: 40\nrate_hz: 5.0\nseed: 12\n")
            .unwrap();
        let path = temp.into_temp_path();
        let scenario = ScenarioConfig::load(&path).unwrap();
        assert_eq!(scenario.pattern, Pattern::Wave);
        assert_eq!(scenario.frames, 40);
        assert_eq!(scenario.seed, 12);
        // Unspecified fields fall back to the defaults.
        assert_eq!(scenario.steps_every, 10);
    }
}
