use crate::prelude::{GridDims, VizError, VizResult};
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

/// Identifier for one physical sensor tile.
///
/// Config files may spell ids as strings or numbers; frame payloads key
/// matrices by JSON object key, so both forms normalize to the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SensorId(String);

impl SensorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SensorId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for SensorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => SensorId(text),
            Raw::Number(value) => SensorId(value.to_string()),
        })
    }
}

/// Rendering options shared by every sensor surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VizOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_ip: Option<String>,
    /// Physical spacing constant converting pixel offsets to cell indices.
    pub pitch: f32,
}

/// Static description of one sensor tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConfig {
    pub id: SensorId,
    pub start_coord: [i64; 2],
    pub end_coord: [i64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_image: Option<String>,
}

impl SensorConfig {
    pub fn grid_dims(&self) -> GridDims {
        GridDims {
            rows: (self.end_coord[0] - self.start_coord[0] + 1) as usize,
            cols: (self.end_coord[1] - self.start_coord[1] + 1) as usize,
        }
    }
}

/// Top-level sensor/viz configuration, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiSensConfig {
    pub viz_options: VizOptions,
    pub sensors: Vec<SensorConfig>,
}

impl WiSensConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            VizError::Config(format!("reading {}: {}", path_ref.display(), err))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> VizResult<Self> {
        let config: WiSensConfig = serde_json::from_str(contents)
            .map_err(|err| VizError::Config(err.to_string()))?;
        config.validate()
    }

    /// Fails fast: the view cannot render without valid derived dimensions.
    fn validate(self) -> VizResult<Self> {
        if !(self.viz_options.pitch > 0.0) {
            return Err(VizError::Config("pitch must be positive".into()));
        }
        let mut seen = HashSet::new();
        for sensor in &self.sensors {
            if sensor.end_coord[0] < sensor.start_coord[0]
                || sensor.end_coord[1] < sensor.start_coord[1]
            {
                return Err(VizError::Config(format!(
                    "sensor {}: endCoord precedes startCoord",
                    sensor.id
                )));
            }
            if !seen.insert(sensor.id.clone()) {
                return Err(VizError::Config(format!("duplicate sensor id {}", sensor.id)));
            }
        }
        Ok(self)
    }

    pub fn sensor(&self, id: &SensorId) -> Option<&SensorConfig> {
        self.sensors.iter().find(|sensor| &sensor.id == id)
    }
}

/// Seeds one placeholder grid per sensor with readings in `[0, 1)`.
///
/// The RNG is injected so initial-state tests stay deterministic.
pub fn seed_grids<R: Rng>(config: &WiSensConfig, rng: &mut R) -> BTreeMap<SensorId, Array2<f32>> {
    config
        .sensors
        .iter()
        .map(|sensor| {
            let dims = sensor.grid_dims();
            let grid = Array2::from_shape_fn((dims.rows, dims.cols), |_| rng.gen_range(0.0..1.0));
            (sensor.id.clone(), grid)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_sensor_json() -> &'static str {
        r#"{
            "vizOptions": { "localIp": "127.0.0.1", "pitch": 20 },
            "sensors": [
                { "id": 1, "startCoord": [0, 0], "endCoord": [3, 7] },
                { "id": "palm", "startCoord": [2, 2], "endCoord": [2, 2], "outlineImage": "palm.png" }
            ]
        }"#
    }

    #[test]
    fn derived_dims_follow_coordinate_span() {
        let config = WiSensConfig::from_json(two_sensor_json()).unwrap();
        assert_eq!(
            config.sensors[0].grid_dims(),
            GridDims { rows: 4, cols: 8 }
        );
        assert_eq!(
            config.sensors[1].grid_dims(),
            GridDims { rows: 1, cols: 1 }
        );
    }

    #[test]
    fn numeric_ids_normalize_to_strings() {
        let config = WiSensConfig::from_json(two_sensor_json()).unwrap();
        assert_eq!(config.sensors[0].id, SensorId::from("1"));
        assert!(config.sensor(&SensorId::from("palm")).is_some());
    }

    #[test]
    fn inverted_coordinates_are_fatal() {
        let json = r#"{
            "vizOptions": { "pitch": 10 },
            "sensors": [ { "id": 1, "startCoord": [4, 0], "endCoord": [1, 5] } ]
        }"#;
        assert!(matches!(
            WiSensConfig::from_json(json),
            Err(VizError::Config(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_fatal() {
        let json = r#"{
            "vizOptions": { "pitch": 10 },
            "sensors": [
                { "id": 1, "startCoord": [0, 0], "endCoord": [1, 1] },
                { "id": "1", "startCoord": [0, 0], "endCoord": [2, 2] }
            ]
        }"#;
        assert!(matches!(
            WiSensConfig::from_json(json),
            Err(VizError::Config(_))
        ));
    }

    #[test]
    fn seeded_grids_match_dims_and_domain() {
        let config = WiSensConfig::from_json(two_sensor_json()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let grids = seed_grids(&config, &mut rng);
        let grid = &grids[&SensorId::from("1")];
        assert_eq!(grid.dim(), (4, 8));
        assert!(grid.iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn seeding_is_deterministic_per_seed() {
        let config = WiSensConfig::from_json(two_sensor_json()).unwrap();
        let first = seed_grids(&config, &mut StdRng::seed_from_u64(42));
        let second = seed_grids(&config, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
