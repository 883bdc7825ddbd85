use crate::config::SensorId;
use crate::prelude::{VizError, VizResult};
use std::collections::BTreeMap;

/// One complete push update: matrix rows for some or all sensors.
pub type FramePayload = BTreeMap<SensorId, Vec<Vec<f32>>>;

/// Decodes the JSON-encoded `sensor_data` payload.
///
/// Ragged and empty matrices are rejected here so the store only ever sees
/// rectangular data.
pub fn decode_frame(payload: &str) -> VizResult<FramePayload> {
    let frame: FramePayload =
        serde_json::from_str(payload).map_err(|err| VizError::FrameDecode(err.to_string()))?;
    for (sensor, rows) in &frame {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(VizError::FrameDecode(format!("sensor {sensor}: empty matrix")));
        }
        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(VizError::FrameDecode(format!("sensor {sensor}: ragged rows")));
        }
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mapping_of_sensor_to_rows() {
        let frame = decode_frame(r#"{"1": [[0.0, 0.5], [1.0, 0.25]]}"#).unwrap();
        assert_eq!(frame[&SensorId::from("1")], vec![vec![0.0, 0.5], vec![1.0, 0.25]]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            decode_frame("not json"),
            Err(VizError::FrameDecode(_))
        ));
        assert!(matches!(
            decode_frame(r#"{"1": "oops"}"#),
            Err(VizError::FrameDecode(_))
        ));
    }

    #[test]
    fn ragged_and_empty_matrices_are_rejected() {
        assert!(decode_frame(r#"{"1": [[1.0, 2.0], [3.0]]}"#).is_err());
        assert!(decode_frame(r#"{"1": []}"#).is_err());
        assert!(decode_frame(r#"{"1": [[]]}"#).is_err());
    }
}
