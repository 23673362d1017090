use serde::{Deserialize, Serialize};

use super::controller::{Action, Observation};

/// One recorded decision: what a bird saw and what it did.
///
/// Field order matches the telemetry CSV columns
/// `bird_y,bird_velocity,pipe_x,pipe_height,action`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRow {
    pub bird_y: f32,
    pub bird_velocity: f32,
    pub pipe_x: i32,
    /// Gap top of the target pipe.
    pub pipe_height: i32,
    /// 0 = idle, 1 = jump.
    pub action: u8,
}

impl TelemetryRow {
    #[must_use]
    pub const fn new(observation: &Observation, action: Action) -> Self {
        Self {
            bird_y: observation.bird_y,
            bird_velocity: observation.bird_velocity,
            pipe_x: observation.pipe_x,
            pipe_height: observation.gap_top,
            action: action.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_observation() {
        let observation = Observation {
            bird_y: 312.5,
            bird_velocity: 4.5,
            pipe_x: 480,
            gap_top: 120,
            gap_bottom: 320,
        };
        let row = TelemetryRow::new(&observation, Action::Jump);
        assert_eq!(row.pipe_height, 120);
        assert_eq!(row.action, 1);

        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 5);
        assert_eq!(json["pipe_x"], 480);
        assert_eq!(json["bird_y"], 312.5);
    }
}
