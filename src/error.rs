use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("scenario holds at most {capacity} actions")]
    ScenarioFull { capacity: usize },

    #[error("action scheduled for tick {at_tick} but the simulation is already at tick {current_tick}")]
    ScenarioInPast { at_tick: u64, current_tick: u64 },
}
