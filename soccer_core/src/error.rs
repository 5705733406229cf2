use thiserror::Error;

/// Failures at the boundary where external input enters the simulation.
///
/// The frame loop itself never fails; these only come out of configuration,
/// team and catalog loading.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("buff `{key}` uses unknown effect template `{template}`")]
    UnknownTemplate { key: String, template: String },

    #[error("buff `{0}` is already in the catalog")]
    DuplicateBuff(String),

    #[error("buff `{0}` names neither a mechanic nor an effect template")]
    MissingMechanic(String),

    #[error("invalid team descriptor: {0}")]
    InvalidTeam(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
