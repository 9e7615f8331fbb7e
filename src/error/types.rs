use thiserror::Error;

use crate::logging::LoggingError;
use crate::scene::NodeId;

/// Unified result type for the frame crate.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors surfaced by the screen layers and their collaborators.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("screen `{id}` is not registered to the {layer} layer")]
    ScreenNotFound { layer: &'static str, id: String },
    #[error("hide requested on window `{requested}` but the current one is {}", .current.as_deref().unwrap_or("none"))]
    NotCurrentWindow {
        requested: String,
        current: Option<String>,
    },
    #[error("screen `{0}` is not a window")]
    NotAWindow(String),
    #[error("screen `{0}` is not a panel")]
    NotAPanel(String),
    #[error("frame is missing its {0}")]
    MissingCollaborator(&'static str),
    #[error("scene node {0} not found")]
    NodeNotFound(NodeId),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("settings serialization error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("log sink error: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
