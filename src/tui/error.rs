use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Key binding error: {0}")]
    KeyBindingError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),
}
