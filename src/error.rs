pub type Result<T> = std::result::Result<T, ToasterError>;

/// Failures from the host side: windows, terminals, files. The render core itself never fails.
#[derive(thiserror::Error, Debug)]
pub enum ToasterError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("window error: {0}")]
    Window(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl ToasterError {
    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }
}

impl From<minifb::Error> for ToasterError {
    fn from(e: minifb::Error) -> Self {
        Self::Window(e.to_string())
    }
}
