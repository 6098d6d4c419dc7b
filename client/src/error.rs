use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Protocol(#[from] sweephint_protocol::ProtocolError),
    #[error("Invalid client config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Cannot read client config: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, ClientError>;
