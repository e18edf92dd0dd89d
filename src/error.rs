use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("auth error: {0}")]
    Auth(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("label not found: `{0}`")]
    LabelNotFound(String),
    #[error("message {0} has no text/plain body")]
    MissingTextBody(String),
    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("message body is not valid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}
