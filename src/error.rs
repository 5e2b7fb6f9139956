use std::{fmt, io};

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError as UrlParseError;

use serde_json::Error as JsonError;

#[cfg(feature = "wasm")]
use serde_wasm_bindgen::Error as WasmError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum BrowserError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("Fetch failed for {locator}: {message}")]
    Fetch { locator: String, message: String },
    #[error("Request for {locator} failed with HTTP status {status}")]
    Http { status: u16, locator: String },
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Linked data parse error: {0}")]
    Parse(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Could not schedule task: {0}")]
    Spawn(String),
}

impl BrowserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BrowserError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BrowserError::Custom(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BrowserError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            BrowserError::Http { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            BrowserError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BrowserError::NotFound(_) => StatusCode::NOT_FOUND,
            BrowserError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BrowserError::PermissionDenied => StatusCode::FORBIDDEN,
            BrowserError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BrowserError::Spawn(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user by error views.
    ///
    /// Variants carrying a message yield it verbatim; the others fall back to their display form.
    pub fn message(&self) -> String {
        match self {
            BrowserError::Config(msg)
            | BrowserError::Custom(msg)
            | BrowserError::Io(msg)
            | BrowserError::NotFound(msg)
            | BrowserError::Parse(msg)
            | BrowserError::Serialization(msg)
            | BrowserError::Spawn(msg) => msg.clone(),
            BrowserError::Fetch { message, .. } => message.clone(),
            BrowserError::Http { .. } | BrowserError::PermissionDenied => self.to_string(),
        }
    }

    /// Build the failure for a non-success HTTP response.
    pub fn from_status(status: u16, locator: &str) -> Self {
        match StatusCode::from_u16(status) {
            Ok(StatusCode::UNAUTHORIZED) | Ok(StatusCode::FORBIDDEN) => {
                BrowserError::PermissionDenied
            }
            Ok(StatusCode::NOT_FOUND) => BrowserError::NotFound(locator.to_string()),
            _ => BrowserError::Http {
                status,
                locator: locator.to_string(),
            },
        }
    }
}

impl From<toml::de::Error> for BrowserError {
    fn from(src: toml::de::Error) -> BrowserError {
        BrowserError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for BrowserError {
    fn from(src: toml::ser::Error) -> BrowserError {
        BrowserError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for BrowserError {
    fn from(src: JsonError) -> BrowserError {
        BrowserError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for BrowserError {
    fn from(src: UrlParseError) -> BrowserError {
        BrowserError::Serialization(format!("Invalid URL: {src}"))
    }
}

impl From<io::Error> for BrowserError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => BrowserError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => BrowserError::PermissionDenied,
            _ => BrowserError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for BrowserError {
    fn from(x: fmt::Error) -> Self {
        BrowserError::Serialization(format!("{x}"))
    }
}

#[cfg(feature = "wasm")]
impl From<WasmError> for BrowserError {
    fn from(wasm_error: WasmError) -> Self {
        BrowserError::Serialization(format!("Serde-wasm-bindgen error: {wasm_error}"))
    }
}
