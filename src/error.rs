use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("GEMINI_API_KEY is not set: the extraction client cannot start without it")]
    MissingApiKey,

    #[error("Gemini API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("No exchange rate for {currency} in {year}")]
    MissingRate { currency: String, year: i32 },

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, StatementError>;
