use thiserror::Error;

#[derive(Error, Debug)]
pub enum LitrevError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("HTTP error {status} from {url}")]
    Http { status: u16, url: String },
}

impl From<reqwest::Error> for LitrevError {
    fn from(error: reqwest::Error) -> Self {
        LitrevError::Reqwest(Box::new(error))
    }
}
