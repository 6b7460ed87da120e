/// Everything that can go wrong while talking to the catalog API.
///
/// The UI does not distinguish between kinds; they only differ in the log.
#[derive(thiserror::Error, Debug)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("artwork decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type FetchResult<T> = Result<T, FetchFailure>;
