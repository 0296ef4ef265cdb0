use thiserror::Error;

/// Failures talking to the XRPC service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} returned {status}: {message}")]
    Status {
        method: String,
        status: u16,
        /// XRPC error name, e.g. `ExpiredToken`.
        error: Option<String>,
        message: String,
    },

    #[error("failed to decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed record uri: {0}")]
    MalformedUri(String),
}

#[derive(Debug, Error)]
pub enum Error {
    /// A paginated read failed. `what` names the collection ("follows",
    /// "lists") or the list whose members were being fetched.
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: ApiError,
    },

    #[error("{handle} is not in list {list_uri}")]
    NotMember { handle: String, list_uri: String },

    #[error("login failed: {0}")]
    Login(#[source] ApiError),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn fetch(what: impl Into<String>, source: ApiError) -> Self {
        Error::Fetch {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
