use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),

    #[error("unknown option '{option}' for question '{question}'")]
    UnknownOption { question: String, option: String },

    #[error("answer to '{question}' has value {value}, expected 1-4")]
    InvalidAnswerValue { question: String, value: u8 },

    #[error("unknown portfolio '{0}'")]
    UnknownPortfolio(String),

    #[error("questionnaire incomplete, {} question(s) unanswered: {}", .0.len(), .0.join(", "))]
    IncompleteAnswers(Vec<String>),

    #[error("profile store returned {status}: {body}")]
    Store { status: u16, body: String },

    #[error("profile store API key contains invalid header characters")]
    InvalidApiKey,

    #[error("invalid profile store URL '{0}'")]
    InvalidStoreUrl(String),

    #[error("invalid user id '{0}'")]
    InvalidUserId(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
