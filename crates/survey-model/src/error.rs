use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty dataset: {0}")]
    EmptyDataset(String),
    #[error("invalid respondent id: {0:?}")]
    InvalidRespondentId(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
