use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to fetch timetable page: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("timetable page returned status {0}")]
    UpstreamStatus(StatusCode),

    #[error("failed to read timetable page body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("unrecognised time of day: {0:?}")]
    InvalidTime(String),

    #[error("class time range {start} - {end} is empty or inverted")]
    TimeRange { start: String, end: String },

    #[error("invalid timetable page url: {0}")]
    InvalidSourceUrl(#[from] url::ParseError),

    #[error("invalid table mapping: {0}")]
    InvalidMapping(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fetch(_) | Self::UpstreamStatus(_) | Self::Body(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidTime(_)
            | Self::TimeRange { .. }
            | Self::InvalidSourceUrl(_)
            | Self::InvalidMapping(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = match self.status() {
            StatusCode::BAD_GATEWAY => "Timetable source unavailable",
            _ => "Failed to build calendar",
        };

        (self.status(), body).into_response()
    }
}
