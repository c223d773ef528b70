use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Handler error. The message is sent back to the client as plain text.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(anyhow::Error),
}
impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) => message,
            Self::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                client_message(&err)
            }
        };
        (status, message).into_response()
    }
}

// the underlying storage message, without the context chain
fn client_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<rusqlite::Error>() {
        Some(sql) => sql.to_string(),
        None => err.root_cause().to_string(),
    }
}

// lets handlers use `?` on anything anyhow can wrap
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
