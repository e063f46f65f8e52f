use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use serde_json::json;

/// Terminal failures of the submission endpoint. Each variant maps to the
/// exact status and JSON body the browser form expects.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum ContactError {
    #[display("Method not allowed")]
    MethodNotAllowed,

    #[display("Missing fields")]
    MissingFields,

    #[display("Bot verification failed")]
    BotVerificationFailed,

    #[display("Too many requests")]
    TooManyRequests,

    #[display("Failed to send email")]
    EmailDispatch,
}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({ "error": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ContactError::MissingFields => StatusCode::BAD_REQUEST,
            ContactError::BotVerificationFailed => StatusCode::FORBIDDEN,
            ContactError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ContactError::EmailDispatch => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Invalid message: {_0}")]
    Message(String),

    #[display("SMTP transport error: {_0}")]
    Transport(String),
}

impl From<MailError> for ContactError {
    fn from(err: MailError) -> Self {
        tracing::error!("mail dispatch failed: {}", err);
        ContactError::EmailDispatch
    }
}
