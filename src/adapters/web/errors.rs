use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, error};
use derive_more::derive::{Display, Error};
use serde::Serialize;
use serde_json::Value;

use crate::domain::gateway::GatewayError;
use crate::domain::repository::RepositoryError;
use crate::use_cases::errors::UseCaseError;

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
	#[serde(skip_serializing_if = "Option::is_none")]
	details:     Option<Value>,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("{_0}")]
	NotFound(#[error(not(source))] String),
	#[display("{_0}")]
	InvalidTransition(#[error(not(source))] String),
	#[display("{message}")]
	Declined { message: String, body: Value },
	#[display("{_0}")]
	BadGateway(#[error(not(source))] String),
	#[display("{_0}")]
	BadClientDataError(#[error(not(source))] String),
	#[display("{_0}")]
	ServiceUnavailable(#[error(not(source))] String),
	#[display("Internal server error.")]
	InternalServerError,
}

impl ApiError {
	pub fn name(&self) -> String {
		match self {
			ApiError::NotFound(_) => "Not Found".to_string(),
			ApiError::InvalidTransition(_) => "Conflict".to_string(),
			ApiError::Declined { .. } => "Unprocessable Entity".to_string(),
			ApiError::BadGateway(_) => "Bad Gateway".to_string(),
			ApiError::BadClientDataError(_) => "Bad request".to_string(),
			ApiError::ServiceUnavailable(_) => "Service Unavailable".to_string(),
			ApiError::InternalServerError => "Internal Server Error".to_string(),
		}
	}

	/// Processor body behind a decline, as received.
	pub fn details(&self) -> Option<&Value> {
		match self {
			ApiError::Declined { body, .. } => Some(body),
			_ => None,
		}
	}
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
				details:     self.details().cloned(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::NotFound(_) => StatusCode::NOT_FOUND,
			ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
			ApiError::Declined { .. } => StatusCode::UNPROCESSABLE_ENTITY,
			ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
			ApiError::BadClientDataError(_) => StatusCode::BAD_REQUEST,
			ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<UseCaseError> for ApiError {
	fn from(err: UseCaseError) -> Self {
		let message = err.to_string();
		match err {
			UseCaseError::OrderNotFound { .. } => ApiError::NotFound(message),
			UseCaseError::InvalidTransition { .. } |
			UseCaseError::Gateway(GatewayError::MissingPaymentReference { .. }) |
			UseCaseError::Repository(RepositoryError::VersionConflict { .. }) => {
				ApiError::InvalidTransition(message)
			}
			UseCaseError::Declined { decline, .. } => ApiError::Declined {
				message,
				body: decline.body,
			},
			UseCaseError::Gateway(_) => ApiError::BadGateway(message),
			UseCaseError::Repository(RepositoryError::NotFound { .. }) => {
				ApiError::NotFound(message)
			}
			UseCaseError::ProcessorUnavailable { .. } => {
				ApiError::ServiceUnavailable(message)
			}
			UseCaseError::InvalidRequest(_) => ApiError::BadClientDataError(message),
		}
	}
}
