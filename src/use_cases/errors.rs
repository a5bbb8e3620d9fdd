use derive_more::derive::{Display, Error};

use crate::domain::gateway::{Decline, GatewayError};
use crate::domain::order::{LifecycleError, Processor};
use crate::domain::repository::RepositoryError;

#[derive(Debug, Display, Error)]
pub enum UseCaseError {
	#[display("Order {order_id} not found")]
	OrderNotFound { order_id: String },
	#[display("Order {order_id} {reason}")]
	InvalidTransition {
		order_id: String,
		reason:   LifecycleError,
	},
	#[display("{processor} declined the request: {}", decline.message)]
	Declined {
		processor: Processor,
		decline:   Decline,
	},
	#[display("{_0}")]
	Gateway(GatewayError),
	#[display("{_0}")]
	Repository(RepositoryError),
	#[display("No {processor} gateway is configured")]
	ProcessorUnavailable { processor: Processor },
	#[display("{_0}")]
	InvalidRequest(#[error(not(source))] String),
}

impl From<GatewayError> for UseCaseError {
	fn from(err: GatewayError) -> Self {
		UseCaseError::Gateway(err)
	}
}

impl From<RepositoryError> for UseCaseError {
	fn from(err: RepositoryError) -> Self {
		match err {
			RepositoryError::NotFound { order_id } => {
				UseCaseError::OrderNotFound { order_id }
			}
			other => UseCaseError::Repository(other),
		}
	}
}
