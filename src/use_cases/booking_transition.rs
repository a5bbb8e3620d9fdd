use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::domain::gateway::{GatewayRegistry, GatewayReply, PaymentGateway};
use crate::domain::order::{LifecycleError, Order, OrderState};
use crate::domain::repository::{OrderRepository, RepositoryError};
use crate::use_cases::errors::UseCaseError;

const MAX_ATTEMPTS: usize = 3;

/// Operator decision on a preauthorized booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BookingDecision {
	Accept,
	Reject,
}

impl BookingDecision {
	fn begin(self, state: OrderState) -> Result<OrderState, LifecycleError> {
		match self {
			BookingDecision::Accept => state.begin_capture(),
			BookingDecision::Reject => state.begin_refund(),
		}
	}

	fn verb(self) -> &'static str {
		match self {
			BookingDecision::Accept => "capture",
			BookingDecision::Reject => "refund",
		}
	}
}

/// Drives `preauthorized -> capturing|refunding -> captured|refunded`.
///
/// The order is parked in the in-flight state before the processor is
/// called, so a concurrent decision on the same order is refused instead of
/// reaching the processor a second time.
pub(crate) async fn settle_booking<R: OrderRepository>(
	order_repo: &R,
	gateways: &GatewayRegistry,
	order_id: &str,
	decision: BookingDecision,
) -> Result<Order, UseCaseError> {
	let (pending, gateway) =
		park(order_repo, gateways, order_id, decision).await?;

	info!("Order {} is {}", pending.id, pending.state);
	let reply = match decision {
		BookingDecision::Accept => gateway.capture(&pending).await,
		BookingDecision::Reject => gateway.refund(&pending).await,
	};

	match reply {
		Ok(GatewayReply::Approved(body)) => {
			debug!("{} {} answer: {body}", pending.processor, decision.verb());
			let done = pending.state.complete().map_err(|reason| {
				UseCaseError::InvalidTransition {
					order_id: pending.id.clone(),
					reason,
				}
			})?;
			let settled = order_repo
				.compare_and_swap(pending.with_state(done), pending.version)
				.await?;
			info!("Order {} {}", settled.id, settled.state);
			Ok(settled)
		}
		Ok(GatewayReply::Declined(decline)) => {
			warn!(
				"{} refused to {} order {}: {}",
				pending.processor,
				decision.verb(),
				pending.id,
				decline.message
			);
			restore(order_repo, &pending).await;
			Err(UseCaseError::Declined {
				processor: pending.processor,
				decline,
			})
		}
		Err(err) => {
			error!("Could not {} order {}: {err}", decision.verb(), pending.id);
			restore(order_repo, &pending).await;
			Err(err.into())
		}
	}
}

/// Moves the order into its in-flight state, re-reading on concurrent
/// writes.
async fn park<R: OrderRepository>(
	order_repo: &R,
	gateways: &GatewayRegistry,
	order_id: &str,
	decision: BookingDecision,
) -> Result<(Order, Arc<dyn PaymentGateway>), UseCaseError> {
	let mut last_error = None;

	for _ in 0..MAX_ATTEMPTS {
		let order = order_repo.get(order_id).await.ok_or_else(|| {
			UseCaseError::OrderNotFound {
				order_id: order_id.to_string(),
			}
		})?;
		let gateway = gateways.get(order.processor).ok_or(
			UseCaseError::ProcessorUnavailable {
				processor: order.processor,
			},
		)?;

		let state = decision.begin(order.state).map_err(|reason| {
			warn!("Refusing to {} order {order_id}: {reason}", decision.verb());
			UseCaseError::InvalidTransition {
				order_id: order_id.to_string(),
				reason,
			}
		})?;

		match order_repo
			.compare_and_swap(order.with_state(state), order.version)
			.await
		{
			Ok(parked) => return Ok((parked, gateway)),
			Err(err @ RepositoryError::VersionConflict { .. }) => {
				warn!("{err}, retrying");
				last_error = Some(err);
			}
			Err(err) => return Err(err.into()),
		}
	}

	Err(last_error.map(UseCaseError::from).unwrap_or_else(|| {
		UseCaseError::OrderNotFound {
			order_id: order_id.to_string(),
		}
	}))
}

/// Puts a parked order back to `preauthorized` after a failed call.
async fn restore<R: OrderRepository>(order_repo: &R, pending: &Order) {
	let Ok(state) = pending.state.abort() else {
		return;
	};
	if let Err(err) = order_repo
		.compare_and_swap(pending.with_state(state), pending.version)
		.await
	{
		error!("Could not restore order {}: {err}", pending.id);
	}
}
