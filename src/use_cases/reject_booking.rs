use crate::domain::gateway::GatewayRegistry;
use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use crate::use_cases::booking_transition::{BookingDecision, settle_booking};
use crate::use_cases::errors::UseCaseError;

/// Releases the hold of a preauthorized booking the stylist turned down.
#[derive(Clone)]
pub struct RejectBookingUseCase<R: OrderRepository> {
	order_repo: R,
	gateways:   GatewayRegistry,
}

impl<R: OrderRepository> RejectBookingUseCase<R> {
	pub fn new(order_repo: R, gateways: GatewayRegistry) -> Self {
		Self {
			order_repo,
			gateways,
		}
	}

	pub async fn execute(&self, order_id: &str) -> Result<Order, UseCaseError> {
		settle_booking(
			&self.order_repo,
			&self.gateways,
			order_id,
			BookingDecision::Reject,
		)
		.await
	}
}
