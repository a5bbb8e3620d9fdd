use log::{info, warn};
use uuid::Uuid;

use crate::domain::gateway::{GatewayRegistry, GatewayReply};
use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use crate::use_cases::dto::{CreateOrderCommand, CreatedOrder};
use crate::use_cases::errors::UseCaseError;

#[derive(Clone)]
pub struct CreateOrderUseCase<R: OrderRepository> {
	order_repo: R,
	gateways:   GatewayRegistry,
}

impl<R: OrderRepository> CreateOrderUseCase<R> {
	pub fn new(order_repo: R, gateways: GatewayRegistry) -> Self {
		Self {
			order_repo,
			gateways,
		}
	}

	/// Records the order, then asks its processor for a preauthorization
	/// checkout. The order stays `created` until the processor calls back.
	pub async fn execute(
		&self,
		command: CreateOrderCommand,
	) -> Result<CreatedOrder, UseCaseError> {
		validate(&command)?;

		let gateway = self.gateways.get(command.processor).ok_or(
			UseCaseError::ProcessorUnavailable {
				processor: command.processor,
			},
		)?;

		let order_id = command
			.order_id
			.unwrap_or_else(|| Uuid::new_v4().to_string());
		let mut order = Order::new(
			order_id,
			command.processor,
			command.description,
			command.amount,
			command.currency.to_uppercase(),
			command.email,
		);
		order.stylist_account = command.stylist_account;

		self.order_repo.insert(order.clone()).await;
		info!("Order {} created for {}", order.id, order.processor);

		match gateway.preauthorize(&order).await? {
			GatewayReply::Approved(checkout) => {
				if let Some(reference) = &checkout.reference {
					let mut referenced = order.clone();
					referenced.payment_reference = Some(reference.clone());
					order = self
						.order_repo
						.compare_and_swap(referenced, order.version)
						.await?;
				}
				info!("Order {} awaits checkout at {}", order.id, checkout.url);
				Ok(CreatedOrder { order, checkout })
			}
			GatewayReply::Declined(decline) => {
				warn!(
					"{} refused checkout for order {}: {}",
					order.processor, order.id, decline.message
				);
				Err(UseCaseError::Declined {
					processor: order.processor,
					decline,
				})
			}
		}
	}
}

fn validate(command: &CreateOrderCommand) -> Result<(), UseCaseError> {
	if command.amount <= 0 {
		return Err(UseCaseError::InvalidRequest(
			"amount must be a positive number of minor units".to_string(),
		));
	}
	if command.currency.len() != 3 ||
		!command.currency.chars().all(|c| c.is_ascii_alphabetic())
	{
		return Err(UseCaseError::InvalidRequest(
			"currency must be a three letter code".to_string(),
		));
	}
	if command.description.trim().is_empty() {
		return Err(UseCaseError::InvalidRequest(
			"description must not be empty".to_string(),
		));
	}
	if command.order_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
		return Err(UseCaseError::InvalidRequest(
			"order_id must not be empty".to_string(),
		));
	}
	Ok(())
}
