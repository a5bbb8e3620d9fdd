use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use crate::use_cases::errors::UseCaseError;

#[derive(Clone)]
pub struct GetOrderUseCase<R: OrderRepository> {
	order_repo: R,
}

impl<R: OrderRepository> GetOrderUseCase<R> {
	pub fn new(order_repo: R) -> Self {
		Self { order_repo }
	}

	pub async fn execute(&self, order_id: &str) -> Result<Order, UseCaseError> {
		self.order_repo
			.get(order_id)
			.await
			.ok_or_else(|| UseCaseError::OrderNotFound {
				order_id: order_id.to_string(),
			})
	}
}
