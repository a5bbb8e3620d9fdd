#![allow(dead_code)]

pub mod fake_gateway;
pub mod fake_processor;

use stylist_payments::domain::order::{Order, OrderState, Processor};
use stylist_payments::domain::repository::OrderRepository;
use stylist_payments::infrastructure::persistence::in_memory_order_repository::InMemoryOrderRepository;

pub fn new_order(order_id: &str, processor: Processor) -> Order {
	Order::new(
		order_id.to_string(),
		processor,
		"Stylist: Ganna".to_string(),
		45200,
		"USD".to_string(),
		"tim@blah.com".to_string(),
	)
}

/// Stores an order whose funds are already held by the processor.
pub async fn insert_preauthorized(
	repo: &InMemoryOrderRepository,
	order_id: &str,
	processor: Processor,
	reference: Option<&str>,
) -> Order {
	let mut order = new_order(order_id, processor).with_state(OrderState::Preauthorized);
	order.payment_reference = reference.map(str::to_string);
	repo.insert(order.clone()).await;
	order
}
