use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use log::debug;

use crate::domain::order::Order;
use crate::domain::repository::{OrderRepository, RepositoryError};

/// Process-lifetime order store shared by every worker. Nothing survives a
/// restart.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
	orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderRepository {
	pub fn new() -> Self {
		Self::default()
	}

	/// Overwrites keep the version moving forward so that a writer holding
	/// the previous version loses its compare-and-swap.
	fn store(&self, mut order: Order) {
		let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
		if let Some(stored) = orders.get(&order.id) {
			order.version = stored.version + 1;
		}
		debug!(
			"Storing order {} as {} (version {})",
			order.id, order.state, order.version
		);
		orders.insert(order.id.clone(), order);
	}
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
	async fn insert(&self, order: Order) {
		self.store(order);
	}

	async fn update(&self, order: Order) {
		self.store(order);
	}

	async fn get(&self, order_id: &str) -> Option<Order> {
		let orders = self.orders.read().unwrap_or_else(PoisonError::into_inner);
		orders.get(order_id).cloned()
	}

	async fn compare_and_swap(
		&self,
		mut order: Order,
		expected_version: u64,
	) -> Result<Order, RepositoryError> {
		let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);

		let Some(stored) = orders.get(&order.id) else {
			return Err(RepositoryError::NotFound { order_id: order.id });
		};
		if stored.version != expected_version {
			return Err(RepositoryError::VersionConflict {
				order_id: order.id,
				expected: expected_version,
				found:    stored.version,
			});
		}

		order.version = expected_version + 1;
		debug!(
			"Order {} moved to {} (version {})",
			order.id, order.state, order.version
		);
		orders.insert(order.id.clone(), order.clone());
		Ok(order)
	}
}
