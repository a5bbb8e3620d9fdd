use async_trait::async_trait;
use derive_more::derive::{Display, Error};

use crate::domain::order::Order;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RepositoryError {
	#[display("Order {order_id} not found")]
	NotFound { order_id: String },
	#[display(
		"Order {order_id} changed concurrently (expected version {expected}, \
		 found {found})"
	)]
	VersionConflict {
		order_id: String,
		expected: u64,
		found:    u64,
	},
}

/// Authoritative view of the orders created during this run.
///
/// Every write replaces the whole record. Callers carry the fields they want
/// to keep forward themselves.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
	/// Stores `order`, overwriting any record with the same id. An
	/// overwrite bumps the stored version.
	async fn insert(&self, order: Order);
	/// Replaces the record with the same id and bumps its version. Last
	/// write wins.
	async fn update(&self, order: Order);
	async fn get(&self, order_id: &str) -> Option<Order>;
	/// Replaces the record only if its stored version is still
	/// `expected_version`; the stored copy gets the next version, which is
	/// also returned.
	async fn compare_and_swap(
		&self,
		order: Order,
		expected_version: u64,
	) -> Result<Order, RepositoryError>;
}
