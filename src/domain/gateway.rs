use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use serde::Serialize;
use serde_json::Value;

use crate::domain::order::{Order, Processor};

/// Page the client is sent to for authorizing the hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkout {
	pub url:       String,
	/// Processor-side id known before the client pays, if any.
	pub reference: Option<String>,
}

/// Business refusal reported by a processor, kept verbatim for the operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decline {
	pub code:    Option<String>,
	pub message: String,
	pub body:    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReply<T> {
	Approved(T),
	Declined(Decline),
}

#[derive(Debug, Display, Error)]
pub enum GatewayError {
	#[display("Processor unreachable: {_0}")]
	Transport(#[error(not(source))] String),
	#[display("Unreadable processor response: {_0}")]
	Decode(#[error(not(source))] String),
	#[display("Order {order_id} has no payment reference")]
	MissingPaymentReference { order_id: String },
}

/// One payment processor, seen from the order lifecycle.
///
/// Each call is a single round trip. Nothing is retried.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
	fn processor(&self) -> Processor;

	/// Starts a hold on the client's funds for `order`.
	async fn preauthorize(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Checkout>, GatewayError>;

	/// Turns the hold on `order` into a funds transfer.
	async fn capture(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError>;

	/// Releases the hold on `order`.
	async fn refund(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError>;
}

#[derive(Clone, Default)]
pub struct GatewayRegistry {
	gateways: HashMap<Processor, Arc<dyn PaymentGateway>>,
}

impl GatewayRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
		self.gateways.insert(gateway.processor(), gateway);
		self
	}

	pub fn get(&self, processor: Processor) -> Option<Arc<dyn PaymentGateway>> {
		self.gateways.get(&processor).cloned()
	}
}
