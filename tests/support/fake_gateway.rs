use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use stylist_payments::domain::gateway::{
	Checkout, Decline, GatewayError, GatewayReply, PaymentGateway,
};
use stylist_payments::domain::order::{Order, Processor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
	Approve,
	Decline,
	Unreachable,
}

/// Gateway that answers from a script and counts how often it was called.
pub struct FakeGateway {
	processor:          Processor,
	behavior:           Mutex<Behavior>,
	reference:          Option<String>,
	latency:            Duration,
	preauthorize_calls: AtomicUsize,
	capture_calls:      AtomicUsize,
	refund_calls:       AtomicUsize,
}

impl FakeGateway {
	pub fn new(processor: Processor) -> Arc<Self> {
		Self::build(processor, None, Duration::ZERO)
	}

	/// Checkout carries a processor reference, like a Stripe payment intent.
	pub fn with_reference(processor: Processor, reference: &str) -> Arc<Self> {
		Self::build(processor, Some(reference.to_string()), Duration::ZERO)
	}

	/// Capture and refund take `latency` before answering.
	pub fn slow(processor: Processor, latency: Duration) -> Arc<Self> {
		Self::build(processor, None, latency)
	}

	fn build(
		processor: Processor,
		reference: Option<String>,
		latency: Duration,
	) -> Arc<Self> {
		Arc::new(Self {
			processor,
			behavior: Mutex::new(Behavior::Approve),
			reference,
			latency,
			preauthorize_calls: AtomicUsize::new(0),
			capture_calls: AtomicUsize::new(0),
			refund_calls: AtomicUsize::new(0),
		})
	}

	pub fn set_behavior(&self, behavior: Behavior) {
		*self.behavior.lock().unwrap() = behavior;
	}

	pub fn preauthorize_calls(&self) -> usize {
		self.preauthorize_calls.load(Ordering::SeqCst)
	}

	pub fn capture_calls(&self) -> usize {
		self.capture_calls.load(Ordering::SeqCst)
	}

	pub fn refund_calls(&self) -> usize {
		self.refund_calls.load(Ordering::SeqCst)
	}

	pub fn remote_calls(&self) -> usize {
		self.preauthorize_calls() + self.capture_calls() + self.refund_calls()
	}

	pub fn decline_body() -> Value {
		json!({
			"response": {
				"response_status": "failure",
				"error_code": 1013,
				"error_message": "Duplicate order_id for merchant"
			}
		})
	}

	fn answer<T>(&self, order: &Order, approved: T) -> Result<GatewayReply<T>, GatewayError> {
		match *self.behavior.lock().unwrap() {
			Behavior::Approve => Ok(GatewayReply::Approved(approved)),
			Behavior::Decline => Ok(GatewayReply::Declined(Decline {
				code:    Some("1013".to_string()),
				message: "Duplicate order_id for merchant".to_string(),
				body:    Self::decline_body(),
			})),
			Behavior::Unreachable => Err(GatewayError::Transport(format!(
				"connection refused while handling {}",
				order.id
			))),
		}
	}
}

#[async_trait]
impl PaymentGateway for FakeGateway {
	fn processor(&self) -> Processor {
		self.processor
	}

	async fn preauthorize(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Checkout>, GatewayError> {
		self.preauthorize_calls.fetch_add(1, Ordering::SeqCst);
		self.answer(order, Checkout {
			url:       format!("https://pay.example/checkout/{}", order.id),
			reference: self.reference.clone(),
		})
	}

	async fn capture(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError> {
		self.capture_calls.fetch_add(1, Ordering::SeqCst);
		tokio::time::sleep(self.latency).await;
		self.answer(order, json!({"order_id": order.id, "capture_status": "captured"}))
	}

	async fn refund(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError> {
		self.refund_calls.fetch_add(1, Ordering::SeqCst);
		tokio::time::sleep(self.latency).await;
		self.answer(order, json!({"order_id": order.id, "reverse_status": "approved"}))
	}
}
