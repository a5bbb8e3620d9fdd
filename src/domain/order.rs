use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Processor {
	#[display("fondy")]
	Fondy,
	#[display("stripe")]
	Stripe,
}

/// Where an order is in its payment lifecycle.
///
/// `Capturing` and `Refunding` are held while the processor call for the
/// transition is pending, so a second action on the same order is refused
/// instead of reaching the processor twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
	#[display("created")]
	Created,
	#[display("preauthorized")]
	Preauthorized,
	#[display("capturing")]
	Capturing,
	#[display("refunding")]
	Refunding,
	#[display("captured")]
	Captured,
	#[display("refunded")]
	Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum LifecycleError {
	#[display("is not preauthorized")]
	NotPreauthorized,
	#[display("is already {state}")]
	Finalized { state: OrderState },
	#[display("is currently {state}")]
	InFlight { state: OrderState },
}

impl OrderState {
	pub fn is_final(self) -> bool {
		matches!(self, OrderState::Captured | OrderState::Refunded)
	}

	fn refusal(self) -> LifecycleError {
		match self {
			OrderState::Created => LifecycleError::NotPreauthorized,
			OrderState::Capturing | OrderState::Refunding => {
				LifecycleError::InFlight { state: self }
			}
			_ => LifecycleError::Finalized { state: self },
		}
	}

	/// Processor confirmed the hold. Repeated confirmations are accepted.
	pub fn preauthorize(self) -> Result<OrderState, LifecycleError> {
		match self {
			OrderState::Created | OrderState::Preauthorized => {
				Ok(OrderState::Preauthorized)
			}
			other => Err(other.refusal()),
		}
	}

	pub fn begin_capture(self) -> Result<OrderState, LifecycleError> {
		match self {
			OrderState::Preauthorized => Ok(OrderState::Capturing),
			other => Err(other.refusal()),
		}
	}

	pub fn begin_refund(self) -> Result<OrderState, LifecycleError> {
		match self {
			OrderState::Preauthorized => Ok(OrderState::Refunding),
			other => Err(other.refusal()),
		}
	}

	/// The pending processor call succeeded.
	pub fn complete(self) -> Result<OrderState, LifecycleError> {
		match self {
			OrderState::Capturing => Ok(OrderState::Captured),
			OrderState::Refunding => Ok(OrderState::Refunded),
			other => Err(other.refusal()),
		}
	}

	/// The pending processor call failed or was declined; the hold stays.
	pub fn abort(self) -> Result<OrderState, LifecycleError> {
		match self {
			OrderState::Capturing | OrderState::Refunding => {
				Ok(OrderState::Preauthorized)
			}
			other => Err(other.refusal()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Order {
	pub id:                String,
	pub processor:         Processor,
	pub description:       String,
	/// Minor currency units.
	pub amount:            i64,
	pub currency:          String,
	pub email:             String,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub stylist_account:   Option<String>,
	pub state:             OrderState,
	/// Fondy rectoken or Stripe payment intent id.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub payment_reference: Option<String>,
	pub version:           u64,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at:        OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at:        OffsetDateTime,
}

impl Order {
	pub fn new(
		id: String,
		processor: Processor,
		description: String,
		amount: i64,
		currency: String,
		email: String,
	) -> Self {
		let now = OffsetDateTime::now_utc();
		Self {
			id,
			processor,
			description,
			amount,
			currency,
			email,
			stylist_account: None,
			state: OrderState::Created,
			payment_reference: None,
			version: 0,
			created_at: now,
			updated_at: now,
		}
	}

	/// Copy of this order in `state`, ready to replace the stored record.
	pub fn with_state(&self, state: OrderState) -> Self {
		Self {
			state,
			updated_at: OffsetDateTime::now_utc(),
			..self.clone()
		}
	}

	pub fn is_preauthorized(&self) -> bool {
		self.state != OrderState::Created
	}

	pub fn is_captured(&self) -> bool {
		self.state == OrderState::Captured
	}

	pub fn is_refunded(&self) -> bool {
		self.state == OrderState::Refunded
	}
}
