use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::gateway::{Decline, GatewayError, GatewayReply};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StripeApiError {
	#[serde(rename = "type", default)]
	pub kind:    Option<String>,
	#[serde(default)]
	pub code:    Option<String>,
	#[serde(default)]
	pub message: Option<String>,
}

/// A Stripe answer: the requested object, or the `{"error": {...}}` body.
#[derive(Debug, Clone, PartialEq)]
pub enum StripeReply<T> {
	Ok(T),
	Err { error: StripeApiError, body: Value },
}

impl<T: DeserializeOwned> StripeReply<T> {
	pub fn from_body(body: Value) -> Result<Self, GatewayError> {
		if let Some(error) = body.get("error") {
			let error = serde_json::from_value(error.clone())
				.map_err(|e| GatewayError::Decode(e.to_string()))?;
			return Ok(StripeReply::Err { error, body });
		}

		serde_json::from_value(body)
			.map(StripeReply::Ok)
			.map_err(|e| GatewayError::Decode(e.to_string()))
	}
}

impl<T> StripeReply<T> {
	pub fn into_result(self) -> Result<T, Decline> {
		match self {
			StripeReply::Ok(value) => Ok(value),
			StripeReply::Err { error, body } => Err(Decline {
				code: error.code.or(error.kind),
				message: error
					.message
					.unwrap_or_else(|| "Unknown Stripe error".to_string()),
				body,
			}),
		}
	}

	pub fn into_gateway_reply(self) -> GatewayReply<T> {
		match self.into_result() {
			Ok(value) => GatewayReply::Approved(value),
			Err(decline) => GatewayReply::Declined(decline),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct List<T> {
	pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Requirements {
	#[serde(default)]
	pub currently_due: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PayoutSchedule {
	#[serde(default)]
	pub interval: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PayoutSettings {
	#[serde(default)]
	pub schedule: Option<PayoutSchedule>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AccountSettings {
	#[serde(default)]
	pub payouts: Option<PayoutSettings>,
}

/// Connected (express) account of a stylist.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Account {
	pub id:              String,
	#[serde(default)]
	pub email:           Option<String>,
	#[serde(default)]
	pub country:         Option<String>,
	#[serde(default)]
	pub charges_enabled: bool,
	#[serde(default)]
	pub payouts_enabled: bool,
	#[serde(default)]
	pub requirements:    Option<Requirements>,
	#[serde(default)]
	pub settings:        Option<AccountSettings>,
}

impl Account {
	/// Nothing left for the stylist to fill in.
	pub fn is_onboarded(&self) -> bool {
		self.requirements
			.as_ref()
			.is_none_or(|requirements| requirements.currently_due.is_empty())
	}

	pub fn payout_interval(&self) -> Option<&str> {
		self.settings
			.as_ref()?
			.payouts
			.as_ref()?
			.schedule
			.as_ref()?
			.interval
			.as_deref()
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccountLink {
	pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoginLink {
	pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentIntent {
	pub id:       String,
	pub status:   String,
	pub amount:   i64,
	pub currency: String,
	#[serde(default)]
	pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheckoutSession {
	pub id:             String,
	#[serde(default)]
	pub url:            Option<String>,
	#[serde(default)]
	pub payment_intent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventData {
	pub object: Value,
}

/// Raw webhook payload; `kind` is the `type` discriminator.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StripeEvent {
	#[serde(default)]
	pub id:   Option<String>,
	#[serde(rename = "type")]
	pub kind: String,
	pub data: EventData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookNotification {
	Preauthorized {
		order_id:       String,
		payment_intent: Option<String>,
	},
	Ignored {
		kind: String,
	},
}

impl StripeEvent {
	pub fn notification(&self) -> WebhookNotification {
		let object = &self.data.object;
		let order_id = object
			.get("metadata")
			.and_then(|metadata| metadata.get("order_id"))
			.and_then(Value::as_str);

		let payment_intent = match self.kind.as_str() {
			"checkout.session.completed" => {
				object.get("payment_intent").and_then(Value::as_str)
			}
			"payment_intent.amount_capturable_updated" => {
				object.get("id").and_then(Value::as_str)
			}
			_ => {
				return WebhookNotification::Ignored {
					kind: self.kind.clone(),
				};
			}
		};

		match order_id {
			Some(order_id) => WebhookNotification::Preauthorized {
				order_id:       order_id.to_string(),
				payment_intent: payment_intent.map(str::to_string),
			},
			None => WebhookNotification::Ignored {
				kind: self.kind.clone(),
			},
		}
	}
}
