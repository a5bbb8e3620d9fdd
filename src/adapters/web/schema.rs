use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::domain::order::{Order, OrderState, Processor};
use crate::use_cases::dto::{CreateOrderCommand, PreauthorizationNotice};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateOrderRequest {
	#[serde(default)]
	pub order_id:        Option<String>,
	pub processor:       Processor,
	pub description:     String,
	pub amount:          i64,
	pub currency:        String,
	pub email:           String,
	#[serde(default)]
	pub stylist_account: Option<String>,
}

impl From<CreateOrderRequest> for CreateOrderCommand {
	fn from(request: CreateOrderRequest) -> Self {
		CreateOrderCommand {
			order_id:        request.order_id,
			processor:       request.processor,
			description:     request.description,
			amount:          request.amount,
			currency:        request.currency,
			email:           request.email,
			stylist_account: request.stylist_account,
		}
	}
}

/// Order as shown to operators, with the lifecycle flags spelled out.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OrderView {
	pub order_id:          String,
	pub processor:         Processor,
	pub description:       String,
	pub amount:            i64,
	pub currency:          String,
	pub email:             String,
	pub state:             OrderState,
	pub preauth:           bool,
	pub captured:          bool,
	pub refunded:          bool,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub payment_reference: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub stylist_account:   Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at:        OffsetDateTime,
}

impl From<&Order> for OrderView {
	fn from(order: &Order) -> Self {
		OrderView {
			order_id:          order.id.clone(),
			processor:         order.processor,
			description:       order.description.clone(),
			amount:            order.amount,
			currency:          order.currency.clone(),
			email:             order.email.clone(),
			state:             order.state,
			preauth:           order.is_preauthorized(),
			captured:          order.is_captured(),
			refunded:          order.is_refunded(),
			payment_reference: order.payment_reference.clone(),
			stylist_account:   order.stylist_account.clone(),
			updated_at:        order.updated_at,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreateOrderResponse {
	pub order:        OrderView,
	pub checkout_url: String,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<String>::deserialize(deserializer)?;
	Ok(value.filter(|value| !value.is_empty()))
}

/// The part of Fondy's server callback the order lifecycle needs. Fondy
/// posts many more fields; they are only logged.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FondyCallback {
	pub order_id:     String,
	#[serde(default, deserialize_with = "empty_as_none")]
	pub rectoken:     Option<String>,
	#[serde(default, deserialize_with = "empty_as_none")]
	pub order_status: Option<String>,
}

impl From<FondyCallback> for PreauthorizationNotice {
	fn from(callback: FondyCallback) -> Self {
		PreauthorizationNotice {
			order_id:          callback.order_id,
			payment_reference: callback.rectoken,
			status:            callback.order_status,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PayoutRequest {
	pub description:  String,
	pub amount:       i64,
	pub currency:     String,
	#[serde(default)]
	pub rectoken:     Option<String>,
	#[serde(default)]
	pub card_number:  Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StylistForm {
	pub email:   String,
	pub country: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SuccessQuery {
	#[serde(default)]
	pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WebhookAck {
	pub received: bool,
}
