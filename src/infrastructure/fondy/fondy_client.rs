use log::{info, warn};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::gateway::{Decline, GatewayError};
use crate::domain::order::Order;
use crate::domain::signature::{FieldValue, RequestFields, SignedRequest, sign};
use crate::infrastructure::http::remote_call::RemoteCallAdapter;

const SUCCESS_STATUS: &str = "success";

/// A merchant id together with the password its requests are signed with.
#[derive(Clone)]
pub struct FondyMerchant {
	pub merchant_id: String,
	pub password:    SecretString,
}

#[derive(Serialize)]
struct Envelope<'a> {
	request: &'a SignedRequest,
}

/// Body of a Fondy answer, split on `response_status`.
#[derive(Debug, Clone, PartialEq)]
pub enum FondyResponse {
	Success(Map<String, Value>),
	Failure(Decline),
}

impl FondyResponse {
	/// Reads the `{"response": {...}}` envelope every Fondy endpoint answers
	/// with.
	pub fn from_body(body: Value) -> Result<Self, GatewayError> {
		let Some(fields) = body.get("response").and_then(Value::as_object) else {
			return Err(GatewayError::Decode(format!(
				"Fondy answer has no response object: {body}"
			)));
		};

		if fields.get("response_status").and_then(Value::as_str) ==
			Some(SUCCESS_STATUS)
		{
			return Ok(FondyResponse::Success(fields.clone()));
		}

		let code = fields.get("error_code").map(|code| match code {
			Value::String(code) => code.clone(),
			other => other.to_string(),
		});
		let message = fields
			.get("error_message")
			.and_then(Value::as_str)
			.unwrap_or("Unknown Fondy error")
			.to_string();

		Ok(FondyResponse::Failure(Decline {
			code,
			message,
			body,
		}))
	}
}

/// Where a p2p credit lands.
#[derive(Debug, Clone, PartialEq)]
pub enum CreditTarget {
	Rectoken(String),
	Card(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct P2pCredit {
	pub order_id:    String,
	pub description: String,
	pub amount:      i64,
	pub currency:    String,
	pub target:      CreditTarget,
}

#[derive(Clone)]
pub struct FondyClient {
	remote:   RemoteCallAdapter,
	api_url:  String,
	merchant: FondyMerchant,
	credit:   FondyMerchant,
}

impl FondyClient {
	pub fn new(
		remote: RemoteCallAdapter,
		api_url: String,
		merchant: FondyMerchant,
		credit: FondyMerchant,
	) -> Self {
		Self {
			remote,
			api_url,
			merchant,
			credit,
		}
	}

	/// Hosted checkout page that holds the funds and issues a rectoken.
	pub async fn checkout_url(
		&self,
		order: &Order,
		server_callback_url: &str,
		response_url: &str,
	) -> Result<FondyResponse, GatewayError> {
		let mut fields = self.order_fields(order);
		fields.insert("order_desc".into(), order.description.as_str().into());
		fields.insert("server_callback_url".into(), server_callback_url.into());
		fields.insert("response_url".into(), response_url.into());
		fields.insert("sender_email".into(), order.email.as_str().into());
		fields.insert("preauth".into(), "Y".into());
		fields.insert("required_rectoken".into(), "Y".into());

		self.call("checkout/url", &fields, &self.merchant.password)
			.await
	}

	pub async fn capture(
		&self,
		order: &Order,
	) -> Result<FondyResponse, GatewayError> {
		let fields = self.order_fields(order);
		self.call("capture/order_id", &fields, &self.merchant.password)
			.await
	}

	pub async fn reverse(
		&self,
		order: &Order,
	) -> Result<FondyResponse, GatewayError> {
		let fields = self.order_fields(order);
		self.call("reverse/order_id", &fields, &self.merchant.password)
			.await
	}

	/// Sends money to a card, signed with the credit merchant's password.
	pub async fn p2p_credit(
		&self,
		credit: &P2pCredit,
	) -> Result<FondyResponse, GatewayError> {
		let mut fields = RequestFields::new();
		fields.insert("order_id".into(), credit.order_id.as_str().into());
		fields.insert("order_desc".into(), credit.description.as_str().into());
		fields.insert("amount".into(), FieldValue::Number(credit.amount));
		fields.insert("currency".into(), credit.currency.as_str().into());
		fields.insert(
			"merchant_id".into(),
			self.credit.merchant_id.as_str().into(),
		);
		match &credit.target {
			CreditTarget::Rectoken(token) => {
				fields.insert("rectoken".into(), token.as_str().into());
			}
			CreditTarget::Card(number) => {
				fields.insert("receiver_card_number".into(), number.as_str().into());
			}
		}

		self.call("p2pcredit", &fields, &self.credit.password).await
	}

	fn order_fields(&self, order: &Order) -> RequestFields {
		let mut fields = RequestFields::new();
		fields.insert("order_id".into(), order.id.as_str().into());
		fields.insert(
			"merchant_id".into(),
			self.merchant.merchant_id.as_str().into(),
		);
		fields.insert("amount".into(), FieldValue::Number(order.amount));
		fields.insert("currency".into(), order.currency.as_str().into());
		fields
	}

	async fn call(
		&self,
		endpoint: &str,
		fields: &RequestFields,
		password: &SecretString,
	) -> Result<FondyResponse, GatewayError> {
		let url = format!("{}/{endpoint}/", self.api_url.trim_end_matches('/'));
		let signed = sign(fields, password.expose_secret());

		let order_id = fields
			.get("order_id")
			.map(ToString::to_string)
			.unwrap_or_default();
		info!("Calling Fondy {endpoint} for order {order_id}");
		let body = self
			.remote
			.post_json(&url, &Envelope { request: &signed })
			.await?;

		let response = FondyResponse::from_body(body)?;
		if let FondyResponse::Failure(decline) = &response {
			warn!("Fondy {endpoint} declined: {}", decline.message);
		}
		Ok(response)
	}
}
