use async_trait::async_trait;
use serde_json::Value;

use crate::domain::gateway::{
	Checkout, GatewayError, GatewayReply, PaymentGateway,
};
use crate::domain::order::{Order, Processor};
use crate::infrastructure::fondy::fondy_client::{FondyClient, FondyResponse};

/// Fondy preauthorization flow: hosted checkout with `preauth=Y`, then
/// capture or reverse by order id.
#[derive(Clone)]
pub struct FondyGateway {
	client:              FondyClient,
	server_callback_url: String,
	response_url:        String,
}

impl FondyGateway {
	pub fn new(
		client: FondyClient,
		server_callback_url: String,
		response_url: String,
	) -> Self {
		Self {
			client,
			server_callback_url,
			response_url,
		}
	}
}

fn into_reply(response: FondyResponse) -> GatewayReply<Value> {
	match response {
		FondyResponse::Success(fields) => {
			GatewayReply::Approved(Value::Object(fields))
		}
		FondyResponse::Failure(decline) => GatewayReply::Declined(decline),
	}
}

#[async_trait]
impl PaymentGateway for FondyGateway {
	fn processor(&self) -> Processor {
		Processor::Fondy
	}

	async fn preauthorize(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Checkout>, GatewayError> {
		let response = self
			.client
			.checkout_url(order, &self.server_callback_url, &self.response_url)
			.await?;

		match response {
			FondyResponse::Success(fields) => {
				let url = fields
					.get("checkout_url")
					.and_then(Value::as_str)
					.ok_or_else(|| {
						GatewayError::Decode(
							"Fondy checkout answer has no checkout_url".to_string(),
						)
					})?;
				Ok(GatewayReply::Approved(Checkout {
					url:       url.to_string(),
					reference: None,
				}))
			}
			FondyResponse::Failure(decline) => Ok(GatewayReply::Declined(decline)),
		}
	}

	async fn capture(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError> {
		self.client.capture(order).await.map(into_reply)
	}

	async fn refund(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError> {
		self.client.reverse(order).await.map(into_reply)
	}
}
