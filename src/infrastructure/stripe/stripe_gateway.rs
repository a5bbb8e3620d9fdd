use async_trait::async_trait;
use serde_json::Value;

use crate::domain::gateway::{
	Checkout, GatewayError, GatewayReply, PaymentGateway,
};
use crate::domain::order::{Order, Processor};
use crate::infrastructure::stripe::stripe_client::StripeClient;
use crate::infrastructure::stripe::stripe_types::{PaymentIntent, StripeReply};

/// Stripe manual-capture flow: the checkout session authorizes a payment
/// intent, accept captures it and reject cancels it, releasing the hold.
#[derive(Clone)]
pub struct StripeGateway {
	client:     StripeClient,
	public_url: String,
}

impl StripeGateway {
	pub fn new(client: StripeClient, public_url: String) -> Self {
		Self { client, public_url }
	}

	fn payment_intent_of(order: &Order) -> Result<&str, GatewayError> {
		order.payment_reference.as_deref().ok_or_else(|| {
			GatewayError::MissingPaymentReference {
				order_id: order.id.clone(),
			}
		})
	}
}

fn into_value_reply(
	reply: StripeReply<PaymentIntent>,
) -> Result<GatewayReply<Value>, GatewayError> {
	match reply.into_gateway_reply() {
		GatewayReply::Approved(intent) => serde_json::to_value(intent)
			.map(GatewayReply::Approved)
			.map_err(|e| GatewayError::Decode(e.to_string())),
		GatewayReply::Declined(decline) => Ok(GatewayReply::Declined(decline)),
	}
}

#[async_trait]
impl PaymentGateway for StripeGateway {
	fn processor(&self) -> Processor {
		Processor::Stripe
	}

	async fn preauthorize(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Checkout>, GatewayError> {
		let base = self.public_url.trim_end_matches('/');
		let success_url = format!("{base}/success?order_id={}", order.id);
		let cancel_url = format!("{base}/orders/{}", order.id);

		let reply = self
			.client
			.create_checkout_session(order, &success_url, &cancel_url)
			.await?;

		match reply.into_gateway_reply() {
			GatewayReply::Approved(session) => {
				let url = session.url.ok_or_else(|| {
					GatewayError::Decode(format!(
						"Checkout session {} has no url",
						session.id
					))
				})?;
				Ok(GatewayReply::Approved(Checkout {
					url,
					reference: session.payment_intent,
				}))
			}
			GatewayReply::Declined(decline) => Ok(GatewayReply::Declined(decline)),
		}
	}

	async fn capture(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError> {
		let payment_intent = Self::payment_intent_of(order)?;
		into_value_reply(self.client.capture_payment_intent(payment_intent).await?)
	}

	async fn refund(
		&self,
		order: &Order,
	) -> Result<GatewayReply<Value>, GatewayError> {
		let payment_intent = Self::payment_intent_of(order)?;
		into_value_reply(self.client.cancel_payment_intent(payment_intent).await?)
	}
}
