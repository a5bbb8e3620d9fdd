use log::{info, warn};
use reqwest::Url;
use secrecy::SecretString;
use serde::de::DeserializeOwned;

use crate::domain::gateway::GatewayError;
use crate::domain::order::Order;
use crate::infrastructure::http::remote_call::RemoteCallAdapter;
use crate::infrastructure::stripe::stripe_types::{
	Account, AccountLink, CheckoutSession, List, LoginLink, PaymentIntent,
	StripeReply,
};

fn pair(key: &str, value: impl ToString) -> (String, String) {
	(key.to_string(), value.to_string())
}

/// Express account for a stylist joining the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
	pub email:       String,
	pub country:     String,
	/// Public profile of the stylist on the platform.
	pub profile_url: String,
}

impl NewAccount {
	/// Only US accounts can sign the full service agreement; everyone else
	/// receives transfers as a recipient.
	pub fn service_agreement(&self) -> &'static str {
		if self.country == "US" {
			"full"
		} else {
			"recipient"
		}
	}
}

/// Form-encoded Stripe REST calls authenticated with the secret key.
#[derive(Clone)]
pub struct StripeClient {
	remote:     RemoteCallAdapter,
	api_url:    String,
	secret_key: SecretString,
}

impl StripeClient {
	pub fn new(
		remote: RemoteCallAdapter,
		api_url: String,
		secret_key: SecretString,
	) -> Self {
		Self {
			remote,
			api_url,
			secret_key,
		}
	}

	/// Hosted checkout whose payment intent is only authorized; capture
	/// happens when the stylist accepts the booking.
	pub async fn create_checkout_session(
		&self,
		order: &Order,
		success_url: &str,
		cancel_url: &str,
	) -> Result<StripeReply<CheckoutSession>, GatewayError> {
		let mut pairs = vec![
			pair("mode", "payment"),
			pair(
				"line_items[0][price_data][currency]",
				order.currency.to_lowercase(),
			),
			pair(
				"line_items[0][price_data][product_data][name]",
				&order.description,
			),
			pair("line_items[0][price_data][unit_amount]", order.amount),
			pair("line_items[0][quantity]", 1),
			pair("payment_intent_data[capture_method]", "manual"),
			pair("payment_intent_data[metadata][order_id]", &order.id),
			pair("metadata[order_id]", &order.id),
			pair("customer_email", &order.email),
			pair("success_url", success_url),
			pair("cancel_url", cancel_url),
		];
		if let Some(account) = &order.stylist_account {
			pairs.push(pair(
				"payment_intent_data[transfer_data][destination]",
				account,
			));
		}

		self.post(&["checkout", "sessions"], &pairs).await
	}

	pub async fn capture_payment_intent(
		&self,
		payment_intent_id: &str,
	) -> Result<StripeReply<PaymentIntent>, GatewayError> {
		self.post(&["payment_intents", payment_intent_id, "capture"], &[])
			.await
	}

	pub async fn cancel_payment_intent(
		&self,
		payment_intent_id: &str,
	) -> Result<StripeReply<PaymentIntent>, GatewayError> {
		self.post(&["payment_intents", payment_intent_id, "cancel"], &[])
			.await
	}

	pub async fn create_account(
		&self,
		account: &NewAccount,
	) -> Result<StripeReply<Account>, GatewayError> {
		let pairs = vec![
			pair("type", "express"),
			pair("email", &account.email),
			pair("country", &account.country),
			pair("business_profile[url]", &account.profile_url),
			pair(
				"tos_acceptance[service_agreement]",
				account.service_agreement(),
			),
			pair("capabilities[transfers][requested]", true),
			pair("settings[payouts][schedule][interval]", "manual"),
		];

		self.post(&["accounts"], &pairs).await
	}

	pub async fn retrieve_account(
		&self,
		account_id: &str,
	) -> Result<StripeReply<Account>, GatewayError> {
		self.get(self.url(&["accounts", account_id])?).await
	}

	pub async fn list_accounts(
		&self,
		limit: u32,
	) -> Result<StripeReply<List<Account>>, GatewayError> {
		let mut url = self.url(&["accounts"])?;
		url.query_pairs_mut()
			.append_pair("limit", &limit.to_string());
		self.get(url).await
	}

	pub async fn create_account_link(
		&self,
		account_id: &str,
		refresh_url: &str,
		return_url: &str,
	) -> Result<StripeReply<AccountLink>, GatewayError> {
		let pairs = vec![
			pair("account", account_id),
			pair("refresh_url", refresh_url),
			pair("return_url", return_url),
			pair("type", "account_onboarding"),
		];

		self.post(&["account_links"], &pairs).await
	}

	/// Express dashboard link for an onboarded account.
	pub async fn create_login_link(
		&self,
		account_id: &str,
	) -> Result<StripeReply<LoginLink>, GatewayError> {
		self.post(&["accounts", account_id, "login_links"], &[])
			.await
	}

	/// Appends `segments` to the API url, percent-encoding each one so ids
	/// taken from request paths stay inside their segment.
	fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
		let mut url = Url::parse(&self.api_url).map_err(|e| {
			GatewayError::Transport(format!("Invalid Stripe url {}: {e}", self.api_url))
		})?;
		url.path_segments_mut()
			.map_err(|()| {
				GatewayError::Transport(format!(
					"Stripe url {} cannot take a path",
					self.api_url
				))
			})?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	async fn post<T: DeserializeOwned>(
		&self,
		segments: &[&str],
		pairs: &[(String, String)],
	) -> Result<StripeReply<T>, GatewayError> {
		let url = self.url(segments)?;
		info!("Calling Stripe POST {}", url.path());
		let body = self
			.remote
			.post_form(url.as_str(), pairs, Some(&self.secret_key))
			.await?;
		log_reply(url.path(), StripeReply::from_body(body))
	}

	async fn get<T: DeserializeOwned>(
		&self,
		url: Url,
	) -> Result<StripeReply<T>, GatewayError> {
		info!("Calling Stripe GET {}", url.path());
		let body = self
			.remote
			.get(url.as_str(), Some(&self.secret_key))
			.await?;
		log_reply(url.path(), StripeReply::from_body(body))
	}
}

fn log_reply<T>(
	path: &str,
	reply: Result<StripeReply<T>, GatewayError>,
) -> Result<StripeReply<T>, GatewayError> {
	if let Ok(StripeReply::Err { error, .. }) = &reply {
		warn!(
			"Stripe {path} refused: {}",
			error.message.as_deref().unwrap_or("no message")
		);
	}
	reply
}
