use derive_more::derive::{Display, Error};
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use crate::domain::gateway::GatewayError;

#[derive(Debug, Display, Error)]
pub enum RemoteCallError {
	#[display("Request to {url} failed: {source}")]
	Transport { url: String, source: reqwest::Error },
	#[display("Response from {url} is not JSON: {source}")]
	Decode { url: String, source: reqwest::Error },
}

impl From<RemoteCallError> for GatewayError {
	fn from(err: RemoteCallError) -> Self {
		match err {
			RemoteCallError::Transport { .. } => {
				GatewayError::Transport(err.to_string())
			}
			RemoteCallError::Decode { .. } => GatewayError::Decode(err.to_string()),
		}
	}
}

/// One round trip to a processor endpoint, body decoded as JSON.
///
/// The HTTP status is not interpreted here: processors report business
/// failures inside the body and the caller decides what they mean.
#[derive(Clone)]
pub struct RemoteCallAdapter {
	http_client: Client,
}

impl RemoteCallAdapter {
	pub fn new(http_client: Client) -> Self {
		Self { http_client }
	}

	pub async fn post_json<B>(
		&self,
		url: &str,
		body: &B,
	) -> Result<Value, RemoteCallError>
	where
		B: Serialize + ?Sized,
	{
		self.send(url, self.http_client.post(url).json(body)).await
	}

	pub async fn post_form(
		&self,
		url: &str,
		pairs: &[(String, String)],
		bearer: Option<&SecretString>,
	) -> Result<Value, RemoteCallError> {
		let builder = self.http_client.post(url).form(pairs);
		self.send(url, with_bearer(builder, bearer)).await
	}

	pub async fn get(
		&self,
		url: &str,
		bearer: Option<&SecretString>,
	) -> Result<Value, RemoteCallError> {
		let builder = self.http_client.get(url);
		self.send(url, with_bearer(builder, bearer)).await
	}

	async fn send(
		&self,
		url: &str,
		builder: RequestBuilder,
	) -> Result<Value, RemoteCallError> {
		let response = builder
			.header(ACCEPT, "application/json")
			.send()
			.await
			.map_err(|source| RemoteCallError::Transport {
				url: url.to_string(),
				source,
			})?;

		debug!("{url} answered with status {}", response.status());

		response
			.json::<Value>()
			.await
			.map_err(|source| RemoteCallError::Decode {
				url: url.to_string(),
				source,
			})
	}
}

fn with_bearer(
	builder: RequestBuilder,
	bearer: Option<&SecretString>,
) -> RequestBuilder {
	match bearer {
		Some(token) => builder.bearer_auth(token.expose_secret()),
		None => builder,
	}
}
