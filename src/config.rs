use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::Deserialize;

/// Fondy's public test merchant.
pub const FONDY_TEST_MERCHANT_ID: &str = "1396424";
pub const FONDY_TEST_PASSWORD: &str = "test";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub server_port:              u16,
	pub server_keepalive:         u64,
	/// Base url the processors and browsers reach this service on.
	pub public_url:               String,
	pub fondy_api_url:            String,
	pub fondy_merchant_id:        String,
	pub fondy_password:           SecretString,
	pub fondy_credit_merchant_id: String,
	pub fondy_credit_password:    SecretString,
	pub stripe_api_url:           String,
	/// Stripe flows are disabled without a key.
	pub stripe_secret_key:        Option<SecretString>,
	pub stylist_profile_url:      String,
}

fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
	config::Config::builder()
		.set_default("server_port", 3000)?
		.set_default("server_keepalive", 75)?
		.set_default("public_url", "http://localhost:3000")?
		.set_default("fondy_api_url", "https://api.fondy.eu/api")?
		.set_default("fondy_merchant_id", FONDY_TEST_MERCHANT_ID)?
		.set_default("fondy_password", FONDY_TEST_PASSWORD)?
		.set_default("fondy_credit_merchant_id", FONDY_TEST_MERCHANT_ID)?
		.set_default("fondy_credit_password", FONDY_TEST_PASSWORD)?
		.set_default("stripe_api_url", "https://api.stripe.com/v1")?
		.set_default("stylist_profile_url", "http://localhost:3000/stylists")
}

impl Config {
	pub fn load() -> Result<Self, ConfigError> {
		let config_builder = builder()?
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn server_callback_url(&self) -> String {
		format!("{}/server_callback_url", self.public_url.trim_end_matches('/'))
	}

	pub fn response_url(&self) -> String {
		format!("{}/response_url", self.public_url.trim_end_matches('/'))
	}
}
