use log::info;
use uuid::Uuid;

use crate::domain::order::Processor;
use crate::infrastructure::stripe::stripe_client::{NewAccount, StripeClient};
use crate::infrastructure::stripe::stripe_types::{Account, StripeReply};
use crate::use_cases::dto::{OnboardingLink, StylistSummary};
use crate::use_cases::errors::UseCaseError;

/// Stylists shown on the home page.
pub const STYLIST_PAGE_SIZE: u32 = 10;

/// Stripe Connect onboarding of stylists as express accounts.
#[derive(Clone)]
pub struct StylistOnboardingUseCase {
	stripe:           Option<StripeClient>,
	public_url:       String,
	profile_base_url: String,
}

fn approved<T>(reply: StripeReply<T>) -> Result<T, UseCaseError> {
	reply
		.into_result()
		.map_err(|decline| UseCaseError::Declined {
			processor: Processor::Stripe,
			decline,
		})
}

impl StylistOnboardingUseCase {
	pub fn new(
		stripe: Option<StripeClient>,
		public_url: String,
		profile_base_url: String,
	) -> Self {
		Self {
			stripe,
			public_url,
			profile_base_url,
		}
	}

	fn stripe(&self) -> Result<&StripeClient, UseCaseError> {
		self.stripe.as_ref().ok_or(UseCaseError::ProcessorUnavailable {
			processor: Processor::Stripe,
		})
	}

	/// Opens an express account and returns its first onboarding link.
	pub async fn create_stylist(
		&self,
		email: &str,
		country: &str,
	) -> Result<OnboardingLink, UseCaseError> {
		let country = country.trim().to_uppercase();
		if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
			return Err(UseCaseError::InvalidRequest(format!(
				"{country} is not a two letter country code"
			)));
		}
		if !email.contains('@') {
			return Err(UseCaseError::InvalidRequest(format!(
				"{email} is not an email address"
			)));
		}

		let platform_id = Uuid::new_v4();
		let new_account = NewAccount {
			email: email.to_string(),
			country,
			profile_url: format!(
				"{}/{platform_id}",
				self.profile_base_url.trim_end_matches('/')
			),
		};

		let account = approved(self.stripe()?.create_account(&new_account).await?)?;
		info!("Created stylist account {} for {email}", account.id);

		let url = self.account_link(&account.id).await?;
		Ok(OnboardingLink { account, url })
	}

	/// Fresh onboarding link for an existing account; Stripe links are
	/// single use.
	pub async fn onboarding_link(
		&self,
		account_id: &str,
	) -> Result<OnboardingLink, UseCaseError> {
		let account = approved(self.stripe()?.retrieve_account(account_id).await?)?;
		let url = self.account_link(&account.id).await?;
		Ok(OnboardingLink { account, url })
	}

	pub async fn get_stylist(
		&self,
		account_id: &str,
	) -> Result<Account, UseCaseError> {
		approved(self.stripe()?.retrieve_account(account_id).await?)
	}

	pub async fn list_stylists(&self) -> Result<Vec<StylistSummary>, UseCaseError> {
		let stripe = self.stripe()?;
		let accounts = approved(stripe.list_accounts(STYLIST_PAGE_SIZE).await?)?;

		let mut stylists = Vec::with_capacity(accounts.data.len());
		for account in accounts.data {
			let summary = if account.is_onboarded() {
				let login = approved(stripe.create_login_link(&account.id).await?)?;
				StylistSummary {
					account,
					setup_url: None,
					dashboard_url: Some(login.url),
				}
			} else {
				let setup_url = self.account_link(&account.id).await?;
				StylistSummary {
					account,
					setup_url: Some(setup_url),
					dashboard_url: None,
				}
			};
			stylists.push(summary);
		}
		Ok(stylists)
	}

	async fn account_link(&self, account_id: &str) -> Result<String, UseCaseError> {
		let base = self.public_url.trim_end_matches('/');
		let link = approved(
			self.stripe()?
				.create_account_link(
					account_id,
					&format!("{base}/reauth/{account_id}"),
					&format!("{base}/return/{account_id}"),
				)
				.await?,
		)?;
		Ok(link.url)
	}
}
