use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::gateway::Checkout;
use crate::domain::order::{Order, Processor};
use crate::infrastructure::fondy::fondy_client::CreditTarget;
use crate::infrastructure::stripe::stripe_types::Account;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateOrderCommand {
	/// Generated when absent.
	pub order_id:        Option<String>,
	pub processor:       Processor,
	pub description:     String,
	pub amount:          i64,
	pub currency:        String,
	pub email:           String,
	pub stylist_account: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
	pub order:    Order,
	pub checkout: Checkout,
}

/// Server-to-server notice that the processor holds the client's funds.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PreauthorizationNotice {
	pub order_id:          String,
	pub payment_reference: Option<String>,
	/// Processor status, when the processor reports one.
	pub status:            Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreauthorizationOutcome {
	Confirmed(Order),
	Ignored(Order),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayoutCommand {
	pub description: String,
	pub amount:      i64,
	pub currency:    String,
	pub target:      CreditTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutResult {
	pub order_id: String,
	pub response: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingLink {
	pub account: Account,
	pub url:     String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StylistSummary {
	pub account:       Account,
	/// Onboarding page while requirements are still due.
	pub setup_url:     Option<String>,
	/// Express dashboard once onboarded.
	pub dashboard_url: Option<String>,
}
