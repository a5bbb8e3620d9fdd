use log::info;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::order::Processor;
use crate::infrastructure::fondy::fondy_client::{
	CreditTarget, FondyClient, FondyResponse, P2pCredit,
};
use crate::use_cases::dto::{PayoutCommand, PayoutResult};
use crate::use_cases::errors::UseCaseError;

/// Shortest and longest primary account numbers issued by card schemes.
const CARD_NUMBER_LENGTH: std::ops::RangeInclusive<usize> = 12..=19;

fn validate_target(target: &CreditTarget) -> Result<(), UseCaseError> {
	match target {
		CreditTarget::Rectoken(token) if token.trim().is_empty() => Err(
			UseCaseError::InvalidRequest("rectoken must not be empty".to_string()),
		),
		CreditTarget::Card(number)
			if !CARD_NUMBER_LENGTH.contains(&number.len()) ||
				!number.chars().all(|c| c.is_ascii_digit()) =>
		{
			Err(UseCaseError::InvalidRequest(
				"card number must be 12 to 19 digits".to_string(),
			))
		}
		_ => Ok(()),
	}
}

/// Pays a stylist out through a Fondy p2p credit.
#[derive(Clone)]
pub struct PayoutStylistUseCase {
	fondy: FondyClient,
}

impl PayoutStylistUseCase {
	pub fn new(fondy: FondyClient) -> Self {
		Self { fondy }
	}

	pub async fn execute(
		&self,
		command: PayoutCommand,
	) -> Result<PayoutResult, UseCaseError> {
		if command.amount <= 0 {
			return Err(UseCaseError::InvalidRequest(
				"amount must be a positive number of minor units".to_string(),
			));
		}
		validate_target(&command.target)?;

		let credit = P2pCredit {
			order_id:    Uuid::new_v4().to_string(),
			description: command.description,
			amount:      command.amount,
			currency:    command.currency.to_uppercase(),
			target:      command.target,
		};

		match self.fondy.p2p_credit(&credit).await? {
			FondyResponse::Success(fields) => {
				info!("Payout {} sent", credit.order_id);
				Ok(PayoutResult {
					order_id: credit.order_id,
					response: Value::Object(fields),
				})
			}
			FondyResponse::Failure(decline) => Err(UseCaseError::Declined {
				processor: Processor::Fondy,
				decline,
			}),
		}
	}
}
