use actix_web::{HttpResponse, Responder, ResponseError, post, web};
use log::{info, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PayoutRequest;
use crate::infrastructure::fondy::fondy_client::CreditTarget;
use crate::use_cases::dto::PayoutCommand;
use crate::use_cases::payout_stylist::PayoutStylistUseCase;

#[post("/payouts")]
pub async fn payouts(
	payload: web::Json<PayoutRequest>,
	payout_use_case: web::Data<PayoutStylistUseCase>,
) -> impl Responder {
	let request = payload.into_inner();
	let target = match (request.rectoken, request.card_number) {
		(Some(rectoken), None) => CreditTarget::Rectoken(rectoken),
		(None, Some(card_number)) => CreditTarget::Card(card_number),
		_ => {
			return ApiError::BadClientDataError(
				"exactly one of rectoken or card_number is required".to_string(),
			)
			.error_response();
		}
	};

	let command = PayoutCommand {
		description: request.description,
		amount: request.amount,
		currency: request.currency,
		target,
	};

	match payout_use_case.execute(command).await {
		Ok(result) => {
			info!("Payout {} accepted by Fondy", result.order_id);
			HttpResponse::Ok().json(result)
		}
		Err(e) => {
			warn!("Error sending payout: {e}");
			ApiError::from(e).error_response()
		}
	}
}
