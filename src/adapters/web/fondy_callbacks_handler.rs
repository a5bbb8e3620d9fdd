use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, ResponseError, get, post, web};
use log::{info, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::html;
use crate::adapters::web::schema::{FondyCallback, OrderView};
use crate::infrastructure::persistence::in_memory_order_repository::InMemoryOrderRepository;
use crate::use_cases::confirm_preauthorization::ConfirmPreauthorizationUseCase;
use crate::use_cases::dto::PreauthorizationOutcome;

type CallbackPayload = web::Either<web::Json<FondyCallback>, web::Form<FondyCallback>>;

/// Fondy's server-to-server notification. Answers 200 whenever the order
/// exists so Fondy stops redelivering.
#[post("/server_callback_url")]
pub async fn server_callback(
	payload: CallbackPayload,
	confirm_use_case: web::Data<
		ConfirmPreauthorizationUseCase<InMemoryOrderRepository>,
	>,
) -> impl Responder {
	let callback = match payload {
		web::Either::Left(json) => json.into_inner(),
		web::Either::Right(form) => form.into_inner(),
	};
	info!(
		"Fondy callback for order {} with status {:?}",
		callback.order_id, callback.order_status
	);

	match confirm_use_case.execute(callback.into()).await {
		Ok(PreauthorizationOutcome::Confirmed(order)) => {
			HttpResponse::Ok().json(OrderView::from(&order))
		}
		Ok(PreauthorizationOutcome::Ignored(order)) => {
			info!("Order {} left as {}", order.id, order.state);
			HttpResponse::Ok().json(OrderView::from(&order))
		}
		Err(e) => {
			warn!("Error handling Fondy callback: {e}");
			ApiError::from(e).error_response()
		}
	}
}

/// Browser return after the Fondy checkout page.
#[post("/response_url")]
pub async fn response_url_post(
	fields: web::Form<BTreeMap<String, String>>,
) -> impl Responder {
	render_response(&fields)
}

#[get("/response_url")]
pub async fn response_url_get(
	fields: web::Query<BTreeMap<String, String>>,
) -> impl Responder {
	render_response(&fields)
}

fn render_response(fields: &BTreeMap<String, String>) -> HttpResponse {
	let order_id = fields.get("order_id").map(String::as_str).unwrap_or("");
	info!("Client returned from Fondy checkout for order {order_id}");
	html::html_response(
		"Payment received",
		&format!(
			"<h1>Thank you</h1><p>Order {}</p>{}",
			html::escape(order_id),
			html::pretty(fields)
		),
	)
}
