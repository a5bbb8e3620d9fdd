use actix_web::{HttpResponse, Responder, ResponseError, get, post, web};
use log::{info, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::html;
use crate::adapters::web::schema::{OrderView, SuccessQuery, WebhookAck};
use crate::infrastructure::persistence::in_memory_order_repository::InMemoryOrderRepository;
use crate::infrastructure::stripe::stripe_types::{
	StripeEvent, WebhookNotification,
};
use crate::use_cases::confirm_preauthorization::ConfirmPreauthorizationUseCase;
use crate::use_cases::dto::{PreauthorizationNotice, PreauthorizationOutcome};
use crate::use_cases::errors::UseCaseError;
use crate::use_cases::get_order::GetOrderUseCase;

fn ack() -> HttpResponse {
	HttpResponse::Ok().json(WebhookAck { received: true })
}

/// Stripe webhook endpoint. Events that do not concern an order are
/// acknowledged and dropped.
#[post("/webhook")]
pub async fn webhook(
	event: web::Json<StripeEvent>,
	confirm_use_case: web::Data<
		ConfirmPreauthorizationUseCase<InMemoryOrderRepository>,
	>,
) -> impl Responder {
	let (order_id, payment_intent) = match event.notification() {
		WebhookNotification::Preauthorized {
			order_id,
			payment_intent,
		} => (order_id, payment_intent),
		WebhookNotification::Ignored { kind } => {
			info!("Ignoring Stripe event {kind}");
			return ack();
		}
	};

	let notice = PreauthorizationNotice {
		order_id,
		payment_reference: payment_intent,
		status: None,
	};

	match confirm_use_case.execute(notice).await {
		Ok(PreauthorizationOutcome::Confirmed(order)) => {
			info!("Stripe event {} preauthorized order {}", event.kind, order.id);
			ack()
		}
		Ok(PreauthorizationOutcome::Ignored(order)) => {
			info!("Stripe event {} left order {} as {}", event.kind, order.id, order.state);
			ack()
		}
		Err(UseCaseError::OrderNotFound { order_id }) => {
			warn!("Stripe event {} names unknown order {order_id}", event.kind);
			ack()
		}
		Err(e) => {
			warn!("Error handling Stripe event {}: {e}", event.kind);
			ApiError::from(e).error_response()
		}
	}
}

/// Browser return after the Stripe checkout page.
#[get("/success")]
pub async fn success(
	query: web::Query<SuccessQuery>,
	get_order_use_case: web::Data<GetOrderUseCase<InMemoryOrderRepository>>,
) -> impl Responder {
	let Some(order_id) = query.order_id.as_deref() else {
		return html::html_response("Payment received", "<h1>Thank you</h1>");
	};

	match get_order_use_case.execute(order_id).await {
		Ok(order) => html::order_response("Thank you", &OrderView::from(&order)),
		Err(e) => html::error_response(&ApiError::from(e)),
	}
}
