use actix_web::{Responder, get, web};
use log::{info, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::html;
use crate::adapters::web::schema::OrderView;
use crate::infrastructure::persistence::in_memory_order_repository::InMemoryOrderRepository;
use crate::use_cases::accept_booking::AcceptBookingUseCase;
use crate::use_cases::reject_booking::RejectBookingUseCase;

/// Operator link: capture the held funds.
#[get("/accept_booking/{order_id}")]
pub async fn accept_booking(
	path: web::Path<String>,
	accept_booking_use_case: web::Data<
		AcceptBookingUseCase<InMemoryOrderRepository>,
	>,
) -> impl Responder {
	match accept_booking_use_case.execute(&path).await {
		Ok(order) => {
			info!("Booking {} accepted", order.id);
			html::order_response("Booking accepted", &OrderView::from(&order))
		}
		Err(e) => {
			warn!("Could not accept booking {path}: {e}");
			html::error_response(&ApiError::from(e))
		}
	}
}

/// Operator link: release the held funds.
#[get("/reject_booking/{order_id}")]
pub async fn reject_booking(
	path: web::Path<String>,
	reject_booking_use_case: web::Data<
		RejectBookingUseCase<InMemoryOrderRepository>,
	>,
) -> impl Responder {
	match reject_booking_use_case.execute(&path).await {
		Ok(order) => {
			info!("Booking {} rejected", order.id);
			html::order_response("Booking rejected", &OrderView::from(&order))
		}
		Err(e) => {
			warn!("Could not reject booking {path}: {e}");
			html::error_response(&ApiError::from(e))
		}
	}
}
