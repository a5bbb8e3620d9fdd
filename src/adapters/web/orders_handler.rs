use actix_web::{HttpResponse, Responder, ResponseError, get, post, web};
use log::{info, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{
	CreateOrderRequest, CreateOrderResponse, OrderView,
};
use crate::infrastructure::persistence::in_memory_order_repository::InMemoryOrderRepository;
use crate::use_cases::create_order::CreateOrderUseCase;
use crate::use_cases::get_order::GetOrderUseCase;

#[post("/orders")]
pub async fn create_order(
	payload: web::Json<CreateOrderRequest>,
	create_order_use_case: web::Data<CreateOrderUseCase<InMemoryOrderRepository>>,
) -> impl Responder {
	match create_order_use_case.execute(payload.into_inner().into()).await {
		Ok(created) => {
			info!(
				"Order {} created, checkout at {}",
				created.order.id, created.checkout.url
			);
			HttpResponse::Created().json(CreateOrderResponse {
				order:        OrderView::from(&created.order),
				checkout_url: created.checkout.url,
			})
		}
		Err(e) => {
			warn!("Error creating order: {e}");
			ApiError::from(e).error_response()
		}
	}
}

#[get("/orders/{order_id}")]
pub async fn get_order(
	path: web::Path<String>,
	get_order_use_case: web::Data<GetOrderUseCase<InMemoryOrderRepository>>,
) -> impl Responder {
	match get_order_use_case.execute(&path).await {
		Ok(order) => HttpResponse::Ok().json(OrderView::from(&order)),
		Err(e) => ApiError::from(e).error_response(),
	}
}
