use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use stylist_payments::adapters::web::schema::{
	CreateOrderRequest, CreateOrderResponse, OrderView,
};
use stylist_payments::domain::gateway::GatewayRegistry;
use stylist_payments::domain::order::{OrderState, Processor};
use stylist_payments::domain::repository::OrderRepository;
use stylist_payments::infrastructure::fondy::fondy_client::{FondyClient, FondyMerchant};
use stylist_payments::infrastructure::http::remote_call::RemoteCallAdapter;
use stylist_payments::infrastructure::persistence::in_memory_order_repository::InMemoryOrderRepository;
use stylist_payments::use_cases::accept_booking::AcceptBookingUseCase;
use stylist_payments::use_cases::confirm_preauthorization::ConfirmPreauthorizationUseCase;
use stylist_payments::use_cases::create_order::CreateOrderUseCase;
use stylist_payments::use_cases::get_order::GetOrderUseCase;
use stylist_payments::use_cases::onboard_stylist::StylistOnboardingUseCase;
use stylist_payments::use_cases::payout_stylist::PayoutStylistUseCase;
use stylist_payments::use_cases::reject_booking::RejectBookingUseCase;
use stylist_payments::{Services, configure};

mod support;

use crate::support::fake_gateway::{Behavior, FakeGateway};
use crate::support::{insert_preauthorized, new_order};

fn services(repo: &InMemoryOrderRepository, gateways: &[Arc<FakeGateway>]) -> Services {
	let registry = gateways
		.iter()
		.fold(GatewayRegistry::new(), |registry, gateway| {
			registry.with(gateway.clone())
		});
	let unreachable = FondyClient::new(
		RemoteCallAdapter::new(Client::new()),
		"http://127.0.0.1:9".to_string(),
		FondyMerchant {
			merchant_id: "1396424".to_string(),
			password:    SecretString::new("test".to_string()),
		},
		FondyMerchant {
			merchant_id: "1396424".to_string(),
			password:    SecretString::new("test".to_string()),
		},
	);

	Services {
		create_order:   CreateOrderUseCase::new(repo.clone(), registry.clone()),
		get_order:      GetOrderUseCase::new(repo.clone()),
		confirm:        ConfirmPreauthorizationUseCase::new(repo.clone()),
		accept_booking: AcceptBookingUseCase::new(repo.clone(), registry.clone()),
		reject_booking: RejectBookingUseCase::new(repo.clone(), registry),
		payout:         PayoutStylistUseCase::new(unreachable),
		onboarding:     StylistOnboardingUseCase::new(
			None,
			"http://localhost:3000".to_string(),
			"http://localhost:3000/stylists".to_string(),
		),
	}
}

#[actix_web::test]
async fn test_create_order_returns_checkout() {
	let repo = InMemoryOrderRepository::new();
	let fondy = FakeGateway::new(Processor::Fondy);
	let app =
		test::init_service(App::new().configure(configure(services(&repo, &[fondy.clone()]))))
			.await;

	let req = test::TestRequest::post()
		.uri("/orders")
		.set_json(CreateOrderRequest {
			order_id:        Some("O1".to_string()),
			processor:       Processor::Fondy,
			description:     "Stylist: Ganna".to_string(),
			amount:          45200,
			currency:        "USD".to_string(),
			email:           "tim@blah.com".to_string(),
			stylist_account: None,
		})
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::CREATED);
	let body: CreateOrderResponse = test::read_body_json(resp).await;
	assert_eq!(body.checkout_url, "https://pay.example/checkout/O1");
	assert_eq!(body.order.state, OrderState::Created);
	assert!(!body.order.preauth);
	assert_eq!(fondy.preauthorize_calls(), 1);
}

#[actix_web::test]
async fn test_create_order_rejects_bad_amount() {
	let repo = InMemoryOrderRepository::new();
	let fondy = FakeGateway::new(Processor::Fondy);
	let app =
		test::init_service(App::new().configure(configure(services(&repo, &[fondy.clone()]))))
			.await;

	let req = test::TestRequest::post()
		.uri("/orders")
		.set_json(json!({
			"processor": "fondy",
			"description": "Stylist: Ganna",
			"amount": -1,
			"currency": "USD",
			"email": "tim@blah.com"
		}))
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["statusCode"], 400);
	assert_eq!(body["message"], "Bad request");
	assert_eq!(fondy.preauthorize_calls(), 0);
}

#[actix_web::test]
async fn test_fondy_flow_through_http() {
	let repo = InMemoryOrderRepository::new();
	let fondy = FakeGateway::new(Processor::Fondy);
	let app =
		test::init_service(App::new().configure(configure(services(&repo, &[fondy.clone()]))))
			.await;
	repo.insert(new_order("O1", Processor::Fondy)).await;

	let req = test::TestRequest::post()
		.uri("/server_callback_url")
		.set_form([
			("order_id", "O1"),
			("order_status", "approved"),
			("rectoken", "rectoken-1"),
			("amount", "45200"),
		])
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::OK);
	let view: OrderView = test::read_body_json(resp).await;
	assert!(view.preauth);
	assert_eq!(view.payment_reference.as_deref(), Some("rectoken-1"));

	let req = test::TestRequest::get().uri("/accept_booking/O1").to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::OK);
	let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
	assert!(page.contains("&quot;captured&quot;: true"));

	let req = test::TestRequest::get().uri("/reject_booking/O1").to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);
	let text = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
	assert_eq!(text, "Order O1 is already captured");
	assert_eq!(fondy.refund_calls(), 0);

	let req = test::TestRequest::get().uri("/orders/O1").to_request();
	let view: OrderView = test::call_and_read_body_json(&app, req).await;
	assert!(view.captured);
	assert!(!view.refunded);
}

#[actix_web::test]
async fn test_json_callback_is_accepted() {
	let repo = InMemoryOrderRepository::new();
	let app = test::init_service(
		App::new().configure(configure(services(&repo, &[FakeGateway::new(
			Processor::Fondy,
		)]))),
	)
	.await;
	repo.insert(new_order("O2", Processor::Fondy)).await;

	let req = test::TestRequest::post()
		.uri("/server_callback_url")
		.set_json(json!({"order_id": "O2", "order_status": "approved", "rectoken": "r2"}))
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(
		repo.get("O2").await.unwrap().state,
		OrderState::Preauthorized
	);
}

#[actix_web::test]
async fn test_unknown_order_is_not_found() {
	let repo = InMemoryOrderRepository::new();
	let fondy = FakeGateway::new(Processor::Fondy);
	let app =
		test::init_service(App::new().configure(configure(services(&repo, &[fondy.clone()]))))
			.await;

	for uri in ["/accept_booking/NOPE", "/reject_booking/NOPE"] {
		let req = test::TestRequest::get().uri(uri).to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	}
	let req = test::TestRequest::get().uri("/orders/NOPE").to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);

	assert_eq!(fondy.remote_calls(), 0);
}

#[actix_web::test]
async fn test_declined_capture_renders_processor_body() {
	let repo = InMemoryOrderRepository::new();
	let fondy = FakeGateway::new(Processor::Fondy);
	fondy.set_behavior(Behavior::Decline);
	let app =
		test::init_service(App::new().configure(configure(services(&repo, &[fondy.clone()]))))
			.await;
	insert_preauthorized(&repo, "O3", Processor::Fondy, Some("rectoken")).await;

	let req = test::TestRequest::get().uri("/accept_booking/O3").to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
	let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
	assert!(page.contains("<pre>"));
	assert!(page.contains("Duplicate order_id for merchant"));
	assert_eq!(
		repo.get("O3").await.unwrap().state,
		OrderState::Preauthorized
	);
}

#[actix_web::test]
async fn test_stripe_webhook_preauthorizes_order() {
	let repo = InMemoryOrderRepository::new();
	let stripe = FakeGateway::new(Processor::Stripe);
	let app =
		test::init_service(App::new().configure(configure(services(&repo, &[stripe.clone()]))))
			.await;
	repo.insert(new_order("S1", Processor::Stripe)).await;

	let req = test::TestRequest::post()
		.uri("/webhook")
		.set_json(json!({
			"id": "evt_1",
			"type": "checkout.session.completed",
			"data": {"object": {
				"id": "cs_1",
				"payment_intent": "pi_1",
				"metadata": {"order_id": "S1"}
			}}
		}))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;

	assert_eq!(body, json!({"received": true}));
	let order = repo.get("S1").await.unwrap();
	assert_eq!(order.state, OrderState::Preauthorized);
	assert_eq!(order.payment_reference.as_deref(), Some("pi_1"));

	let req = test::TestRequest::get().uri("/reject_booking/S1").to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(stripe.refund_calls(), 1);
	assert_eq!(repo.get("S1").await.unwrap().state, OrderState::Refunded);
}

#[actix_web::test]
async fn test_stripe_webhook_acknowledges_unrelated_events() {
	let repo = InMemoryOrderRepository::new();
	let app = test::init_service(App::new().configure(configure(services(&repo, &[]))))
		.await;

	for event in [
		json!({"type": "customer.created", "data": {"object": {"id": "cus_1"}}}),
		json!({
			"type": "payment_intent.amount_capturable_updated",
			"data": {"object": {"id": "pi_9", "metadata": {"order_id": "GONE"}}}
		}),
	] {
		let req = test::TestRequest::post()
			.uri("/webhook")
			.set_json(event)
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
	}
}

#[actix_web::test]
async fn test_response_url_renders_posted_fields() {
	let repo = InMemoryOrderRepository::new();
	let app = test::init_service(App::new().configure(configure(services(&repo, &[]))))
		.await;

	let req = test::TestRequest::post()
		.uri("/response_url")
		.set_form([("order_id", "O1"), ("order_status", "approved")])
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::OK);
	let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
	assert!(page.contains("<pre>"));
	assert!(page.contains("&quot;order_status&quot;: &quot;approved&quot;"));
}

#[actix_web::test]
async fn test_payout_requires_exactly_one_target() {
	let repo = InMemoryOrderRepository::new();
	let app = test::init_service(App::new().configure(configure(services(&repo, &[]))))
		.await;

	let req = test::TestRequest::post()
		.uri("/payouts")
		.set_json(json!({
			"description": "Payout for Ganna",
			"amount": 30000,
			"currency": "UAH",
			"rectoken": "r1",
			"card_number": "4444555511116666"
		}))
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_stylist_pages_need_stripe() {
	let repo = InMemoryOrderRepository::new();
	let app = test::init_service(App::new().configure(configure(services(&repo, &[]))))
		.await;

	let req = test::TestRequest::get().uri("/home").to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_account_page_is_routed() {
	let repo = InMemoryOrderRepository::new();
	let app = test::init_service(App::new().configure(configure(services(&repo, &[]))))
		.await;

	let req = test::TestRequest::get().uri("/account/acct_1").to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
