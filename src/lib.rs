pub mod config;

pub mod domain {
	pub mod gateway;
	pub mod order;
	pub mod repository;
	pub mod signature;
}

pub mod infrastructure {
	pub mod http {
		pub mod remote_call;
	}
	pub mod fondy {
		pub mod fondy_client;
		pub mod fondy_gateway;
	}
	pub mod stripe {
		pub mod stripe_client;
		pub mod stripe_gateway;
		pub mod stripe_types;
	}
	pub mod persistence {
		pub mod in_memory_order_repository;
	}
}

pub mod use_cases {
	pub mod accept_booking;
	mod booking_transition;
	pub mod confirm_preauthorization;
	pub mod create_order;
	pub mod dto;
	pub mod errors;
	pub mod get_order;
	pub mod onboard_stylist;
	pub mod payout_stylist;
	pub mod reject_booking;
}

pub mod adapters {
	pub mod web {
		pub mod bookings_handler;
		pub mod errors;
		pub mod fondy_callbacks_handler;
		pub mod html;
		pub mod orders_handler;
		pub mod payouts_handler;
		pub mod schema;
		pub mod stripe_webhook_handler;
		pub mod stylists_handler;
	}
}

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::{info, warn};
use reqwest::Client;

use crate::adapters::web::{
	bookings_handler, fondy_callbacks_handler, orders_handler, payouts_handler,
	stripe_webhook_handler, stylists_handler,
};
use crate::config::Config;
use crate::domain::gateway::GatewayRegistry;
use crate::infrastructure::fondy::fondy_client::{FondyClient, FondyMerchant};
use crate::infrastructure::fondy::fondy_gateway::FondyGateway;
use crate::infrastructure::http::remote_call::RemoteCallAdapter;
use crate::infrastructure::persistence::in_memory_order_repository::InMemoryOrderRepository;
use crate::infrastructure::stripe::stripe_client::StripeClient;
use crate::infrastructure::stripe::stripe_gateway::StripeGateway;
use crate::use_cases::accept_booking::AcceptBookingUseCase;
use crate::use_cases::confirm_preauthorization::ConfirmPreauthorizationUseCase;
use crate::use_cases::create_order::CreateOrderUseCase;
use crate::use_cases::get_order::GetOrderUseCase;
use crate::use_cases::onboard_stylist::StylistOnboardingUseCase;
use crate::use_cases::payout_stylist::PayoutStylistUseCase;
use crate::use_cases::reject_booking::RejectBookingUseCase;

/// Use cases shared by every server worker.
#[derive(Clone)]
pub struct Services {
	pub create_order:   CreateOrderUseCase<InMemoryOrderRepository>,
	pub get_order:      GetOrderUseCase<InMemoryOrderRepository>,
	pub confirm:        ConfirmPreauthorizationUseCase<InMemoryOrderRepository>,
	pub accept_booking: AcceptBookingUseCase<InMemoryOrderRepository>,
	pub reject_booking: RejectBookingUseCase<InMemoryOrderRepository>,
	pub payout:         PayoutStylistUseCase,
	pub onboarding:     StylistOnboardingUseCase,
}

impl Services {
	pub fn build(
		config: &Config,
		http_client: Client,
		order_repo: InMemoryOrderRepository,
	) -> Self {
		let remote = RemoteCallAdapter::new(http_client);

		let fondy = FondyClient::new(
			remote.clone(),
			config.fondy_api_url.clone(),
			FondyMerchant {
				merchant_id: config.fondy_merchant_id.clone(),
				password:    config.fondy_password.clone(),
			},
			FondyMerchant {
				merchant_id: config.fondy_credit_merchant_id.clone(),
				password:    config.fondy_credit_password.clone(),
			},
		);
		let mut gateways = GatewayRegistry::new().with(Arc::new(FondyGateway::new(
			fondy.clone(),
			config.server_callback_url(),
			config.response_url(),
		)));

		let stripe = config.stripe_secret_key.clone().map(|secret_key| {
			StripeClient::new(remote.clone(), config.stripe_api_url.clone(), secret_key)
		});
		match &stripe {
			Some(client) => {
				gateways = gateways.with(Arc::new(StripeGateway::new(
					client.clone(),
					config.public_url.clone(),
				)));
			}
			None => warn!("No Stripe secret key configured, Stripe flows disabled"),
		}

		Services {
			create_order:   CreateOrderUseCase::new(
				order_repo.clone(),
				gateways.clone(),
			),
			get_order:      GetOrderUseCase::new(order_repo.clone()),
			confirm:        ConfirmPreauthorizationUseCase::new(order_repo.clone()),
			accept_booking: AcceptBookingUseCase::new(
				order_repo.clone(),
				gateways.clone(),
			),
			reject_booking: RejectBookingUseCase::new(order_repo, gateways),
			payout:         PayoutStylistUseCase::new(fondy),
			onboarding:     StylistOnboardingUseCase::new(
				stripe,
				config.public_url.clone(),
				config.stylist_profile_url.clone(),
			),
		}
	}
}

/// Registers every route and the use cases they depend on.
pub fn configure(services: Services) -> impl FnOnce(&mut web::ServiceConfig) {
	move |cfg| {
		cfg.app_data(web::Data::new(services.create_order))
			.app_data(web::Data::new(services.get_order))
			.app_data(web::Data::new(services.confirm))
			.app_data(web::Data::new(services.accept_booking))
			.app_data(web::Data::new(services.reject_booking))
			.app_data(web::Data::new(services.payout))
			.app_data(web::Data::new(services.onboarding))
			.service(orders_handler::create_order)
			.service(orders_handler::get_order)
			.service(fondy_callbacks_handler::server_callback)
			.service(fondy_callbacks_handler::response_url_post)
			.service(fondy_callbacks_handler::response_url_get)
			.service(bookings_handler::accept_booking)
			.service(bookings_handler::reject_booking)
			.service(stripe_webhook_handler::webhook)
			.service(stripe_webhook_handler::success)
			.service(payouts_handler::payouts)
			.service(stylists_handler::home)
			.service(stylists_handler::create_stylist)
			.service(stylists_handler::account_page)
			.service(stylists_handler::reauth)
			.service(stylists_handler::onboarding_return);
	}
}

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	let http_client = Client::new();
	let order_repo = InMemoryOrderRepository::new();
	let services = Services::build(&config, http_client, order_repo);

	info!(
		"Starting Actix-Web server on 0.0.0.0:{} (public url {})",
		config.server_port, config.public_url
	);
	HttpServer::new(move || App::new().configure(configure(services.clone())))
		.keep_alive(Duration::from_secs(config.server_keepalive))
		.bind(("0.0.0.0", config.server_port))?
		.run()
		.await
}
