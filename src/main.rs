use std::sync::Arc;

use stylist_payments::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = Arc::new(
		stylist_payments::config::Config::load()
			.expect("Failed to load configuration"),
	);
	run(config).await
}
