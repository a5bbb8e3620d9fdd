use reqwest::Client;
use secrecy::SecretString;
use serde_json::json;
use stylist_payments::domain::gateway::{GatewayError, GatewayReply, PaymentGateway};
use stylist_payments::domain::order::Processor;
use stylist_payments::domain::signature::{FieldValue, RequestFields, signature_of};
use stylist_payments::infrastructure::fondy::fondy_client::{
	CreditTarget, FondyClient, FondyMerchant, FondyResponse, P2pCredit,
};
use stylist_payments::infrastructure::fondy::fondy_gateway::FondyGateway;
use stylist_payments::infrastructure::http::remote_call::RemoteCallAdapter;

mod support;

use crate::support::fake_processor::FakeProcessor;
use crate::support::new_order;

fn fondy_client(api_url: &str) -> FondyClient {
	FondyClient::new(
		RemoteCallAdapter::new(Client::new()),
		api_url.to_string(),
		FondyMerchant {
			merchant_id: "1396424".to_string(),
			password:    SecretString::new("test".to_string()),
		},
		FondyMerchant {
			merchant_id: "1000".to_string(),
			password:    SecretString::new("credit-secret".to_string()),
		},
	)
}

fn fondy_gateway(api_url: &str) -> FondyGateway {
	FondyGateway::new(
		fondy_client(api_url),
		"http://localhost:3000/server_callback_url".to_string(),
		"http://localhost:3000/response_url".to_string(),
	)
}

fn success(extra: serde_json::Value) -> serde_json::Value {
	let mut response = json!({"response_status": "success"});
	if let (Some(fields), Some(extra)) = (response.as_object_mut(), extra.as_object()) {
		fields.extend(extra.clone());
	}
	json!({ "response": response })
}

#[actix_web::test]
async fn test_checkout_request_is_signed_envelope() {
	let fondy = FakeProcessor::start().await;
	fondy.reply(
		"/checkout/url/",
		success(json!({"checkout_url": "https://pay.fondy.eu/merchants/abc"})),
	);
	let gateway = fondy_gateway(&fondy.url);

	let reply = gateway
		.preauthorize(&new_order("O1", Processor::Fondy))
		.await
		.unwrap();

	let GatewayReply::Approved(checkout) = reply else {
		panic!("expected a checkout url");
	};
	assert_eq!(checkout.url, "https://pay.fondy.eu/merchants/abc");
	assert_eq!(checkout.reference, None);

	let requests = fondy.requests_to("/checkout/url/");
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].method, "POST");
	assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));

	let body = requests[0].json();
	let fields: RequestFields = serde_json::from_value(body["request"].clone()).unwrap();
	assert_eq!(fields["order_id"], FieldValue::from("O1"));
	assert_eq!(fields["merchant_id"], FieldValue::from("1396424"));
	assert_eq!(fields["amount"], FieldValue::Number(45200));
	assert_eq!(fields["currency"], FieldValue::from("USD"));
	assert_eq!(fields["order_desc"], FieldValue::from("Stylist: Ganna"));
	assert_eq!(fields["sender_email"], FieldValue::from("tim@blah.com"));
	assert_eq!(fields["preauth"], FieldValue::from("Y"));
	assert_eq!(fields["required_rectoken"], FieldValue::from("Y"));
	assert_eq!(
		fields["server_callback_url"],
		FieldValue::from("http://localhost:3000/server_callback_url")
	);
	assert_eq!(
		fields["signature"],
		FieldValue::Text(signature_of(&fields, "test"))
	);

	fondy.stop().await;
}

#[actix_web::test]
async fn test_capture_and_reverse_hit_order_endpoints() {
	let fondy = FakeProcessor::start().await;
	fondy.reply(
		"/capture/order_id/",
		success(json!({"order_id": "O1", "capture_status": "captured"})),
	);
	fondy.reply(
		"/reverse/order_id/",
		success(json!({"order_id": "O1", "reverse_status": "approved"})),
	);
	let gateway = fondy_gateway(&fondy.url);
	let order = new_order("O1", Processor::Fondy);

	let capture = gateway.capture(&order).await.unwrap();
	let refund = gateway.refund(&order).await.unwrap();

	let GatewayReply::Approved(capture) = capture else {
		panic!("expected capture to be approved");
	};
	assert_eq!(capture["capture_status"], "captured");
	assert!(matches!(refund, GatewayReply::Approved(_)));

	let captured = fondy.requests_to("/capture/order_id/")[0].json();
	let keys: Vec<&String> = captured["request"].as_object().unwrap().keys().collect();
	assert_eq!(keys, [
		"amount",
		"currency",
		"merchant_id",
		"order_id",
		"signature"
	]);
	assert_eq!(fondy.requests_to("/reverse/order_id/").len(), 1);

	fondy.stop().await;
}

#[actix_web::test]
async fn test_failure_status_is_declined_verbatim() {
	let fondy = FakeProcessor::start().await;
	let body = json!({
		"response": {
			"response_status": "failure",
			"error_code": 1016,
			"error_message": "Merchant not found"
		}
	});
	fondy.reply("/capture/order_id/", body.clone());
	let gateway = fondy_gateway(&fondy.url);

	let reply = gateway
		.capture(&new_order("O1", Processor::Fondy))
		.await
		.unwrap();

	let GatewayReply::Declined(decline) = reply else {
		panic!("expected a decline");
	};
	assert_eq!(decline.code.as_deref(), Some("1016"));
	assert_eq!(decline.message, "Merchant not found");
	assert_eq!(decline.body, body);

	fondy.stop().await;
}

#[actix_web::test]
async fn test_p2p_credit_uses_credit_merchant() {
	let fondy = FakeProcessor::start().await;
	fondy.reply("/p2pcredit/", success(json!({"order_status": "approved"})));
	let client = fondy_client(&fondy.url);

	let response = client
		.p2p_credit(&P2pCredit {
			order_id:    "P1".to_string(),
			description: "Payout for Ganna".to_string(),
			amount:      30000,
			currency:    "UAH".to_string(),
			target:      CreditTarget::Card("4444555511116666".to_string()),
		})
		.await
		.unwrap();

	assert!(matches!(response, FondyResponse::Success(_)));
	let body = fondy.requests_to("/p2pcredit/")[0].json();
	let fields: RequestFields = serde_json::from_value(body["request"].clone()).unwrap();
	assert_eq!(fields["merchant_id"], FieldValue::from("1000"));
	assert_eq!(
		fields["receiver_card_number"],
		FieldValue::from("4444555511116666")
	);
	assert!(!fields.contains_key("rectoken"));
	assert_eq!(
		fields["signature"],
		FieldValue::Text(signature_of(&fields, "credit-secret"))
	);

	fondy.stop().await;
}

#[actix_web::test]
async fn test_unreachable_fondy_is_transport_error() {
	let gateway = fondy_gateway("http://127.0.0.1:9");

	let result = gateway.capture(&new_order("O1", Processor::Fondy)).await;

	assert!(matches!(result, Err(GatewayError::Transport(_))));
}
