//! Bare pages for the operator and browser-return routes.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::OrderView;

pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			other => escaped.push(other),
		}
	}
	escaped
}

pub fn page(title: &str, body: &str) -> String {
	format!(
		"<html><head><title>{}</title></head><body>{body}</body></html>",
		escape(title)
	)
}

pub fn pretty(value: &impl serde::Serialize) -> String {
	let json = serde_json::to_string_pretty(value).unwrap_or_default();
	format!("<pre>{}</pre>", escape(&json))
}

pub fn html_response(title: &str, body: &str) -> HttpResponse {
	HttpResponse::Ok()
		.content_type(ContentType::html())
		.body(page(title, body))
}

pub fn order_response(heading: &str, order: &OrderView) -> HttpResponse {
	html_response(
		heading,
		&format!("<h1>{}</h1>{}", escape(heading), pretty(order)),
	)
}

/// Operator pages answer refusals in plain text and declines with the
/// processor's body as received.
pub fn error_response(error: &ApiError) -> HttpResponse {
	match error.details() {
		Some(details) => HttpResponse::build(error.status_code())
			.content_type(ContentType::html())
			.body(page(
				&error.name(),
				&format!("<div>{}</div>{}", escape(&error.to_string()), pretty(details)),
			)),
		None => HttpResponse::build(error.status_code())
			.content_type(ContentType::plaintext())
			.body(error.to_string()),
	}
}
