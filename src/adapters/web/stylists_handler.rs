use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::html::{self, escape};
use crate::adapters::web::schema::StylistForm;
use crate::use_cases::dto::{OnboardingLink, StylistSummary};
use crate::use_cases::onboard_stylist::StylistOnboardingUseCase;

const CREATE_FORM: &str = "<form method=\"post\" action=\"/create_stylist\">\
	<input name=\"email\" placeholder=\"email\"/>\
	<input name=\"country\" placeholder=\"US\" maxlength=\"2\"/>\
	<button type=\"submit\">Create stylist</button></form>";

const TABLE_HEADER: &str = "<tr><th>Account</th><th>Email</th><th>Country</th>\
	<th>Payouts</th><th>Charges enabled</th><th>Payouts enabled</th><th>Status</th>\
	<th></th></tr>";

fn yes_no(flag: bool) -> &'static str {
	if flag { "yes" } else { "no" }
}

fn stylist_row(stylist: &StylistSummary) -> String {
	let account = &stylist.account;
	let link = match (&stylist.dashboard_url, &stylist.setup_url) {
		(Some(url), _) => format!("<a href=\"{}\">dashboard</a>", escape(url)),
		(None, Some(url)) => format!("<a href=\"{}\">finish setup</a>", escape(url)),
		(None, None) => String::new(),
	};
	format!(
		"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
		 <td>{}</td><td>{link}</td></tr>",
		escape(&account.id),
		escape(account.email.as_deref().unwrap_or("-")),
		escape(account.country.as_deref().unwrap_or("-")),
		escape(account.payout_interval().unwrap_or("-")),
		yes_no(account.charges_enabled),
		yes_no(account.payouts_enabled),
		if account.is_onboarded() {
			"onboarded"
		} else {
			"pending"
		},
	)
}

fn redirect(url: &str) -> HttpResponse {
	HttpResponse::SeeOther()
		.insert_header(("Location", url))
		.finish()
}

fn onboarding_page(title: &str, link: &OnboardingLink) -> HttpResponse {
	html::html_response(
		title,
		&format!(
			"<h1>{}</h1><p>Account {}</p><a href=\"{}\">Continue onboarding</a>",
			escape(title),
			escape(&link.account.id),
			escape(&link.url)
		),
	)
}

#[get("/home")]
pub async fn home(
	onboarding_use_case: web::Data<StylistOnboardingUseCase>,
) -> impl Responder {
	match onboarding_use_case.list_stylists().await {
		Ok(stylists) => {
			let rows: String = stylists.iter().map(stylist_row).collect();
			html::html_response(
				"Stylists",
				&format!(
					"<h1>Stylists</h1><table>{TABLE_HEADER}{rows}</table>{CREATE_FORM}"
				),
			)
		}
		Err(e) => {
			warn!("Could not list stylists: {e}");
			html::error_response(&ApiError::from(e))
		}
	}
}

#[post("/create_stylist")]
pub async fn create_stylist(
	form: web::Form<StylistForm>,
	onboarding_use_case: web::Data<StylistOnboardingUseCase>,
) -> impl Responder {
	match onboarding_use_case
		.create_stylist(&form.email, &form.country)
		.await
	{
		Ok(link) => {
			info!("Stylist {} sent to onboarding", link.account.id);
			redirect(&link.url)
		}
		Err(e) => {
			warn!("Could not create stylist {}: {e}", form.email);
			html::error_response(&ApiError::from(e))
		}
	}
}

#[get("/account/{account_id}")]
pub async fn account_page(
	path: web::Path<String>,
	onboarding_use_case: web::Data<StylistOnboardingUseCase>,
) -> impl Responder {
	match onboarding_use_case.onboarding_link(&path).await {
		Ok(link) => onboarding_page("Stylist account", &link),
		Err(e) => html::error_response(&ApiError::from(e)),
	}
}

/// Stripe sends the stylist here when an onboarding link expired.
#[get("/reauth/{account_id}")]
pub async fn reauth(
	path: web::Path<String>,
	onboarding_use_case: web::Data<StylistOnboardingUseCase>,
) -> impl Responder {
	match onboarding_use_case.onboarding_link(&path).await {
		Ok(link) => redirect(&link.url),
		Err(e) => html::error_response(&ApiError::from(e)),
	}
}

#[get("/return/{account_id}")]
pub async fn onboarding_return(
	path: web::Path<String>,
	onboarding_use_case: web::Data<StylistOnboardingUseCase>,
) -> impl Responder {
	let account = match onboarding_use_case.get_stylist(&path).await {
		Ok(account) => account,
		Err(e) => return html::error_response(&ApiError::from(e)),
	};

	if account.is_onboarded() {
		info!("Stylist {} finished onboarding", account.id);
		html::html_response(
			"Onboarding complete",
			&format!(
				"<h1>Onboarding complete</h1><p>Account {} payouts: {}</p>",
				escape(&account.id),
				escape(account.payout_interval().unwrap_or("default"))
			),
		)
	} else {
		match onboarding_use_case.onboarding_link(&account.id).await {
			Ok(link) => onboarding_page("Onboarding incomplete", &link),
			Err(e) => html::error_response(&ApiError::from(e)),
		}
	}
}
