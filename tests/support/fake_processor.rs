use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub method:        String,
	pub path:          String,
	pub query:         String,
	pub content_type:  Option<String>,
	pub authorization: Option<String>,
	pub body:          String,
}

impl RecordedRequest {
	pub fn json(&self) -> Value {
		serde_json::from_str(&self.body).unwrap()
	}

	pub fn form(&self) -> HashMap<String, String> {
		let url = reqwest::Url::parse(&format!("http://form.local/?{}", self.body))
			.unwrap();
		url.query_pairs().into_owned().collect()
	}
}

#[derive(Clone, Default)]
struct Recorder {
	replies:  Arc<Mutex<HashMap<String, Value>>>,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for a processor API: answers each path with a
/// scripted JSON body and records what it received.
pub struct FakeProcessor {
	pub url:  String,
	recorder: Recorder,
	handle:   ServerHandle,
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
	req.headers()
		.get(name)
		.and_then(|value| value.to_str().ok())
		.map(str::to_string)
}

async fn record(
	req: HttpRequest,
	body: web::Bytes,
	recorder: web::Data<Recorder>,
) -> HttpResponse {
	recorder.requests.lock().unwrap().push(RecordedRequest {
		method:        req.method().to_string(),
		path:          req.path().to_string(),
		query:         req.query_string().to_string(),
		content_type:  header(&req, "content-type"),
		authorization: header(&req, "authorization"),
		body:          String::from_utf8_lossy(&body).into_owned(),
	});

	match recorder.replies.lock().unwrap().get(req.path()) {
		Some(reply) => HttpResponse::Ok().json(reply),
		None => HttpResponse::NotFound().json(json!({
			"error": {
				"type": "invalid_request_error",
				"message": format!("Unrecognized request URL ({})", req.path())
			}
		})),
	}
}

impl FakeProcessor {
	pub async fn start() -> Self {
		let recorder = Recorder::default();
		let app_recorder = recorder.clone();

		let server = HttpServer::new(move || {
			App::new()
				.app_data(web::Data::new(app_recorder.clone()))
				.default_service(web::to(record))
		})
		.workers(1)
		.bind(("127.0.0.1", 0))
		.unwrap();
		let addr = server.addrs()[0];
		let server = server.run();
		let handle = server.handle();
		actix_web::rt::spawn(server);

		Self {
			url: format!("http://{addr}"),
			recorder,
			handle,
		}
	}

	pub fn reply(&self, path: &str, body: Value) {
		self.recorder
			.replies
			.lock()
			.unwrap()
			.insert(path.to_string(), body);
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.recorder.requests.lock().unwrap().clone()
	}

	pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
		self.requests()
			.into_iter()
			.filter(|request| request.path == path)
			.collect()
	}

	pub async fn stop(self) {
		self.handle.stop(false).await;
	}
}
