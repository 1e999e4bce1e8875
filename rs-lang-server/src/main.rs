use std::env;

use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};

use serde::Deserialize;
use rs_lang_core::io::{get_filename, list_files, CORPUS_EXTENSION};
use rs_lang_core::model::corpus::DirectorySource;
use rs_lang_core::{Identifier, IdentifierConfig, IdentifyError};

/// Corpus folder used when `RS_LANG_DATA` is not set.
const DEFAULT_DATA: &str = "./data";

/// Bind address used when `RS_LANG_BIND` is not set.
const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Struct representing query parameters for the `/v1/identify` and `/v1/scores` endpoints
#[derive(Deserialize)]
struct TextQuery {
	text: Option<String>
}

struct SharedData {
	identifier: Identifier,
	data_folder: String
}

impl TextQuery {
	/// Returns the text to identify, an empty text is valid.
	fn text(&self) -> Result<String, String> {
		self.text.clone().ok_or_else(|| "Missing 'text' query parameter".to_owned())
	}
}

/// HTTP GET endpoint `/v1/identify`
///
/// Identifies the language of the `text` query parameter.
/// Returns the language name as the response body.
#[get("/v1/identify")]
async fn get_identify(data: web::Data<SharedData>, query: web::Query<TextQuery>) -> impl Responder {
	let text = match query.text() {
		Ok(t) => t,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	// Scoring is CPU-bound, keep it off the async workers
	let shared_data = data.clone();
	match web::block(move || shared_data.identifier.identify(&text)).await {
		Ok(Ok(language)) => HttpResponse::Ok().body(language.to_string()),
		Ok(Err(IdentifyError::NoLanguagesAvailable)) => HttpResponse::ServiceUnavailable().body("language undetermined"),
		Err(e) => HttpResponse::InternalServerError().body(format!("Identification failed: {e}"))
	}
}

/// HTTP GET endpoint `/v1/scores`
///
/// Returns every available language with its score for `text`,
/// highest first, as JSON.
#[get("/v1/scores")]
async fn get_scores(data: web::Data<SharedData>, query: web::Query<TextQuery>) -> impl Responder {
	let text = match query.text() {
		Ok(t) => t,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let shared_data = data.clone();
	match web::block(move || shared_data.identifier.scores(&text)).await {
		Ok(Ok(board)) => HttpResponse::Ok().json(board.ranking()),
		Ok(Err(IdentifyError::NoLanguagesAvailable)) => HttpResponse::ServiceUnavailable().body("language undetermined"),
		Err(e) => HttpResponse::InternalServerError().body(format!("Scoring failed: {e}"))
	}
}

#[get("/v1/languages")]
async fn get_languages(data: web::Data<SharedData>) -> impl Responder {
	let names: Vec<String> = data.identifier.available_languages().iter().map(|l| l.to_string()).collect();
	HttpResponse::Ok().body(names.join("\n"))
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match list_files(&data.data_folder, CORPUS_EXTENSION) {
		Ok(files) => {
			let names: Vec<String> = files.iter().filter_map(|file| get_filename(file).ok()).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

/// Main entry point for the server.
///
/// Builds every language profile, then starts an Actix-web HTTP server.
/// The identifier is read-only once built, so it is shared without a lock.
///
/// # Notes
/// - `RS_LANG_DATA` sets the corpus folder (default `./data`).
/// - `RS_LANG_BIND` sets the bind address (default `127.0.0.1:5000`).
/// - `RUST_LOG` controls logging (`env_logger`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let data_folder = env::var("RS_LANG_DATA").unwrap_or_else(|_| DEFAULT_DATA.to_owned());
	let bind = env::var("RS_LANG_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_owned());

	let source = DirectorySource::new(&data_folder)?;
	let identifier = Identifier::with_source(source, IdentifierConfig::default());
	for failure in identifier.preload() {
		warn!("{failure}");
	}
	info!("Serving {:?} on {}", identifier.available_languages(), bind);

	let shared_data = web::Data::new(SharedData { identifier, data_folder });

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(shared_data.clone())
			.service(get_identify)
			.service(get_scores)
			.service(get_languages)
			.service(get_corpora)
	})
		.bind(bind)?
		.run()
		.await
}
