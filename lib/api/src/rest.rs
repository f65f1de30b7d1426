use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use dogmatch_core::Error;
use dogmatch_inference::DogMatchPredictor;
use dogmatch_storage::{BreedRecord, PredictorCache};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const API_VERSION: &str = "1.0.0";
const DEFAULT_TOP_K: i64 = 5;

/// Shared state handed to every worker
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<PredictorCache>,
    pub breeds: Arc<Vec<BreedRecord>>,
}

impl AppState {
    pub fn new(cache: Arc<PredictorCache>, breeds: Vec<BreedRecord>) -> Self {
        Self {
            cache,
            breeds: Arc::new(breeds),
        }
    }
}

#[derive(Deserialize)]
struct RecommendQuery {
    top_k: Option<String>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, bind: &str, port: u16) -> std::io::Result<()> {
        info!("Starting REST API on {}:{}", bind, port);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind((bind, port))?
        .run()
        .await
    }
}

/// Register every route; unknown paths and methods answer with JSON errors
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/", web::get().to(home)))
        .service(resource("/api/health", web::get().to(health_check)))
        .service(resource("/api/recommend", web::post().to(recommend_breeds)))
        .service(resource("/api/breeds", web::get().to(list_breeds)))
        .service(resource("/api/features", web::get().to(get_features)))
        .service(resource("/api/model-info", web::get().to(get_model_info)))
        .service(resource("/api/example", web::get().to(get_example)))
        .default_service(web::to(not_found));
}

fn resource(path: &str, route: actix_web::Route) -> actix_web::Resource {
    web::resource(path)
        .route(route)
        .default_service(web::to(method_not_allowed))
}

async fn home() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "message": "DogMatch API - Hybrid Recommendation System",
        "version": API_VERSION,
        "status": "online",
        "endpoints": {
            "POST /api/recommend": "Recommend dog breeds",
            "GET /api/breeds": "List all breeds",
            "GET /api/health": "API status",
            "GET /api/features": "Feature information",
            "GET /api/model-info": "Model information",
            "GET /api/example": "Example request body"
        }
    })))
}

async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.cache.get() {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "status": "healthy",
            "model_loaded": true,
            "message": "API is working"
        }))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({
            "status": "unhealthy",
            "model_loaded": false,
            "error": e.to_string()
        }))),
    }
}

async fn recommend_breeds(
    state: web::Data<AppState>,
    query: web::Query<RecommendQuery>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let input = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Ok(bad_request("Invalid format: expected a JSON object")),
        Err(_) => return Ok(bad_request("JSON body is required")),
    };

    let top_k = match query.top_k.as_deref().map(str::trim) {
        None => DEFAULT_TOP_K,
        Some(raw) => match raw.parse::<i64>() {
            Ok(k) => k,
            Err(_) => return Ok(bad_request("top_k must be a positive integer")),
        },
    };

    let predictor = match state.cache.get() {
        Ok(predictor) => predictor,
        Err(e) => {
            error!("Predictor unavailable: {}", e);
            return Ok(internal_error());
        }
    };

    let worker = Arc::clone(&predictor);
    let outcome = web::block(move || worker.predict(&input, top_k)).await;
    let result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return Ok(prediction_error_response(&e, &predictor)),
        Err(e) => {
            error!("Prediction task failed: {}", e);
            return Ok(internal_error());
        }
    };

    let mut body = match serde_json::to_value(&result) {
        Ok(Value::Object(map)) => map,
        _ => return Ok(internal_error()),
    };
    if let Some(breeds) = body.get("similar_breeds").cloned() {
        body.insert("predictions".to_string(), breeds);
    }
    body.insert("api_version".to_string(), json!(API_VERSION));
    body.insert("timestamp".to_string(), json!(chrono::Utc::now().to_rfc3339()));

    Ok(HttpResponse::Ok().json(Value::Object(body)))
}

async fn list_breeds(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "breeds": state.breeds.as_ref(),
        "total_breeds": state.breeds.len(),
        "api_version": API_VERSION
    })))
}

async fn get_features(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let predictor = match state.cache.get() {
        Ok(predictor) => predictor,
        Err(e) => {
            error!("Predictor unavailable: {}", e);
            return Ok(internal_error());
        }
    };
    let info = predictor.feature_info();

    Ok(HttpResponse::Ok().json(json!({
        "features": {
            "categorical": info.categorical_columns,
            "numeric": info.numeric_columns,
            "total": info.feature_columns.len()
        },
        "categorical_values": info.categorical_values,
        "api_version": API_VERSION
    })))
}

async fn get_model_info(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let predictor = match state.cache.get() {
        Ok(predictor) => predictor,
        Err(e) => {
            error!("Predictor unavailable: {}", e);
            return Ok(internal_error());
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "model": predictor.model_info(),
        "api_version": API_VERSION
    })))
}

async fn get_example() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "example_input": example_input(),
        "description": "Example request body for /api/recommend",
        "usage": "POST /api/recommend with this JSON as the body"
    })))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": "Endpoint not found"}))
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({"error": "Method not allowed"}))
}

/// A complete preference row for the bundled breed dataset
pub fn example_input() -> Map<String, Value> {
    let example = json!({
        "Size": "Medium",
        "Exercise Requirements (hrs/day)": 2.0,
        "Good with Children": "Yes",
        "Intelligence Rating (1-10)": 7,
        "Training Difficulty (1-10)": 3,
        "Shedding Level": "Moderate",
        "Health Issues Risk": "Low",
        "Type": "Herding",
        "Friendly Rating (1-10)": 8,
        "Life Span": 12,
        "Average Weight (kg)": 20
    });
    match example {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    let message: String = message.into();
    HttpResponse::BadRequest().json(json!({ "error": message }))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"error": "Internal server error"}))
}

/// Validation errors become 400 with a hint; anything else is a bare 500
fn prediction_error_response(err: &Error, predictor: &DogMatchPredictor) -> HttpResponse {
    match err {
        Error::MissingFeature(_) => HttpResponse::BadRequest().json(json!({
            "error": err.to_string(),
            "required_fields": predictor.schema().feature_columns
        })),
        Error::InvalidCategory {
            column, allowed, ..
        } => HttpResponse::BadRequest().json(json!({
            "error": err.to_string(),
            "allowed_values": { column.as_str(): allowed }
        })),
        e if e.is_validation() => {
            warn!("Rejected request: {}", e);
            bad_request(e.to_string())
        }
        e => {
            error!("Prediction failed: {}", e);
            internal_error()
        }
    }
}
