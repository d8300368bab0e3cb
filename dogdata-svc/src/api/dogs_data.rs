//! `/dogs_data` endpoints
//!
//! | Method | Path                                       | Operation              |
//! |--------|--------------------------------------------|------------------------|
//! | POST   | /dogs_data                                 | create                 |
//! | GET    | /dogs_data/breeds                          | list breed names       |
//! | GET    | /dogs_data/all                             | list every record      |
//! | GET    | /dogs_data/BreedsAndUrl                    | breed + picture pairs  |
//! | GET    | /dogs_data/:id                             | read by id             |
//! | GET    | /dogs_data/:breed/:gender/:age             | read by point age      |
//! | GET    | /dogs_data/:breed/:gender/:from_age/:to_age| read by exact range    |
//! | PUT    | /dogs_data/:breed/:gender/:from_age/:to_age| partial update         |
//! | DELETE | /dogs_data                                 | delete everything      |
//! | DELETE | /dogs_data/:id                             | delete by id           |
//! | DELETE | /dogs_data/:breed/:gender/:from_age/:to_age| delete by exact range  |

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{AgeBand, AgeRange, BreedPicture, Gender};
use crate::validators;
use crate::AppState;

/// Body of 201 responses
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}

/// Body of successful deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

fn json_object(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(_) => Err(Error::Validation("Invalid request: expected a JSON object".to_string())),
        Err(rejection) => Err(Error::Validation(format!("Invalid request: {}", rejection.body_text()))),
    }
}

fn range_key(gender: &str, from_age: &str, to_age: &str) -> Result<(Gender, AgeRange)> {
    let gender = validators::parse_gender(gender)?;
    let range = AgeRange::new(
        validators::parse_age("from_age", from_age)?,
        validators::parse_age("to_age", to_age)?,
    );
    Ok((gender, range))
}

/// POST /dogs_data
pub async fn create_age_band(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let raw = json_object(body)?;
    let band = state.service.create(&raw).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Dog data created successfully".to_string(),
            id: band.id,
        }),
    ))
}

/// GET /dogs_data/breeds
pub async fn list_breeds(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.service.list_breeds().await?))
}

/// GET /dogs_data/all
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<AgeBand>>> {
    Ok(Json(state.service.list_all().await?))
}

/// GET /dogs_data/BreedsAndUrl
pub async fn list_breed_pictures(State(state): State<AppState>) -> Result<Json<Vec<BreedPicture>>> {
    Ok(Json(state.service.list_breed_pictures().await?))
}

/// GET /dogs_data/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgeBand>> {
    Ok(Json(state.service.get_by_id(&id).await?))
}

/// GET /dogs_data/:breed/:gender/:age
pub async fn get_by_age(
    State(state): State<AppState>,
    Path((breed, gender, age)): Path<(String, String, String)>,
) -> Result<Json<AgeBand>> {
    let gender = validators::parse_gender(&gender)?;
    let age = validators::parse_age("age", &age)?;
    Ok(Json(state.service.get_by_age(&breed, gender, age).await?))
}

/// GET /dogs_data/:breed/:gender/:from_age/:to_age
pub async fn get_by_range(
    State(state): State<AppState>,
    Path((breed, gender, from_age, to_age)): Path<(String, String, String, String)>,
) -> Result<Json<AgeBand>> {
    let (gender, range) = range_key(&gender, &from_age, &to_age)?;
    Ok(Json(state.service.get_by_range(&breed, gender, &range).await?))
}

/// PUT /dogs_data/:breed/:gender/:from_age/:to_age
pub async fn update_by_range(
    State(state): State<AppState>,
    Path((breed, gender, from_age, to_age)): Path<(String, String, String, String)>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<AgeBand>> {
    let (gender, range) = range_key(&gender, &from_age, &to_age)?;
    let raw = json_object(body)?;
    Ok(Json(state.service.update(&breed, gender, &range, &raw).await?))
}

/// DELETE /dogs_data
pub async fn delete_all(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.service.delete_all().await?;
    Ok(MessageResponse::new("All dog data deleted successfully"))
}

/// DELETE /dogs_data/:id
pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.service.delete_by_id(&id).await?;
    Ok(MessageResponse::new("Dog data deleted successfully"))
}

/// DELETE /dogs_data/:breed/:gender/:from_age/:to_age
pub async fn delete_by_range(
    State(state): State<AppState>,
    Path((breed, gender, from_age, to_age)): Path<(String, String, String, String)>,
) -> Result<Json<MessageResponse>> {
    let (gender, range) = range_key(&gender, &from_age, &to_age)?;
    state.service.delete_by_range(&breed, gender, &range).await?;
    Ok(MessageResponse::new("Dog data deleted successfully"))
}

/// Build `/dogs_data` routes
pub fn dogs_data_routes() -> Router<AppState> {
    Router::new()
        .route("/dogs_data", post(create_age_band).delete(delete_all))
        .route("/dogs_data/breeds", get(list_breeds))
        .route("/dogs_data/all", get(list_all))
        .route("/dogs_data/BreedsAndUrl", get(list_breed_pictures))
        .route("/dogs_data/:id", get(get_by_id).delete(delete_by_id))
        .route("/dogs_data/:breed/:gender/:age", get(get_by_age))
        .route(
            "/dogs_data/:breed/:gender/:from_age/:to_age",
            get(get_by_range).put(update_by_range).delete(delete_by_range),
        )
}
