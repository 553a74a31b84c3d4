//! In-process imitation of the Crunchbase v3.1 API.
//!
//! Serves `{data, error}` envelopes for a small fixed data set and a handful
//! of misbehaving endpoints (redirect chains, redirect loops, slow responses,
//! error statuses, nested envelope errors) so the client can be exercised
//! over real HTTP.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;
use uuid::Uuid;

pub const API_VERSION: &str = "3.1";
pub const VALID_KEY: &str = "test-key";
/// Accepted by the transport but rejected inside the envelope.
pub const REVOKED_KEY: &str = "revoked-key";

pub const FACEBOOK_UUID: Uuid = Uuid::from_u128(0xdf66_2812_7f97_0b43_9d3e_12f1_0ecb_ca7e);
pub const ZUCKERBERG_UUID: Uuid = Uuid::from_u128(0xa01b_8d46_d311_3333_7c34_aa3a_e9c0_3f22);

/// Fixture store keyed by `(resource, permalink)`.
pub struct Store {
    entities: HashMap<(String, String), Value>,
    lists: HashMap<(String, String, String), Vec<Value>>,
}

pub type Db = Arc<Store>;

impl Store {
    pub fn fixtures() -> Self {
        let person = json!({
            "type": "Person",
            "uuid": ZUCKERBERG_UUID.simple().to_string(),
            "properties": {
                "permalink": "mark-zuckerberg",
                "first_name": "Mark",
                "last_name": "Zuckerberg",
                "gender": "Male",
                "born_on": "1984-05-14",
                "created_at": 1180153200
            },
            "relationships": {
                "primary_affiliation": {"item": {
                    "type": "Job",
                    "properties": {"title": "Founder & CEO", "is_current": true},
                    "relationships": {"organization": {"data": "facebook"}}
                }},
                "primary_location": {"item": {
                    "type": "Location",
                    "properties": {"name": "Palo Alto", "location_type": "city"}
                }}
            }
        });
        let organization = json!({
            "type": "Organization",
            "uuid": FACEBOOK_UUID.simple().to_string(),
            "properties": {
                "permalink": "facebook",
                "name": "Facebook",
                "short_description": "Facebook is an online social networking service.",
                "founded_on": "2004-02-04",
                "num_employees_min": 5001,
                "num_employees_max": 10000,
                "is_closed": false,
                "stock_symbol": "FB",
                "total_funding_usd": 2335700000.0,
                "created_at": 1180153200
            },
            "relationships": {
                "headquarters": {"item": {
                    "type": "Address",
                    "properties": {"name": "Headquarters", "city": "Menlo Park", "region": "California"}
                }},
                "founders": {
                    "paging": {"total_items": 1},
                    "items": [{
                        "type": "Person",
                        "uuid": ZUCKERBERG_UUID.simple().to_string(),
                        "properties": {"permalink": "mark-zuckerberg", "first_name": "Mark", "last_name": "Zuckerberg"}
                    }]
                },
                "current_team": {"items": [{
                    "type": "Job",
                    "properties": {"title": "Founder & CEO", "is_current": true},
                    "relationships": {"person": {
                        "type": "Person",
                        "properties": {"first_name": "Mark", "last_name": "Zuckerberg"}
                    }}
                }]},
                "ipo": {"item": {
                    "type": "Ipo",
                    "properties": {"went_public_on": "2012-05-18", "stock_symbol": "FB", "opening_share_price": 42.05}
                }},
                "acquisitions": {"items": []}
            }
        });
        let instagram = json!({
            "type": "Organization",
            "properties": {"permalink": "instagram", "name": "Instagram", "founded_on": "2010-10-06"}
        });
        let social = json!({
            "type": "Category",
            "properties": {"name": "Social Media", "organizations_in_category": 42000}
        });

        let mut entities = HashMap::new();
        entities.insert(("organizations".into(), "facebook".into()), organization.clone());
        entities.insert(("organizations".into(), "instagram".into()), instagram.clone());
        entities.insert(("people".into(), "mark-zuckerberg".into()), person.clone());
        entities.insert(("categories".into(), "social-media".into()), social.clone());

        let mut lists = HashMap::new();
        lists.insert(
            ("organizations".into(), "facebook".into(), "current_team".into()),
            vec![json!({
                "type": "Job",
                "properties": {"title": "Founder & CEO", "started_on": "2004-02-01", "is_current": true},
                "relationships": {"person": {"type": "Person", "properties": {"first_name": "Mark", "last_name": "Zuckerberg"}}}
            })],
        );
        lists.insert(
            ("organizations".into(), "facebook".into(), "past_team".into()),
            vec![json!({
                "type": "Job",
                "properties": {"title": "Co-Founder", "is_current": false},
                "relationships": {"person": {"type": "Person", "properties": {"first_name": "Dustin", "last_name": "Moskovitz"}}}
            })],
        );
        lists.insert(
            ("people".into(), "mark-zuckerberg".into(), "degrees".into()),
            Vec::new(),
        );

        Self { entities, lists }
    }

    fn collection(&self, resource: &str) -> Vec<Value> {
        let mut items: Vec<_> = self
            .entities
            .iter()
            .filter(|((r, _), _)| r == resource)
            .map(|((_, permalink), v)| (permalink.clone(), v.clone()))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items.into_iter().map(|(_, v)| v).collect()
    }

    fn by_uuid(&self, uuid: &str) -> Option<&Value> {
        self.entities.values().find(|v| v["uuid"] == uuid)
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(Store::fixtures());
    Router::new()
        .route("/v3.1/batch_search", post(batch_search))
        .route("/v3.1/{resource}", get(list_resource))
        .route("/v3.1/{resource}/{permalink}", get(get_entity))
        .route("/v3.1/{resource}/{permalink}/{category}", get(list_category))
        .route("/redirect/{hops}", get(redirect_chain))
        .route("/loop", get(redirect_loop))
        .route("/slow/{millis}", get(slow))
        .route("/status/{code}", get(status))
        .route("/nested-error/{code}", get(nested_error))
        .route("/not-json", get(not_json))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[derive(Debug, Deserialize)]
pub struct Params {
    pub user_key: Option<String>,
    pub page: Option<u32>,
    pub order: Option<String>,
}

fn envelope_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"data": null, "error": {"message": message, "status": status.as_u16()}})),
    )
        .into_response()
}

/// Missing key fails at the HTTP level; a revoked key fails inside a 200
/// envelope.
fn check_key(params: &Params) -> Result<(), Response> {
    if params.user_key.as_deref() != Some(VALID_KEY) {
        debug!(user_key = ?params.user_key, "rejecting request");
    }
    match params.user_key.as_deref() {
        None => Err(envelope_error(StatusCode::UNAUTHORIZED, "user_key is required")),
        Some(REVOKED_KEY) => Err((
            StatusCode::OK,
            Json(json!({"data": null, "error": {"message": "Invalid user key", "status": 401}})),
        )
            .into_response()),
        Some(VALID_KEY) => Ok(()),
        Some(_) => Err(envelope_error(StatusCode::FORBIDDEN, "unknown user_key")),
    }
}

fn paged(items: Vec<Value>, params: &Params) -> Value {
    json!({
        "paging": {
            "total_items": items.len(),
            "number_of_pages": 1,
            "current_page": params.page.unwrap_or(1),
            "items_per_page": 100,
            "sort_order": params.order.clone().unwrap_or_default()
        },
        "items": items
    })
}

async fn list_resource(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    if let Err(rejection) = check_key(&params) {
        return rejection;
    }
    Json(json!({"data": paged(db.collection(&resource), &params), "error": null})).into_response()
}

async fn get_entity(
    State(db): State<Db>,
    Path((resource, permalink)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    if let Err(rejection) = check_key(&params) {
        return rejection;
    }
    match db.entities.get(&(resource, permalink)) {
        Some(entity) => Json(json!({"data": entity, "error": null})).into_response(),
        None => envelope_error(StatusCode::NOT_FOUND, "Entity not found"),
    }
}

async fn list_category(
    State(db): State<Db>,
    Path((resource, permalink, category)): Path<(String, String, String)>,
    Query(params): Query<Params>,
) -> Response {
    if let Err(rejection) = check_key(&params) {
        return rejection;
    }
    match db.lists.get(&(resource, permalink, category)) {
        Some(items) => Json(json!({"data": paged(items.clone(), &params)})).into_response(),
        None => envelope_error(StatusCode::NOT_FOUND, "Relationship not found"),
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchBody {
    pub requests: Vec<BatchItem>,
}

#[derive(Debug, Deserialize)]
pub struct BatchItem {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub uuid: String,
}

async fn batch_search(
    State(db): State<Db>,
    Query(params): Query<Params>,
    Json(body): Json<BatchBody>,
) -> Response {
    if let Err(rejection) = check_key(&params) {
        return rejection;
    }
    let items: Vec<Value> = body
        .requests
        .iter()
        .map(|req| match db.by_uuid(&req.uuid) {
            Some(entity) => entity.clone(),
            None => json!({"type": req.entity_type, "uuid": req.uuid, "properties": {}}),
        })
        .collect();
    Json(json!({"data": {"items": items}})).into_response()
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// `/redirect/{n}` redirects to `/redirect/{n-1}`; `/redirect/0` redirects
/// to the facebook record. The query string is carried along each hop.
async fn redirect_chain(Path(hops): Path<u32>, RawQuery(query): RawQuery) -> Response {
    let suffix = query.map(|q| format!("?{q}")).unwrap_or_default();
    if hops == 0 {
        found(format!("/v{API_VERSION}/organizations/facebook{suffix}"))
    } else {
        found(format!("/redirect/{}{suffix}", hops - 1))
    }
}

async fn redirect_loop(RawQuery(query): RawQuery) -> Response {
    found(format!("/loop{}", query.map(|q| format!("?{q}")).unwrap_or_default()))
}

async fn slow(Path(millis): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(json!({"data": {"slept_ms": millis}}))
}

async fn status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let reason = status.canonical_reason().unwrap_or("error");
    envelope_error(status, reason)
}

async fn nested_error(Path(code): Path<u16>) -> Json<Value> {
    Json(json!({"data": {"error": {"code": code, "message": "nested failure"}}}))
}

async fn not_json() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/html")], "<html>maintenance</html>")
}
