//! In-memory stand-in for the Ulule API.
//!
//! Serves a fixed `Fixture` over the same routes, envelopes and pagination
//! scheme as the real service, under a `/v1` prefix. Listing endpoints and
//! `/me` require an `Authorization` header from the accepted set.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub absolute_url: String,
    pub username: String,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub lang: String,
    pub country: Option<String>,
    pub timezone: String,
    pub is_staff: bool,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reward {
    pub id: u64,
    pub price: i64,
    pub stock: Option<i64>,
    pub stock_taken: i64,
    pub available: bool,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub description_de: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub slug: String,
    pub absolute_url: String,
    pub goal: i64,
    pub amount_raised: i64,
    pub goal_raised: bool,
    pub currency: String,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub finished: bool,
    pub is_online: bool,
    pub lang: String,
    pub supporters_count: u64,
    pub rewards: Vec<Reward>,
    #[serde(skip)]
    pub owner_id: u64,
    #[serde(skip)]
    pub follower_ids: Vec<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Address {
    pub id: u64,
    pub user_id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItem {
    pub reward_id: u64,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_subtotal: f64,
    pub line_shipping_total: f64,
    pub line_total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub project_id: u64,
    pub order_subtotal: f64,
    pub order_shipping_total: f64,
    pub order_total: f64,
    pub payment_method: String,
    pub status: i64,
    pub items: Vec<OrderItem>,
    pub user: User,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    pub limit: usize,
    pub offset: usize,
    pub total_count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// The data set served by the mock.
#[derive(Clone, Debug, Default)]
pub struct Fixture {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub orders: Vec<Order>,
}

pub const ALICE: u64 = 241660;
pub const BOB: u64 = 7;
pub const CAROL: u64 = 8;
pub const FLAGSHIP: u64 = 31458;
pub const FOLLOWED: u64 = 4242;
pub const BACKED: u64 = 5150;

impl Fixture {
    /// Three users, three projects, and a handful of orders on the flagship
    /// project owned by alice.
    pub fn demo() -> Self {
        let users = vec![
            user(ALICE, "bloglaurel", Some("laurel@example.com")),
            user(BOB, "bob", None),
            user(CAROL, "carol", Some("carol@example.com")),
        ];

        let projects = vec![
            Project {
                rewards: vec![
                    Reward {
                        id: 101,
                        price: 10,
                        stock: None,
                        stock_taken: 3,
                        available: true,
                        description_en: Some("A thank-you postcard".to_string()),
                        description_fr: Some("Une carte de remerciement".to_string()),
                        description_de: None,
                    },
                    Reward {
                        id: 102,
                        price: 25,
                        stock: Some(50),
                        stock_taken: 2,
                        available: true,
                        description_en: None,
                        description_fr: Some("Le livre dédicacé".to_string()),
                        description_de: None,
                    },
                ],
                follower_ids: vec![BOB],
                supporters_count: 3,
                ..project(FLAGSHIP, "comme-convenu-2", ALICE)
            },
            Project {
                follower_ids: vec![ALICE],
                ..project(FOLLOWED, "demo-followed", BOB)
            },
            project(BACKED, "backed-by-alice", CAROL),
        ];

        let orders = vec![
            order(9001, FLAGSHIP, &users[1], 4, 101),
            order(9002, FLAGSHIP, &users[2], 5, 102),
            order(9003, FLAGSHIP, &users[0], 99, 101),
            order(9004, BACKED, &users[0], 7, 101),
        ];

        Self {
            users,
            projects,
            orders,
        }
    }

    fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn supporters(&self, project_id: u64) -> Vec<User> {
        let mut ids: Vec<u64> = self
            .orders
            .iter()
            .filter(|o| o.project_id == project_id)
            .map(|o| o.user.id)
            .collect();
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(*id));
        ids.iter().filter_map(|id| self.user(*id)).cloned().collect()
    }
}

fn user(id: u64, username: &str, email: Option<&str>) -> User {
    User {
        id,
        absolute_url: format!("https://www.ulule.com/{username}/"),
        username: username.to_string(),
        name: username.to_string(),
        first_name: None,
        last_name: None,
        lang: "fr".to_string(),
        country: Some("FR".to_string()),
        timezone: "Europe/Paris".to_string(),
        is_staff: false,
        email: email.map(str::to_string),
    }
}

fn project(id: u64, slug: &str, owner_id: u64) -> Project {
    Project {
        id,
        slug: slug.to_string(),
        absolute_url: format!("https://www.ulule.com/{slug}/"),
        goal: 5000,
        amount_raised: 6200,
        goal_raised: true,
        currency: "EUR".to_string(),
        date_start: Some("2016-04-01T10:00:00+02:00".to_string()),
        date_end: Some("2016-05-15T23:59:00+02:00".to_string()),
        finished: true,
        is_online: true,
        lang: "fr".to_string(),
        supporters_count: 1,
        rewards: Vec::new(),
        owner_id,
        follower_ids: Vec::new(),
    }
}

fn order(id: u64, project_id: u64, buyer: &User, status: i64, reward_id: u64) -> Order {
    let address = Address {
        id: id + 100_000,
        user_id: buyer.id,
        first_name: Some(buyer.username.clone()),
        last_name: None,
        address1: Some("1 rue de la Paix".to_string()),
        city: Some("Paris".to_string()),
        country: Some("FR".to_string()),
        postal_code: Some("75002".to_string()),
    };
    Order {
        id,
        project_id,
        order_subtotal: 25.0,
        order_shipping_total: 4.5,
        order_total: 29.5,
        payment_method: "card".to_string(),
        status,
        items: vec![OrderItem {
            reward_id,
            unit_price: 25.0,
            quantity: 1,
            line_subtotal: 25.0,
            line_shipping_total: 4.5,
            line_total: 29.5,
        }],
        user: buyer.clone(),
        shipping_address: Some(address),
        billing_address: None,
        created_at: Some(format!("2016-05-0{}T10:22:31+02:00", id % 9 + 1)),
    }
}

#[derive(Clone)]
pub struct AppState {
    fixture: Arc<Fixture>,
    /// Accepted `Authorization` header values and the user each one logs in.
    tokens: Arc<HashMap<String, u64>>,
}

impl AppState {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture: Arc::new(fixture),
            tokens: Arc::new(HashMap::new()),
        }
    }

    /// Accept `authorization` as logging in `user_id`.
    pub fn accept(mut self, authorization: impl Into<String>, user_id: u64) -> Self {
        Arc::make_mut(&mut self.tokens).insert(authorization.into(), user_id);
        self
    }

    /// Demo fixture accepting alice's API key and an access token for bob.
    pub fn demo() -> Self {
        Self::new(Fixture::demo())
            .accept("Bearer bloglaurel:s3cret", ALICE)
            .accept("Bearer bob-token", BOB)
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<u64, StatusCode> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| self.tokens.get(value).copied())
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/me", get(current_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/projects", get(list_user_projects))
        .route("/users/{id}/orders", get(list_user_orders))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}/rewards", get(list_project_rewards))
        .route("/projects/{id}/supporters", get(list_project_supporters))
        .route("/projects/{id}/orders", get(list_project_orders))
        .with_state(state);
    Router::new().nest("/v1", api)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub state: Option<String>,
}

/// Slice `items` and describe the neighbouring pages as `/v1{path}` URLs.
fn paginate<T: Clone>(items: &[T], path: &str, query: &PageQuery) -> (Meta, Vec<T>) {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let total = items.len();
    let page = items.iter().skip(offset).take(limit).cloned().collect();

    let end = offset.saturating_add(limit);
    let next = (limit > 0 && end < total).then(|| format!("/v1{path}?limit={limit}&offset={end}"));
    let previous = (offset > 0).then(|| format!("/v1{path}?limit={limit}&offset={}", offset.saturating_sub(limit)));

    let meta = Meta {
        limit,
        offset,
        total_count: total,
        next,
        previous,
    };
    (meta, page)
}

async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<User>, StatusCode> {
    let id = state.authorize(&headers)?;
    state.fixture.user(id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_user(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    state.fixture.user(id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_project(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Project>, StatusCode> {
    state.fixture.project(id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn list_user_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.authorize(&headers)?;
    state.fixture.user(id).ok_or(StatusCode::NOT_FOUND)?;

    let supported: Vec<u64> = state
        .fixture
        .orders
        .iter()
        .filter(|o| o.user.id == id)
        .map(|o| o.project_id)
        .collect();
    let created = |p: &Project| p.owner_id == id;
    let followed = |p: &Project| p.follower_ids.contains(&id);
    let backed = |p: &Project| supported.contains(&p.id);

    let projects: Vec<Project> = match query.state.as_deref().unwrap_or("") {
        "created" => state.fixture.projects.iter().filter(|&p| created(p)).cloned().collect(),
        "followed" => state.fixture.projects.iter().filter(|&p| followed(p)).cloned().collect(),
        "supported" => state.fixture.projects.iter().filter(|&p| backed(p)).cloned().collect(),
        "" => state
            .fixture
            .projects
            .iter()
            .filter(|&p| created(p) || followed(p) || backed(p))
            .cloned()
            .collect(),
        _ => return Err(StatusCode::BAD_REQUEST),
    };

    let meta = Meta {
        limit: DEFAULT_LIMIT,
        offset: 0,
        total_count: projects.len(),
        next: None,
        previous: None,
    };
    Ok(Json(serde_json::json!({ "meta": meta, "projects": projects })))
}

async fn list_project_rewards(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let project = state.fixture.project(id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(serde_json::json!({ "rewards": project.rewards })))
}

async fn list_project_supporters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.authorize(&headers)?;
    state.fixture.project(id).ok_or(StatusCode::NOT_FOUND)?;
    let supporters = state.fixture.supporters(id);
    let (meta, page) = paginate(&supporters, &format!("/projects/{id}/supporters"), &query);
    Ok(Json(serde_json::json!({ "meta": meta, "supporters": page })))
}

async fn list_project_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.authorize(&headers)?;
    state.fixture.project(id).ok_or(StatusCode::NOT_FOUND)?;
    let orders: Vec<Order> = state
        .fixture
        .orders
        .iter()
        .filter(|o| o.project_id == id)
        .cloned()
        .collect();
    let (meta, page) = paginate(&orders, &format!("/projects/{id}/orders"), &query);
    Ok(Json(serde_json::json!({ "meta": meta, "orders": page })))
}

async fn list_user_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.authorize(&headers)?;
    state.fixture.user(id).ok_or(StatusCode::NOT_FOUND)?;
    let orders: Vec<Order> = state
        .fixture
        .orders
        .iter()
        .filter(|o| o.user.id == id)
        .cloned()
        .collect();
    let (meta, page) = paginate(&orders, &format!("/users/{id}/orders"), &query);
    Ok(Json(serde_json::json!({ "meta": meta, "orders": page })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<usize>, offset: Option<usize>) -> PageQuery {
        PageQuery { limit, offset }
    }

    #[test]
    fn paginate_first_page_links_next() {
        let items: Vec<u32> = (0..5).collect();
        let (meta, page) = paginate(&items, "/projects/1/orders", &query(Some(2), None));
        assert_eq!(page, vec![0, 1]);
        assert_eq!(meta.total_count, 5);
        assert_eq!(meta.next.as_deref(), Some("/v1/projects/1/orders?limit=2&offset=2"));
        assert!(meta.previous.is_none());
    }

    #[test]
    fn paginate_last_page_has_no_next() {
        let items: Vec<u32> = (0..5).collect();
        let (meta, page) = paginate(&items, "/p", &query(Some(2), Some(4)));
        assert_eq!(page, vec![4]);
        assert!(meta.next.is_none());
        assert_eq!(meta.previous.as_deref(), Some("/v1/p?limit=2&offset=2"));
    }

    #[test]
    fn paginate_defaults() {
        let items: Vec<u32> = (0..3).collect();
        let (meta, page) = paginate(&items, "/p", &query(None, None));
        assert_eq!(meta.limit, DEFAULT_LIMIT);
        assert_eq!(page.len(), 3);
        assert!(meta.next.is_none());
    }

    #[test]
    fn paginate_huge_limit_is_one_page() {
        let items: Vec<u32> = (0..3).collect();
        let (meta, page) = paginate(&items, "/p", &query(Some(usize::MAX), Some(1)));
        assert_eq!(page, vec![1, 2]);
        assert!(meta.next.is_none());
        assert_eq!(meta.previous.as_deref(), Some(format!("/v1/p?limit={}&offset=0", usize::MAX).as_str()));

        let (meta, page) = paginate(&items, "/p", &query(Some(2), Some(usize::MAX)));
        assert!(page.is_empty());
        assert!(meta.next.is_none());
    }

    #[test]
    fn project_serializes_without_relations() {
        let fixture = Fixture::demo();
        let json = serde_json::to_value(&fixture.projects[0]).unwrap();
        assert_eq!(json["id"], FLAGSHIP);
        assert_eq!(json["slug"], "comme-convenu-2");
        assert!(json.get("owner_id").is_none());
        assert!(json.get("follower_ids").is_none());
    }

    #[test]
    fn supporters_are_distinct_buyers() {
        let fixture = Fixture::demo();
        let ids: Vec<u64> = fixture.supporters(FLAGSHIP).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![BOB, CAROL, ALICE]);
    }

    #[test]
    fn repeat_buyer_is_listed_once() {
        let mut fixture = Fixture::demo();
        let bob = fixture.user(BOB).cloned().unwrap();
        fixture.orders.push(order(9005, FLAGSHIP, &bob, 4, 101));
        let ids: Vec<u64> = fixture.supporters(FLAGSHIP).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![BOB, CAROL, ALICE]);
    }

    #[test]
    fn accept_registers_tokens() {
        let state = AppState::demo();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer bob-token".parse().unwrap());
        assert_eq!(state.authorize(&headers), Ok(BOB));
        assert_eq!(state.authorize(&HeaderMap::new()), Err(StatusCode::UNAUTHORIZED));
    }
}
