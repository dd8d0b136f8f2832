//! JSON routes over the shopper session.
//!
//! Each route is one page read or one user gesture. Handlers hold the session lock for
//! the whole gesture and return the freshly derived view.

use std::sync::Arc;
use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post, put}, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::watch;
use validator::Validate;
use crate::application::{spawn_catalog_load, CartBadge, CartView, HeroInformation, SharedSession, StoreContext, StoreIdentity, StoreView};
use crate::domain::value_objects::{ProductId, Quantity, Rating, SortOption};
use crate::infrastructure::CatalogSource;
use crate::StorefrontError;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub store: Arc<StoreContext>,
    pub hero: Arc<HeroInformation>,
    pub source: Arc<dyn CatalogSource>,
    pub badge: watch::Receiver<CartBadge>,
}

impl From<StorefrontError> for (StatusCode, String) {
    fn from(e: StorefrontError) -> Self {
        let status = match &e {
            StorefrontError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            StorefrontError::CatalogNotReady => StatusCode::CONFLICT,
            StorefrontError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, e.to_string())
    }
}

fn validated<T: Validate>(req: T) -> Result<T, StorefrontError> {
    req.validate().map_err(|e| StorefrontError::Validation(e.to_string()))?;
    Ok(req)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        .route("/api/v1/home", get(home))
        .route("/api/v1/store-identity", get(store_identity))
        .route("/api/v1/store", get(store_view))
        .route("/api/v1/store/reload", post(reload))
        .route("/api/v1/store/filters/categories/:category/toggle", post(toggle_category))
        .route("/api/v1/store/filters/price", put(set_price))
        .route("/api/v1/store/filters/in-stock/toggle", post(toggle_in_stock))
        .route("/api/v1/store/filters/rating", put(set_rating))
        .route("/api/v1/store/filters/sort", put(set_sort))
        .route("/api/v1/store/filters/search", put(set_search))
        .route("/api/v1/store/filters/reset", post(reset_filters))
        .route("/api/v1/store/products/:id/cart", post(add_to_cart))
        .route("/api/v1/cart", get(cart_view))
        .route("/api/v1/cart/badge", get(cart_badge))
        .route("/api/v1/cart/:product_id", put(set_quantity).delete(remove_item))
        .with_state(state)
}

async fn home(State(s): State<AppState>) -> Json<HeroInformation> { Json(s.hero.as_ref().clone()) }

async fn store_identity(State(s): State<AppState>) -> Json<StoreIdentity> { Json(s.store.identity()) }

async fn store_view(State(s): State<AppState>) -> Json<StoreView> { Json(s.session.lock().await.store_view()) }

/// "Try Again": re-invokes the catalog source unless a load is already running.
async fn reload(State(s): State<AppState>) -> (StatusCode, Json<StoreView>) {
    let mut session = s.session.lock().await;
    if !session.retry() { return (StatusCode::OK, Json(session.store_view())); }
    spawn_catalog_load(s.session.clone(), s.source.clone());
    (StatusCode::ACCEPTED, Json(session.store_view()))
}

async fn toggle_category(State(s): State<AppState>, Path(category): Path<String>) -> ApiResult<StoreView> {
    let mut session = s.session.lock().await;
    session.toggle_category(&category)?;
    Ok(Json(session.store_view()))
}

#[derive(Debug, Deserialize)] pub struct PriceBoundsRequest { pub min: Decimal, pub max: Decimal }

async fn set_price(State(s): State<AppState>, Json(r): Json<PriceBoundsRequest>) -> ApiResult<StoreView> {
    let mut session = s.session.lock().await;
    session.set_price_bounds(r.min, r.max)?;
    Ok(Json(session.store_view()))
}

async fn toggle_in_stock(State(s): State<AppState>) -> ApiResult<StoreView> {
    let mut session = s.session.lock().await;
    session.toggle_in_stock()?;
    Ok(Json(session.store_view()))
}

#[derive(Debug, Deserialize)] pub struct RatingRequest { pub min_rating: Decimal }

async fn set_rating(State(s): State<AppState>, Json(r): Json<RatingRequest>) -> ApiResult<StoreView> {
    let rating = Rating::new(r.min_rating).map_err(|e| StorefrontError::Validation(e.to_string()))?;
    let mut session = s.session.lock().await;
    session.set_min_rating(rating)?;
    Ok(Json(session.store_view()))
}

#[derive(Debug, Deserialize)] pub struct SortRequest { pub sort: String }

async fn set_sort(State(s): State<AppState>, Json(r): Json<SortRequest>) -> ApiResult<StoreView> {
    let mut session = s.session.lock().await;
    session.set_sort(SortOption::parse_or_featured(&r.sort))?;
    Ok(Json(session.store_view()))
}

#[derive(Debug, Deserialize, Validate)] pub struct SearchRequest { #[validate(length(max = 200))] pub query: String }

async fn set_search(State(s): State<AppState>, Json(r): Json<SearchRequest>) -> ApiResult<StoreView> {
    let r = validated(r)?;
    let mut session = s.session.lock().await;
    session.set_search(&r.query)?;
    Ok(Json(session.store_view()))
}

async fn reset_filters(State(s): State<AppState>) -> ApiResult<StoreView> {
    let mut session = s.session.lock().await;
    session.reset_filters()?;
    Ok(Json(session.store_view()))
}

#[derive(Debug, Deserialize, Validate)] pub struct AddToCartRequest { #[validate(range(min = 1, max = 99))] pub quantity: Option<u32> }

async fn add_to_cart(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<AddToCartRequest>) -> ApiResult<CartView> {
    let r = validated(r)?;
    let quantity = r.quantity.and_then(Quantity::new).unwrap_or(Quantity::ONE);
    let mut session = s.session.lock().await;
    session.add_to_cart(&ProductId::new(id), quantity)?;
    Ok(Json(session.cart_view()))
}

async fn cart_view(State(s): State<AppState>) -> Json<CartView> { Json(s.session.lock().await.cart_view()) }

async fn cart_badge(State(s): State<AppState>) -> Json<CartBadge> { Json(s.badge.borrow().clone()) }

/// Values below 1 pass validation; the ledger ignores them.
#[derive(Debug, Deserialize, Validate)] pub struct SetQuantityRequest { #[validate(range(max = 99))] pub quantity: i64 }

async fn set_quantity(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<SetQuantityRequest>) -> ApiResult<CartView> {
    let r = validated(r)?;
    let mut session = s.session.lock().await;
    session.set_cart_quantity(&ProductId::new(id), r.quantity);
    Ok(Json(session.cart_view()))
}

async fn remove_item(State(s): State<AppState>, Path(id): Path<String>) -> Json<CartView> {
    let mut session = s.session.lock().await;
    session.remove_from_cart(&ProductId::new(id));
    Json(session.cart_view())
}
