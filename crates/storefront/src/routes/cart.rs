//! Cart route handlers.
//!
//! Each visitor's cart is identified by a cart key kept in their session; the
//! key names the cart's durable slot. Mutating endpoints answer with an
//! `HX-Trigger: cart-updated` header so badges elsewhere on the page refresh.

use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use galeria_core::{CartLineItem, LineItemId, ProductId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::cart::{CartStore, FileStorage};
use crate::checkout::CheckoutComposer;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Message returned when a line is already in the cart.
pub const ALREADY_IN_CART: &str = "Item already in cart";

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub size: String,
    pub image_url: String,
    /// Formatted price, `None` for "price on request".
    pub price: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: usize,
    pub is_open: bool,
    /// WhatsApp link for the current contents, `None` when the cart is empty.
    pub checkout_url: Option<String>,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            is_open: false,
            checkout_url: None,
        }
    }

    fn from_store(store: &CartStore<FileStorage>, composer: &CheckoutComposer) -> Self {
        Self {
            items: store.items().iter().map(CartItemView::from).collect(),
            count: store.count(),
            is_open: store.is_open(),
            checkout_url: composer.compose_handoff(store.items()),
        }
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.to_string(),
            product_id: item.product_id.to_string(),
            name: item.name.clone(),
            category: item.category.clone(),
            size: item.size.clone(),
            image_url: item.image_url.clone(),
            price: item.display_price().map(|price| price.display()),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: usize,
}

/// Result of an add-to-cart request.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartResponse {
    pub added: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Defaults to the product's first size.
    pub size: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart key from the session, if the visitor has one.
async fn get_cart_key(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::CART_KEY)
        .await
        .ok()
        .flatten()
}

/// Get the cart key from the session, assigning a new one if needed.
async fn ensure_cart_key(session: &Session) -> Result<String> {
    if let Some(key) = get_cart_key(session).await {
        return Ok(key);
    }

    let key = Uuid::new_v4().simple().to_string();
    session
        .insert(session_keys::CART_KEY, &key)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store cart key: {e}")))?;
    Ok(key)
}

/// Render the visitor's cart, or an empty one if they have none.
async fn current_view(state: &AppState, session: &Session) -> CartView {
    match get_cart_key(session).await {
        Some(key) => state
            .carts()
            .with_cart(&key, |cart| CartView::from_store(cart, state.checkout())),
        None => CartView::empty(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart contents.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    Json(current_view(&state, &session).await)
}

/// Add a work to the cart.
///
/// A work already in the cart in the same size is not an error: the response
/// says `added: false`.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.catalog().get(&ProductId::new(form.product_id))?;
    let size = form
        .size
        .filter(|size| !size.trim().is_empty())
        .unwrap_or_else(|| product.default_size().to_string());
    if !product.offers_size(&size) {
        return Err(AppError::BadRequest(format!(
            "size {size} is not offered for {}",
            product.id
        )));
    }

    let key = ensure_cart_key(&session).await?;
    let (added, count) = state.carts().with_cart(&key, |cart| {
        let added = cart.add_item(&product, &size);
        (added, cart.count())
    });

    if added {
        Ok((
            AppendHeaders([CART_UPDATED]),
            Json(AddToCartResponse {
                added,
                count,
                message: None,
            }),
        )
            .into_response())
    } else {
        Ok(Json(AddToCartResponse {
            added,
            count,
            message: Some(ALREADY_IN_CART),
        })
        .into_response())
    }
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let Some(key) = get_cart_key(&session).await else {
        return Json(CartView::empty()).into_response();
    };

    let id = LineItemId::new(form.item_id);
    let view = state.carts().with_cart(&key, |cart| {
        cart.remove_item(&id);
        CartView::from_store(cart, state.checkout())
    });

    (AppendHeaders([CART_UPDATED]), Json(view)).into_response()
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let Some(key) = get_cart_key(&session).await else {
        return Json(CartView::empty()).into_response();
    };

    let view = state.carts().with_cart(&key, |cart| {
        cart.clear();
        CartView::from_store(cart, state.checkout())
    });

    (AppendHeaders([CART_UPDATED]), Json(view)).into_response()
}

/// Get cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Json<CartCount> {
    let count = match get_cart_key(&session).await {
        Some(key) => state.carts().with_cart(&key, |cart| cart.count()),
        None => 0,
    };
    Json(CartCount { count })
}

/// Open the cart drawer.
#[instrument(skip(state, session))]
pub async fn open(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let key = ensure_cart_key(&session).await?;
    Ok(Json(state.carts().with_cart(&key, |cart| {
        cart.open_drawer();
        CartView::from_store(cart, state.checkout())
    })))
}

/// Close the cart drawer.
#[instrument(skip(state, session))]
pub async fn close(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let Some(key) = get_cart_key(&session).await else {
        return Json(CartView::empty());
    };
    Json(state.carts().with_cart(&key, |cart| {
        cart.close_drawer();
        CartView::from_store(cart, state.checkout())
    }))
}

/// Redirect to the WhatsApp quote request for the cart.
///
/// An empty cart has nothing to send and goes back to the cart.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Redirect {
    let link = match get_cart_key(&session).await {
        Some(key) => state
            .carts()
            .with_cart(&key, |cart| state.checkout().compose_handoff(cart.items())),
        None => None,
    };

    match link {
        Some(url) => {
            tracing::info!(recipient = %state.checkout().recipient(), "Checkout handoff");
            Redirect::to(&url)
        }
        None => Redirect::to("/cart"),
    }
}
