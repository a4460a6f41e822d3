use axum::extract::{Path, State};
use kramik_core::{NewProduct, Product, ProductId};
use kramik_store::ProductSelector;
use serde::Serialize;
use snafu::OptionExt as _;
use tracing::info;

use super::{AppJson, Message};
use crate::auth::PerformerToken;
use crate::error::{ProductNotFoundSnafu, RequestResult};
use crate::{LOG_TARGET, SharedState};

#[derive(Serialize)]
pub struct ProductsResponse {
    products: Vec<Product>,
}

/// `GET /products` — the whole catalog. Any `performer_token` present
/// is ignored.
pub async fn list(State(state): State<SharedState>) -> RequestResult<AppJson<ProductsResponse>> {
    let products = state.storage.list_products().await?;
    Ok(AppJson(ProductsResponse { products }))
}

/// Single-product payload with every field rendered as a string.
#[derive(Serialize)]
pub struct ProductDetails {
    id: String,
    name: String,
    price: String,
    quantity: String,
    description: String,
    category: String,
}

impl From<Product> for ProductDetails {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            price: product.price.to_string(),
            quantity: product.quantity.to_string(),
            description: product.description,
            category: product.category,
        }
    }
}

/// `GET /products/{product_id}`
pub async fn get_by_id(
    State(state): State<SharedState>,
    Path(product_id): Path<ProductId>,
) -> RequestResult<AppJson<ProductDetails>> {
    let product = state
        .storage
        .product_by_id(product_id)
        .await?
        .context(ProductNotFoundSnafu)?;

    Ok(AppJson(product.into()))
}

/// `POST /add_product` — admin-gated.
pub async fn add(
    State(state): State<SharedState>,
    PerformerToken(token): PerformerToken,
    AppJson(new): AppJson<NewProduct>,
) -> RequestResult<AppJson<Message>> {
    state.authorize(&token, true).await?;

    let product = state.storage.insert_product(new).await?;
    info!(target: LOG_TARGET, id = %product.id, name = %product.name, "Product added");

    Ok(AppJson(Message {
        message: "Product added successfully",
    }))
}

/// `POST /remove_product/{id_or_name}` — admin-gated. A numeric
/// segment removes by id, anything else by exact name.
pub async fn remove(
    State(state): State<SharedState>,
    PerformerToken(token): PerformerToken,
    Path(id_or_name): Path<String>,
) -> RequestResult<AppJson<Message>> {
    state.authorize(&token, true).await?;

    let selector = ProductSelector::parse(&id_or_name);
    if !state.storage.remove_product(&selector).await? {
        return ProductNotFoundSnafu.fail();
    }
    info!(target: LOG_TARGET, segment = %id_or_name, "Product removed");

    Ok(AppJson(Message {
        message: "Product removed successfully",
    }))
}
