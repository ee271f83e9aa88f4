//! # Product Handlers
//!
//! List, fetch, batch create, update and delete over the products
//! collection. Create, update and delete sit behind the token check; the
//! router wires that up, these handlers assume it already ran.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use futures_util::TryStreamExt;
use serde_json::Value;

use super::errors::{store_failure, ApiError, ApiResult};
use super::state::AppState;
use crate::models::{Product, ProductPayload};
use crate::store::{Document, Filter, ObjectId};
use crate::validation;

const ENTITY: &str = "Product";

/// `GET /products`
///
/// Every query parameter is an exact-equality term; no parameters lists all.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<Product>>> {
    let filter = Filter::from_query(params)?;

    let docs: Vec<Document> = state
        .products
        .find(&filter)
        .await
        .map_err(store_failure("find products", None))?
        .try_collect()
        .await
        .map_err(store_failure("read products", None))?;

    let products = docs
        .iter()
        .map(Document::decode::<Product>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(store_failure("decode products", None))?;

    Ok(Json(products))
}

/// `GET /products/:id`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = ObjectId::parse_str(&id)?;

    let doc = state
        .products
        .find_one(&Filter::by_id(id))
        .await
        .map_err(store_failure("find product", Some(id)))?
        .ok_or(ApiError::NotFound(ENTITY))?;

    let product = doc
        .decode::<Product>()
        .map_err(store_failure("decode product", Some(id)))?;
    Ok(Json(product))
}

/// `POST /products`
///
/// Body is a JSON array. Every element is validated before anything is
/// written; one bad element rejects the batch and nothing is persisted.
pub async fn create_products(
    State(state): State<AppState>,
    body: Result<Json<Vec<ProductPayload>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<ObjectId>>)> {
    let Json(payloads) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    if payloads.is_empty() {
        return Err(ApiError::MalformedBody(
            "expected at least one product".to_string(),
        ));
    }

    validation::check_all(&payloads)?;

    let mut docs = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let mut product = payload.into_product(None);
        let id = product.assign_id();
        let doc = Document::from_record(id, &product)
            .map_err(store_failure("encode product", Some(id)))?;
        docs.push(doc);
    }

    let ids = state
        .products
        .insert_many(docs)
        .await
        .map_err(store_failure("insert products", None))?;

    tracing::info!(count = ids.len(), "products created");
    Ok((StatusCode::CREATED, Json(ids)))
}

/// `PUT /products/:id`
///
/// Fields in the body replace the stored ones; omitted fields keep their
/// stored values. The merged record must pass the same rules as a new one
/// and is written whole, so a field cleared by the body is cleared in the
/// store too. An `_id` in the body is ignored.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = ObjectId::parse_str(&id)?;
    let Json(body) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let Value::Object(patch) = body else {
        return Err(ApiError::MalformedBody(
            "expected a JSON object".to_string(),
        ));
    };

    let filter = Filter::by_id(id);
    let stored = state
        .products
        .find_one(&filter)
        .await
        .map_err(store_failure("find product", Some(id)))?
        .ok_or(ApiError::NotFound(ENTITY))?;

    let payload = ProductPayload::merged(&stored.fields, patch)
        .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    validation::check(&payload)?;

    let product = payload.into_product(Some(id));
    let doc = Document::from_record(id, &product)
        .map_err(store_failure("encode product", Some(id)))?;

    let matched = state
        .products
        .replace_one(&filter, doc.fields)
        .await
        .map_err(store_failure("update product", Some(id)))?;
    if matched == 0 {
        // Deleted between the read and the write
        return Err(ApiError::NotFound(ENTITY));
    }

    tracing::info!(%id, "product updated");
    Ok(Json(product))
}

/// `DELETE /products/:id`
///
/// Responds with the deleted count, which is always 1 on success.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<u64>> {
    let id = ObjectId::parse_str(&id)?;

    let deleted = state
        .products
        .delete_one(&Filter::by_id(id))
        .await
        .map_err(store_failure("delete product", Some(id)))?;
    if deleted == 0 {
        return Err(ApiError::NotFound(ENTITY));
    }

    tracing::info!(%id, "product deleted");
    Ok(Json(deleted))
}
