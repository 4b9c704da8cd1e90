//! `/api/produto`: catalog listing, registration, stock adjustment and the
//! cashier's barcode lookup.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use sabor_core::ValidationError;
use sabor_engine::ProductRegistration;

use crate::dto::{AdjustStockRequest, ProductDto, RegisterProductRequest};
use crate::error::ApiResult;
use crate::session::CurrentOperator;
use crate::state::AppState;

/// `GET /api/produto`
pub async fn list(
    State(state): State<AppState>,
    _operator: CurrentOperator,
) -> ApiResult<Json<Vec<ProductDto>>> {
    let products = state.catalog.list_products().await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// `POST /api/produto`
pub async fn register(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    payload: Result<Json<RegisterProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductDto>)> {
    let Json(request) = payload?;

    let price = request
        .preco_unitario
        .as_ref()
        .ok_or_else(|| ValidationError::Required {
            field: "precoUnitario".to_string(),
        })?
        .to_price()?;
    let initial_quantity = match &request.qtd_estoque {
        Some(quantity) => quantity.to_integer("qtdEstoque")?,
        None => 0,
    };

    let product = state
        .catalog
        .register_product(ProductRegistration {
            name: request.nome,
            barcode: request.codigo_barras,
            price,
            initial_quantity,
        })
        .await?;

    tracing::info!(
        product_id = product.id,
        operator_id = operator.id,
        "Product registered via API"
    );
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// `PATCH /api/produto`
pub async fn adjust_stock(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    payload: Result<Json<AdjustStockRequest>, JsonRejection>,
) -> ApiResult<Json<ProductDto>> {
    let Json(request) = payload?;
    let (product_id, quantity) = request.into_parts()?;

    let product = state.stock.adjust_stock(product_id, quantity).await?;

    tracing::debug!(product_id, operator_id = operator.id, "Stock adjusted via API");
    Ok(Json(product.into()))
}

/// `GET /api/produto/{codigo}`
pub async fn find_by_barcode(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(codigo): Path<String>,
) -> ApiResult<Json<ProductDto>> {
    let product = state.catalog.find_by_barcode(&codigo).await?;
    Ok(Json(product.into()))
}
