//! `/api/venda`: sale submission and the paged sales report.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{ListSalesQuery, SaleDto, SalesPageDto, SubmitSaleRequest};
use crate::error::ApiResult;
use crate::session::CurrentOperator;
use crate::state::AppState;

/// `POST /api/venda`
///
/// The acting operator comes from the session; any operator id in the body
/// is ignored.
pub async fn submit(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    payload: Result<Json<SubmitSaleRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaleDto>)> {
    let Json(request) = payload?;
    let cart = request.cart()?;

    let sale = state
        .sales
        .submit_sale(&cart, request.tipo_pagamento.as_deref(), &operator)
        .await?;

    Ok((StatusCode::CREATED, Json(sale.into())))
}

/// `GET /api/venda?page=&limit=`
pub async fn list(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    query: Result<Query<ListSalesQuery>, QueryRejection>,
) -> ApiResult<Json<SalesPageDto>> {
    let Query(query) = query?;
    let (page, limit) = query.parse()?;

    let report = state.reports.list_sales(page, limit).await?;
    Ok(Json(report.into()))
}
