//! # Wire Types
//!
//! Request and response bodies for the HTTP API.
//!
//! The back-office frontend speaks the catalog in Portuguese field names
//! (`nome`, `codigoBarras`, `precoUnitario`, `qtdEstoque`) and the sales report
//! in English camelCase. Money always leaves as a decimal string (`"22.00"`).
//!
//! Inbound numbers are loose: the cashier form sends `"35"` or `"22,50"` as
//! often as `35` or `22.5`. [`LooseNumber`] accepts all of them and converts
//! exactly once, here, into the engine's typed values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sabor_core::pricing::CartLine;
use sabor_core::validation::{parse_integer, parse_price};
use sabor_core::report::{
    PageInfo, PaymentBreakdown, SaleDetail, SaleLineDetail, SalesPage, SalesSummary,
};
use sabor_core::{Money, Operator, Product, ValidationError};

// =============================================================================
// Loose Inbound Numbers
// =============================================================================

/// Largest magnitude at which every whole `f64` is exact (2^53).
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// A JSON number or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    /// Interprets the value as a whole number. `2.0` is accepted, `2.5` is not.
    ///
    /// Floats beyond 2^53 are rejected instead of rounded, as are integers
    /// written past the `i64` range (serde reads those as floats).
    pub fn to_integer(&self, field: &str) -> Result<i64, ValidationError> {
        match self {
            LooseNumber::Integer(n) => Ok(*n),
            LooseNumber::Float(f) if f.is_finite() && f.abs() > MAX_EXACT_FLOAT => {
                Err(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: "is out of range".to_string(),
                })
            }
            LooseNumber::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(*f as i64),
            LooseNumber::Float(_) => Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "must be an integer".to_string(),
            }),
            LooseNumber::Text(s) => parse_integer(field, s),
        }
    }

    /// Interprets the value as a price. Strings may use `,` as the decimal
    /// separator.
    pub fn to_price(&self) -> Result<Money, ValidationError> {
        match self {
            LooseNumber::Integer(n) => parse_price(&n.to_string()),
            LooseNumber::Float(f) => parse_price(&f.to_string()),
            LooseNumber::Text(s) => parse_price(s),
        }
    }
}

fn required<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T, ValidationError> {
    value.as_ref().ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub senha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperatorDto {
    pub id: i64,
    pub nome: String,
    pub login: String,
}

impl From<Operator> for OperatorDto {
    fn from(op: Operator) -> Self {
        OperatorDto {
            id: op.id,
            nome: op.name,
            login: op.login,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub operador: OperatorDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub nome: String,
    pub codigo_barras: String,
    pub preco_unitario: String,
    pub qtd_estoque: i64,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            preco_unitario: p.price().to_string(),
            id: p.id,
            nome: p.name,
            codigo_barras: p.barcode,
            qtd_estoque: p.stock_quantity,
        }
    }
}

/// `POST /api/produto`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProductRequest {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub codigo_barras: String,
    pub preco_unitario: Option<LooseNumber>,
    pub qtd_estoque: Option<LooseNumber>,
}

/// `PATCH /api/produto`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    pub id: Option<LooseNumber>,
    pub qtd_estoque: Option<LooseNumber>,
}

impl AdjustStockRequest {
    /// `(product id, target quantity)`
    pub fn into_parts(self) -> Result<(i64, i64), ValidationError> {
        let id = required("id", &self.id)?.to_integer("id")?;
        let quantity = required("qtdEstoque", &self.qtd_estoque)?.to_integer("qtdEstoque")?;
        Ok((id, quantity))
    }
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub id_produto: Option<LooseNumber>,
    pub quantidade: Option<LooseNumber>,
}

/// `POST /api/venda`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSaleRequest {
    #[serde(default)]
    pub itens: Vec<SaleItemRequest>,
    pub tipo_pagamento: Option<String>,
}

impl SubmitSaleRequest {
    pub fn cart(&self) -> Result<Vec<CartLine>, ValidationError> {
        self.itens
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let id_field = format!("itens[{i}].idProduto");
                let qty_field = format!("itens[{i}].quantidade");
                let product_id = required(&id_field, &item.id_produto)?.to_integer(&id_field)?;
                let quantity = required(&qty_field, &item.quantidade)?.to_integer(&qty_field)?;
                Ok(CartLine::new(product_id, quantity))
            })
            .collect()
    }
}

/// `GET /api/venda?page=&limit=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSalesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListSalesQuery {
    /// Blank parameters fall back to defaults; anything else must be an integer.
    pub fn parse(&self) -> Result<(Option<i64>, Option<i64>), ValidationError> {
        let page = optional_integer("page", self.page.as_deref())?;
        let limit = optional_integer("limit", self.limit.as_deref())?;
        Ok((page, limit))
    }
}

fn optional_integer(field: &str, value: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_integer(field, v).map(Some),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperatorRefDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRefDto {
    pub id: i64,
    pub name: String,
    pub barcode: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDto {
    pub id: i64,
    pub quantity: i64,
    pub unit_price_at_sale: String,
    pub subtotal: String,
    /// `null` once the product has been removed from the catalog.
    pub product: Option<ProductRefDto>,
}

impl From<SaleLineDetail> for SaleItemDto {
    fn from(line: SaleLineDetail) -> Self {
        SaleItemDto {
            subtotal: line.subtotal().to_string(),
            unit_price_at_sale: line.unit_price.to_string(),
            id: line.id,
            quantity: line.quantity,
            product: line.product.map(|p| ProductRefDto {
                id: p.id,
                name: p.name,
                barcode: p.barcode,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total: String,
    pub payment_tag: String,
    pub operator: OperatorRefDto,
    pub items: Vec<SaleItemDto>,
}

impl From<SaleDetail> for SaleDto {
    fn from(sale: SaleDetail) -> Self {
        SaleDto {
            id: sale.id,
            created_at: sale.created_at,
            total: sale.total.to_string(),
            payment_tag: sale.payment_tag,
            operator: OperatorRefDto {
                id: sale.operator.id,
                name: sale.operator.name,
            },
            items: sale.items.into_iter().map(SaleItemDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdownDto {
    pub payment_tag: String,
    pub count: i64,
    pub total: String,
}

impl From<PaymentBreakdown> for PaymentBreakdownDto {
    fn from(b: PaymentBreakdown) -> Self {
        PaymentBreakdownDto {
            payment_tag: b.payment_tag,
            count: b.count,
            total: b.total.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummaryDto {
    pub total_sales: i64,
    pub total_revenue: String,
    pub average_sale: String,
    pub first_sale_at: Option<DateTime<Utc>>,
    pub last_sale_at: Option<DateTime<Utc>>,
    pub by_payment: Vec<PaymentBreakdownDto>,
}

impl From<SalesSummary> for SalesSummaryDto {
    fn from(s: SalesSummary) -> Self {
        SalesSummaryDto {
            total_sales: s.total_sales,
            total_revenue: s.total_revenue.to_string(),
            average_sale: s.average_sale.to_string(),
            first_sale_at: s.first_sale_at,
            last_sale_at: s.last_sale_at,
            by_payment: s.by_payment.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoDto {
    pub page: i64,
    pub page_size: i64,
    pub total_records: i64,
    pub total_pages: i64,
}

impl From<PageInfo> for PageInfoDto {
    fn from(p: PageInfo) -> Self {
        PageInfoDto {
            page: p.page,
            page_size: p.page_size,
            total_records: p.total_records,
            total_pages: p.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPageDto {
    pub sales: Vec<SaleDto>,
    pub summary: SalesSummaryDto,
    pub page_info: PageInfoDto,
}

impl From<SalesPage> for SalesPageDto {
    fn from(page: SalesPage) -> Self {
        SalesPageDto {
            sales: page.sales.into_iter().map(SaleDto::from).collect(),
            summary: page.summary.into(),
            page_info: page.page_info.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose(json: &str) -> LooseNumber {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_loose_integers() {
        assert_eq!(loose("35").to_integer("q").unwrap(), 35);
        assert_eq!(loose("\"35\"").to_integer("q").unwrap(), 35);
        assert_eq!(loose("2.0").to_integer("q").unwrap(), 2);
        assert!(loose("2.5").to_integer("q").is_err());
        assert!(loose("\"2.5\"").to_integer("q").is_err());
        assert!(loose("\"abc\"").to_integer("q").is_err());
    }

    #[test]
    fn test_loose_integers_out_of_range() {
        assert_eq!(
            loose("9007199254740992.0").to_integer("q").unwrap(),
            9_007_199_254_740_992
        );
        assert!(loose("9007199254740994.0").to_integer("q").is_err());
        assert!(loose("-1e300").to_integer("q").is_err());

        for body in [
            r#"{"id":1,"qtdEstoque":1e20}"#,
            r#"{"id":1,"qtdEstoque":100000000000000000000}"#,
        ] {
            let request: AdjustStockRequest = serde_json::from_str(body).unwrap();
            let err = request.into_parts().unwrap_err();
            assert_eq!(err.field(), "qtdEstoque");
            assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        }
    }

    #[test]
    fn test_loose_prices() {
        assert_eq!(loose("22").to_price().unwrap(), Money::from_cents(2200));
        assert_eq!(loose("22.5").to_price().unwrap(), Money::from_cents(2250));
        assert_eq!(loose("\"22,50\"").to_price().unwrap(), Money::from_cents(2250));
        assert!(loose("-1").to_price().is_err());
        assert!(loose("\"vinte\"").to_price().is_err());
        assert!(loose("1e20").to_price().is_err());
    }

    #[test]
    fn test_cart_names_the_bad_line() {
        let request: SubmitSaleRequest = serde_json::from_str(
            r#"{"itens":[{"idProduto":1,"quantidade":"2"},{"idProduto":"x","quantidade":1}]}"#,
        )
        .unwrap();

        let err = request.cart().unwrap_err();
        assert_eq!(err.field(), "itens[1].idProduto");

        let missing: SubmitSaleRequest =
            serde_json::from_str(r#"{"itens":[{"idProduto":1}]}"#).unwrap();
        assert!(matches!(
            missing.cart().unwrap_err(),
            ValidationError::Required { .. }
        ));
    }

    #[test]
    fn test_list_query() {
        let query = ListSalesQuery {
            page: Some("2".to_string()),
            limit: Some(" ".to_string()),
        };
        assert_eq!(query.parse().unwrap(), (Some(2), None));

        let bad = ListSalesQuery {
            page: Some("dois".to_string()),
            limit: None,
        };
        assert!(bad.parse().is_err());
    }

    #[test]
    fn test_product_payload_names() {
        let now = Utc::now();
        let dto = ProductDto::from(Product {
            id: 1,
            name: "Kernel Burger".to_string(),
            barcode: "1111111111111".to_string(),
            price_cents: 2200,
            stock_quantity: 35,
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(dto).unwrap();

        assert_eq!(json["nome"], "Kernel Burger");
        assert_eq!(json["codigoBarras"], "1111111111111");
        assert_eq!(json["precoUnitario"], "22.00");
        assert_eq!(json["qtdEstoque"], 35);
    }
}
