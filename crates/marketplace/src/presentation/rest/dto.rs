use ashmart_core::{AshType, OrderStatus, Price, Tons, UserId};
use serde::{Deserialize, Serialize};

use crate::application::{DemandFilter, ProductFilter, SuggestionGroup};
use crate::presentation::rest::ApiError;

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub ash_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_quantity: Option<Tons>,
    pub max_price: Option<Price>,
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

impl ProductQuery {
    pub fn into_filter(self) -> Result<ProductFilter, ApiError> {
        Ok(ProductFilter {
            ash_type: parse_ash_type(self.ash_type.as_deref())?,
            city: non_blank(self.city),
            state: non_blank(self.state),
            min_quantity: self.min_quantity,
            max_price: self.max_price,
            supplier_id: parse_user(self.supplier_id.as_deref(), "supplier_id")?,
            include_inactive: self.include_inactive,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DemandQuery {
    pub ash_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

impl DemandQuery {
    pub fn into_filter(self) -> Result<DemandFilter, ApiError> {
        Ok(DemandFilter {
            ash_type: parse_ash_type(self.ash_type.as_deref())?,
            city: non_blank(self.city),
            state: non_blank(self.state),
            buyer_id: parse_user(self.buyer_id.as_deref(), "buyer_id")?,
            include_inactive: self.include_inactive,
        })
    }
}

fn parse_ash_type(raw: Option<&str>) -> Result<Option<AshType>, ApiError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(AshType::try_from)
        .transpose()
        .map_err(|e| ApiError::invalid_parameter("ash_type", e))
}

fn parse_user(raw: Option<&str>, param: &str) -> Result<Option<UserId>, ApiError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(UserId::new)
        .transpose()
        .map_err(|e| ApiError::invalid_parameter(param, e))
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn status(&self) -> Result<OrderStatus, ApiError> {
        OrderStatus::try_from(self.status.as_str())
            .map_err(|e| ApiError::invalid_parameter("status", e))
    }
}

#[derive(Debug, Deserialize)]
pub struct RepriceRequest {
    pub price_per_ton: Price,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<SuggestionGroup>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        ErrorResponse {
            error: code.to_string(),
            message: message.into(),
        }
    }
}
