//! Shared DTO types and request-parsing helpers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Address;
use crate::error::DexError;

/// Parses a hex-encoded address field from a request.
///
/// # Errors
///
/// Returns [`DexError::InvalidRequest`] naming the offending field.
pub fn parse_address(field: &str, value: &str) -> Result<Address, DexError> {
    value
        .parse()
        .map_err(|err| DexError::InvalidRequest(format!("invalid {field}: {err}")))
}

/// Parses a string-encoded u128 amount field from a request.
///
/// # Errors
///
/// Returns [`DexError::InvalidRequest`] naming the offending field.
pub fn parse_amount(field: &str, value: &str) -> Result<u128, DexError> {
    value
        .parse()
        .map_err(|_| DexError::InvalidRequest(format!("invalid {field}: {value:?}")))
}

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps `per_page` to the allowed maximum of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Builds the metadata block for a list of `total` items.
    #[must_use]
    pub fn meta(&self, total: u32) -> PaginationMeta {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(self.per_page)
        };
        PaginationMeta {
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 100);
    }

    #[test]
    fn meta_rounds_pages_up() {
        let params = PaginationParams {
            page: 1,
            per_page: 20,
        };
        assert_eq!(params.meta(41).total_pages, 3);
        assert_eq!(params.meta(0).total_pages, 0);
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(parse_amount("amount_in", "not-a-number").is_err());
        assert_eq!(parse_amount("amount_in", "42"), Ok(42));
    }

    #[test]
    fn parse_address_names_the_field() {
        let Err(DexError::InvalidRequest(msg)) = parse_address("token_in", "0xzz") else {
            panic!("expected InvalidRequest");
        };
        assert!(msg.contains("token_in"));
    }
}
