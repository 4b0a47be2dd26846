use serde::{Deserialize, Serialize};

use crate::models::show::ShowCriteria;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Query string of `GET /shows`.
#[derive(Debug, Default, Deserialize)]
pub struct ShowsQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub show_type: Option<String>,
    pub category: Option<String>,
    pub rating: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub country: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ShowsQuery {
    #[must_use]
    pub fn criteria(&self) -> ShowCriteria {
        ShowCriteria {
            search: self.search.clone(),
            show_type: self.show_type.clone(),
            category: self.category.clone(),
            rating: self.rating.clone(),
            year_from: self.year_from,
            year_to: self.year_to,
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_error() {
        let json = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 1}));
    }

    #[test]
    fn error_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }

    #[test]
    fn shows_query_maps_type_parameter() {
        let query: ShowsQuery =
            serde_json::from_value(serde_json::json!({"type": "Movie", "year_from": 2015}))
                .unwrap();
        let criteria = query.criteria();
        assert_eq!(criteria.show_type.as_deref(), Some("Movie"));
        assert_eq!(criteria.year_from, Some(2015));
        assert_eq!(criteria.search, None);
    }
}
