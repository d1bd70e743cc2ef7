//! Shared building blocks for the city services workspace: logging setup,
//! startup environment checks and small response types used by every layer.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn error_body_serializes_error_key() {
        let body = types::ErrorBody::new("Service not found");
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v, serde_json::json!({"error": "Service not found"}));
    }
}
