use serde::Serialize;

/// Health check response
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    /// Static value from `ENV_TEST`
    pub health: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_should_serialize_single_field() {
        let status = HealthStatus {
            health: "ok".to_string(),
        };

        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json, serde_json::json!({"health": "ok"}));
    }
}
