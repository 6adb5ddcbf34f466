use serde::{Deserialize, Serialize};

/// Envelope wrapped around every HTTP response body.
///
/// Absent fields are left out of the JSON entirely so the frontend can test
/// for `data` / `error` presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.to_string()),
        }
    }

    pub fn failure(error: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_omits_data_and_message() {
        let resp = ApiResponse::<()>::failure("Failed to retrieve GPU nodes");
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "Failed to retrieve GPU nodes");
        assert!(v.get("data").is_none());
        assert!(v.get("message").is_none());
    }

    #[test]
    fn test_ok_decodes_with_missing_error() {
        let raw = r#"{"success":true,"data":[1,2],"message":"done"}"#;
        let resp: ApiResponse<Vec<u32>> = serde_json::from_str(raw).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data, Some(vec![1, 2]));
        assert_eq!(resp.error, None);
    }
}
