use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// HTTP-shaped invocation event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl HttpEvent {
    pub fn new(method: &str, action: &str) -> Self {
        let mut query = HashMap::new();
        query.insert("action".to_string(), action.to_string());
        Self {
            http_method: Some(method.to_string()),
            query_string_parameters: Some(query),
            headers: None,
            body: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: &Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Method, upper-cased; `GET` when the event carries none
    pub fn method(&self) -> String {
        self.http_method
            .as_deref()
            .unwrap_or("GET")
            .to_ascii_uppercase()
    }

    pub fn action(&self) -> &str {
        self.query_string_parameters
            .as_ref()
            .and_then(|q| q.get("action"))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Header lookup ignoring the case of the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Request body; an absent or blank body reads as `{}`
    pub fn body_text(&self) -> &str {
        match self.body.as_deref() {
            Some(body) if !body.trim().is_empty() => body,
            _ => "{}",
        }
    }
}

/// HTTP-shaped invocation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl HttpResponse {
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());

        let body = match serde_json::to_string(body) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                return Self {
                    status_code: 500,
                    headers,
                    body: r#"{"error":"Internal server error"}"#.to_string(),
                    is_base64_encoded: false,
                };
            }
        };

        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    /// CORS preflight answer
    pub fn preflight() -> Self {
        let headers = [
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Methods", "GET, POST, PUT, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type, X-Auth-Token"),
            ("Access-Control-Max-Age", "86400"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            status_code: 200,
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_gateway_event() {
        let raw = json!({
            "httpMethod": "post",
            "queryStringParameters": { "action": "login" },
            "headers": { "x-auth-token": "1:root" },
            "body": "{\"username\":\"root\"}"
        });
        let event: HttpEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.method(), "POST");
        assert_eq!(event.action(), "login");
        assert_eq!(event.header(AUTH_TOKEN_HEADER), Some("1:root"));
        assert_eq!(event.body_text(), "{\"username\":\"root\"}");
    }

    #[test]
    fn missing_fields_fall_back() {
        let event: HttpEvent = serde_json::from_value(json!({ "queryStringParameters": null, "body": null })).unwrap();
        assert_eq!(event.method(), "GET");
        assert_eq!(event.action(), "");
        assert_eq!(event.header("x-auth-token"), None);
        assert_eq!(event.body_text(), "{}");
    }

    #[test]
    fn serializes_response_in_gateway_shape() {
        let resp = HttpResponse::json(201, &json!({ "id": 7 }));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(value["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(value["body"], "{\"id\":7}");
    }
}
