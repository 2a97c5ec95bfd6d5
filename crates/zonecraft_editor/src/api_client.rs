//! API Client for the content catalog
//! Handles HTTP communication with the catalog and persistence services.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use zonecraft_shared::document::{parse_enemy_template, parse_palette};
use zonecraft_shared::{EnemyTemplate, Palette};

use crate::catalog::{AbilitySummary, EquipmentItem, SpriteAsset};

/// API Client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            auth_token: None,
        }
    }
}

/// Envelope some services wrap their payloads in
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Catalog endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Abilities,
    Equipment,
    Sprites,
    Palettes,
    EnemyTemplates,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Abilities => "abilities",
            Endpoint::Equipment => "equipment",
            Endpoint::Sprites => "dev/assets/sprites",
            Endpoint::Palettes => "dev/palettes",
            Endpoint::EnemyTemplates => "dev/enemy-templates",
        }
    }
}

/// Decode a response body that is either bare JSON or wrapped in an [`ApiResponse`].
/// An empty body decodes as `null`.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, String> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(|e| format!("Failed to parse response: {}", e))?
    };

    if !(200..300).contains(&status) {
        let message = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(message);
    }

    let is_envelope = value
        .as_object()
        .is_some_and(|object| object.get("success").is_some_and(Value::is_boolean));
    let payload = if is_envelope {
        let response: ApiResponse<Value> = serde_json::from_value(value)
            .map_err(|e| format!("Failed to parse response: {}", e))?;
        if !response.success {
            return Err(response.error.unwrap_or_else(|| "Unknown error".to_string()));
        }
        response.data.unwrap_or(Value::Null)
    } else {
        value
    };

    serde_json::from_value(payload).map_err(|e| format!("Failed to deserialize: {}", e))
}

/// Keep the list entries that parse, skipping the rest
fn parse_list<T>(value: Value, parse: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    match value {
        Value::Array(items) => items.iter().filter_map(parse).collect(),
        _ => Vec::new(),
    }
}

/// API Client for catalog operations
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Get the full URL for an endpoint
    fn url(&self, endpoint: Endpoint, id: Option<&str>) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match id {
            Some(id) => format!("{}/{}/{}", base, endpoint.path(), id),
            None => format!("{}/{}", base, endpoint.path()),
        }
    }

    pub fn set_auth_token(&mut self, token: String) {
        self.config.auth_token = Some(token);
    }

    pub async fn fetch_abilities(&self) -> Result<Vec<AbilitySummary>, String> {
        self.get::<Option<Vec<AbilitySummary>>>(Endpoint::Abilities, None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn fetch_equipment(&self) -> Result<BTreeMap<String, Vec<EquipmentItem>>, String> {
        self.get::<Option<BTreeMap<String, Vec<EquipmentItem>>>>(Endpoint::Equipment, None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn fetch_sprites(&self) -> Result<Vec<SpriteAsset>, String> {
        self.get::<Option<Vec<SpriteAsset>>>(Endpoint::Sprites, None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn list_palettes(&self) -> Result<Vec<Palette>, String> {
        let value = self.get::<Value>(Endpoint::Palettes, None).await?;
        Ok(parse_list(value, parse_palette))
    }

    pub async fn load_palette(&self, palette_id: &str) -> Result<Palette, String> {
        let value = self.get::<Value>(Endpoint::Palettes, Some(palette_id)).await?;
        parse_palette(&value).ok_or_else(|| format!("Palette {} is malformed", palette_id))
    }

    /// Create or update, depending on whether the palette already has a catalog id
    pub async fn save_palette(&self, palette: &Palette) -> Result<Palette, String> {
        let value = self
            .post::<Palette, Value>(Endpoint::Palettes, palette.id.as_deref(), palette)
            .await?;
        // Services that answer with no body keep what was sent
        Ok(parse_palette(&value).unwrap_or_else(|| palette.clone()))
    }

    pub async fn delete_palette(&self, palette_id: &str) -> Result<(), String> {
        self.delete(Endpoint::Palettes, palette_id).await
    }

    pub async fn list_enemy_templates(&self) -> Result<Vec<EnemyTemplate>, String> {
        let value = self.get::<Value>(Endpoint::EnemyTemplates, None).await?;
        Ok(parse_list(value, parse_enemy_template))
    }

    pub async fn save_enemy_template(&self, template: &EnemyTemplate) -> Result<EnemyTemplate, String> {
        let value = self
            .post::<EnemyTemplate, Value>(Endpoint::EnemyTemplates, Some(&template.id), template)
            .await?;
        Ok(parse_enemy_template(&value).unwrap_or_else(|| template.clone()))
    }

    pub async fn delete_enemy_template(&self, template_id: &str) -> Result<(), String> {
        self.delete(Endpoint::EnemyTemplates, template_id).await
    }
}

// WASM implementation using web_sys fetch
#[cfg(target_family = "wasm")]
mod wasm_impl {
    use super::*;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    impl ApiClient {
        pub(super) async fn get<R: DeserializeOwned>(
            &self,
            endpoint: Endpoint,
            id: Option<&str>,
        ) -> Result<R, String> {
            let url = self.url(endpoint, id);
            self.fetch::<(), R>("GET", &url, None).await
        }

        pub(super) async fn post<T: Serialize, R: DeserializeOwned>(
            &self,
            endpoint: Endpoint,
            id: Option<&str>,
            data: &T,
        ) -> Result<R, String> {
            let url = self.url(endpoint, id);
            self.fetch("POST", &url, Some(data)).await
        }

        pub(super) async fn delete(&self, endpoint: Endpoint, id: &str) -> Result<(), String> {
            let url = self.url(endpoint, Some(id));
            self.fetch::<(), Value>("DELETE", &url, None).await.map(|_| ())
        }

        async fn fetch<T: Serialize, R: DeserializeOwned>(
            &self,
            method: &str,
            url: &str,
            body: Option<&T>,
        ) -> Result<R, String> {
            let window = web_sys::window().ok_or("No window object")?;

            let opts = RequestInit::new();
            opts.set_method(method);
            opts.set_mode(RequestMode::Cors);

            let headers = Headers::new().map_err(|e| format!("Failed to create headers: {:?}", e))?;
            headers
                .set("Content-Type", "application/json")
                .map_err(|e| format!("{:?}", e))?;
            if let Some(token) = &self.config.auth_token {
                headers
                    .set("Authorization", &format!("Bearer {}", token))
                    .map_err(|e| format!("{:?}", e))?;
            }
            opts.set_headers(&headers);

            if let Some(data) = body {
                let json = serde_json::to_string(data)
                    .map_err(|e| format!("Failed to serialize: {}", e))?;
                opts.set_body(&JsValue::from_str(&json));
            }

            let request = Request::new_with_str_and_init(url, &opts)
                .map_err(|e| format!("Failed to create request: {:?}", e))?;

            let resp_value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(|e| format!("Request failed: {:?}", e))?;
            let resp: Response = resp_value
                .dyn_into()
                .map_err(|_| "Response is not a Response object")?;

            let text = JsFuture::from(resp.text().map_err(|e| format!("{:?}", e))?)
                .await
                .map_err(|e| format!("Failed to read response: {:?}", e))?;

            decode_body(resp.status(), &text.as_string().unwrap_or_default())
        }
    }
}

// Native implementation using reqwest
#[cfg(not(target_family = "wasm"))]
mod native_impl {
    use super::*;

    impl ApiClient {
        pub(super) async fn get<R: DeserializeOwned>(
            &self,
            endpoint: Endpoint,
            id: Option<&str>,
        ) -> Result<R, String> {
            let client = reqwest::Client::new();
            let request = client.get(self.url(endpoint, id));
            self.send(request).await
        }

        pub(super) async fn post<T: Serialize, R: DeserializeOwned>(
            &self,
            endpoint: Endpoint,
            id: Option<&str>,
            data: &T,
        ) -> Result<R, String> {
            let client = reqwest::Client::new();
            let request = client.post(self.url(endpoint, id)).json(data);
            self.send(request).await
        }

        pub(super) async fn delete(&self, endpoint: Endpoint, id: &str) -> Result<(), String> {
            let client = reqwest::Client::new();
            let request = client.delete(self.url(endpoint, Some(id)));
            self.send::<Value>(request).await.map(|_| ())
        }

        async fn send<R: DeserializeOwned>(
            &self,
            mut request: reqwest::RequestBuilder,
        ) -> Result<R, String> {
            if let Some(token) = &self.config.auth_token {
                request = request.header("Authorization", format!("Bearer {}", token));
            }

            let response = request
                .send()
                .await
                .map_err(|e| format!("Request failed: {}", e))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| format!("Failed to read response: {}", e))?;

            decode_body(status, &body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = ApiClient::new(ApiConfig {
            base_url: "http://example.test/api/".to_string(),
            auth_token: None,
        });
        assert_eq!(
            client.url(Endpoint::Sprites, None),
            "http://example.test/api/dev/assets/sprites"
        );
        assert_eq!(
            client.url(Endpoint::EnemyTemplates, Some("slime")),
            "http://example.test/api/dev/enemy-templates/slime"
        );
        assert_eq!(client.url(Endpoint::Abilities, None), "http://example.test/api/abilities");
    }

    #[test]
    fn test_decode_bare_and_enveloped() {
        let bare: Vec<SpriteAsset> =
            decode_body(200, r#"[{"id":"s1","url":"/s1.png","name":"Slime"}]"#).unwrap();
        assert_eq!(bare[0].name, "Slime");

        let wrapped: Vec<SpriteAsset> = decode_body(
            200,
            r#"{"success":true,"data":[{"id":"s2","url":"/s2.png"}],"error":null}"#,
        )
        .unwrap();
        assert_eq!(wrapped[0].id, "s2");
        assert_eq!(wrapped[0].name, "");
    }

    #[test]
    fn test_decode_failures() {
        let refused = decode_body::<Value>(200, r#"{"success":false,"error":"Name taken"}"#);
        assert_eq!(refused, Err("Name taken".to_string()));

        let status = decode_body::<Value>(500, "");
        assert_eq!(status, Err("HTTP 500".to_string()));

        let message = decode_body::<Value>(404, r#"{"error":"Palette not found"}"#);
        assert_eq!(message, Err("Palette not found".to_string()));

        assert!(decode_body::<Value>(200, "not json").is_err());
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let value: Option<Vec<SpriteAsset>> = decode_body(204, "").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_parse_list_skips_malformed_entries() {
        let value = serde_json::json!([
            { "id": "slime", "name": "Slime" },
            "garbage",
            { "name": "no id" }
        ]);
        let templates = parse_list(value, parse_enemy_template);
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, "slime");
    }
}
