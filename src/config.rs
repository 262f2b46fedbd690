//! Configuration types for paginated endpoints
//!
//! An endpoint is described either in code (builder methods) or in YAML:
//!
//! ```yaml
//! http:
//!   timeout_seconds: 30
//! endpoint:
//!   kind: rest
//!   url: https://api.example.com/items
//!   pagination: cursor
//!   data_path: [data, items]
//!   paging_param: after
//!   cursor_path: [meta, next]
//!   params:
//!     per_page: "100"
//! ```

use crate::error::{Error, Result};
use crate::pagination::{PaginationConfig, PaginationStyle, Strategy};
use crate::path::{DataPath, PathSegment};
use crate::types::{JsonObject, StringMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Definition
// ============================================================================

/// Complete endpoint definition loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// The paginated endpoint
    pub endpoint: EndpointConfig,
}

/// A REST or GraphQL endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndpointConfig {
    /// Paginated GET endpoint
    Rest(FetchConfig),
    /// Paginated GraphQL query
    #[serde(rename = "graphql")]
    GraphQl(GraphQlConfig),
}

impl EndpointConfig {
    /// Endpoint URL
    pub fn url(&self) -> &str {
        match self {
            Self::Rest(config) => &config.url,
            Self::GraphQl(config) => &config.url,
        }
    }

    /// Pagination style
    pub fn pagination(&self) -> PaginationStyle {
        match self {
            Self::Rest(config) => config.pagination,
            Self::GraphQl(config) => config.pagination,
        }
    }

    /// Add a header to every request
    pub fn insert_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        match self {
            Self::Rest(config) => config.headers.insert(key.into(), value.into()),
            Self::GraphQl(config) => config.headers.insert(key.into(), value.into()),
        };
    }

    /// Add a query parameter to every request
    pub fn insert_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        match self {
            Self::Rest(config) => config.params.insert(key.into(), value.into()),
            Self::GraphQl(config) => config.params.insert(key.into(), value.into()),
        };
    }

    /// Validate the endpoint configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Rest(config) => config.validate(),
            Self::GraphQl(config) => config.validate(),
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

// ============================================================================
// REST Config
// ============================================================================

/// A paginated REST endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Endpoint URL (first page); must be absolute for the `url` style
    pub url: String,

    /// Pagination style
    pub pagination: PaginationStyle,

    /// Location of the records array in each page
    pub data_path: DataPath,

    /// Query parameter carrying the page number, offset or cursor
    #[serde(default)]
    pub paging_param: Option<String>,

    /// Location of the next cursor (cursor style) or next URL (url style)
    #[serde(default)]
    pub cursor_path: Option<DataPath>,

    /// Fixed offset increment (offset style)
    #[serde(default)]
    pub step_size: Option<usize>,

    /// Query parameters sent with every request
    ///
    /// A paging parameter of the same name takes precedence over the value
    /// given here.
    #[serde(default)]
    pub params: StringMap,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
}

impl FetchConfig {
    /// Create a config with no paging parameters set
    pub fn new(
        url: impl Into<String>,
        pagination: PaginationStyle,
        data_path: impl Into<DataPath>,
    ) -> Self {
        Self {
            url: url.into(),
            pagination,
            data_path: data_path.into(),
            paging_param: None,
            cursor_path: None,
            step_size: None,
            params: StringMap::new(),
            headers: StringMap::new(),
        }
    }

    /// Set the paging parameter name
    #[must_use]
    pub fn paging_param(mut self, param: impl Into<String>) -> Self {
        self.paging_param = Some(param.into());
        self
    }

    /// Set the cursor (or next URL) path
    #[must_use]
    pub fn cursor_path(mut self, path: impl Into<DataPath>) -> Self {
        self.cursor_path = Some(path.into());
        self
    }

    /// Set a fixed offset step
    #[must_use]
    pub fn step_size(mut self, step: usize) -> Self {
        self.step_size = Some(step);
        self
    }

    /// Add a query parameter sent with every request
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Strategy settings for this endpoint
    pub fn pagination_config(&self) -> PaginationConfig {
        PaginationConfig {
            style: self.pagination,
            paging_param: self.paging_param.clone(),
            cursor_path: self.cursor_path.clone(),
            step_size: self.step_size,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::missing_field("url"));
        }
        Strategy::build(&self.pagination_config(), &self.url)?;
        Ok(())
    }
}

// ============================================================================
// GraphQL Config
// ============================================================================

/// A paginated GraphQL query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlConfig {
    /// GraphQL endpoint URL
    pub url: String,

    /// Pagination style (`cursor`, `offset` or `page_number`)
    pub pagination: PaginationStyle,

    /// Location of the records array inside `data`
    pub data_path: DataPath,

    /// Query document
    pub query: String,

    /// Initial query variables; paging variables are merged in per request
    #[serde(default)]
    pub variables: JsonObject,

    /// Variable carrying the cursor, offset or page number
    #[serde(default)]
    pub paging_variable: Option<String>,

    /// Location of the next cursor inside `data`
    #[serde(default)]
    pub paging_param_path: Option<DataPath>,

    /// Fixed offset increment (offset style)
    #[serde(default)]
    pub step_size: Option<usize>,

    /// Compact the query document before sending it
    #[serde(default = "default_true")]
    pub clean_query: bool,

    /// Query parameters sent with every request
    #[serde(default)]
    pub params: StringMap,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
}

impl GraphQlConfig {
    /// Create a config with no paging variables set
    pub fn new(
        url: impl Into<String>,
        pagination: PaginationStyle,
        data_path: impl Into<DataPath>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            pagination,
            data_path: data_path.into(),
            query: query.into(),
            variables: JsonObject::new(),
            paging_variable: None,
            paging_param_path: None,
            step_size: None,
            clean_query: true,
            params: StringMap::new(),
            headers: StringMap::new(),
        }
    }

    /// Set the paging variable name
    #[must_use]
    pub fn paging_variable(mut self, name: impl Into<String>) -> Self {
        self.paging_variable = Some(name.into());
        self
    }

    /// Set the path to the next cursor inside `data`
    #[must_use]
    pub fn paging_param_path(mut self, path: impl Into<DataPath>) -> Self {
        self.paging_param_path = Some(path.into());
        self
    }

    /// Set an initial query variable
    #[must_use]
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Set a fixed offset step
    #[must_use]
    pub fn step_size(mut self, step: usize) -> Self {
        self.step_size = Some(step);
        self
    }

    /// Send the query document as written
    #[must_use]
    pub fn raw_query(mut self) -> Self {
        self.clean_query = false;
        self
    }

    /// Add a query parameter sent with every request
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Strategy settings for this query
    pub fn pagination_config(&self) -> PaginationConfig {
        PaginationConfig {
            style: self.pagination,
            paging_param: self.paging_variable.clone(),
            cursor_path: self.paging_param_path.clone(),
            step_size: self.step_size,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::missing_field("url"));
        }
        if self.query.trim().is_empty() {
            return Err(Error::missing_field("query"));
        }
        if self.pagination == PaginationStyle::Url {
            return Err(Error::config(
                "Unknown pagination type for GraphQL, try \"cursor\", \"offset\" or \"page_number\"",
            ));
        }
        if self.data_path.first() == Some(&PathSegment::from("data")) {
            return Err(Error::config(
                "'data' in data_path: the GraphQL data envelope is unwrapped before extraction",
            ));
        }
        Strategy::build(&self.pagination_config(), &self.url)?;
        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load an endpoint definition from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<EndpointDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read endpoint file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load an endpoint definition from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<EndpointDefinition> {
    let definition: EndpointDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse endpoint YAML: {e}")))?;

    definition.endpoint.validate()?;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_rest_endpoint() {
        let yaml = r#"
endpoint:
  kind: rest
  url: "https://api.example.com/items"
  pagination: cursor
  data_path: [data, items]
  paging_param: after
  cursor_path: [meta, next]
  params:
    per_page: "100"
  headers:
    Authorization: "Bearer token"
"#;

        let definition = load_config_from_str(yaml).unwrap();
        assert_eq!(definition.http.timeout_seconds, 30);

        let EndpointConfig::Rest(config) = definition.endpoint else {
            panic!("Expected REST endpoint");
        };
        assert_eq!(config.url, "https://api.example.com/items");
        assert_eq!(config.pagination, PaginationStyle::Cursor);
        assert_eq!(config.data_path, DataPath::keys(["data", "items"]));
        assert_eq!(config.paging_param.as_deref(), Some("after"));
        assert_eq!(config.cursor_path, Some(DataPath::keys(["meta", "next"])));
        assert_eq!(config.params.get("per_page"), Some(&"100".to_string()));
        assert_eq!(
            config.headers.get("Authorization"),
            Some(&"Bearer token".to_string())
        );
    }

    #[test]
    fn test_parse_graphql_endpoint() {
        let yaml = r#"
http:
  timeout_seconds: 5
  user_agent: "tests/1.0"
endpoint:
  kind: graphql
  url: "https://api.github.com/graphql"
  pagination: cursor
  data_path: [viewer, repositories, nodes]
  query: |
    query($cursor: String) {
      viewer { login }
    }
  variables:
    cursor: null
    owner: octocat
  paging_variable: cursor
  paging_param_path: [viewer, repositories, pageInfo, endCursor]
"#;

        let definition = load_config_from_str(yaml).unwrap();
        assert_eq!(definition.http.timeout(), Duration::from_secs(5));
        assert_eq!(definition.http.user_agent.as_deref(), Some("tests/1.0"));

        let EndpointConfig::GraphQl(config) = definition.endpoint else {
            panic!("Expected GraphQL endpoint");
        };
        assert!(config.clean_query);
        assert_eq!(config.variables.get("owner"), Some(&json!("octocat")));
        assert_eq!(config.variables.get("cursor"), Some(&Value::Null));
        assert_eq!(config.paging_variable.as_deref(), Some("cursor"));
    }

    #[test]
    fn test_unknown_pagination_style_is_rejected() {
        let yaml = r#"
endpoint:
  kind: rest
  url: "https://api.example.com/items"
  pagination: link_header
  data_path: items
"#;
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_missing_paging_param_is_rejected_at_load() {
        let yaml = r#"
endpoint:
  kind: rest
  url: "https://api.example.com/items"
  pagination: cursor
  data_path: items
  cursor_path: next
"#;
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { field } if field == "paging_param"));
    }

    #[test]
    fn test_float_data_path_is_rejected() {
        let yaml = r#"
endpoint:
  kind: rest
  url: "https://api.example.com/items"
  pagination: page_number
  data_path: 3.5
"#;
        assert!(load_config_from_str(yaml).is_err());
    }

    #[test]
    fn test_graphql_data_prefix_is_rejected() {
        let config = GraphQlConfig::new(
            "https://api.example.com/graphql",
            PaginationStyle::Cursor,
            DataPath::keys(["data", "items"]),
            "{ items { id } }",
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'data' in data_path"));
    }

    #[test]
    fn test_graphql_url_style_is_rejected() {
        let config = GraphQlConfig::new(
            "https://api.example.com/graphql",
            PaginationStyle::Url,
            "items",
            "{ items { id } }",
        );
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let config = FetchConfig::new("", PaginationStyle::PageNumber, "items");
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::MissingConfigField { field } if field == "url"
        ));
    }

    #[test]
    fn test_relative_url_only_rejected_for_url_style() {
        let config = FetchConfig::new("/v1/items", PaginationStyle::Url, "items").cursor_path("next");
        assert!(matches!(config.validate().unwrap_err(), Error::InvalidUrl(_)));

        let config = FetchConfig::new("/v1/items", PaginationStyle::PageNumber, "items")
            .paging_param("page");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pagination_config_mapping() {
        let config = GraphQlConfig::new(
            "https://api.example.com/graphql",
            PaginationStyle::Offset,
            "items",
            "{ items { id } }",
        )
        .paging_variable("skip")
        .step_size(20);

        let pagination = config.pagination_config();
        assert_eq!(pagination.style, PaginationStyle::Offset);
        assert_eq!(pagination.paging_param.as_deref(), Some("skip"));
        assert_eq!(pagination.step_size, Some(20));
    }

    #[test]
    fn test_endpoint_overrides() {
        let mut endpoint = EndpointConfig::Rest(FetchConfig::new(
            "https://api.example.com/items",
            PaginationStyle::PageNumber,
            "items",
        ));
        endpoint.insert_header("X-Trace", "1");
        endpoint.insert_param("state", "open");

        let EndpointConfig::Rest(config) = endpoint else {
            panic!("Expected REST endpoint");
        };
        assert_eq!(config.headers.get("X-Trace"), Some(&"1".to_string()));
        assert_eq!(config.params.get("state"), Some(&"open".to_string()));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "endpoint:\n  kind: rest\n  url: https://api.example.com/items\n  pagination: page_number\n  data_path: results\n  paging_param: page\n"
        )
        .unwrap();

        let definition = load_config(file.path()).unwrap();
        assert_eq!(definition.endpoint.pagination(), PaginationStyle::PageNumber);
        assert_eq!(definition.endpoint.url(), "https://api.example.com/items");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/endpoint.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read endpoint file"));
    }
}
