use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GraphError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_SERVICE_ADDR: &str = "0.0.0.0:50051";
pub const DEFAULT_GATEWAY_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_SERVICE_ENDPOINT: &str = "http://localhost:50051";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Firestore,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub base_url: String,
    pub project_id: Option<String>,
    pub database: String,
    pub collection: String,
    pub page_size: usize,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
    pub seed_file: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Firestore,
            base_url: DEFAULT_FIRESTORE_URL.to_string(),
            project_id: None,
            database: "(default)".to_string(),
            collection: "users".to_string(),
            page_size: 300,
            access_token: None,
            timeout_seconds: 30,
            seed_file: None,
        }
    }
}

impl StoreConfig {
    /// The bearer token, ignoring blanks and `${VAR}` placeholders left unresolved.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty() && !token.contains("${"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub max_workers: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_SERVICE_ADDR.to_string(),
            max_workers: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub listen_addr: String,
    pub service_endpoint: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_GATEWAY_ADDR.to_string(),
            service_endpoint: DEFAULT_SERVICE_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GraphError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GraphError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Config file when given, defaults otherwise.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${FIRESTORE_ACCESS_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GraphError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn service_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("service.listen_addr", &self.service.listen_addr)
    }

    pub fn gateway_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("gateway.listen_addr", &self.gateway.listen_addr)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.validate_service_side()?;
        self.validate_gateway_side()
    }

    /// Store and service sections, as needed by `serve`.
    pub fn validate_service_side(&self) -> Result<()> {
        let store = &self.store;
        validation::validate_non_empty_string("store.collection", &store.collection)?;

        match store.backend {
            StoreBackend::Firestore => {
                validation::validate_url("store.base_url", &store.base_url)?;
                let project_id =
                    validation::validate_required_field("store.project_id", &store.project_id)?;
                validation::validate_non_empty_string("store.project_id", project_id)?;
                validation::validate_non_empty_string("store.database", &store.database)?;
                // Firestore caps list pages at 1000 documents
                validation::validate_range("store.page_size", store.page_size, 1, 1000)?;
                validation::validate_positive_number(
                    "store.timeout_seconds",
                    store.timeout_seconds as usize,
                    1,
                )?;
            }
            StoreBackend::Memory => {
                if let Some(seed_file) = &store.seed_file {
                    validation::validate_non_empty_string("store.seed_file", seed_file)?;
                }
            }
        }

        self.service_addr()?;
        validation::validate_positive_number("service.max_workers", self.service.max_workers, 1)?;

        Ok(())
    }

    /// Gateway section, as needed by `gateway` and `probe`.
    pub fn validate_gateway_side(&self) -> Result<()> {
        self.gateway_addr()?;
        validation::validate_url("gateway.service_endpoint", &self.gateway.service_endpoint)?;

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn collection(&self) -> &str {
        &self.store.collection
    }

    fn max_workers(&self) -> usize {
        self.service.max_workers
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
