//! 執行配置（TOML）

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use routing_client::ServiceConfig;
use routing_core::EngineConfig;
use serde::{Deserialize, Serialize};

/// 覆寫認證內容的環境變數
pub const AUTH_TOKEN_ENV: &str = "WO_TRACKER_AUTH_TOKEN";

/// 整體配置：引擎參數、服務端點與輸出路徑
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    pub service: ServiceConfig,

    #[serde(default)]
    pub output: OutputPaths,
}

/// 報表輸出路徑
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub quality: PathBuf,
    pub yields: PathBuf,
    pub wip: PathBuf,
    pub processing: PathBuf,
    pub materials: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::in_dir(Path::new("reports"))
    }
}

impl OutputPaths {
    /// 所有報表放在同一個目錄
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            quality: dir.join("quality.csv"),
            yields: dir.join("yield.csv"),
            wip: dir.join("wip.csv"),
            processing: dir.join("processing.csv"),
            materials: dir.join("materials.csv"),
        }
    }
}

impl AppConfig {
    /// 讀取配置檔，套用環境變數覆寫後檢查
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("無法讀取配置檔 {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("配置檔格式錯誤 {}", path.display()))?
            .with_auth_override(std::env::var(AUTH_TOKEN_ENV).ok());

        config.engine.validate()?;
        config.service.validate()?;
        tracing::debug!(path = %path.display(), "已載入配置");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 非空的覆寫值取代配置檔中的認證內容
    pub fn with_auth_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.service.auth_token = token;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[engine]
accepted_prefixes = ["AB", "CD"]

[service]
prod_center_url = "https://erp.example.com/infosys/prod-center"
open_work_orders_url = "https://erp.example.com/infosys/open-work-orders"
open_work_orders_payload = "{}"
confirmations_url = "https://erp.example.com/infosys/confirmations"
work_order_db_url = "https://erp.example.com/obj/work-slips"
purchase_order_url = "https://erp.example.com/obj/purchase-orders"
packing_slip_url = "https://erp.example.com/obj/packing-slips"
product_db_url = "https://erp.example.com/obj/products"
stock_journal_url = "https://erp.example.com/infosys/stock-journal"
auth_token = "from-file"
connection_limit = 4

[output]
wip = "/tmp/out/wip.csv"
"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = AppConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.engine.accepted_prefixes, vec!["AB", "CD"]);
        assert_eq!(config.engine.first_off_description, "1st Off");
        assert_eq!(config.service.connection_limit, 4);
        assert_eq!(config.service.work_center_group, "INTWHG");
        assert_eq!(config.output.wip, PathBuf::from("/tmp/out/wip.csv"));
        assert_eq!(config.output.quality, PathBuf::from("reports/quality.csv"));
    }

    #[test]
    fn test_auth_override() {
        let config = AppConfig::from_toml_str(SAMPLE).unwrap();

        let kept = config.clone().with_auth_override(Some(String::new()));
        assert_eq!(kept.service.auth_token, "from-file");

        let replaced = config.with_auth_override(Some("from-env".to_string()));
        assert_eq!(replaced.service.auth_token, "from-env");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.service.connection_limit, 4);
    }

    #[test]
    fn test_load_rejects_missing_engine_section() {
        let service_only = SAMPLE.replace("[engine]\naccepted_prefixes = [\"AB\", \"CD\"]\n", "");
        assert!(!service_only.contains("[engine]"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(service_only.as_bytes()).unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("accepted_prefixes"));
    }

    #[test]
    fn test_load_rejects_empty_prefix_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            SAMPLE
                .replace(r#"accepted_prefixes = ["AB", "CD"]"#, "accepted_prefixes = []")
                .as_bytes(),
        )
        .unwrap();

        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_service() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.replace("https://erp.example.com/obj/products", "products").as_bytes())
            .unwrap();

        assert!(AppConfig::load(file.path()).is_err());
        assert!(AppConfig::load(Path::new("/nonexistent/wo-tracker.toml")).is_err());
    }
}
