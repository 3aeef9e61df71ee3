//! Configuration resolution for teamweight.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (`<config dir>/teamweight/settings.json`)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables
//! 5. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Complete teamweight configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub cron: CronConfig,
    #[serde(default)]
    pub records: RecordsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub database_path: Option<PathBuf>,
    pub log_json: bool,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database_path: None,
            log_json: false,
            cors_origins: Vec::new(),
        }
    }
}

/// LINE Messaging API and LIFF configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub channel_access_token: Option<String>,
    pub channel_secret: Option<String>,
    pub liff_id: Option<String>,
    pub api_base: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: None,
            channel_secret: None,
            liff_id: None,
            api_base: "https://api.line.me".to_string(),
        }
    }
}

/// Admin session gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Argon2 PHC string of the shared admin password.
    pub password_hash: Option<String>,
    /// Secret used to sign admin session tokens.
    pub jwt_secret: Option<String>,
    pub session_ttl_secs: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password_hash: None,
            jwt_secret: None,
            session_ttl_secs: 12 * 60 * 60, // 12 hours
        }
    }
}

/// Scheduled reminder trigger configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CronConfig {
    /// Bearer secret the external scheduler must present.
    pub secret: Option<String>,
}

/// Weight record behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecordsConfig {
    pub snapshot_policy: SnapshotPolicy,
}

/// How a weight submission updates the profile's last-weight snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotPolicy {
    /// Every submission overwrites the snapshot, even a backfilled date.
    #[default]
    WriteOrder,
    /// Only submissions dated on or after the snapshot's date overwrite it.
    LatestDate,
}

impl fmt::Display for SnapshotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteOrder => write!(f, "write-order"),
            Self::LatestDate => write!(f, "latest-date"),
        }
    }
}

impl FromStr for SnapshotPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "write-order" => Ok(Self::WriteOrder),
            "latest-date" => Ok(Self::LatestDate),
            other => Err(Error::Config(format!("Unknown snapshot policy: {other}"))),
        }
    }
}

/// Load configuration with hierarchical resolution.
///
/// An explicit `config_file` must exist; the global file is optional. File
/// layers are merged key by key, so a later file only overrides the keys it
/// actually sets.
pub fn load_config(config_file: Option<&Path>) -> Result<Config> {
    let mut layers = Vec::new();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            layers.push(load_config_file(&global_path)?);
        }
    }

    if let Some(path) = config_file {
        layers.push(load_config_file(path)?);
    }

    let mut config = resolve_layers(layers)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("teamweight").join("settings.json"))
}

/// Get the default database path.
pub fn database_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("teamweight").join("team.db"))
}

fn load_config_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let layer: Value = serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })?;
    if !layer.is_object() {
        return Err(Error::Config(format!(
            "Config file {} must contain a JSON object",
            path.display()
        )));
    }
    Ok(layer)
}

/// Merge file layers in order and deserialize the result over the defaults.
fn resolve_layers(layers: Vec<Value>) -> Result<Config> {
    let mut merged = Value::Object(Map::new());
    for layer in layers {
        merge_layer(&mut merged, layer);
    }
    Ok(serde_json::from_value(merged)?)
}

/// Recursively overlay `overlay` onto `base`. Objects merge per key; any
/// other value replaces what was there.
fn merge_layer(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_layer(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Apply environment overrides, reading variables through `lookup`.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("TEAMWEIGHT_LISTEN_ADDR") {
        config.server.listen_addr = val;
    }
    if let Some(val) = lookup("TEAMWEIGHT_DATABASE_PATH") {
        config.server.database_path = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("TEAMWEIGHT_SNAPSHOT_POLICY") {
        match val.parse() {
            Ok(policy) => config.records.snapshot_policy = policy,
            Err(e) => tracing::warn!(error = %e, "Ignoring TEAMWEIGHT_SNAPSHOT_POLICY"),
        }
    }
    if let Some(val) = lookup("TEAMWEIGHT_ADMIN_PASSWORD_HASH") {
        config.admin.password_hash = Some(val);
    }
    if let Some(val) = lookup("TEAMWEIGHT_JWT_SECRET") {
        config.admin.jwt_secret = Some(val);
    }
    if let Some(val) = lookup("LINE_CHANNEL_ACCESS_TOKEN") {
        config.line.channel_access_token = Some(val);
    }
    if let Some(val) = lookup("LINE_CHANNEL_SECRET") {
        config.line.channel_secret = Some(val);
    }
    if let Some(val) = lookup("LIFF_ID") {
        config.line.liff_id = Some(val);
    }
    if let Some(val) = lookup("CRON_SECRET") {
        config.cron.secret = Some(val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_snapshot_policy_is_write_order() {
        let config = Config::default();
        assert_eq!(config.records.snapshot_policy, SnapshotPolicy::WriteOrder);
    }

    #[test]
    fn default_session_ttl_is_12h() {
        let config = Config::default();
        assert_eq!(config.admin.session_ttl_secs, 43_200);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"line": {"channel_secret": "s3cret"}, "records": {"snapshot_policy": "latest-date"}}"#,
        )
        .unwrap();

        let config = resolve_layers(vec![load_config_file(&path).unwrap()]).unwrap();

        assert_eq!(config.line.channel_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.line.api_base, "https://api.line.me");
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.records.snapshot_policy, SnapshotPolicy::LatestDate);
    }

    #[test]
    fn later_file_only_overrides_keys_it_sets() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("settings.json");
        let explicit = dir.path().join("teamweight.json");
        std::fs::write(
            &global,
            r#"{"records": {"snapshot_policy": "latest-date"},
                "server": {"listen_addr": "127.0.0.1:9000", "log_json": true},
                "line": {"api_base": "http://localhost:9999"},
                "admin": {"session_ttl_secs": 60}}"#,
        )
        .unwrap();
        std::fs::write(
            &explicit,
            r#"{"line": {"liff_id": "abc"}, "server": {"database_path": "/tmp/team.db"}}"#,
        )
        .unwrap();

        let config = resolve_layers(vec![
            load_config_file(&global).unwrap(),
            load_config_file(&explicit).unwrap(),
        ])
        .unwrap();

        assert_eq!(config.records.snapshot_policy, SnapshotPolicy::LatestDate);
        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert!(config.server.log_json);
        assert_eq!(config.server.database_path, Some(PathBuf::from("/tmp/team.db")));
        assert_eq!(config.line.api_base, "http://localhost:9999");
        assert_eq!(config.line.liff_id.as_deref(), Some("abc"));
        assert_eq!(config.admin.session_ttl_secs, 60);
    }

    #[test]
    fn later_file_can_override_a_scalar() {
        let config = resolve_layers(vec![
            serde_json::json!({"records": {"snapshot_policy": "latest-date"}}),
            serde_json::json!({"records": {"snapshot_policy": "write-order"}}),
        ])
        .unwrap();
        assert_eq!(config.records.snapshot_policy, SnapshotPolicy::WriteOrder);
    }

    #[test]
    fn unknown_policy_in_file_is_a_json_error() {
        let err = resolve_layers(vec![
            serde_json::json!({"records": {"snapshot_policy": "newest"}}),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(load_config_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/teamweight.json"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("CRON_SECRET", "cron-token"),
            ("LIFF_ID", "1234-abcd"),
            ("TEAMWEIGHT_SNAPSHOT_POLICY", "latest-date"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| vars.get(k).map(ToString::to_string));

        assert_eq!(config.cron.secret.as_deref(), Some("cron-token"));
        assert_eq!(config.line.liff_id.as_deref(), Some("1234-abcd"));
        assert_eq!(config.records.snapshot_policy, SnapshotPolicy::LatestDate);
    }

    #[test]
    fn invalid_policy_env_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| {
            (k == "TEAMWEIGHT_SNAPSHOT_POLICY").then(|| "newest".to_string())
        });
        assert_eq!(config.records.snapshot_policy, SnapshotPolicy::WriteOrder);
    }

    #[test]
    fn snapshot_policy_parses_and_displays() {
        for policy in [SnapshotPolicy::WriteOrder, SnapshotPolicy::LatestDate] {
            assert_eq!(policy.to_string().parse::<SnapshotPolicy>().unwrap(), policy);
        }
        assert!("whatever".parse::<SnapshotPolicy>().is_err());
    }
}
