//! Connector configuration
//!
//! [`ConnectionConfig`] is an immutable value: build it once with
//! [`ConnectionConfig::builder`] (or deserialize it from scheduler
//! properties), then hand it to [`ConnectorBuilder::build`](crate::ConnectorBuilder::build).
//!
//! Blank strings never survive into the config: the builder and the serde
//! helpers normalize them to `None`, so "not configured" is always `None`.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Key/trust store container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// PEM file: certificates, plus one private key for key stores
    Pem,
    /// PKCS#12 archive (`.p12`/`.pfx`), unlocked with the store password
    Pkcs12,
}

impl StoreType {
    /// Container format of raw store bytes; anything not PEM armored is
    /// read as PKCS#12
    pub fn detect(data: &[u8]) -> Self {
        let start = data
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(data.len());
        if data[start..].starts_with(b"-----BEGIN") {
            Self::Pem
        } else {
            Self::Pkcs12
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pem => write!(f, "pem"),
            Self::Pkcs12 => write!(f, "pkcs12"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pem") {
            Ok(Self::Pem)
        } else if ["pkcs12", "p12", "pfx"]
            .iter()
            .any(|name| s.eq_ignore_ascii_case(name))
        {
            Ok(Self::Pkcs12)
        } else {
            Err(Error::UnsupportedStoreType(s.to_string()))
        }
    }
}

/// Location and unlock material of a trust or key store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store file path
    pub path: PathBuf,
    /// Store password (None = unprotected)
    pub password: Option<String>,
    /// Container format; `None` detects it from the file contents
    pub store_type: Option<StoreType>,
}

impl StoreConfig {
    /// PEM store without password
    pub fn pem(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            password: None,
            store_type: Some(StoreType::Pem),
        }
    }

    /// PKCS#12 store; set its password with [`StoreConfig::password`]
    pub fn pkcs12(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            password: None,
            store_type: Some(StoreType::Pkcs12),
        }
    }

    /// Set the store password. A blank password means no password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = non_blank(password.into());
        self
    }

    /// Build from loosely typed properties.
    ///
    /// Returns `Ok(None)` when `path` is blank: the store is not configured.
    /// A blank type leaves the format to be detected when the store loads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedStoreType`] for a type other than pem or
    /// pkcs12 (jks included).
    pub fn from_parts(
        path: &str,
        password: Option<&str>,
        store_type: Option<&str>,
    ) -> Result<Option<Self>> {
        if path.trim().is_empty() {
            return Ok(None);
        }
        let store_type = match store_type {
            Some(name) if !name.trim().is_empty() => Some(name.parse()?),
            _ => None,
        };
        Ok(Some(Self {
            path: PathBuf::from(path),
            password: password.map(str::to_string).and_then(non_blank),
            store_type,
        }))
    }

    /// Whether the path is blank (equivalent to not configured)
    pub(crate) fn is_blank(&self) -> bool {
        is_blank_path(&self.path)
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("path", &self.path)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("store_type", &self.store_type)
            .finish()
    }
}

/// Pool and socket tuning handed to the driver.
///
/// All values are optional; unset values keep the driver defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportTuning {
    /// Maximum pooled connections per cluster member
    pub max_connections_per_host: Option<u32>,
    /// TCP connect timeout in milliseconds
    pub connect_timeout_millis: Option<u64>,
    /// Socket read timeout in milliseconds
    pub socket_timeout_millis: Option<u64>,
    /// Whether to enable TCP keepalive
    pub socket_keep_alive: Option<bool>,
    /// Waiting-thread multiplier on the pool size
    pub blocking_thread_multiplier: Option<u32>,
}

/// Connector configuration.
///
/// Exactly one connection source must be configured: an external client,
/// a URI, or a non-empty address list. [`ConnectorBuilder`](crate::ConnectorBuilder)
/// enforces this.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Connection URI; takes over credentials and endpoints when set
    #[serde(default, deserialize_with = "blank_as_none")]
    pub uri: Option<String>,
    /// Cluster members as `host[:port]`, in initial contact order
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
    /// Username for discrete-mode authentication
    #[serde(default, deserialize_with = "blank_as_none")]
    pub username: Option<String>,
    /// Password for discrete-mode authentication
    #[serde(default, deserialize_with = "blank_as_none")]
    pub password: Option<String>,
    /// Scheduler database name
    #[serde(default)]
    pub db_name: String,
    /// Database to authenticate against instead of `db_name`
    #[serde(default, deserialize_with = "blank_as_none")]
    pub auth_db_name: Option<String>,
    /// Write concern timeout in milliseconds
    #[serde(default)]
    pub write_timeout_millis: u64,
    /// Explicit TLS switch, used when no store is configured
    #[serde(default)]
    pub tls_enabled: Option<bool>,
    /// Accept server certificates whose hostname does not match
    #[serde(default)]
    pub tls_allow_invalid_hostname: Option<bool>,
    /// Trust material (accepted server certificates)
    #[serde(default, deserialize_with = "store_or_none")]
    pub trust_store: Option<StoreConfig>,
    /// Key material (client identity)
    #[serde(default, deserialize_with = "store_or_none")]
    pub key_store: Option<StoreConfig>,
    /// Pool and socket tuning
    #[serde(flatten)]
    pub tuning: TransportTuning,
    /// Ping the cluster once the client is constructed
    #[serde(default)]
    pub verify_connectivity: bool,
    /// Externally managed client, reused instead of connecting
    #[serde(skip)]
    pub client: Option<mongodb::Client>,
}

impl ConnectionConfig {
    /// Create a builder for the given scheduler database
    pub fn builder(db_name: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder {
            config: ConnectionConfig {
                db_name: db_name.into(),
                ..Default::default()
            },
        }
    }

    /// Deserialize from a JSON document of scheduler properties
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid configuration: {}", e)))
    }

    /// Whether any discrete connection parameter is set
    pub(crate) fn has_connection_params(&self) -> bool {
        self.uri.is_some()
            || self.username.is_some()
            || self.password.is_some()
            || self.addresses.is_some()
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field(
                "uri",
                &self.uri.as_deref().map(crate::client::redact_uri),
            )
            .field("addresses", &self.addresses)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db_name", &self.db_name)
            .field("auth_db_name", &self.auth_db_name)
            .field("write_timeout_millis", &self.write_timeout_millis)
            .field("tls_enabled", &self.tls_enabled)
            .field("tls_allow_invalid_hostname", &self.tls_allow_invalid_hostname)
            .field("trust_store", &self.trust_store)
            .field("key_store", &self.key_store)
            .field("tuning", &self.tuning)
            .field("verify_connectivity", &self.verify_connectivity)
            .field("client", &self.client.as_ref().map(|_| "<Client>"))
            .finish()
    }
}

/// Fluent builder for [`ConnectionConfig`]
///
/// # Examples
///
/// ```ignore
/// let config = ConnectionConfig::builder("quartz")
///     .uri("mongodb://db1.internal:27017/quartz")
///     .tls(true, None)
///     .trust_store(StoreConfig::pem("/etc/quartz/ca.pem"))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Reuse an externally managed client
    pub fn client(mut self, client: mongodb::Client) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Set the connection URI (blank = unset)
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.config.uri = non_blank(uri.into());
        self
    }

    /// Set cluster addresses as `host[:port]`
    pub fn addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.addresses = Some(addresses.into_iter().map(Into::into).collect());
        self
    }

    /// Set username and password (blank = unset)
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = non_blank(username.into());
        self.config.password = non_blank(password.into());
        self
    }

    /// Set the username only
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = non_blank(username.into());
        self
    }

    /// Authenticate against this database instead of the scheduler database
    pub fn auth_db_name(mut self, name: impl Into<String>) -> Self {
        self.config.auth_db_name = non_blank(name.into());
        self
    }

    /// Set the write concern timeout
    pub fn write_timeout_millis(mut self, millis: u64) -> Self {
        self.config.write_timeout_millis = millis;
        self
    }

    /// Set the explicit TLS switch and hostname leniency
    pub fn tls(mut self, enabled: bool, allow_invalid_hostname: Option<bool>) -> Self {
        self.config.tls_enabled = Some(enabled);
        self.config.tls_allow_invalid_hostname = allow_invalid_hostname;
        self
    }

    /// Set the trust store; a blank path leaves it unconfigured
    pub fn trust_store(mut self, store: StoreConfig) -> Self {
        self.config.trust_store = Some(store).filter(|s| !s.is_blank());
        self
    }

    /// Set the key store; a blank path leaves it unconfigured
    pub fn key_store(mut self, store: StoreConfig) -> Self {
        self.config.key_store = Some(store).filter(|s| !s.is_blank());
        self
    }

    /// Set pool and socket tuning
    pub fn tuning(mut self, tuning: TransportTuning) -> Self {
        self.config.tuning = tuning;
        self
    }

    /// Ping the cluster after constructing the client
    pub fn verify_connectivity(mut self, verify: bool) -> Self {
        self.config.verify_connectivity = verify;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}

/// `Some(s)` unless `s` is empty or whitespace-only
pub(crate) fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

pub(crate) fn is_blank_path(path: &Path) -> bool {
    path.as_os_str()
        .to_str()
        .is_some_and(|s| s.trim().is_empty())
}

fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(non_blank))
}

#[derive(Deserialize)]
struct RawStore {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default, rename = "type")]
    store_type: Option<String>,
}

fn store_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<StoreConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<RawStore>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let Some(path) = raw.path else {
        return Ok(None);
    };
    StoreConfig::from_parts(&path, raw.password.as_deref(), raw.store_type.as_deref())
        .map_err(serde::de::Error::custom)
}
