//! Connector construction
//!
//! Validation is a pure step producing a [`ConnectionSource`]; option
//! assembly and client construction follow from it. Every failure is a
//! configuration error and leaves nothing half-open behind.

use super::connector::Connector;
use super::state::BuildState;
use super::tls::{self, StoreRole, TlsContext};
use super::write_concern::WriteConcernPolicy;
use crate::client::ConnectionUri;
use crate::config::{ConnectionConfig, StoreConfig, TransportTuning};
use crate::metrics::labels;
use crate::resolve::{resolve_addresses, resolve_credentials, Credential, EndpointRef};
use crate::{Error, Result};
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::Client;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// The single active connection source of a validated configuration
#[derive(Debug, Clone)]
pub enum ConnectionSource {
    /// Externally supplied client, reused as-is
    External(Client),
    /// Connection URI; credentials and hosts come from it
    Uri(String),
    /// Discrete `host[:port]` addresses with discrete credentials
    Addresses(Vec<String>),
}

impl ConnectionSource {
    /// Metric/log label
    pub fn label(&self) -> &'static str {
        match self {
            Self::External(_) => labels::SOURCE_EXTERNAL,
            Self::Uri(_) => labels::SOURCE_URI,
            Self::Addresses(_) => labels::SOURCE_ADDRESSES,
        }
    }
}

/// Driver options together with the TLS material they reference.
///
/// PEM copies of PKCS#12 stores named in `options` exist only while `tls`
/// is alive; the driver reads them when the client is constructed.
#[derive(Debug)]
pub struct ClientSetup {
    /// Options handed to the driver
    pub options: ClientOptions,
    /// TLS material assembled from the configured stores
    pub tls: Option<TlsContext>,
}

/// Builds a [`Connector`] from a [`ConnectionConfig`].
///
/// # Examples
///
/// ```ignore
/// let config = ConnectionConfig::builder("jobs")
///     .uri("mongodb://host1:27017/jobsdb")
///     .write_timeout_millis(5000)
///     .build();
/// let connector = ConnectorBuilder::build(config).await?;
/// ```
pub struct ConnectorBuilder;

impl ConnectorBuilder {
    /// Determine the connection source, enforcing mutual exclusivity.
    ///
    /// # Errors
    ///
    /// * [`Error::ConflictingSource`] if an external client is combined with
    ///   a URI, credentials or addresses
    /// * [`Error::MissingSource`] if there is no client, no URI and no address
    pub fn validate(config: &ConnectionConfig) -> Result<ConnectionSource> {
        if let Some(ref client) = config.client {
            if config.has_connection_params() {
                return Err(Error::ConflictingSource);
            }
            return Ok(ConnectionSource::External(client.clone()));
        }

        if let Some(ref uri) = config.uri {
            if has_discrete_params(config) {
                tracing::warn!("URI configured: discrete addresses and credentials are ignored");
            }
            return Ok(ConnectionSource::Uri(uri.clone()));
        }

        match config.addresses {
            Some(ref addresses) if !addresses.is_empty() => {
                Ok(ConnectionSource::Addresses(addresses.clone()))
            }
            _ => Err(Error::MissingSource),
        }
    }

    /// Assemble driver options for a URI or address source.
    ///
    /// Transport options (TLS, tuning) come first. In URI mode the URI wins
    /// for everything it sets; in address mode credentials and endpoints are
    /// resolved from the discrete fields. The durable write concern is
    /// applied last, overriding any write concern in the URI.
    ///
    /// # Errors
    ///
    /// Returns any store, TLS, credential, address or URI error,
    /// [`Error::Tls`] when hostname leniency is requested for an encrypted
    /// connection, or [`Error::Config`] for an external source, which has no
    /// options.
    pub async fn client_options(
        config: &ConnectionConfig,
        source: &ConnectionSource,
    ) -> Result<ClientSetup> {
        let (tls, tls_context) = load_transport_tls(config).await?;

        let mut options = match source {
            ConnectionSource::External(_) => {
                return Err(Error::Config(
                    "an external client carries its own options".into(),
                ))
            }
            ConnectionSource::Uri(uri) => {
                let parsed = ConnectionUri::parse(uri)?;
                tracing::debug!(uri = %parsed.redacted(), "parsing connection URI");
                let auth_source = parsed.option("authSource");
                if config.auth_db_name.is_some() && auth_source != config.auth_db_name {
                    tracing::warn!("URI configured: authDbName is ignored, set authSource in the URI");
                }
                let mut options = ClientOptions::parse(uri).await.map_err(Error::Uri)?;
                merge_tls(&mut options, tls);
                options
            }
            ConnectionSource::Addresses(addresses) => {
                let credentials = resolve_credentials(
                    config.username.as_deref(),
                    config.password.as_deref(),
                    &config.db_name,
                    config.auth_db_name.as_deref(),
                )?;
                let endpoints = resolve_addresses(addresses.as_slice())?;
                let endpoint_list = endpoints
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                tracing::debug!(
                    endpoints = %endpoint_list,
                    authenticated = !credentials.is_empty(),
                    "resolved discrete connection parameters"
                );

                let mut options = ClientOptions::default();
                options.hosts = endpoints.iter().map(EndpointRef::to_server_address).collect();
                options.credential = credentials.first().map(Credential::to_driver);
                options.tls = tls;
                options
            }
        };

        reject_hostname_leniency(&options, config.tls_allow_invalid_hostname)?;
        apply_tuning(&mut options, &config.tuning);
        options.write_concern =
            Some(WriteConcernPolicy::durable(config.write_timeout_millis).to_write_concern());
        Ok(ClientSetup {
            options,
            tls: tls_context,
        })
    }

    /// Validate `config` and construct the connector.
    ///
    /// A reused external client is wrapped untouched. Otherwise a new client
    /// is constructed with the durable write concern and, when
    /// `verify_connectivity` is set, pinged; a client that fails the ping is
    /// shut down before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error`]; every variant is a configuration error.
    pub async fn build(config: ConnectionConfig) -> Result<Connector> {
        let started = Instant::now();
        let mut state = BuildState::Unvalidated;
        let mut source_label = labels::SOURCE_UNKNOWN;

        let span = tracing::info_span!("connector_build", db = %config.db_name);
        let result = async {
            let source = Self::validate(&config)?;
            source_label = source.label();

            match source {
                ConnectionSource::External(client) => {
                    state.transition(BuildState::ReuseExternalClient)?;
                    tracing::info!("reusing externally supplied client, write concern left to its owner");
                    state.transition(BuildState::Constructed)?;
                    Ok::<_, Error>(Connector::reuse(client))
                }
                source => {
                    state.transition(BuildState::InitializeNew)?;
                    let ClientSetup { options, tls } = Self::client_options(&config, &source).await?;
                    let write_concern = options.write_concern.clone();

                    let client = Client::with_options(options).map_err(|e| Error::Driver {
                        context: "cannot construct client",
                        source: e,
                    })?;
                    // TLS files are read during construction
                    drop(tls);

                    if config.verify_connectivity {
                        if let Err(e) = ping(&client).await {
                            tracing::warn!(error = %e, "connectivity check failed, closing client");
                            client.shutdown().await;
                            return Err(e);
                        }
                    }

                    state.transition(BuildState::Constructed)?;
                    Ok(Connector::new(client, write_concern))
                }
            }
        }
        .instrument(span)
        .await;

        match result {
            Ok(connector) => {
                crate::metrics::counters::build_completed(source_label, labels::OUTCOME_OK);
                crate::metrics::histograms::build_duration(source_label, started.elapsed());
                tracing::info!(source = source_label, "connector ready");
                Ok(connector)
            }
            Err(e) => {
                if !state.is_terminal() {
                    let _ = state.transition(BuildState::Failed);
                }
                crate::metrics::counters::build_completed(source_label, labels::OUTCOME_ERROR);
                crate::metrics::counters::build_failed(e.category());
                tracing::error!(source = source_label, error = %e, "connector build failed");
                Err(e)
            }
        }
    }
}

fn has_discrete_params(config: &ConnectionConfig) -> bool {
    config.addresses.is_some() || config.username.is_some() || config.password.is_some()
}

async fn ping(client: &Client) -> Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| Error::Driver {
            context: "cannot reach cluster",
            source: e,
        })
}

/// Store files are read off the async workers
async fn load_transport_tls(config: &ConnectionConfig) -> Result<(Option<Tls>, Option<TlsContext>)> {
    let trust_store = config.trust_store.clone();
    let key_store = config.key_store.clone();
    let tls_enabled = config.tls_enabled;

    tokio::task::spawn_blocking(move || {
        transport_tls(trust_store.as_ref(), key_store.as_ref(), tls_enabled)
    })
    .await
    .map_err(|e| Error::Config(format!("store loading task failed: {}", e)))?
}

/// TLS setting derived from stores and the explicit switch.
///
/// Loaded store material always enables TLS. Without it, the explicit
/// switch decides; unset leaves TLS to the URI or driver default.
fn transport_tls(
    trust_store: Option<&StoreConfig>,
    key_store: Option<&StoreConfig>,
    tls_enabled: Option<bool>,
) -> Result<(Option<Tls>, Option<TlsContext>)> {
    let trust = tls::load_store(trust_store, StoreRole::Trust)?;
    let key = tls::load_store(key_store, StoreRole::Key)?;

    match tls::build_context(trust, key)? {
        Some(ctx) => {
            if tls_enabled == Some(false) {
                tracing::warn!("TLS stores configured: ignoring tlsEnabled=false");
            }
            let options = tls::driver_tls_options(Some(&ctx));
            Ok((Some(Tls::Enabled(options)), Some(ctx)))
        }
        None => {
            let tls = match tls_enabled {
                Some(true) => Some(Tls::Enabled(tls::driver_tls_options(None))),
                Some(false) => Some(Tls::Disabled),
                None => None,
            };
            Ok((tls, None))
        }
    }
}

/// The rustls transport checks the hostname as part of certificate
/// validation and cannot relax one without the other.
fn reject_hostname_leniency(options: &ClientOptions, allow_invalid_hostname: Option<bool>) -> Result<()> {
    if allow_invalid_hostname != Some(true) {
        return Ok(());
    }
    match options.tls {
        Some(Tls::Enabled(_)) => Err(Error::Tls {
            reason: "tlsAllowInvalidHostname=true is not supported by the rustls transport".into(),
            source: None,
        }),
        _ => {
            tracing::debug!("TLS is not enabled, ignoring tlsAllowInvalidHostname");
            Ok(())
        }
    }
}

/// Apply our TLS setting underneath whatever the URI chose
fn merge_tls(options: &mut ClientOptions, tls: Option<Tls>) {
    options.tls = match (options.tls.take(), tls) {
        (None, ours) => ours,
        (Some(Tls::Enabled(uri_tls)), Some(Tls::Enabled(ours))) => {
            Some(Tls::Enabled(fill_unset_tls(uri_tls, ours)))
        }
        (Some(Tls::Disabled), Some(Tls::Enabled(_))) => {
            tracing::warn!("URI disables TLS: configured TLS material is not used");
            Some(Tls::Disabled)
        }
        (Some(uri_tls), _) => Some(uri_tls),
    };
}

fn fill_unset_tls(mut uri_tls: TlsOptions, ours: TlsOptions) -> TlsOptions {
    if uri_tls.ca_file_path.is_none() {
        uri_tls.ca_file_path = ours.ca_file_path;
    }
    if uri_tls.cert_key_file_path.is_none() {
        uri_tls.cert_key_file_path = ours.cert_key_file_path;
    }
    if uri_tls.tls_certificate_key_file_password.is_none() {
        uri_tls.tls_certificate_key_file_password = ours.tls_certificate_key_file_password;
    }
    uri_tls
}

/// Apply pool and socket tuning to options the URI left unset
fn apply_tuning(options: &mut ClientOptions, tuning: &TransportTuning) {
    if options.max_pool_size.is_none() {
        options.max_pool_size = tuning.max_connections_per_host;
    }
    if options.connect_timeout.is_none() {
        options.connect_timeout = tuning.connect_timeout_millis.map(Duration::from_millis);
    }
    if let Some(millis) = tuning.socket_timeout_millis {
        tracing::warn!(millis, "socketTimeoutMillis is not supported by the driver, ignoring");
    }
    if tuning.socket_keep_alive == Some(false) {
        tracing::warn!("socketKeepAlive=false is not supported: the driver always enables TCP keepalive");
    }
    if let Some(multiplier) = tuning.blocking_thread_multiplier {
        tracing::warn!(
            multiplier,
            "blockingThreadMultiplier is not supported by the driver, ignoring"
        );
    }
}
