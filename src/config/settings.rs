//! Configuration settings for the shellgate daemon.
//!
//! Configuration is assembled from up to two JSON files, a fallback file and
//! a main file. The fallback is read first, so for keys present in both files
//! the main file's values win; keys a file leaves out keep whatever an
//! earlier file (or the default) set. Either file, or both, may be absent.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ConfigErrorKind, DaemonError};
use crate::https::{HttpsClient, HttpsConfig, ServerConfig};

const HTTPS_SCHEME: &str = "https";

/// Merged daemon configuration.
///
/// Populated by [`Config::load`], normalized once by [`Config::validate`],
/// and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Client protocol, expected to be "https".
    pub client_protocol: String,
    /// Client certificate settings for mutual TLS.
    pub https_client: HttpsClient,
    /// Skip server certificate verification.
    pub skip_verify: bool,
    /// Path to the server SSL certificate.
    pub server_certificate: String,
    /// Server URL (single-server configurations; superseded by `servers`).
    pub server_url: String,
    /// Servers the agent can fail over between. `None` means the field was
    /// never given, which is distinct from an explicitly empty list.
    pub servers: Option<Vec<ServerConfig>>,
    /// The command to run as shell.
    pub shell_command: String,
    /// Name of the user who owns the shell process.
    pub user: String,
}

/// Deserialization target for a single configuration file.
///
/// Every field is optional so that merging can distinguish "key absent in
/// this file" from "key present with an empty value"; only present keys
/// overwrite earlier layers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ConfigFile {
    client_protocol: Option<String>,
    https_client: Option<HttpsClient>,
    skip_verify: Option<bool>,
    server_certificate: Option<String>,
    #[serde(rename = "ServerURL")]
    server_url: Option<String>,
    servers: Option<Vec<ServerConfig>>,
    shell_command: Option<String>,
    user: Option<String>,
}

impl ConfigFile {
    /// Overwrite the fields this file sets; leave the rest untouched.
    ///
    /// Overwrites are whole-value, including `https_client`: a later file
    /// replaces the entire client block rather than deep-merging it.
    fn apply(self, config: &mut Config) {
        if let Some(v) = self.client_protocol {
            config.client_protocol = v;
        }
        if let Some(v) = self.https_client {
            config.https_client = v;
        }
        if let Some(v) = self.skip_verify {
            config.skip_verify = v;
        }
        if let Some(v) = self.server_certificate {
            config.server_certificate = v;
        }
        if let Some(v) = self.server_url {
            config.server_url = v;
        }
        if let Some(v) = self.servers {
            config.servers = Some(v);
        }
        if let Some(v) = self.shell_command {
            config.shell_command = v;
        }
        if let Some(v) = self.user {
            config.user = v;
        }
    }
}

impl Config {
    /// Load the daemon configuration from the main and fallback JSON files.
    ///
    /// A missing file is skipped; both files missing yields the default
    /// configuration. Read failures other than not-found and malformed JSON
    /// abort the load.
    pub fn load<P: AsRef<Path>>(main_file: P, fallback_file: P) -> Result<Self, DaemonError> {
        let (config, _files_loaded) = load_files(main_file.as_ref(), fallback_file.as_ref())?;
        Ok(config)
    }

    /// Verify and normalize the server fields in the configuration.
    ///
    /// The only fatal condition is giving both `Servers` and `ServerURL`:
    /// the first entry of an explicit list would always shadow the scalar
    /// field, so supplying both is treated as user error and rejected.
    pub fn validate(&mut self) -> Result<(), DaemonError> {
        match &self.servers {
            None => {
                if self.server_url.is_empty() {
                    warn!("No server URL(s) specified in configuration");
                }
                self.servers = Some(vec![ServerConfig {
                    server_url: self.server_url.clone(),
                }]);
            }
            Some(_) if !self.server_url.is_empty() => {
                return Err(DaemonError::config(ConfigErrorKind::ServerConflict));
            }
            Some(_) => {}
        }

        if let Some(servers) = &mut self.servers {
            for (i, server) in servers.iter_mut().enumerate() {
                // Trim possible '/' suffix, which is added back in URL paths.
                if let Some(stripped) = server.server_url.strip_suffix('/') {
                    server.server_url = stripped.to_string();
                }
                if server.server_url.is_empty() {
                    warn!(entry = i + 1, "Server entry has no associated server URL");
                }
            }
        }

        self.https_client.validate();
        debug!(config = ?self, "Verified configuration");

        Ok(())
    }

    /// The configuration for the HTTP transport layer.
    pub fn http_config(&self) -> HttpsConfig {
        HttpsConfig {
            server_cert: self.server_certificate.clone(),
            is_https: self.client_protocol == HTTPS_SCHEME,
            client: self.maybe_https_client(),
            no_verify: self.skip_verify,
        }
    }

    /// The client certificate bundle, only when both certificate and key are
    /// provided.
    fn maybe_https_client(&self) -> Option<HttpsClient> {
        if self.https_client.is_complete() {
            Some(self.https_client.clone())
        } else {
            None
        }
    }
}

/// Load the fallback file, then the main file, merging into one `Config`.
///
/// Returns the merged configuration and the number of files that existed and
/// parsed successfully.
fn load_files(main_file: &Path, fallback_file: &Path) -> Result<(Config, usize), DaemonError> {
    let mut config = Config::default();
    let mut files_loaded = 0;

    for path in [fallback_file, main_file] {
        if load_config_file(path, &mut config)? {
            files_loaded += 1;
        }
    }

    debug!(count = files_loaded, "Loaded configuration file(s)");
    if files_loaded == 0 {
        info!("No configuration files present. Using defaults");
        return Ok((config, files_loaded));
    }

    debug!(config = ?config, "Loaded configuration");
    Ok((config, files_loaded))
}

/// Merge a single configuration file into `config`.
///
/// Returns whether the file existed and was merged. A missing file is not an
/// error here; it is up to the caller to decide whether zero files is
/// acceptable.
fn load_config_file(path: &Path, config: &mut Config) -> Result<bool, DaemonError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Configuration file does not exist");
            return Ok(false);
        }
        Err(e) => {
            return Err(DaemonError::config(ConfigErrorKind::Read {
                path: path.to_path_buf(),
                source: e,
            }));
        }
    };

    let file: ConfigFile = serde_json::from_str(&content).map_err(|e| {
        let kind = match e.classify() {
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                ConfigErrorKind::Syntax {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
            _ => ConfigErrorKind::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        };
        DaemonError::config(kind)
    })?;

    file.apply(config);
    info!(path = %path.display(), "Loaded configuration file");
    Ok(true)
}
