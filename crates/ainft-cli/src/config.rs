//! Settings

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ainft::gallery::DEFAULT_PAGE_SIZE;
use ainft::{ApiClient, BridgeWallet};
use ainft_common::{Network, WalletGateway};
use ainft_fake_wallet::{FakeFailures, FakeWallet};
use ainft_http_client::HttpClient;
use anyhow::{anyhow, bail, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use url::Url;

pub const ENV_API_URL: &str = "AINFT_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "AINFT_API_TIMEOUT_SECS";
pub const ENV_PROXY: &str = "AINFT_PROXY";
pub const ENV_PAGE_SIZE: &str = "AINFT_PAGE_SIZE";
pub const ENV_WALLET_BACKEND: &str = "AINFT_WALLET_BACKEND";
pub const ENV_WALLET_BRIDGE_URL: &str = "AINFT_WALLET_BRIDGE_URL";
pub const ENV_NETWORK: &str = "AINFT_NETWORK";
pub const ENV_FAKE_ADDRESS: &str = "AINFT_FAKE_ADDRESS";

/// Address used by the fake wallet unless configured
const DEFAULT_FAKE_ADDRESS: &str = "addr_test1qfakewallet";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    /// Base url of the generation, pinning and ledger-query backend
    pub url: String,
    /// Total request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Proxy every backend and bridge request goes through
    pub proxy: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000/api/".to_string(),
            timeout_secs: None,
            proxy: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gallery {
    pub page_size: usize,
}

impl Default for Gallery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletBackend {
    /// In-memory wallet, nothing reaches a chain
    #[default]
    Fake,
    /// Signer bridge fronting a real wallet
    Bridge,
}

impl FromStr for WalletBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fake" | "fakewallet" => Ok(WalletBackend::Fake),
            "bridge" => Ok(WalletBackend::Bridge),
            _ => Err(format!("Unknown wallet backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub backend: WalletBackend,
    pub bridge_url: Option<String>,
    pub network: Network,
    pub fake_address: String,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            backend: WalletBackend::default(),
            bridge_url: None,
            network: Network::default(),
            fake_address: DEFAULT_FAKE_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub gallery: Gallery,
    pub wallet: Wallet,
}

impl Settings {
    /// Defaults overridden by `config_file` when it exists
    pub fn new(config_file: &Path) -> Result<Self> {
        let default = Self::default();
        let config = Config::builder()
            // use defaults
            .add_source(Config::try_from(&default)?)
            // override with file contents
            .add_source(File::from(config_file).required(false))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Override with `AINFT_*` environment variables
    pub fn from_env(self) -> Result<Self> {
        self.with_vars(|name| env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = var(ENV_API_URL) {
            self.api.url = url;
        }

        if let Some(timeout) = var(ENV_API_TIMEOUT_SECS) {
            self.api.timeout_secs = Some(
                timeout
                    .parse()
                    .map_err(|_| anyhow!("{} must be a number", ENV_API_TIMEOUT_SECS))?,
            );
        }

        if let Some(proxy) = var(ENV_PROXY) {
            self.api.proxy = Some(proxy);
        }

        if let Some(page_size) = var(ENV_PAGE_SIZE) {
            self.gallery.page_size = page_size
                .parse()
                .map_err(|_| anyhow!("{} must be a number", ENV_PAGE_SIZE))?;
        }

        if let Some(backend) = var(ENV_WALLET_BACKEND) {
            self.wallet.backend = WalletBackend::from_str(&backend).map_err(|err| anyhow!(err))?;
        }

        if let Some(bridge_url) = var(ENV_WALLET_BRIDGE_URL) {
            self.wallet.bridge_url = Some(bridge_url);
        }

        if let Some(network) = var(ENV_NETWORK) {
            self.wallet.network = Network::from_str(&network)?;
        }

        if let Some(address) = var(ENV_FAKE_ADDRESS) {
            self.wallet.fake_address = address;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.gallery.page_size == 0 {
            bail!("gallery.page_size must be at least 1");
        }
        if self.api.timeout_secs == Some(0) {
            bail!("api.timeout_secs must be at least 1");
        }
        if self.wallet.backend == WalletBackend::Bridge && self.wallet.bridge_url.is_none() {
            bail!("Bridge wallet backend requires wallet.bridge_url");
        }
        Ok(())
    }

    pub fn api_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api.url)?;
        Ok(url)
    }

    /// HTTP client honouring the configured timeout and proxy
    pub fn http_client(&self) -> Result<HttpClient> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = self.api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(proxy) = &self.api.proxy {
            builder = builder.proxy(Url::parse(proxy)?);
        }
        Ok(builder.build()?)
    }

    /// Wallet gateway for the configured backend
    pub fn wallet_gateway(&self, http: &HttpClient) -> Result<Arc<dyn WalletGateway>> {
        match self.wallet.backend {
            WalletBackend::Fake => {
                tracing::warn!("Using the fake wallet, nothing will reach the chain");
                Ok(Arc::new(FakeWallet::new(
                    self.wallet.fake_address.clone(),
                    FakeFailures::default(),
                    0,
                )))
            }
            WalletBackend::Bridge => {
                let url = self
                    .wallet
                    .bridge_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("Bridge wallet backend requires wallet.bridge_url"))?;
                let api = ApiClient::with_http_client(http.clone(), Url::parse(url)?);
                Ok(Arc::new(BridgeWallet::from_api(api)))
            }
        }
    }
}
