//! Gallery of NFTs held by the connected wallet

use std::fmt::Debug;
use std::sync::Arc;

use ainft_common::{Address, Error, OwnedAsset, RawAsset, TransactionHash, TxRequest, WalletGateway};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::api::ApiClient;

/// Assets shown per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Longest on-chain message accepted when sending
pub const MAX_MESSAGE_LEN: usize = 64;

/// Ledger query for the assets held by an address
#[async_trait]
pub trait AssetQuery: Debug + Send + Sync {
    /// Every asset record held by `address`, unfiltered
    async fn assets(&self, address: &Address) -> Result<Vec<RawAsset>, Error>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetsRequest<'a> {
    wallet_address: &'a str,
}

/// `blockfrost-data` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsResponse {
    /// Asset records
    pub assets: Vec<RawAsset>,
}

/// [`AssetQuery`] backed by the `blockfrost-data` endpoint
#[derive(Debug, Clone)]
pub struct HttpAssetQuery {
    api: ApiClient,
}

impl HttpAssetQuery {
    /// Create new [`HttpAssetQuery`]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AssetQuery for HttpAssetQuery {
    #[instrument(skip(self))]
    async fn assets(&self, address: &Address) -> Result<Vec<RawAsset>, Error> {
        let response: AssetsResponse = self
            .api
            .post_json(
                "blockfrost-data",
                &AssetsRequest {
                    wallet_address: address.as_str(),
                },
            )
            .await
            .map_err(|e| Error::GalleryFetchFailed(e.to_string()))?;

        Ok(response.assets)
    }
}

/// Fetch the valid NFTs held by `address`
///
/// Records failing the NFT validity check are dropped.
pub async fn list(query: &dyn AssetQuery, address: &Address) -> Result<Vec<OwnedAsset>, Error> {
    let raw = query.assets(address).await?;
    let total = raw.len();
    let assets: Vec<OwnedAsset> = raw.into_iter().filter_map(OwnedAsset::try_from_raw).collect();

    tracing::debug!("{} of {} assets are valid NFTs", assets.len(), total);
    Ok(assets)
}

/// Number of pages needed for `total` assets
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// In-memory list of owned NFTs with burn and send actions
#[derive(Debug)]
pub struct Gallery {
    query: Arc<dyn AssetQuery>,
    wallet: Arc<dyn WalletGateway>,
    page_size: usize,
    assets: RwLock<Vec<OwnedAsset>>,
}

impl Gallery {
    /// Create new [`Gallery`]
    pub fn new(query: Arc<dyn AssetQuery>, wallet: Arc<dyn WalletGateway>) -> Self {
        Self::with_page_size(query, wallet, DEFAULT_PAGE_SIZE)
    }

    /// Create new [`Gallery`] with a custom page size
    pub fn with_page_size(
        query: Arc<dyn AssetQuery>,
        wallet: Arc<dyn WalletGateway>,
        page_size: usize,
    ) -> Self {
        Self {
            query,
            wallet,
            page_size: page_size.max(1),
            assets: RwLock::new(Vec::new()),
        }
    }

    /// Page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Reload the list from the ledger, returns the number of NFTs
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, Error> {
        let address = self.wallet.address().await?;
        let assets = list(self.query.as_ref(), &address).await?;
        let count = assets.len();

        *self.assets.write().await = assets;
        Ok(count)
    }

    /// Every NFT currently in the list
    pub async fn assets(&self) -> Vec<OwnedAsset> {
        self.assets.read().await.clone()
    }

    /// Number of pages for the current list
    pub async fn total_pages(&self) -> usize {
        total_pages(self.assets.read().await.len(), self.page_size)
    }

    /// One page of the list, 1-based
    ///
    /// Page 1 of an empty list is empty; any other page outside
    /// `1..=total_pages` is rejected.
    pub async fn page(&self, page: usize) -> Result<Vec<OwnedAsset>, Error> {
        let assets = self.assets.read().await;
        let pages = total_pages(assets.len(), self.page_size);

        if page == 0 || page > pages.max(1) {
            return Err(Error::ValidationFailed(format!(
                "Page {} out of range 1..={}",
                page,
                pages.max(1)
            )));
        }

        Ok(assets
            .iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect())
    }

    async fn find(&self, unit: &str) -> Result<OwnedAsset, Error> {
        self.assets
            .read()
            .await
            .iter()
            .find(|a| a.unit == unit)
            .cloned()
            .ok_or_else(|| Error::ValidationFailed(format!("Asset {} is not in the gallery", unit)))
    }

    async fn remove(&self, unit: &str) {
        self.assets.write().await.retain(|a| a.unit != unit);
    }

    /// Burn one NFT
    ///
    /// Only assets minted by the connected address can be burned. The asset
    /// leaves the list once the transaction is submitted.
    #[instrument(skip(self))]
    pub async fn burn(&self, unit: &str) -> Result<TransactionHash, Error> {
        let asset = self.find(unit).await?;

        if !self.wallet.is_connected().await {
            return Err(Error::WalletNotConnected);
        }

        let request = TxRequest::Burn {
            unit: asset.unit.clone(),
        };
        let hash = self
            .wallet
            .build_sign_submit(&request)
            .await
            .map_err(|e| match e {
                Error::WalletNotConnected => e,
                e => Error::BurnFailed(e.to_string()),
            })?;

        tracing::info!("Burned {} in {}", asset.metadata.name, hash);
        self.remove(unit).await;
        Ok(hash)
    }

    /// Send one NFT to `recipient` with an optional public message
    #[instrument(skip(self, message))]
    pub async fn send(
        &self,
        unit: &str,
        recipient: &str,
        message: Option<String>,
    ) -> Result<TransactionHash, Error> {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(Error::ValidationFailed(
                "Recipient address is required".to_string(),
            ));
        }

        let message = message.filter(|m| !m.is_empty());
        if let Some(message) = &message {
            if message.chars().count() > MAX_MESSAGE_LEN {
                return Err(Error::ValidationFailed(format!(
                    "Message must be at most {} characters",
                    MAX_MESSAGE_LEN
                )));
            }
        }

        let asset = self.find(unit).await?;

        if !self.wallet.is_connected().await {
            return Err(Error::WalletNotConnected);
        }

        let metadata = asset
            .metadata
            .for_transfer(message)
            .to_cip25(&asset.policy_id, &asset.asset_name);

        let request = TxRequest::Send {
            unit: asset.unit.clone(),
            recipient: Address::new(recipient),
            metadata: Some(metadata),
        };
        let hash = self
            .wallet
            .build_sign_submit(&request)
            .await
            .map_err(|e| match e {
                Error::WalletNotConnected => e,
                e => Error::SendFailed(e.to_string()),
            })?;

        tracing::info!("Sent {} to {} in {}", asset.metadata.name, recipient, hash);
        self.remove(unit).await;
        Ok(hash)
    }
}
