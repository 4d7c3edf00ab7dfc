//! Wallet bridge gateway
//!
//! Talks to a local signer bridge over HTTP. The bridge fronts a real wallet
//! and does the key handling and transaction encoding.

use ainft_common::{
    Address, Error, SignedTransaction, TransactionHash, TxRequest, UnsignedTransaction, Utxo,
    WalletGateway,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::api::{ApiClient, ApiFailure};

/// `GET addresses` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressesResponse {
    /// Used addresses, first one is the minting address
    pub addresses: Vec<Address>,
}

/// `GET utxos` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtxosResponse {
    /// Unspent outputs
    pub utxos: Vec<Utxo>,
}

/// `POST build` request
#[derive(Debug, Clone, Serialize)]
pub struct BuildRequest<'a> {
    /// What to build
    pub request: &'a TxRequest,
}

/// Transaction hex passed to and from the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxPayload {
    /// CBOR hex
    pub tx: String,
}

/// `POST submit` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Hash of the submitted transaction
    pub tx_hash: String,
}

/// [`WalletGateway`] backed by a signer bridge
#[derive(Debug, Clone)]
pub struct BridgeWallet {
    api: ApiClient,
}

impl BridgeWallet {
    /// Create new [`BridgeWallet`]
    pub fn new(bridge_url: Url) -> Self {
        Self {
            api: ApiClient::new(bridge_url),
        }
    }

    /// Create new [`BridgeWallet`] from an existing client
    pub fn from_api(api: ApiClient) -> Self {
        Self { api }
    }
}

fn wallet_error(err: ApiFailure) -> Error {
    Error::Wallet(Box::new(err))
}

#[async_trait]
impl WalletGateway for BridgeWallet {
    async fn is_connected(&self) -> bool {
        match self.used_addresses().await {
            Ok(addresses) => !addresses.is_empty(),
            Err(err) => {
                tracing::debug!("Wallet bridge not reachable: {}", err);
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn used_addresses(&self) -> Result<Vec<Address>, Error> {
        let response: AddressesResponse =
            self.api.get_json("addresses").await.map_err(wallet_error)?;
        Ok(response.addresses)
    }

    #[instrument(skip(self))]
    async fn utxos(&self) -> Result<Vec<Utxo>, Error> {
        let response: UtxosResponse = self.api.get_json("utxos").await.map_err(wallet_error)?;
        Ok(response.utxos)
    }

    #[instrument(skip_all, fields(kind = request.kind()))]
    async fn build_transaction(&self, request: &TxRequest) -> Result<UnsignedTransaction, Error> {
        let response: TxPayload = self
            .api
            .post_json("build", &BuildRequest { request })
            .await
            .map_err(wallet_error)?;
        Ok(UnsignedTransaction(response.tx))
    }

    #[instrument(skip_all)]
    async fn sign_transaction(&self, tx: UnsignedTransaction) -> Result<SignedTransaction, Error> {
        let response: TxPayload = self
            .api
            .post_json("sign", &TxPayload { tx: tx.0 })
            .await
            .map_err(wallet_error)?;
        Ok(SignedTransaction(response.tx))
    }

    #[instrument(skip_all)]
    async fn submit_transaction(&self, tx: SignedTransaction) -> Result<TransactionHash, Error> {
        let response: SubmitResponse = self
            .api
            .post_json("submit", &TxPayload { tx: tx.0 })
            .await
            .map_err(wallet_error)?;
        tracing::info!("Transaction submitted through bridge: {}", response.tx_hash);
        Ok(TransactionHash(response.tx_hash))
    }
}
