//! Wallet gateway trait
//!
//! Everything that needs keys or knows the transaction format sits behind
//! this trait: address lookup, UTxO selection, building, signing and
//! submitting.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Error;
use crate::fee::FeeEstimate;
use crate::wallet::{
    Address, SignedTransaction, TransactionHash, TxRequest, UnsignedTransaction, Utxo,
};

/// Connection to a Cardano wallet
#[async_trait]
pub trait WalletGateway: Debug + Send + Sync {
    /// Whether a wallet is connected
    async fn is_connected(&self) -> bool;

    /// Addresses the wallet has used
    async fn used_addresses(&self) -> Result<Vec<Address>, Error>;

    /// Unspent outputs of the wallet
    async fn utxos(&self) -> Result<Vec<Utxo>, Error>;

    /// Build an unsigned transaction for the request
    async fn build_transaction(&self, request: &TxRequest) -> Result<UnsignedTransaction, Error>;

    /// Sign a built transaction
    async fn sign_transaction(&self, tx: UnsignedTransaction) -> Result<SignedTransaction, Error>;

    /// Submit a signed transaction
    async fn submit_transaction(&self, tx: SignedTransaction) -> Result<TransactionHash, Error>;

    /// First used address
    async fn address(&self) -> Result<Address, Error> {
        if !self.is_connected().await {
            return Err(Error::WalletNotConnected);
        }
        self.used_addresses()
            .await?
            .into_iter()
            .next()
            .ok_or(Error::WalletNotConnected)
    }

    /// Build, sign and submit in one go
    async fn build_sign_submit(&self, request: &TxRequest) -> Result<TransactionHash, Error> {
        let unsigned = self.build_transaction(request).await?;
        tracing::debug!(
            "Built {} transaction of {} bytes",
            request.kind(),
            unsigned.size_bytes()
        );
        let signed = self.sign_transaction(unsigned).await?;
        self.submit_transaction(signed).await
    }

    /// Approximate fee of the request, built but never submitted
    async fn estimate_fee(&self, request: &TxRequest) -> Result<FeeEstimate, Error> {
        let unsigned = self.build_transaction(request).await?;
        Ok(FeeEstimate::from_unsigned(&unsigned))
    }
}
