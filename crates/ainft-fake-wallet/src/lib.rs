//! AINFT Fake Wallet
//!
//! Used for testing where transactions are applied to an in-memory ledger.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ainft_common::gallery::RawAsset;
use ainft_common::metadata::CIP25_LABEL;
use ainft_common::wallet::Amount;
use ainft_common::{
    Address, SignedTransaction, TransactionHash, TxRequest, UnsignedTransaction, Utxo,
    WalletGateway,
};
use async_trait::async_trait;
use error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time;
use tracing::instrument;

pub mod error;

/// Witness appended to every transaction this wallet signs
const FAKE_WITNESS: &str = "a10081825820";

/// Lovelace held by the single fake UTxO
const FAKE_BALANCE: u64 = 10_000_000;

/// Length of a policy id in hex
const POLICY_ID_LEN: usize = 56;

/// Which wallet steps should fail
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeFailures {
    /// Building errors
    pub build_err: bool,
    /// Signing is declined
    pub sign_err: bool,
    /// Submission is rejected
    pub submit_err: bool,
}

/// Submitted transaction as recorded by the fake ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    /// Returned hash
    pub hash: TransactionHash,
    /// Request that was built
    pub request: TxRequest,
}

/// Fake Wallet
#[derive(Debug, Clone)]
pub struct FakeWallet {
    address: Address,
    connected: Arc<AtomicBool>,
    failures: Arc<Mutex<FakeFailures>>,
    submit_delay: Duration,
    ledger: Arc<Mutex<BTreeMap<String, RawAsset>>>,
    submitted: Arc<Mutex<Vec<SubmittedTransaction>>>,
    tx_counter: Arc<AtomicU64>,
}

impl FakeWallet {
    /// Create new [`FakeWallet`]
    ///
    /// `submit_delay_ms` is slept before a submission is applied.
    pub fn new(address: impl Into<String>, failures: FakeFailures, submit_delay_ms: u64) -> Self {
        Self {
            address: Address::new(address),
            connected: Arc::new(AtomicBool::new(true)),
            failures: Arc::new(Mutex::new(failures)),
            submit_delay: Duration::from_millis(submit_delay_ms),
            ledger: Arc::new(Mutex::new(BTreeMap::new())),
            submitted: Arc::new(Mutex::new(Vec::new())),
            tx_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Connect or disconnect the wallet
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Replace the failure switches
    pub async fn set_failures(&self, failures: FakeFailures) {
        *self.failures.lock().await = failures;
    }

    /// Policy id of assets minted by this wallet
    pub fn policy_id(&self) -> String {
        fake_policy_id(&self.address)
    }

    /// Assets currently held, in ledger query format
    pub async fn assets(&self) -> Vec<RawAsset> {
        let mut assets = vec![RawAsset {
            unit: "lovelace".to_string(),
            quantity: FAKE_BALANCE.to_string(),
            policy_id: None,
            asset_name: None,
            metadata: None,
        }];
        assets.extend(self.ledger.lock().await.values().cloned());
        assets
    }

    /// Put an asset into the ledger directly
    pub async fn insert_asset(&self, asset: RawAsset) {
        self.ledger.lock().await.insert(asset.unit.clone(), asset);
    }

    /// Every transaction submitted so far
    pub async fn submitted(&self) -> Vec<SubmittedTransaction> {
        self.submitted.lock().await.clone()
    }

    fn ensure_connected(&self) -> Result<(), Error> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    async fn apply(&self, request: &TxRequest) -> Result<(), Error> {
        let mut ledger = self.ledger.lock().await;

        match request {
            TxRequest::Mint(spec) => {
                let policy_id = self.policy_id();
                let unit = format!("{}{}", policy_id, hex::encode(spec.asset_name.as_bytes()));
                let metadata = match serde_json::to_value(&spec.metadata)? {
                    Value::Object(map) => map,
                    _ => return Err(Error::MalformedTransaction),
                };

                let entry = ledger.entry(unit.clone()).or_insert_with(|| RawAsset {
                    unit,
                    quantity: "0".to_string(),
                    policy_id: Some(policy_id),
                    asset_name: Some(spec.asset_name.clone()),
                    metadata: Some(metadata),
                });
                let held: u64 = entry.quantity.parse().unwrap_or_default();
                entry.quantity = (held + spec.quantity).to_string();
            }
            TxRequest::Burn { unit } | TxRequest::Send { unit, .. } => {
                ledger
                    .remove(unit)
                    .ok_or_else(|| Error::UnknownAsset(unit.clone()))?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl WalletGateway for FakeWallet {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn used_addresses(&self) -> Result<Vec<Address>, ainft_common::Error> {
        self.ensure_connected()?;
        Ok(vec![self.address.clone()])
    }

    async fn utxos(&self) -> Result<Vec<Utxo>, ainft_common::Error> {
        self.ensure_connected()?;
        Ok(vec![Utxo {
            tx_hash: "00".repeat(32),
            output_index: 0,
            address: self.address.clone(),
            amount: vec![Amount {
                unit: "lovelace".to_string(),
                quantity: FAKE_BALANCE.to_string(),
            }],
        }])
    }

    #[instrument(skip_all, fields(kind = request.kind()))]
    async fn build_transaction(
        &self,
        request: &TxRequest,
    ) -> Result<UnsignedTransaction, ainft_common::Error> {
        self.ensure_connected()?;
        if self.failures.lock().await.build_err {
            return Err(Error::BuildFailed.into());
        }

        match request {
            TxRequest::Mint(spec) => {
                tracing::debug!(
                    "Fake mint of {} under label {}",
                    spec.asset_name,
                    CIP25_LABEL
                );
            }
            TxRequest::Burn { unit } | TxRequest::Send { unit, .. } => {
                if !self.ledger.lock().await.contains_key(unit) {
                    return Err(Error::UnknownAsset(unit.clone()).into());
                }
            }
        }

        let body = serde_json::to_vec(request).map_err(Error::from)?;
        Ok(UnsignedTransaction(hex::encode(&body)))
    }

    #[instrument(skip_all)]
    async fn sign_transaction(
        &self,
        tx: UnsignedTransaction,
    ) -> Result<SignedTransaction, ainft_common::Error> {
        self.ensure_connected()?;
        if self.failures.lock().await.sign_err {
            return Err(Error::SignDeclined.into());
        }
        Ok(SignedTransaction(format!("{}{}", tx.0, FAKE_WITNESS)))
    }

    #[instrument(skip_all)]
    async fn submit_transaction(
        &self,
        tx: SignedTransaction,
    ) -> Result<TransactionHash, ainft_common::Error> {
        self.ensure_connected()?;

        if !self.submit_delay.is_zero() {
            time::sleep(self.submit_delay).await;
        }

        if self.failures.lock().await.submit_err {
            return Err(Error::SubmitRejected.into());
        }

        let hex_body = tx
            .0
            .strip_suffix(FAKE_WITNESS)
            .ok_or(Error::MalformedTransaction)?;
        let body = hex::decode(hex_body).map_err(|_| Error::MalformedTransaction)?;
        let request: TxRequest = serde_json::from_slice(&body).map_err(Error::from)?;

        self.apply(&request).await?;

        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let hash = TransactionHash(format!("{:064x}", n));
        tracing::info!("Fake {} transaction submitted: {}", request.kind(), hash);

        self.submitted.lock().await.push(SubmittedTransaction {
            hash: hash.clone(),
            request,
        });

        Ok(hash)
    }
}

fn fake_policy_id(address: &Address) -> String {
    let encoded = hex::encode(address.as_str().as_bytes());
    encoded
        .chars()
        .chain(std::iter::repeat('0'))
        .take(POLICY_ID_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use ainft_common::{AssetMetadata, MintSpec, Network};
    use serde_json::Map;

    use super::*;

    const ADDRESS: &str = "addr_test1qfake";

    fn mint_request(name: &str) -> TxRequest {
        TxRequest::Mint(MintSpec {
            asset_name: name.to_string(),
            quantity: 1,
            metadata: AssetMetadata {
                name: name.to_string(),
                image: "ipfs://QmCat".to_string(),
                media_type: "image/png".to_string(),
                description: "A cat".to_string(),
                message: None,
                extra: Map::new(),
            },
            recipient: Address::new(ADDRESS),
            network: Network::Preprod,
        })
    }

    #[tokio::test]
    async fn test_mint_then_burn() {
        let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), 0);

        let hash = wallet
            .build_sign_submit(&mint_request("Cat"))
            .await
            .expect("mint");
        assert_eq!(hash.0.len(), 64);

        let assets = wallet.assets().await;
        assert_eq!(assets.len(), 2);
        let unit = assets[1].unit.clone();
        assert!(unit.starts_with(&wallet.policy_id()));
        assert_eq!(assets[1].quantity, "1");

        wallet
            .build_sign_submit(&TxRequest::Burn { unit })
            .await
            .expect("burn");
        assert_eq!(wallet.assets().await.len(), 1);
        assert_eq!(wallet.submitted().await.len(), 2);
    }

    #[tokio::test]
    async fn test_hashes_are_deterministic() {
        let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), 0);
        let first = wallet.build_sign_submit(&mint_request("A")).await.expect("mint");
        let second = wallet.build_sign_submit(&mint_request("B")).await.expect("mint");
        assert_eq!(first.0, format!("{:064x}", 1));
        assert_eq!(second.0, format!("{:064x}", 2));
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let wallet = FakeWallet::new(
            ADDRESS,
            FakeFailures {
                sign_err: true,
                ..Default::default()
            },
            0,
        );

        let err = wallet
            .build_sign_submit(&mint_request("Cat"))
            .await
            .expect_err("sign must fail");
        assert!(err.to_string().contains("declined"));
        assert!(wallet.submitted().await.is_empty());

        wallet.set_failures(FakeFailures::default()).await;
        assert!(wallet.build_sign_submit(&mint_request("Cat")).await.is_ok());
    }

    #[tokio::test]
    async fn test_disconnected_wallet() {
        let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), 0);
        wallet.set_connected(false);

        assert!(matches!(
            wallet.address().await,
            Err(ainft_common::Error::WalletNotConnected)
        ));
        assert!(matches!(
            wallet.build_transaction(&mint_request("Cat")).await,
            Err(ainft_common::Error::WalletNotConnected)
        ));
    }

    #[tokio::test]
    async fn test_burn_unknown_asset_fails_at_build() {
        let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), 0);
        let err = wallet
            .build_transaction(&TxRequest::Burn {
                unit: "nope".to_string(),
            })
            .await
            .expect_err("unknown asset");
        assert!(err.to_string().contains("Unknown asset"));
    }

    #[tokio::test]
    async fn test_fee_estimate_from_built_tx() {
        let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), 0);
        let request = mint_request("Cat");
        let unsigned = wallet.build_transaction(&request).await.expect("build");
        let fee = wallet.estimate_fee(&request).await.expect("fee");

        assert!(fee.approximate);
        assert_eq!(fee.tx_size, unsigned.size_bytes() as u64);
        assert!(wallet.submitted().await.is_empty());
    }

    #[test]
    fn test_policy_id_length() {
        assert_eq!(fake_policy_id(&Address::new("a")).len(), POLICY_ID_LEN);
    }

    #[test]
    fn test_policy_id_is_hex_of_address() {
        let policy = fake_policy_id(&Address::new("ab"));
        assert!(policy.starts_with("6162"));
        assert!(policy[4..].chars().all(|c| c == '0'));
    }

    #[tokio::test]
    async fn test_malformed_transaction_rejected() {
        let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), 0);

        for body in ["zz", "0", "00ff"] {
            let err = wallet
                .submit_transaction(SignedTransaction(format!("{}{}", body, FAKE_WITNESS)))
                .await
                .expect_err("malformed");
            assert!(matches!(err, ainft_common::Error::Wallet(_)));
        }

        let err = wallet
            .submit_transaction(SignedTransaction("00".to_string()))
            .await
            .expect_err("unsigned");
        assert!(matches!(err, ainft_common::Error::Wallet(_)));
        assert!(wallet.submitted().await.is_empty());
    }
}
