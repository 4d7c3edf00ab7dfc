//! Mint workflow controller
//!
//! Drives one image from generation through IPFS pinning to a submitted
//! mint transaction. The state sits behind a mutex that is only held to
//! check preconditions and record results, never across a call to a
//! collaborator. Every status change is published on a broadcast channel.

use std::sync::Arc;

use ainft_common::{
    check_status_transition, Error, FeeEstimate, GeneratedImage, GenerationParams, LocalImage,
    MintResult, MintSpec, MintStatus, Network, NftDraft, PinnedAsset, TxRequest, WalletGateway,
};
use ainft_http_client::HttpClient;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::instrument;

use crate::api::ApiClient;
use crate::generation::{prepare_request, HttpImageGenerator, ImageGenerator};
use crate::pinning::{image_payload, HttpPinner, Pinner};

mod event;

pub use event::WorkflowEvent;

/// Capacity of the event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Snapshot of a workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowState {
    /// Current status
    pub status: MintStatus,
    /// Image currently displayed
    pub image: Option<GeneratedImage>,
    /// Pin of the current image
    pub pinned: Option<PinnedAsset>,
    /// NFT details, editable once the image is pinned
    pub draft: Option<NftDraft>,
    /// Message of the last failure
    pub last_error: Option<String>,
    /// Result of the last successful mint
    pub last_mint: Option<MintResult>,
}

impl WorkflowState {
    /// Pin belonging to the current image, if any
    pub fn current_pin(&self) -> Option<&PinnedAsset> {
        let image = self.image.as_ref()?;
        self.pinned
            .as_ref()
            .filter(|pinned| pinned.source_image == image.id)
    }

    /// Check everything a mint needs except the status
    pub fn mint_inputs(&self) -> Result<(PinnedAsset, NftDraft), Error> {
        let pinned = self.current_pin().cloned().ok_or_else(|| {
            Error::MintPreconditionFailed(
                "Image must be uploaded to IPFS before minting".to_string(),
            )
        })?;
        let draft = self
            .draft
            .clone()
            .ok_or_else(|| Error::MintPreconditionFailed("NFT name is required".to_string()))?;
        draft.validate()?;
        Ok((pinned, draft))
    }
}

/// Mint workflow controller
#[derive(Debug)]
pub struct MintWorkflow {
    generator: Arc<dyn ImageGenerator>,
    pinner: Arc<dyn Pinner>,
    wallet: Arc<dyn WalletGateway>,
    http: HttpClient,
    network: Network,
    state: Mutex<WorkflowState>,
    events: broadcast::Sender<WorkflowEvent>,
}

impl MintWorkflow {
    /// Create new [`MintWorkflow`]
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        pinner: Arc<dyn Pinner>,
        wallet: Arc<dyn WalletGateway>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            generator,
            pinner,
            wallet,
            http: HttpClient::new(),
            network: Network::default(),
            state: Mutex::new(WorkflowState::default()),
            events,
        }
    }

    /// Create new [`MintWorkflow`] using the backend API for generation and pinning
    pub fn from_api(api: ApiClient, wallet: Arc<dyn WalletGateway>) -> Self {
        let http = api.http().clone();
        Self::new(
            Arc::new(HttpImageGenerator::new(api.clone())),
            Arc::new(HttpPinner::new(api)),
            wallet,
        )
        .with_http_client(http)
    }

    /// HTTP client used to download remote images before pinning
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Network new drafts target
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Current state
    pub async fn snapshot(&self) -> WorkflowState {
        self.state.lock().await.clone()
    }

    /// Current status
    pub async fn status(&self) -> MintStatus {
        self.state.lock().await.status
    }

    /// Subscribe to workflow events
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: WorkflowEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn transition(&self, state: &mut WorkflowState, to: MintStatus) -> Result<(), Error> {
        let from = state.status;
        check_status_transition(from, to)?;
        state.status = to;
        tracing::debug!("Workflow status {} -> {}", from, to);
        self.publish(WorkflowEvent::StatusChanged { from, to });
        Ok(())
    }

    fn fail(&self, state: &mut WorkflowState, err: &Error) {
        let message = err.to_string();
        tracing::warn!("Workflow step failed: {}", message);

        if let Err(transition_err) = self.transition(state, MintStatus::Error) {
            tracing::error!("Could not record failure: {}", transition_err);
        }
        state.last_error = Some(message.clone());
        self.publish(WorkflowEvent::Failed { message });
    }

    /// Put the workflow back to idle without a transition check
    fn settle_idle(&self, state: &mut WorkflowState) {
        if state.status != MintStatus::Idle {
            let from = state.status;
            state.status = MintStatus::Idle;
            self.publish(WorkflowEvent::StatusChanged {
                from,
                to: MintStatus::Idle,
            });
        }
    }

    /// Generate a new image
    ///
    /// On success the new image replaces the old one and any pin or draft
    /// of the old image is discarded. On failure the old image stays.
    #[instrument(skip(self, params), fields(engine = %params.engine))]
    pub async fn generate(
        &self,
        raw_prompt: &str,
        params: GenerationParams,
    ) -> Result<GeneratedImage, Error> {
        let request = prepare_request(raw_prompt, &params)?;

        {
            let mut state = self.state.lock().await;
            self.transition(&mut state, MintStatus::Generating)?;
        }

        let result = self.generator.generate(&request.prompt, &params).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(image) => {
                state.image = Some(image.clone());
                state.pinned = None;
                state.draft = None;
                state.last_error = None;
                self.transition(&mut state, MintStatus::Idle)?;
                tracing::info!("Image {} generated", image.id);
                Ok(image)
            }
            Err(err) => {
                let err = match err {
                    Error::GenerationFailed(_) => err,
                    other => Error::GenerationFailed(other.to_string()),
                };
                self.fail(&mut state, &err);
                Err(err)
            }
        }
    }

    /// Install a file from disk as the current image
    #[instrument(skip(self, bytes))]
    pub async fn load_local_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<GeneratedImage, Error> {
        let local = LocalImage::new(file_name, content_type, bytes)?;
        let image = GeneratedImage::local(&local);

        let mut state = self.state.lock().await;
        if state.status.is_in_flight() {
            return Err(Error::InvalidTransition(state.status, MintStatus::Idle));
        }

        state.image = Some(image.clone());
        state.pinned = None;
        state.draft = None;
        state.last_error = None;
        self.settle_idle(&mut state);

        tracing::info!("Local image {} loaded as {}", file_name, image.id);
        Ok(image)
    }

    /// Pin the current image to IPFS
    #[instrument(skip(self))]
    pub async fn upload(&self) -> Result<PinnedAsset, Error> {
        let image = {
            let mut state = self.state.lock().await;
            let image = state.image.clone().ok_or_else(|| {
                Error::MintPreconditionFailed("No image to upload".to_string())
            })?;
            self.transition(&mut state, MintStatus::Uploading)?;
            image
        };

        let result = match image_payload(&self.http, &image).await {
            Ok(payload) => self.pinner.pin(payload, image.id).await,
            Err(err) => Err(err),
        };

        let mut state = self.state.lock().await;
        match result {
            Ok(pinned) => {
                state.pinned = Some(pinned.clone());
                let network = self.network;
                state.draft.get_or_insert_with(|| NftDraft {
                    network,
                    ..Default::default()
                });
                state.last_error = None;
                self.transition(&mut state, MintStatus::Uploaded)?;
                Ok(pinned)
            }
            Err(err) => {
                let err = match err {
                    Error::PinningFailed(_) => err,
                    other => Error::PinningFailed(other.to_string()),
                };
                state.pinned = None;
                self.fail(&mut state, &err);
                Err(err)
            }
        }
    }

    /// Edit the NFT details of the pinned image
    pub async fn update_draft(&self, draft: NftDraft) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        if state.status != MintStatus::Uploaded {
            return Err(Error::MintPreconditionFailed(format!(
                "NFT details can only be edited after upload, status is {}",
                state.status
            )));
        }
        state.draft = Some(draft);
        Ok(())
    }

    /// Mint the pinned image as an NFT
    ///
    /// At most one mint runs per workflow; a second call while one is in
    /// flight fails without reaching the wallet. On failure the pin and the
    /// draft are kept so the mint can be retried without uploading again.
    #[instrument(skip(self))]
    pub async fn mint(&self) -> Result<MintResult, Error> {
        if !self.wallet.is_connected().await {
            return Err(Error::WalletNotConnected);
        }

        let (pinned, draft) = {
            let mut state = self.state.lock().await;
            if state.status == MintStatus::Minting {
                return Err(Error::MintPreconditionFailed(
                    "A mint is already in progress".to_string(),
                ));
            }
            let inputs = state.mint_inputs()?;
            self.transition(&mut state, MintStatus::Minting)?;
            inputs
        };

        let result = async {
            let recipient = self.wallet.address().await?;
            let spec = MintSpec::from_draft(&draft, &pinned, recipient);
            self.wallet.build_sign_submit(&TxRequest::Mint(spec)).await
        }
        .await;

        let mut state = self.state.lock().await;
        match result {
            Ok(transaction_hash) => {
                let minted = MintResult {
                    transaction_hash,
                    asset_name: draft.name,
                    content_hash: pinned.content_hash,
                };
                state.pinned = None;
                state.draft = None;
                state.last_error = None;
                state.last_mint = Some(minted.clone());
                self.transition(&mut state, MintStatus::Minted)?;
                tracing::info!(
                    "Minted {} in transaction {}",
                    minted.asset_name,
                    minted.transaction_hash
                );
                self.publish(WorkflowEvent::Minted(minted.clone()));
                Ok(minted)
            }
            Err(err) => {
                let err = match err {
                    Error::MintSubmissionFailed(_) => err,
                    other => Error::MintSubmissionFailed(other.to_string()),
                };
                self.fail(&mut state, &err);
                Err(err)
            }
        }
    }

    /// Approximate fee of minting the current draft
    ///
    /// Builds the mint transaction without signing or submitting it.
    #[instrument(skip(self))]
    pub async fn estimate_fee(&self) -> Result<FeeEstimate, Error> {
        if !self.wallet.is_connected().await {
            return Err(Error::WalletNotConnected);
        }

        let (pinned, draft) = {
            let state = self.state.lock().await;
            state.mint_inputs()?
        };

        let recipient = self.wallet.address().await?;
        let spec = MintSpec::from_draft(&draft, &pinned, recipient);
        self.wallet.estimate_fee(&TxRequest::Mint(spec)).await
    }

    /// Clear image, pin, draft and result and return to idle
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        if state.status.is_in_flight() {
            return Err(Error::InvalidTransition(state.status, MintStatus::Idle));
        }

        state.image = None;
        state.pinned = None;
        state.draft = None;
        state.last_error = None;
        state.last_mint = None;
        self.settle_idle(&mut state);
        Ok(())
    }
}
