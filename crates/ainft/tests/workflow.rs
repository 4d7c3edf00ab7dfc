//! Mint workflow tests with in-process collaborators and the fake wallet

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use ainft::gallery::{AssetQuery, Gallery};
use ainft::pinning::{ImagePayload, Pinner};
use ainft::{ImageGenerator, MintWorkflow, WorkflowEvent};
use ainft_common::{
    Address, Dimensions, Engine, Error, GeneratedImage, GenerationParams, MintStatus, NftDraft,
    PinnedAsset, RawAsset, TxRequest,
};
use ainft_fake_wallet::{FakeFailures, FakeWallet};
use async_trait::async_trait;
use uuid::Uuid;

const ADDRESS: &str = "addr_test1qworkflow";

#[derive(Debug, Default)]
struct StubGenerator {
    fail: AtomicBool,
    prompts: StdMutex<Vec<String>>,
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GeneratedImage, Error> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::GenerationFailed("backend down".to_string()));
        }
        Ok(GeneratedImage::generated(
            "data:image/png;base64,aGVsbG8=",
            prompt,
            params.clone(),
        ))
    }
}

#[derive(Debug, Default)]
struct StubPinner {
    fail: AtomicBool,
    delay_ms: u64,
    calls: AtomicUsize,
    payloads: StdMutex<Vec<ImagePayload>>,
}

#[async_trait]
impl Pinner for StubPinner {
    async fn pin(&self, payload: ImagePayload, source_image: Uuid) -> Result<PinnedAsset, Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::PinningFailed(
                "HTTP error (500): Error uploading to IPFS".to_string(),
            ));
        }

        let size_bytes = payload.bytes.len() as u64;
        self.payloads.lock().expect("payloads lock").push(payload);

        Ok(PinnedAsset {
            content_hash: format!("QmPin{}", n),
            gateway_url: format!("https://gateway.pinata.cloud/ipfs/QmPin{}", n),
            size_bytes,
            pinned_at: "2024-05-01T10:00:00Z".to_string(),
            source_image,
        })
    }
}

#[derive(Debug)]
struct FakeLedger(FakeWallet);

#[async_trait]
impl AssetQuery for FakeLedger {
    async fn assets(&self, _address: &Address) -> Result<Vec<RawAsset>, Error> {
        Ok(self.0.assets().await)
    }
}

struct Harness {
    generator: Arc<StubGenerator>,
    pinner: Arc<StubPinner>,
    wallet: FakeWallet,
    workflow: Arc<MintWorkflow>,
}

fn harness_with(pinner: StubPinner, submit_delay_ms: u64) -> Harness {
    let generator = Arc::new(StubGenerator::default());
    let pinner = Arc::new(pinner);
    let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), submit_delay_ms);
    let workflow = Arc::new(MintWorkflow::new(
        generator.clone(),
        pinner.clone(),
        Arc::new(wallet.clone()),
    ));

    Harness {
        generator,
        pinner,
        wallet,
        workflow,
    }
}

fn harness() -> Harness {
    harness_with(StubPinner::default(), 0)
}

fn sd16_512() -> GenerationParams {
    GenerationParams::new(Engine::Sd16, Dimensions::square(512), None).expect("params")
}

/// Generate, upload and fill in the draft
async fn ready_to_mint(h: &Harness) {
    h.workflow
        .generate("Generate a cat in space", sd16_512())
        .await
        .expect("generate");
    h.workflow.upload().await.expect("upload");
    h.workflow
        .update_draft(NftDraft::new("Space Cat", "A cat in space"))
        .await
        .expect("draft");
}

#[tokio::test]
async fn test_generate_cleans_prompt_and_goes_idle() {
    let h = harness();

    let image = h
        .workflow
        .generate("Generate a cat in space", sd16_512())
        .await
        .expect("generate");

    assert_eq!(
        h.generator.prompts.lock().expect("lock").as_slice(),
        ["a cat in space"]
    );
    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Idle);
    assert_eq!(state.image, Some(image));
    assert!(state.pinned.is_none());
}

#[tokio::test]
async fn test_empty_prompt_leaves_status_untouched() {
    let h = harness();

    let err = h
        .workflow
        .generate("   ", sd16_512())
        .await
        .expect_err("empty prompt");
    assert!(matches!(err, Error::ValidationFailed(_)));
    assert_eq!(h.workflow.status().await, MintStatus::Idle);
}

#[tokio::test]
async fn test_generation_failure_keeps_previous_image() {
    let h = harness();
    let first = h
        .workflow
        .generate("a cat", sd16_512())
        .await
        .expect("generate");

    h.generator.fail.store(true, Ordering::SeqCst);
    let err = h
        .workflow
        .generate("a dog", sd16_512())
        .await
        .expect_err("must fail");
    assert!(matches!(err, Error::GenerationFailed(_)));

    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Error);
    assert_eq!(state.image, Some(first));
    assert!(state
        .last_error
        .as_deref()
        .is_some_and(|m| m.contains("backend down")));

    // Retry straight from error
    h.generator.fail.store(false, Ordering::SeqCst);
    h.workflow
        .generate("a dog", sd16_512())
        .await
        .expect("retry");
    assert_eq!(h.workflow.status().await, MintStatus::Idle);
}

#[tokio::test]
async fn test_upload_failure_then_retry() {
    let h = harness();
    h.workflow
        .generate("a cat", sd16_512())
        .await
        .expect("generate");

    h.pinner.fail.store(true, Ordering::SeqCst);
    let err = h.workflow.upload().await.expect_err("must fail");
    assert!(matches!(err, Error::PinningFailed(_)));

    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Error);
    assert!(state.pinned.is_none());

    h.pinner.fail.store(false, Ordering::SeqCst);
    let pinned = h.workflow.upload().await.expect("retry");

    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Uploaded);
    assert_eq!(state.pinned, Some(pinned.clone()));
    assert_eq!(
        Some(pinned.source_image),
        state.image.as_ref().map(|i| i.id)
    );

    let payloads = h.pinner.payloads.lock().expect("lock");
    assert_eq!(payloads[0].bytes, b"hello".to_vec());
    assert_eq!(payloads[0].file_name, "generated_image.png");
}

#[tokio::test]
async fn test_upload_without_image() {
    let h = harness();
    let err = h.workflow.upload().await.expect_err("no image");
    assert!(matches!(err, Error::MintPreconditionFailed(_)));
    assert_eq!(h.workflow.status().await, MintStatus::Idle);
}

#[tokio::test]
async fn test_generation_rejected_while_uploading() {
    let h = harness_with(
        StubPinner {
            delay_ms: 50,
            ..Default::default()
        },
        0,
    );
    h.workflow
        .generate("a cat", sd16_512())
        .await
        .expect("generate");

    let (upload, generate) = tokio::join!(h.workflow.upload(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.workflow.generate("a dog", sd16_512()).await
    });

    assert!(upload.is_ok());
    assert!(matches!(
        generate,
        Err(Error::InvalidTransition(MintStatus::Uploading, MintStatus::Generating))
    ));
    assert_eq!(h.generator.prompts.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn test_new_generation_discards_pin() {
    let h = harness();
    ready_to_mint(&h).await;

    h.workflow
        .generate("a dog", sd16_512())
        .await
        .expect("generate");

    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Idle);
    assert!(state.pinned.is_none());
    assert!(state.draft.is_none());

    let err = h.workflow.mint().await.expect_err("no pin");
    assert!(matches!(err, Error::MintPreconditionFailed(_)));
}

#[tokio::test]
async fn test_draft_only_editable_when_uploaded() {
    let h = harness();
    let err = h
        .workflow
        .update_draft(NftDraft::new("a", "b"))
        .await
        .expect_err("idle");
    assert!(matches!(err, Error::MintPreconditionFailed(_)));
}

#[tokio::test]
async fn test_mint_success() {
    let h = harness();
    ready_to_mint(&h).await;

    let minted = h.workflow.mint().await.expect("mint");
    assert_eq!(minted.asset_name, "Space Cat");
    assert_eq!(minted.content_hash, "QmPin1");

    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Minted);
    assert!(state.pinned.is_none());
    assert!(state.draft.is_none());
    assert_eq!(state.last_mint, Some(minted.clone()));

    let submitted = h.wallet.submitted().await;
    assert_eq!(submitted.len(), 1);
    match &submitted[0].request {
        TxRequest::Mint(spec) => {
            assert_eq!(spec.quantity, 1);
            assert_eq!(spec.metadata.image, "ipfs://QmPin1");
            assert_eq!(spec.metadata.media_type, "image/png");
            assert_eq!(spec.recipient, Address::new(ADDRESS));
        }
        other => panic!("unexpected request {:?}", other.kind()),
    }

    // The pin was consumed
    let err = h.workflow.mint().await.expect_err("nothing to mint");
    assert!(matches!(err, Error::MintPreconditionFailed(_)));
}

#[tokio::test]
async fn test_mint_requires_connected_wallet() {
    let h = harness();
    ready_to_mint(&h).await;
    h.wallet.set_connected(false);

    let err = h.workflow.mint().await.expect_err("disconnected");
    assert!(matches!(err, Error::WalletNotConnected));
    assert_eq!(h.workflow.status().await, MintStatus::Uploaded);
    assert!(h.wallet.submitted().await.is_empty());
}

#[tokio::test]
async fn test_mint_requires_name_and_description() {
    let h = harness();
    ready_to_mint(&h).await;
    h.workflow
        .update_draft(NftDraft::new("", "A cat in space"))
        .await
        .expect("draft");

    let err = h.workflow.mint().await.expect_err("no name");
    assert!(matches!(err, Error::MintPreconditionFailed(_)));
    assert_eq!(h.workflow.status().await, MintStatus::Uploaded);
    assert!(h.wallet.submitted().await.is_empty());
}

#[tokio::test]
async fn test_double_mint_submits_once() {
    let h = harness_with(StubPinner::default(), 50);
    ready_to_mint(&h).await;

    let (first, second) = tokio::join!(h.workflow.mint(), h.workflow.mint());

    let results = [first, second];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(Error::MintPreconditionFailed(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(rejected, 1);
    assert_eq!(h.wallet.submitted().await.len(), 1);
    assert_eq!(h.workflow.status().await, MintStatus::Minted);
}

#[tokio::test]
async fn test_mint_failure_preserves_pin_for_retry() {
    let h = harness();
    ready_to_mint(&h).await;

    h.wallet
        .set_failures(FakeFailures {
            submit_err: true,
            ..Default::default()
        })
        .await;
    let err = h.workflow.mint().await.expect_err("rejected");
    assert!(matches!(err, Error::MintSubmissionFailed(_)));

    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Error);
    assert!(state.pinned.is_some());
    assert_eq!(
        state.draft.as_ref().map(|d| d.name.as_str()),
        Some("Space Cat")
    );

    h.wallet.set_failures(FakeFailures::default()).await;
    h.workflow.mint().await.expect("retry");

    assert_eq!(h.pinner.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.workflow.status().await, MintStatus::Minted);
}

#[tokio::test]
async fn test_estimate_fee_is_approximate_and_never_submits() {
    let h = harness();
    ready_to_mint(&h).await;

    let fee = h.workflow.estimate_fee().await.expect("fee");
    assert!(fee.approximate);
    assert!(fee.lovelace >= 155_381);
    assert!(h.wallet.submitted().await.is_empty());
    assert_eq!(h.workflow.status().await, MintStatus::Uploaded);
}

#[tokio::test]
async fn test_reset() {
    let h = harness();
    ready_to_mint(&h).await;
    h.workflow.mint().await.expect("mint");

    h.workflow.reset().await.expect("reset");
    let state = h.workflow.snapshot().await;
    assert_eq!(state.status, MintStatus::Idle);
    assert!(state.image.is_none());
    assert!(state.last_mint.is_none());
}

#[tokio::test]
async fn test_reset_rejected_while_minting() {
    let h = harness_with(StubPinner::default(), 50);
    ready_to_mint(&h).await;

    let (minted, reset) = tokio::join!(h.workflow.mint(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.workflow.reset().await
    });

    assert!(minted.is_ok());
    assert!(matches!(
        reset,
        Err(Error::InvalidTransition(MintStatus::Minting, MintStatus::Idle))
    ));
}

#[tokio::test]
async fn test_local_image_path() {
    let h = harness();

    let err = h
        .workflow
        .load_local_image(vec![0; 1_572_865], "image/png", "big.png")
        .await
        .expect_err("too big");
    assert!(matches!(err, Error::ValidationFailed(_)));

    let err = h
        .workflow
        .load_local_image(vec![0; 10], "image/gif", "anim.gif")
        .await
        .expect_err("gif");
    assert!(matches!(err, Error::ValidationFailed(_)));
    assert!(h.workflow.snapshot().await.image.is_none());

    h.workflow
        .load_local_image(b"jpegdata".to_vec(), "image/jpeg", "photo.jpg")
        .await
        .expect("load");
    h.workflow.upload().await.expect("upload");

    let payloads = h.pinner.payloads.lock().expect("lock");
    assert_eq!(payloads[0].file_name, "photo.jpg");
    assert_eq!(payloads[0].mime, "image/jpeg");
    assert_eq!(payloads[0].bytes, b"jpegdata".to_vec());
}

#[tokio::test]
async fn test_events_follow_status_changes() {
    let h = harness();
    let mut events = h.workflow.subscribe();

    ready_to_mint(&h).await;
    h.workflow.mint().await.expect("mint");

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }

    let transitions: Vec<(MintStatus, MintStatus)> = seen
        .iter()
        .filter_map(|e| match e {
            WorkflowEvent::StatusChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (MintStatus::Idle, MintStatus::Generating),
            (MintStatus::Generating, MintStatus::Idle),
            (MintStatus::Idle, MintStatus::Uploading),
            (MintStatus::Uploading, MintStatus::Uploaded),
            (MintStatus::Uploaded, MintStatus::Minting),
            (MintStatus::Minting, MintStatus::Minted),
        ]
    );
    assert!(matches!(seen.last(), Some(WorkflowEvent::Minted(_))));
}

#[tokio::test]
async fn test_gallery_burn_removes_exactly_one() {
    let h = harness();
    for name in ["Cat", "Dog"] {
        ready_to_mint(&h).await;
        h.workflow
            .update_draft(NftDraft::new(name, "A pet"))
            .await
            .expect("draft");
        h.workflow.mint().await.expect("mint");
        h.workflow.reset().await.expect("reset");
    }

    let gallery = Gallery::new(
        Arc::new(FakeLedger(h.wallet.clone())),
        Arc::new(h.wallet.clone()),
    );
    assert_eq!(gallery.refresh().await.expect("refresh"), 2);

    let unit = gallery.assets().await[0].unit.clone();
    gallery.burn(&unit).await.expect("burn");

    let remaining = gallery.assets().await;
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].unit, unit);
    assert_eq!(gallery.refresh().await.expect("refresh"), 1);
}

#[tokio::test]
async fn test_gallery_burn_failure_keeps_asset() {
    let h = harness();
    ready_to_mint(&h).await;
    h.workflow.mint().await.expect("mint");

    let gallery = Gallery::new(
        Arc::new(FakeLedger(h.wallet.clone())),
        Arc::new(h.wallet.clone()),
    );
    gallery.refresh().await.expect("refresh");
    let unit = gallery.assets().await[0].unit.clone();

    h.wallet
        .set_failures(FakeFailures {
            sign_err: true,
            ..Default::default()
        })
        .await;
    let err = gallery.burn(&unit).await.expect_err("declined");
    assert!(matches!(err, Error::BurnFailed(_)));
    assert_eq!(gallery.assets().await.len(), 1);
}

#[tokio::test]
async fn test_gallery_send_with_message() {
    let h = harness();
    ready_to_mint(&h).await;
    h.workflow.mint().await.expect("mint");

    let gallery = Gallery::new(
        Arc::new(FakeLedger(h.wallet.clone())),
        Arc::new(h.wallet.clone()),
    );
    gallery.refresh().await.expect("refresh");
    let unit = gallery.assets().await[0].unit.clone();

    let err = gallery
        .send(&unit, "addr_test1friend", Some("x".repeat(65)))
        .await
        .expect_err("message too long");
    assert!(matches!(err, Error::ValidationFailed(_)));

    let err = gallery
        .send(&unit, "  ", None)
        .await
        .expect_err("no recipient");
    assert!(matches!(err, Error::ValidationFailed(_)));

    gallery
        .send(&unit, "addr_test1friend", Some("gm".to_string()))
        .await
        .expect("send");
    assert!(gallery.assets().await.is_empty());

    let submitted = h.wallet.submitted().await;
    match &submitted.last().expect("send tx").request {
        TxRequest::Send {
            recipient,
            metadata: Some(metadata),
            ..
        } => {
            assert_eq!(recipient, &Address::new("addr_test1friend"));
            assert_eq!(metadata["version"], "1.0");
            let policy = h.wallet.policy_id();
            assert_eq!(metadata[policy.as_str()]["Space Cat"]["message"], "gm");
            assert_eq!(metadata[policy.as_str()]["Space Cat"]["mediaType"], "image/png");
        }
        other => panic!("unexpected request {:?}", other.kind()),
    }
}

#[tokio::test]
async fn test_gallery_paging() {
    let wallet = FakeWallet::new(ADDRESS, FakeFailures::default(), 0);
    for i in 0..16 {
        wallet
            .insert_asset(RawAsset {
                unit: format!("p{:02}", i),
                quantity: "1".to_string(),
                policy_id: Some("p".to_string()),
                asset_name: Some(format!("n{:02}", i)),
                metadata: serde_json::from_value(serde_json::json!({
                    "name": format!("NFT {}", i),
                    "description": "d",
                    "image": "ipfs://Qm"
                }))
                .expect("metadata"),
            })
            .await;
    }

    let gallery = Gallery::new(Arc::new(FakeLedger(wallet.clone())), Arc::new(wallet));
    assert_eq!(gallery.refresh().await.expect("refresh"), 16);
    assert_eq!(gallery.total_pages().await, 2);
    assert_eq!(gallery.page(1).await.expect("page 1").len(), 15);
    assert_eq!(gallery.page(2).await.expect("page 2").len(), 1);
    assert!(gallery.page(0).await.is_err());
    assert!(gallery.page(3).await.is_err());
}
