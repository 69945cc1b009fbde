//! Capture flow integration tests.
//!
//! Run with: `cargo test -p fleet-evidence --test capture_flow_test`

mod helpers;

use fleet_core::{EvidenceKind, SubmitMethod, SubmitTarget};
use fleet_evidence::CaptureState;
use helpers::fixtures;
use helpers::storage::PUBLIC_BASE_URL;
use helpers::submitter::Reply;
use helpers::{Event, TestHarness};
use image::GenericImageView;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn uploaded_keys(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Upload { key } => Some(key.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_refueling_happy_path() {
    let harness = TestHarness::new();
    harness
        .submitter
        .reply_with(Reply::Accept(json!({"id": 981, "status": "registrado"})));

    let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let sink = received.clone();
    let mut capture = harness
        .context
        .capture(fixtures::refueling(), SubmitTarget::create("/abastecimentos"))
        .on_success(move |body| *sink.lock().unwrap() = Some(body.clone()));

    let state = capture.select(fixtures::camera_photo(4000, 3000)).await.clone();
    match state {
        CaptureState::ReadyToConfirm {
            preview_url,
            width,
            height,
        } => {
            assert_eq!((width, height), (1200, 900));
            assert!(harness.context.previews().resolve(&preview_url).is_some());
        }
        other => panic!("expected ReadyToConfirm, got {:?}", other),
    }

    let state = capture.confirm().await.clone();
    assert_eq!(
        state,
        CaptureState::Succeeded {
            response: json!({"id": 981, "status": "registrado"})
        }
    );
    assert_eq!(
        *received.lock().unwrap(),
        Some(json!({"id": 981, "status": "registrado"}))
    );

    let events = harness.events();
    assert_eq!(events.len(), 2);
    let key = match &events[0] {
        Event::Upload { key } => key.clone(),
        other => panic!("expected upload first, got {:?}", other),
    };
    assert!(key.starts_with("public/abastecimentos-"));
    assert!(key.ends_with(".jpg"));

    match &events[1] {
        Event::Submit { method, path, body } => {
            assert_eq!(*method, SubmitMethod::Create);
            assert_eq!(path, "/abastecimentos");
            assert_eq!(
                body["fotoNotaFiscalUrl"],
                json!(format!("{}/{}", PUBLIC_BASE_URL, key))
            );
            assert_eq!(body["veiculoId"], json!(12));
            assert_eq!(body["litros"], json!(45.3));
            assert_eq!(body["tipoCombustivel"], json!("DIESEL"));
        }
        other => panic!("expected submission second, got {:?}", other),
    }

    let stored = harness.storage.object(&key).unwrap();
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!(decoded.dimensions(), (1200, 900));
    assert_eq!(
        image::guess_format(&stored).unwrap(),
        image::ImageFormat::Jpeg
    );
}

#[tokio::test]
async fn test_decode_failure_touches_nothing() {
    let harness = TestHarness::new();
    let mut capture = harness
        .context
        .capture(fixtures::refueling(), SubmitTarget::create("/abastecimentos"));

    let state = capture.select(fixtures::not_an_image()).await.clone();
    match &state {
        CaptureState::Failed {
            error_code,
            suggested_action,
            can_retry,
            ..
        } => {
            assert_eq!(*error_code, "DECODE_ERROR");
            assert!(!can_retry);
            assert_eq!(*suggested_action, Some("Choose a different photo"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert!(capture.preview_url().is_none());
    assert!(capture.normalized_image().is_none());
    assert_eq!(harness.context.previews().live_count(), 0);

    // Nothing to confirm: the call is rejected and the state stays put
    assert_eq!(capture.confirm().await, &state);
    assert!(harness.events().is_empty());
}

#[tokio::test]
async fn test_storage_failure_stops_before_submission() {
    let harness = TestHarness::new();
    harness.storage.reject_uploads("Bucket not found");

    let mut capture = harness
        .context
        .capture(fixtures::maintenance_order(), SubmitTarget::create("/ordens-servico"));
    capture.select(fixtures::screenshot(800, 600)).await;

    match capture.confirm().await {
        CaptureState::Failed {
            message,
            error_code,
            suggested_action,
            can_retry,
        } => {
            assert_eq!(message, "Bucket not found");
            assert_eq!(*error_code, "STORAGE_ERROR");
            assert_eq!(*suggested_action, Some("Confirm again to retry the upload"));
            assert!(*can_retry);
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert!(harness.submissions().is_empty());
    assert_eq!(harness.storage.object_count(), 0);

    // Confirming again retries the whole upload under a fresh key
    harness.storage.accept_uploads();
    assert!(matches!(
        capture.confirm().await,
        CaptureState::Succeeded { .. }
    ));

    let events = harness.events();
    let keys = uploaded_keys(&events);
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("public/manutencoes-"));
    match &events[1] {
        Event::Submit { body, .. } => {
            assert_eq!(
                body["fotoComprovanteUrl"],
                json!(format!("{}/{}", PUBLIC_BASE_URL, keys[0]))
            );
        }
        other => panic!("expected submission, got {:?}", other),
    }
}

#[tokio::test]
async fn test_storage_failure_without_message_is_generic() {
    let harness = TestHarness::new();
    harness.storage.reject_uploads("");

    let mut capture = harness
        .context
        .capture(fixtures::refueling(), SubmitTarget::create("/abastecimentos"));
    capture.select(fixtures::screenshot(300, 200)).await;

    match capture.confirm().await {
        CaptureState::Failed { message, .. } => {
            assert_eq!(message, fleet_core::error::GENERIC_STORAGE_MESSAGE)
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_backend_rejection_keeps_server_message() {
    let harness = TestHarness::new();
    harness.submitter.reply_with(Reply::Reject {
        status: Some(422),
        message: Some("Veículo inativo".to_string()),
    });

    let mut capture = harness
        .context
        .capture(fixtures::refueling(), SubmitTarget::create("/abastecimentos"));
    capture.select(fixtures::camera_photo(640, 480)).await;

    match capture.confirm().await {
        CaptureState::Failed {
            message, can_retry, ..
        } => {
            assert_eq!(message, "Veículo inativo");
            assert!(*can_retry);
        }
        other => panic!("expected Failed, got {:?}", other),
    }

    // A retry uploads again; the first object is left behind
    harness.submitter.reply_with(Reply::Reject {
        status: Some(500),
        message: None,
    });
    match capture.confirm().await {
        CaptureState::Failed { message, .. } => {
            assert_eq!(message, fleet_core::error::GENERIC_SUBMISSION_MESSAGE)
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(harness.storage.object_count(), 2);
}

#[tokio::test]
async fn test_every_submission_follows_its_upload() {
    let harness = TestHarness::new();
    harness.submitter.reply_with(Reply::Reject {
        status: Some(400),
        message: Some("km inválido".to_string()),
    });

    let mut capture = harness
        .context
        .capture(fixtures::refueling(), SubmitTarget::create("/abastecimentos"));

    // Confirming before a photo is selected does nothing
    assert_eq!(capture.confirm().await, &CaptureState::Idle);
    assert!(harness.events().is_empty());

    capture.select(fixtures::camera_photo(320, 240)).await;
    capture.confirm().await;
    capture.confirm().await;

    let events = harness.events();
    assert_eq!(events.len(), 4);
    let mut last_upload: Option<String> = None;
    for event in events {
        match event {
            Event::Upload { key } => last_upload = Some(key),
            Event::Submit { body, .. } => {
                let key = last_upload.take().expect("submission without a prior upload");
                assert_eq!(
                    body["fotoNotaFiscalUrl"],
                    json!(format!("{}/{}", PUBLIC_BASE_URL, key))
                );
            }
        }
    }
}

#[tokio::test]
async fn test_trip_end_update_substitutes_record_id() {
    let harness = TestHarness::new();
    let mut capture = harness.context.capture(
        fixtures::trip_end(),
        SubmitTarget::update("/jornadas/{id}/finalizar", Some("42".to_string())),
    );

    capture.select(fixtures::camera_photo(3000, 4000)).await;
    assert!(matches!(
        capture.state(),
        CaptureState::ReadyToConfirm {
            width: 1200,
            height: 1600,
            ..
        }
    ));
    assert!(matches!(
        capture.confirm().await,
        CaptureState::Succeeded { .. }
    ));

    let submissions = harness.submissions();
    match &submissions[0] {
        Event::Submit { method, path, body } => {
            assert_eq!(*method, SubmitMethod::Update);
            assert_eq!(path, "/jornadas/42/finalizar");
            assert!(body["fotoFimUrl"]
                .as_str()
                .unwrap()
                .starts_with(&format!("{}/public/geral-", PUBLIC_BASE_URL)));
            assert_eq!(body["jornadaFantasma"], json!(false));
            assert_eq!(body["kmFim"], json!(48390.0));
        }
        other => panic!("expected submission, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_without_record_id_uploads_nothing() {
    let harness = TestHarness::new();
    let mut capture = harness.context.capture(
        fixtures::trip_end(),
        SubmitTarget::update("/jornadas/:id/finalizar", None),
    );

    capture.select(fixtures::camera_photo(100, 100)).await;
    match capture.confirm().await {
        CaptureState::Failed {
            error_code,
            can_retry,
            ..
        } => {
            assert_eq!(*error_code, "INVALID_INPUT");
            assert!(!can_retry);
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert!(harness.events().is_empty());
}

#[tokio::test]
async fn test_succeeded_is_single_shot() {
    let harness = TestHarness::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut capture = harness
        .context
        .capture(fixtures::refueling(), SubmitTarget::create("/abastecimentos"))
        .on_success(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    capture.select(fixtures::camera_photo(200, 100)).await;
    capture.confirm().await;
    assert!(capture.state().is_terminal());

    capture.select(fixtures::camera_photo(50, 50)).await;
    capture.confirm().await;

    assert!(capture.state().is_terminal());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.submissions().len(), 1);
}

#[tokio::test]
async fn test_previews_are_released() {
    let harness = TestHarness::new();
    let previews = harness.context.previews().clone();

    let mut capture = harness
        .context
        .capture(fixtures::refueling(), SubmitTarget::create("/abastecimentos"));

    capture.select(fixtures::camera_photo(400, 300)).await;
    let first = capture.preview_url().unwrap();

    capture.select(fixtures::screenshot(300, 400)).await;
    let second = capture.preview_url().unwrap();
    assert_ne!(first, second);
    assert!(previews.resolve(&first).is_none());
    assert!(previews.resolve(&second).is_some());
    assert_eq!(previews.live_count(), 1);

    // A failed selection clears the previous preview as well
    capture.select(fixtures::not_an_image()).await;
    assert!(previews.resolve(&second).is_none());
    assert_eq!(previews.live_count(), 0);

    capture.select(fixtures::camera_photo(400, 300)).await;
    assert_eq!(previews.live_count(), 1);
    drop(capture);
    assert_eq!(previews.live_count(), 0);

    let mut abandoned = harness
        .context
        .capture(fixtures::maintenance_order(), SubmitTarget::create("/ordens-servico"));
    abandoned.select(fixtures::camera_photo(400, 300)).await;
    assert_eq!(previews.live_count(), 1);
    abandoned.abandon();
    assert_eq!(previews.live_count(), 0);
    assert!(harness.events().is_empty());
}

#[tokio::test]
async fn test_legacy_endpoint_inference_picks_photo_field() {
    let harness = TestHarness::new();
    let endpoint = "/api/ordens-servico";
    let kind = EvidenceKind::infer(endpoint, SubmitMethod::Create);
    assert_eq!(kind, EvidenceKind::MaintenanceOrder);

    let payload = fleet_core::EvidencePayload::from_json(
        kind,
        json!({
            "veiculoId": 3,
            "fornecedorId": 8,
            "descricao": "Alinhamento",
            "valorTotal": 120.0
        }),
    )
    .unwrap();

    let mut capture = harness
        .context
        .capture(payload, SubmitTarget::create(endpoint));
    capture.select(fixtures::camera_photo(100, 80)).await;
    capture.confirm().await;

    match &harness.submissions()[0] {
        Event::Submit { body, .. } => {
            assert!(body.get(kind.photo_field()).is_some());
            assert!(body.get("fotoNotaFiscalUrl").is_none());
        }
        other => panic!("expected submission, got {:?}", other),
    }
}
