// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use outpost_registry::Registry;
use outpost_shims::FakeShims;

fn init(pipeline: &BuildIdPipeline, registry: &Registry, shims: Arc<FakeShims>) {
    registry.register("shims", shims as Arc<dyn Shims>);
    pipeline
        .initialize(registry, Path::new("/project"), &ParamBag::builder().build())
        .expect("initialize should succeed");
}

#[tokio::test]
async fn generates_fresh_id_when_none_persisted() {
    let registry = Registry::new();
    let shims = Arc::new(FakeShims::new());
    let pipeline = BuildIdPipeline::new();
    init(&pipeline, &registry, shims.clone());

    let bag = ParamBag::builder().str("today", "240102").build();
    pipeline.execute(&bag).await.expect("execute should succeed");

    let persisted = shims.read_file(Path::new("/project/.windsor/.build-id")).unwrap();
    let id = BuildId::parse(&String::from_utf8_lossy(&persisted)).unwrap();
    assert_eq!(id.date, "240102");
    assert_eq!(id.counter, 1);
}

#[tokio::test]
async fn increments_counter_on_same_date() {
    let registry = Registry::new();
    let shims = Arc::new(FakeShims::new());
    shims.seed_file("/project/.windsor/.build-id", "240101.123.4");
    let pipeline = BuildIdPipeline::new();
    init(&pipeline, &registry, shims.clone());

    let bag = ParamBag::builder().str("today", "240101").build();
    pipeline.execute(&bag).await.expect("execute should succeed");

    let persisted = shims.read_file(Path::new("/project/.windsor/.build-id")).unwrap();
    assert_eq!(String::from_utf8_lossy(&persisted), "240101.123.5");
}

#[tokio::test]
async fn resets_on_stale_date() {
    let registry = Registry::new();
    let shims = Arc::new(FakeShims::new());
    shims.seed_file("/project/.windsor/.build-id", "240101.123.4");
    let pipeline = BuildIdPipeline::new();
    init(&pipeline, &registry, shims.clone());

    let bag = ParamBag::builder().str("today", "240102").build();
    pipeline.execute(&bag).await.expect("execute should succeed");

    let persisted = shims.read_file(Path::new("/project/.windsor/.build-id")).unwrap();
    let id = BuildId::parse(&String::from_utf8_lossy(&persisted)).unwrap();
    assert_eq!(id.date, "240102");
    assert_eq!(id.counter, 1);
}

#[tokio::test]
async fn new_flag_forces_regeneration_even_with_fresh_id() {
    let registry = Registry::new();
    let shims = Arc::new(FakeShims::new());
    shims.seed_file("/project/.windsor/.build-id", "240101.123.4");
    let pipeline = BuildIdPipeline::new();
    init(&pipeline, &registry, shims.clone());

    let bag = ParamBag::builder()
        .str("today", "240101")
        .bool("new", true)
        .build();
    pipeline.execute(&bag).await.expect("execute should succeed");

    let persisted = shims.read_file(Path::new("/project/.windsor/.build-id")).unwrap();
    let id = BuildId::parse(&String::from_utf8_lossy(&persisted)).unwrap();
    assert_eq!(id.counter, 1);
}

#[tokio::test]
async fn malformed_existing_id_fails() {
    let registry = Registry::new();
    let shims = Arc::new(FakeShims::new());
    shims.seed_file("/project/.windsor/.build-id", "not-a-build-id");
    let pipeline = BuildIdPipeline::new();
    init(&pipeline, &registry, shims.clone());

    let bag = ParamBag::builder().str("today", "240101").build();
    let err = pipeline.execute(&bag).await.expect_err("should fail");
    assert!(matches!(err, PipelineError::InvalidFormat(_)));
}
