//! Session Tests
//!
//! Layer stack behavior through gated sessions, and persistence of
//! sessions to disk.

use std::sync::Arc;

use indexlab::access::{Access, Permission, User};
use indexlab::formula::Operation;
use indexlab::indices::IndexRequest;
use indexlab::layers::{LayerKind, LayerSpec};
use indexlab::session::AnalysisSession;
use indexlab::{AppConfig, IndexLabError, Runtime};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn runtime() -> Runtime {
    AppConfig::default().build().unwrap()
}

fn analyst(runtime: &Runtime) -> User {
    runtime
        .users
        .find_by_email("analista@semillero.cl")
        .unwrap()
        .clone()
}

fn client(runtime: &Runtime) -> User {
    runtime
        .users
        .find_by_email("ricardo@torres.cl")
        .unwrap()
        .clone()
}

// === Layer Stack Scenarios ===

#[test]
fn test_add_then_remove_twice() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    let spec = LayerSpec::index("NDVI-2025-08-20", "(B8 - B4) / (B8 + B4)");
    let layer = session
        .add_layer(Some(&user), spec)
        .unwrap()
        .granted()
        .unwrap();
    assert_eq!(layer.id, 1);
    assert_eq!(layer.kind, LayerKind::Index);
    assert!(layer.visible);
    assert_eq!(session.list_layers().len(), 1);

    session.remove_layer(Some(&user), 1).unwrap();
    assert!(session.list_layers().is_empty());

    let second = session.remove_layer(Some(&user), 1);
    assert!(matches!(second, Err(IndexLabError::LayerNotFound { id: 1 })));
}

#[test]
fn test_ids_strictly_increase() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    let mut max_id = 0;
    for name in ["NDVI", "NDWI", "MSAVI", "SAVI", "EVI", "NDMI"] {
        let before = session.list_layers().len();
        let layer = session
            .add_index(Some(&user), name)
            .unwrap()
            .granted()
            .unwrap();
        assert_eq!(session.list_layers().len(), before + 1);
        assert!(layer.id > max_id);
        max_id = layer.id;

        if layer.id % 2 == 0 {
            session.remove_layer(Some(&user), layer.id).unwrap();
        }
    }

    let ids: Vec<u64> = session.list_layers().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![1, 3, 5]);
}

#[test]
fn test_invalid_formula_leaves_stack_unchanged() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    let result = session.add_layer(Some(&user), LayerSpec::index("Broken", "(B8 - B99"));
    match result {
        Err(IndexLabError::InvalidFormula { errors }) => {
            let codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
            assert_eq!(codes, vec!["UNKNOWN_BAND", "UNBALANCED_PARENTHESES"]);
        }
        other => panic!("expected InvalidFormula, got {:?}", other),
    }
    assert!(session.list_layers().is_empty());
    assert_eq!(session.stack().next_id(), 1);
}

#[test]
fn test_index_layer_without_formula_rejected() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    let mut spec = LayerSpec::raster("Composite");
    spec.kind = LayerKind::Index;
    let result = session.add_layer(Some(&user), spec);
    assert!(matches!(result, Err(IndexLabError::InvalidSpec { .. })));
}

#[test]
fn test_unknown_color_ramp_rejected() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    let spec = LayerSpec::index("NDVI", "(B8 - B4) / (B8 + B4)").with_color_ramp("Rainbow");
    let result = session.add_layer(Some(&user), spec);
    assert!(matches!(result, Err(IndexLabError::UnknownColorRamp { .. })));
}

#[test]
fn test_toggle_twice_restores_visibility() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    session
        .add_layer(Some(&user), LayerSpec::raster("True Color"))
        .unwrap();
    let hidden = session
        .toggle_visibility(Some(&user), 1)
        .unwrap()
        .granted()
        .unwrap();
    assert!(!hidden.visible);
    let shown = session
        .toggle_visibility(Some(&user), 1)
        .unwrap()
        .granted()
        .unwrap();
    assert!(shown.visible);

    let missing = session.toggle_visibility(Some(&user), 42);
    assert!(matches!(missing, Err(IndexLabError::LayerNotFound { id: 42 })));
}

#[test]
fn test_list_layers_is_a_snapshot() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    session
        .add_layer(Some(&user), LayerSpec::raster("True Color"))
        .unwrap();
    let mut snapshot = session.list_layers();
    snapshot[0].visible = false;
    snapshot.clear();

    assert_eq!(session.list_layers().len(), 1);
    assert!(session.list_layers()[0].visible);
}

#[test]
fn test_build_custom_index() {
    let runtime = runtime();
    let user = analyst(&runtime);
    let mut session = runtime.new_session();

    let request = IndexRequest::new("Red edge", Operation::NormalizedDifference)
        .with_bands("B8A", "B5")
        .with_color_ramp("vegetation");
    let layer = session
        .build_index(Some(&user), request)
        .unwrap()
        .granted()
        .unwrap();
    assert_eq!(layer.formula.as_deref(), Some("(B8A - B5) / (B8A + B5)"));
    assert_eq!(layer.color_ramp.as_deref(), Some("vegetation"));

    let custom = IndexRequest::new("Bad", Operation::Custom("B8 ** B4 ^ 2".to_string()));
    let result = session.build_index(Some(&user), custom);
    assert!(matches!(result, Err(IndexLabError::InvalidFormula { .. })));
}

// === Gating ===

#[test]
fn test_client_cannot_mutate() {
    let runtime = runtime();
    let analyst = analyst(&runtime);
    let client = client(&runtime);
    let mut session = runtime.new_session();
    session
        .add_layer(Some(&analyst), LayerSpec::raster("True Color"))
        .unwrap();

    let outcomes = vec![
        session
            .add_layer(Some(&client), LayerSpec::raster("Other"))
            .unwrap(),
        session.add_index(Some(&client), "NDVI").unwrap(),
        session
            .build_index(
                Some(&client),
                IndexRequest::new("r", Operation::Ratio).with_bands("B8", "B4"),
            )
            .unwrap(),
        session.toggle_visibility(Some(&client), 1).unwrap(),
        session.remove_layer(Some(&client), 1).unwrap(),
    ];
    for outcome in outcomes {
        assert_eq!(
            outcome,
            Access::Restricted {
                permission: Permission::CreateAnalysis
            }
        );
    }

    let layers = session.list_layers();
    assert_eq!(layers.len(), 1);
    assert!(layers[0].visible);
    assert_eq!(session.stack().next_id(), 2);
}

#[test]
fn test_admin_can_edit_layers() {
    let runtime = runtime();
    let admin = runtime
        .users
        .find_by_email("admin@semillero.cl")
        .unwrap()
        .clone();
    let mut session = runtime.new_session();
    let outcome = session.add_index(Some(&admin), "NDMI").unwrap();
    assert!(outcome.is_granted());
}

// === Persistence ===

#[test]
fn test_persisted_counter_prevents_id_reuse() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analysis.json");
    let runtime = runtime();
    let user = analyst(&runtime);

    let mut session = runtime.new_session();
    session.add_index(Some(&user), "NDVI").unwrap();
    session.add_index(Some(&user), "EVI").unwrap();
    session.remove_layer(Some(&user), 2).unwrap();
    session.save(&path).unwrap();

    let mut loaded = AnalysisSession::load(
        &path,
        Arc::clone(&runtime.catalogs),
        Arc::clone(&runtime.access),
    )
    .unwrap();
    assert_eq!(loaded.list_layers(), session.list_layers());
    assert_eq!(loaded.created_at(), session.created_at());

    let layer = loaded
        .add_index(Some(&user), "NDWI")
        .unwrap()
        .granted()
        .unwrap();
    assert_eq!(layer.id, 3);
}

#[test]
fn test_restricted_session_is_not_modified_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analysis.json");
    let runtime = runtime();

    runtime.new_session().save(&path).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let mut loaded = AnalysisSession::load(
        &path,
        Arc::clone(&runtime.catalogs),
        Arc::clone(&runtime.access),
    )
    .unwrap();
    let outcome = loaded.add_index(Some(&client(&runtime)), "NDVI").unwrap();
    assert!(!outcome.is_granted());

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_session_rejected_by_smaller_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analysis.json");
    let runtime = runtime();
    let user = analyst(&runtime);

    let mut session = runtime.new_session();
    session.add_index(Some(&user), "NDMI").unwrap();
    session.save(&path).unwrap();

    // A deployment without B11 cannot host an NDMI layer
    let mut config = AppConfig::default();
    config.bands.retain(|b| b.id != "B11");
    config.indices.retain(|i| !i.bands_used.iter().any(|b| b == "B11"));
    let narrow = config.build().unwrap();

    let result = AnalysisSession::load(
        &path,
        Arc::clone(&narrow.catalogs),
        Arc::clone(&narrow.access),
    );
    assert!(matches!(result, Err(IndexLabError::SessionCorrupted { .. })));
}
