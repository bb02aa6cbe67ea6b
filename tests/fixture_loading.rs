//! Integration tests for loading building fixtures from TOML.

use std::path::PathBuf;

use facade_layout::model::{
    BayId, BaySize, BuildingConfig, ExpandPreference, FaceId, LayerId, RepeatMax, TextureFlow,
};
use facade_layout::{layout_report, resolve_face_minimum_width, ConfigError, EngineConfig};
use pretty_assertions::assert_eq;

const TOLERANCE: f64 = 1e-9;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn load_fixture() -> BuildingConfig {
    BuildingConfig::from_file(&fixture_path("two_storey.toml")).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_fixture_structure() {
    let building = load_fixture();
    assert_eq!(building.layers.len(), 2);
    assert_eq!(building.windows.width_of("casement"), Some(1.2));
    assert_eq!(building.windows.get("picture").unwrap().label, "Picture window");

    let ground = &building.layers[0];
    assert_eq!(ground.footprint.edge_lengths(), [12.0, 8.0, 12.0, 8.0]);
    assert_eq!(ground.locks.master_of(FaceId::C), Some(FaceId::A));

    let a = ground.facade(FaceId::A).unwrap();
    assert_eq!(a.bays.len(), 3);
    assert_eq!(a.bays[0].size, BaySize::Fixed { width: 2.0 });
    assert_eq!(a.bays[2].link_from, Some(BayId::from("a2")));
    assert_eq!(a.groups.len(), 1);
    assert_eq!(a.groups[0].repeat.min, 2);
    assert_eq!(a.groups[0].repeat.max, RepeatMax::Auto);

    let b1 = &ground.facade(FaceId::B).unwrap().bays[0];
    assert_eq!(
        b1.size,
        BaySize::Range {
            min: 1.5,
            max: Some(4.0)
        }
    );
    assert_eq!(b1.expand_preference, ExpandPreference::PreferExpand);

    // Faces left out of the file still get an empty facade
    let upper = &building.layers[1];
    assert!(upper.facade(FaceId::A).unwrap().bays.is_empty());
    assert_eq!(
        upper.facade(FaceId::D).unwrap().bays[1].texture_flow,
        TextureFlow::Restart
    );
}

#[test]
fn test_fixture_face_minimums() {
    let building = load_fixture();
    let ground = LayerId::from("ground");
    let upper = LayerId::from("upper");

    // entry 2.0 + a2 (window 1.2 + padding 0.4) + a3 mirroring a2, plus one extra repeat of a2+a3
    assert_close(resolve_face_minimum_width(&building, &ground, FaceId::A), 8.4);
    assert_close(resolve_face_minimum_width(&building, &ground, FaceId::C), 8.4);
    assert_close(resolve_face_minimum_width(&building, &ground, FaceId::B), 1.5);
    assert_close(resolve_face_minimum_width(&building, &ground, FaceId::D), 1.0);
    assert_close(resolve_face_minimum_width(&building, &upper, FaceId::D), 3.0);
}

#[test]
fn test_fixture_report() {
    let building = load_fixture();
    let report = layout_report(&building, &LayerId::from("ground"), &[]).unwrap();
    insta::assert_snapshot!(report.to_string(), @r"
    layer ground  area 96.00 m2  valid
      A  length  12.00  min   8.40  bays 3  groups 1
      B  length   8.00  min   1.50  bays 1  groups 0
      C  length  12.00  min   8.40  bays 3  groups 1  (locked to A)
      D  length   8.00  min   1.00  bays 0  groups 0
    ");
}

#[test]
fn test_engine_overrides_keep_other_defaults() {
    let building = BuildingConfig::from_toml_str(
        r#"
        [engine]
        absolute_min_width = 0.5
        bisection_iterations = 30
        "#,
    )
    .unwrap();

    let expected = EngineConfig::default()
        .with_absolute_min_width(0.5)
        .with_bisection_iterations(30);
    assert_eq!(building.engine, expected);
    assert!(building.layers.is_empty());
}

#[test]
fn test_invalid_groups_are_dropped_on_load() {
    let building = BuildingConfig::from_toml_str(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [[layers.facades.A.bays]]
        id = "a"
        [[layers.facades.A.bays]]
        id = "b"
        [[layers.facades.A.bays]]
        id = "c"

        [[layers.facades.A.groups]]
        id = "gap"
        bays = ["a", "c"]

        [[layers.facades.A.groups]]
        id = "kept"
        bays = ["c", "b"]
        "#,
    )
    .unwrap();

    let a = building.layers[0].facade(FaceId::A).unwrap();
    assert_eq!(a.groups.len(), 1);
    assert_eq!(a.groups[0].id.as_str(), "kept");
    assert_eq!(a.groups[0].bays, vec![BayId::from("b"), BayId::from("c")]);
}

#[test]
fn test_duplicate_bay_ids_rejected() {
    let err = BuildingConfig::from_toml_str(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [[layers.facades.B.bays]]
        id = "twin"
        [[layers.facades.B.bays]]
        id = "twin"
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert_eq!(
        err.to_string(),
        "invalid building: duplicate bay id 'twin' on layer 'ground' face B"
    );
}

#[test]
fn test_duplicate_layers_rejected() {
    let err = BuildingConfig::from_toml_str(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
        "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate floor layer 'ground'"));
}

#[test]
fn test_bad_repeat_keyword_is_reported_with_source() {
    let source = r#"
[[layers]]
id = "ground"
footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

[[layers.facades.A.bays]]
id = "a"
[[layers.facades.A.bays]]
id = "b"

[[layers.facades.A.groups]]
id = "g"
bays = ["a", "b"]
repeat = { min = 1, max = "many" }
"#;
    let err = BuildingConfig::from_toml_str(source).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.span().is_some());

    let rendered = err.format(source, "broken.toml");
    assert!(rendered.contains("broken.toml"));
    assert!(rendered.contains("expected a repeat count or \"auto\""));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = BuildingConfig::from_file(&fixture_path("does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

fn invalid_message(source: &str) -> String {
    match BuildingConfig::from_toml_str(source) {
        Err(err @ ConfigError::Invalid { .. }) => err.to_string(),
        other => panic!("expected an invalid-building error, got {:?}", other),
    }
}

#[test]
fn test_self_intersecting_footprint_rejected() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 10.0], [10.0, 0.0], [0.0, 10.0]]
        "#,
    );
    assert_eq!(
        message,
        "invalid building: footprint of layer 'ground' is invalid: outline intersects itself"
    );
}

#[test]
fn test_flat_footprint_rejected() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [4.0, 0.0], [8.0, 0.0], [2.0, 0.0]]
        "#,
    );
    assert!(message.starts_with("invalid building: footprint of layer 'ground' is invalid"));
}

#[test]
fn test_face_shorter_than_its_bays_rejected() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [4.0, 0.0], [4.0, 6.0], [0.0, 6.0]]

        [[layers.facades.A.bays]]
        id = "a1"
        size = { mode = "fixed", width = 5.0 }
        "#,
    );
    assert_eq!(
        message,
        "invalid building: footprint of layer 'ground' is invalid: \
         face A is 4.000 m, below its 5.000 m minimum"
    );
}

#[test]
fn test_face_shorter_than_locked_master_rejected() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 6.0], [0.0, 6.0]]

        [layers.locks]
        B = "A"

        [[layers.facades.A.bays]]
        id = "a1"
        size = { mode = "fixed", width = 8.0 }
        "#,
    );
    assert!(message.contains("face B is 6.000 m, below its 8.000 m minimum"));
}

#[test]
fn test_self_link_rejected_on_load() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [[layers.facades.A.bays]]
        id = "a"
        link_from = "a"
        "#,
    );
    assert_eq!(
        message,
        "invalid building: bay 'a' on layer 'ground' face A links to itself"
    );
}

#[test]
fn test_link_cycle_rejected_on_load() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [[layers.facades.C.bays]]
        id = "a"
        link_from = "c"
        [[layers.facades.C.bays]]
        id = "b"
        link_from = "a"
        [[layers.facades.C.bays]]
        id = "c"
        link_from = "b"
        "#,
    );
    assert_eq!(
        message,
        "invalid building: bay links on layer 'ground' face C form a cycle through 'a'"
    );
}

#[test]
fn test_dangling_link_rejected_on_load() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [[layers.facades.A.bays]]
        id = "a"
        link_from = "gone"
        "#,
    );
    assert!(message.contains("links to unknown bay 'gone'"));
}

#[test]
fn test_zero_repeat_minimum_rejected() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [[layers.facades.A.bays]]
        id = "a"
        [[layers.facades.A.bays]]
        id = "b"

        [[layers.facades.A.groups]]
        id = "g"
        bays = ["a", "b"]
        repeat = { min = 0 }
        "#,
    );
    assert_eq!(
        message,
        "invalid building: group 'g' on layer 'ground' face A must repeat at least once"
    );
}

#[test]
fn test_repeat_maximum_below_minimum_rejected() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [[layers.facades.A.bays]]
        id = "a"
        [[layers.facades.A.bays]]
        id = "b"

        [[layers.facades.A.groups]]
        id = "g"
        bays = ["a", "b"]
        repeat = { min = 3, max = 2 }
        "#,
    );
    assert!(message.contains("maximum repeats 2 below minimum 3"));
}

#[test]
fn test_self_lock_rejected_on_load() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [layers.locks]
        B = "B"
        "#,
    );
    assert_eq!(
        message,
        "invalid building: face B of layer 'ground' is locked to itself"
    );
}

#[test]
fn test_lock_cycle_rejected_on_load() {
    let message = invalid_message(
        r#"
        [[layers]]
        id = "ground"
        footprint = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]

        [layers.locks]
        A = "C"
        C = "A"
        "#,
    );
    assert_eq!(
        message,
        "invalid building: face locks of layer 'ground' form a cycle through face A"
    );
}
