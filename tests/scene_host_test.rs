use std::collections::HashSet;

use cgmath::{Point3, Vector3};
use instant::Duration;
use shelf_ngin::{
    Color3, ReadyState, SceneConfig, SceneHost, SceneManager, Shape,
    host::{GROUND_TILE_Y, GROUND_TILE_Z, GROUND_TILES, SHELF_COLUMNS},
};

use crate::common::test_utils::{Call, Recorder, RecordingBackend, RecordingWindow};

mod common;

type TestHost = SceneHost<RecordingBackend, RecordingWindow>;

fn new_host(recorder: &Recorder, ready_state: ReadyState, config: SceneConfig) -> (TestHost, RecordingWindow) {
    let window = RecordingWindow::new(recorder, ready_state);
    let manager = SceneManager::new(window.clone(), config);
    (SceneHost::new(manager), window)
}

fn is_box(call: &Call) -> bool {
    matches!(call, Call::Mesh(mesh) if matches!(mesh.shape, Shape::Box { .. }))
}

fn is_ground(call: &Call) -> bool {
    matches!(call, Call::Mesh(mesh) if matches!(mesh.shape, Shape::Ground { .. }))
}

#[tokio::test]
async fn init_builds_the_whole_shelf_in_order() {
    let recorder = Recorder::new();
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls[0], Call::Attach);
    assert!(matches!(&calls[1], Call::Camera(camera) if camera.name == "camera1"));
    assert!(matches!(&calls[2], Call::Light(light) if light.name == "light1"));
    assert!(is_ground(&calls[3]), "{:?}", calls[3]);
    assert_eq!(calls[4], Call::ResizeListener);
    assert!(calls[5..221].iter().all(is_box));
    assert!(calls[221..].iter().all(is_ground));

    assert_eq!(recorder.count(|c| *c == Call::Attach), 1);
    assert_eq!(recorder.count(is_box), 216);
    // Main plane plus the tile row.
    assert_eq!(recorder.count(is_ground), 1 + 7);
    assert_eq!(host.manager().scene().len(), 224);
    assert!(host.manager().is_rendering());
}

#[tokio::test]
async fn scene_defaults() {
    let recorder = Recorder::new();
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();

    let scene = host.manager().scene();
    let camera = scene.camera().unwrap();
    assert_eq!(camera.position, Point3::new(0.0, 25.0, 0.0));
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));

    let light = scene.light().unwrap();
    assert_eq!(light.direction, Vector3::unit_y());
    assert_eq!(light.intensity, 0.5);

    let plane = &scene.meshes()[0];
    assert_eq!(
        plane.shape,
        Shape::Ground {
            width: 15.0,
            height: 20.0
        }
    );
    assert_eq!(plane.position, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(plane.material.diffuse, Color3::WHITE);
}

#[tokio::test]
async fn boxes_and_tiles_land_on_their_coordinates() {
    let recorder = Recorder::new();
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();

    let meshes = recorder.meshes();
    let boxes: Vec<_> = meshes
        .iter()
        .filter(|m| matches!(m.shape, Shape::Box { .. }))
        .collect();

    let mut expected = Vec::new();
    for level in 0..4 {
        for row in 0..9 {
            for x in SHELF_COLUMNS {
                expected.push(Vector3::new(x, 0.5 + level as f32, -4.0 + row as f32));
            }
        }
    }
    let positions: Vec<_> = boxes.iter().map(|m| m.position).collect();
    assert_eq!(positions, expected);

    for b in &boxes {
        assert_eq!(
            b.shape,
            Shape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0
            }
        );
        let Color3 { r, g, b: blue } = b.material.diffuse;
        for channel in [r, g, blue] {
            assert!((0.0..1.0).contains(&channel));
        }
    }

    let tiles: Vec<_> = meshes
        .iter()
        .filter(|m| matches!(m.shape, Shape::Ground { .. }))
        .skip(1)
        .collect();
    assert_eq!(tiles.len(), GROUND_TILES.len());
    for (tile, x) in tiles.iter().zip(GROUND_TILES) {
        assert_eq!(tile.position, Vector3::new(x, GROUND_TILE_Y, GROUND_TILE_Z));
        assert_eq!(
            tile.shape,
            Shape::Ground {
                width: 1.0,
                height: 1.0
            }
        );
        assert_eq!(tile.material.diffuse, Color3::BLUE);
    }
}

#[tokio::test]
async fn mesh_names_never_collide() {
    let recorder = Recorder::new();
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();

    let meshes = host.manager().scene().meshes();
    let names: HashSet<_> = meshes.iter().map(|m| m.name.as_str()).collect();
    let materials: HashSet<_> = meshes.iter().map(|m| m.material.name.as_str()).collect();
    assert_eq!(names.len(), meshes.len());
    assert_eq!(materials.len(), meshes.len());
}

#[tokio::test]
async fn render_loop_waits_for_the_document() {
    let recorder = Recorder::new();
    let (mut host, window) = new_host(&recorder, ReadyState::Loading, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();

    assert_eq!(recorder.count(|c| *c == Call::ContentLoadedListener), 1);
    assert!(!host.manager().is_rendering());

    host.frame(Duration::from_millis(16)).unwrap();
    assert_eq!(recorder.count(|c| *c == Call::Render), 0);

    window.fire_content_loaded();
    assert!(host.manager().is_rendering());
    for _ in 0..3 {
        host.frame(Duration::from_millis(16)).unwrap();
    }
    assert_eq!(recorder.count(|c| *c == Call::Render), 3);
}

#[tokio::test]
async fn ready_document_renders_right_away() {
    let recorder = Recorder::new();
    let (mut host, _window) = new_host(&recorder, ReadyState::Interactive, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();

    assert_eq!(recorder.count(|c| *c == Call::ContentLoadedListener), 0);
    recorder.clear();
    host.frame(Duration::from_millis(16)).unwrap();
    assert_eq!(recorder.calls(), vec![Call::Render]);
}

#[tokio::test]
async fn window_resize_reaches_the_engine() {
    let recorder = Recorder::new();
    let (mut host, window) = new_host(&recorder, ReadyState::Complete, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();
    recorder.clear();

    window.fire_resize();
    window.fire_resize();
    host.frame(Duration::from_millis(16)).unwrap();
    // Both events collapse into a single resize before the frame is drawn.
    assert_eq!(recorder.calls(), vec![Call::Resize, Call::Render]);

    recorder.clear();
    host.frame(Duration::from_millis(16)).unwrap();
    assert_eq!(recorder.calls(), vec![Call::Render]);
}

#[tokio::test]
async fn world_axis_is_opt_in() {
    let recorder = Recorder::new();
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, SceneConfig::default());
    host.init(recorder.clone()).await.unwrap();
    assert_eq!(
        recorder.count(|c| matches!(c, Call::Mesh(m) if matches!(m.shape, Shape::Lines { .. }))),
        0
    );

    let recorder = Recorder::new();
    let config = SceneConfig::default().with_world_axis(5.0);
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, config);
    host.init(recorder.clone()).await.unwrap();

    let lines: Vec<_> = recorder
        .meshes()
        .into_iter()
        .filter(|m| matches!(m.shape, Shape::Lines { .. }))
        .collect();
    assert_eq!(lines.len(), 6);
    for prefix in ["axisX", "labelX", "axisY", "labelY", "axisZ", "labelZ"] {
        assert!(
            lines.iter().any(|m| m.name.starts_with(prefix)),
            "missing {}",
            prefix
        );
    }
}

#[tokio::test]
async fn seeded_scenes_share_colours() {
    let colours = |seed| async move {
        let recorder = Recorder::new();
        let config = SceneConfig::default().with_seed(seed);
        let (mut host, _window) = new_host(&recorder, ReadyState::Complete, config);
        host.init(recorder.clone()).await.unwrap();
        host.manager()
            .scene()
            .meshes()
            .iter()
            .map(|m| m.material.diffuse)
            .collect::<Vec<_>>()
    };
    assert_eq!(colours(7).await, colours(7).await);
    assert_ne!(colours(7).await, colours(8).await);
}

#[tokio::test]
async fn failed_attach_leaves_nothing_behind() {
    let recorder = Recorder::refusing();
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, SceneConfig::default());
    let err = host.init(recorder.clone()).await.unwrap_err();
    assert!(err.to_string().contains("no graphics adapter"));

    assert!(recorder.calls().is_empty());
    assert!(host.manager().scene().is_empty());
    host.frame(Duration::from_millis(16)).unwrap();
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn configured_light_and_ground_reach_the_scene() {
    let recorder = Recorder::new();
    let config = SceneConfig::default()
        .with_light_intensity(0.8)
        .with_ground_size(30.0, 40.0);
    let (mut host, _window) = new_host(&recorder, ReadyState::Complete, config);
    host.init(recorder.clone()).await.unwrap();

    let calls = recorder.calls();
    assert!(matches!(&calls[2], Call::Light(light) if light.intensity == 0.8));
    let plane = &recorder.meshes()[0];
    assert_eq!(
        plane.shape,
        Shape::Ground {
            width: 30.0,
            height: 40.0
        }
    );
}
