use cgmath::Vector3;
use shelf_ngin::{
    BoxParams, Color3, GroundParams, ReadyState, SceneConfig, SceneManager, Shape,
};

use crate::common::test_utils::{Call, Recorder, RecordingBackend, RecordingWindow};

mod common;

type TestManager = SceneManager<RecordingBackend, RecordingWindow>;

fn manager(recorder: &Recorder) -> (TestManager, RecordingWindow) {
    let window = RecordingWindow::new(recorder, ReadyState::Complete);
    let config = SceneConfig::default().with_seed(42);
    (SceneManager::new(window.clone(), config), window)
}

#[test]
fn factories_refuse_to_run_without_a_scene() {
    let recorder = Recorder::new();
    let (mut manager, _window) = manager(&recorder);

    assert!(manager.generate_box(BoxParams::default()).is_err());
    assert!(manager.generate_ground(GroundParams::default()).is_err());
    assert!(manager.show_world_axis(5.0).is_err());
    assert!(manager.animate().is_err());

    assert!(recorder.calls().is_empty());
    assert!(manager.scene().is_empty());
}

#[tokio::test]
async fn scene_is_created_once() {
    let recorder = Recorder::new();
    let (mut manager, _window) = manager(&recorder);
    manager.create_scene(recorder.clone()).await.unwrap();
    let err = manager.create_scene(recorder.clone()).await.unwrap_err();
    assert!(err.to_string().contains("already"), "{}", err);

    assert_eq!(recorder.count(|c| *c == Call::Attach), 1);
    assert_eq!(manager.scene().len(), 1);
}

#[tokio::test]
async fn second_animate_keeps_a_single_loop() {
    let recorder = Recorder::new();
    let (mut manager, window) = manager(&recorder);
    manager.create_scene(recorder.clone()).await.unwrap();
    manager.animate().unwrap();
    manager.animate().unwrap();

    assert_eq!(window.resize_listeners(), 1);
    assert_eq!(recorder.count(|c| *c == Call::ResizeListener), 1);
}

#[tokio::test]
async fn nothing_renders_before_animate() {
    let recorder = Recorder::new();
    let (mut manager, _window) = manager(&recorder);
    manager.create_scene(recorder.clone()).await.unwrap();
    recorder.clear();

    manager.frame(instant::Duration::from_millis(16)).unwrap();
    assert!(recorder.calls().is_empty());

    // An explicit resize request is still honoured.
    manager.request_resize();
    manager.frame(instant::Duration::from_millis(16)).unwrap();
    assert_eq!(recorder.calls(), vec![Call::Resize]);
}

#[tokio::test]
async fn box_defaults() {
    let recorder = Recorder::new();
    let (mut manager, _window) = manager(&recorder);
    manager.create_scene(recorder.clone()).await.unwrap();

    let id = manager.generate_box(BoxParams::default()).unwrap();
    let mesh = manager.scene().mesh(id).unwrap();
    assert_eq!(
        mesh.shape,
        Shape::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0
        }
    );
    assert_eq!(mesh.position, Vector3::new(1.0, 0.5, 1.0));
    assert_eq!(recorder.meshes().last(), Some(mesh));
}

#[tokio::test]
async fn explicit_zero_is_not_a_default() {
    let recorder = Recorder::new();
    let (mut manager, _window) = manager(&recorder);
    manager.create_scene(recorder.clone()).await.unwrap();

    let id = manager
        .generate_box(BoxParams {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(0.0),
            width: Some(2.0),
            ..BoxParams::default()
        })
        .unwrap();
    let mesh = manager.scene().mesh(id).unwrap();
    assert_eq!(mesh.position, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(
        mesh.shape,
        Shape::Box {
            width: 2.0,
            height: 1.0,
            depth: 1.0
        }
    );

    let id = manager
        .generate_ground(GroundParams {
            x: Some(0.0),
            ..GroundParams::default()
        })
        .unwrap();
    let tile = manager.scene().mesh(id).unwrap();
    assert_eq!(tile.position, Vector3::new(0.0, 0.5, 1.0));
    assert_eq!(tile.material.diffuse, Color3::BLUE);
}

#[tokio::test]
async fn world_axis_colours_follow_the_axes() {
    let recorder = Recorder::new();
    let (mut manager, _window) = manager(&recorder);
    manager.create_scene(recorder.clone()).await.unwrap();
    manager.show_world_axis(10.0).unwrap();

    for (prefix, colour) in [
        ("axisX", Color3::RED),
        ("labelX", Color3::RED),
        ("axisY", Color3::GREEN),
        ("labelY", Color3::GREEN),
        ("axisZ", Color3::BLUE),
        ("labelZ", Color3::BLUE),
    ] {
        let mesh = manager
            .scene()
            .meshes()
            .iter()
            .find(|m| m.name.starts_with(prefix))
            .unwrap();
        assert_eq!(mesh.material.diffuse, colour, "{}", prefix);
        let Shape::Lines { segments } = &mesh.shape else {
            panic!("{} is not a line mesh", prefix);
        };
        assert!(!segments.is_empty());
    }
}
