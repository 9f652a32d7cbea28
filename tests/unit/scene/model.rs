use super::*;
use crate::animation::timing::TimingCurve;

const MINIMAL: &str = r##"
{
  "canvas": { "width": 140, "height": 140 },
  "fps": { "num": 30, "den": 1 },
  "duration_secs": 1.5,
  "views": [
    { "id": "pillow", "kind": "distortion", "frame": [20, 20, 100, 100], "background": "#ff0000" }
  ],
  "actions": [
    {
      "at_secs": 0.0,
      "target": "pillow",
      "set": [{ "distortion": 0.0 }],
      "animate": {
        "duration_secs": 1.0,
        "timing": { "spring": { "damping": 0.2, "initial_velocity": 0.4 } },
        "values": [{ "distortion": 1.0 }, { "background_color": "#0000ff" }]
      }
    }
  ]
}
"##;

#[test]
fn minimal_scene_parses_with_defaults() {
    let scene = SceneSpec::from_json_str(MINIMAL).unwrap();
    scene.validate().unwrap();
    assert_eq!(scene.background, Rgba8Premul::WHITE);
    assert_eq!(scene.duration_frames(), 45);

    let view = scene.view("pillow").unwrap();
    assert_eq!(view.opacity, 1.0);
    assert_eq!(view.background, Rgba8Premul::RED);
    assert_eq!(view.frame_rect(), Rect::new(20.0, 20.0, 120.0, 120.0));

    let animate = scene.actions[0].animate.as_ref().unwrap();
    assert_eq!(animate.options.delay_secs, 0.0);
    assert_eq!(
        animate.options.timing,
        TimingCurve::Spring(Spring::new(0.2, 0.4))
    );
    assert!(animate.on_complete.is_empty());
}

#[test]
fn demo_scene_is_valid_and_survives_json() {
    let demo = SceneSpec::demo();
    demo.validate().unwrap();
    assert_eq!(demo.views.len(), 4);
    assert_eq!(demo.actions.len(), 4);
    assert_eq!(demo.canvas, Canvas { width: 500, height: 140 });

    let json = demo.to_json_pretty().unwrap();
    let back = SceneSpec::from_json_str(&json).unwrap();
    assert_eq!(back, demo);
}

#[test]
fn demo_autoreverse_square_resets_on_completion() {
    let demo = SceneSpec::demo();
    let action = demo
        .actions
        .iter()
        .find(|a| a.target == "square4")
        .unwrap();
    let animate = action.animate.as_ref().unwrap();
    assert!(animate.options.autoreverse);
    assert_eq!(
        animate.on_complete,
        vec![
            Assignment::BackgroundColor(Rgba8Premul::RED),
            Assignment::Distortion(0.0),
        ]
    );
}

fn invalid(mutate: impl FnOnce(&mut SceneSpec)) -> String {
    let mut scene = SceneSpec::from_json_str(MINIMAL).unwrap();
    mutate(&mut scene);
    scene.validate().unwrap_err().to_string()
}

#[test]
fn validation_rejects_bad_scenes() {
    assert!(invalid(|s| s.canvas.width = 0).contains("canvas"));
    assert!(invalid(|s| s.fps.den = 0).contains("fps"));
    assert!(invalid(|s| s.duration_secs = 0.0).contains("duration_secs"));
    assert!(invalid(|s| s.views.push(s.views[0].clone())).contains("duplicate"));
    assert!(invalid(|s| s.views[0].frame[2] = 0.0).contains("frame"));
    assert!(invalid(|s| s.actions[0].target = "nope".to_owned()).contains("unknown view"));
    assert!(invalid(|s| s.actions[0].at_secs = -1.0).contains("at_secs"));
    assert!(
        invalid(|s| {
            s.actions[0].animate.as_mut().unwrap().options.duration_secs = -1.0;
        })
        .contains("duration_secs")
    );
    assert!(
        invalid(|s| {
            s.actions[0].animate.as_mut().unwrap().options.timing =
                TimingCurve::Spring(Spring::new(0.0, 0.0));
        })
        .contains("damping")
    );
}

#[test]
fn plain_views_cannot_be_distorted() {
    let msg = invalid(|s| s.views[0].kind = ViewKind::Plain);
    assert!(msg.contains("no distortion property"), "{msg}");
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SceneSpec::from_json_str("{ \"canvas\": 3 }").unwrap_err();
    assert!(matches!(err, DistortionError::Serde(_)));
    let err = SceneSpec::from_json_str(&MINIMAL.replace("#ff0000", "#ff00")).unwrap_err();
    assert!(err.to_string().contains("hex color"));
}

#[test]
fn missing_file_is_reported() {
    let err = SceneSpec::from_path("target/definitely/missing/scene.json").unwrap_err();
    assert!(err.to_string().contains("open scene JSON"));
}
