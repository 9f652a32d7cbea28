use super::*;
use crate::{
    animation::ease::Ease,
    foundation::core::{Point, Rect},
    scene::model::AnimateSpec,
};

fn fps10() -> Fps {
    Fps { num: 10, den: 1 }
}

fn stage_with_pillow() -> Stage {
    let mut stage = Stage::new(
        Canvas {
            width: 140,
            height: 140,
        },
        fps10(),
        Rgba8Premul::WHITE,
    );
    stage
        .add_view(Box::new(DistortionView::new(
            "pillow",
            Rect::new(20.0, 20.0, 120.0, 120.0),
        )))
        .unwrap();
    stage
}

fn linear(duration: f64) -> AnimationOptions {
    AnimationOptions::new(duration).with_timing(Ease::Linear)
}

fn mask_contains(stage: &Stage, x: f64, y: f64) -> bool {
    stage
        .view("pillow")
        .unwrap()
        .layer()
        .core()
        .mask()
        .unwrap()
        .contains(Point::new(x, y))
}

#[test]
fn add_view_commits_and_rejects_duplicates() {
    let mut stage = stage_with_pillow();
    let core = stage.view("pillow").unwrap().layer().core();
    assert!(core.is_committed());
    assert!(core.needs_display());

    let err = stage
        .add_view(Box::new(PlainView::new("pillow", Rect::new(0.0, 0.0, 1.0, 1.0))))
        .unwrap_err();
    assert!(err.to_string().contains("duplicate view id"));
}

#[test]
fn display_pass_rebuilds_the_mask_every_tick_while_animating() {
    let mut stage = stage_with_pillow();
    stage.advance_to(FrameIndex(0)).unwrap();
    assert!(mask_contains(&stage, 50.0, 1.0));

    stage
        .animate("pillow", linear(1.0), &[Assignment::Distortion(1.0)], Vec::new())
        .unwrap();
    stage.advance_to(FrameIndex(5)).unwrap();
    // s = 0.5: the top edge midpoint sits 3.125px inside.
    assert!(!mask_contains(&stage, 50.0, 2.0));
    assert!(mask_contains(&stage, 50.0, 4.0));

    // The tick that retires the transition still redraws at the final value.
    stage.advance_to(FrameIndex(10)).unwrap();
    assert!(!mask_contains(&stage, 50.0, 6.2));
    assert!(mask_contains(&stage, 50.0, 7.0));
    assert!(!stage.view("pillow").unwrap().layer().core().has_animations());
}

#[test]
fn idle_views_are_not_redisplayed() {
    let mut stage = stage_with_pillow();
    stage.advance_to(FrameIndex(0)).unwrap();
    let core = stage.view("pillow").unwrap().layer().core();
    assert!(!core.needs_display());
    assert!(!stage.view("pillow").unwrap().layer().needs_display_at(0.5));
}

#[test]
fn advance_cannot_rewind() {
    let mut stage = stage_with_pillow();
    stage.advance_to(FrameIndex(5)).unwrap();
    assert_eq!(stage.current_frame(), Some(FrameIndex(5)));
    assert!((stage.now_secs() - 0.5).abs() < 1e-12);

    stage.advance_to(FrameIndex(5)).unwrap();
    let err = stage.advance_to(FrameIndex(3)).unwrap_err();
    assert!(err.to_string().contains("cannot rewind"));
}

#[test]
fn scheduled_actions_run_in_time_order() {
    let mut stage = stage_with_pillow();
    let set = |at_secs: f64, opacity: f64| ActionSpec {
        at_secs,
        target: "pillow".to_owned(),
        set: vec![Assignment::Opacity(opacity)],
        animate: None,
    };
    stage.schedule(set(0.3, 0.7)).unwrap();
    stage.schedule(set(0.1, 0.2)).unwrap();

    stage.advance_to(FrameIndex(0)).unwrap();
    assert_eq!(stage.view("pillow").unwrap().opacity(), 1.0);
    stage.advance_to(FrameIndex(2)).unwrap();
    assert_eq!(stage.view("pillow").unwrap().opacity(), 0.2);
    stage.advance_to(FrameIndex(4)).unwrap();
    assert_eq!(stage.view("pillow").unwrap().opacity(), 0.7);
}

#[test]
fn schedule_rejects_unknown_targets() {
    let mut stage = stage_with_pillow();
    let err = stage
        .schedule(ActionSpec {
            at_secs: 0.0,
            target: "nope".to_owned(),
            set: Vec::new(),
            animate: None,
        })
        .unwrap_err();
    assert!(err.to_string().contains("unknown view 'nope'"));
}

#[test]
fn completion_runs_once_the_group_finishes() {
    let mut stage = stage_with_pillow();
    stage
        .animate(
            "pillow",
            linear(0.5),
            &[Assignment::Distortion(1.0)],
            vec![Assignment::Opacity(0.5)],
        )
        .unwrap();
    stage.advance_to(FrameIndex(4)).unwrap();
    assert_eq!(stage.view("pillow").unwrap().opacity(), 1.0);
    stage.advance_to(FrameIndex(6)).unwrap();
    assert_eq!(stage.view("pillow").unwrap().opacity(), 0.5);
}

#[test]
fn interrupted_group_skips_its_completion() {
    let mut stage = stage_with_pillow();
    stage
        .animate(
            "pillow",
            linear(1.0),
            &[Assignment::Distortion(1.0)],
            vec![Assignment::Distortion(0.5)],
        )
        .unwrap();
    stage.advance_to(FrameIndex(2)).unwrap();
    stage
        .animate("pillow", linear(0.5), &[Assignment::Distortion(0.2)], Vec::new())
        .unwrap();
    stage.advance_to(FrameIndex(20)).unwrap();

    let pillow = stage.view("pillow").unwrap();
    assert!(!pillow.layer().core().has_animations());
    let d = pillow
        .layer()
        .core()
        .model_value("distortion")
        .and_then(|v| v.as_scalar());
    assert_eq!(d, Some(0.2));
    assert_eq!(pillow.opacity(), 1.0);
}

#[test]
fn plain_views_refuse_distortion() {
    let mut stage = stage_with_pillow();
    stage
        .add_view(Box::new(PlainView::new("plain", Rect::new(0.0, 0.0, 10.0, 10.0))))
        .unwrap();
    assert!(stage.set("plain", &[Assignment::Distortion(1.0)]).is_err());
    assert!(
        stage
            .animate("plain", linear(1.0), &[Assignment::Distortion(1.0)], Vec::new())
            .is_err()
    );
}

#[test]
fn demo_scene_autoreverse_resets_on_completion() {
    let scene = SceneSpec::demo();
    let mut stage = Stage::from_scene(&scene).unwrap();
    assert_eq!(stage.views().count(), 4);

    // Mid-flight, square4 is on its way out.
    stage.advance_to(FrameIndex(45)).unwrap();
    let sq4 = stage.view("square4").unwrap();
    assert_eq!(sq4.background_color(), Rgba8Premul::BLUE);
    let presented = sq4.layer().core().presentation(stage.now_secs()).unwrap();
    let d = presented.scalar("distortion").unwrap();
    assert!(d > 0.0 && d < 1.0, "{d}");

    // The press lands at 0.25s, autoreverse doubles the 1s duration.
    stage.advance_to(FrameIndex(140)).unwrap();
    let sq2 = stage.view("square2").unwrap();
    assert_eq!(sq2.background_color(), Rgba8Premul::BLUE);
    let sq4 = stage.view("square4").unwrap();
    assert_eq!(sq4.background_color(), Rgba8Premul::RED);
    let d = sq4
        .layer()
        .core()
        .model_value("distortion")
        .and_then(|v| v.as_scalar());
    assert_eq!(d, Some(0.0));
}

#[test]
fn action_with_set_then_animate_starts_from_the_set_value() {
    let mut stage = stage_with_pillow();
    stage
        .schedule(ActionSpec {
            at_secs: 0.2,
            target: "pillow".to_owned(),
            set: vec![Assignment::Distortion(0.0)],
            animate: Some(AnimateSpec {
                options: linear(1.0),
                values: vec![Assignment::Distortion(1.0)],
                on_complete: Vec::new(),
            }),
        })
        .unwrap();
    stage.advance_to(FrameIndex(7)).unwrap();
    let view = stage.view("pillow").unwrap();
    let d = view
        .layer()
        .core()
        .presentation(stage.now_secs())
        .and_then(|s| s.scalar("distortion"))
        .unwrap();
    assert!((d - 0.5).abs() < 1e-9, "{d}");
}

#[test]
fn render_frames_visits_every_frame() {
    let mut stage = stage_with_pillow();
    let mut rasterizer = CpuRasterizer::new();
    let mut seen = Vec::new();
    stage
        .render_frames(
            FrameRange::new(FrameIndex(0), FrameIndex(3)).unwrap(),
            &mut rasterizer,
            |f, rgba| {
                assert_eq!((rgba.width, rgba.height), (140, 140));
                seen.push(f.0);
                Ok(())
            },
        )
        .unwrap();
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(stage.current_frame(), Some(FrameIndex(2)));
}

fn stage_with_plain() -> Stage {
    let mut stage = stage_with_pillow();
    stage
        .add_view(Box::new(PlainView::new("plain", Rect::new(0.0, 0.0, 10.0, 10.0))))
        .unwrap();
    stage.advance_to(FrameIndex(0)).unwrap();
    stage
}

fn plain_model_background(stage: &Stage) -> Rgba8Premul {
    stage.view("plain").unwrap().background_color()
}

#[test]
fn rejected_animate_block_changes_nothing() {
    let mut stage = stage_with_plain();
    let before = plain_model_background(&stage);

    let err = stage
        .animate(
            "plain",
            linear(1.0),
            &[
                Assignment::BackgroundColor(Rgba8Premul::BLUE),
                Assignment::Distortion(1.0),
            ],
            Vec::new(),
        )
        .unwrap_err();
    assert!(err.to_string().contains("no distortion property"));

    assert_eq!(plain_model_background(&stage), before);
    assert!(!stage.view("plain").unwrap().layer().core().has_animations());
    assert!(stage.pending.is_empty());
}

#[test]
fn rejected_completion_is_caught_before_the_block_runs() {
    let mut stage = stage_with_plain();
    assert!(
        stage
            .animate(
                "plain",
                linear(1.0),
                &[Assignment::Opacity(0.5)],
                vec![Assignment::Distortion(0.0)],
            )
            .is_err()
    );
    assert_eq!(stage.view("plain").unwrap().opacity(), 1.0);
    assert!(!stage.view("plain").unwrap().layer().core().has_animations());
}

#[test]
fn rejected_set_changes_nothing() {
    let mut stage = stage_with_plain();
    let before = plain_model_background(&stage);
    assert!(
        stage
            .set(
                "plain",
                &[
                    Assignment::BackgroundColor(Rgba8Premul::RED),
                    Assignment::Opacity(f64::NAN),
                ],
            )
            .is_err()
    );
    assert_eq!(plain_model_background(&stage), before);
}

#[test]
fn schedule_checks_assignments_against_the_live_view() {
    let mut stage = stage_with_plain();
    let before = plain_model_background(&stage);
    let action = |set: Vec<Assignment>, animate: Option<AnimateSpec>| ActionSpec {
        at_secs: 0.2,
        target: "plain".to_owned(),
        set,
        animate,
    };

    let err = stage
        .schedule(action(
            vec![
                Assignment::BackgroundColor(Rgba8Premul::RED),
                Assignment::Distortion(1.0),
            ],
            None,
        ))
        .unwrap_err();
    assert!(err.to_string().contains("no distortion property"));

    let bad_options = AnimateSpec {
        options: linear(-1.0),
        values: vec![Assignment::Opacity(0.5)],
        on_complete: Vec::new(),
    };
    let err = stage
        .schedule(action(Vec::new(), Some(bad_options)))
        .unwrap_err();
    assert!(matches!(err, DistortionError::Animation(_)), "{err}");

    assert!(stage.schedule.is_empty());
    stage.advance_to(FrameIndex(5)).unwrap();
    assert_eq!(stage.current_frame(), Some(FrameIndex(5)));
    assert_eq!(plain_model_background(&stage), before);
}

#[test]
fn stage_clears_cancellation_records_of_its_blocks() {
    let mut stage = stage_with_pillow();
    let first = stage
        .animate("pillow", linear(1.0), &[Assignment::Distortion(1.0)], Vec::new())
        .unwrap();
    stage.advance_to(FrameIndex(1)).unwrap();
    stage
        .animate("pillow", linear(0.5), &[Assignment::Distortion(0.0)], Vec::new())
        .unwrap();
    stage.advance_to(FrameIndex(2)).unwrap();

    assert!(stage.pending.iter().all(|p| p.group != first));
    let core = stage.view_mut("pillow").unwrap().layer_mut().core_mut();
    assert!(!core.take_cancelled(first));
}
