use super::*;
use crate::animation::{
    driver::{AnimationOptions, Animator},
    ease::Ease,
};
use crate::foundation::core::Rgba8Premul;
use crate::layer::core::BACKGROUND_COLOR;

fn committed_layer() -> BasicLayer {
    let mut layer = BasicLayer::new(Size::new(10.0, 10.0));
    layer.core_mut().commit();
    layer
}

#[test]
fn assignment_inside_a_block_interpolates() {
    let mut layer = committed_layer();
    let mut animator = Animator::new();
    layer.set_value(
        BACKGROUND_COLOR,
        Rgba8Premul::RED.into(),
        &animator.immediate(0.0),
    );
    let (_, ()) = animator.animate(
        0.0,
        AnimationOptions::new(1.0).with_timing(Ease::Linear),
        &mut layer,
        |l, txn| l.set_value(BACKGROUND_COLOR, Rgba8Premul::BLUE.into(), txn),
    );

    let snap = layer.core().presentation(0.5).unwrap();
    assert_eq!(
        snap.color(BACKGROUND_COLOR),
        Some(Rgba8Premul::opaque(128, 0, 128))
    );
    let done = layer.core().presentation(1.0).unwrap();
    assert_eq!(done.color(BACKGROUND_COLOR), Some(Rgba8Premul::BLUE));
}

#[test]
fn assignment_outside_a_block_jumps() {
    let mut layer = committed_layer();
    let mut animator = Animator::new();
    animator.animate(0.0, AnimationOptions::new(1.0), &mut layer, |l, txn| {
        l.set_value(BACKGROUND_COLOR, Rgba8Premul::BLUE.into(), txn)
    });
    assert!(layer.core().animation(BACKGROUND_COLOR).is_some());

    layer.set_value(
        BACKGROUND_COLOR,
        Rgba8Premul::RED.into(),
        &animator.immediate(0.5),
    );
    assert!(layer.core().animation(BACKGROUND_COLOR).is_none());
    let snap = layer.core().presentation(0.5).unwrap();
    assert_eq!(snap.color(BACKGROUND_COLOR), Some(Rgba8Premul::RED));
}

#[test]
fn builtin_properties_never_force_a_redraw() {
    let mut layer = committed_layer();
    let mut animator = Animator::new();
    animator.animate(0.0, AnimationOptions::new(1.0), &mut layer, |l, txn| {
        l.set_value(BACKGROUND_COLOR, Rgba8Premul::BLUE.into(), txn)
    });
    assert!(!layer.needs_display_at(0.5));
    assert_eq!(layer.core().display_requests(), 0);
}
