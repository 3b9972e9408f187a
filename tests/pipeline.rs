use flying_toasters::{
    core::{FlyingToaster, ModelLibrary, Viewport},
    pipeline::{Buffer, FrameBuffer, BACKGROUND},
    Pipeline, RenderOptions, Scene,
};
use rand::{rngs::StdRng, SeedableRng};

fn pipeline(count: usize, seed: u64) -> Pipeline<FrameBuffer> {
    Pipeline::new(800, 600, Scene::with_seed(count, 800, 600, seed))
}

#[test]
fn toaster_respawns_above_the_top_right() {
    let models = ModelLibrary::new();
    let viewport = Viewport::new(800, 600);
    let mut rng = StdRng::seed_from_u64(7);
    let mut toaster = FlyingToaster::spawn(&models, viewport, &mut rng);

    let mut respawned = false;
    for _ in 0..2000 {
        if toaster.update(viewport, &mut rng) {
            respawned = true;
            break;
        }
    }

    assert!(respawned, "toaster never left the screen");
    assert!(toaster.x >= 900.0 && toaster.x <= 1100.0);
    assert!(toaster.y <= -100.0 && toaster.y >= -300.0);
}

/// Steps a one-toaster 800x600 pipeline until its toaster wraps around.
/// Returns how many frames that took.
fn run_until_respawn(p: &mut Pipeline<FrameBuffer>) -> usize {
    let options = RenderOptions::default();
    let mut last_x = p.scene.toasters[0].x;
    for frame in 1..=2000 {
        p.render_frame(&options, None).unwrap();
        let x = p.scene.toasters[0].x;
        if x > last_x {
            return frame;
        }
        last_x = x;
    }
    panic!("toaster never left the screen");
}

#[test]
fn single_toaster_scene_respawns_and_replays() {
    let mut a = pipeline(1, 2024);
    let frames = run_until_respawn(&mut a);

    let toaster = &a.scene.toasters[0];
    assert!(toaster.x >= 900.0 && toaster.x < 1100.0);
    assert!(toaster.y <= -100.0 && toaster.y > -300.0);

    let mut b = pipeline(1, 2024);
    assert_eq!(run_until_respawn(&mut b), frames);
    assert_eq!(a.scene.toasters[0].z, b.scene.toasters[0].z);
    assert_eq!(a.front_buffer().data, b.front_buffer().data);

    let options = RenderOptions::default();
    a.render_frame(&options, None).unwrap();
    b.render_frame(&options, None).unwrap();
    assert_eq!(a.scene.toasters[0].z, b.scene.toasters[0].z);
    assert_eq!(a.front_buffer().data, b.front_buffer().data);
}

#[test]
fn frames_are_deterministic_for_a_seed() {
    let mut a = pipeline(8, 1234);
    let mut b = pipeline(8, 1234);
    let options = RenderOptions::default();

    for _ in 0..10 {
        a.render_frame(&options, None).unwrap();
        b.render_frame(&options, None).unwrap();
    }

    assert_eq!(a.front_buffer().data, b.front_buffer().data);
    assert_eq!(a.metrics().fps_counter, 10);
}

#[test]
fn toasters_leave_marks_on_the_frame() {
    let mut p = pipeline(8, 42);
    let options = RenderOptions {
        show_scanlines: false,
        show_glow: true,
        show_trails: false,
    };
    p.render_frame(&options, None).unwrap();

    let background = BACKGROUND.to_u32();
    assert!(p.front_buffer().data.iter().any(|&px| px != background));
}

#[test]
fn snapshot_is_farthest_first() {
    let mut scene = Scene::with_seed(12, 800, 600, 99);
    for _ in 0..50 {
        scene.update();
        let sorted = scene.depth_sorted();
        assert_eq!(sorted.len(), 12);
        assert!(sorted.windows(2).all(|w| w[0].z >= w[1].z));
    }
}

#[test]
fn empty_scene_renders_background() {
    let mut p = pipeline(0, 5);
    let options = RenderOptions {
        show_scanlines: false,
        show_glow: true,
        show_trails: false,
    };
    for _ in 0..3 {
        p.render_frame(&options, None).unwrap();
    }

    let front = p.front_buffer();
    assert_eq!(front.width(), 800);
    assert!(front.data.iter().all(|&px| px == BACKGROUND.to_u32()));
}

#[test]
fn resize_mid_run_keeps_rendering() {
    let mut p = pipeline(4, 3);
    let options = RenderOptions::default();
    p.render_frame(&options, None).unwrap();
    p.resize(320, 200);
    p.render_frame(&options, None).unwrap();

    let front = p.front_buffer();
    assert_eq!((front.width(), front.height()), (320, 200));
    assert_eq!(front.data.len(), 320 * 200);
}
