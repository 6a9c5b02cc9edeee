use std::f64::consts::TAU;

use rand::RngCore;

use meshvibe::config::MeshParams;
use meshvibe::mesh::{generate_control_points, spread_distance, AnimationMode, MeshInstance};
use meshvibe::{FrameDriver, RgbColor, SeededRandom};

fn reference_params() -> MeshParams {
    MeshParams {
        seed: 42,
        points: 3,
        palette: "pastel".to_string(),
        scale: 1.0,
        blur: 100.0,
        animation: AnimationMode::None,
        ..MeshParams::default()
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn mulberry32_reference_outputs() {
    let mut rng = SeededRandom::new(42);
    assert_eq!(rng.next_u32(), 2_581_720_956);
    assert_eq!(rng.next_u32(), 1_925_393_290);
    assert_eq!(rng.next_u32(), 3_661_312_704);

    let mut rng = SeededRandom::new(1);
    assert!(close(rng.next_f64(), 0.6270739405881613));
    assert!(close(rng.next_f64(), 0.002735721180215478));
}

#[test]
fn seed_42_control_points_match_snapshot() {
    let points = generate_control_points(42, 3, "pastel", 1.0);
    assert_eq!(points.len(), 3);

    let expected = [
        (0.38669811706099244, 0.29471796329694877, RgbColor::new(186, 225, 255), 3.3086785239241023, 0.12644875903613864, -0.6728687824914232),
        (0.7375714082386482, 0.5045792532101232, RgbColor::new(255, 179, 186), 3.1461761602598153, 0.1967240430461243, -0.5961619952693582),
        (0.37220743814931084, 0.7118085856174848, RgbColor::new(213, 170, 255), 0.3881839371905463, 0.11156713121803477, 0.5438699586782605),
    ];

    for (p, (bx, by, color, angle, radius, orbit)) in points.iter().zip(expected) {
        assert!(close(p.base_x, bx), "base_x {} != {}", p.base_x, bx);
        assert!(close(p.base_y, by), "base_y {} != {}", p.base_y, by);
        assert_eq!(p.color, color);
        assert!(close(p.angle, angle));
        assert!(close(p.radius, radius));
        assert!(close(p.orbit_speed, orbit));
    }

    let first = points[0];
    assert!(close(first.drift_vx, 0.24948930786922574));
    assert!(close(first.drift_vy, 0.7309492966160178));
    assert!(close(first.breathe_phase, 2.9676555809382643));
    assert!(close(first.wave_freq, 0.29996949369087816));
    assert!(close(first.wave_phase, 5.542139102670679));
}

#[test]
fn seed_42_buffer_matches_reference() {
    let mut driver = FrameDriver::register(MeshInstance::new(reference_params()));
    driver.tick(0.0);
    let canvas = driver.callback().canvas();

    assert_eq!(canvas.get_pixel(0, 0), (203, 206, 244, 255));
    assert_eq!(canvas.get_pixel(32, 32), (220, 191, 230, 255));
    assert_eq!(canvas.get_pixel(63, 0), (225, 193, 220, 255));
    assert_eq!(canvas.get_pixel(0, 63), (214, 182, 244, 255));
    assert_eq!(canvas.get_pixel(63, 63), (230, 184, 220, 255));
    assert_eq!(canvas.checksum(), 0x0914_327f_8fba_fcf2);
}

#[test]
fn generation_is_deterministic_for_many_seeds() {
    for seed in (1..5000).step_by(37) {
        for count in 2..=4 {
            for palette in ["pastel", "sunset", "vibrant"] {
                let a = generate_control_points(seed, count, palette, 1.25);
                let b = generate_control_points(seed, count, palette, 1.25);
                assert_eq!(a.len(), count);
                assert_eq!(a, b);
            }
        }
    }
}

#[test]
fn base_positions_respect_spread_bound() {
    for seed in 1..500 {
        for scale in [0.5, 1.0, 2.0] {
            let spread = spread_distance(scale);
            for p in generate_control_points(seed, 3, "aurora", scale) {
                let d = (p.base_x - 0.5).hypot(p.base_y - 0.5);
                assert!(d >= 0.6 * spread - 1e-12 && d <= spread + 1e-12);
            }
        }
    }
}

#[test]
fn static_mode_renders_once_over_ten_frames() {
    let mut driver = FrameDriver::register(MeshInstance::new(reference_params()));
    for frame in 0..10 {
        driver.tick(1000.0 + frame as f64 * 16.667);
    }
    assert_eq!(driver.callback().render_count(), 1);
}

#[test]
fn orbit_positions_repeat_after_one_period() {
    for p in generate_control_points(42, 4, "neon", 1.0) {
        let period = TAU / p.orbit_speed.abs();
        for t in [0.0, 1.5, 42.0] {
            let (x0, y0) = AnimationMode::Orbit.position_at(&p, t);
            let (x1, y1) = AnimationMode::Orbit.position_at(&p, t + period);
            assert!((x0 - x1).abs() < 1e-9 && (y0 - y1).abs() < 1e-9);
        }
    }
}

#[test]
fn rendered_pixels_are_always_finite_blends() {
    for mode in AnimationMode::all() {
        let params = MeshParams {
            animation: *mode,
            points: 4,
            ..reference_params()
        };
        let mut mesh = MeshInstance::new(params);
        for t in [0.0, 7.3, 1234.5] {
            mesh.render_at(t);
            assert!(mesh.canvas().data().chunks(4).all(|px| px[3] == 255));
        }
    }
}

#[test]
fn two_point_pastel_meshes_are_never_flat() {
    for seed in 1..=300 {
        let params = MeshParams {
            seed,
            points: 2,
            ..reference_params()
        };
        let mut mesh = MeshInstance::new(params);
        mesh.render_at(0.0);
        let points = mesh.points();
        assert_ne!(points[0].color, points[1].color, "seed {seed}");
        let data = mesh.canvas().data();
        assert!(data.chunks(4).any(|px| px != &data[..4]), "seed {seed} rendered flat");
    }
}
