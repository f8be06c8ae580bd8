use engine::graphics::CpuRenderer;
use engine::particles::{Bounds, ParticlePool};
use engine::surface::SurfaceSize;
use engine::ui::Vec2;

const WHITE: [u8; 4] = [255, 255, 255, 255];

#[test]
fn five_one_second_particles_are_gone_after_two_half_second_steps() {
    let mut pool = ParticlePool::new(5, Bounds::new(0.0, 0.0, 720.0, 720.0), 0.6);
    for i in 0..5 {
        assert!(pool.emit(Vec2::new(100.0 + i as f32, 100.0), Vec2::ZERO, WHITE, 3, 1.0));
    }
    pool.update(0.5, 0.0);
    assert_eq!(pool.len(), 5);
    pool.update(0.5, 0.0);
    assert_eq!(pool.len(), 0);
}

#[test]
fn capacity_plus_one_emit_fails_only_on_the_last_call() {
    let cap = 2500;
    let mut pool = ParticlePool::new(cap, Bounds::new(0.0, 80.0, 720.0, 720.0), 0.6);
    let mut failures = Vec::new();
    for i in 0..=cap {
        if !pool.emit(Vec2::new(360.0, 360.0), Vec2::ZERO, WHITE, 2, 4.0) {
            failures.push(i);
        }
    }
    assert_eq!(failures, vec![cap]);
    assert_eq!(pool.len(), cap);
}

#[test]
fn expired_particles_are_not_drawn() {
    let size = SurfaceSize::new(64, 64);
    let mut frame = vec![0u8; size.rgba_len()];

    let mut pool = ParticlePool::new(4, Bounds::new(0.0, 0.0, 64.0, 64.0), 0.6);
    pool.emit(Vec2::new(10.0, 10.0), Vec2::ZERO, WHITE, 4, 0.25);
    pool.emit(Vec2::new(50.0, 50.0), Vec2::ZERO, WHITE, 4, 2.0);
    pool.update(0.5, 0.0);

    let mut gfx = CpuRenderer::new(&mut frame, size);
    pool.draw(&mut gfx);

    let at = |x: usize, y: usize| {
        let i = (y * 64 + x) * 4;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    };
    assert_eq!(at(10, 10), [0, 0, 0, 0]);
    assert_eq!(at(50, 50), WHITE);
}

#[test]
fn fast_particle_never_ends_beyond_the_floor() {
    let mut pool = ParticlePool::new(1, Bounds::new(0.0, 80.0, 720.0, 720.0), 0.6);
    pool.emit(Vec2::new(360.0, 700.0), Vec2::new(0.0, 5000.0), WHITE, 2, 4.0);
    for _ in 0..10 {
        pool.update(0.25, 400.0);
        let p = pool.position(0).expect("still alive");
        assert!(p.y <= 720.0 && p.y >= 80.0, "y = {}", p.y);
    }
}

#[test]
fn particle_square_hangs_down_and_right_from_its_position() {
    let size = SurfaceSize::new(32, 32);
    let mut frame = vec![0u8; size.rgba_len()];

    let mut pool = ParticlePool::new(1, Bounds::new(0.0, 0.0, 32.0, 32.0), 0.6);
    pool.emit(Vec2::new(10.0, 12.0), Vec2::ZERO, WHITE, 4, 2.0);

    let mut gfx = CpuRenderer::new(&mut frame, size);
    pool.draw(&mut gfx);

    let at = |x: usize, y: usize| {
        let i = (y * 32 + x) * 4;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    };
    assert_eq!(at(10, 12), WHITE);
    assert_eq!(at(13, 15), WHITE);
    assert_eq!(at(9, 12), [0, 0, 0, 0]);
    assert_eq!(at(10, 11), [0, 0, 0, 0]);
    assert_eq!(at(14, 12), [0, 0, 0, 0]);
}
