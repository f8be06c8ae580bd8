mod bubble_pop;
mod finger_paint;
mod fireworks;
mod games_menu;
mod magic_garden;
mod main_menu;
mod particle_playground;
mod remote;
mod shape_sorter;
mod shows;
mod videos;
mod weather_toy;
mod whack_a_critter;

pub use bubble_pop::BubblePop;
pub use finger_paint::FingerPaint;
pub use fireworks::Fireworks;
pub use games_menu::GamesMenu;
pub use magic_garden::MagicGarden;
pub use main_menu::MainMenu;
pub use particle_playground::{EmitMode, ParticlePlayground, Palette};
pub use remote::Remote;
pub use shape_sorter::ShapeSorter;
pub use shows::Shows;
pub use videos::Videos;
pub use weather_toy::{Scene, WeatherToy};
pub use whack_a_critter::WhackACritter;

use engine::particles::Spark;
use engine::ui::Vec2;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::widgets::hsv_to_rgb;

/// Radial burst of `count` sparks around `at` in random hues.
pub(crate) fn spark_burst(
    rng: &mut SmallRng,
    at: Vec2,
    count: usize,
    speed: (f32, f32),
    life: f32,
) -> impl Iterator<Item = Spark> + '_ {
    (0..count).map(move |i| {
        let angle = i as f32 / count as f32 * std::f32::consts::TAU + rng.gen_range(-0.2..0.2);
        let vel = Vec2::from_angle(angle, rng.gen_range(speed.0..speed.1));
        let color = hsv_to_rgb(rng.r#gen::<f32>(), 0.7, 1.0);
        Spark::new(at, vel, color, rng.gen_range(3.0..6.0), life).with_gravity(200.0)
    })
}

/// Standard normal sample (Box-Muller).
pub(crate) fn gauss(rng: &mut SmallRng, mean: f32, std_dev: f32) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.r#gen();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos();
    mean + z * std_dev
}

#[cfg(test)]
pub(crate) mod testing {
    use engine::graphics::CpuRenderer;
    use engine::input::PointerEvent;
    use engine::screen::{Nav, Screen};
    use engine::surface::SurfaceSize;
    use engine::ui::Vec2;

    use crate::{SCREEN_H, SCREEN_W, ScreenId};

    /// Draws `screen` into a fresh frame and returns the RGBA bytes.
    pub fn render(screen: &dyn Screen<ScreenId>) -> Vec<u8> {
        let size = SurfaceSize::new(SCREEN_W as u32, SCREEN_H as u32);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        screen.draw(&mut gfx);
        frame
    }

    pub fn pixel(frame: &[u8], x: i32, y: i32) -> [u8; 4] {
        let i = ((y * SCREEN_W + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    /// Press and release at `p`; returns the navigation from the release, or from the press if
    /// that already navigated.
    pub fn tap(screen: &mut dyn Screen<ScreenId>, p: Vec2) -> Nav<ScreenId> {
        match screen.handle_event(&PointerEvent::Down(p)) {
            Nav::Stay => screen.handle_event(&PointerEvent::Up(p)),
            nav => nav,
        }
    }

    /// Press, move through `path`, release at the last point.
    pub fn drag(screen: &mut dyn Screen<ScreenId>, from: Vec2, path: &[Vec2]) -> Nav<ScreenId> {
        let mut nav = screen.handle_event(&PointerEvent::Down(from));
        let mut last = from;
        for &p in path {
            let step = screen.handle_event(&PointerEvent::Move(p));
            if nav == Nav::Stay {
                nav = step;
            }
            last = p;
        }
        let up = screen.handle_event(&PointerEvent::Up(last));
        if nav == Nav::Stay { up } else { nav }
    }

    /// Runs `update` in 60 Hz steps for `secs`, returning the first navigation requested.
    pub fn run_for(screen: &mut dyn Screen<ScreenId>, secs: f32) -> Nav<ScreenId> {
        let dt = 1.0 / 60.0;
        let steps = (secs / dt).ceil() as usize;
        for _ in 0..steps {
            let nav = screen.update(dt);
            if nav != Nav::Stay {
                return nav;
            }
        }
        Nav::Stay
    }
}
