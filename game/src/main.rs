use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use engine::app::{AppConfig, run_app};
use engine::assets::ImageCache;
use engine::surface::SurfaceSize;
use toybox::settings::SettingsStore;
use toybox::video::MpvPlayer;
use toybox::{SCREEN_H, SCREEN_W, Services, build_router, remote};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = SettingsStore::from_env();
    let settings = store
        .load_or_default()
        .with_overrides(|key| std::env::var(key).ok());
    tracing::info!(
        path = %store.path().display(),
        remote = settings.remote.enabled,
        videos = settings.videos.catalog.len(),
        "starting toybox"
    );

    let services = Services {
        remote: remote::from_settings(&settings.remote),
        player: Rc::new(MpvPlayer::from_settings(&settings.videos)),
        images: Rc::new(RefCell::new(ImageCache::new(settings.assets_dir.clone()))),
        videos: settings.videos.catalog.clone(),
    };
    let router = build_router(&services);

    let display = &settings.display;
    let config = AppConfig {
        title: display.title.clone(),
        logical_size: SurfaceSize::new(SCREEN_W as u32, SCREEN_H as u32),
        window_size: SurfaceSize::new(display.width, display.height),
        fullscreen: display.fullscreen,
        fps: display.fps,
    };
    run_app(config, router).context("display loop failed")?;
    tracing::info!("toybox exited");
    Ok(())
}
