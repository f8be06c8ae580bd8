//! Curated video playback through an external player process.

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::settings::VideoSettings;

/// Shared "still playing" flag; cleared once when the player exits or is killed.
#[derive(Debug, Clone)]
pub struct Playback {
    playing: Arc<AtomicBool>,
}

impl Playback {
    pub fn new(playing: Arc<AtomicBool>) -> Self {
        Self { playing }
    }

    pub fn finished() -> Self {
        Self::new(Arc::new(AtomicBool::new(false)))
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }
}

pub trait VideoPlayer {
    fn play(&self, video_id: &str) -> Playback;
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

#[derive(Debug, Clone)]
pub struct MpvPlayer {
    command: String,
    args: Vec<String>,
    max_duration: Duration,
    poll_interval: Duration,
}

impl MpvPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>, max_duration: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            max_duration,
            poll_interval: Duration::from_millis(200),
        }
    }

    pub fn from_settings(settings: &VideoSettings) -> Self {
        Self::new(
            settings.player_command.clone(),
            settings.player_args.clone(),
            settings.max_duration(),
        )
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl VideoPlayer for MpvPlayer {
    fn play(&self, video_id: &str) -> Playback {
        let playing = Arc::new(AtomicBool::new(true));
        let url = watch_url(video_id);

        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let child = match child {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!(%err, command = %self.command, "video player failed to start");
                playing.store(false, Ordering::Release);
                return Playback::new(playing);
            }
        };
        tracing::info!(%url, pid = child.id(), "video playback started");

        let flag = playing.clone();
        let max_duration = self.max_duration;
        let poll_interval = self.poll_interval;
        let spawned = thread::Builder::new()
            .name("video-playback".to_string())
            .spawn(move || {
                supervise(child, max_duration, poll_interval);
                flag.store(false, Ordering::Release);
            });
        if let Err(err) = spawned {
            tracing::warn!(%err, "video supervisor thread failed to start");
            playing.store(false, Ordering::Release);
        }

        Playback::new(playing)
    }
}

/// Waits for the player to exit, killing it once `max_duration` has passed.
fn supervise(mut child: Child, max_duration: Duration, poll_interval: Duration) {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                tracing::info!(%status, "video playback finished");
                return;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%err, "lost track of video player");
                return;
            }
        }
        if started.elapsed() >= max_duration {
            tracing::info!(secs = max_duration.as_secs(), "video playback hit its time limit");
            let _ = child.kill();
            let _ = child.wait();
            return;
        }
        thread::sleep(poll_interval);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Plays nothing; the test flips the returned flag by hand.
    #[derive(Debug, Default)]
    pub struct ManualPlayer {
        pub requested: RefCell<Vec<String>>,
        pub current: RefCell<Option<Arc<AtomicBool>>>,
    }

    impl ManualPlayer {
        pub fn finish(&self) {
            if let Some(flag) = self.current.borrow().as_ref() {
                flag.store(false, Ordering::Release);
            }
        }
    }

    impl VideoPlayer for ManualPlayer {
        fn play(&self, video_id: &str) -> Playback {
            self.requested.borrow_mut().push(video_id.to_string());
            let flag = Arc::new(AtomicBool::new(true));
            *self.current.borrow_mut() = Some(flag.clone());
            Playback::new(flag)
        }
    }
}
