use std::cell::RefCell;
use std::rc::Rc;

use engine::HeadlessDriver;
use engine::assets::ImageCache;
use engine::input::PointerEvent;
use engine::screen::Router;
use engine::surface::SurfaceSize;
use engine::ui::Vec2;
use toybox::catalog::{MediaType, VideoEntry};
use toybox::remote::{RemoteKey, RemoteSender};
use toybox::screens::{GamesMenu, MainMenu};
use toybox::video::{Playback, VideoPlayer};
use toybox::{ScreenId, Services, build_router};

const DT: f32 = 1.0 / 60.0;
const BACK: Vec2 = Vec2 { x: 50.0, y: 50.0 };

#[derive(Default)]
struct Recorder {
    keys: RefCell<Vec<RemoteKey>>,
    launches: RefCell<Vec<u32>>,
}

impl RemoteSender for Recorder {
    fn send_key(&self, key: RemoteKey) {
        self.keys.borrow_mut().push(key);
    }

    fn launch_content(&self, channel_id: u32, _content_id: &str, _media_type: MediaType) {
        self.launches.borrow_mut().push(channel_id);
    }
}

#[derive(Default)]
struct InstantPlayer {
    played: RefCell<Vec<String>>,
}

impl VideoPlayer for InstantPlayer {
    fn play(&self, video_id: &str) -> Playback {
        self.played.borrow_mut().push(video_id.to_string());
        Playback::finished()
    }
}

struct Kiosk {
    driver: HeadlessDriver<Router<ScreenId>>,
    remote: Rc<Recorder>,
    player: Rc<InstantPlayer>,
}

fn kiosk(videos: Vec<VideoEntry>) -> Kiosk {
    let remote = Rc::new(Recorder::default());
    let player = Rc::new(InstantPlayer::default());
    let services = Services {
        remote: remote.clone(),
        player: player.clone(),
        images: Rc::new(RefCell::new(ImageCache::new("/nonexistent/toybox-assets"))),
        videos,
    };
    let driver = HeadlessDriver::new(build_router(&services), SurfaceSize::new(720, 720));
    Kiosk {
        driver,
        remote,
        player,
    }
}

impl Kiosk {
    fn current(&self) -> ScreenId {
        self.driver.app().current()
    }

    fn tap(&mut self, at: Vec2) {
        self.driver.tap(at, DT);
    }

    /// Taps, then waits out the menus' navigation delay.
    fn open(&mut self, at: Vec2) {
        self.tap(at);
        self.driver.idle(12, DT);
    }
}

#[test]
fn games_round_trip_back_to_the_main_menu() {
    let mut k = kiosk(Vec::new());
    assert_eq!(k.current(), ScreenId::MainMenu);

    let games = MainMenu::button_for(ScreenId::GamesMenu).unwrap();
    k.open(games.center());
    assert_eq!(k.current(), ScreenId::GamesMenu);

    let bubbles = GamesMenu::card_for(ScreenId::BubblePop).unwrap();
    k.open(bubbles.center());
    assert_eq!(k.current(), ScreenId::BubblePop);
    assert_eq!(k.driver.app().history(), &[ScreenId::MainMenu, ScreenId::GamesMenu]);

    k.tap(BACK);
    assert_eq!(k.current(), ScreenId::GamesMenu);
    k.tap(BACK);
    assert_eq!(k.current(), ScreenId::MainMenu);
    assert!(k.driver.app().history().is_empty());

    // Back at the root is a no-op.
    k.tap(BACK);
    assert_eq!(k.current(), ScreenId::MainMenu);
}

#[test]
fn every_game_card_opens_its_game() {
    let games = [
        ScreenId::BubblePop,
        ScreenId::FingerPaint,
        ScreenId::ShapeSorter,
        ScreenId::WhackACritter,
        ScreenId::MagicGarden,
        ScreenId::Fireworks,
        ScreenId::ParticlePlayground,
        ScreenId::WeatherToy,
    ];
    let mut k = kiosk(Vec::new());
    k.open(MainMenu::button_for(ScreenId::GamesMenu).unwrap().center());
    for game in games {
        let card = GamesMenu::card_for(game).unwrap();
        k.open(card.center());
        assert_eq!(k.current(), game);
        k.tap(BACK);
        assert_eq!(k.current(), ScreenId::GamesMenu, "back from {game:?}");
    }
}

#[test]
fn shows_swipe_into_the_remote_and_keys_reach_the_sender() {
    let mut k = kiosk(Vec::new());
    k.open(MainMenu::button_for(ScreenId::Shows).unwrap().center());
    assert_eq!(k.current(), ScreenId::Shows);

    let from = Vec2::new(500.0, 400.0);
    let to = Vec2::new(300.0, 405.0);
    k.driver.step([PointerEvent::Down(from)], DT);
    k.driver.step([PointerEvent::Move(to)], DT);
    k.driver.step([PointerEvent::Up(to)], DT);
    assert_eq!(k.current(), ScreenId::Remote);
    assert!(k.remote.launches.borrow().is_empty());

    // OK sits in the middle of the d-pad.
    k.tap(Vec2::new(360.0, 320.0));
    assert_eq!(*k.remote.keys.borrow(), vec![RemoteKey::Select]);

    k.tap(BACK);
    assert_eq!(k.current(), ScreenId::Shows);
    k.tap(BACK);
    assert_eq!(k.current(), ScreenId::MainMenu);
}

#[test]
fn video_card_starts_playback() {
    let videos = vec![VideoEntry {
        title: "Trains".to_string(),
        video_id: "abc123".to_string(),
        color: [60, 120, 200],
    }];
    let mut k = kiosk(videos);
    k.open(MainMenu::button_for(ScreenId::Videos).unwrap().center());
    assert_eq!(k.current(), ScreenId::Videos);

    k.tap(Vec2::new(180.0, 160.0));
    assert_eq!(*k.player.played.borrow(), vec!["abc123".to_string()]);
    // The player finished instantly, so the screen is interactive again.
    k.driver.idle(1, DT);
    k.tap(BACK);
    assert_eq!(k.current(), ScreenId::MainMenu);
}

#[test]
fn every_screen_paints_a_frame() {
    let mut k = kiosk(Vec::new());
    for id in ScreenId::ALL {
        k.driver.app_mut().go_to(id);
        k.driver.idle(2, DT);
        let surface = k.driver.surface();
        let first = surface.pixel(0, 0).unwrap();
        let varied = surface.frame().chunks_exact(4).any(|px| px != first.as_slice());
        assert!(varied, "{id:?} drew a blank frame");
    }
}
