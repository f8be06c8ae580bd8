pub mod catalog;
pub mod remote;
pub mod screens;
pub mod settings;
pub mod video;
pub mod widgets;

use std::cell::RefCell;
use std::rc::Rc;

use engine::assets::ImageCache;
use engine::screen::Router;

use crate::remote::RemoteSender;
use crate::video::VideoPlayer;

/// Logical screen size every layout is written against.
pub const SCREEN_W: i32 = 720;
pub const SCREEN_H: i32 = 720;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    MainMenu,
    GamesMenu,
    BubblePop,
    FingerPaint,
    ShapeSorter,
    WhackACritter,
    MagicGarden,
    Fireworks,
    ParticlePlayground,
    WeatherToy,
    Shows,
    Remote,
    Videos,
}

impl ScreenId {
    pub const ALL: [ScreenId; 13] = [
        ScreenId::MainMenu,
        ScreenId::GamesMenu,
        ScreenId::BubblePop,
        ScreenId::FingerPaint,
        ScreenId::ShapeSorter,
        ScreenId::WhackACritter,
        ScreenId::MagicGarden,
        ScreenId::Fireworks,
        ScreenId::ParticlePlayground,
        ScreenId::WeatherToy,
        ScreenId::Shows,
        ScreenId::Remote,
        ScreenId::Videos,
    ];
}

/// Everything the screens borrow from the outside world.
pub struct Services {
    pub remote: Rc<dyn RemoteSender>,
    pub player: Rc<dyn VideoPlayer>,
    pub images: Rc<RefCell<ImageCache>>,
    pub videos: Vec<catalog::VideoEntry>,
}

/// The full screen tree with [`ScreenId::MainMenu`] as root.
pub fn build_router(services: &Services) -> Router<ScreenId> {
    use screens::*;

    let mut router = Router::new(ScreenId::MainMenu);
    router.register(ScreenId::MainMenu, Box::new(MainMenu::new()));
    router.register(ScreenId::GamesMenu, Box::new(GamesMenu::new()));
    router.register(ScreenId::BubblePop, Box::new(BubblePop::new()));
    router.register(ScreenId::FingerPaint, Box::new(FingerPaint::new()));
    router.register(ScreenId::ShapeSorter, Box::new(ShapeSorter::new()));
    router.register(ScreenId::WhackACritter, Box::new(WhackACritter::new()));
    router.register(ScreenId::MagicGarden, Box::new(MagicGarden::new()));
    router.register(ScreenId::Fireworks, Box::new(Fireworks::new()));
    router.register(
        ScreenId::ParticlePlayground,
        Box::new(ParticlePlayground::new()),
    );
    router.register(ScreenId::WeatherToy, Box::new(WeatherToy::new()));
    router.register(
        ScreenId::Shows,
        Box::new(Shows::new(services.remote.clone(), services.images.clone())),
    );
    router.register(ScreenId::Remote, Box::new(Remote::new(services.remote.clone())));
    router.register(
        ScreenId::Videos,
        Box::new(Videos::new(services.player.clone(), services.videos.clone())),
    );
    router.enter_current();
    router
}
