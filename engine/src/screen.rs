//! Screen lifecycle contract and the router that owns navigation between screens.
//!
//! Screens never mutate navigation state themselves. They return a [`Nav`] from event handling
//! and updates, and the router applies it once the screen call has returned.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::app::FrameApp;
use crate::graphics::Renderer2d;
use crate::input::PointerEvent;

/// Navigation request returned by a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nav<Id> {
    #[default]
    Stay,
    GoTo(Id),
    Back,
}

pub trait Screen<Id> {
    /// Called every time the screen becomes current. Must reset all per-visit state.
    fn on_enter(&mut self) {}

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<Id>;

    fn update(&mut self, dt: f32) -> Nav<Id>;

    fn draw(&self, gfx: &mut dyn Renderer2d);
}

pub struct Router<Id> {
    registry: HashMap<Id, Box<dyn Screen<Id>>>,
    current: Id,
    history: Vec<Id>,
}

impl<Id: Copy + Eq + Hash + Debug> Router<Id> {
    pub fn new(root: Id) -> Self {
        Self {
            registry: HashMap::new(),
            current: root,
            history: Vec::new(),
        }
    }

    /// Inserts or replaces the screen for `id`.
    pub fn register(&mut self, id: Id, screen: Box<dyn Screen<Id>>) {
        self.registry.insert(id, screen);
    }

    pub fn current(&self) -> Id {
        self.current
    }

    pub fn history(&self) -> &[Id] {
        &self.history
    }

    pub fn go_to(&mut self, id: Id) {
        self.history.push(self.current);
        tracing::debug!(from = ?self.current, to = ?id, depth = self.history.len(), "go_to");
        self.current = id;
        self.enter_current();
    }

    /// Pops one level of history; a no-op at the root.
    pub fn go_back(&mut self) {
        let Some(prev) = self.history.pop() else {
            return;
        };
        tracing::debug!(from = ?self.current, to = ?prev, depth = self.history.len(), "go_back");
        self.current = prev;
        self.enter_current();
    }

    /// Runs the current screen's enter hook without navigating; used once at startup.
    pub fn enter_current(&mut self) {
        if let Some(screen) = self.registry.get_mut(&self.current) {
            screen.on_enter();
        }
    }

    pub fn apply(&mut self, nav: Nav<Id>) {
        match nav {
            Nav::Stay => {}
            Nav::GoTo(id) => self.go_to(id),
            Nav::Back => self.go_back(),
        }
    }

    pub fn handle_event(&mut self, event: &PointerEvent) {
        let nav = match self.registry.get_mut(&self.current) {
            Some(screen) => screen.handle_event(event),
            None => Nav::Stay,
        };
        self.apply(nav);
    }

    pub fn update(&mut self, dt: f32) {
        let nav = match self.registry.get_mut(&self.current) {
            Some(screen) => screen.update(dt),
            None => Nav::Stay,
        };
        self.apply(nav);
    }

    pub fn draw(&self, gfx: &mut dyn Renderer2d) {
        if let Some(screen) = self.registry.get(&self.current) {
            screen.draw(gfx);
        }
    }
}

impl<Id: Copy + Eq + Hash + Debug> FrameApp for Router<Id> {
    fn handle_input(&mut self, event: &PointerEvent) {
        self.handle_event(event);
    }

    fn update(&mut self, dt: f32) {
        Router::update(self, dt);
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        self.draw(gfx);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ui::Vec2;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Id {
        A,
        B,
        C,
    }

    #[derive(Default)]
    struct Log {
        entered: Vec<Id>,
        events: Vec<Id>,
        updates: Vec<Id>,
    }

    struct Probe {
        id: Id,
        log: Rc<RefCell<Log>>,
        on_tap: Nav<Id>,
    }

    impl Screen<Id> for Probe {
        fn on_enter(&mut self) {
            self.log.borrow_mut().entered.push(self.id);
        }

        fn handle_event(&mut self, _event: &PointerEvent) -> Nav<Id> {
            self.log.borrow_mut().events.push(self.id);
            self.on_tap
        }

        fn update(&mut self, _dt: f32) -> Nav<Id> {
            self.log.borrow_mut().updates.push(self.id);
            Nav::Stay
        }

        fn draw(&self, _gfx: &mut dyn Renderer2d) {}
    }

    fn router_with(ids: &[(Id, Nav<Id>)]) -> (Router<Id>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut router = Router::new(Id::A);
        for &(id, on_tap) in ids {
            router.register(
                id,
                Box::new(Probe {
                    id,
                    log: Rc::clone(&log),
                    on_tap,
                }),
            );
        }
        (router, log)
    }

    #[test]
    fn go_to_then_back_returns_to_root_with_empty_history() {
        let (mut router, log) = router_with(&[(Id::A, Nav::Stay), (Id::B, Nav::Stay)]);

        router.go_to(Id::B);
        assert_eq!(router.current(), Id::B);
        assert_eq!(router.history(), &[Id::A]);

        router.go_back();
        assert_eq!(router.current(), Id::A);
        assert!(router.history().is_empty());
        assert_eq!(log.borrow().entered, vec![Id::B, Id::A]);
    }

    #[test]
    fn go_back_at_root_is_a_noop() {
        let (mut router, log) = router_with(&[(Id::A, Nav::Stay)]);
        router.go_back();
        assert_eq!(router.current(), Id::A);
        assert!(router.history().is_empty());
        assert!(log.borrow().entered.is_empty());
    }

    #[test]
    fn history_keeps_duplicates() {
        let (mut router, _log) = router_with(&[(Id::A, Nav::Stay), (Id::B, Nav::Stay)]);
        router.go_to(Id::B);
        router.go_to(Id::A);
        router.go_to(Id::B);
        assert_eq!(router.history(), &[Id::A, Id::B, Id::A]);
    }

    #[test]
    fn nav_returned_from_event_is_applied_after_dispatch() {
        let (mut router, log) = router_with(&[(Id::A, Nav::GoTo(Id::B)), (Id::B, Nav::Back)]);

        router.handle_event(&PointerEvent::Down(Vec2::ZERO));
        assert_eq!(router.current(), Id::B);

        router.handle_event(&PointerEvent::Down(Vec2::ZERO));
        assert_eq!(router.current(), Id::A);
        assert_eq!(log.borrow().events, vec![Id::A, Id::B]);
    }

    #[test]
    fn missing_screen_is_silently_ignored() {
        let (mut router, log) = router_with(&[(Id::A, Nav::Stay)]);
        router.go_to(Id::C);
        assert_eq!(router.current(), Id::C);

        router.handle_event(&PointerEvent::Down(Vec2::ZERO));
        router.update(0.016);
        assert!(log.borrow().events.is_empty());
        assert!(log.borrow().updates.is_empty());

        router.go_back();
        assert_eq!(router.current(), Id::A);
    }

    #[test]
    fn register_overwrites_existing_entry() {
        let (mut router, log) = router_with(&[(Id::A, Nav::Stay)]);
        let other = Rc::new(RefCell::new(Log::default()));
        router.register(
            Id::A,
            Box::new(Probe {
                id: Id::A,
                log: Rc::clone(&other),
                on_tap: Nav::Stay,
            }),
        );
        router.update(0.016);
        assert!(log.borrow().updates.is_empty());
        assert_eq!(other.borrow().updates, vec![Id::A]);
    }
}
