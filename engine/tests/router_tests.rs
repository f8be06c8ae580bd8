use engine::graphics::Renderer2d;
use engine::input::PointerEvent;
use engine::screen::{Nav, Router, Screen};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Id {
    Root,
    A,
    B,
    C,
}

struct Blank;

impl Screen<Id> for Blank {
    fn handle_event(&mut self, _event: &PointerEvent) -> Nav<Id> {
        Nav::Stay
    }

    fn update(&mut self, _dt: f32) -> Nav<Id> {
        Nav::Stay
    }

    fn draw(&self, _gfx: &mut dyn Renderer2d) {}
}

fn router() -> Router<Id> {
    let mut r = Router::new(Id::Root);
    for id in [Id::Root, Id::A, Id::B] {
        r.register(id, Box::new(Blank));
    }
    // `C` is deliberately left unregistered.
    r
}

#[derive(Debug, Clone, Copy)]
enum Op {
    GoTo(Id),
    Back,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Back),
        Just(Op::GoTo(Id::Root)),
        Just(Op::GoTo(Id::A)),
        Just(Op::GoTo(Id::B)),
        Just(Op::GoTo(Id::C)),
    ]
}

proptest! {
    #[test]
    fn router_follows_stack_discipline(ops in proptest::collection::vec(op(), 0..64)) {
        let mut r = router();
        let mut model: Vec<Id> = Vec::new();
        let mut current = Id::Root;

        for op in ops {
            match op {
                Op::GoTo(id) => {
                    model.push(current);
                    current = id;
                    r.go_to(id);
                }
                Op::Back => {
                    let before = r.current();
                    r.go_back();
                    match model.pop() {
                        Some(prev) => current = prev,
                        None => prop_assert_eq!(r.current(), before),
                    }
                }
            }
            prop_assert_eq!(r.current(), current);
            prop_assert_eq!(r.history(), model.as_slice());
        }
    }

    #[test]
    fn back_undoes_the_most_recent_go_to(prefix in proptest::collection::vec(op(), 0..16), target in 0u8..4) {
        let mut r = router();
        for op in prefix {
            match op {
                Op::GoTo(id) => r.go_to(id),
                Op::Back => r.go_back(),
            }
        }
        let before = r.current();
        let depth = r.history().len();
        let target = [Id::Root, Id::A, Id::B, Id::C][target as usize];

        r.go_to(target);
        r.go_back();
        prop_assert_eq!(r.current(), before);
        prop_assert_eq!(r.history().len(), depth);
    }
}

#[test]
fn go_to_then_back_leaves_root_and_empty_history() {
    let mut r = router();
    r.go_to(Id::B);
    r.go_back();
    assert_eq!(r.current(), Id::Root);
    assert!(r.history().is_empty());
}
