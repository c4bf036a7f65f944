use nagsim::engine::EngineModel;
use nagsim::frames::{Ewm230, Ms308, SelectorRange};
use nagsim::gearbox::VirtualGearbox;
use nagsim::{Ecu, GearSelector, MoveDir, TickContext};

fn tick(selector: &mut GearSelector) {
    let mut engine = EngineModel::default();
    let mut gearbox = VirtualGearbox::new();
    let mut ctx = TickContext {
        ms308: Ms308::default(),
        ewm230: selector.frames(),
        engine: &mut engine,
        gearbox: &mut gearbox,
    };
    selector.simulate_tick(&mut ctx);
}

fn push(selector: &mut GearSelector, dir: MoveDir) -> SelectorRange {
    selector.apply_force(dir);
    tick(selector);
    selector.frames().range
}

#[cfg(test)]
mod lever_tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let mut selector = GearSelector::new();
        selector.setup();
        assert_eq!(selector.position(), SelectorRange::Park);
        assert!(!selector.button_pressed());
        assert_eq!(selector.move_dir(), MoveDir::None);
        assert_eq!(selector.frames(), Ewm230::default());
    }

    #[test]
    fn test_down_walks_the_gate() {
        let mut selector = GearSelector::new();
        assert_eq!(push(&mut selector, MoveDir::Down), SelectorRange::Reverse);
        assert_eq!(push(&mut selector, MoveDir::Down), SelectorRange::Neutral);
        assert_eq!(push(&mut selector, MoveDir::Down), SelectorRange::Drive);
        assert_eq!(push(&mut selector, MoveDir::Down), SelectorRange::Drive);
    }

    #[test]
    fn test_up_walks_back_to_park() {
        let mut selector = GearSelector::new();
        selector.set_position(SelectorRange::Drive);
        assert_eq!(push(&mut selector, MoveDir::Up), SelectorRange::Neutral);
        assert_eq!(push(&mut selector, MoveDir::Up), SelectorRange::Reverse);
        assert_eq!(push(&mut selector, MoveDir::Up), SelectorRange::Park);
        assert_eq!(push(&mut selector, MoveDir::Up), SelectorRange::Park);
    }

    #[test]
    fn test_vertical_move_applies_once() {
        let mut selector = GearSelector::new();
        selector.apply_force(MoveDir::Down);
        tick(&mut selector);
        tick(&mut selector);
        tick(&mut selector);
        assert_eq!(selector.position(), SelectorRange::Reverse);
        assert_eq!(selector.move_dir(), MoveDir::None);
    }

    #[test]
    fn test_tip_positions_held_then_spring_back() {
        let mut selector = GearSelector::new();
        selector.set_position(SelectorRange::Drive);

        assert_eq!(push(&mut selector, MoveDir::Right), SelectorRange::Plus);
        tick(&mut selector);
        tick(&mut selector);
        assert_eq!(selector.frames().range, SelectorRange::Plus);

        assert_eq!(push(&mut selector, MoveDir::None), SelectorRange::Drive);
        assert_eq!(push(&mut selector, MoveDir::Left), SelectorRange::Minus);
        assert_eq!(push(&mut selector, MoveDir::None), SelectorRange::Drive);
    }

    #[test]
    fn test_tip_outside_drive_column_ignored() {
        let mut selector = GearSelector::new();
        assert_eq!(push(&mut selector, MoveDir::Right), SelectorRange::Park);
        assert_eq!(push(&mut selector, MoveDir::Left), SelectorRange::Park);
    }

    #[test]
    fn test_not_valid_ignores_movement() {
        let mut selector = GearSelector::new();
        selector.set_position(SelectorRange::SportNonValid);
        assert_eq!(push(&mut selector, MoveDir::Down), SelectorRange::SportNonValid);
        assert_eq!(push(&mut selector, MoveDir::Up), SelectorRange::SportNonValid);

        selector.set_position(SelectorRange::Neutral);
        assert_eq!(push(&mut selector, MoveDir::Down), SelectorRange::Drive);
    }
}

#[cfg(test)]
mod button_tests {
    use super::*;

    #[test]
    fn test_button_published_on_tick() {
        let mut selector = GearSelector::new();
        selector.press_button();
        assert!(selector.button_pressed());
        assert!(!selector.frames().program_button);

        tick(&mut selector);
        assert!(selector.frames().program_button);

        selector.release_button();
        tick(&mut selector);
        assert!(!selector.frames().program_button);
    }

    #[test]
    fn test_tick_counter() {
        let mut selector = GearSelector::new();
        for _ in 0..4 {
            tick(&mut selector);
        }
        assert_eq!(selector.sim_ticks(), 4);

        selector.setup();
        assert_eq!(selector.sim_ticks(), 0);
    }
}
