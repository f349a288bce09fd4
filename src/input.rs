use log::info;

use crate::display::ModeSwitch;

/// A momentary input such as the panel's touch button.
///
/// Implemented outside the core (GPIO on the Pi) and injected at startup.
/// The capability owns debouncing; the handler fires once per discrete
/// press and must not block.
pub trait PressInput {
    fn set_pressed_handler(&mut self, handler: Box<dyn Fn() + Send + Sync>);
}

/// Wires a press input to the display mode switch: every press flips
/// between `Data` and `Photo` and forces a refresh on the next display tick.
pub struct ModeInputAdapter;

impl ModeInputAdapter {
    pub fn attach(input: &mut dyn PressInput, mode: ModeSwitch) {
        input.set_pressed_handler(Box::new(move || {
            let switched_to = mode.toggle();
            info!("switched to {} mode", switched_to.as_str());
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayMode;

    #[derive(Default)]
    struct MockButton {
        handler: Option<Box<dyn Fn() + Send + Sync>>,
    }

    impl MockButton {
        fn press(&self) {
            if let Some(handler) = &self.handler {
                handler();
            }
        }
    }

    impl PressInput for MockButton {
        fn set_pressed_handler(&mut self, handler: Box<dyn Fn() + Send + Sync>) {
            self.handler = Some(handler);
        }
    }

    #[test]
    fn one_press_flips_the_mode_exactly_once_and_forces_a_refresh() {
        let mut button = MockButton::default();
        let mode = ModeSwitch::new();
        ModeInputAdapter::attach(&mut button, mode.clone());

        button.press();

        assert_eq!(mode.mode(), DisplayMode::Photo);
        assert!(mode.take_forced());
        assert!(!mode.take_forced());
    }

    #[test]
    fn presses_alternate_between_the_two_modes() {
        let mut button = MockButton::default();
        let mode = ModeSwitch::new();
        ModeInputAdapter::attach(&mut button, mode.clone());

        button.press();
        button.press();
        assert_eq!(mode.mode(), DisplayMode::Data);

        button.press();
        assert_eq!(mode.mode(), DisplayMode::Photo);
    }
}
