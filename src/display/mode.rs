use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// What the panel is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Data,
    Photo,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Data => "Data",
            DisplayMode::Photo => "Photo",
        }
    }

    fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            DisplayMode::Data
        } else {
            DisplayMode::Photo
        }
    }
}

/// Mode flag shared between the button callback and the display loop.
///
/// Both sides touch single atomics only: the button flips the mode bit and
/// raises the forced-refresh flag, the display loop reads the mode and
/// consumes the flag once per tick. A press landing mid-tick is picked up on
/// the next one; last write wins and nothing blocks the input callback.
#[derive(Debug, Clone, Default)]
pub struct ModeSwitch {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    mode: AtomicU8,
    forced: AtomicBool,
}

impl ModeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        DisplayMode::from_bit(self.inner.mode.load(Ordering::Relaxed))
    }

    /// Flips between `Data` and `Photo` and forces a refresh regardless of
    /// whether the data on screen changed. Returns the new mode.
    pub fn toggle(&self) -> DisplayMode {
        let previous = self.inner.mode.fetch_xor(1, Ordering::Relaxed);
        self.inner.forced.store(true, Ordering::Release);
        DisplayMode::from_bit(previous ^ 1)
    }

    pub fn take_forced(&self) -> bool {
        self.inner.forced.swap(false, Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_data_mode_with_no_forced_refresh() {
        let switch = ModeSwitch::new();

        assert_eq!(switch.mode(), DisplayMode::Data);
        assert!(!switch.take_forced());
    }

    #[test]
    fn toggle_flips_mode_and_forces_exactly_one_refresh() {
        let switch = ModeSwitch::new();

        assert_eq!(switch.toggle(), DisplayMode::Photo);
        assert_eq!(switch.mode(), DisplayMode::Photo);
        assert!(switch.take_forced());
        assert!(!switch.take_forced());

        assert_eq!(switch.toggle(), DisplayMode::Data);
        assert_eq!(switch.mode(), DisplayMode::Data);
    }

    #[test]
    fn clones_share_the_same_flag() {
        let switch = ModeSwitch::new();
        let other = switch.clone();

        switch.toggle();

        assert_eq!(other.mode(), DisplayMode::Photo);
        assert!(other.take_forced());
    }
}
