use anyhow::Result;

use crate::display::Canvas;

/// An attached e-paper panel.
///
/// Implemented outside the core for whichever panel is wired up (the station
/// targets a 4.2 inch 400x300 module) and injected at startup. With no driver
/// attached the display loop writes each frame to a debug PNG instead.
pub trait DisplayDriver: Send {
    fn init(&mut self) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// Converts a frame into the panel's device buffer. The default is the
    /// canvas's own row-packed layout, which most 1-bit panels take as-is.
    fn frame(&self, canvas: &Canvas) -> Vec<u8> {
        canvas.packed_rows().to_vec()
    }

    fn display(&mut self, frame: &[u8]) -> Result<()>;

    /// Puts the panel into deep sleep between sessions to avoid burn-in.
    fn sleep(&mut self) -> Result<()>;

    fn power_down(&mut self) -> Result<()>;
}
