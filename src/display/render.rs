use std::convert::Infallible;
use std::path::Path;

use anyhow::{Context as _, Result};
use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_9X15, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text},
};
use image::{GrayImage, imageops::FilterType};
use log::warn;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::reading::SensorReading;

const ROW_BYTES: usize = DISPLAY_WIDTH.div_ceil(8) as usize;
const HEADER_HEIGHT: u32 = 40;
const DIVIDER_Y: i32 = 240;

/// One full frame for the e-paper panel: 400x300, 1 bit per pixel,
/// row-packed MSB first. A set bit is black ink on white paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    bits: Vec<u8>,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            bits: vec![0; ROW_BYTES * DISPLAY_HEIGHT as usize],
        }
    }

    pub fn set(&mut self, x: u32, y: u32, black: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }
        let byte = y as usize * ROW_BYTES + x as usize / 8;
        let mask = 0x80 >> (x % 8);
        if black {
            self.bits[byte] |= mask;
        } else {
            self.bits[byte] &= !mask;
        }
    }

    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let byte = y as usize * ROW_BYTES + x as usize / 8;
        self.bits[byte] & (0x80 >> (x % 8)) != 0
    }

    /// Raw row-packed pixel data, the default device buffer format.
    pub fn packed_rows(&self) -> &[u8] {
        &self.bits
    }

    /// Thresholds a grayscale image of panel size into a frame.
    pub fn from_gray(image: &GrayImage) -> Self {
        let mut canvas = Canvas::new();
        for (x, y, pixel) in image.enumerate_pixels() {
            canvas.set(x, y, pixel.0[0] < 128);
        }
        canvas
    }

    fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(DISPLAY_WIDTH, DISPLAY_HEIGHT, |x, y| {
            image::Luma([if self.is_black(x, y) { 0 } else { 255 }])
        })
    }

    /// Writes the frame as a PNG, the debug sink used when no panel driver
    /// is attached.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_gray_image()
            .save(path)
            .with_context(|| format!("failed to write frame to {path:?}"))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }
}

/// Draws the sensor dashboard: header band with title and timestamp, the
/// PM2.5 tile, the VOC tile, a temperature/humidity line, then a divider and
/// the status line.
pub fn render_data(reading: &SensorReading) -> Canvas {
    let mut canvas = Canvas::new();

    let title = MonoTextStyle::new(&FONT_10X20, BinaryColor::Off);
    let label = MonoTextStyle::new(&FONT_9X15, BinaryColor::On);
    let value = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let small_inverted = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);

    Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH, HEADER_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut canvas)
        .ok();
    Text::with_baseline("AeroInk Station", Point::new(10, 10), title, Baseline::Top)
        .draw(&mut canvas)
        .ok();
    let timestamp = reading.timestamp.as_deref().unwrap_or("--:--");
    Text::with_baseline(
        timestamp,
        Point::new(DISPLAY_WIDTH as i32 - 150, 12),
        small_inverted,
        Baseline::Top,
    )
    .draw(&mut canvas)
    .ok();

    Text::with_baseline("PM2.5", Point::new(20, 60), label, Baseline::Top)
        .draw(&mut canvas)
        .ok();
    Text::with_baseline(
        &format!("{:.1}", reading.pm2_5),
        Point::new(20, 90),
        value,
        Baseline::Top,
    )
    .draw(&mut canvas)
    .ok();
    Text::with_baseline("ug/m3", Point::new(120, 105), small, Baseline::Top)
        .draw(&mut canvas)
        .ok();

    Text::with_baseline("VOC Index", Point::new(200, 60), label, Baseline::Top)
        .draw(&mut canvas)
        .ok();
    Text::with_baseline(
        &format!("{:.0}", reading.voc_index),
        Point::new(200, 90),
        value,
        Baseline::Top,
    )
    .draw(&mut canvas)
    .ok();

    Text::with_baseline(
        &format!("Temp: {:.1} C", reading.temperature),
        Point::new(20, 160),
        label,
        Baseline::Top,
    )
    .draw(&mut canvas)
    .ok();
    Text::with_baseline(
        &format!("Humidity: {:.1} %", reading.humidity),
        Point::new(200, 160),
        label,
        Baseline::Top,
    )
    .draw(&mut canvas)
    .ok();

    Line::new(
        Point::new(0, DIVIDER_Y),
        Point::new(DISPLAY_WIDTH as i32 - 1, DIVIDER_Y),
    )
    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
    .draw(&mut canvas)
    .ok();
    Text::with_baseline(
        &format!("Status: {}", reading.status),
        Point::new(10, 250),
        small,
        Baseline::Top,
    )
    .draw(&mut canvas)
    .ok();

    canvas
}

/// Draws the uploaded art, resized to panel resolution and thresholded to
/// 1 bit. Any missing or undecodable resource degrades to the placeholder
/// frame; this never fails past the renderer.
pub fn render_photo(art_path: &Path) -> Canvas {
    if !art_path.exists() {
        return placeholder();
    }

    match load_art(art_path) {
        Ok(canvas) => canvas,
        Err(err) => {
            warn!("failed to load art image: {err:#}");
            placeholder()
        }
    }
}

fn load_art(path: &Path) -> Result<Canvas> {
    let img = image::open(path).with_context(|| format!("failed to decode art at {path:?}"))?;
    let resized = img.resize_exact(DISPLAY_WIDTH, DISPLAY_HEIGHT, FilterType::Lanczos3);
    Ok(Canvas::from_gray(&resized.to_luma8()))
}

fn placeholder() -> Canvas {
    let mut canvas = Canvas::new();
    let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);

    Text::with_alignment(
        "No Image Uploaded",
        Point::new(DISPLAY_WIDTH as i32 / 2, DISPLAY_HEIGHT as i32 / 2),
        style,
        Alignment::Center,
    )
    .draw(&mut canvas)
    .ok();

    canvas
}
