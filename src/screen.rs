//! Paints the panel: header, topic value, and the fan status block.
//!
//! Drawing is generic over any `DrawTarget<Color = Rgb565>` so the same code
//! runs against the ST7735 and against a plain framebuffer in tests.

use crate::{carousel::Page, fan::FanLevel, readings::Readings};
use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};

// 160x80 landscape layout, top-left origin. Text points are baselines.
const HEADER_ORIGIN: Point = Point::new(2, 12);
const VALUE_ORIGIN: Point = Point::new(2, 38);
const STATUS_LABEL_ORIGIN: Point = Point::new(2, 62);
const STATUS_VALUE_ORIGIN: Point = Point::new(2, 75);
// Cleared before a partial status redraw so stale digits don't linger.
const STATUS_REGION: Rectangle = Rectangle::new(Point::new(0, 52), Size::new(160, 28));

const HEADER_INSIDE: &str = "Temp INSIDE:";
const HEADER_OUTSIDE: &str = "Temp OUTSIDE:";
const STATUS_LABEL: &str = "Fan01 Speed:";

/// One full repaint of the panel.
pub struct Frame<'a> {
    pub header: &'static str,
    pub value: &'a str,
    pub fan: FanLevel,
}

impl<'a> Frame<'a> {
    pub fn compose(page: Page, readings: &'a Readings, fan: FanLevel) -> Self {
        let header = match page {
            Page::Inside => HEADER_INSIDE,
            Page::Outside => HEADER_OUTSIDE,
        };
        Frame {
            header,
            value: readings.value(page),
            fan,
        }
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(Rgb565::BLACK)?;
        Text::new(
            self.header,
            HEADER_ORIGIN,
            MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE),
        )
        .draw(target)?;
        Text::new(
            self.value,
            VALUE_ORIGIN,
            MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE),
        )
        .draw(target)?;
        draw_fan_status(self.fan, target)
    }
}

/// The fan status block, shared between the full repaint and the button
/// handler's partial redraw.
pub fn draw_fan_status<D>(fan: FanLevel, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    STATUS_REGION
        .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
        .draw(target)?;
    let style = MonoTextStyle::new(&FONT_6X10, Rgb565::CSS_VIOLET);
    Text::new(STATUS_LABEL, STATUS_LABEL_ORIGIN, style).draw(target)?;
    let speed = fan.as_text();
    Text::new(speed.as_str(), STATUS_VALUE_ORIGIN, style).draw(target)?;
    Ok(())
}

/// Solid fill shown from power-on until the first carousel flip.
pub fn draw_splash<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(Rgb565::CSS_SKY_BLUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        framebuffer::{Framebuffer, buffer_size},
        pixelcolor::raw::{LittleEndian, RawU16},
    };

    type TestPanel =
        Framebuffer<Rgb565, RawU16, LittleEndian, 160, 80, { buffer_size::<Rgb565>(160, 80) }>;

    fn readings_with(inside: &[u8], outside: &[u8]) -> Readings {
        let mut readings = Readings::new("/in", "/out");
        readings.record("/in", inside);
        readings.record("/out", outside);
        readings
    }

    #[test]
    fn composes_the_inside_page() {
        let readings = readings_with(b"23.5", b"-4.0");
        let frame = Frame::compose(Page::Inside, &readings, FanLevel::Low);
        assert_eq!(frame.header, "Temp INSIDE:");
        assert_eq!(frame.value, "23.5");
    }

    #[test]
    fn composes_the_outside_page() {
        let readings = readings_with(b"23.5", b"-4.0");
        let frame = Frame::compose(Page::Outside, &readings, FanLevel::High);
        assert_eq!(frame.header, "Temp OUTSIDE:");
        assert_eq!(frame.value, "-4.0");
    }

    #[test]
    fn a_full_repaint_leaves_visible_pixels() {
        let readings = readings_with(b"23.5", b"-4.0");
        let mut panel = TestPanel::new();
        Frame::compose(Page::Inside, &readings, FanLevel::Low)
            .draw(&mut panel)
            .unwrap();
        assert!(panel.data().iter().any(|&byte| byte != 0));
    }

    #[test]
    fn the_status_block_can_be_redrawn_on_its_own() {
        let readings = readings_with(b"23.5", b"-4.0");
        let mut panel = TestPanel::new();
        Frame::compose(Page::Inside, &readings, FanLevel::Low)
            .draw(&mut panel)
            .unwrap();
        let after_full = panel.data().to_vec();
        // Redraw with the other level; only the status region may change.
        draw_fan_status(FanLevel::High, &mut panel).unwrap();
        let after_partial = panel.data().to_vec();
        assert_ne!(after_full, after_partial);
        // Bytes above the status region are untouched (rows 0..52).
        let row_bytes = 160 * 2;
        assert_eq!(
            &after_full[..52 * row_bytes],
            &after_partial[..52 * row_bytes]
        );
    }

    #[test]
    fn the_splash_fills_the_panel() {
        let mut panel = TestPanel::new();
        draw_splash(&mut panel).unwrap();
        assert!(panel.data().iter().all(|&byte| byte != 0));
    }
}
