//! The main API to the display driver. A `Display` owns the interface and the `Canvas` that is
//! drawn into, and moves the canvas content to the panel on `flush`.

mod flush;

use log::{debug, warn};

use crate::canvas::Canvas;
use crate::command::{ComScanDirection, Command};
use crate::config::Config;
use crate::error::{ConfigError, Error};
use crate::interface::DisplayInterface;

/// A driver for an SSD1306 or SH1106 display.
pub struct Display<DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    canvas: Canvas,
    config: Config,
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Construct a display driver for the panel described by `config`, connected to `iface`.
    /// Nothing is transmitted until `init`.
    pub fn new(iface: DI, config: Config) -> Result<Self, ConfigError> {
        config.geometry.validate(config.controller)?;
        Ok(Display {
            iface,
            canvas: Canvas::new(config.geometry),
            config,
        })
    }

    /// Connect the interface, send the power-up sequence and blank the panel.
    ///
    /// A failing `connect` is reported and nothing is sent. There is no retry, calling `init`
    /// again is up to the caller.
    pub fn init(&mut self) -> Result<(), Error<DI::Error>> {
        if let Err(e) = self.iface.connect() {
            warn!("display interface failed to connect");
            return Err(Error::Interface(e));
        }
        self.config.send(&mut self.iface)?;
        self.reset_display()
    }

    /// Turn the panel off, clear both the canvas and the panel RAM, and turn it back on.
    pub fn reset_display(&mut self) -> Result<(), Error<DI::Error>> {
        self.display_off()?;
        self.canvas.clear();
        self.flush_full()?;
        self.display_on()
    }

    pub fn display_on(&mut self) -> Result<(), Error<DI::Error>> {
        Command::DisplayOn.send(&mut self.iface)
    }

    pub fn display_off(&mut self) -> Result<(), Error<DI::Error>> {
        Command::DisplayOff.send(&mut self.iface)
    }

    /// Show lit pixels dark and dark pixels lit. The canvas is not touched.
    pub fn invert_display(&mut self) -> Result<(), Error<DI::Error>> {
        Command::Invert(true).send(&mut self.iface)
    }

    pub fn normal_display(&mut self) -> Result<(), Error<DI::Error>> {
        Command::Invert(false).send(&mut self.iface)
    }

    /// Set contrast together with the precharge period and VCOMH level, which both need lowering
    /// to get a visibly dimmer panel.
    pub fn set_contrast(
        &mut self,
        contrast: u8,
        precharge: u8,
        comdetect: u8,
    ) -> Result<(), Error<DI::Error>> {
        Command::Precharge(precharge).send(&mut self.iface)?;
        Command::Contrast(contrast).send(&mut self.iface)?;
        Command::VcomDetect(comdetect).send(&mut self.iface)?;
        Command::EntireDisplayOn(false).send(&mut self.iface)?;
        Command::Invert(false).send(&mut self.iface)?;
        Command::DisplayOn.send(&mut self.iface)
    }

    /// Map a single brightness level onto `set_contrast` so that the whole range fades smoothly.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), Error<DI::Error>> {
        let scaled = brightness as u32 * 1171 / 1000;
        let contrast = if brightness < 128 { scaled } else { scaled - 43 };
        let precharge = if brightness == 0 { 0 } else { 241 };
        debug!("brightness {} -> contrast {}", brightness, contrast);
        self.set_contrast(contrast as u8, precharge, brightness / 8)
    }

    /// Undo `flip_screen_vertically` and `mirror_screen`.
    pub fn reset_orientation(&mut self) -> Result<(), Error<DI::Error>> {
        Command::SegmentRemap(false).send(&mut self.iface)?;
        Command::ComScanDirection(ComScanDirection::Normal).send(&mut self.iface)
    }

    /// Turn the image upside down.
    pub fn flip_screen_vertically(&mut self) -> Result<(), Error<DI::Error>> {
        Command::SegmentRemap(true).send(&mut self.iface)?;
        Command::ComScanDirection(ComScanDirection::Remapped).send(&mut self.iface)
    }

    /// Mirror the image, for panels viewed through a mirror or projected.
    pub fn mirror_screen(&mut self) -> Result<(), Error<DI::Error>> {
        Command::SegmentRemap(false).send(&mut self.iface)?;
        Command::ComScanDirection(ComScanDirection::Remapped).send(&mut self.iface)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Clear the canvas. The panel keeps its content until the next flush.
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    pub fn width(&self) -> u16 {
        self.canvas.width()
    }

    pub fn height(&self) -> u16 {
        self.canvas.height()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }
}
