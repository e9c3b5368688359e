//! Panel and paging configuration. Builder methods consume and return the config, so a
//! configuration reads as one declarative expression.

use log::debug;

use crate::buffer::BUFFER_CAPACITY;
use crate::command::{self, Command, ComScanDirection, MemoryMode};
use crate::error::{ConfigError, Error};
use crate::interface::DisplayInterface;
use crate::ui::indicator::{IndicatorDirection, IndicatorPosition};
use crate::ui::AnimationDirection;

/// Fewest COM lines the multiplex ratio accepts.
const MIN_HEIGHT: u16 = 16;

/// Panel resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Geometry {
    W128H64,
    W128H32,
    W64H48,
    W64H32,
    /// Any other size that fits the controller RAM and the pixel buffer.
    Custom { width: u16, height: u16 },
}

impl Geometry {
    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u16, u16) {
        match *self {
            Geometry::W128H64 => (128, 64),
            Geometry::W128H32 => (128, 32),
            Geometry::W64H48 => (64, 48),
            Geometry::W64H32 => (64, 32),
            Geometry::Custom { width, height } => (width, height),
        }
    }

    /// Reject sizes `controller` cannot drive (fewer than 16 COM lines) or address, and sizes
    /// whose buffer would exceed `BUFFER_CAPACITY`.
    pub fn validate(&self, controller: Controller) -> Result<(), ConfigError> {
        let (width, height) = self.size();
        let pages = (height as usize + 7) / 8;
        if width == 0
            || height < MIN_HEIGHT
            || width > controller.columns()
            || height > command::ROW_MAX as u16 + 1
            || pages * width as usize > BUFFER_CAPACITY
        {
            return Err(ConfigError::Geometry);
        }
        Ok(())
    }

    fn default_com_pins(&self) -> u8 {
        match *self {
            Geometry::W128H32 => 0x02,
            _ => 0x12,
        }
    }

    fn default_contrast(&self) -> u8 {
        match *self {
            Geometry::W128H64 => 0xCF,
            _ => 0x8F,
        }
    }
}

/// Which controller the panel carries. They share the command set but differ in RAM
/// addressing: the SH1106 has 132 columns with the panel centered on them and no column/page
/// window commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Controller {
    Ssd1306,
    Sh1106,
}

impl Controller {
    /// Columns of display RAM. Narrower panels sit in the middle of them.
    pub fn columns(self) -> u16 {
        match self {
            Controller::Ssd1306 => 128,
            Controller::Sh1106 => command::COLUMN_MAX as u16 + 1,
        }
    }
}

/// A configuration for the panel, sent by `Display::init`.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) geometry: Geometry,
    pub(crate) controller: Controller,
    pub(crate) double_buffer: bool,
    contrast: Option<u8>,
    precharge: u8,
    vcom_detect: Option<u8>,
    display_clock: u8,
    com_pins: Option<u8>,
}

impl Config {
    /// Create a configuration for a panel. Everything else has working defaults and can be
    /// changed with the builder methods.
    pub fn new(geometry: Geometry, controller: Controller) -> Self {
        Config {
            geometry,
            controller,
            double_buffer: true,
            contrast: None,
            precharge: 0xF1,
            vcom_detect: None,
            display_clock: 0x80,
            com_pins: None,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    /// Keep a copy of the last transmitted buffer so `Display::flush` only sends what changed.
    /// Enabled by default; when disabled every flush sends the whole buffer.
    pub fn double_buffer(self, enabled: bool) -> Self {
        Self {
            double_buffer: enabled,
            ..self
        }
    }

    /// Initial contrast. Defaults to `0xCF` on 128x64 panels and `0x8F` otherwise.
    pub fn contrast(self, contrast: u8) -> Self {
        Self {
            contrast: Some(contrast),
            ..self
        }
    }

    /// Precharge period, see `Command::Precharge`. Defaults to `0xF1`.
    pub fn precharge(self, precharge: u8) -> Self {
        Self { precharge, ..self }
    }

    /// VCOMH deselect level, see `Command::VcomDetect`. Left at the controller default unless set.
    pub fn vcom_detect(self, level: u8) -> Self {
        Self {
            vcom_detect: Some(level),
            ..self
        }
    }

    /// Oscillator frequency and divide ratio, see `Command::DisplayClockDiv`. Defaults to `0x80`.
    pub fn display_clock(self, div: u8) -> Self {
        Self {
            display_clock: div,
            ..self
        }
    }

    /// COM pin hardware configuration. Defaults to `0x02` on 128x32 panels and `0x12` otherwise.
    pub fn com_pins(self, pins: u8) -> Self {
        Self {
            com_pins: Some(pins),
            ..self
        }
    }

    /// Transmit the power-up sequence for this configuration. The panel is left on, showing
    /// whatever its RAM holds.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let (_, height) = self.geometry.size();
        let contrast = self
            .contrast
            .unwrap_or_else(|| self.geometry.default_contrast());
        let com_pins = self
            .com_pins
            .unwrap_or_else(|| self.geometry.default_com_pins());
        debug!(
            "init {:?} {:?}, contrast {:#04x}",
            self.controller, self.geometry, contrast
        );

        Command::DisplayOff.send(iface)?;
        Command::DisplayClockDiv(self.display_clock).send(iface)?;
        Command::Multiplex(height as u8).send(iface)?;
        Command::DisplayOffset(0).send(iface)?;
        Command::StartLine(0).send(iface)?;
        Command::ChargePump(true).send(iface)?;
        Command::MemoryMode(match self.controller {
            Controller::Ssd1306 => MemoryMode::Horizontal,
            Controller::Sh1106 => MemoryMode::Page,
        }).send(iface)?;
        Command::SegmentRemap(false).send(iface)?;
        Command::ComScanDirection(ComScanDirection::Normal).send(iface)?;
        Command::ComPins(com_pins).send(iface)?;
        Command::Contrast(contrast).send(iface)?;
        Command::Precharge(self.precharge).send(iface)?;
        self.vcom_detect
            .map_or(Ok(()), |v| Command::VcomDetect(v).send(iface))?;
        Command::EntireDisplayOn(false).send(iface)?;
        Command::Invert(false).send(iface)?;
        Command::StopScroll.send(iface)?;
        Command::DisplayOn.send(iface)
    }
}

/// Tick counts derived from the paging timing settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timing {
    /// Milliseconds between ticks.
    pub update_interval: u16,
    /// Ticks a frame stays fixed before an automatic transition.
    pub ticks_per_frame: u16,
    /// Ticks a transition animation lasts.
    pub ticks_per_transition: u16,
}

impl Timing {
    /// Derive tick counts. Every count must come out non-zero since the paging engine divides by
    /// them.
    pub fn new(
        target_fps: u8,
        time_per_frame: u16,
        time_per_transition: u16,
    ) -> Result<Self, ConfigError> {
        if target_fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        let update_interval = 1000 / target_fps as u16;
        let ticks_per_frame = time_per_frame / update_interval;
        let ticks_per_transition = time_per_transition / update_interval;
        if ticks_per_frame == 0 {
            return Err(ConfigError::ZeroTicksPerFrame);
        }
        if ticks_per_transition == 0 {
            return Err(ConfigError::ZeroTicksPerTransition);
        }
        Ok(Timing {
            update_interval,
            ticks_per_frame,
            ticks_per_transition,
        })
    }
}

/// Settings of the paging engine, see `Ui::new`.
#[derive(Clone, Copy, Debug)]
pub struct UiConfig {
    pub(crate) target_fps: u8,
    pub(crate) time_per_frame: u16,
    pub(crate) time_per_transition: u16,
    pub(crate) auto_transition: bool,
    pub(crate) frame_animation: AnimationDirection,
    pub(crate) indicator_position: IndicatorPosition,
    pub(crate) indicator_direction: IndicatorDirection,
    pub(crate) draw_indicators: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            target_fps: 30,
            time_per_frame: 5000,
            time_per_transition: 500,
            auto_transition: true,
            frame_animation: AnimationDirection::SlideRight,
            indicator_position: IndicatorPosition::Bottom,
            indicator_direction: IndicatorDirection::LeftRight,
            draw_indicators: true,
        }
    }
}

impl UiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks per second. Defaults to 30, i.e. a 33 ms update interval.
    pub fn target_fps(self, fps: u8) -> Self {
        Self {
            target_fps: fps,
            ..self
        }
    }

    /// Milliseconds a frame stays fixed. Defaults to 5000.
    pub fn time_per_frame(self, ms: u16) -> Self {
        Self {
            time_per_frame: ms,
            ..self
        }
    }

    /// Milliseconds a transition lasts. Defaults to 500.
    pub fn time_per_transition(self, ms: u16) -> Self {
        Self {
            time_per_transition: ms,
            ..self
        }
    }

    pub fn auto_transition(self, enabled: bool) -> Self {
        Self {
            auto_transition: enabled,
            ..self
        }
    }

    pub fn frame_animation(self, direction: AnimationDirection) -> Self {
        Self {
            frame_animation: direction,
            ..self
        }
    }

    pub fn indicator_position(self, position: IndicatorPosition) -> Self {
        Self {
            indicator_position: position,
            ..self
        }
    }

    pub fn indicator_direction(self, direction: IndicatorDirection) -> Self {
        Self {
            indicator_direction: direction,
            ..self
        }
    }

    /// Whether the page indicator is drawn at all. Defaults to true.
    pub fn draw_indicators(self, enabled: bool) -> Self {
        Self {
            draw_indicators: enabled,
            ..self
        }
    }

    /// Validate and derive the tick counts.
    pub fn timing(&self) -> Result<Timing, ConfigError> {
        Timing::new(
            self.target_fps,
            self.time_per_frame,
            self.time_per_transition,
        )
    }
}
