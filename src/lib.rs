//! A paged 1-bit framebuffer for small monochrome OLED panels driven by SSD1306 or SH1106
//! controllers, with drawing primitives, bitmap-font text, and a paging UI that slides between
//! full-screen frames.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(test)]
#[macro_use]
mod testing {
    macro_rules! send {
        ([$($d:tt),*]) => {Sent::Data(vec![$($d,)*])};
        ($c:tt) => {Sent::Cmd($c)};
    }
    macro_rules! sends {
        ($($e:tt),*) => {&[$(send!($e),)*]};
    }
}

pub mod buffer;
pub mod canvas;
pub mod command;
pub mod config;
pub mod diff;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod log_buffer;
pub mod ui;

// Re-exports for primary API.
pub use buffer::{Color, PixelBuffer};
pub use canvas::{Canvas, TextAlignment};
pub use config::{Config, Controller, Geometry, UiConfig};
pub use diff::DirtyRegion;
pub use display::Display;
pub use error::{ConfigError, Error};
pub use font::Font;
pub use interface::i2c::I2cInterface;
pub use interface::spi::SpiInterface;
pub use interface::DisplayInterface;
pub use log_buffer::LogBuffer;
pub use ui::{Clock, Frame, Overlay, Ui, UiState};
