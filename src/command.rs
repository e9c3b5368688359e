//! The command set shared by SSD1306 and SH1106 controllers.
//!
//! Every command is a short sequence of control bytes. The opcode and its arguments all travel as
//! command bytes (D/C low on SPI, control byte `0x80` on I2C).

use crate::error::Error;
use crate::interface::DisplayInterface;

/// Highest column address of the controller RAM (SH1106 has 132 columns).
pub const COLUMN_MAX: u8 = 131;
/// Highest page address.
pub const PAGE_MAX: u8 = 7;
/// Highest COM line / RAM row.
pub const ROW_MAX: u8 = 63;

/// Addressing mode used when data bytes are written into RAM.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemoryMode {
    /// Column increments first, wrapping to the next page at the end of the column window.
    Horizontal,
    /// Page increments first.
    Vertical,
    /// Column increments within a single page, set by `PageStart` and `ColumnStart`.
    Page,
}

/// Order in which COM lines are scanned. Reversing it flips the image vertically.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComScanDirection {
    Normal,
    Remapped,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Wake the panel up and show RAM content.
    DisplayOn,
    /// Put the panel to sleep.
    DisplayOff,
    /// Invert every pixel on the panel, RAM is untouched.
    Invert(bool),
    /// Light every pixel regardless of RAM content.
    EntireDisplayOn(bool),
    Contrast(u8),
    /// Precharge period, phase 2 in the high nibble and phase 1 in the low nibble.
    Precharge(u8),
    /// VCOMH deselect level.
    VcomDetect(u8),
    /// Oscillator frequency in the high nibble, clock divide ratio in the low nibble.
    DisplayClockDiv(u8),
    /// Number of active COM lines, 16 to 64.
    Multiplex(u8),
    /// Vertical shift of the COM lines, 0 to 63.
    DisplayOffset(u8),
    /// RAM row shown on the first COM line, 0 to 63.
    StartLine(u8),
    ChargePump(bool),
    MemoryMode(MemoryMode),
    /// Map column address 127 to segment 0 when set.
    SegmentRemap(bool),
    ComScanDirection(ComScanDirection),
    /// COM pin hardware configuration byte.
    ComPins(u8),
    StopScroll,
    /// Column window for horizontal or vertical addressing, `start <= end <= COLUMN_MAX`.
    ColumnAddress(u8, u8),
    /// Page window for horizontal or vertical addressing, `start <= end <= PAGE_MAX`.
    PageAddress(u8, u8),
    /// Page for page addressing mode.
    PageStart(u8),
    /// Column for page addressing mode, sent as two nibbles.
    ColumnStart(u8),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        Ok(($cmd, &$buf[..2]))
    }};
}

impl Command {
    /// Transmit the command and its arguments as a sequence of command bytes.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 2];
        let (cmd, args): (u8, &[u8]) = match self {
            Command::DisplayOn => ok_command!(arg_buf, 0xAF, []),
            Command::DisplayOff => ok_command!(arg_buf, 0xAE, []),
            Command::Invert(ena) => ok_command!(arg_buf, if ena { 0xA7 } else { 0xA6 }, []),
            Command::EntireDisplayOn(ena) => {
                ok_command!(arg_buf, if ena { 0xA5 } else { 0xA4 }, [])
            }
            Command::Contrast(contrast) => ok_command!(arg_buf, 0x81, [contrast]),
            Command::Precharge(period) => ok_command!(arg_buf, 0xD9, [period]),
            Command::VcomDetect(level) => ok_command!(arg_buf, 0xDB, [level]),
            Command::DisplayClockDiv(div) => ok_command!(arg_buf, 0xD5, [div]),
            Command::Multiplex(ratio) => match ratio {
                16..=64 => ok_command!(arg_buf, 0xA8, [ratio - 1]),
                _ => Err(Error::InvalidInput),
            },
            Command::DisplayOffset(offset) => match offset {
                0..=ROW_MAX => ok_command!(arg_buf, 0xD3, [offset]),
                _ => Err(Error::InvalidInput),
            },
            Command::StartLine(line) => match line {
                0..=ROW_MAX => ok_command!(arg_buf, 0x40 | line, []),
                _ => Err(Error::InvalidInput),
            },
            Command::ChargePump(ena) => {
                ok_command!(arg_buf, 0x8D, [if ena { 0x14 } else { 0x10 }])
            }
            Command::MemoryMode(mode) => {
                let m = match mode {
                    MemoryMode::Horizontal => 0x00,
                    MemoryMode::Vertical => 0x01,
                    MemoryMode::Page => 0x02,
                };
                ok_command!(arg_buf, 0x20, [m])
            }
            Command::SegmentRemap(remap) => ok_command!(arg_buf, 0xA0 | remap as u8, []),
            Command::ComScanDirection(dir) => ok_command!(
                arg_buf,
                match dir {
                    ComScanDirection::Normal => 0xC0,
                    ComScanDirection::Remapped => 0xC8,
                },
                []
            ),
            Command::ComPins(pins) => ok_command!(arg_buf, 0xDA, [pins]),
            Command::StopScroll => ok_command!(arg_buf, 0x2E, []),
            Command::ColumnAddress(start, end) => match (start, end) {
                (0..=COLUMN_MAX, 0..=COLUMN_MAX) if start <= end => {
                    ok_command!(arg_buf, 0x21, [start, end])
                }
                _ => Err(Error::InvalidInput),
            },
            Command::PageAddress(start, end) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => {
                    ok_command!(arg_buf, 0x22, [start, end])
                }
                _ => Err(Error::InvalidInput),
            },
            Command::PageStart(page) => match page {
                0..=PAGE_MAX => ok_command!(arg_buf, 0xB0 + page, []),
                _ => Err(Error::InvalidInput),
            },
            Command::ColumnStart(col) => match col {
                0..=COLUMN_MAX => ok_command!(arg_buf, col & 0x0F, [0x10 | col >> 4]),
                _ => Err(Error::InvalidInput),
            },
        }?;
        iface.send_command(cmd).map_err(Error::Interface)?;
        for &arg in args {
            iface.send_command(arg).map_err(Error::Interface)?;
        }
        Ok(())
    }
}
