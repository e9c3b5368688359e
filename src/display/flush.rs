//! Moving the canvas to the panel RAM, either the changed rectangle or everything.

use log::{debug, trace};

use super::Display;
use crate::command::Command;
use crate::config::Controller;
use crate::diff::DirtyRegion;
use crate::error::Error;
use crate::interface::DisplayInterface;

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Transmit the canvas. With double buffering only the bounding rectangle of the bytes that
    /// changed since the last flush is sent, and nothing at all if none did. Without it this is
    /// `flush_full`. After a failed transmission the next flush sends the whole canvas.
    pub fn flush(&mut self) -> Result<(), Error<DI::Error>> {
        if !self.config.double_buffer {
            return self.flush_full();
        }
        match self.canvas.buffer_mut().take_dirty_region() {
            Some(region) => {
                trace!("flush {:?}", region);
                self.write_or_mark_unsent(region)
            }
            None => Ok(()),
        }
    }

    /// Transmit the whole canvas.
    pub fn flush_full(&mut self) -> Result<(), Error<DI::Error>> {
        let buffer = self.canvas.buffer_mut();
        buffer.sync_back();
        let region = DirtyRegion::full(buffer.width(), buffer.pages());
        self.write_or_mark_unsent(region)
    }

    fn write_or_mark_unsent(&mut self, region: DirtyRegion) -> Result<(), Error<DI::Error>> {
        let result = self.write_region(region);
        if result.is_err() {
            debug!("flush failed, resending everything next time");
            self.canvas.buffer_mut().mark_unsent();
        }
        result
    }

    fn write_region(&mut self, region: DirtyRegion) -> Result<(), Error<DI::Error>> {
        let width = self.canvas.width();
        let bytes = self.canvas.buffer().bytes();
        let iface = &mut self.iface;

        let row = |page: u16| {
            let start = (page * width + region.min_x) as usize;
            start..start + region.columns() as usize
        };

        let controller = self.config.controller;
        let x_offset = controller.columns().saturating_sub(width) / 2;
        match controller {
            Controller::Ssd1306 => {
                // One window, then the rows back to back as the column address wraps.
                Command::ColumnAddress(
                    (x_offset + region.min_x) as u8,
                    (x_offset + region.max_x) as u8,
                ).send(iface)?;
                Command::PageAddress(region.min_page as u8, region.max_page as u8).send(iface)?;
                for page in region.min_page..=region.max_page {
                    iface.send_data(&bytes[row(page)]).map_err(Error::Interface)?;
                    iface.yield_now();
                }
            }
            Controller::Sh1106 => {
                for page in region.min_page..=region.max_page {
                    Command::PageStart(page as u8).send(iface)?;
                    Command::ColumnStart((x_offset + region.min_x) as u8).send(iface)?;
                    iface.send_data(&bytes[row(page)]).map_err(Error::Interface)?;
                    iface.yield_now();
                }
            }
        }
        Ok(())
    }
}
