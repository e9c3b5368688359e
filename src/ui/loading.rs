//! A boot screen: run a list of setup steps while showing their name and a progress bar.

use embedded_hal::blocking::delay::DelayMs;
use log::warn;

use super::Ui;
use crate::buffer::Color;
use crate::canvas::{Canvas, TextAlignment};
use crate::error::Error;
use crate::interface::DisplayInterface;

/// Pause after the final stage, so the full bar is visible.
const FINAL_PAUSE_MS: u16 = 150;

/// One step of a loading process: a label and the work to do.
pub struct LoadingStage<'s> {
    pub process: &'s str,
    pub callback: &'s mut dyn FnMut(),
}

/// Draws a loading stage with its progress in percent.
pub type LoadingDrawFn = fn(&mut Canvas, &LoadingStage, u8);

/// The stage label centered above a rounded progress bar, in the current font.
pub fn default_loading_draw(canvas: &mut Canvas, stage: &LoadingStage, progress: u8) {
    let center = canvas.width() as i16 / 2;
    canvas.set_color(Color::White);
    canvas.set_text_alignment(TextAlignment::Center);
    canvas.draw_string(center, 18, stage.process);
    canvas.draw_progress_bar(4, 32, 120, 8, progress);
}

impl<'a, DI, U> Ui<'a, DI, U>
where
    DI: DisplayInterface,
{
    /// Show each stage before running its callback, advancing the bar by an equal share per
    /// stage, then show the last stage at full progress and pause briefly.
    pub fn run_loading_process<D>(
        &mut self,
        stages: &mut [LoadingStage],
        delay: &mut D,
    ) -> Result<(), Error<DI::Error>>
    where
        D: DelayMs<u16>,
    {
        if stages.is_empty() {
            warn!("loading process without stages");
            return Ok(());
        }
        let increment = (100 / stages.len()) as u8;
        let mut progress = 0u8;

        for stage in stages.iter_mut() {
            self.draw_loading_stage(stage, progress)?;
            (stage.callback)();
            progress = progress.saturating_add(increment);
        }

        if let Some(last) = stages.last() {
            self.draw_loading_stage(last, progress)?;
        }
        delay.delay_ms(FINAL_PAUSE_MS);
        Ok(())
    }

    fn draw_loading_stage(
        &mut self,
        stage: &LoadingStage,
        progress: u8,
    ) -> Result<(), Error<DI::Error>> {
        self.display.clear();
        (self.loading_draw)(self.display.canvas_mut(), stage, progress);
        self.display.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Controller, Geometry, UiConfig};
    use crate::display::Display;
    use crate::interface::test_spy::{Sent, TestSpyInterface};
    use crate::ui::{Frame, UiState};
    use core::cell::RefCell;
    use std::vec::Vec;

    #[derive(Default)]
    struct Delay(Vec<u16>);

    impl DelayMs<u16> for Delay {
        fn delay_ms(&mut self, ms: u16) {
            self.0.push(ms);
        }
    }

    fn blank(_: &mut Canvas, _: &mut UiState<()>, _: i16, _: i16) {}

    fn display() -> (TestSpyInterface, Display<TestSpyInterface>) {
        let di = TestSpyInterface::new();
        let cfg = Config::new(Geometry::W128H64, Controller::Ssd1306);
        (di.split(), Display::new(di, cfg).unwrap())
    }

    /// Mark the progress as a single pixel in the top row.
    fn mark(canvas: &mut Canvas, _: &LoadingStage, progress: u8) {
        canvas.set_pixel(progress as i16, 0);
    }

    #[test]
    fn stages_run_in_order() {
        let frames: [&dyn Frame<()>; 1] = [&blank];
        let (di, disp) = display();
        let mut ui = Ui::new(disp, &frames, UiConfig::new(), ()).unwrap();
        ui.set_loading_draw_function(mark);

        let order = RefCell::new(Vec::new());
        let mut wifi = || order.borrow_mut().push("wifi");
        let mut time = || order.borrow_mut().push("time");
        let mut stages = [
            LoadingStage { process: "WiFi", callback: &mut wifi },
            LoadingStage { process: "Time", callback: &mut time },
        ];
        let mut delay = Delay::default();
        ui.run_loading_process(&mut stages, &mut delay).unwrap();

        assert_eq!(*order.borrow(), vec!["wifi", "time"]);
        assert_eq!(delay.0, vec![150]);
        let windows: Vec<(u8, u8)> = di
            .sent()
            .windows(3)
            .filter_map(|w| match (&w[0], &w[1], &w[2]) {
                (Sent::Cmd(0x21), Sent::Cmd(s), Sent::Cmd(e)) => Some((*s, *e)),
                _ => None,
            })
            .collect();
        // Progress 0, 50, then 100 for the final redraw.
        assert_eq!(windows, vec![(0, 0), (0, 50), (50, 100)]);
    }

    #[test]
    fn default_draw_fills_the_bar() {
        let frames: [&dyn Frame<()>; 1] = [&blank];
        let mut ui = Ui::new(display().1, &frames, UiConfig::new(), ()).unwrap();
        let mut noop = || {};
        let mut stages = [LoadingStage { process: "Boot", callback: &mut noop }];
        ui.run_loading_process(&mut stages, &mut Delay::default()).unwrap();

        let canvas = ui.display().canvas();
        assert_eq!(canvas.pixel(6, 36), Some(true));
        assert_eq!(canvas.pixel(121, 36), Some(true));
        assert_eq!(canvas.text_alignment(), TextAlignment::Center);
    }

    #[test]
    fn no_stages_is_a_no_op() {
        let frames: [&dyn Frame<()>; 1] = [&blank];
        let (di, disp) = display();
        let mut ui = Ui::new(disp, &frames, UiConfig::new(), ()).unwrap();
        let mut delay = Delay::default();
        ui.run_loading_process(&mut [], &mut delay).unwrap();
        assert!(delay.0.is_empty());
        di.check_multi(&[]);
    }
}
