//! A paging UI: a sequence of full-screen frames shown one at a time, with animated slide
//! transitions, overlays drawn on top and a page indicator.
//!
//! Nothing runs on its own. The application calls `Ui::update` from its main loop; the UI ticks
//! at the configured rate and redraws and flushes the display on every tick.

pub mod indicator;
pub mod loading;

use core::cmp;

use crate::canvas::Canvas;
use crate::config::{Timing, UiConfig};
use crate::display::Display;
use crate::error::{ConfigError, Error};
use crate::interface::DisplayInterface;

use self::indicator::{Indicator, IndicatorDirection, IndicatorDrawState, IndicatorPosition};
use self::loading::LoadingDrawFn;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameState {
    /// A single frame is shown.
    Fixed,
    /// Two frames are sliding past each other.
    InTransition,
}

/// How frames move during a forward transition. Backward transitions play it in reverse.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnimationDirection {
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
}

impl Default for AnimationDirection {
    fn default() -> Self {
        AnimationDirection::SlideRight
    }
}

/// State of the paging engine, readable by frames and overlays. Frames may hide the page
/// indicator for themselves with `disable_indicator`.
pub struct UiState<U> {
    last_update: Option<u32>,
    ticks: u16,
    frame_state: FrameState,
    current_frame: usize,
    direction: i8,
    indicator_drawn: bool,
    manual_control: bool,
    /// Application data handed to every frame and overlay.
    pub user_data: U,
}

impl<U> UiState<U> {
    pub(crate) fn new(user_data: U) -> Self {
        UiState {
            last_update: None,
            ticks: 0,
            frame_state: FrameState::Fixed,
            current_frame: 0,
            direction: 1,
            indicator_drawn: true,
            manual_control: false,
            user_data,
        }
    }

    pub fn frame_state(&self) -> FrameState {
        self.frame_state
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn ticks_since_last_state_switch(&self) -> u16 {
        self.ticks
    }

    /// `1` when frames advance forwards, `-1` backwards.
    pub fn transition_direction(&self) -> i8 {
        self.direction
    }

    /// Whether the current transition was started by `next_frame`, `previous_frame` or
    /// `transition_to_frame` rather than by the timer.
    pub fn manual_control(&self) -> bool {
        self.manual_control
    }

    pub fn last_update(&self) -> Option<u32> {
        self.last_update
    }

    pub fn is_indicator_drawn(&self) -> bool {
        self.indicator_drawn
    }

    pub fn enable_indicator(&mut self) {
        self.indicator_drawn = true;
    }

    pub fn disable_indicator(&mut self) {
        self.indicator_drawn = false;
    }
}

/// One page of the UI. `(x, y)` is the frame's top left corner, off-screen while it slides.
pub trait Frame<U> {
    fn draw(&self, canvas: &mut Canvas, state: &mut UiState<U>, x: i16, y: i16);
}

impl<U, F> Frame<U> for F
where
    F: Fn(&mut Canvas, &mut UiState<U>, i16, i16),
{
    fn draw(&self, canvas: &mut Canvas, state: &mut UiState<U>, x: i16, y: i16) {
        self(canvas, state, x, y)
    }
}

/// Drawn on top of the frames and the indicator on every tick, not affected by transitions.
pub trait Overlay<U> {
    fn draw(&self, canvas: &mut Canvas, state: &UiState<U>);
}

impl<U, F> Overlay<U> for F
where
    F: Fn(&mut Canvas, &UiState<U>),
{
    fn draw(&self, canvas: &mut Canvas, state: &UiState<U>) {
        self(canvas, state)
    }
}

/// A free-running millisecond counter. Wrapping around is fine.
pub trait Clock {
    fn now_ms(&mut self) -> u32;
}

impl<F> Clock for F
where
    F: FnMut() -> u32,
{
    fn now_ms(&mut self) -> u32 {
        self()
    }
}

pub struct Ui<'a, DI, U = ()>
where
    DI: DisplayInterface,
{
    display: Display<DI>,
    frames: &'a [&'a dyn Frame<U>],
    overlays: &'a [&'a dyn Overlay<U>],
    state: UiState<U>,
    settings: UiConfig,
    timing: Timing,
    /// Direction to return to once a manual transition completes.
    last_transition_direction: i8,
    /// Target of `transition_to_frame`.
    target_frame: Option<usize>,
    auto_transition: bool,
    frame_animation: AnimationDirection,
    draw_indicators: bool,
    indicator: Indicator<'a>,
    indicator_draw_state: IndicatorDrawState,
    loading_draw: LoadingDrawFn,
}

impl<'a, DI, U> Ui<'a, DI, U>
where
    DI: DisplayInterface,
{
    /// Build a UI showing `frames` on `display`. Fails on an empty frame list and on timing
    /// settings that round down to zero ticks.
    pub fn new(
        display: Display<DI>,
        frames: &'a [&'a dyn Frame<U>],
        config: UiConfig,
        user_data: U,
    ) -> Result<Self, ConfigError> {
        if frames.is_empty() {
            return Err(ConfigError::NoFrames);
        }
        let timing = config.timing()?;
        Ok(Ui {
            display,
            frames,
            overlays: &[],
            state: UiState::new(user_data),
            settings: config,
            timing,
            last_transition_direction: 1,
            target_frame: None,
            auto_transition: config.auto_transition,
            frame_animation: config.frame_animation,
            draw_indicators: config.draw_indicators,
            indicator: Indicator::new(config.indicator_position, config.indicator_direction),
            indicator_draw_state: IndicatorDrawState::Visible,
            loading_draw: loading::default_loading_draw,
        })
    }

    /// Initialize the display, see `Display::init`.
    pub fn init(&mut self) -> Result<(), Error<DI::Error>> {
        self.display.init()
    }

    /// Tick if at least one update interval has passed since the last tick, and return the
    /// milliseconds left until the next tick is due. The result is negative when drawing took
    /// longer than the interval.
    ///
    /// If the caller polled late, the ticks it missed are added to the tick counter (auto
    /// transition only) so that frames and transitions keep their wall-clock duration.
    pub fn update<C>(&mut self, clock: &mut C) -> Result<i32, Error<DI::Error>>
    where
        C: Clock,
    {
        let frame_start = clock.now_ms();
        let interval = self.timing.update_interval as i32;
        let budget = match self.state.last_update {
            None => 0,
            Some(last) => interval - elapsed(last, frame_start),
        };
        if budget > 0 {
            return Ok(budget);
        }

        if self.auto_transition && self.state.last_update.is_some() {
            let overdue = -budget;
            let skipped = (overdue + interval - 1) / interval;
            let skipped = cmp::min(skipped, u16::max_value() as i32) as u16;
            self.state.ticks = self.state.ticks.saturating_add(skipped);
        }
        self.state.last_update = Some(frame_start);
        self.tick()?;
        Ok(interval - elapsed(frame_start, clock.now_ms()))
    }

    /// Advance the state machine by one tick and redraw, regardless of the time.
    pub fn tick(&mut self) -> Result<(), Error<DI::Error>> {
        self.state.ticks = self.state.ticks.saturating_add(1);
        match self.state.frame_state {
            FrameState::InTransition => {
                if self.state.ticks >= self.timing.ticks_per_transition {
                    self.state.current_frame = self.next_frame_number();
                    self.state.frame_state = FrameState::Fixed;
                    self.state.ticks = 0;
                    self.target_frame = None;
                    self.end_manual_control();
                }
            }
            FrameState::Fixed => {
                if self.state.ticks >= self.timing.ticks_per_frame {
                    if self.auto_transition {
                        self.state.frame_state = FrameState::InTransition;
                    }
                    self.state.ticks = 0;
                }
            }
        }
        self.render()
    }

    fn render(&mut self) -> Result<(), Error<DI::Error>> {
        self.display.clear();
        self.draw_frame();
        if self.draw_indicators {
            let next = self.next_frame_number();
            self.indicator.draw(
                self.display.canvas_mut(),
                &self.state,
                self.indicator_draw_state,
                self.frames.len(),
                next,
                self.timing.ticks_per_transition,
            );
        }
        let overlays = self.overlays;
        for overlay in overlays {
            overlay.draw(self.display.canvas_mut(), &self.state);
        }
        self.display.flush()
    }

    fn draw_frame(&mut self) {
        let frames = self.frames;
        let current = self.state.current_frame;
        match self.state.frame_state {
            FrameState::InTransition => {
                let next = self.next_frame_number();
                let (x, y, x1, y1) = self.slide_offsets();
                let canvas = self.display.canvas_mut();

                // Probe both frames for whether they want the indicator.
                self.state.enable_indicator();
                frames[current].draw(canvas, &mut self.state, x, y);
                let drawn_current = self.state.indicator_drawn;
                self.state.enable_indicator();
                frames[next].draw(canvas, &mut self.state, x1, y1);
                let drawn_next = self.state.indicator_drawn;

                self.indicator_draw_state = match (drawn_current, drawn_next) {
                    (true, true) => IndicatorDrawState::Visible,
                    (true, false) => IndicatorDrawState::SlideOut,
                    (false, true) => IndicatorDrawState::SlideIn,
                    (false, false) => IndicatorDrawState::Hidden,
                };
                self.state.indicator_drawn = drawn_current && drawn_next;
            }
            FrameState::Fixed => {
                self.indicator_draw_state = IndicatorDrawState::Visible;
                self.state.enable_indicator();
                frames[current].draw(self.display.canvas_mut(), &mut self.state, 0, 0);
            }
        }
    }

    /// Positions of the outgoing and the incoming frame.
    fn slide_offsets(&self) -> (i16, i16, i16, i16) {
        let progress = self.state.ticks as f32 / self.timing.ticks_per_transition as f32;
        let width = self.display.width() as i16;
        let height = self.display.height() as i16;
        let (x, y, x1, y1) = match self.frame_animation {
            AnimationDirection::SlideLeft => {
                let x = (-(width as f32) * progress) as i16;
                (x, 0, x + width, 0)
            }
            AnimationDirection::SlideRight => {
                let x = (width as f32 * progress) as i16;
                (x, 0, x - width, 0)
            }
            AnimationDirection::SlideUp => {
                let y = (-(height as f32) * progress) as i16;
                (0, y, 0, y + height)
            }
            AnimationDirection::SlideDown => {
                let y = (height as f32 * progress) as i16;
                (0, y, 0, y - height)
            }
        };
        let dir = if self.state.direction >= 0 { 1 } else { -1 };
        (x * dir, y * dir, x1 * dir, y1 * dir)
    }

    /// The frame a transition leads to.
    fn next_frame_number(&self) -> usize {
        match self.target_frame {
            Some(frame) => frame,
            None => {
                let count = self.frames.len() as isize;
                (self.state.current_frame as isize + self.state.direction as isize)
                    .rem_euclid(count) as usize
            }
        }
    }

    fn end_manual_control(&mut self) {
        if self.state.manual_control {
            self.state.direction = self.last_transition_direction;
            self.state.manual_control = false;
        }
    }

    fn start_manual_transition(&mut self, direction: i8) {
        if !self.state.manual_control {
            self.last_transition_direction = self.state.direction;
        }
        self.state.manual_control = true;
        self.state.frame_state = FrameState::InTransition;
        self.state.ticks = 0;
        self.state.direction = direction;
    }

    /// Slide to the following frame. Ignored while a transition is running.
    pub fn next_frame(&mut self) {
        if self.state.frame_state != FrameState::InTransition {
            self.start_manual_transition(1);
        }
    }

    /// Slide to the preceding frame. Ignored while a transition is running.
    pub fn previous_frame(&mut self) {
        if self.state.frame_state != FrameState::InTransition {
            self.start_manual_transition(-1);
        }
    }

    /// Show `frame` immediately, without animation. Out of range frames are ignored.
    pub fn switch_to_frame(&mut self, frame: usize) {
        if frame >= self.frames.len() {
            return;
        }
        self.state.ticks = 0;
        if frame == self.state.current_frame {
            return;
        }
        self.state.frame_state = FrameState::Fixed;
        self.state.current_frame = frame;
        self.state.indicator_drawn = true;
        self.target_frame = None;
        self.end_manual_control();
    }

    /// Slide directly to `frame`, forwards if it is after the current frame and backwards
    /// otherwise. Out of range frames are ignored.
    pub fn transition_to_frame(&mut self, frame: usize) {
        if frame >= self.frames.len() {
            return;
        }
        self.state.ticks = 0;
        if frame == self.state.current_frame {
            return;
        }
        self.target_frame = Some(frame);
        let direction = if frame < self.state.current_frame { -1 } else { 1 };
        self.start_manual_transition(direction);
    }

    pub fn enable_auto_transition(&mut self) {
        self.auto_transition = true;
    }

    pub fn disable_auto_transition(&mut self) {
        self.auto_transition = false;
    }

    pub fn set_auto_transition_forwards(&mut self) {
        self.state.direction = 1;
        self.last_transition_direction = 1;
    }

    pub fn set_auto_transition_backwards(&mut self) {
        self.state.direction = -1;
        self.last_transition_direction = -1;
    }

    fn retime(&mut self, settings: UiConfig) -> Result<(), ConfigError> {
        self.timing = settings.timing()?;
        self.settings = settings;
        Ok(())
    }

    /// Change the tick rate. Tick counts are rederived so frame and transition durations keep
    /// their length in milliseconds. On error nothing changes.
    pub fn set_target_fps(&mut self, fps: u8) -> Result<(), ConfigError> {
        self.retime(self.settings.target_fps(fps))
    }

    pub fn set_time_per_frame(&mut self, ms: u16) -> Result<(), ConfigError> {
        self.retime(self.settings.time_per_frame(ms))
    }

    pub fn set_time_per_transition(&mut self, ms: u16) -> Result<(), ConfigError> {
        self.retime(self.settings.time_per_transition(ms))
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Show the indicator on the current frame, see `UiState::enable_indicator`.
    pub fn enable_indicator(&mut self) {
        self.state.enable_indicator();
    }

    pub fn disable_indicator(&mut self) {
        self.state.disable_indicator();
    }

    pub fn enable_all_indicators(&mut self) {
        self.draw_indicators = true;
    }

    /// Never draw the page indicator, whatever the frames ask for.
    pub fn disable_all_indicators(&mut self) {
        self.draw_indicators = false;
    }

    pub fn set_indicator_position(&mut self, position: IndicatorPosition) {
        self.indicator.position = position;
    }

    pub fn set_indicator_direction(&mut self, direction: IndicatorDirection) {
        self.indicator.direction = direction;
    }

    /// 8x8 page-layout symbol marking the current frame.
    pub fn set_active_symbol(&mut self, symbol: &'a [u8; 8]) {
        self.indicator.active = symbol;
    }

    /// 8x8 page-layout symbol marking the other frames.
    pub fn set_inactive_symbol(&mut self, symbol: &'a [u8; 8]) {
        self.indicator.inactive = symbol;
    }

    pub fn set_frame_animation(&mut self, direction: AnimationDirection) {
        self.frame_animation = direction;
    }

    /// Replace the frames and start over at the first one.
    pub fn set_frames(&mut self, frames: &'a [&'a dyn Frame<U>]) -> Result<(), ConfigError> {
        if frames.is_empty() {
            return Err(ConfigError::NoFrames);
        }
        self.frames = frames;
        self.reset_state();
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn set_overlays(&mut self, overlays: &'a [&'a dyn Overlay<U>]) {
        self.overlays = overlays;
    }

    /// Replace the function drawing a loading stage, see `run_loading_process`.
    pub fn set_loading_draw_function(&mut self, draw: LoadingDrawFn) {
        self.loading_draw = draw;
    }

    fn reset_state(&mut self) {
        self.state.last_update = None;
        self.state.ticks = 0;
        self.state.frame_state = FrameState::Fixed;
        self.state.current_frame = 0;
        self.state.indicator_drawn = true;
        self.target_frame = None;
        self.end_manual_control();
    }

    pub fn state(&self) -> &UiState<U> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut UiState<U> {
        &mut self.state
    }

    pub fn display(&self) -> &Display<DI> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<DI> {
        &mut self.display
    }

    /// Give back the display.
    pub fn release(self) -> Display<DI> {
        self.display
    }
}

/// Milliseconds from `earlier` to `later` on a wrapping counter, saturated to `i32`.
fn elapsed(earlier: u32, later: u32) -> i32 {
    cmp::min(later.wrapping_sub(earlier), i32::max_value() as u32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Controller, Geometry};
    use crate::interface::test_spy::{Sent, TestSpyInterface};
    use core::cell::Cell;
    use std::vec::Vec;

    /// `(frame, x, y)` of every frame draw.
    type Calls = Vec<(usize, i16, i16)>;

    fn frame(id: usize) -> impl Fn(&mut Canvas, &mut UiState<Calls>, i16, i16) {
        move |_, state, x, y| state.user_data.push((id, x, y))
    }

    fn display() -> (TestSpyInterface, Display<TestSpyInterface>) {
        let di = TestSpyInterface::new();
        let cfg = Config::new(Geometry::W128H64, Controller::Ssd1306);
        (di.split(), Display::new(di, cfg).unwrap())
    }

    /// 100 ms ticks, frames fixed for 2 ticks, transitions of 3 ticks.
    fn config() -> UiConfig {
        UiConfig::new()
            .target_fps(10)
            .time_per_frame(200)
            .time_per_transition(300)
    }

    #[test]
    fn rejects_empty_frames_and_bad_timing() {
        let frames: [&dyn Frame<()>; 0] = [];
        assert_eq!(
            Ui::new(display().1, &frames, UiConfig::new(), ()).err(),
            Some(ConfigError::NoFrames)
        );
        let f = |_: &mut Canvas, _: &mut UiState<()>, _: i16, _: i16| {};
        let frames: [&dyn Frame<()>; 1] = [&f];
        assert_eq!(
            Ui::new(display().1, &frames, UiConfig::new().time_per_transition(20), ()).err(),
            Some(ConfigError::ZeroTicksPerTransition)
        );
    }

    #[test]
    fn auto_transition_cycles_back_to_start() {
        let (f0, f1, f2) = (frame(0), frame(1), frame(2));
        let frames: [&dyn Frame<Calls>; 3] = [&f0, &f1, &f2];
        let mut ui = Ui::new(display().1, &frames, config(), Vec::new()).unwrap();

        let mut visited = Vec::new();
        for _ in 0..3 {
            // Two fixed ticks, then three in transition.
            for _ in 0..5 {
                ui.tick().unwrap();
            }
            assert_eq!(ui.state().frame_state(), FrameState::Fixed);
            visited.push(ui.state().current_frame());
        }
        assert_eq!(visited, vec![1, 2, 0]);
    }

    #[test]
    fn fixed_frame_is_drawn_at_origin() {
        let (f0, f1) = (frame(0), frame(1));
        let frames: [&dyn Frame<Calls>; 2] = [&f0, &f1];
        let mut ui = Ui::new(display().1, &frames, config(), Vec::new()).unwrap();
        ui.tick().unwrap();
        assert_eq!(ui.state().user_data, vec![(0, 0, 0)]);
    }

    #[test]
    fn transition_slides_both_frames() {
        let (f0, f1, f2) = (frame(0), frame(1), frame(2));
        let frames: [&dyn Frame<Calls>; 3] = [&f0, &f1, &f2];
        let mut ui = Ui::new(display().1, &frames, config(), Vec::new()).unwrap();

        ui.next_frame();
        ui.tick().unwrap();
        assert_eq!(ui.state().user_data, vec![(0, 42, 0), (1, -86, 0)]);
    }

    #[test]
    fn reverse_transition_mirrors_offsets() {
        let (f0, f1, f2) = (frame(0), frame(1), frame(2));
        let frames: [&dyn Frame<Calls>; 3] = [&f0, &f1, &f2];
        let cfg = config().frame_animation(AnimationDirection::SlideUp);
        let mut ui = Ui::new(display().1, &frames, cfg, Vec::new()).unwrap();

        ui.previous_frame();
        ui.tick().unwrap();
        // 64 * 1/3 = 21.3, negated for the backward direction.
        assert_eq!(ui.state().user_data, vec![(0, 0, 21), (2, 0, -43)]);
    }

    #[test]
    fn previous_frame_wraps_around() {
        let (f0, f1, f2) = (frame(0), frame(1), frame(2));
        let frames: [&dyn Frame<Calls>; 3] = [&f0, &f1, &f2];
        let cfg = config().auto_transition(false);
        let mut ui = Ui::new(display().1, &frames, cfg, Vec::new()).unwrap();

        ui.previous_frame();
        assert!(ui.state().manual_control());
        assert_eq!(ui.state().transition_direction(), -1);
        // Ignored while the transition runs.
        ui.next_frame();
        assert_eq!(ui.state().transition_direction(), -1);
        for _ in 0..3 {
            ui.tick().unwrap();
        }
        assert_eq!(ui.state().current_frame(), 2);
        assert_eq!(ui.state().frame_state(), FrameState::Fixed);
        assert!(!ui.state().manual_control());
        assert_eq!(ui.state().transition_direction(), 1);

        // Without auto transition the frame stays put.
        for _ in 0..10 {
            ui.tick().unwrap();
        }
        assert_eq!(ui.state().current_frame(), 2);
    }

    #[test]
    fn switch_to_frame_is_immediate() {
        let (f0, f1, f2) = (frame(0), frame(1), frame(2));
        let frames: [&dyn Frame<Calls>; 3] = [&f0, &f1, &f2];
        let mut ui = Ui::new(display().1, &frames, config(), Vec::new()).unwrap();

        ui.switch_to_frame(3);
        assert_eq!(ui.state().current_frame(), 0);
        ui.next_frame();
        ui.switch_to_frame(2);
        assert_eq!(ui.state().current_frame(), 2);
        assert_eq!(ui.state().frame_state(), FrameState::Fixed);
        assert!(!ui.state().manual_control());
        ui.tick().unwrap();
        assert_eq!(ui.state().user_data, vec![(2, 0, 0)]);
    }

    #[test]
    fn transition_to_frame_targets_frame() {
        let (f0, f1, f2, f3) = (frame(0), frame(1), frame(2), frame(3));
        let frames: [&dyn Frame<Calls>; 4] = [&f0, &f1, &f2, &f3];
        let mut ui = Ui::new(display().1, &frames, config(), Vec::new()).unwrap();
        ui.set_auto_transition_backwards();

        ui.transition_to_frame(2);
        assert_eq!(ui.state().transition_direction(), 1);
        ui.tick().unwrap();
        assert_eq!(ui.state().user_data[1].0, 2);
        ui.tick().unwrap();
        ui.tick().unwrap();
        assert_eq!(ui.state().current_frame(), 2);
        // Back to the configured direction.
        assert_eq!(ui.state().transition_direction(), -1);

        ui.transition_to_frame(0);
        assert_eq!(ui.state().transition_direction(), -1);
        ui.transition_to_frame(9);
        assert_eq!(ui.state().frame_state(), FrameState::InTransition);
    }

    #[test]
    fn update_ticks_once_per_interval() {
        let (f0, f1) = (frame(0), frame(1));
        let frames: [&dyn Frame<Calls>; 2] = [&f0, &f1];
        let cfg = config().time_per_frame(1000);
        let mut ui = Ui::new(display().1, &frames, cfg, Vec::new()).unwrap();
        let now = Cell::new(5000u32);
        let mut clock = || now.get();

        assert_eq!(ui.update(&mut clock), Ok(100));
        assert_eq!(ui.state().ticks_since_last_state_switch(), 1);

        now.set(5030);
        assert_eq!(ui.update(&mut clock), Ok(70));
        now.set(5060);
        assert_eq!(ui.update(&mut clock), Ok(40));
        assert_eq!(ui.state().ticks_since_last_state_switch(), 1);

        now.set(5100);
        assert_eq!(ui.update(&mut clock), Ok(100));
        assert_eq!(ui.state().ticks_since_last_state_switch(), 2);
        assert_eq!(ui.state().last_update(), Some(5100));
    }

    #[test]
    fn late_update_skips_ticks() {
        let (f0, f1) = (frame(0), frame(1));
        let frames: [&dyn Frame<Calls>; 2] = [&f0, &f1];
        let cfg = config().time_per_frame(1000);
        let mut ui = Ui::new(display().1, &frames, cfg, Vec::new()).unwrap();
        let now = Cell::new(0u32);
        let mut clock = || now.get();

        ui.update(&mut clock).unwrap();
        now.set(350);
        ui.update(&mut clock).unwrap();
        // 250 ms overdue: three skipped ticks plus the regular one.
        assert_eq!(ui.state().ticks_since_last_state_switch(), 5);

        ui.disable_auto_transition();
        now.set(800);
        ui.update(&mut clock).unwrap();
        assert_eq!(ui.state().ticks_since_last_state_switch(), 6);
    }

    #[test]
    fn update_survives_clock_wrap() {
        let (f0, f1) = (frame(0), frame(1));
        let frames: [&dyn Frame<Calls>; 2] = [&f0, &f1];
        let mut ui = Ui::new(display().1, &frames, config(), Vec::new()).unwrap();
        let now = Cell::new(u32::max_value() - 20);
        let mut clock = || now.get();

        ui.update(&mut clock).unwrap();
        now.set(29);
        assert_eq!(ui.update(&mut clock), Ok(50));
    }

    #[test]
    fn tick_renders_and_flushes() {
        let dot = |c: &mut Canvas, _: &mut UiState<()>, x: i16, y: i16| c.set_pixel(x + 10, y + 10);
        let frames: [&dyn Frame<()>; 1] = [&dot];
        let corner = |c: &mut Canvas, _: &UiState<()>| c.set_pixel(127, 0);
        let overlays: [&dyn Overlay<()>; 1] = [&corner];
        let (di, disp) = display();
        let cfg = config().draw_indicators(false);
        let mut ui = Ui::new(disp, &frames, cfg, ()).unwrap();
        ui.set_overlays(&overlays);

        ui.tick().unwrap();
        let canvas = ui.display().canvas();
        assert_eq!(canvas.pixel(10, 10), Some(true));
        assert_eq!(canvas.pixel(127, 0), Some(true));
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(&di.sent()[..6], sends!(
            0x21, 10, 127, // column window
            0x22, 0, 1 // page window
        ));

        di.clear();
        ui.tick().unwrap();
        di.check_multi(&[]);
    }

    #[test]
    fn frames_can_hide_the_indicator() {
        let plain = |_: &mut Canvas, _: &mut UiState<()>, _: i16, _: i16| {};
        let bare = |_: &mut Canvas, s: &mut UiState<()>, _: i16, _: i16| s.disable_indicator();
        let frames: [&dyn Frame<()>; 2] = [&plain, &bare];
        let mut ui = Ui::new(display().1, &frames, config(), ()).unwrap();

        ui.tick().unwrap();
        assert!(ui.state().is_indicator_drawn());
        ui.next_frame();
        ui.tick().unwrap();
        assert!(!ui.state().is_indicator_drawn());
        ui.tick().unwrap();
        ui.tick().unwrap();
        assert_eq!(ui.state().current_frame(), 1);
        // Fixed frames are always probed afresh.
        ui.tick().unwrap();
        assert!(!ui.state().is_indicator_drawn());
    }

    #[test]
    fn retiming_keeps_durations() {
        let f = |_: &mut Canvas, _: &mut UiState<()>, _: i16, _: i16| {};
        let frames: [&dyn Frame<()>; 1] = [&f];
        let mut ui = Ui::new(display().1, &frames, config(), ()).unwrap();
        ui.set_target_fps(20).unwrap();
        assert_eq!(
            ui.timing(),
            Timing {
                update_interval: 50,
                ticks_per_frame: 4,
                ticks_per_transition: 6,
            }
        );
        assert_eq!(ui.set_time_per_frame(10), Err(ConfigError::ZeroTicksPerFrame));
        assert_eq!(ui.timing().ticks_per_frame, 4);
        assert_eq!(ui.set_target_fps(0), Err(ConfigError::ZeroFps));
    }

    #[test]
    fn set_frames_resets_state() {
        let (f0, f1) = (frame(0), frame(1));
        let frames: [&dyn Frame<Calls>; 2] = [&f0, &f1];
        let mut ui = Ui::new(display().1, &frames, config(), Vec::new()).unwrap();
        ui.switch_to_frame(1);
        assert_eq!(ui.set_frames(&[]), Err(ConfigError::NoFrames));
        assert_eq!(ui.state().current_frame(), 1);
        ui.set_frames(&frames).unwrap();
        assert_eq!(ui.state().current_frame(), 0);
        assert_eq!(ui.frame_count(), 2);
    }

    #[test]
    fn indicator_is_flushed() {
        let (f0, f1) = (frame(0), frame(1));
        let frames: [&dyn Frame<Calls>; 2] = [&f0, &f1];
        let (di, disp) = display();
        let mut ui = Ui::new(disp, &frames, config(), Vec::new()).unwrap();
        ui.tick().unwrap();
        assert!(di.sent().iter().any(|s| match s {
            Sent::Data(_) => true,
            Sent::Cmd(_) => false,
        }));
    }
}
