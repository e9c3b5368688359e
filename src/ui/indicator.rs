//! The row of symbols showing which frame is on screen.

use super::{FrameState, UiState};
use crate::buffer::Color;
use crate::canvas::Canvas;

/// Default symbol of the current frame, a filled dot. 8x8, page layout.
pub static ACTIVE_SYMBOL: [u8; 8] = [0x00, 0x18, 0x3c, 0x7e, 0x7e, 0x3c, 0x18, 0x00];
/// Default symbol of the other frames, a small dot.
pub static INACTIVE_SYMBOL: [u8; 8] = [0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00];

/// Screen edge the indicator sits on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndicatorPosition {
    Top,
    Right,
    Bottom,
    Left,
}

impl Default for IndicatorPosition {
    fn default() -> Self {
        IndicatorPosition::Bottom
    }
}

/// Order of the symbols: the first frame leftmost (topmost) or rightmost (bottommost).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndicatorDirection {
    LeftRight,
    RightLeft,
}

impl Default for IndicatorDirection {
    fn default() -> Self {
        IndicatorDirection::LeftRight
    }
}

/// Whether the frames on screen want the indicator. During a transition it slides off the
/// edge when only the outgoing frame shows it and slides in when only the incoming one does.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum IndicatorDrawState {
    Visible,
    SlideIn,
    SlideOut,
    Hidden,
}

pub(crate) struct Indicator<'a> {
    pub(crate) position: IndicatorPosition,
    pub(crate) direction: IndicatorDirection,
    pub(crate) active: &'a [u8; 8],
    pub(crate) inactive: &'a [u8; 8],
}

impl<'a> Indicator<'a> {
    pub(crate) fn new(position: IndicatorPosition, direction: IndicatorDirection) -> Self {
        Indicator {
            position,
            direction,
            active: &ACTIVE_SYMBOL,
            inactive: &INACTIVE_SYMBOL,
        }
    }

    /// Draw one symbol per frame, highlighting the current frame, or the incoming one while
    /// the indicator slides in.
    pub(crate) fn draw<U>(
        &self,
        canvas: &mut Canvas,
        state: &UiState<U>,
        draw_state: IndicatorDrawState,
        frame_count: usize,
        next_frame: usize,
        ticks_per_transition: u16,
    ) {
        if draw_state == IndicatorDrawState::Hidden
            || (!state.indicator_drawn && state.frame_state != FrameState::InTransition)
        {
            return;
        }

        let highlighted = match draw_state {
            IndicatorDrawState::SlideIn => next_frame,
            _ => state.current_frame,
        };
        let highlighted = match self.direction {
            IndicatorDirection::LeftRight => highlighted,
            IndicatorDirection::RightLeft => frame_count - 1 - highlighted,
        };

        let progress = state.ticks as f32 / ticks_per_transition as f32;
        let fade = match draw_state {
            IndicatorDrawState::SlideIn => 1.0 - progress,
            IndicatorDrawState::SlideOut => progress,
            _ => 0.0,
        };
        // Pixels the symbols are pushed off the edge.
        let shift = (8.0 * fade) as i32;

        let width = canvas.width() as i32;
        let height = canvas.height() as i32;
        let vertical = match self.position {
            IndicatorPosition::Left | IndicatorPosition::Right => true,
            IndicatorPosition::Top | IndicatorPosition::Bottom => false,
        };
        let spacing: i32 = if vertical && height < 64 { 6 } else { 12 };
        let start = spacing.saturating_mul(frame_count as i32) / 2;

        let color = canvas.color();
        canvas.set_color(Color::White);
        for i in 0..frame_count {
            let step = spacing.saturating_mul(i as i32);
            let (x, y) = match self.position {
                IndicatorPosition::Top => (width / 2 - start + step, -shift),
                IndicatorPosition::Bottom => (width / 2 - start + step, height - 8 + shift),
                IndicatorPosition::Right => (width - 8 + shift, height / 2 - start + 2 + step),
                IndicatorPosition::Left => (-shift, height / 2 - start + 2 + step),
            };
            let symbol = if i == highlighted {
                self.active
            } else {
                self.inactive
            };
            // Symbols entirely off-screen, possibly beyond the i16 range with many frames.
            if x <= -8 || y <= -8 || x >= width || y >= height {
                continue;
            }
            canvas.draw_fast_image(x as i16, y as i16, 8, 8, symbol);
        }
        canvas.set_color(color);
    }
}
