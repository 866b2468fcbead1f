//! The display channel's screen-attachment state machine:
//! `Unmarked -> Marked -> Drawing -> ...`. `Reset` always returns to
//! `Unmarked` from any state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Draw messages are accepted but the screen stays in splash mode.
    Unmarked,
    /// `MARK` arrived; the screen has been told to attach the display
    /// layer, but no draw has landed yet.
    Marked,
    /// At least one draw has landed since the mark.
    Drawing,
}

impl DisplayState {
    pub fn on_mark(self) -> Self {
        match self {
            Self::Unmarked => Self::Marked,
            other => other,
        }
    }

    pub fn on_draw(self) -> Self {
        match self {
            Self::Unmarked => Self::Unmarked,
            Self::Marked | Self::Drawing => Self::Drawing,
        }
    }

    pub fn on_reset(self) -> Self {
        Self::Unmarked
    }

    pub fn is_attached(self) -> bool {
        !matches!(self, Self::Unmarked)
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::Unmarked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_then_draw_reaches_drawing() {
        let state = DisplayState::Unmarked.on_mark().on_draw();
        assert_eq!(state, DisplayState::Drawing);
    }

    #[test]
    fn draws_before_mark_do_not_attach_the_screen() {
        let state = DisplayState::Unmarked.on_draw();
        assert_eq!(state, DisplayState::Unmarked);
        assert!(!state.is_attached());
    }

    #[test]
    fn reset_from_drawing_returns_to_unmarked() {
        let state = DisplayState::Unmarked.on_mark().on_draw().on_reset();
        assert_eq!(state, DisplayState::Unmarked);
    }
}
