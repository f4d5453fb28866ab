//! Per-frame render bracket state machine.
//!
//! raylib requires `BeginDrawing`/`EndDrawing` and `BeginMode3D`/`EndMode3D`
//! to be strictly paired. Those calls are made by four different systems in
//! four different phases, so the pairing is tracked here:
//!
//! ```text
//! Idle -> FrameBegun -> CameraBegun -> CameraEnded -> FrameEnded -> (Idle)
//! ```
//!
//! The camera block is optional: `end_frame` is also accepted straight from
//! `FrameBegun`. A new frame may begin from `Idle` or `FrameEnded`.
//! A rejected transition leaves the state untouched.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BracketState {
    #[default]
    Idle,
    FrameBegun,
    CameraBegun,
    CameraEnded,
    FrameEnded,
}

impl fmt::Display for BracketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BracketState::Idle => "idle",
            BracketState::FrameBegun => "frame begun",
            BracketState::CameraBegun => "camera begun",
            BracketState::CameraEnded => "camera ended",
            BracketState::FrameEnded => "frame ended",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {state}")]
pub struct BracketError {
    pub action: &'static str,
    pub state: BracketState,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderBracket {
    state: BracketState,
}

impl RenderBracket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BracketState {
        self.state
    }

    /// True only between `begin_camera` and `end_camera`.
    pub fn camera_open(&self) -> bool {
        self.state == BracketState::CameraBegun
    }

    pub fn begin_frame(&mut self) -> Result<(), BracketError> {
        self.transition(
            "begin frame",
            &[BracketState::Idle, BracketState::FrameEnded],
            BracketState::FrameBegun,
        )
    }

    pub fn begin_camera(&mut self) -> Result<(), BracketError> {
        self.transition(
            "begin camera",
            &[BracketState::FrameBegun],
            BracketState::CameraBegun,
        )
    }

    pub fn end_camera(&mut self) -> Result<(), BracketError> {
        self.transition(
            "end camera",
            &[BracketState::CameraBegun],
            BracketState::CameraEnded,
        )
    }

    pub fn end_frame(&mut self) -> Result<(), BracketError> {
        self.transition(
            "end frame",
            &[BracketState::FrameBegun, BracketState::CameraEnded],
            BracketState::FrameEnded,
        )
    }

    /// Return to `Idle` once the frame is fully presented.
    pub fn settle(&mut self) {
        if self.state == BracketState::FrameEnded {
            self.state = BracketState::Idle;
        }
    }

    fn transition(
        &mut self,
        action: &'static str,
        from: &[BracketState],
        to: BracketState,
    ) -> Result<(), BracketError> {
        if !from.contains(&self.state) {
            return Err(BracketError {
                action,
                state: self.state,
            });
        }
        self.state = to;
        Ok(())
    }
}
