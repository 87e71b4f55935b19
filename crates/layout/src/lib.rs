//! Tooltip geometry.
//!
//! Everything here is viewport-relative CSS px and pure: for fixed inputs
//! [`place`] always returns the same [`Placement`].

mod placement;

pub use placement::{PLACEMENT_MARGIN, Placement, place};

use serde::{Deserialize, Serialize};

/// Axis-aligned box in viewport coordinates, origin at the top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Side of the trigger the tooltip is drawn on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Requested placement: a fixed side, or chosen from available space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preferred {
    #[default]
    Auto,
    Top,
    Bottom,
    Left,
    Right,
}

impl Preferred {
    pub fn fixed(self) -> Option<Direction> {
        match self {
            Preferred::Auto => None,
            Preferred::Top => Some(Direction::Top),
            Preferred::Bottom => Some(Direction::Bottom),
            Preferred::Left => Some(Direction::Left),
            Preferred::Right => Some(Direction::Right),
        }
    }
}

impl From<Direction> for Preferred {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Top => Preferred::Top,
            Direction::Bottom => Preferred::Bottom,
            Direction::Left => Preferred::Left,
            Direction::Right => Preferred::Right,
        }
    }
}
