use crate::{Direction, Preferred, Rect, Viewport};
use serde::{Deserialize, Serialize};

/// Minimum gap between the tooltip and the viewport edge, both axes.
pub const PLACEMENT_MARGIN: f32 = 10.0;

/// Chosen side plus the cross-axis shift that keeps the content on screen.
///
/// Serialized as `{"direction": "top", "offset_x": .., "offset_y": ..}` for
/// the host that draws the tooltip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub direction: Direction,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Decide where to draw `content` relative to `trigger`.
///
/// A concrete `preferred` side always wins and gets no offset. In auto mode
/// the tooltip goes below unless that lacks room, then above, right, left;
/// when nothing fits it takes whichever of above/below is larger. The
/// content is assumed centred on the trigger along the cross axis and is
/// shifted back inside `[margin, extent - margin]`.
pub fn place(trigger: Rect, content: Rect, viewport: Viewport, preferred: Preferred) -> Placement {
    if let Some(direction) = preferred.fixed() {
        return Placement {
            direction,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }

    let direction = choose_direction(trigger, content, viewport);
    let (offset_x, offset_y) = if direction.is_vertical() {
        let left = trigger.center_x() - content.width / 2.0;
        let right = trigger.center_x() + content.width / 2.0;
        (clamp_shift(left, right, viewport.width), 0.0)
    } else {
        let top = trigger.center_y() - content.height / 2.0;
        let bottom = trigger.center_y() + content.height / 2.0;
        (0.0, clamp_shift(top, bottom, viewport.height))
    };

    Placement {
        direction,
        offset_x,
        offset_y,
    }
}

fn choose_direction(trigger: Rect, content: Rect, viewport: Viewport) -> Direction {
    let space_bottom = viewport.height - trigger.bottom();
    let space_top = trigger.top();
    let space_right = viewport.width - trigger.right();
    let space_left = trigger.left();

    let required_height = content.height + PLACEMENT_MARGIN;
    let required_width = content.width + PLACEMENT_MARGIN;

    if space_bottom >= required_height {
        Direction::Bottom
    } else if space_top >= required_height {
        Direction::Top
    } else if space_right >= required_width {
        Direction::Right
    } else if space_left >= required_width {
        Direction::Left
    } else if space_top > space_bottom {
        Direction::Top
    } else {
        Direction::Bottom
    }
}

/// Shift for a `[low, high]` extent so it stays within `[margin, extent - margin]`.
/// The low edge wins when the content is larger than the viewport.
fn clamp_shift(low: f32, high: f32, extent: f32) -> f32 {
    if low < PLACEMENT_MARGIN {
        PLACEMENT_MARGIN - low
    } else if high > extent - PLACEMENT_MARGIN {
        (extent - PLACEMENT_MARGIN) - high
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(1200.0, 800.0);

    fn content(width: f32, height: f32) -> Rect {
        Rect::new(0.0, 0.0, width, height)
    }

    #[test]
    fn placement_serializes_for_the_host() {
        let trigger = Rect::new(-20.0, 700.0, 40.0, 20.0);
        let placement = place(trigger, content(300.0, 200.0), VIEWPORT, Preferred::Auto);
        let value = serde_json::to_value(placement).unwrap();
        assert_eq!(value["direction"], "top");
        assert_eq!(value["offset_y"], 0.0);
        assert!(value["offset_x"].as_f64().unwrap() > 0.0);
        let back: Placement = serde_json::from_value(value).unwrap();
        assert_eq!(back, placement);
    }

    #[test]
    fn defaults_to_bottom_with_room() {
        let trigger = Rect::new(580.0, 100.0, 40.0, 20.0);
        let placement = place(trigger, content(300.0, 200.0), VIEWPORT, Preferred::Auto);
        assert_eq!(placement, Placement::default());
    }

    #[test]
    fn flips_to_top_near_viewport_bottom() {
        let trigger = Rect::new(580.0, 700.0, 40.0, 20.0);
        let placement = place(trigger, content(300.0, 200.0), VIEWPORT, Preferred::Auto);
        assert_eq!(placement.direction, Direction::Top);
        assert_eq!(placement.offset_x, 0.0);
    }

    #[test]
    fn exact_fit_below_is_accepted() {
        // space below = 800 - 590 = 210 = 200 + margin
        let trigger = Rect::new(580.0, 570.0, 40.0, 20.0);
        let placement = place(trigger, content(300.0, 200.0), VIEWPORT, Preferred::Auto);
        assert_eq!(placement.direction, Direction::Bottom);
    }

    #[test]
    fn falls_back_to_right_then_left() {
        let tall = content(300.0, 700.0);
        let trigger = Rect::new(100.0, 390.0, 40.0, 20.0);
        assert_eq!(place(trigger, tall, VIEWPORT, Preferred::Auto).direction, Direction::Right);

        let trigger = Rect::new(1000.0, 390.0, 40.0, 20.0);
        assert_eq!(place(trigger, tall, VIEWPORT, Preferred::Auto).direction, Direction::Left);
    }

    #[test]
    fn nothing_fits_picks_larger_vertical_space() {
        let huge = content(2000.0, 2000.0);
        let upper = Rect::new(580.0, 200.0, 40.0, 20.0);
        assert_eq!(place(upper, huge, VIEWPORT, Preferred::Auto).direction, Direction::Bottom);
        let lower = Rect::new(580.0, 600.0, 40.0, 20.0);
        assert_eq!(place(lower, huge, VIEWPORT, Preferred::Auto).direction, Direction::Top);
        let middle = Rect::new(580.0, 390.0, 40.0, 20.0);
        assert_eq!(place(middle, huge, VIEWPORT, Preferred::Auto).direction, Direction::Bottom);
    }

    #[test]
    fn wide_content_clamps_left_edge_to_margin() {
        let trigger = Rect::new(580.0, 100.0, 40.0, 20.0);
        let wide = content(1500.0, 100.0);
        let placement = place(trigger, wide, VIEWPORT, Preferred::Auto);
        assert_eq!(placement.direction, Direction::Bottom);
        let left_edge = trigger.center_x() - wide.width / 2.0 + placement.offset_x;
        assert_eq!(left_edge, PLACEMENT_MARGIN);
    }

    #[test]
    fn right_overflow_shifts_negative() {
        let trigger = Rect::new(1150.0, 100.0, 40.0, 20.0);
        let placement = place(trigger, content(300.0, 100.0), VIEWPORT, Preferred::Auto);
        // centre 1170, right edge 1320, limit 1190
        assert_eq!(placement.offset_x, -130.0);
    }

    #[test]
    fn side_placement_clamps_vertically() {
        let tall = content(300.0, 700.0);
        let trigger = Rect::new(100.0, 100.0, 40.0, 20.0);
        let placement = place(trigger, tall, VIEWPORT, Preferred::Auto);
        assert_eq!(placement.direction, Direction::Right);
        // centre 110, top edge -240
        assert_eq!(placement.offset_y, 250.0);
        assert_eq!(placement.offset_x, 0.0);
    }

    #[test]
    fn explicit_direction_always_wins() {
        let trigger = Rect::new(580.0, 780.0, 40.0, 20.0);
        let placement = place(trigger, content(3000.0, 500.0), VIEWPORT, Preferred::Bottom);
        assert_eq!(
            placement,
            Placement {
                direction: Direction::Bottom,
                offset_x: 0.0,
                offset_y: 0.0
            }
        );
    }

    #[test]
    fn placement_is_deterministic() {
        let trigger = Rect::new(13.5, 777.25, 40.0, 20.0);
        let c = content(333.0, 222.0);
        let first = place(trigger, c, VIEWPORT, Preferred::Auto);
        for _ in 0..8 {
            assert_eq!(place(trigger, c, VIEWPORT, Preferred::Auto), first);
        }
    }
}
