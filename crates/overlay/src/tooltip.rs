use layout::{Placement, Preferred, Rect, Viewport, place};
use std::time::{Duration, Instant};

/// Delay between the pointer leaving a hover tooltip and it closing.
pub const HIDE_DELAY: Duration = Duration::from_millis(200);

/// Which interactions open the tooltip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triggers {
    pub hover: bool,
    pub click: bool,
}

impl Triggers {
    pub const HOVER: Triggers = Triggers {
        hover: true,
        click: false,
    };
    pub const CLICK: Triggers = Triggers {
        hover: false,
        click: true,
    };
}

/// Visibility and placement of one tooltip.
///
/// Time is passed in by the host, so a pending hide is only applied on
/// [`tick`](Self::tick).
#[derive(Clone, Debug)]
pub struct TooltipState {
    triggers: Triggers,
    preferred: Preferred,
    open: bool,
    hide_at: Option<Instant>,
    placement: Placement,
}

impl TooltipState {
    pub fn new(triggers: Triggers, preferred: Preferred) -> Self {
        Self {
            triggers,
            preferred,
            open: false,
            hide_at: None,
            placement: Placement::default(),
        }
    }

    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn pointer_enter(&mut self) {
        self.hide_at = None;
        if self.triggers.hover {
            self.open = true;
        }
    }

    pub fn pointer_leave(&mut self, now: Instant) {
        if self.triggers.hover {
            self.hide_at = Some(now + HIDE_DELAY);
        }
    }

    pub fn click(&mut self) {
        if self.triggers.click {
            self.open = !self.open;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.hide_at = None;
    }

    /// Apply a due hide. Returns whether visibility changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(at) if now >= at => {
                self.hide_at = None;
                let was_open = self.open;
                self.open = false;
                was_open
            }
            _ => false,
        }
    }

    /// Recompute placement for the measured rects. Only open tooltips are
    /// laid out.
    pub fn layout(&mut self, trigger: Rect, content: Rect, viewport: Viewport) -> Option<Placement> {
        if !self.open {
            return None;
        }
        self.placement = place(trigger, content, viewport, self.preferred);
        Some(self.placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::Direction;

    #[test]
    fn hover_leave_hides_after_delay() {
        let t0 = Instant::now();
        let mut tip = TooltipState::new(Triggers::HOVER, Preferred::Auto);
        tip.pointer_enter();
        assert!(tip.is_open());
        tip.pointer_leave(t0);
        assert!(!tip.tick(t0 + Duration::from_millis(199)));
        assert!(tip.is_open());
        assert!(tip.tick(t0 + HIDE_DELAY));
        assert!(!tip.is_open());
    }

    #[test]
    fn reenter_cancels_pending_hide() {
        let t0 = Instant::now();
        let mut tip = TooltipState::new(Triggers::HOVER, Preferred::Auto);
        tip.pointer_enter();
        tip.pointer_leave(t0);
        tip.pointer_enter();
        assert!(!tip.tick(t0 + Duration::from_secs(1)));
        assert!(tip.is_open());
    }

    #[test]
    fn click_toggles_only_click_tooltips() {
        let mut hover = TooltipState::new(Triggers::HOVER, Preferred::Auto);
        hover.click();
        assert!(!hover.is_open());

        let mut click = TooltipState::new(Triggers::CLICK, Preferred::Auto);
        click.pointer_enter();
        assert!(!click.is_open());
        click.click();
        assert!(click.is_open());
        click.click();
        assert!(!click.is_open());
    }

    #[test]
    fn layout_only_when_open() {
        let viewport = Viewport::new(1200.0, 800.0);
        let trigger = Rect::new(580.0, 700.0, 40.0, 20.0);
        let content = Rect::new(0.0, 0.0, 300.0, 200.0);
        let mut tip = TooltipState::new(Triggers::CLICK, Preferred::Auto);
        assert_eq!(tip.layout(trigger, content, viewport), None);
        tip.click();
        let placement = tip.layout(trigger, content, viewport).unwrap();
        assert_eq!(placement.direction, Direction::Top);
        assert_eq!(tip.placement(), placement);
    }

    #[test]
    fn explicit_preference_is_kept() {
        let mut tip = TooltipState::new(Triggers::CLICK, Preferred::Left).opened();
        let placement = tip
            .layout(
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rect::new(0.0, 0.0, 500.0, 500.0),
                Viewport::new(100.0, 100.0),
            )
            .unwrap();
        assert_eq!(placement.direction, Direction::Left);
        assert_eq!((placement.offset_x, placement.offset_y), (0.0, 0.0));
    }
}
