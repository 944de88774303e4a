//! Click regions recorded while drawing
//!
//! Each frame the renderer records where clickable things ended up. Later
//! regions sit on top of earlier ones, so the last region containing a
//! point wins. A `Sink` region swallows the click.

use crate::view::Msg;
use ratatui::layout::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Msg(Msg),
    Sink,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub area: Rect,
    pub target: Target,
}

#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<Region>,
}

impl HitMap {
    pub fn push(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push(Region { area, target });
        }
    }

    pub fn push_msg(&mut self, area: Rect, msg: Option<&Msg>) {
        if let Some(msg) = msg {
            self.push(area, Target::Msg(msg.clone()));
        }
    }

    /// Topmost target under the point
    pub fn hit(&self, column: u16, row: u16) -> Option<&Target> {
        self.regions
            .iter()
            .rev()
            .find(|r| contains(r.area, column, row))
            .map(|r| &r.target)
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
