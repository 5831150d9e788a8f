//! Scroll-bound regions with enter/leave edges.
//!
//! A region is active while the trigger line (a fixed fraction down the
//! viewport) lies within `[start, end)` in document coordinates.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub start: f32,
    pub end: f32,
}

impl Region {
    /// Region spanning an element's box, given its document offset and height.
    pub fn from_box(top: f32, height: f32) -> Self {
        Self {
            start: top,
            end: top + height.max(0.0),
        }
    }

    fn locate(&self, line: f32) -> Position {
        if line < self.start {
            Position::Before
        } else if line >= self.end {
            Position::After
        } else {
            Position::Inside
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Before,
    Inside,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Entered scrolling down.
    Enter,
    /// Left through the bottom scrolling down.
    Leave,
    /// Entered from below scrolling up.
    EnterBack,
    /// Left through the top scrolling up.
    LeaveBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEvent {
    pub region: usize,
    pub edge: Edge,
}

#[derive(Debug)]
pub struct ScrollTracker {
    regions: Vec<Region>,
    positions: Vec<Position>,
    marker: f32,
    viewport_height: f32,
    last_line: f32,
}

impl ScrollTracker {
    /// `marker` is the trigger line as a fraction of viewport height (0.5 =
    /// centre). All regions start out `Before`, so the first `update` at a
    /// scrolled position replays the forward edges in order.
    pub fn new(regions: Vec<Region>, marker: f32, viewport_height: f32) -> Self {
        let positions = vec![Position::Before; regions.len()];
        Self {
            regions,
            positions,
            marker: marker.clamp(0.0, 1.0),
            viewport_height,
            last_line: f32::NEG_INFINITY,
        }
    }

    /// Replaces region bounds after a layout change. Edge state is kept; the
    /// next `update` reports whatever the new layout implies.
    pub fn relayout(&mut self, regions: Vec<Region>, viewport_height: f32) {
        self.positions.resize(regions.len(), Position::Before);
        self.regions = regions;
        self.viewport_height = viewport_height;
    }

    pub fn update(&mut self, scroll_y: f32) -> Vec<RegionEvent> {
        let line = scroll_y + self.viewport_height * self.marker;
        let forward = line >= self.last_line;
        self.last_line = line;

        let mut events = Vec::new();
        let order: Box<dyn Iterator<Item = usize>> = if forward {
            Box::new(0..self.regions.len())
        } else {
            Box::new((0..self.regions.len()).rev())
        };
        for i in order {
            let was = self.positions[i];
            let now = self.regions[i].locate(line);
            if was == now {
                continue;
            }
            self.positions[i] = now;
            let edges: &[Edge] = match (was, now) {
                (Position::Before, Position::Inside) => &[Edge::Enter],
                (Position::Before, Position::After) => &[Edge::Enter, Edge::Leave],
                (Position::Inside, Position::After) => &[Edge::Leave],
                (Position::After, Position::Inside) => &[Edge::EnterBack],
                (Position::After, Position::Before) => &[Edge::EnterBack, Edge::LeaveBack],
                (Position::Inside, Position::Before) => &[Edge::LeaveBack],
                _ => &[],
            };
            events.extend(edges.iter().map(|&edge| RegionEvent { region: i, edge }));
        }
        events
    }

    pub fn is_active(&self, region: usize) -> bool {
        self.positions.get(region) == Some(&Position::Inside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ScrollTracker {
        // Line sits at scroll_y + 50.
        ScrollTracker::new(
            vec![
                Region::from_box(100.0, 100.0),
                Region::from_box(200.0, 100.0),
                Region::from_box(300.0, 100.0),
            ],
            0.5,
            100.0,
        )
    }

    fn ev(region: usize, edge: Edge) -> RegionEvent {
        RegionEvent { region, edge }
    }

    #[test]
    fn scrolling_down_then_up() {
        let mut t = tracker();
        assert!(t.update(0.0).is_empty());
        assert_eq!(t.update(60.0), vec![ev(0, Edge::Enter)]);
        assert_eq!(t.update(160.0), vec![ev(0, Edge::Leave), ev(1, Edge::Enter)]);
        assert!(t.is_active(1));
        assert_eq!(t.update(140.0), vec![ev(1, Edge::LeaveBack), ev(0, Edge::EnterBack)]);
    }

    #[test]
    fn jump_replays_every_edge_in_order() {
        let mut t = tracker();
        assert_eq!(
            t.update(300.0),
            vec![
                ev(0, Edge::Enter),
                ev(0, Edge::Leave),
                ev(1, Edge::Enter),
                ev(1, Edge::Leave),
                ev(2, Edge::Enter),
            ]
        );
        assert_eq!(
            t.update(0.0),
            vec![
                ev(2, Edge::LeaveBack),
                ev(1, Edge::EnterBack),
                ev(1, Edge::LeaveBack),
                ev(0, Edge::EnterBack),
                ev(0, Edge::LeaveBack),
            ]
        );
    }

    #[test]
    fn relayout_reports_new_membership() {
        let mut t = tracker();
        t.update(60.0);
        t.relayout(vec![Region::from_box(500.0, 100.0)], 100.0);
        assert_eq!(t.update(60.0), vec![ev(0, Edge::LeaveBack)]);
    }
}
