use super::*;
use fd_core::Real;

/// Stationary collectible with a collision radius.
#[derive(Debug, Clone, Copy)]
pub struct Item<I> {
    pub position: Point2,
    pub width: Real,
    pub id: I,
}

/// Swept segment traced by a moving collector during one tick.
#[derive(Debug, Clone, Copy)]
pub struct Gatherer<G> {
    pub start: Point2,
    pub end: Point2,
    pub width: Real,
    pub id: G,
}

impl<G> Gatherer<G> {
    pub fn is_stationary(&self) -> bool {
        self.start == self.end
    }
}

/// One (item, gatherer) contact, ordered by `time` along the sweep.
#[derive(Debug, Clone, Copy)]
pub struct GatherEvent<I, G> {
    pub item: I,
    pub gatherer: G,
    pub sq_distance: Real,
    pub time: Real,
}

/// Projection of a point onto a gatherer's motion segment.
#[derive(Debug, Clone, Copy)]
struct Projection {
    sq_distance: Real,
    ratio: Real,
}

impl Projection {
    /// The contact counts when the projection falls on the segment and the
    /// perpendicular distance does not exceed the combined radii.
    fn is_hit(&self, collect_radius: Real) -> bool {
        if self.ratio < 0.0 || self.ratio > 1.0 {
            return false;
        }
        self.sq_distance <= collect_radius * collect_radius
    }
}

/// Project point `c` onto the segment `a -> b`. The segment must not be
/// degenerate; callers filter stationary gatherers first.
fn project(a: Point2, b: Point2, c: Point2) -> Projection {
    let u_x = c.x - a.x;
    let u_y = c.y - a.y;
    let v_x = b.x - a.x;
    let v_y = b.y - a.y;
    let u_dot_v = u_x * v_x + u_y * v_y;
    let u_len2 = u_x * u_x + u_y * u_y;
    let v_len2 = v_x * v_x + v_y * v_y;
    Projection {
        sq_distance: u_len2 - (u_dot_v * u_dot_v) / v_len2,
        ratio: u_dot_v / v_len2,
    }
}

/// Enumerates every contact between items and moving gatherers, sorted by
/// ascending contact time. The sort is stable, so simultaneous contacts keep
/// insertion order. Inputs are not mutated.
pub fn find_gather_events<I, G>(
    items: &[Item<I>],
    gatherers: &[Gatherer<G>],
) -> Vec<GatherEvent<I, G>>
where
    I: Copy,
    G: Copy,
{
    let mut events = gatherers
        .iter()
        .filter(|g| !g.is_stationary())
        .flat_map(|g| {
            items.iter().filter_map(|i| {
                let proj = project(g.start, g.end, i.position);
                proj.is_hit(g.width + i.width).then_some(GatherEvent {
                    item: i.id,
                    gatherer: g.id,
                    sq_distance: proj.sq_distance,
                    time: proj.ratio,
                })
            })
        })
        .collect::<Vec<_>>();
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    events
}
