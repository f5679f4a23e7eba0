//! Per-object field of view: the arcs of sky an object's sensors cover.
//!
//! Views are recomputed lazily. The tick pipeline marks every view dirty
//! once per tick and the actual sweep happens on the next read, so objects
//! nobody looks at cost nothing.

use broadside_logic::angles::to_positive_degrees_delta;
use broadside_logic::xy::XY;
use serde::{Deserialize, Serialize};

/// One arc of the view, counter-clockwise from `from_angle` to `to_angle`
/// in world-frame degrees. `from_angle` is in [0, 360); `to_angle` may
/// exceed 360 when the arc wraps past zero. Arcs holding a detected object
/// carry its id; gap arcs of open sky carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleArc {
    pub from_angle: f64,
    pub to_angle: f64,
    pub object: Option<String>,
}

impl VisibleArc {
    pub fn width(&self) -> f64 {
        self.to_angle - self.from_angle
    }
}

#[derive(Debug, Default)]
pub struct FieldOfView {
    dirty: bool,
    view: Vec<VisibleArc>,
}

impl FieldOfView {
    pub fn new() -> Self {
        Self {
            dirty: true,
            view: Vec::new(),
        }
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_view(&mut self, view: Vec<VisibleArc>) {
        self.view = view;
        self.dirty = false;
    }

    pub fn view(&self) -> &[VisibleArc] {
        &self.view
    }
}

/// Sweeps the circle around `owner_position` and partitions it into arcs.
///
/// `detected` yields candidate objects as (id, center, radius), the owner
/// excluded. Objects whose nearest edge lies beyond `radar_range` are
/// dropped; the rest subtend an arc of twice `asin(radius / distance)`
/// around their bearing. Open sky between detections becomes gap arcs, so
/// the returned arcs always cover the full circle (object arcs may overlap
/// each other; gap arcs never wrap).
pub fn compute_visible_arcs<'a>(
    owner_position: XY,
    radar_range: f64,
    detected: impl Iterator<Item = (&'a str, XY, f64)>,
) -> Vec<VisibleArc> {
    if radar_range <= 0.0 {
        return Vec::new();
    }
    let mut arcs: Vec<VisibleArc> = Vec::new();
    for (id, center, radius) in detected {
        let between = center - owner_position;
        let distance = between.length();
        if distance - radius > radar_range {
            continue;
        }
        let bearing = between.angle_of();
        let half_width = (radius / distance).min(1.0).asin().to_degrees();
        let from_angle = to_positive_degrees_delta(bearing - half_width);
        arcs.push(VisibleArc {
            from_angle,
            to_angle: from_angle + 2.0 * half_width,
            object: Some(id.to_string()),
        });
    }
    arcs.sort_by(|a, b| {
        (a.from_angle, &a.object)
            .partial_cmp(&(b.from_angle, &b.object))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Union the covered intervals on [0, 360), splitting wrapped arcs, then
    // emit the complement as gap arcs.
    let mut covered: Vec<(f64, f64)> = Vec::new();
    for arc in &arcs {
        if arc.to_angle > 360.0 {
            covered.push((arc.from_angle, 360.0));
            covered.push((0.0, arc.to_angle - 360.0));
        } else {
            covered.push((arc.from_angle, arc.to_angle));
        }
    }
    covered.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut cursor = 0.0;
    for (start, end) in covered {
        if start > cursor {
            arcs.push(VisibleArc {
                from_angle: cursor,
                to_angle: start,
                object: None,
            });
        }
        cursor = cursor.max(end);
    }
    if cursor < 360.0 {
        arcs.push(VisibleArc {
            from_angle: cursor,
            to_angle: 360.0,
            object: None,
        });
    }
    arcs.sort_by(|a, b| {
        a.from_angle
            .partial_cmp(&b.from_angle)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    arcs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_arcs(view: &[VisibleArc]) -> Vec<&VisibleArc> {
        view.iter().filter(|arc| arc.object.is_some()).collect()
    }

    #[test]
    fn test_empty_sky_is_one_gap_arc() {
        let view = compute_visible_arcs(XY::ZERO, 3000.0, std::iter::empty());
        assert_eq!(
            view,
            vec![VisibleArc {
                from_angle: 0.0,
                to_angle: 360.0,
                object: None,
            }]
        );
    }

    #[test]
    fn test_zero_range_sees_nothing() {
        let detected = [("a", XY::new(10.0, 0.0), 1.0)];
        let view = compute_visible_arcs(XY::ZERO, 0.0, detected.into_iter());
        assert!(view.is_empty());
    }

    #[test]
    fn test_object_subtends_an_arc_around_its_bearing() {
        // Due north at distance 100 with radius 50: half-width asin(0.5) = 30.
        let detected = [("a", XY::new(0.0, 100.0), 50.0)];
        let view = compute_visible_arcs(XY::ZERO, 3000.0, detected.into_iter());
        let objects = object_arcs(&view);
        assert_eq!(objects.len(), 1);
        assert!((objects[0].from_angle - 60.0).abs() < 1e-9);
        assert!((objects[0].to_angle - 120.0).abs() < 1e-9);
        // The rest of the circle is open sky.
        let gap_width: f64 = view
            .iter()
            .filter(|arc| arc.object.is_none())
            .map(VisibleArc::width)
            .sum();
        assert!((gap_width - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_arc_wraps_past_zero() {
        let detected = [("a", XY::new(100.0, 0.0), 50.0)];
        let view = compute_visible_arcs(XY::ZERO, 3000.0, detected.into_iter());
        let objects = object_arcs(&view);
        assert_eq!(objects.len(), 1);
        assert!((objects[0].from_angle - 330.0).abs() < 1e-9);
        assert!((objects[0].to_angle - 390.0).abs() < 1e-9);
        // Gaps split around the wrap instead of wrapping themselves.
        let gaps: Vec<_> = view.iter().filter(|arc| arc.object.is_none()).collect();
        assert_eq!(gaps.len(), 1);
        assert!((gaps[0].from_angle - 30.0).abs() < 1e-9);
        assert!((gaps[0].to_angle - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_cuts_on_nearest_edge() {
        let detected = [
            ("near", XY::new(990.0, 0.0), 20.0),
            ("far", XY::new(1030.0, 0.0), 20.0),
        ];
        let view = compute_visible_arcs(XY::ZERO, 1000.0, detected.into_iter());
        let seen: Vec<_> = view.iter().filter_map(|arc| arc.object.as_deref()).collect();
        assert_eq!(seen, vec!["near"]);
    }

    #[test]
    fn test_views_start_dirty_until_set() {
        let mut fov = FieldOfView::new();
        assert!(fov.is_dirty());
        assert!(fov.view().is_empty());
        fov.set_view(vec![]);
        assert!(!fov.is_dirty());
        fov.set_dirty();
        assert!(fov.is_dirty());
    }
}
