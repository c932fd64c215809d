use egui::{Color32, Pos2, Rect, Response, Sense, Shape, Stroke, Ui};
use notewise_domain::{Clef, NoteTarget};

use crate::layout::StaffGeometry;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaffStyle {
    pub line_color: Color32,
    pub note_color: Color32,
    pub line_width: f32,
    /// Horizontal note position as a fraction of the staff width.
    pub note_x: f32,
}

impl Default for StaffStyle {
    fn default() -> Self {
        Self {
            line_color: Color32::from_gray(40),
            note_color: Color32::BLACK,
            line_width: 1.0,
            note_x: 0.5,
        }
    }
}

/// Shapes for one staff and an optional target, offset from `rect.top()`.
///
/// Staff lines come first, then ledger lines, then the note head. A target
/// must belong to the staff's clef.
pub fn staff_shapes(
    rect: Rect,
    clef: Clef,
    target: Option<&NoteTarget>,
    geometry: &StaffGeometry,
    style: &StaffStyle,
) -> Vec<Shape> {
    if let Some(target) = target {
        debug_assert_eq!(target.clef, clef, "target drawn on the wrong staff");
    }
    let stroke = Stroke::new(style.line_width, style.line_color);
    let mut shapes: Vec<Shape> = geometry
        .staff_lines(clef)
        .iter()
        .map(|y| {
            let y = rect.top() + y;
            Shape::line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke)
        })
        .collect();

    if let Some(target) = target {
        let x = rect.left() + rect.width() * style.note_x;
        let half_width = geometry.line_spacing * 1.2;
        for y in geometry.ledger_lines(target.midi, target.clef) {
            let y = rect.top() + y;
            shapes.push(Shape::line_segment(
                [Pos2::new(x - half_width, y), Pos2::new(x + half_width, y)],
                stroke,
            ));
        }
        let center = Pos2::new(x, rect.top() + geometry.y(target.midi, target.clef));
        shapes.push(Shape::circle_filled(
            center,
            geometry.half_line_spacing(),
            style.note_color,
        ));
    }
    shapes
}

/// Vertical span `(top, bottom)` in geometry coordinates that holds the staff
/// and the target's note head with its ledger lines.
pub fn staff_extent(
    clef: Clef,
    target: Option<&NoteTarget>,
    geometry: &StaffGeometry,
) -> (f32, f32) {
    let mut top = 0.0_f32;
    let mut bottom = geometry.middle_line_y(clef) * 2.0;
    if let Some(target) = target {
        let y = geometry.y(target.midi, target.clef);
        top = top.min(y - geometry.line_spacing);
        bottom = bottom.max(y + geometry.line_spacing);
    }
    (top, bottom)
}

/// Paints a staff with the current target. The same geometry drawn at a
/// different rect origin yields the same relative layout, which is what
/// results thumbnails rely on.
pub struct StaffView {
    geometry: StaffGeometry,
    style: StaffStyle,
}

impl StaffView {
    pub fn new(geometry: StaffGeometry) -> Self {
        Self {
            geometry,
            style: StaffStyle::default(),
        }
    }

    pub fn with_style(mut self, style: StaffStyle) -> Self {
        self.style = style;
        self
    }

    pub fn geometry(&self) -> &StaffGeometry {
        &self.geometry
    }

    pub fn desired_height(&self, clef: Clef, target: Option<&NoteTarget>) -> f32 {
        let (top, bottom) = staff_extent(clef, target, &self.geometry);
        bottom - top
    }

    /// Rect whose top is the geometry origin, so notes above the staff land
    /// inside `allocated`.
    pub fn drawing_rect(
        &self,
        allocated: Rect,
        clef: Clef,
        target: Option<&NoteTarget>,
    ) -> Rect {
        let (top, _) = staff_extent(clef, target, &self.geometry);
        allocated.translate(egui::vec2(0.0, -top))
    }

    pub fn draw(&self, ui: &mut Ui, clef: Clef, target: Option<&NoteTarget>) -> Response {
        let height = self.desired_height(clef, target);
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::hover());
        let painter = ui.painter_at(rect);
        let origin = self.drawing_rect(rect, clef, target);
        for shape in staff_shapes(origin, clef, target, &self.geometry, &self.style) {
            painter.add(shape);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn horizontal_line_ys(shapes: &[Shape]) -> Vec<f32> {
        shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::LineSegment { points, .. } => Some(points[0].y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn middle_c_draws_staff_ledger_and_head() {
        let geometry = StaffGeometry::centered(50.0, 10.0);
        let rect = Rect::from_min_size(Pos2::new(0.0, 0.0), egui::vec2(200.0, 100.0));
        let target = NoteTarget::natural(60, Clef::Treble).unwrap();
        let shapes = staff_shapes(
            rect,
            Clef::Treble,
            Some(&target),
            &geometry,
            &StaffStyle::default(),
        );
        assert_eq!(shapes.len(), 5 + 1 + 1);
        let ys = horizontal_line_ys(&shapes);
        assert_eq!(ys.len(), 6);
        assert_relative_eq!(ys[5], 80.0);
        match shapes.last() {
            Some(Shape::Circle(circle)) => {
                assert_relative_eq!(circle.center.y, 80.0);
                assert_relative_eq!(circle.center.x, 100.0);
            }
            other => panic!("expected note head, got {other:?}"),
        }
    }

    #[test]
    fn thumbnail_matches_live_layout() {
        let geometry = StaffGeometry::default();
        let target = NoteTarget::natural(84, Clef::Treble).unwrap();
        let live = Rect::from_min_size(Pos2::new(0.0, 0.0), egui::vec2(400.0, 160.0));
        let thumb = Rect::from_min_size(Pos2::new(30.0, 500.0), egui::vec2(80.0, 160.0));
        let style = StaffStyle::default();
        let live_ys: Vec<f32> = horizontal_line_ys(&staff_shapes(
            live,
            Clef::Treble,
            Some(&target),
            &geometry,
            &style,
        ));
        let thumb_ys: Vec<f32> = horizontal_line_ys(&staff_shapes(
            thumb,
            Clef::Treble,
            Some(&target),
            &geometry,
            &style,
        ))
        .into_iter()
        .map(|y| y - 500.0)
        .collect();
        assert_eq!(live_ys, thumb_ys);
    }

    #[test]
    fn range_extremes_fit_inside_the_view() {
        let view = StaffView::new(StaffGeometry::default());
        for (midi, clef) in [(108, Clef::Treble), (21, Clef::Bass)] {
            let target = NoteTarget::natural(midi, clef).unwrap();
            let height = view.desired_height(clef, Some(&target));
            let allocated = Rect::from_min_size(Pos2::new(0.0, 40.0), egui::vec2(200.0, height));
            let origin = view.drawing_rect(allocated, clef, Some(&target));
            let shapes = staff_shapes(
                origin,
                clef,
                Some(&target),
                view.geometry(),
                &StaffStyle::default(),
            );
            for y in horizontal_line_ys(&shapes) {
                assert!(
                    y >= allocated.top() && y <= allocated.bottom(),
                    "{midi}: line {y} outside"
                );
            }
            match shapes.last() {
                Some(Shape::Circle(circle)) => {
                    assert!(circle.center.y - circle.radius >= allocated.top(), "{midi}");
                    assert!(circle.center.y + circle.radius <= allocated.bottom(), "{midi}");
                }
                other => panic!("expected note head, got {other:?}"),
            }
        }
    }

    #[test]
    fn staff_only_view_keeps_default_height() {
        let view = StaffView::new(StaffGeometry::default());
        assert_relative_eq!(view.desired_height(Clef::Treble, None), 160.0);
        let b4 = NoteTarget::natural(71, Clef::Treble).unwrap();
        assert_relative_eq!(view.desired_height(Clef::Treble, Some(&b4)), 160.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "wrong staff")]
    fn target_on_other_clef_is_rejected() {
        let target = NoteTarget::natural(48, Clef::Bass).unwrap();
        staff_shapes(
            Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 160.0)),
            Clef::Treble,
            Some(&target),
            &StaffGeometry::default(),
            &StaffStyle::default(),
        );
    }

    #[test]
    fn empty_staff_has_five_lines() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0));
        let shapes = staff_shapes(
            rect,
            Clef::Bass,
            None,
            &StaffGeometry::default(),
            &StaffStyle::default(),
        );
        assert_eq!(shapes.len(), 5);
    }
}
