use serde::Serialize;

/// Horizontal geometry of a progress-bar segment, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSpan {
    pub left: f32,
    pub width: f32,
}

/// The single tooltip shown above a hovered segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub segment: usize,
    pub text: String,
    /// Left edge in container coordinates.
    pub left: f32,
}

/// Left edge for a popup of `popup_width` centered over `span`, shifted back inside a
/// container of `container_width`.
///
/// Right overflow shifts the popup left by the overflow amount; left overflow pins it to 0.
/// A popup wider than the container is pinned to 0.
pub fn place(span: SegmentSpan, popup_width: f32, container_width: f32) -> f32 {
    let centered = span.left + span.width / 2.0 - popup_width / 2.0;
    if centered + popup_width >= container_width {
        let overflow = centered + popup_width - container_width;
        (centered - overflow).max(0.0)
    } else if centered < 0.0 {
        0.0
    } else {
        centered
    }
}
