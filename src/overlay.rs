// src/overlay.rs
//
// Annotation pass, run on the output Mat after the decision has been made:
//   - vertical center guide
//   - ROI band outline
//   - area-gated cone boxes
//   - filled marker on each slot point
//   - decision bar + label along the top edge

use crate::pipeline::FrameResult;
use crate::types::{Rect, SteeringDecision};
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
};

/// Colors used for annotation (BGR format for OpenCV).
pub mod colors {
    use opencv::core::Scalar;

    pub const CENTER_LINE: Scalar = Scalar::new(255.0, 0.0, 0.0, 0.0);
    pub const ROI_OUTLINE: Scalar = Scalar::new(200.0, 200.0, 200.0, 0.0);
    pub const CONE_BOX: Scalar = Scalar::new(0.0, 0.0, 255.0, 0.0);
    pub const CONE_MARKER: Scalar = Scalar::new(0.0, 255.0, 0.0, 0.0);

    pub const STRAIGHT: Scalar = Scalar::new(0.0, 200.0, 0.0, 0.0);
    pub const LEFT: Scalar = Scalar::new(255.0, 160.0, 0.0, 0.0);
    pub const RIGHT: Scalar = Scalar::new(0.0, 200.0, 255.0, 0.0);
    pub const AMBIGUOUS: Scalar = Scalar::new(0.0, 0.0, 220.0, 0.0);
}

#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    pub line_thickness: i32,
    pub marker_radius: i32,
    pub decision_bar_height: i32,
    pub draw_roi: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_thickness: 2,
            marker_radius: 25,
            decision_bar_height: 12,
            draw_roi: true,
        }
    }
}

pub fn decision_color(decision: SteeringDecision) -> core::Scalar {
    match decision {
        SteeringDecision::Straight => colors::STRAIGHT,
        SteeringDecision::Left => colors::LEFT,
        SteeringDecision::Right => colors::RIGHT,
        SteeringDecision::Ambiguous => colors::AMBIGUOUS,
    }
}

fn cv_rect(rect: Rect) -> core::Rect {
    core::Rect::new(rect.x, rect.y, rect.width, rect.height)
}

/// Draws `result` onto `output` in place.
pub fn annotate(output: &mut Mat, result: &FrameResult, style: &OverlayStyle) -> opencv::Result<()> {
    let width = output.cols();
    let height = output.rows();
    let t = style.line_thickness.max(1);

    imgproc::line(
        output,
        core::Point::new(width / 2, 0),
        core::Point::new(width / 2, height),
        colors::CENTER_LINE,
        t,
        imgproc::LINE_8,
        0,
    )?;

    if style.draw_roi {
        imgproc::rectangle(
            output,
            cv_rect(result.roi),
            colors::ROI_OUTLINE,
            1,
            imgproc::LINE_8,
            0,
        )?;
    }

    for bbox in result.boxes.iter() {
        imgproc::rectangle(output, cv_rect(bbox), colors::CONE_BOX, t, imgproc::LINE_8, 0)?;
    }

    for detection in [result.slots.left, result.slots.right] {
        if let Some(p) = detection.as_option() {
            imgproc::circle(
                output,
                core::Point::new(p.x, p.y),
                style.marker_radius,
                colors::CONE_MARKER,
                -1,
                imgproc::LINE_8,
                0,
            )?;
        }
    }

    let state_color = decision_color(result.decision);
    imgproc::rectangle(
        output,
        core::Rect::new(0, 0, width, style.decision_bar_height),
        state_color,
        -1,
        imgproc::LINE_8,
        0,
    )?;
    imgproc::put_text(
        output,
        result.decision.as_str(),
        core::Point::new(10, style.decision_bar_height + 28),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.8,
        state_color,
        2,
        imgproc::LINE_8,
        false,
    )?;

    Ok(())
}
