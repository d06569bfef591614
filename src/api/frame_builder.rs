use serde::{Deserialize, Serialize};

use crate::core::{ChartLayout, IconKind, LinearScale, Placement, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::IconLookup;
use crate::render::{
    Color, LinePrimitive, MarkerGlyph, MarkerPrimitive, RenderFrame, TextHAlign, TextPrimitive,
    TextVAnchor,
};

/// Visual parameters for turning a layout into draw primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    pub padding_left_px: f64,
    pub padding_right_px: f64,
    pub padding_top_px: f64,
    pub padding_bottom_px: f64,
    /// Lowest visible layout unit below the axis line.
    pub y_floor: f64,
    /// Minimum highest visible layout unit.
    pub y_ceiling: f64,
    /// Extra room kept above the top label and below the lowest marker.
    pub y_headroom: f64,
    pub axis_color: Color,
    pub grid_color: Color,
    pub stem_color: Color,
    pub marker_color: Color,
    pub text_color: Color,
    pub axis_stroke_width: f64,
    pub grid_stroke_width: f64,
    pub stem_stroke_width: f64,
    pub dot_size_px: f64,
    pub glyph_font_size_px: f64,
    pub label_font_size_px: f64,
    pub tick_font_size_px: f64,
    pub title_font_size_px: f64,
    pub icon_size_px: f64,
    pub title: Option<String>,
}

impl Default for FrameStyle {
    fn default() -> Self {
        let ink = Color::rgb(0.12, 0.14, 0.17);
        Self {
            padding_left_px: 24.0,
            padding_right_px: 24.0,
            padding_top_px: 36.0,
            padding_bottom_px: 28.0,
            y_floor: -0.6,
            y_ceiling: 2.0,
            y_headroom: 0.25,
            axis_color: ink,
            grid_color: ink.with_alpha(0.25),
            stem_color: Color::rgba(0.12, 0.47, 0.71, 0.6),
            marker_color: Color::rgb(0.12, 0.47, 0.71),
            text_color: ink,
            axis_stroke_width: 1.0,
            grid_stroke_width: 1.0,
            stem_stroke_width: 0.8,
            dot_size_px: 8.0,
            glyph_font_size_px: 29.0,
            label_font_size_px: 12.0,
            tick_font_size_px: 12.0,
            title_font_size_px: 16.0,
            icon_size_px: 48.0,
            title: None,
        }
    }
}

impl FrameStyle {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (value, name) in [
            (self.padding_left_px, "padding_left_px"),
            (self.padding_right_px, "padding_right_px"),
            (self.padding_top_px, "padding_top_px"),
            (self.padding_bottom_px, "padding_bottom_px"),
            (self.y_headroom, "y_headroom"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "frame style `{name}` must be finite and >= 0"
                )));
            }
        }
        for (value, name) in [
            (self.axis_stroke_width, "axis_stroke_width"),
            (self.grid_stroke_width, "grid_stroke_width"),
            (self.stem_stroke_width, "stem_stroke_width"),
            (self.dot_size_px, "dot_size_px"),
            (self.glyph_font_size_px, "glyph_font_size_px"),
            (self.label_font_size_px, "label_font_size_px"),
            (self.tick_font_size_px, "tick_font_size_px"),
            (self.title_font_size_px, "title_font_size_px"),
            (self.icon_size_px, "icon_size_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "frame style `{name}` must be finite and > 0"
                )));
            }
        }
        if !self.y_floor.is_finite() || !self.y_ceiling.is_finite() || self.y_floor >= 0.0 {
            return Err(ChartError::InvalidConfig(
                "frame style y range must be finite with `y_floor` < 0".to_owned(),
            ));
        }
        for color in [
            self.axis_color,
            self.grid_color,
            self.stem_color,
            self.marker_color,
            self.text_color,
        ] {
            color.validate()?;
        }
        Ok(())
    }
}

/// Materializes a layout into pixel-space draw primitives.
///
/// Raster icons are only referenced when `icons` reports them available;
/// everything else degrades to a dot.
pub fn build_render_frame(
    layout: &ChartLayout,
    viewport: Viewport,
    style: &FrameStyle,
    icons: Option<&dyn IconLookup>,
) -> ChartResult<RenderFrame> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    style.validate()?;

    let plot_left = style.padding_left_px;
    let plot_right = f64::from(viewport.width) - style.padding_right_px;
    let plot_top = style.padding_top_px;
    let plot_bottom = f64::from(viewport.height) - style.padding_bottom_px;
    if plot_right <= plot_left || plot_bottom <= plot_top {
        return Err(ChartError::InvalidData(
            "viewport is too small for the frame paddings".to_owned(),
        ));
    }

    let x_scale = LinearScale::new((0.0, layout.axis.max as f64), (plot_left, plot_right))?;
    let y_low = style
        .y_floor
        .min(layout.bottom_marker_y() - style.y_headroom);
    let y_high = style.y_ceiling.max(layout.top_label_y() + style.y_headroom);
    let y_scale = LinearScale::new((y_low, y_high), (plot_bottom, plot_top))?;

    let mut frame = RenderFrame::new(viewport);
    let axis_y = y_scale.to_pixel(0.0)?;

    for tick in &layout.axis.ticks {
        let x = x_scale.to_pixel(tick.value as f64)?;
        frame.lines.push(LinePrimitive::new(
            x,
            plot_top,
            x,
            plot_bottom,
            style.grid_stroke_width,
            style.grid_color,
        ));
        frame.texts.push(
            TextPrimitive::new(
                tick.label.clone(),
                x,
                plot_bottom + 4.0,
                style.tick_font_size_px,
                style.text_color,
                TextHAlign::Center,
            )
            .with_v_anchor(TextVAnchor::Top),
        );
    }

    frame.lines.push(LinePrimitive::new(
        plot_left,
        axis_y,
        plot_right,
        axis_y,
        style.axis_stroke_width,
        style.axis_color,
    ));

    for placement in &layout.placements {
        push_placement(&mut frame, placement, x_scale, y_scale, style, icons)?;
    }

    if let Some(title) = style.title.as_deref().filter(|title| !title.is_empty()) {
        frame.texts.push(
            TextPrimitive::new(
                title,
                0.5 * f64::from(viewport.width),
                0.5 * style.padding_top_px,
                style.title_font_size_px,
                style.text_color,
                TextHAlign::Center,
            )
            .bold(),
        );
    }

    Ok(frame)
}

fn push_placement(
    frame: &mut RenderFrame,
    placement: &Placement,
    x_scale: LinearScale,
    y_scale: LinearScale,
    style: &FrameStyle,
    icons: Option<&dyn IconLookup>,
) -> ChartResult<()> {
    let x = x_scale.to_pixel(placement.marker.x as f64)?;
    let stem = placement.marker.stem;
    if stem.y_end > stem.y_start {
        frame.lines.push(LinePrimitive::new(
            x,
            y_scale.to_pixel(stem.y_start)?,
            x,
            y_scale.to_pixel(stem.y_end)?,
            style.stem_stroke_width,
            style.stem_color,
        ));
    }

    let reference = placement.record.icon_ref();
    let (glyph, size_px) = match placement.icon {
        IconKind::Url | IconKind::LocalPath
            if icons.is_some_and(|lookup| lookup.raster(reference).is_some()) =>
        {
            (
                MarkerGlyph::Image {
                    reference: reference.to_owned(),
                },
                style.icon_size_px,
            )
        }
        IconKind::LiteralGlyph => (
            MarkerGlyph::Text(reference.to_owned()),
            style.glyph_font_size_px,
        ),
        IconKind::Url | IconKind::LocalPath | IconKind::None => {
            (MarkerGlyph::Dot, style.dot_size_px)
        }
    };
    frame.markers.push(MarkerPrimitive::new(
        x,
        y_scale.to_pixel(placement.marker.y)?,
        size_px,
        glyph,
        style.marker_color,
    ));

    frame.texts.push(
        TextPrimitive::new(
            placement.record.name(),
            x,
            y_scale.to_pixel(placement.label.y)?,
            style.label_font_size_px,
            style.text_color,
            TextHAlign::Center,
        )
        .with_v_anchor(TextVAnchor::Bottom)
        .bold(),
    );
    Ok(())
}
