use crate::error::ChartResult;
use crate::render::{MarkerGlyph, RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so invalid geometry is caught without a
/// drawing backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_line_count: usize,
    pub last_text_count: usize,
    pub last_marker_count: usize,
    pub last_image_marker_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_line_count = frame.lines.len();
        self.last_text_count = frame.texts.len();
        self.last_marker_count = frame.markers.len();
        self.last_image_marker_count = frame
            .markers
            .iter()
            .filter(|marker| matches!(marker.glyph, MarkerGlyph::Image { .. }))
            .count();
        Ok(())
    }
}
