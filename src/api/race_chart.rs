use tracing::debug;

use crate::core::{ChartLayout, Record, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::IconLookup;
use crate::render::{RenderFrame, Renderer};

use super::{ChartConfig, FrameStyle, LayoutEngine, build_render_frame};

/// Result of a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No records to draw; hosts show a placeholder instead of a chart.
    NoData,
    Rendered { placements: usize },
}

/// Main facade consumed by host applications.
///
/// `RaceChart` owns the current record set and forwards fully built frames
/// to a `Renderer`. Every call recomputes the layout from scratch.
pub struct RaceChart<R: Renderer> {
    renderer: R,
    engine: LayoutEngine,
    config: ChartConfig,
    viewport: Viewport,
    style: FrameStyle,
    records: Vec<Record>,
    icons: Option<Box<dyn IconLookup + Send + Sync>>,
}

impl<R: Renderer> RaceChart<R> {
    pub fn new(renderer: R, config: ChartConfig, viewport: Viewport) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let engine = LayoutEngine::new(&config)?;
        let style = FrameStyle {
            icon_size_px: f64::from(config.icon_pixel_size),
            ..FrameStyle::default()
        };

        Ok(Self {
            renderer,
            engine,
            config,
            viewport,
            style,
            records: Vec::new(),
            icons: None,
        })
    }

    /// Attaches an icon source used when building frames.
    #[must_use]
    pub fn with_icon_lookup(mut self, icons: impl IconLookup + Send + Sync + 'static) -> Self {
        self.icons = Some(Box::new(icons));
        self
    }

    pub fn set_frame_style(&mut self, style: FrameStyle) -> ChartResult<()> {
        style.validate()?;
        self.style = style;
        Ok(())
    }

    #[must_use]
    pub fn frame_style(&self) -> &FrameStyle {
        &self.style
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        Ok(())
    }

    pub fn set_records(&mut self, records: Vec<Record>) {
        debug!(count = records.len(), "set chart records");
        self.records = records;
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Computes the layout, or `None` when there is nothing to draw.
    ///
    /// The engine is never invoked for an empty record set.
    pub fn layout(&self) -> ChartResult<Option<ChartLayout>> {
        if self.records.is_empty() {
            return Ok(None);
        }
        self.engine.compute(&self.records).map(Some)
    }

    pub fn build_render_frame(&self) -> ChartResult<Option<RenderFrame>> {
        let Some(layout) = self.layout()? else {
            return Ok(None);
        };
        let icons = self
            .icons
            .as_deref()
            .map(|icons| icons as &dyn IconLookup);
        build_render_frame(&layout, self.viewport, &self.style, icons).map(Some)
    }

    pub fn render(&mut self) -> ChartResult<RenderOutcome> {
        let Some(frame) = self.build_render_frame()? else {
            debug!("no records, skipping chart render");
            return Ok(RenderOutcome::NoData);
        };
        self.renderer.render(&frame)?;
        Ok(RenderOutcome::Rendered {
            placements: self.records.len(),
        })
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
