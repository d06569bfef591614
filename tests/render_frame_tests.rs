use std::sync::Arc;

use race_chart::api::{FrameStyle, build_render_frame};
use race_chart::core::{Record, Viewport};
use race_chart::extensions::{IconLookup, RasterIcon};
use race_chart::render::{MarkerGlyph, NullRenderer, TextVAnchor};
use race_chart::{ChartConfig, ChartError, LayoutEngine, RaceChart, RenderOutcome};

struct StubIcons;

impl IconLookup for StubIcons {
    fn raster(&self, reference: &str) -> Option<Arc<RasterIcon>> {
        reference.ends_with("ok.png").then(|| {
            Arc::new(RasterIcon {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            })
        })
    }
}

fn sample_records() -> Vec<Record> {
    vec![
        Record::new("Ana", 10).expect("record"),
        Record::new("Bo", 20).expect("record"),
        Record::new("Cy", 20).expect("record"),
    ]
}

fn chart() -> RaceChart<NullRenderer> {
    RaceChart::new(
        NullRenderer::default(),
        ChartConfig::default(),
        Viewport::new(900, 320),
    )
    .expect("chart")
}

#[test]
fn render_emits_grid_axis_stems_markers_and_labels() {
    let mut chart = chart();
    chart.set_records(sample_records());

    let outcome = chart.render().expect("render");
    assert_eq!(outcome, RenderOutcome::Rendered { placements: 3 });

    let renderer = chart.into_renderer();
    assert_eq!(renderer.frames_rendered, 1);
    // 11 gridlines, one axis line, three stems.
    assert_eq!(renderer.last_line_count, 15);
    // 11 tick labels and three name labels.
    assert_eq!(renderer.last_text_count, 14);
    assert_eq!(renderer.last_marker_count, 3);
    assert_eq!(renderer.last_image_marker_count, 0);
}

#[test]
fn empty_chart_reports_no_data_without_rendering() {
    let mut chart = chart();
    assert_eq!(chart.render().expect("render"), RenderOutcome::NoData);
    assert!(chart.build_render_frame().expect("frame").is_none());
    assert_eq!(chart.into_renderer().frames_rendered, 0);
}

#[test]
fn marker_glyph_follows_icon_kind_and_availability() {
    let records = vec![
        Record::new("Ana", 10).expect("record").with_icon("🐢"),
        Record::new("Bo", 20).expect("record").with_icon("ok.png"),
        Record::new("Cy", 30).expect("record").with_icon("gone.png"),
        Record::new("Di", 40).expect("record"),
    ];
    let mut chart = chart().with_icon_lookup(StubIcons);
    chart.set_records(records);

    let frame = chart.build_render_frame().expect("frame").expect("some");
    let glyphs: Vec<&MarkerGlyph> = frame.markers.iter().map(|marker| &marker.glyph).collect();
    assert_eq!(
        glyphs,
        vec![
            &MarkerGlyph::Text("🐢".to_owned()),
            &MarkerGlyph::Image {
                reference: "ok.png".to_owned()
            },
            &MarkerGlyph::Dot,
            &MarkerGlyph::Dot,
        ]
    );

    chart.render().expect("render");
    assert_eq!(chart.into_renderer().last_image_marker_count, 1);
}

#[test]
fn raster_icons_degrade_to_dots_without_lookup() {
    let mut chart = chart();
    chart.set_records(vec![
        Record::new("Bo", 20)
            .expect("record")
            .with_icon("https://example.com/ok.png"),
    ]);
    let frame = chart.build_render_frame().expect("frame").expect("some");
    assert_eq!(frame.markers[0].glyph, MarkerGlyph::Dot);
}

#[test]
fn labels_are_drawn_above_markers_in_pixel_space() {
    let mut chart = chart();
    chart.set_records(sample_records());
    let frame = chart.build_render_frame().expect("frame").expect("some");

    let labels: Vec<_> = frame
        .texts
        .iter()
        .filter(|text| text.v_anchor == TextVAnchor::Bottom)
        .collect();
    assert_eq!(labels.len(), frame.markers.len());
    for (label, marker) in labels.iter().zip(&frame.markers) {
        assert!(label.bold);
        assert!((label.x - marker.x).abs() < 1e-9);
        assert!(label.y < marker.y);
    }
    assert!(frame.markers[1].y > frame.markers[2].y);
}

#[test]
fn title_adds_one_text_primitive() {
    let layout = LayoutEngine::new(&ChartConfig::default())
        .expect("engine")
        .compute(&sample_records())
        .expect("layout");
    let viewport = Viewport::new(900, 320);

    let plain = build_render_frame(&layout, viewport, &FrameStyle::default(), None).expect("plain");
    let titled = build_render_frame(
        &layout,
        viewport,
        &FrameStyle::default().with_title("Reading race"),
        None,
    )
    .expect("titled");
    assert_eq!(titled.texts.len(), plain.texts.len() + 1);
    assert_eq!(titled.texts.last().map(|text| text.text.as_str()), Some("Reading race"));
}

#[test]
fn icon_size_follows_config() {
    let chart = RaceChart::new(
        NullRenderer::default(),
        ChartConfig::default().with_icon_pixel_size(32),
        Viewport::new(900, 320),
    )
    .expect("chart");
    assert!((chart.frame_style().icon_size_px - 32.0).abs() < 1e-12);
}

#[test]
fn viewports_too_small_or_empty_are_rejected() {
    let layout = LayoutEngine::new(&ChartConfig::default())
        .expect("engine")
        .compute(&sample_records())
        .expect("layout");
    let tiny = build_render_frame(&layout, Viewport::new(40, 40), &FrameStyle::default(), None);
    assert!(matches!(tiny, Err(ChartError::InvalidData(_))));

    let zero = RaceChart::new(
        NullRenderer::default(),
        ChartConfig::default(),
        Viewport::new(0, 300),
    );
    assert!(matches!(
        zero,
        Err(ChartError::InvalidViewport {
            width: 0,
            height: 300
        })
    ));

    let mut chart = chart();
    assert!(chart.set_viewport(Viewport::new(600, 0)).is_err());
    assert_eq!(chart.viewport(), Viewport::new(900, 320));
}
