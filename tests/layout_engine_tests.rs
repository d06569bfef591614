use approx::assert_abs_diff_eq;
use race_chart::core::{IconKind, Record, RoundingPolicy, StackingVariant, Viewport};
use race_chart::render::NullRenderer;
use race_chart::{ChartConfig, ChartError, LayoutEngine, RaceChart};

fn named(entries: &[(&str, u64)]) -> Vec<Record> {
    entries
        .iter()
        .map(|(name, value)| Record::new(*name, *value).expect("record"))
        .collect()
}

#[test]
fn tied_leaders_are_stacked_and_share_label_level() {
    let engine = LayoutEngine::new(&ChartConfig::default()).expect("engine");
    let layout = engine
        .compute(&named(&[("A", 100), ("B", 100)]))
        .expect("layout");

    assert_eq!(layout.axis.max, 200);
    let a = layout.placement_for_input(0).expect("A");
    let b = layout.placement_for_input(1).expect("B");

    assert_eq!(a.marker.x, 100);
    assert_eq!(b.marker.x, 100);
    assert_abs_diff_eq!(a.marker.y, 0.375, epsilon = 1e-12);
    assert_abs_diff_eq!(b.marker.y, 0.725, epsilon = 1e-12);
    assert_abs_diff_eq!(b.marker.y - a.marker.y, 0.35, epsilon = 1e-12);
    assert_eq!(a.label.level, 0);
    assert_eq!(b.label.level, 0);
    assert!(a.label.y > a.marker.y);
    assert!(b.label.y > b.marker.y);
    assert_eq!(layout.cluster_count, 1);
}

#[test]
fn close_values_get_staggered_label_levels() {
    let config = ChartConfig::default().with_min_axis_max(100);
    let layout = LayoutEngine::new(&config)
        .expect("engine")
        .compute(&named(&[("x", 10), ("y", 11), ("z", 12)]))
        .expect("layout");

    assert_eq!(layout.axis.max, 100);
    let levels: Vec<usize> = layout
        .placements
        .iter()
        .map(|placement| placement.label.level)
        .collect();
    assert_eq!(levels, vec![0, 1, 2]);
    for placement in &layout.placements {
        assert_abs_diff_eq!(placement.marker.y, 0.55);
    }
    assert_abs_diff_eq!(layout.placements[2].label.y, 0.55 + 0.85, epsilon = 1e-12);
}

#[test]
fn placements_are_ordered_by_value_with_ties_in_input_order() {
    let layout = LayoutEngine::new(&ChartConfig::default())
        .expect("engine")
        .compute(&named(&[("c", 30), ("a", 10), ("d", 30), ("b", 20)]))
        .expect("layout");

    let names: Vec<&str> = layout
        .placements
        .iter()
        .map(|placement| placement.record.name())
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    let inputs: Vec<usize> = layout
        .placements
        .iter()
        .map(|placement| placement.input_index)
        .collect();
    assert_eq!(inputs, vec![1, 3, 0, 2]);
}

#[test]
fn empty_input_never_reaches_layout() {
    let engine = LayoutEngine::new(&ChartConfig::default()).expect("engine");
    assert!(matches!(engine.compute(&[]), Err(ChartError::EmptyDataset)));

    let chart = RaceChart::new(
        NullRenderer::default(),
        ChartConfig::default(),
        Viewport::new(800, 300),
    )
    .expect("chart");
    assert_eq!(chart.layout().expect("layout"), None);
}

#[test]
fn layout_is_idempotent() {
    let records = vec![
        Record::new("Ana", 120).expect("record").with_icon("🐢"),
        Record::new("Bo", 120).expect("record"),
        Record::new("Cy", 7).expect("record").with_icon("avatars/cy.png"),
        Record::new("Di", 125).expect("record"),
    ];
    let engine = LayoutEngine::new(&ChartConfig::default()).expect("engine");

    let first = engine.compute(&records).expect("first");
    let second = engine.compute(&records).expect("second");
    assert_eq!(first, second);
    assert_eq!(
        first.to_json_pretty().expect("json"),
        second.to_json_pretty().expect("json")
    );
}

#[test]
fn icon_kind_never_changes_positions() {
    let plain = named(&[("Ana", 40), ("Bo", 40), ("Cy", 41)]);
    let decorated = vec![
        Record::new("Ana", 40)
            .expect("record")
            .with_icon("https://example.com/ana.png"),
        Record::new("Bo", 40).expect("record").with_icon("🦊"),
        Record::new("Cy", 41).expect("record").with_icon("cy.webp"),
    ];
    let engine = LayoutEngine::new(&ChartConfig::default()).expect("engine");
    let plain_layout = engine.compute(&plain).expect("plain");
    let decorated_layout = engine.compute(&decorated).expect("decorated");

    for (left, right) in plain_layout
        .placements
        .iter()
        .zip(&decorated_layout.placements)
    {
        assert_eq!(left.marker, right.marker);
        assert_eq!(left.label, right.label);
    }

    let kinds: Vec<IconKind> = decorated_layout
        .placements
        .iter()
        .map(|placement| placement.icon)
        .collect();
    assert_eq!(
        kinds,
        vec![IconKind::Url, IconKind::LiteralGlyph, IconKind::LocalPath]
    );
    assert!(
        plain_layout
            .placements
            .iter()
            .all(|placement| placement.icon == IconKind::None)
    );
}

#[test]
fn append_variant_flows_through_config() {
    let config = ChartConfig::default().with_stacking_variant(StackingVariant::Append);
    let layout = LayoutEngine::new(&config)
        .expect("engine")
        .compute(&named(&[("A", 5), ("B", 5)]))
        .expect("layout");

    assert_abs_diff_eq!(layout.placements[0].marker.y, 0.55, epsilon = 1e-12);
    assert_abs_diff_eq!(layout.placements[1].marker.y, 0.90, epsilon = 1e-12);
}

#[test]
fn exact_policy_flows_through_config() {
    let config = ChartConfig::default().with_rounding_policy(RoundingPolicy::Exact);
    let layout = LayoutEngine::new(&config)
        .expect("engine")
        .compute(&named(&[("A", 50)]))
        .expect("layout");
    assert_eq!(layout.axis.max, 75);
}

#[test]
fn marker_x_is_the_raw_value() {
    let layout = LayoutEngine::new(&ChartConfig::default())
        .expect("engine")
        .compute(&named(&[("A", 3), ("B", 4), ("C", 5)]))
        .expect("layout");
    for placement in &layout.placements {
        assert_eq!(placement.marker.x, placement.record.value());
        assert_eq!(placement.label.x, placement.record.value());
    }
}

#[test]
fn invalid_config_is_rejected_before_layout() {
    let config = ChartConfig::default().with_label_levels(Vec::new());
    assert!(matches!(
        LayoutEngine::new(&config),
        Err(ChartError::InvalidConfig(_))
    ));

    let config = ChartConfig::default().with_scale_factor(0.5);
    assert!(matches!(
        LayoutEngine::new(&config),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn layout_json_carries_axis_and_placements() {
    let layout = LayoutEngine::new(&ChartConfig::default())
        .expect("engine")
        .compute(&named(&[("A", 50)]))
        .expect("layout");
    let json: serde_json::Value =
        serde_json::from_str(&layout.to_json_pretty().expect("json")).expect("parse");

    assert_eq!(json["axis"]["max"], 100);
    assert_eq!(json["placements"][0]["record"]["name"], "A");
    assert_eq!(json["placements"][0]["icon"], "none");
    assert_eq!(json["cluster_count"], 1);
}
