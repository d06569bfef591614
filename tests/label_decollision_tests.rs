use approx::assert_abs_diff_eq;
use race_chart::core::{LabelDecollision, Record, place_labels};

fn records(values: &[u64]) -> Vec<Record> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| Record::new(format!("r{i}"), *value).expect("record"))
        .collect()
}

fn levels(values: &[u64], axis_max: u64) -> Vec<usize> {
    let input = records(values);
    let ys = vec![0.55; input.len()];
    place_labels(&input, axis_max, &ys, &LabelDecollision::default())
        .expect("labels")
        .iter()
        .map(|slot| slot.level)
        .collect()
}

#[test]
fn close_values_cycle_through_three_levels() {
    assert_eq!(levels(&[10, 11, 12], 100), vec![0, 1, 2]);
}

#[test]
fn far_values_each_start_their_own_cluster() {
    assert_eq!(levels(&[10, 50, 90], 100), vec![0, 0, 0]);
}

#[test]
fn chained_neighbours_stay_in_one_cluster() {
    assert_eq!(levels(&[0, 3, 6, 9, 12], 100), vec![0, 1, 2, 0, 1]);
}

#[test]
fn levels_follow_value_order_not_input_order() {
    assert_eq!(levels(&[12, 10, 11], 100), vec![2, 0, 1]);
}

#[test]
fn equal_values_share_the_level_of_their_stack() {
    assert_eq!(levels(&[100, 100], 1_000), vec![0, 0]);
    assert_eq!(levels(&[10, 11, 11, 12], 100), vec![0, 1, 1, 2]);
}

#[test]
fn label_y_adds_level_offset_to_marker_y() {
    let input = records(&[10, 11, 12]);
    let marker_ys = [0.2, 0.55, 0.9];
    let slots =
        place_labels(&input, 100, &marker_ys, &LabelDecollision::default()).expect("labels");

    assert_abs_diff_eq!(slots[0].y, 0.2 + 0.35, epsilon = 1e-12);
    assert_abs_diff_eq!(slots[1].y, 0.55 + 0.60, epsilon = 1e-12);
    assert_abs_diff_eq!(slots[2].y, 0.9 + 0.85, epsilon = 1e-12);
}

#[test]
fn threshold_scales_with_axis_width() {
    // 3% of 1000 is 30: a gap of 20 clusters, a gap of 40 does not.
    assert_eq!(levels(&[100, 120, 160], 1_000), vec![0, 1, 0]);
}

#[test]
fn custom_level_count_controls_wraparound() {
    let input = records(&[1, 2, 3]);
    let ys = vec![0.55; input.len()];
    let config = LabelDecollision {
        near_pct: 0.5,
        levels: vec![0.3, 0.7],
    };
    let slots = place_labels(&input, 10, &ys, &config).expect("labels");
    let levels: Vec<usize> = slots.iter().map(|slot| slot.level).collect();
    assert_eq!(levels, vec![0, 1, 0]);
}

#[test]
fn invalid_levels_are_rejected() {
    let config = LabelDecollision {
        near_pct: 0.03,
        levels: vec![0.35, -0.1],
    };
    assert!(config.validate().is_err());

    let config = LabelDecollision {
        near_pct: 0.03,
        levels: Vec::new(),
    };
    assert!(config.validate().is_err());
}
