//! End-to-end chart recipe tests.
//!
//! Renders complete charts through the SVG backend and checks the
//! assembled output: draw order, tag conventions, and the histogram
//! overflow handling.

#![allow(clippy::unwrap_used)]

use plotline::charts::{
    bar_chart, box_swarm_chart, histogram, histogram_bins, line_chart, scatter_chart,
    stacked_bar_chart, ChartStyle,
};
use plotline::output::SvgCanvas;

fn categories(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

fn render_svg(plot: &plotline::element::Plot) -> String {
    let mut canvas = SvgCanvas::new(800.0, 600.0).unique_tags();
    plot.render(&mut canvas);
    canvas.to_svg()
}

// ============================================================================
// Draw order
// ============================================================================

#[test]
fn test_bar_chart_draw_order_in_svg() {
    let style = ChartStyle::default().title("sales");
    let plot = bar_chart(&categories(&["a", "b", "c"]), &[3.0, 1.0, 4.0], &style).unwrap();
    let svg = render_svg(&plot);

    let grid = svg.find("id=\"grid").unwrap();
    let axis = svg.find("id=\"axis@stroke").unwrap();
    let bars = svg.find("id=\"bars").unwrap();
    let title = svg.find("id=\"title").unwrap();
    assert!(grid < axis, "grid must draw beneath axes");
    assert!(axis < bars, "axes must draw beneath data");
    assert!(bars < title, "title must draw on top");
}

#[test]
fn test_line_chart_draws_line_over_furniture() {
    let points = vec![vec![0.0, 1.0], vec![1.0, 3.0], vec![2.0, 2.0]];
    let plot = line_chart(&points, &ChartStyle::default()).unwrap();
    let svg = render_svg(&plot);
    let axis = svg.find("id=\"axis@stroke").unwrap();
    let line = svg.find("id=\"line@stroke").unwrap();
    assert!(axis < line);
}

// ============================================================================
// Tag conventions
// ============================================================================

#[test]
fn test_unique_tags_index_repeated_elements() {
    let style = ChartStyle::default();
    let plot = bar_chart(
        &categories(&["a", "b", "c", "d"]),
        &[1.0, 2.0, 3.0, 4.0],
        &style,
    )
    .unwrap();
    let svg = render_svg(&plot);
    // several ticks share the "tick" tag; repeats get indexed
    assert!(svg.contains("id=\"tick@stroke\""));
    assert!(svg.contains("id=\"tick@stroke@1\""));
}

#[test]
fn test_scatter_chart_tags_points() {
    let points = vec![vec![1.0, 2.0], vec![2.0, 5.0], vec![3.0, 3.0]];
    let plot = scatter_chart(&points, &ChartStyle::default()).unwrap();
    let svg = render_svg(&plot);
    assert!(svg.contains("id=\"points\""));
}

// ============================================================================
// Histogram overflow handling
// ============================================================================

#[test]
fn test_histogram_overflow_collects_outliers() {
    let values = [1.0, 2.0, 3.0, 100.0];
    let bins = histogram_bins(&values, None, Some(10.0)).unwrap();
    assert_eq!(bins.overflow, 1);
    assert_eq!(bins.counts.iter().sum::<usize>(), 3);
    assert!(bins.hi <= 10.0);
}

#[test]
fn test_histogram_chart_labels_overflow_bar() {
    let values = [1.0, 2.0, 3.0, 100.0];
    let style = ChartStyle::default();
    let plot = histogram(&values, None, Some(10.0), &style).unwrap();
    let svg = render_svg(&plot);
    assert!(svg.contains("+"), "overflow tick label should appear");
    assert!(svg.contains("id=\"bars\""));
}

// ============================================================================
// Recipe smoke coverage
// ============================================================================

#[test]
fn test_stacked_bar_chart_renders() {
    let rows = vec![vec![1.0, 2.0], vec![3.0, 1.0], vec![2.0, 2.0]];
    let plot = stacked_bar_chart(&categories(&["x", "y", "z"]), &rows, &ChartStyle::default())
        .unwrap();
    let svg = render_svg(&plot);
    assert!(svg.contains("id=\"bars\""));
    assert!(svg.contains("id=\"bars@1\""));
}

#[test]
fn test_box_swarm_chart_renders_both_layers() {
    let groups = vec![
        ("control".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ("treated".to_string(), vec![2.0, 3.0, 4.0, 5.0, 6.0]),
    ];
    let plot = box_swarm_chart(&groups, &ChartStyle::default()).unwrap();
    let svg = render_svg(&plot);
    let swarm = svg.find("id=\"swarm").unwrap();
    let boxes = svg.find("id=\"box").unwrap();
    assert!(swarm < boxes, "box marks draw over the swarm");
}

#[test]
fn test_render_leaves_transform_stack_balanced() {
    use plotline::canvas::BoundsCanvas;

    let style = ChartStyle::default().title("t").x_title("x").y_title("y");
    let plot = bar_chart(&categories(&["a", "b"]), &[1.0, 2.0], &style).unwrap();
    let mut canvas = BoundsCanvas::new(800.0, 600.0);
    plot.render(&mut canvas);
    assert_eq!(canvas.depth(), 0, "every save must be matched by a restore");
}

#[test]
fn test_empty_data_is_rejected() {
    assert!(bar_chart(&[], &[], &ChartStyle::default()).is_err());
    assert!(line_chart(&[], &ChartStyle::default()).is_err());
    assert!(histogram(&[], None, None, &ChartStyle::default()).is_err());
}
