//! Population bar chart: Fast2D canvas bars plus zoon labels underneath.

use crate::playback::PlaybackEngine;
use shared::PopulationRecord;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use zoon::*;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 400;
/// Horizontal inset shared by the canvas bars and the label row.
const SIDE_PADDING: f32 = 16.0;
const TOP_PADDING: f32 = 12.0;
const BAR_FILL_RATIO: f32 = 0.7;
const GRID_DIVISIONS: f32 = 5.0;
/// Width of the y-axis label column left of the canvas.
const AXIS_WIDTH: u32 = 56;

/// Bar fills alternate by index.
const BAR_COLORS: [(u8, u8, u8, f32); 2] = [(197, 221, 255, 1.0), (144, 182, 255, 1.0)];
const GRID_COLOR: (u8, u8, u8, f32) = (224, 224, 224, 1.0);
const BASELINE_COLOR: (u8, u8, u8, f32) = (150, 150, 150, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
struct BarGeometry {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: (u8, u8, u8, f32),
}

/// Round a raw step to 1, 2, 5 or 10 times a power of ten.
fn round_to_nice_number(raw: f32) -> f32 {
    if raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10.0_f32.powf(raw.log10().floor());
    let normalized = raw / magnitude;

    let nice_normalized = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice_normalized * magnitude
}

/// Grid step and the y-axis maximum it rounds `max_population` up to.
fn axis_scale(max_population: f64) -> (f32, f32) {
    let step = round_to_nice_number(max_population as f32 / GRID_DIVISIONS);
    let axis_max = (max_population as f32 / step).ceil().max(1.0) * step;
    (step, axis_max)
}

fn plot_height(canvas_height: f32) -> f32 {
    (canvas_height - TOP_PADDING).max(0.0)
}

fn bar_layout(
    records: &[PopulationRecord],
    canvas_width: f32,
    canvas_height: f32,
    axis_max: f32,
) -> Vec<BarGeometry> {
    if records.is_empty() || axis_max <= 0.0 {
        return Vec::new();
    }
    let plot_height = plot_height(canvas_height);
    let slot_width = (canvas_width - 2.0 * SIDE_PADDING).max(0.0) / records.len() as f32;
    let bar_width = slot_width * BAR_FILL_RATIO;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let ratio = (record.pig_population as f32 / axis_max).clamp(0.0, 1.0);
            let height = ratio * plot_height;
            BarGeometry {
                x: SIDE_PADDING + index as f32 * slot_width + (slot_width - bar_width) / 2.0,
                y: TOP_PADDING + plot_height - height,
                width: bar_width,
                height,
                color: BAR_COLORS[index % BAR_COLORS.len()],
            }
        })
        .collect()
}

/// Axis values from zero up to `axis_max`, one per grid step.
fn axis_ticks(step: f32, axis_max: f32) -> Vec<f32> {
    let count = (axis_max / step).round() as usize;
    (0..=count).map(|tick| tick as f32 * step).collect()
}

fn tick_y(canvas_height: f32, value: f32, axis_max: f32) -> f32 {
    let plot_height = plot_height(canvas_height);
    TOP_PADDING + plot_height - (value / axis_max) * plot_height
}

/// Y coordinates of horizontal grid lines, baseline excluded.
fn grid_lines(canvas_height: f32, step: f32, axis_max: f32) -> Vec<f32> {
    axis_ticks(step, axis_max)
        .into_iter()
        .skip(1)
        .map(|value| tick_y(canvas_height, value, axis_max))
        .collect()
}

fn chart_objects(
    records: &[PopulationRecord],
    canvas_width: f32,
    canvas_height: f32,
    max_population: f64,
) -> Vec<fast2d::Object2d> {
    let (step, axis_max) = axis_scale(max_population);
    let mut objects: Vec<fast2d::Object2d> = Vec::new();

    for y in grid_lines(canvas_height, step, axis_max) {
        objects.push(
            fast2d::Rectangle::new()
                .position(SIDE_PADDING, y)
                .size(canvas_width - 2.0 * SIDE_PADDING, 1.0)
                .color(GRID_COLOR.0, GRID_COLOR.1, GRID_COLOR.2, GRID_COLOR.3)
                .into(),
        );
    }

    for bar in bar_layout(records, canvas_width, canvas_height, axis_max) {
        objects.push(
            fast2d::Rectangle::new()
                .position(bar.x, bar.y)
                .size(bar.width, bar.height)
                .color(bar.color.0, bar.color.1, bar.color.2, bar.color.3)
                .into(),
        );
    }

    objects.push(
        fast2d::Rectangle::new()
            .position(SIDE_PADDING, canvas_height - 1.0)
            .size(canvas_width - 2.0 * SIDE_PADDING, 1.0)
            .color(BASELINE_COLOR.0, BASELINE_COLOR.1, BASELINE_COLOR.2, BASELINE_COLOR.3)
            .into(),
    );
    objects
}

fn format_population(population: f64) -> String {
    format!("{:.0}", population)
}

pub fn population_chart(engine: &PlaybackEngine, max_population: f64) -> impl Element {
    Column::new()
        .s(Width::exact(CHART_WIDTH))
        .s(Gap::new().y(6))
        .item(
            Row::new()
                .s(Width::fill())
                .item(y_axis(max_population))
                .item(
                    El::new()
                        .s(Width::fill())
                        .s(Height::exact(CHART_HEIGHT))
                        .child_signal(
                            canvas_element(engine.clone(), max_population).into_signal_option(),
                        ),
                ),
        )
        .item(bar_labels(engine))
}

/// Tick labels aligned with the grid lines drawn on the canvas.
fn y_axis(max_population: f64) -> impl Element {
    let (step, axis_max) = axis_scale(max_population);
    let canvas_height = CHART_HEIGHT as f32;

    El::new()
        .s(Width::exact(AXIS_WIDTH))
        .s(Height::exact(CHART_HEIGHT))
        .s(Font::new().size(12).color(hsluv!(0, 0, 45)))
        .update_raw_el(move |mut raw_el| {
            raw_el = raw_el.style("position", "relative");
            for value in axis_ticks(step, axis_max) {
                let top = tick_y(canvas_height, value, axis_max);
                raw_el = raw_el.child(axis_label(value, top));
            }
            raw_el
        })
}

fn axis_label(value: f32, top: f32) -> impl Element {
    El::new()
        .child(format_population(f64::from(value)))
        .update_raw_el(move |raw_el| {
            raw_el
                .style("position", "absolute")
                .style("right", "6px")
                .style("top", &format!("calc({}px - 0.6em)", top))
        })
}

async fn canvas_element(engine: PlaybackEngine, max_population: f64) -> impl Element {
    let mut zoon_canvas = Canvas::new()
        .width(0)
        .height(0)
        .s(Width::fill())
        .s(Height::fill());

    let dom_canvas = zoon_canvas.raw_el_mut().dom_element();
    let canvas_wrapper = fast2d::CanvasWrapper::new_with_canvas(dom_canvas).await;

    let canvas_wrapper = Rc::new(RefCell::new(canvas_wrapper));
    let dimensions = Rc::new(Cell::new((CHART_WIDTH as f32, CHART_HEIGHT as f32)));
    let latest_records: Rc<RefCell<Vec<PopulationRecord>>> = Rc::new(RefCell::new(Vec::new()));

    let redraw = {
        let canvas_wrapper = canvas_wrapper.clone();
        let dimensions = dimensions.clone();
        let latest_records = latest_records.clone();
        move || {
            let (width, height) = dimensions.get();
            let records = latest_records.borrow().clone();
            canvas_wrapper.borrow_mut().update_objects(move |objects| {
                *objects = chart_objects(&records, width, height, max_population);
            });
        }
    };

    let redraw_task = Task::start_droppable({
        let redraw = redraw.clone();
        engine.visible_records_signal().for_each(move |records| {
            *latest_records.borrow_mut() = records;
            redraw();
            async {}
        })
    });

    zoon_canvas
        .update_raw_el(move |raw_el| {
            raw_el.on_resize(move |width, height| {
                canvas_wrapper.borrow_mut().resized(width, height);
                dimensions.set((width as f32, height as f32));
                redraw();
            })
        })
        .after_remove(move |_| {
            drop(redraw_task);
        })
}

fn bar_labels(engine: &PlaybackEngine) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(
            Padding::new()
                .left(AXIS_WIDTH + SIDE_PADDING as u32)
                .right(SIDE_PADDING as u32),
        )
        .items_signal_vec(
            engine
                .visible_records_signal()
                .map(|records| records.into_iter().map(bar_label).collect::<Vec<_>>())
                .to_signal_vec(),
        )
}

fn bar_label(record: PopulationRecord) -> impl Element {
    let population = format_population(record.pig_population);
    let tooltip = format!("{} {}: {}", record.island, record.year, population);

    Column::new()
        .s(Width::fill())
        .s(Align::new().center_x())
        .s(Font::new().size(13).center())
        .update_raw_el(move |raw_el| raw_el.attr("title", &tooltip))
        .item(El::new().s(Font::new().weight(FontWeight::Bold)).child(population))
        .item(El::new().child(record.island))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(island: &str, population: f64) -> PopulationRecord {
        PopulationRecord::new(2000, island, population)
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= expected.abs() * 1e-4 + 1e-3,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn nice_numbers_snap_to_one_two_five() {
        assert_eq!(round_to_nice_number(0.0), 1.0);
        assert_close(round_to_nice_number(3.0), 5.0);
        assert_close(round_to_nice_number(1_500.0), 2_000.0);
        assert_close(round_to_nice_number(7_200.0), 10_000.0);
    }

    #[test]
    fn axis_max_covers_largest_population() {
        let (step, axis_max) = axis_scale(46_000.0);
        assert_close(step, 10_000.0);
        assert_close(axis_max, 50_000.0);

        let (_, axis_max) = axis_scale(0.0);
        assert!(axis_max > 0.0);
    }

    #[test]
    fn bars_alternate_colors_and_share_slots() {
        let records = [record("A", 10.0), record("B", 20.0), record("C", 40.0)];
        let bars = bar_layout(&records, 332.0, 412.0, 40.0);

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].color, BAR_COLORS[0]);
        assert_eq!(bars[1].color, BAR_COLORS[1]);
        assert_eq!(bars[2].color, BAR_COLORS[0]);

        // 300px of plot width split into three 100px slots.
        assert_close(bars[1].x - bars[0].x, 100.0);
        assert_close(bars[0].width, 70.0);
    }

    #[test]
    fn bar_heights_scale_to_axis_and_sit_on_baseline() {
        let records = [record("A", 10.0), record("B", 40.0)];
        let bars = bar_layout(&records, 232.0, 412.0, 40.0);

        assert_close(bars[0].height, 100.0);
        assert_close(bars[1].height, 400.0);
        for bar in bars {
            assert_close(bar.y + bar.height, 412.0);
        }
    }

    #[test]
    fn no_records_draw_no_bars() {
        assert!(bar_layout(&[], 800.0, 400.0, 100.0).is_empty());
    }

    #[test]
    fn grid_lines_are_evenly_spaced_from_the_baseline() {
        let lines = grid_lines(412.0, 10.0, 40.0);
        assert_eq!(lines.len(), 4);
        for (line, expected) in lines.into_iter().zip([312.0, 212.0, 112.0, 12.0]) {
            assert_close(line, expected);
        }
    }

    #[test]
    fn axis_ticks_run_from_zero_to_axis_max() {
        let (step, axis_max) = axis_scale(46_000.0);
        let ticks = axis_ticks(step, axis_max);

        assert_eq!(ticks.len(), 6);
        let expected = [0.0, 10_000.0, 20_000.0, 30_000.0, 40_000.0, 50_000.0];
        for (tick, expected) in ticks.iter().zip(expected) {
            assert_close(*tick, expected);
        }
        let labels: Vec<String> = ticks
            .iter()
            .map(|&tick| format_population(f64::from(tick)))
            .collect();
        assert_eq!(labels.first().map(String::as_str), Some("0"));
        assert_eq!(labels.last().map(String::as_str), Some("50000"));
    }

    #[test]
    fn axis_labels_line_up_with_grid_lines() {
        let ticks = axis_ticks(10.0, 40.0);
        let grid = grid_lines(412.0, 10.0, 40.0);

        assert_close(tick_y(412.0, ticks[0], 40.0), 412.0);
        for (tick, line) in ticks[1..].iter().zip(grid) {
            assert_close(tick_y(412.0, *tick, 40.0), line);
        }
    }

    #[test]
    fn populations_render_without_decimals() {
        assert_eq!(format_population(21_820.0), "21820");
        assert_eq!(format_population(7.6), "8");
    }
}
