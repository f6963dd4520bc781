use crate::playback::PlaybackEngine;
use shared::year_position_percent;
use zoon::*;

const TRACK_HEIGHT: u32 = 4;
const MARK_SIZE: u32 = 8;

pub fn playback_controls(engine: &PlaybackEngine, min_year: i32, max_year: i32) -> impl Element {
    Row::new()
        .s(Width::exact(crate::chart::CHART_WIDTH))
        .s(Gap::new().x(32))
        .s(Padding::new().top(24))
        .s(Align::new().center_x())
        .item(play_pause_button(engine))
        .item(year_position(engine, min_year, max_year))
}

fn play_pause_button(engine: &PlaybackEngine) -> impl Element {
    let play_pause_clicked_relay = engine.play_pause_clicked_relay.clone();

    Button::new()
        .s(Width::exact(56))
        .s(Height::exact(56))
        .s(RoundedCorners::all_max())
        .s(Background::new().color(hsluv!(255, 80, 45)))
        .s(Font::new().size(20).color(hsluv!(0, 0, 100)).center())
        .s(Shadows::new(vec![
            Shadow::new().color(hsluv!(0, 0, 0, 25)).y(2).blur(6),
        ]))
        .update_raw_el(|raw_el| raw_el.attr("aria-label", "Play or pause"))
        .label_signal(
            engine
                .paused_signal()
                .map(|paused| if paused { "▶" } else { "❚❚" }),
        )
        .on_press(move || play_pause_clicked_relay.send(()))
}

/// Read-only slider: a track from `min_year` to `max_year`, one mark per
/// year, filled up to the current year.
fn year_position(engine: &PlaybackEngine, min_year: i32, max_year: i32) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(10))
        .update_raw_el(|raw_el| raw_el.attr("aria-disabled", "true"))
        .item(
            El::new()
                .s(Align::new().center_x())
                .s(Font::new().size(16).weight(FontWeight::Bold))
                .child_signal(engine.current_year_signal().map(|year| year.to_string())),
        )
        .item(
            El::new()
                .s(Width::fill())
                .s(Height::exact(MARK_SIZE))
                .update_raw_el(|raw_el| raw_el.style("position", "relative"))
                .child(
                    El::new()
                        .s(Width::fill())
                        .s(Height::exact(TRACK_HEIGHT))
                        .s(Align::new().center_y())
                        .s(RoundedCorners::all_max())
                        .s(Background::new().color(hsluv!(0, 0, 85)))
                        .child(
                            El::new()
                                .s(Height::fill())
                                .s(Width::percent_signal(engine.position_percent_signal()))
                                .s(RoundedCorners::all_max())
                                .s(Background::new().color(hsluv!(255, 20, 60))),
                        ),
                )
                .update_raw_el(move |mut raw_el| {
                    for year in min_year..=max_year {
                        let left = year_position_percent(year, min_year, max_year) as f32;
                        raw_el = raw_el.child(year_mark(left));
                    }
                    raw_el
                }),
        )
        .item(
            Row::new()
                .s(Width::fill())
                .s(Font::new().size(12).color(hsluv!(0, 0, 45)))
                .item(El::new().child(min_year.to_string()))
                .item(El::new().s(Align::new().right()).child(max_year.to_string())),
        )
}

fn year_mark(left_percent: f32) -> impl Element {
    El::new()
        .s(Width::exact(2))
        .s(Height::exact(MARK_SIZE))
        .s(Background::new().color(hsluv!(0, 0, 60)))
        .update_raw_el(move |raw_el| {
            raw_el
                .style("position", "absolute")
                .style("top", "0")
                .style("left", &format!("calc({}% - 1px)", left_percent))
        })
}
