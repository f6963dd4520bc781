//! PigPopulationApp - wires the embedded dataset to the playback engine and view

use std::sync::Arc;
use zoon::*;

use crate::chart::population_chart;
use crate::config::{load_playback_config, load_playback_context};
use crate::controls::playback_controls;
use crate::playback::PlaybackEngine;
use shared::{DatasetError, PlaybackContext};

pub struct PigPopulationApp {
    /// Dataset and playback, or the reason the dataset could not be used
    pub chart: Result<ChartDomain, DatasetError>,
}

pub struct ChartDomain {
    pub context: Arc<PlaybackContext>,
    pub engine: PlaybackEngine,
}

impl Default for PigPopulationApp {
    fn default() -> Self {
        Self::new()
    }
}

impl PigPopulationApp {
    pub fn new() -> Self {
        let config = load_playback_config();

        let chart = load_playback_context(&config).map(|context| {
            let context = Arc::new(context);
            zoon::println!(
                "Loaded {} records for {} years ({}..={})",
                context.records().len(),
                context.years().years().len(),
                context.min_year(),
                context.max_year()
            );
            let engine = PlaybackEngine::new(context.clone(), &config);
            ChartDomain { context, engine }
        });
        if let Err(error) = &chart {
            zoon::eprintln!("Wild pig dataset unavailable: {}", error);
        }

        Self { chart }
    }

    pub fn root(self) -> impl Element {
        Column::new()
            .s(Width::fill())
            .s(Height::screen())
            .s(Padding::all(24))
            .s(Gap::new().y(16))
            .s(Font::new().family([
                FontFamily::new("Inter"),
                FontFamily::new("system-ui"),
                FontFamily::SansSerif,
            ]))
            .item(title())
            .item(chart_view(self.chart))
    }
}

fn title() -> impl Element {
    El::new()
        .s(Align::new().center_x())
        .s(Font::new().size(24).weight(FontWeight::SemiBold).color(hsluv!(0, 0, 20)))
        .child("Wild Pig Populations by Island")
}

fn chart_view(chart: Result<ChartDomain, DatasetError>) -> RawElOrText {
    match chart {
        Ok(ChartDomain { context, engine }) => Column::new()
            .s(Align::new().center_x())
            .item(population_chart(&engine, context.max_population()))
            .item(playback_controls(&engine, context.min_year(), context.max_year()))
            .after_remove(move |_| drop(engine))
            .unify(),
        Err(error) => error_panel(&error).unify(),
    }
}

fn error_panel(error: &DatasetError) -> impl Element {
    El::new()
        .s(Align::new().center_x())
        .s(Padding::all(16))
        .s(RoundedCorners::all(6))
        .s(Background::new().color(hsluv!(12, 90, 95)))
        .s(Font::new().color(hsluv!(12, 80, 40)))
        .update_raw_el(|raw_el| raw_el.attr("role", "alert"))
        .child(format!("Unable to show the chart: {}", error))
}
