//! Year-cycling playback as a pure state machine.
//!
//! Transitions never touch the address bar or a timer directly. Each one
//! returns the next [`PlaybackState`] together with the [`Effect`]s the host
//! has to perform, and [`PlaybackMachine`] applies those effects against a
//! [`QueryStore`] while tracking whether a tick is armed.

use std::sync::Arc;

use crate::config::PlaybackConfig;
use crate::dataset::{Advance, Dataset, PopulationRecord, YearSequence, records_for_year};
use crate::error::DatasetError;
use crate::query::{QuerySnapshot, QueryStore};

// ===== CONTEXT =====

/// Immutable data shared by every transition, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackContext {
    records: Vec<PopulationRecord>,
    years: YearSequence,
    first_year: i32,
    min_year: i32,
    max_year: i32,
    max_population: f64,
    tick_interval_ms: u32,
    year_param: String,
    paused_param: String,
}

impl PlaybackContext {
    pub fn new(dataset: Dataset, config: &PlaybackConfig) -> Result<Self, DatasetError> {
        let years = YearSequence::from_records(&dataset.records, config.year_order);
        let first_year = years.first().ok_or(DatasetError::Empty)?;
        let (min_year, max_year) = years.bounds().ok_or(DatasetError::Empty)?;
        let max_population = dataset.max_population();

        Ok(Self {
            records: dataset.records,
            years,
            first_year,
            min_year,
            max_year,
            max_population,
            tick_interval_ms: config.tick_interval_ms,
            year_param: config.year_param.clone(),
            paused_param: config.paused_param.clone(),
        })
    }

    pub fn records(&self) -> &[PopulationRecord] {
        &self.records
    }

    pub fn years(&self) -> &YearSequence {
        &self.years
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    pub fn max_population(&self) -> f64 {
        self.max_population
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    pub fn records_for(&self, year: i32) -> Vec<PopulationRecord> {
        records_for_year(&self.records, year)
    }
}

// ===== EVENTS & EFFECTS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Timer fired.
    Tick,
    /// User pressed play/pause.
    Toggle,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    WriteParam { name: String, value: String },
    ScheduleTick { after_ms: u32 },
    CancelTick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PlaybackState,
    pub effects: Vec<Effect>,
    /// Set when a tick moved the current year.
    pub advance: Option<Advance>,
}

impl Transition {
    fn unchanged(state: PlaybackState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            advance: None,
        }
    }
}

// ===== STATE =====

/// Current year, paused flag and the records shown for that year.
///
/// `visible_records` is recomputed on every year change, so it always
/// matches `current_year`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    current_year: i32,
    paused: bool,
    visible_records: Vec<PopulationRecord>,
}

impl PlaybackState {
    /// State for a fresh page load.
    ///
    /// A `year` outside the sequence is kept as is (showing no bars) and the
    /// first tick recovers to the first year.
    pub fn initial(ctx: &PlaybackContext, snapshot: &QuerySnapshot) -> Transition {
        let current_year = snapshot.initial_year().unwrap_or(ctx.first_year());
        let paused = snapshot.starts_paused();
        let state = Self {
            current_year,
            paused,
            visible_records: ctx.records_for(current_year),
        };

        let effects = if paused {
            Vec::new()
        } else {
            vec![Effect::ScheduleTick {
                after_ms: ctx.tick_interval_ms,
            }]
        };

        Transition {
            state,
            effects,
            advance: None,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn visible_records(&self) -> &[PopulationRecord] {
        &self.visible_records
    }

    pub fn apply(&self, ctx: &PlaybackContext, event: PlaybackEvent) -> Transition {
        match event {
            PlaybackEvent::Tick => self.tick(ctx),
            PlaybackEvent::Toggle => self.toggle(ctx),
        }
    }

    fn tick(&self, ctx: &PlaybackContext) -> Transition {
        if self.paused {
            return Transition::unchanged(self.clone());
        }
        let Some(advance) = ctx.years.advance(self.current_year) else {
            return Transition::unchanged(self.clone());
        };

        let next_year = advance.year();
        let state = Self {
            current_year: next_year,
            paused: false,
            visible_records: ctx.records_for(next_year),
        };

        Transition {
            state,
            effects: vec![
                Effect::WriteParam {
                    name: ctx.year_param.clone(),
                    value: next_year.to_string(),
                },
                Effect::ScheduleTick {
                    after_ms: ctx.tick_interval_ms,
                },
            ],
            advance: Some(advance),
        }
    }

    fn toggle(&self, ctx: &PlaybackContext) -> Transition {
        let paused = !self.paused;
        let write_paused = Effect::WriteParam {
            name: ctx.paused_param.clone(),
            value: paused.to_string(),
        };
        let effects = if paused {
            vec![Effect::CancelTick, write_paused]
        } else {
            vec![
                write_paused,
                Effect::ScheduleTick {
                    after_ms: ctx.tick_interval_ms,
                },
            ]
        };

        Transition {
            state: Self {
                paused,
                ..self.clone()
            },
            effects,
            advance: None,
        }
    }

    pub fn snapshot(&self, ctx: &PlaybackContext) -> ViewSnapshot {
        ViewSnapshot {
            visible_records: self.visible_records.clone(),
            current_year: self.current_year,
            paused: self.paused,
            min_year: ctx.min_year,
            max_year: ctx.max_year,
        }
    }
}

/// Everything the chart and controls need for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub visible_records: Vec<PopulationRecord>,
    pub current_year: i32,
    pub paused: bool,
    pub min_year: i32,
    pub max_year: i32,
}

impl ViewSnapshot {
    /// Position of `current_year` within `[min_year, max_year]` in percent.
    pub fn position_percent(&self) -> f64 {
        year_position_percent(self.current_year, self.min_year, self.max_year)
    }
}

/// Position of `year` within `[min_year, max_year]` in percent, clamped.
///
/// A single-year range reports 100.
pub fn year_position_percent(year: i32, min_year: i32, max_year: i32) -> f64 {
    let span = f64::from(max_year) - f64::from(min_year);
    if span <= 0.0 {
        return 100.0;
    }
    let offset = f64::from(year) - f64::from(min_year);
    (offset / span * 100.0).clamp(0.0, 100.0)
}

// ===== MACHINE =====

/// Playback state plus the armed/disarmed tick, with effects applied.
#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    ctx: Arc<PlaybackContext>,
    state: PlaybackState,
    tick_armed: bool,
}

impl PlaybackMachine {
    pub fn start(
        ctx: Arc<PlaybackContext>,
        snapshot: &QuerySnapshot,
        store: &mut impl QueryStore,
    ) -> Self {
        let transition = PlaybackState::initial(&ctx, snapshot);
        let mut machine = Self {
            state: transition.state,
            ctx,
            tick_armed: false,
        };
        machine.perform(&transition.effects, store);
        machine
    }

    /// Apply `event` and perform its effects.
    ///
    /// A tick that arrives while no tick is armed is stale and ignored.
    pub fn handle(&mut self, event: PlaybackEvent, store: &mut impl QueryStore) -> Option<Advance> {
        if event == PlaybackEvent::Tick && !self.tick_armed {
            return None;
        }
        if event == PlaybackEvent::Tick {
            self.tick_armed = false;
        }

        let transition = self.state.apply(&self.ctx, event);
        self.state = transition.state;
        self.perform(&transition.effects, store);
        transition.advance
    }

    fn perform(&mut self, effects: &[Effect], store: &mut impl QueryStore) {
        for effect in effects {
            match effect {
                Effect::WriteParam { name, value } => store.write_param(name, value),
                Effect::ScheduleTick { .. } => self.tick_armed = true,
                Effect::CancelTick => self.tick_armed = false,
            }
        }
    }

    pub fn tick_armed(&self) -> bool {
        self.tick_armed
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn context(&self) -> &Arc<PlaybackContext> {
        &self.ctx
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state.snapshot(&self.ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MemoryQueryStore;

    fn dataset(years: &[i32]) -> Dataset {
        let records = years
            .iter()
            .flat_map(|&year| {
                [
                    PopulationRecord::new(year, "Kauai", f64::from(year - 1990)),
                    PopulationRecord::new(year, "Maui", f64::from(year - 1980)),
                ]
            })
            .collect();
        Dataset { records }
    }

    fn context(years: &[i32]) -> Arc<PlaybackContext> {
        Arc::new(PlaybackContext::new(dataset(years), &PlaybackConfig::default()).unwrap())
    }

    fn start(ctx: &Arc<PlaybackContext>, query: &str) -> (PlaybackMachine, MemoryQueryStore) {
        let mut store = MemoryQueryStore::from_query(query);
        let snapshot = QuerySnapshot::read(&store, &PlaybackConfig::default());
        let machine = PlaybackMachine::start(ctx.clone(), &snapshot, &mut store);
        (machine, store)
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let result = PlaybackContext::new(Dataset::default(), &PlaybackConfig::default());
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn fresh_load_starts_running_at_first_year() {
        let ctx = context(&[2000, 2001, 2002]);
        let (machine, store) = start(&ctx, "");

        assert_eq!(machine.state().current_year(), 2000);
        assert!(!machine.state().paused());
        assert!(machine.tick_armed());
        assert_eq!(store.to_query(), "");
    }

    #[test]
    fn query_year_and_paused_restore_state_without_tick() {
        let ctx = context(&[2000, 2001, 2002]);
        let (machine, _store) = start(&ctx, "?year=2001&paused=true");

        assert_eq!(machine.state().current_year(), 2001);
        assert!(machine.state().paused());
        assert!(!machine.tick_armed());
    }

    #[test]
    fn tick_at_last_year_wraps_to_first() {
        let ctx = context(&[2000, 2001, 2002]);
        let (mut machine, mut store) = start(&ctx, "year=2002");

        let advance = machine.handle(PlaybackEvent::Tick, &mut store);

        assert_eq!(advance, Some(Advance::Wrapped(2000)));
        assert_eq!(machine.state().current_year(), 2000);
        assert_eq!(store.read_param("year").as_deref(), Some("2000"));
        assert!(machine.tick_armed());
    }

    #[test]
    fn tick_cycles_back_to_every_start_year() {
        let years = [2003, 2000, 2001, 2002];
        let ctx = context(&years);

        for start_year in years {
            let (mut machine, mut store) = start(&ctx, &format!("year={start_year}"));
            for _ in 0..years.len() {
                machine.handle(PlaybackEvent::Tick, &mut store);
            }
            assert_eq!(machine.state().current_year(), start_year);
        }
    }

    #[test]
    fn tick_follows_first_seen_order() {
        let ctx = context(&[2002, 2000, 2001]);
        let (mut machine, mut store) = start(&ctx, "");

        let visited: Vec<i32> = (0..4)
            .map(|_| {
                machine.handle(PlaybackEvent::Tick, &mut store);
                machine.state().current_year()
            })
            .collect();
        assert_eq!(visited, vec![2000, 2001, 2002, 2000]);
    }

    #[test]
    fn visible_records_track_current_year() {
        let ctx = context(&[2000, 2001]);
        let (mut machine, mut store) = start(&ctx, "");

        for _ in 0..3 {
            machine.handle(PlaybackEvent::Tick, &mut store);
            let state = machine.state();
            assert_eq!(state.visible_records().len(), 2);
            assert!(
                state
                    .visible_records()
                    .iter()
                    .all(|record| record.year == state.current_year())
            );
        }
    }

    #[test]
    fn unknown_query_year_recovers_on_first_tick() {
        let ctx = context(&[2000, 2001, 2002]);
        let (mut machine, mut store) = start(&ctx, "year=1999");

        assert_eq!(machine.state().current_year(), 1999);
        assert!(machine.state().visible_records().is_empty());

        let advance = machine.handle(PlaybackEvent::Tick, &mut store);
        assert_eq!(advance, Some(Advance::Recovered(2000)));
        assert_eq!(machine.state().current_year(), 2000);
    }

    #[test]
    fn toggle_twice_restores_paused_and_year() {
        let ctx = context(&[2000, 2001, 2002]);
        let (mut machine, mut store) = start(&ctx, "year=2001");

        machine.handle(PlaybackEvent::Toggle, &mut store);
        assert!(machine.state().paused());
        assert!(!machine.tick_armed());
        assert_eq!(store.read_param("paused").as_deref(), Some("true"));

        machine.handle(PlaybackEvent::Toggle, &mut store);
        assert!(!machine.state().paused());
        assert!(machine.tick_armed());
        assert_eq!(machine.state().current_year(), 2001);
        assert_eq!(store.read_param("paused").as_deref(), Some("false"));
    }

    #[test]
    fn paused_machine_ignores_ticks() {
        let ctx = context(&[2000, 2001, 2002]);
        let (mut machine, mut store) = start(&ctx, "year=2000&paused=true");

        for _ in 0..10 {
            assert_eq!(machine.handle(PlaybackEvent::Tick, &mut store), None);
        }
        assert_eq!(machine.state().current_year(), 2000);
        assert_eq!(store.to_query(), "?year=2000&paused=true");
    }

    #[test]
    fn stale_tick_after_pause_does_not_advance() {
        let ctx = context(&[2000, 2001, 2002]);
        let (mut machine, mut store) = start(&ctx, "");

        machine.handle(PlaybackEvent::Toggle, &mut store);
        machine.handle(PlaybackEvent::Toggle, &mut store);
        machine.handle(PlaybackEvent::Tick, &mut store);
        machine.handle(PlaybackEvent::Toggle, &mut store);
        // Paused again: a timer callback still in flight must not advance.
        machine.handle(PlaybackEvent::Tick, &mut store);

        assert_eq!(machine.state().current_year(), 2001);
    }

    #[test]
    fn reducer_tick_while_paused_has_no_effects() {
        let ctx = context(&[2000, 2001]);
        let snapshot = QuerySnapshot {
            year: None,
            paused: Some("true".to_string()),
        };
        let state = PlaybackState::initial(&ctx, &snapshot).state;

        let transition = state.apply(&ctx, PlaybackEvent::Tick);
        assert_eq!(transition.state, state);
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn reducer_toggle_orders_cancel_before_write() {
        let ctx = context(&[2000, 2001]);
        let state = PlaybackState::initial(&ctx, &QuerySnapshot::default()).state;

        let transition = state.apply(&ctx, PlaybackEvent::Toggle);
        assert_eq!(
            transition.effects,
            vec![
                Effect::CancelTick,
                Effect::WriteParam {
                    name: "paused".to_string(),
                    value: "true".to_string(),
                },
            ]
        );
    }

    #[test]
    fn written_year_survives_reload() {
        let ctx = context(&[2000, 2001, 2002]);
        let (mut machine, mut store) = start(&ctx, "lang=en");
        machine.handle(PlaybackEvent::Tick, &mut store);
        let written_year = machine.state().current_year();

        let reloaded = MemoryQueryStore::from_query(&store.to_query());
        let snapshot = QuerySnapshot::read(&reloaded, &PlaybackConfig::default());
        let state = PlaybackState::initial(&ctx, &snapshot).state;

        assert_eq!(state.current_year(), written_year);
        assert_eq!(reloaded.read_param("lang").as_deref(), Some("en"));
    }

    #[test]
    fn snapshot_reports_numeric_bounds_and_position() {
        let ctx = context(&[2004, 2000, 2002]);
        let (machine, _store) = start(&ctx, "year=2002");

        let snapshot = machine.snapshot();
        assert_eq!((snapshot.min_year, snapshot.max_year), (2000, 2004));
        assert_eq!(snapshot.position_percent(), 50.0);
    }

    #[test]
    fn single_year_dataset_ticks_onto_itself() {
        let ctx = context(&[2010]);
        let (mut machine, mut store) = start(&ctx, "");

        let advance = machine.handle(PlaybackEvent::Tick, &mut store);
        assert_eq!(advance, Some(Advance::Wrapped(2010)));
        assert_eq!(machine.snapshot().position_percent(), 100.0);
    }

    #[test]
    fn out_of_range_query_year_clamps_position() {
        let ctx = context(&[2000, 2010]);

        let (machine, _store) = start(&ctx, "year=-99999999999");
        assert_eq!(machine.state().current_year(), i32::MIN);
        assert_eq!(machine.snapshot().position_percent(), 0.0);

        let (machine, _store) = start(&ctx, "year=99999999999");
        assert_eq!(machine.snapshot().position_percent(), 100.0);
    }

    #[test]
    fn year_position_spans_full_i32_range() {
        assert_eq!(year_position_percent(i32::MIN, i32::MIN, i32::MAX), 0.0);
        assert_eq!(year_position_percent(i32::MAX, i32::MIN, i32::MAX), 100.0);
        assert_eq!(year_position_percent(2005, 2000, 2010), 50.0);
    }

    #[test]
    fn fractional_query_year_is_truncated() {
        let ctx = context(&[2000, 2001, 2002]);
        let (machine, _store) = start(&ctx, "year=2001.7");

        assert_eq!(machine.state().current_year(), 2001);
        assert_eq!(machine.snapshot().position_percent(), 50.0);
    }
}
