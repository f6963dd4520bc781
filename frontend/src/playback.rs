//! Timer-driven playback engine with Actor+Relay architecture

use crate::dataflow::{Actor, Relay, relay};
use crate::url_state::BrowserQueryStore;
use futures::{FutureExt, StreamExt, select};
use shared::{
    Advance, PlaybackConfig, PlaybackContext, PlaybackEvent, PlaybackMachine, PlaybackState,
    PopulationRecord, QuerySnapshot, ViewSnapshot,
};
use std::sync::Arc;
use zoon::*;

/// Owns the playback state and the pending tick for one chart view.
///
/// Ticks are self-rescheduling: the next sleep starts only after the previous
/// tick has been applied. The sleep future lives inside the Actor loop, so a
/// play/pause click that wins the `select!` drops it (cancelling the timer),
/// and dropping the engine aborts the loop the same way.
#[derive(Clone, Debug)]
pub struct PlaybackEngine {
    pub view_snapshot: Actor<ViewSnapshot>,

    /// User pressed the play/pause button
    pub play_pause_clicked_relay: Relay,
}

impl PlaybackEngine {
    pub fn new(ctx: Arc<PlaybackContext>, config: &PlaybackConfig) -> Self {
        let (play_pause_clicked_relay, mut play_pause_clicked_stream) = relay();

        let mut store = BrowserQueryStore;
        let query = QuerySnapshot::read(&store, config);
        let mut machine = PlaybackMachine::start(ctx, &query, &mut store);
        let interval_ms = machine.context().tick_interval_ms();
        let debug_logging = config.debug_logging;

        zoon::println!(
            "Playback starting at {} ({}), tick every {}ms",
            machine.state().current_year(),
            if machine.state().paused() { "paused" } else { "running" },
            interval_ms
        );
        if query.year.is_some() && query.initial_year().is_none() {
            zoon::println!(
                "Ignoring non-numeric year parameter {:?}",
                query.year.as_deref().unwrap_or_default()
            );
        }

        let view_snapshot = Actor::new(machine.snapshot(), move |state| async move {
            loop {
                let event = if machine.tick_armed() {
                    select! {
                        clicked = play_pause_clicked_stream.next() => match clicked {
                            Some(()) => PlaybackEvent::Toggle,
                            None => break,
                        },
                        _ = Timer::sleep(interval_ms).fuse() => PlaybackEvent::Tick,
                    }
                } else {
                    match play_pause_clicked_stream.next().await {
                        Some(()) => PlaybackEvent::Toggle,
                        None => break,
                    }
                };

                let advance = machine.handle(event, &mut store);
                log_transition(debug_logging, event, advance, &machine);
                state.set(machine.snapshot());
            }
        });

        Self {
            view_snapshot,
            play_pause_clicked_relay,
        }
    }

    pub fn paused_signal(&self) -> impl Signal<Item = bool> {
        self.view_snapshot.signal_ref(|snapshot| snapshot.paused).dedupe()
    }

    pub fn current_year_signal(&self) -> impl Signal<Item = i32> {
        self.view_snapshot
            .signal_ref(|snapshot| snapshot.current_year)
            .dedupe()
    }

    pub fn visible_records_signal(&self) -> impl Signal<Item = Vec<PopulationRecord>> {
        self.view_snapshot
            .signal_ref(|snapshot| snapshot.visible_records.clone())
            .dedupe_cloned()
    }

    /// Current year within `[min_year, max_year]`, in percent.
    pub fn position_percent_signal(&self) -> impl Signal<Item = f32> {
        self.view_snapshot
            .signal_ref(|snapshot| snapshot.position_percent() as f32)
            .dedupe()
    }
}

fn log_transition(
    debug_logging: bool,
    event: PlaybackEvent,
    advance: Option<Advance>,
    machine: &PlaybackMachine,
) {
    debug_log!(debug_logging, "{}", describe_transition(event, advance, machine.state()));
}

fn describe_transition(
    event: PlaybackEvent,
    advance: Option<Advance>,
    state: &PlaybackState,
) -> String {
    match (event, advance) {
        (PlaybackEvent::Tick, Some(Advance::Recovered(year))) => {
            format!("Current year not in the data, restarting at {}", year)
        }
        (PlaybackEvent::Tick, Some(advance)) => format!("Tick -> {:?}", advance),
        (PlaybackEvent::Tick, None) => "Stale tick ignored".to_string(),
        (PlaybackEvent::Toggle, _) => format!(
            "Toggle -> {} at {}",
            if state.paused() { "paused" } else { "running" },
            state.current_year()
        ),
    }
}
