//! Wild Pig Populations Main Entry Point

use zoon::*;

// Debug macro for easy toggling
macro_rules! debug_log {
    ($flag:expr, $($arg:tt)*) => {
        if $flag {
            zoon::println!($($arg)*);
        }
    };
}

mod app;
mod chart;
mod config;
mod controls;
mod dataflow;
mod playback;
mod url_state;

pub fn main() {
    let app = crate::app::PigPopulationApp::new();
    let root_element = app.root();
    start_app("app", move || root_element);
}
