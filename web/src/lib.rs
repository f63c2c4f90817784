use clap::Parser;
use wasm_bindgen::prelude::*;

mod game;
mod result;
mod settings;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

/// Arguments come from the location hash, e.g. `#-vv&--seed=42&--difficulty=large`.
fn parse_args(location_hash: &str) -> Result<Args, clap::Error> {
    let args = location_hash.split(['#', '&']).filter(|arg| !arg.is_empty());
    Args::try_parse_from(std::iter::once(env!("CARGO_PKG_NAME")).chain(args))
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();

    let (log_level, props, parse_error) = match parse_args(&location_hash) {
        Ok(args) => (args.verbose.log_level(), args.game, None),
        Err(err) => (Some(log::Level::Warn), game::GameProps::default(), Some(err)),
    };
    if let Some(log_level) = log_level {
        if let Err(err) = console_log::init_with_level(log_level) {
            web_sys::console::error_1(&err.to_string().into());
        }
    }
    if let Some(err) = parse_error {
        log::warn!("ignoring location hash {:?}: {}", location_hash, err);
    }
    log::debug!("start props: {:?}", props);

    let Some(root) = document().get_element_by_id("game") else {
        log::error!("Could not find id=\"game\" element");
        return;
    };

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, props).render();
}
