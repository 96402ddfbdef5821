//! Run simulation:
//!
//! cargo run --release -- [config.toml]
//!
//! Without argument the default configuration is used.
use rustcfd::config::Config;
use rustcfd::{integrate, Integrate};
use rustcfd::logger::init_logging;
use rustcfd::navier_stokes::Navier2D;
use std::error::Error;

fn run() -> rustcfd::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => {
            log::info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    let mut navier = Navier2D::new(&config)?;
    navier.callback();
    integrate(
        &mut navier,
        config.time.n_steps,
        Some(config.output.callback_intervall),
    )
}

fn main() {
    init_logging(None);
    if let Err(err) = run() {
        log::error!("{}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            log::error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
