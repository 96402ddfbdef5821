//! Flow past a heated cylinder, pushed upwards from below
//!
//! cargo run --release --example obstacle_flow
//!
//! Prints a coarse picture of the temperature every 20 steps.
use rustcfd::config::Config;
use rustcfd::integrate;
use rustcfd::logger::init_logging;
use rustcfd::navier_stokes::Navier2D;
use rustcfd::observer::{Frame, Observer};

/// Render temperature as characters, obstacle as '#'
struct AsciiObserver {
    every: usize,
}

impl Observer for AsciiObserver {
    fn observe(&mut self, frame: &Frame<'_>) {
        if frame.step % self.every != 0 {
            return;
        }
        let shades = [' ', '.', ':', '-', '=', '+', '*', '%', '@'];
        let temp = &frame.temperature.v;
        let t_max = temp.iter().fold(1e-12_f64, |m, x| m.max(*x));
        let (nx, ny) = temp.dim();
        println!("step {} time {:5.2}", frame.step, frame.time);
        for j in (0..ny).rev().step_by(2) {
            let line: String = (0..nx)
                .map(|i| {
                    if frame.solid[[i, j]] {
                        '#'
                    } else {
                        let s = (temp[[i, j]].max(0.) / t_max * 8.).round() as usize;
                        shades[s.min(8)]
                    }
                })
                .collect();
            println!("|{}|", line);
        }
        println!("max |w| = {:5.3e}", frame.vorticity.iter().fold(0., |m: f64, x| m.max(x.abs())));
    }
}

fn main() {
    init_logging(Some("warn"));
    // Parameters
    let mut config = Config::default();
    config.time.n_steps = 100;
    config.obstacle.obstacle.radius = 0.15;
    let mut navier = Navier2D::new(&config).unwrap();
    // Set initial conditions
    navier.random_disturbance(1e-4);
    navier.set_observer(AsciiObserver { every: 20 });
    integrate(&mut navier, config.time.n_steps, Some(1)).unwrap();
    println!(
        "final energy {:5.3e}",
        navier.diagnostics["energy"].last().copied().unwrap_or(0.)
    );
}
