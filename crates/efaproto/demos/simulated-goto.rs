//! Drive a goto against the in-memory controller the way a host framework
//! would: refresh once, issue the move, then tick until it completes.
//!
//! Run with `cargo run -p efaproto --example simulated-goto`.

use efaproto::session::{GotoEvent, LimitPolicy};
use efaproto::{CommandSession, SessionConfig, SessionError, SimulatedFocuser};

fn main() -> Result<(), SessionError> {
    let mut device = SimulatedFocuser {
        position: 12_000,
        max_position: 40_000,
        step: 2_500,
        ..SimulatedFocuser::default()
    };
    device.set_temperatures(Some(18.25), Some(12.5));

    let mut session = CommandSession::new(SessionConfig {
        limit_policy: LimitPolicy::Clamp,
        ..SessionConfig::default()
    });
    session.refresh_all(&mut device)?;
    println!(
        "firmware {} at {} ticks (limit {})",
        session.state().version.as_deref().unwrap_or("?"),
        session.state().position.unwrap_or_default(),
        session.state().max_position.unwrap_or_default(),
    );

    // Beyond the limit; the clamp policy trims it.
    let target = session.move_relative(&mut device, 50_000)?;
    println!("goto {target}");

    for tick in 1.. {
        let report = session.tick(&mut device)?;
        match report.goto {
            Some(GotoEvent::Completed { position }) => {
                println!("tick {tick}: arrived at {position}");
                break;
            }
            Some(GotoEvent::StillMoving) => println!("tick {tick}: moving ({} ticks)", device.position),
            None => break,
        }
    }

    let version = session.read_version(&mut device)?;
    println!("{} requests sent; firmware {version} served from cache", device.requests.len());
    Ok(())
}
