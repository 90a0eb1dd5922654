//! Main controller task
//!
//! Owns the `Controller` and runs its scheduler loop: every millisecond
//! (or as soon as a command line arrives) it polls the controller and
//! forwards the response and any engine events to the TX task.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker};

use armctl_core::config::ArmConfig;
use armctl_core::Controller;
use armctl_protocol::ResponseLine;

use crate::channels::{LINE_CHANNEL, RESPONSE_CHANNEL};
use crate::pots::PotMux;
use crate::servos::ServoSet;

/// Scheduler period in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1;

/// Milliseconds since boot, wrapping
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(config: ArmConfig, servos: ServoSet, pots: PotMux) {
    info!("Controller task started");

    let mut controller = Controller::with_input(config, servos, pots);
    match controller.boot() {
        Ok(()) => info!("Servos at home pose {:?}", controller.pose()),
        Err(e) => error!("Failed to drive home pose: {:?}", e),
    }

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        let result = match select(LINE_CHANNEL.receive(), ticker.next()).await {
            Either::First(line) => {
                debug!("Command: {=str}", line.as_str());
                controller.poll(Some(line.as_str()), now_ms())
            }
            Either::Second(()) => controller.poll(None, now_ms()),
        };

        if let Some(response) = result.response {
            if response.is_error() {
                warn!("Rejected: {}", response);
            }
            publish(response).await;
        }

        for event in result.events {
            if event.is_error_event() {
                warn!(
                    "Event: {:?} (interlock trips: {})",
                    event,
                    controller.arm().interlock().trip_count()
                );
            } else {
                info!("Event: {:?}", event);
            }
            publish(event.to_response()).await;
        }
    }
}

async fn publish(line: ResponseLine) {
    RESPONSE_CHANNEL.send(line).await;
}
