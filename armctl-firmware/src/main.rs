//! armctl - 6-DOF arm controller firmware
//!
//! Main firmware binary for RP2040-based boards. A host sends
//! line-based commands over UART0; the controller steps six hobby
//! servos toward their targets and records/plays back pose sequences.
//! In teach mode the servos follow six potentiometers instead.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use armctl_core::config::ArmConfig;
use armctl_drivers::{PwmServo, ServoPulseConfig};

use crate::pots::PotMux;
use crate::servos::{servo_pwm_config, Servo, ServoSet};

mod channels;
mod pots;
mod servos;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Arm configuration validated and encoded from arm.toml by build.rs
static ARM_CONFIG_BLOB: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/arm_config.bin"));

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("armctl firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = match ArmConfig::from_postcard(ARM_CONFIG_BLOB) {
        Ok(config) => config,
        Err(e) => {
            warn!("Embedded arm config rejected ({:?}), using defaults", e);
            ArmConfig::default()
        }
    };
    info!(
        "Arm config: home={:?}, step={}ms, baud={}",
        config.home, config.step_interval_ms, config.baud_rate
    );

    // Setup UART for the host link
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = config.baud_rate;
        cfg
    };

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host communication");

    // Setup servo PWM: slice N channel A on GPIO 2N
    let pulse = ServoPulseConfig::default();
    let servo = |pwm: Pwm<'static>| -> Servo {
        let (output, _) = pwm.split();
        PwmServo::new(unwrap!(output), pulse)
    };
    let servos: ServoSet = [
        servo(Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, servo_pwm_config())),
        servo(Pwm::new_output_a(p.PWM_SLICE2, p.PIN_4, servo_pwm_config())),
        servo(Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, servo_pwm_config())),
        servo(Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, servo_pwm_config())),
        servo(Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, servo_pwm_config())),
        servo(Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, servo_pwm_config())),
    ];

    info!("Servo PWM initialized");

    // Teach-mode pots: ADC0 behind the multiplexer, select on GPIO 13-15
    let pots = PotMux::new(
        Adc::new_blocking(p.ADC, AdcConfig::default()),
        AdcChannel::new_pin(p.PIN_26, Pull::None),
        [
            Output::new(p.PIN_13, Level::Low),
            Output::new(p.PIN_14, Level::Low),
            Output::new(p.PIN_15, Level::Low),
        ],
    );

    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::controller_task(config, servos, pots))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
