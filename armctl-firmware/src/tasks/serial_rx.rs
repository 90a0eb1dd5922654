//! Serial UART receive task
//!
//! Frames incoming bytes into command lines and hands them to the
//! controller one at a time.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use armctl_protocol::{LineBuffer, ResponseLine};

use crate::channels::{LINE_CHANNEL, RESPONSE_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - receives bytes and forwards complete lines
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut lines = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match lines.feed(byte) {
                        Ok(Some(line)) => {
                            // Backpressure: wait until the controller took the previous line
                            LINE_CHANNEL.send(line).await;
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Dropped line: {:?}", e);
                            RESPONSE_CHANNEL.send(ResponseLine::error(e)).await;
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                lines.reset();
            }
        }
    }
}
