//! Serial UART transmit task
//!
//! Writes response and event lines to the host, one per `\n`.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::RESPONSE_CHANNEL;

/// Serial TX task - drains the response channel to the UART
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let line = RESPONSE_CHANNEL.receive().await;
        trace!("TX: {}", line);

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send response: {:?}", e);
            continue;
        }
        if let Err(e) = tx.write_all(b"\n").await {
            warn!("Failed to send terminator: {:?}", e);
        }
    }
}
