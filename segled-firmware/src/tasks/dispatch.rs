//! Pin dispatch task
//!
//! Owns the panel's GPIO handles and carries out the pin writes for each
//! frame the scan task prepares. Runs separately from the tick so a slow
//! pin write can never stall the timer; if it falls behind, the frame
//! signal coalesces and it simply skips to the newest frame.

use defmt::*;
use embassy_rp::gpio::Output;

use segled_drivers::panel::SegmentPanel;

use crate::channels::{FrameMessage, DISPATCH_DONE, SCAN_FRAME};

/// Dispatch task - performs the actual pin writes for prepared frames
#[embassy_executor::task]
pub async fn dispatch_task(mut panel: SegmentPanel<Output<'static>>) {
    info!("Dispatch task started: {} digits", panel.digit_count());

    loop {
        match SCAN_FRAME.wait().await {
            FrameMessage::Frame(frame) => {
                trace!("frame: {:?}", frame);
                // On-chip GPIO writes cannot fail.
                match panel.dispatch(&frame) {
                    Ok(()) => {}
                    Err(e) => match e {},
                }
            }
            FrameMessage::Shutdown => {
                match panel.shutdown() {
                    Ok(()) => {}
                    Err(e) => match e {},
                }
                info!("Panel blanked and pins released");
                DISPATCH_DONE.signal(());
                break;
            }
        }
    }
}
