//! Scan tick task
//!
//! Owns the panel contents and the scanning cursor. Each tick it drains
//! pending setting writes, advances the cursor one phase, publishes the
//! prepared frame for the dispatcher and sleeps until the next absolute
//! deadline. Deadlines accumulate from the previous deadline rather than
//! from "now", so per-tick jitter does not drift the scan rate.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};

use segled_core::panel::Panel;
use segled_core::profile::PanelProfile;
use segled_core::scan::ScanState;

use crate::channels::{FrameMessage, SettingWrite, DISPATCH_DONE, SCAN_FRAME, SCAN_STOP, SETTING_WRITES};

/// Scan task - drives the per-digit tick cycle for one panel
#[embassy_executor::task]
pub async fn scan_task(mut panel: Panel, profile: PanelProfile) {
    info!("Scan task started: {} digits", panel.digit_count());

    let mut state = ScanState::new();
    let mut deadline = Instant::now();

    loop {
        // Setting writes only take effect here, between phases, so a
        // half-finished sweep is never torn by a contents change.
        while let Ok(write) = SETTING_WRITES.try_receive() {
            apply_write(&mut panel, write);
        }

        state.advance(&panel, &profile);
        SCAN_FRAME.signal(FrameMessage::Frame(state.frame()));

        deadline += Duration::from_nanos(state.phase_period_ns(&panel));
        match select(Timer::at(deadline), SCAN_STOP.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                info!("Scan stop requested, tearing down");
                SCAN_FRAME.signal(FrameMessage::Shutdown);
                DISPATCH_DONE.wait().await;
                info!("Scan task stopped");
                break;
            }
        }
    }
}

fn apply_write(panel: &mut Panel, write: SettingWrite) {
    match write {
        SettingWrite::Digits(text) => {
            panel.write_digits(&text);
            debug!("digits updated");
        }
        SettingWrite::Refresh(text) => {
            panel.write_refresh(&text);
            debug!("refresh rate now {} Hz", panel.refresh_rate_hz());
        }
        SettingWrite::Brightness(text) => {
            panel.write_brightness(&text);
            debug!("brightness now {}%", panel.brightness_percent());
        }
    }
}
