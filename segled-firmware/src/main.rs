//! Segled - scanning driver firmware for multiplexed seven-segment panels
//!
//! Lights one digit of a GPIO-wired seven-segment module at a time, fast
//! enough that persistence of vision shows all digits at once. Contents,
//! refresh rate and brightness are controlled over a UART attribute
//! console.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use segled_core::panel::{Panel, MAX_DIGITS};
use segled_core::profile::Polarity;
use segled_drivers::panel::{SegmentPanel, MAX_SEGMENTS};

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Segled firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let profile = board::profile();
    let segment_idle = idle_level(profile.segment_polarity);
    let digit_idle = idle_level(profile.digit_polarity);

    // Segment pins A-G plus decimal point, per the board wiring
    let mut segments: Vec<Output<'static>, MAX_SEGMENTS> = Vec::new();
    let _ = segments.push(Output::new(p.PIN_2, segment_idle));
    let _ = segments.push(Output::new(p.PIN_3, segment_idle));
    let _ = segments.push(Output::new(p.PIN_4, segment_idle));
    let _ = segments.push(Output::new(p.PIN_5, segment_idle));
    let _ = segments.push(Output::new(p.PIN_6, segment_idle));
    let _ = segments.push(Output::new(p.PIN_7, segment_idle));
    let _ = segments.push(Output::new(p.PIN_8, segment_idle));
    let _ = segments.push(Output::new(p.PIN_9, segment_idle));

    // Digit selects, leftmost digit first
    let mut digit_selects: Vec<Output<'static>, MAX_DIGITS> = Vec::new();
    let _ = digit_selects.push(Output::new(p.PIN_10, digit_idle));
    let _ = digit_selects.push(Output::new(p.PIN_11, digit_idle));
    let _ = digit_selects.push(Output::new(p.PIN_12, digit_idle));
    let _ = digit_selects.push(Output::new(p.PIN_13, digit_idle));

    let panel = match SegmentPanel::from_pins(segments, digit_selects, profile) {
        Ok(panel) => panel,
        Err(e) => match e {},
    };
    info!("Panel pins initialized: {} digits", panel.digit_count());

    // Setup UART for the control console
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for console");

    // Spawn tasks
    spawner
        .spawn(tasks::scan_task(Panel::new(board::DIGIT_COUNT), profile))
        .unwrap();
    spawner.spawn(tasks::dispatch_task(panel)).unwrap();
    spawner.spawn(tasks::console_task(rx, tx)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Output level that leaves a pin de-asserted for its polarity.
fn idle_level(polarity: Polarity) -> Level {
    if polarity.level(false) {
        Level::High
    } else {
        Level::Low
    }
}
