//! UART control console task
//!
//! Line-oriented attribute protocol over UART0. `name=value` writes an
//! attribute, a bare `name` reads it back:
//!
//! ```text
//! digits=1.25
//! ok
//! digits
//! 1.25
//! brightness=50
//! ok
//! stop
//! stopped
//! ```
//!
//! Writes are forwarded to the scan task as raw text and, once enqueued,
//! also applied to a local mirror panel with identical parsing, so readback
//! reflects the clamped and truncated values actually in effect without
//! sharing state with the tick path. A write that could not be enqueued is
//! answered `err: busy` and leaves the mirror untouched.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use heapless::{String, Vec};

use segled_core::panel::Panel;

use crate::board;
use crate::channels::{SettingWrite, MAX_WRITE, SCAN_STOP, SETTING_WRITES};

/// Buffer size for UART reads
const RX_BUF_SIZE: usize = 32;

/// Longest accepted command line
const LINE_MAX: usize = 80;

/// Console task - parses attribute commands and forwards setting writes
#[embassy_executor::task]
pub async fn console_task(mut rx: BufferedUartRx, mut tx: BufferedUartTx) {
    info!("Console task started");

    let mut mirror = Panel::new(board::DIGIT_COUNT);
    let mut line: Vec<u8, LINE_MAX> = Vec::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    if byte == b'\n' || byte == b'\r' {
                        if !line.is_empty() {
                            handle_line(&line, &mut mirror, &mut tx).await;
                            line.clear();
                        }
                    } else if line.push(byte).is_err() {
                        warn!("Console line too long, dropping");
                        line.clear();
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Console read error: {:?}", e);
            }
        }
    }
}

async fn handle_line(line: &[u8], mirror: &mut Panel, tx: &mut BufferedUartTx) {
    let (name, value) = match line.iter().position(|&b| b == b'=') {
        Some(at) => (&line[..at], Some(&line[at + 1..])),
        None => (&line[..], None),
    };

    match (name, value) {
        (b"digits", Some(text)) => {
            if forward(SettingWrite::Digits, text, tx).await {
                mirror.write_digits(clip(text));
            }
        }
        (b"digits", None) => {
            reply(tx, mirror.digits_text().as_bytes()).await;
        }
        (b"refresh", Some(text)) => {
            if forward(SettingWrite::Refresh, text, tx).await {
                mirror.write_refresh(clip(text));
            }
        }
        (b"refresh", None) => {
            reply_number(tx, mirror.refresh_rate_hz()).await;
        }
        (b"brightness", Some(text)) => {
            if forward(SettingWrite::Brightness, text, tx).await {
                mirror.write_brightness(clip(text));
            }
        }
        (b"brightness", None) => {
            reply_number(tx, u32::from(mirror.brightness_percent())).await;
        }
        (b"stop", None) => {
            SCAN_STOP.signal(());
            reply(tx, b"stopped").await;
        }
        _ => {
            reply(tx, b"err: unknown command").await;
        }
    }
}

/// Forward one raw attribute write to the scan task.
///
/// Returns whether the write was actually enqueued. The caller only updates
/// its readback mirror on success, so a dropped write (channel full) never
/// leaves the mirror reporting a value the display does not have.
async fn forward<F>(wrap: F, text: &[u8], tx: &mut BufferedUartTx) -> bool
where
    F: FnOnce(Vec<u8, MAX_WRITE>) -> SettingWrite,
{
    let mut payload: Vec<u8, MAX_WRITE> = Vec::new();
    let _ = payload.extend_from_slice(clip(text));
    if SETTING_WRITES.try_send(wrap(payload)).is_err() {
        warn!("Setting channel full, dropping write");
        reply(tx, b"err: busy").await;
        return false;
    }
    reply(tx, b"ok").await;
    true
}

/// Clip a write payload to what the setting channel can carry.
///
/// Lossless for every attribute: digit text beyond the payload size is far
/// past the panel width and truncated by the panel anyway, and a number's
/// leading digit run fits. Clipping on both the forwarded payload and the
/// mirror keeps the two applying byte-identical text.
fn clip(text: &[u8]) -> &[u8] {
    &text[..text.len().min(MAX_WRITE)]
}

async fn reply(tx: &mut BufferedUartTx, text: &[u8]) {
    if tx.write_all(text).await.is_err() || tx.write_all(b"\r\n").await.is_err() {
        warn!("Console write error");
    }
}

async fn reply_number(tx: &mut BufferedUartTx, value: u32) {
    let mut text: String<12> = String::new();
    let _ = write!(text, "{}", value);
    reply(tx, text.as_bytes()).await;
}
