//! Window flush scheduler: periodically commits averaged readings to the
//! current block's CSV series

use {
    crate::{
        buffer::average,
        state::RelayState,
        writer::{BlockWriter, WindowRow},
    },
    chrono::Local,
    std::sync::Arc,
    tokio::time::{interval, Duration},
};

/// Recurring flush task; runs until the process exits
///
/// The partition check inside each tick means a tick that crosses midnight
/// commits into the freshly advanced block, not the old one.
pub async fn window_flush_task(
    state: Arc<RelayState>,
    writer: Arc<dyn BlockWriter>,
    period: Duration,
) {
    log::info!(
        "Starting window scheduler (period: {}s, backend: {})",
        period.as_secs(),
        writer.backend_type()
    );

    let mut timer = interval(period);
    // The first tick of a tokio interval completes immediately; consume it so
    // the first commit lands one full window after startup.
    timer.tick().await;

    loop {
        timer.tick().await;
        run_window_tick(&state, writer.as_ref()).await;
    }
}

/// One window commit: advance-check, drain, average, append
pub async fn run_window_tick(state: &RelayState, writer: &dyn BlockWriter) {
    // Partition check must precede filename resolution.
    let outcome = state.clock.check_and_advance();

    let now = Local::now();
    let time_label = now.format("%H:%M").to_string();

    let drained = state.buffer.drain();
    let row = WindowRow {
        time_label,
        avg_temp: average(&drained.temperature),
        avg_hum: average(&drained.humidity),
    };

    match writer.append_window(outcome.block_index, &row).await {
        Ok(()) => {
            log::info!(
                "[{}] Averages saved to block {}: temp={:.2}, hum={:.2}",
                row.time_label,
                outcome.block_index,
                row.avg_temp,
                row.avg_hum
            );
        }
        Err(e) => {
            // Tick is still considered complete; no retry within the window.
            log::error!(
                "Failed to append window to block {}: {}",
                outcome.block_index,
                e
            );
        }
    }
}
