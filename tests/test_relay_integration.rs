//! End-to-end tests for the relay core: inbound readings flow through the
//! broadcast hub into the sample buffer, and a window tick commits the
//! averages to the current block's CSV series.

use {
    std::sync::Arc,
    wetterblock::{
        hub::BroadcastHub,
        persistence::{self, PartitionState},
        scheduler::run_window_tick,
        state::RelayState,
        writer::CsvBlockWriter,
    },
};

fn combined_lines(dir: &std::path::Path, block: u64) -> Vec<Vec<String>> {
    let content =
        std::fs::read_to_string(dir.join(format!("block_{}_hum_temp.csv", block))).unwrap();
    content
        .lines()
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn test_readings_commit_as_window_averages() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(RelayState::load(dir.path().join("state.json")));
    let writer = CsvBlockWriter::new(dir.path()).unwrap();
    let hub = BroadcastHub::new(state.clone());

    let (_id, mut rx) = hub.on_connect();

    hub.on_message(r#"{"temp":20,"hum":50}"#);
    hub.on_message(r#"{"temp":22}"#);

    // Both valid payloads were echoed back verbatim.
    assert_eq!(rx.try_recv().unwrap(), r#"{"temp":20,"hum":50}"#);
    assert_eq!(rx.try_recv().unwrap(), r#"{"temp":22}"#);

    run_window_tick(&state, &writer).await;

    let lines = combined_lines(dir.path(), 1);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0][1], "21.00");
    assert_eq!(lines[0][2], "50.00");

    let temp = std::fs::read_to_string(dir.path().join("block_1_temp.csv")).unwrap();
    assert!(temp.trim_end().ends_with(",21.00"));
    let hum = std::fs::read_to_string(dir.path().join("block_1_hum.csv")).unwrap();
    assert!(hum.trim_end().ends_with(",50.00"));

    // Buffers are empty after the commit.
    assert_eq!(state.buffer.len(), (0, 0));
}

#[tokio::test]
async fn test_readings_after_commit_land_in_next_window() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(RelayState::load(dir.path().join("state.json")));
    let writer = CsvBlockWriter::new(dir.path()).unwrap();
    let hub = BroadcastHub::new(state.clone());

    hub.on_message(r#"{"temp":10}"#);
    run_window_tick(&state, &writer).await;

    hub.on_message(r#"{"temp":30}"#);
    run_window_tick(&state, &writer).await;

    let lines = combined_lines(dir.path(), 1);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0][1], "10.00");
    assert_eq!(lines[1][1], "30.00");
}

#[tokio::test]
async fn test_restart_resumes_block_numbering_from_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("state.json");

    // A previous run ended on block 5 yesterday.
    let yesterday = chrono::Local::now().date_naive() - chrono::Days::new(1);
    persistence::save_state(
        &PartitionState {
            block_index: 5,
            last_block_date: yesterday,
        },
        &state_file,
    )
    .unwrap();

    let state = Arc::new(RelayState::load(&state_file));
    let writer = CsvBlockWriter::new(dir.path()).unwrap();

    state.buffer.add_temperature(19.0);
    run_window_tick(&state, &writer).await;

    // First trigger after restart advanced to block 6 and wrote there.
    assert!(dir.path().join("block_6_temp.csv").exists());
    assert!(!dir.path().join("block_5_temp.csv").exists());

    let persisted = persistence::load_state(&state_file).unwrap();
    assert_eq!(persisted.block_index, 6);
}

#[tokio::test]
async fn test_message_arrival_also_advances_the_block() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("state.json");

    let yesterday = chrono::Local::now().date_naive() - chrono::Days::new(1);
    persistence::save_state(
        &PartitionState {
            block_index: 2,
            last_block_date: yesterday,
        },
        &state_file,
    )
    .unwrap();

    let state = Arc::new(RelayState::load(&state_file));
    let hub = BroadcastHub::new(state.clone());

    hub.on_message(r#"{"hum":40}"#);

    assert_eq!(state.clock.current_block(), 3);
    let persisted = persistence::load_state(&state_file).unwrap();
    assert_eq!(persisted.block_index, 3);
}
