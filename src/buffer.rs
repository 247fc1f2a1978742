//! Thread-safe accumulation of readings for the current window

use std::sync::Mutex;

/// Samples taken out of the buffer by a window commit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainedSamples {
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

/// Rolling sample buffer with two independent channels
///
/// Appends to different channels never contend with each other; `drain`
/// swaps both channels to empty so every sample lands in exactly one window.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    temperature: Mutex<Vec<f64>>,
    humidity: Mutex<Vec<f64>>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_temperature(&self, value: f64) {
        self.temperature.lock().unwrap().push(value);
    }

    pub fn add_humidity(&self, value: f64) {
        self.humidity.lock().unwrap().push(value);
    }

    /// Take all accumulated samples and reset both channels
    pub fn drain(&self) -> DrainedSamples {
        DrainedSamples {
            temperature: std::mem::take(&mut *self.temperature.lock().unwrap()),
            humidity: std::mem::take(&mut *self.humidity.lock().unwrap()),
        }
    }

    pub fn len(&self) -> (usize, usize) {
        (
            self.temperature.lock().unwrap().len(),
            self.humidity.lock().unwrap().len(),
        )
    }
}

/// Mean of the samples rounded to 2 decimal places; an empty window is 0.00
pub fn average(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    (mean * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rounds_to_two_decimals() {
        assert_eq!(average(&[20.0, 22.0]), 21.0);
        assert_eq!(average(&[1.0, 2.0, 2.0]), 1.67);
        assert_eq!(average(&[0.005]), 0.01);
    }

    #[test]
    fn test_average_of_empty_window_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert!(!average(&[]).is_nan());
    }

    #[test]
    fn test_drain_resets_both_channels() {
        let buffer = SampleBuffer::new();
        buffer.add_temperature(20.0);
        buffer.add_temperature(22.0);
        buffer.add_humidity(50.0);

        let drained = buffer.drain();
        assert_eq!(drained.temperature, vec![20.0, 22.0]);
        assert_eq!(drained.humidity, vec![50.0]);
        assert_eq!(buffer.len(), (0, 0));
    }

    #[test]
    fn test_samples_after_drain_go_to_next_window() {
        let buffer = SampleBuffer::new();
        buffer.add_temperature(20.0);

        let first = buffer.drain();
        buffer.add_temperature(30.0);
        let second = buffer.drain();

        assert_eq!(first.temperature, vec![20.0]);
        assert_eq!(second.temperature, vec![30.0]);
    }
}
