use {
    crate::{block::BlockClock, buffer::SampleBuffer},
    std::path::Path,
};

/// Shared mutable state of the relay
///
/// The block clock and the sample buffer are the only two shared resources;
/// both guard their own critical sections, so one `Arc<RelayState>` is handed
/// to the broadcast hub and the window scheduler alike.
pub struct RelayState {
    pub clock: BlockClock,
    pub buffer: SampleBuffer,
}

impl RelayState {
    /// Build the relay state, restoring the partition clock from disk
    pub fn load(state_file: impl AsRef<Path>) -> Self {
        Self {
            clock: BlockClock::load(state_file),
            buffer: SampleBuffer::new(),
        }
    }
}
