pub mod buckets;
pub mod reduce;
pub mod ring_buffer;
pub mod sample_window;

pub use buckets::{Bucket, BucketsSummary, HistogramBuckets};
pub use ring_buffer::RingBuffer;
pub use sample_window::{SampleWindow, WindowSummary};
