//! Utility types shared by the engine.

mod ring_buffer;

pub use ring_buffer::RingBuffer;
