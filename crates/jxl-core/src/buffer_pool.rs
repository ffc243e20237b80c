//! Recyclable buffer pools for the encoder/decoder hot paths.
//!
//! `EncoderBufferPool<T>` is a generic, mutex-guarded free-list of `Vec<T>`
//! buffers bounded by `max_pool_size`; entries released beyond the cap are
//! dropped rather than queued. `SharedEncodingPools` is the process-wide
//! singleton of float/byte/int32 pools described in SPEC_FULL.md §5.

use std::sync::{Mutex, OnceLock};

/// A bounded pool of reusable `Vec<T>` buffers keyed by element type.
pub struct EncoderBufferPool<T> {
    free: Mutex<Vec<Vec<T>>>,
    max_pool_size: usize,
    acquire_count: Mutex<u64>,
    hit_count: Mutex<u64>,
}

impl<T: Clone + Default> EncoderBufferPool<T> {
    pub fn new(max_pool_size: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_pool_size,
            acquire_count: Mutex::new(0),
            hit_count: Mutex::new(0),
        }
    }

    /// Acquire a buffer with at least `min_capacity` elements, all zeroed.
    pub fn acquire(&self, min_capacity: usize) -> Vec<T> {
        *self.acquire_count.lock().unwrap() += 1;
        let mut free = self.free.lock().unwrap();
        match free.pop() {
            Some(mut buf) => {
                *self.hit_count.lock().unwrap() += 1;
                buf.clear();
                buf.resize(min_capacity, T::default());
                buf
            }
            None => vec![T::default(); min_capacity],
        }
    }

    /// Release a buffer back to the pool. Dropped (not queued) once the
    /// pool is at `max_pool_size`.
    pub fn release(&self, buf: Vec<T>) {
        let mut free = self.free.lock().unwrap();
        if free.len() < self.max_pool_size {
            free.push(buf);
        }
    }

    pub fn pooled_count(&self) -> usize {
        self.free.lock().unwrap().len()
    }

    pub fn acquire_count(&self) -> u64 {
        *self.acquire_count.lock().unwrap()
    }

    pub fn hit_count(&self) -> u64 {
        *self.hit_count.lock().unwrap()
    }

    pub fn clear(&self) {
        self.free.lock().unwrap().clear();
    }
}

/// Process-wide singleton of buffer pools shared across encoder/decoder
/// invocations on the same process. Initialized lazily, guarded per-pool.
pub struct SharedEncodingPools {
    pub floats: EncoderBufferPool<f32>,
    pub bytes: EncoderBufferPool<u8>,
    pub int32s: EncoderBufferPool<i32>,
}

impl SharedEncodingPools {
    fn new() -> Self {
        Self {
            floats: EncoderBufferPool::new(8),
            bytes: EncoderBufferPool::new(16),
            int32s: EncoderBufferPool::new(8),
        }
    }

    pub fn global() -> &'static SharedEncodingPools {
        static POOLS: OnceLock<SharedEncodingPools> = OnceLock::new();
        POOLS.get_or_init(SharedEncodingPools::new)
    }

    /// Drop every pooled buffer across all three pools. Intended as a
    /// teardown hook, not for per-frame use.
    pub fn drain_all(&self) {
        self.floats.clear();
        self.bytes.clear();
        self.int32s.clear();
    }
}
