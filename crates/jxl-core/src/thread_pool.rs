//! Work-stealing thread pool used for block- and frame-level parallelism.
//!
//! Built directly on `rayon`, which the teacher already pulls in for
//! per-block parallel dequantize/IDCT work. Submissions are plain closures;
//! `wait_for_all` is the only point a caller thread blocks. Cancellation is
//! cooperative: a shared flag is checked at frame boundaries and at pool
//! barriers, never inside a block-level inner loop.

use rayon::{ThreadPool as RayonPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{JxlError, JxlResult};

/// A work-stealing pool wrapping a `rayon::ThreadPool`.
pub struct WorkerPool {
    inner: RayonPool,
    cancelled: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Build a pool with `num_threads` workers (0 = rayon's default, one
    /// per detected CPU core).
    pub fn new(num_threads: usize) -> JxlResult<Self> {
        let mut builder = ThreadPoolBuilder::new();
        if num_threads > 0 {
            builder = builder.num_threads(num_threads);
        }
        let inner = builder
            .build()
            .map_err(|e| JxlError::InvalidConfiguration(format!("failed to start thread pool: {e}")))?;
        Ok(Self {
            inner,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// A handle to the cooperative cancellation flag, sharable across
    /// submitted closures.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Submit a single closure, run to completion before returning.
    pub fn submit<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.inner.install(f)
    }

    /// Submit a batch of independent closures and block until every one
    /// finishes (`wait_for_all` barrier).
    pub fn submit_all<F, R>(&self, jobs: Vec<F>) -> Vec<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.inner.install(|| {
            use rayon::prelude::*;
            jobs.into_par_iter().map(|job| job()).collect()
        })
    }

    /// Check cancellation and return `JxlError::Cancelled` if set. Call at
    /// frame boundaries and pool barriers per SPEC_FULL.md §5.
    pub fn check_cancelled(&self) -> JxlResult<()> {
        if self.is_cancelled() {
            Err(JxlError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn submit_all_runs_every_job() {
        let pool = WorkerPool::new(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let jobs: Vec<_> = (0..8)
            .map(|i| {
                let counter = counter.clone();
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    i * 2
                }
            })
            .collect();
        let results = pool.submit_all(jobs);
        assert_eq!(results.len(), 8);
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn cancellation_flag_is_observable() {
        let pool = WorkerPool::new(1).unwrap();
        assert!(pool.check_cancelled().is_ok());
        pool.cancel();
        assert!(matches!(pool.check_cancelled(), Err(JxlError::Cancelled)));
    }
}
