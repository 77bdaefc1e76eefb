//! Bounded-parallelism job runner.
//!
//! Jobs run on scoped worker threads, at most `parallelism` at a time.
//! Context cancellation always wins over starting another job: once the
//! context is done no new job starts, while jobs already running finish on
//! their own. Every error is kept and the caller gets them joined.

use crate::engine::context::Context;
use crate::error::{ContextError, Error, Result};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a blocked scheduler re-checks its context.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A cancelable unit of work.
pub type Job<'a> = Box<dyn FnOnce(&Context) -> Result<()> + Send + 'a>;

/// Scheduler settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelizeOptions {
    /// Maximum concurrent jobs; zero or less means one per logical CPU
    pub parallelism: i64,
    /// Cancel jobs that have not started yet after the first failure
    pub cancel_on_failure: bool,
}

/// Logical CPUs on this host.
pub fn default_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Turn a configured value into a concrete worker count.
///
/// Values below one are clamped to [`default_parallelism`].
pub fn resolve_parallelism(parallelism: i64) -> usize {
    if parallelism < 1 {
        return default_parallelism();
    }
    usize::try_from(parallelism).unwrap_or(usize::MAX)
}

/// Run `jobs`, at most `options.parallelism` at once, and wait for all of
/// them.
///
/// Zero jobs return immediately; a single job runs inline on the caller's
/// thread.
pub fn parallelize(ctx: &Context, jobs: Vec<Job<'_>>, options: ParallelizeOptions) -> Result<()> {
    let mut jobs = jobs;
    match jobs.len() {
        0 => return Ok(()),
        1 => {
            if let Some(job) = jobs.pop() {
                return job(ctx);
            }
        }
        _ => {}
    }

    let parallelism = resolve_parallelism(options.parallelism);
    let (ctx, cancel) = if options.cancel_on_failure {
        let (child, cancel) = ctx.with_cancel();
        (child, Some(cancel))
    } else {
        (ctx.clone(), None)
    };
    let semaphore = Semaphore::new(parallelism);
    let errors: Mutex<Vec<Error>> = Mutex::new(Vec::new());

    tracing::trace!(jobs = jobs.len(), parallelism, "starting parallel jobs");

    thread::scope(|scope| {
        for job in jobs {
            if let Err(err) = semaphore.acquire(&ctx) {
                lock(&errors).push(err.into());
                break;
            }
            // Done contexts take precedence even if a permit was free.
            if let Some(err) = ctx.err() {
                semaphore.release();
                lock(&errors).push(err.into());
                break;
            }
            let ctx = &ctx;
            let semaphore = &semaphore;
            let errors = &errors;
            let cancel = cancel.as_ref();
            scope.spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| job(ctx)))
                    .unwrap_or_else(|_| Err(Error::Internal("job panicked".to_string())));
                if let Err(err) = result {
                    lock(errors).push(err);
                    if let Some(cancel) = cancel {
                        cancel.cancel();
                    }
                }
                semaphore.release();
            });
        }
    });

    let errors = errors.into_inner().unwrap_or_else(PoisonError::into_inner);
    match Error::join(errors) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Counting semaphore whose waits give up once a context is done.
struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    fn new(permits: usize) -> Self {
        Semaphore {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    fn acquire(&self, ctx: &Context) -> Result<(), ContextError> {
        let mut permits = lock(&self.permits);
        loop {
            if let Some(err) = ctx.err() {
                return Err(err);
            }
            if *permits > 0 {
                *permits -= 1;
                return Ok(());
            }
            let wait = ctx
                .deadline()
                .map(|d| d.saturating_duration_since(Instant::now()))
                .map_or(POLL_INTERVAL, |until| until.min(POLL_INTERVAL));
            permits = match self.available.wait_timeout(permits, wait) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    fn release(&self) {
        *lock(&self.permits) += 1;
        self.available.notify_one();
    }
}
