use std::num::NonZeroUsize;

use rayon::prelude::*;

use crate::error::BuildError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// `None`: share rayon's global pool
    pub threads: Option<NonZeroUsize>,
    /// Layers with fewer gates than this run on the calling thread
    pub min_parallel_gates: usize,
}
impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            threads: None,
            min_parallel_gates: 2,
        }
    }
}

/// Fan-out/join over the gates of one layer.
///
/// Every call returns only after all submitted work has finished.
#[derive(Debug)]
pub struct LayerExecutor {
    pool: Option<rayon::ThreadPool>,
    min_parallel_gates: usize,
}
impl LayerExecutor {
    pub fn new(config: &ParallelConfig) -> Result<Self, BuildError> {
        let pool = match config.threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads.get())
                    .thread_name(|i| format!("gatenet-{i}"))
                    .build()
                    .map_err(|e| BuildError::ThreadPool {
                        reason: e.to_string(),
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            pool,
            min_parallel_gates: config.min_parallel_gates,
        })
    }

    /// Runs on the global pool
    pub fn global() -> Self {
        Self {
            pool: None,
            min_parallel_gates: ParallelConfig::default().min_parallel_gates,
        }
    }

    /// Results come back in `items` order.
    ///
    /// On the first `Err`, workers that have not started yet are skipped and
    /// one of the errors is returned.
    pub fn try_map<T, R, E, F>(&self, items: &[T], f: F) -> Result<Vec<R>, E>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(&T) -> Result<R, E> + Sync + Send,
    {
        if items.len() < self.min_parallel_gates {
            return items.iter().map(f).collect();
        }
        let run = || items.par_iter().map(&f).collect::<Result<Vec<R>, E>>();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if items.len() < self.min_parallel_gates {
            return items.iter().map(f).collect();
        }
        let run = || items.par_iter().map(&f).collect::<Vec<R>>();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Worker count of the pool this executor submits to
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}
