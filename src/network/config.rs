use std::{num::NonZeroUsize, str::FromStr};

use crate::{error::ConfigError, param::ParamInit, parallel::ParallelConfig};

pub const SEED_VAR: &str = "GATENET_SEED";
pub const THREADS_VAR: &str = "GATENET_THREADS";
pub const TRACE_VAR: &str = "GATENET_TRACE";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkConfig {
    pub param_init: ParamInit,
    /// `None`: parameters are seeded from OS entropy
    pub seed: Option<u64>,
    pub parallel: ParallelConfig,
    /// Print per-layer timings to stderr
    pub trace: bool,
}
impl NetworkConfig {
    pub fn deterministic() -> Self {
        Self::default().with_param_init(ParamInit::deterministic())
    }

    /// Defaults overlaid with `GATENET_SEED`, `GATENET_THREADS` and `GATENET_TRACE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|var| std::env::var(var).ok())
    }

    pub fn overlay(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(seed) = parse_var::<u64>(&lookup, SEED_VAR)? {
            self.seed = Some(seed);
        }
        if let Some(threads) = parse_var::<NonZeroUsize>(&lookup, THREADS_VAR)? {
            self.parallel.threads = Some(threads);
        }
        if let Some(trace) = lookup(TRACE_VAR) {
            self.trace = match trace.trim() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: TRACE_VAR,
                        value: trace,
                    })
                }
            };
        }
        Ok(self)
    }

    pub fn with_param_init(mut self, param_init: ParamInit) -> Self {
        self.param_init = param_init;
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(x) => Ok(Some(x)),
        Err(_) => Err(ConfigError::InvalidEnv { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use crate::{error::ConfigError, param::ParamInit};

    use super::{NetworkConfig, SEED_VAR, THREADS_VAR, TRACE_VAR};

    fn vars(
        pairs: &'static [(&'static str, &'static str)],
    ) -> impl Fn(&'static str) -> Option<String> {
        move |var| {
            pairs
                .iter()
                .find(|(k, _)| *k == var)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn overlay() {
        let config = NetworkConfig::deterministic()
            .overlay(vars(&[(SEED_VAR, "9"), (THREADS_VAR, "4"), (TRACE_VAR, "1")]))
            .unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.parallel.threads, NonZeroUsize::new(4));
        assert!(config.trace);
        assert_eq!(config.param_init, ParamInit::Constant(1.0));
    }

    #[test]
    fn from_process_env() {
        std::env::set_var(SEED_VAR, "17");
        std::env::set_var(TRACE_VAR, "0");
        let config = NetworkConfig::from_env();
        std::env::remove_var(SEED_VAR);
        std::env::remove_var(TRACE_VAR);
        let config = config.unwrap();
        assert_eq!(config.seed, Some(17));
        assert!(!config.trace);
    }

    #[test]
    fn nothing_set() {
        let config = NetworkConfig::default().overlay(vars(&[])).unwrap();
        assert_eq!(config, NetworkConfig::default());
    }

    #[test]
    fn malformed() {
        let err = NetworkConfig::default()
            .overlay(vars(&[(THREADS_VAR, "0")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                var: THREADS_VAR,
                value: "0".into()
            }
        );
        assert!(NetworkConfig::default()
            .overlay(vars(&[(TRACE_VAR, "yes please")]))
            .is_err());
    }
}
