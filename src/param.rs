use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform};

use crate::{error::BuildError, wire::Wire};

/// How gate parameters get their initial values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamInit {
    /// Uniform in `[low, high)`
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, std_dev: f64 },
    /// Every parameter starts at exactly this value
    Constant(f64),
}
impl ParamInit {
    /// Every parameter is `1.0`, so expected outputs can be computed by hand.
    pub fn deterministic() -> Self {
        Self::Constant(1.0)
    }
}
impl Default for ParamInit {
    fn default() -> Self {
        Self::Uniform {
            low: 0.0,
            high: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
enum Sampler {
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
    Constant(f64),
}

/// Draws initial parameter values for newly constructed gates.
#[derive(Debug, Clone)]
pub struct ParamSource {
    sampler: Sampler,
    rng: StdRng,
}
impl ParamSource {
    /// `seed`: `None` seeds from OS entropy
    pub fn new(init: ParamInit, seed: Option<u64>) -> Result<Self, BuildError> {
        let sampler = match init {
            ParamInit::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite() && low < high) {
                    return Err(BuildError::InvalidParamInit {
                        reason: format!("empty uniform range [{low}, {high})"),
                    });
                }
                if !(high - low).is_finite() {
                    return Err(BuildError::InvalidParamInit {
                        reason: format!("uniform range [{low}, {high}) overflows"),
                    });
                }
                Sampler::Uniform(Uniform::new(low, high))
            }
            ParamInit::Normal { mean, std_dev } => {
                let normal = Normal::new(mean, std_dev).map_err(|e| BuildError::InvalidParamInit {
                    reason: e.to_string(),
                })?;
                Sampler::Normal(normal)
            }
            ParamInit::Constant(value) => {
                if !value.is_finite() {
                    return Err(BuildError::InvalidParamInit {
                        reason: format!("non-finite constant {value}"),
                    });
                }
                Sampler::Constant(value)
            }
        };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { sampler, rng })
    }

    /// Unseeded `[0, 1)`; cannot fail.
    pub fn standard() -> Self {
        Self {
            sampler: Sampler::Uniform(Uniform::new(0.0, 1.0)),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn sample(&mut self) -> f64 {
        match &self.sampler {
            Sampler::Uniform(d) => d.sample(&mut self.rng),
            Sampler::Normal(d) => d.sample(&mut self.rng),
            Sampler::Constant(value) => *value,
        }
    }

    /// `n` fresh parameter wires with zero grads
    pub fn wires(&mut self, n: usize) -> Vec<Wire> {
        (0..n).map(|_| Wire::new(self.sample())).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::BuildError;

    use super::{ParamInit, ParamSource};

    #[test]
    fn constant() {
        let mut source = ParamSource::new(ParamInit::deterministic(), None).unwrap();
        let wires = source.wires(4);
        assert!(wires.iter().all(|w| w.value == 1.0 && w.grad == 0.0));
    }

    #[test]
    fn seeded_is_reproducible() {
        let init = ParamInit::Normal {
            mean: 0.0,
            std_dev: 0.5,
        };
        let mut a = ParamSource::new(init, Some(42)).unwrap();
        let mut b = ParamSource::new(init, Some(42)).unwrap();
        assert_eq!(a.wires(8), b.wires(8));
    }

    #[test]
    fn standard_range() {
        let mut source = ParamSource::standard();
        for _ in 0..1000 {
            let x = source.sample();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn invalid() {
        let err = ParamSource::new(ParamInit::Uniform { low: 1.0, high: 1.0 }, None).unwrap_err();
        assert!(matches!(err, BuildError::InvalidParamInit { .. }));
        let overflowing = ParamInit::Uniform {
            low: -f64::MAX,
            high: f64::MAX,
        };
        let err = ParamSource::new(overflowing, None).unwrap_err();
        assert!(matches!(err, BuildError::InvalidParamInit { .. }));
        let init = ParamInit::Normal {
            mean: 0.0,
            std_dev: -1.0,
        };
        assert!(ParamSource::new(init, None).is_err());
        assert!(ParamSource::new(ParamInit::Constant(f64::NAN), None).is_err());
    }
}
