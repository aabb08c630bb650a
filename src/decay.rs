use crate::error::{Error, Result};

/// An implementation of an episode-decaying value
pub trait Decay {
    /// Calculate value at episode `t`
    fn evaluate(&self, t: u32) -> f64;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: u32) -> f64 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> * rate<sup>t</sup>, v<sub>f</sub>)
///
/// Multiplicative per-episode decay with a hard floor. Non-increasing in `t`
/// for any `rate` in `(0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometric {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Geometric {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(Error::InvalidConfig {
                name: "rate",
                value: rate.to_string(),
                bounds: "in the interval (0, 1]",
            });
        }
        if vi < vf {
            return Err(Error::InvalidConfig {
                name: "vi",
                value: vi.to_string(),
                bounds: "at least the floor `vf`",
            });
        }
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Geometric {
    fn evaluate(&self, t: u32) -> f64 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powi(t as i32)).max(vf)
    }
}
