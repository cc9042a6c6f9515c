use crate::error::AppError;

/// Bounded, stepped numeric control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slider {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

const EPSILON: f64 = 1e-9;

impl Slider {
    pub const fn new(name: &'static str, (min, max, step): (f64, f64, f64)) -> Self {
        Self {
            name,
            min,
            max,
            step,
        }
    }

    /// Rejects values outside the bounds, otherwise snaps to the nearest
    /// step counted from `min`.
    pub fn accept(&self, value: f64) -> Result<f64, AppError> {
        if !value.is_finite()
            || value < self.min - EPSILON
            || value > self.max + EPSILON
        {
            return Err(AppError::InvalidParameterRange {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).clamp(self.min, self.max);
        // drop float fuzz such as 0.30000000000000004
        Ok((snapped * 1e6).round() / 1e6)
    }

    pub fn label(&self) -> String {
        format!("{} ({}-{})", self.name, self.min, self.max)
    }

    pub fn describe(&self, current: f64) -> String {
        format!("{}: {}", self.label(), current)
    }
}
