//! Single-writer store for the renderer's tone-mapping exposure.
//!
//! There is exactly one storage cell. [`ExposureAuthority`] handles can
//! write it; [`ExposureReader`] handles can only read it. Everything that
//! depends on exposure (bloom pass, light intensities, the clear colour,
//! debug UI) holds a reader and reads it each frame instead of keeping a
//! copy.

use std::cell::Cell;
use std::rc::Rc;

/// Lowest exposure the renderer accepts.
pub const MIN_EXPOSURE: f32 = 0.1;
/// Highest exposure the renderer accepts.
pub const MAX_EXPOSURE: f32 = 2.0;
/// Exposure at renderer creation.
pub const DEFAULT_EXPOSURE: f32 = 1.0;

/// Write handle to the exposure value. Cloning shares the same cell.
#[derive(Debug, Clone)]
pub struct ExposureAuthority {
    value: Rc<Cell<f32>>,
}

/// Read-only handle to the exposure value.
#[derive(Debug, Clone)]
pub struct ExposureReader {
    value: Rc<Cell<f32>>,
}

impl Default for ExposureAuthority {
    fn default() -> Self {
        Self::new(DEFAULT_EXPOSURE)
    }
}

impl ExposureAuthority {
    /// New store holding `initial`, clamped.
    #[must_use]
    pub fn new(initial: f32) -> Self {
        let authority = Self {
            value: Rc::new(Cell::new(DEFAULT_EXPOSURE)),
        };
        let _ = authority.set_exposure(initial);
        authority
    }

    /// Clamp `value` to `[MIN_EXPOSURE, MAX_EXPOSURE]` and store it. NaN
    /// leaves the current value in place. Returns the stored value.
    pub fn set_exposure(&self, value: f32) -> f32 {
        if value.is_nan() {
            log::warn!("ignoring NaN exposure");
            return self.value.get();
        }
        let clamped = value.clamp(MIN_EXPOSURE, MAX_EXPOSURE);
        if clamped != value {
            log::debug!("exposure {value} clamped to {clamped}");
        }
        self.value.set(clamped);
        clamped
    }

    /// Current exposure.
    #[must_use]
    pub fn get_exposure(&self) -> f32 {
        self.value.get()
    }

    /// A read-only handle onto the same cell.
    #[must_use]
    pub fn reader(&self) -> ExposureReader {
        ExposureReader {
            value: Rc::clone(&self.value),
        }
    }
}

impl ExposureReader {
    /// Current exposure.
    #[must_use]
    pub fn get_exposure(&self) -> f32 {
        self.value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_is_clamped() {
        let authority = ExposureAuthority::default();
        for x in [-5.0, 0.0, 0.05, 0.1, 0.7, 1.0, 2.0, 2.5, 1e9, f32::INFINITY] {
            let _ = authority.set_exposure(x);
            assert_eq!(authority.get_exposure(), x.clamp(0.1, 2.0), "x = {x}");
        }
    }

    #[test]
    fn nan_is_ignored() {
        let authority = ExposureAuthority::new(0.8);
        assert_eq!(authority.set_exposure(f32::NAN), 0.8);
        assert_eq!(authority.get_exposure(), 0.8);
    }

    #[test]
    fn readers_see_every_write() {
        let authority = ExposureAuthority::default();
        let reader = authority.reader();
        let writer = authority.clone();
        assert_eq!(reader.get_exposure(), 1.0);
        let _ = writer.set_exposure(1.6);
        assert_eq!(reader.get_exposure(), 1.6);
        assert_eq!(authority.get_exposure(), 1.6);
    }

    #[test]
    fn initial_value_is_clamped() {
        assert_eq!(ExposureAuthority::new(9.0).get_exposure(), 2.0);
    }
}
