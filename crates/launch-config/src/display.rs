//! Display metrics and the render resolution override derived from them.

use serde::{Deserialize, Serialize};

use crate::{CapabilityError, StoredSettings};

/// Smallest video mode the engine accepts.
pub const MIN_WIDTH: u32 = 320;
pub const MIN_HEIGHT: u32 = 200;

/// Largest scaled dimension requested from the video layer.
pub const MAX_SCALED_DIMENSION: u32 = 16384;

/// Physical size of the display in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
}

impl DisplayMetrics {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// Source of the real display size.
pub trait DisplayMetricsProvider {
    fn real_metrics(&self) -> Result<DisplayMetrics, CapabilityError>;
}

impl DisplayMetricsProvider for DisplayMetrics {
    fn real_metrics(&self) -> Result<DisplayMetrics, CapabilityError> {
        Ok(*self)
    }
}

impl DisplayMetricsProvider for Option<DisplayMetrics> {
    fn real_metrics(&self) -> Result<DisplayMetrics, CapabilityError> {
        self.ok_or_else(|| CapabilityError::DisplayUnavailable("no display attached".into()))
    }
}

/// Where an override's target size came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Custom width/height from settings.
    Fixed,
    /// Real display size divided by `scale`.
    Scaled { scale: f32 },
}

/// Render resolution requested from the video layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOverride {
    pub width: u32,
    pub height: u32,
    /// Real display size, when it was known.
    pub device: Option<DisplayMetrics>,
    pub source: ResolutionSource,
}

/// Computes the render resolution override, if any.
///
/// With `resolution_fixed` unset the engine renders at native resolution.
/// Otherwise `resolution_custom` selects between the stored width/height
/// (both at least [`MIN_WIDTH`]x[`MIN_HEIGHT`]) and the real display size
/// divided by the stored scale, truncated per axis.
pub fn compute_resolution_override<D: DisplayMetricsProvider + ?Sized>(
    settings: &StoredSettings,
    display: &D,
) -> Option<ResolutionOverride> {
    if !settings.resolution_fixed {
        tracing::debug!("using native resolution");
        return None;
    }

    if settings.resolution_custom {
        let (width, height) = (settings.resolution_width, settings.resolution_height);
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            tracing::warn!(
                width,
                height,
                "custom resolution below {MIN_WIDTH}x{MIN_HEIGHT}, using native resolution"
            );
            return None;
        }

        tracing::debug!(width, height, "overriding display with custom resolution");
        return Some(ResolutionOverride {
            width,
            height,
            device: display.real_metrics().ok(),
            source: ResolutionSource::Fixed,
        });
    }

    let scale = settings.resolution_scale;
    if !settings.has_scale() || !scale.is_finite() || scale <= 0.0 {
        return None;
    }

    let real = match display.real_metrics() {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, scale, "cannot apply resolution scale");
            return None;
        }
    };

    let scaled = (
        scale_axis(real.width_px, scale),
        scale_axis(real.height_px, scale),
    );
    let (width, height) = match scaled {
        (Some(w), Some(h)) => (w, h),
        _ => {
            tracing::warn!(
                scale,
                "scaled resolution outside 1..={MAX_SCALED_DIMENSION}, using native resolution"
            );
            return None;
        }
    };

    tracing::debug!(scale, width, height, "overriding display with scale");
    Some(ResolutionOverride {
        width,
        height,
        device: Some(real),
        source: ResolutionSource::Scaled { scale },
    })
}

/// Divides one axis by `scale`, truncating. None when the result is zero
/// or larger than [`MAX_SCALED_DIMENSION`].
fn scale_axis(real: u32, scale: f32) -> Option<u32> {
    let scaled = (f64::from(real) / f64::from(scale)).trunc();
    (scaled >= 1.0 && scaled <= f64::from(MAX_SCALED_DIMENSION)).then_some(scaled as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FHD: DisplayMetrics = DisplayMetrics {
        width_px: 1920,
        height_px: 1080,
    };

    fn fixed(custom: bool) -> StoredSettings {
        StoredSettings {
            resolution_fixed: true,
            resolution_custom: custom,
            ..StoredSettings::default()
        }
    }

    #[test]
    fn not_fixed_means_native() {
        let settings = StoredSettings {
            resolution_width: 800,
            resolution_height: 600,
            resolution_scale: 0.5,
            ..StoredSettings::default()
        };
        assert_eq!(compute_resolution_override(&settings, &FHD), None);
    }

    #[test]
    fn custom_size_passes_through() {
        let settings = StoredSettings {
            resolution_width: 800,
            resolution_height: 600,
            resolution_scale: 0.5,
            ..fixed(true)
        };
        let o = compute_resolution_override(&settings, &FHD).unwrap();
        assert_eq!((o.width, o.height), (800, 600));
        assert_eq!(o.source, ResolutionSource::Fixed);
        assert_eq!(o.device, Some(FHD));
    }

    #[test]
    fn custom_size_without_display() {
        let settings = StoredSettings {
            resolution_width: 1024,
            resolution_height: 768,
            ..fixed(true)
        };
        let o = compute_resolution_override(&settings, &None::<DisplayMetrics>).unwrap();
        assert_eq!((o.width, o.height), (1024, 768));
        assert_eq!(o.device, None);
    }

    #[test]
    fn custom_size_below_minimum_is_ignored() {
        let settings = StoredSettings {
            resolution_width: 319,
            resolution_height: 600,
            ..fixed(true)
        };
        assert_eq!(compute_resolution_override(&settings, &FHD), None);

        let unset = fixed(true);
        assert_eq!(compute_resolution_override(&unset, &FHD), None);
    }

    #[test]
    fn scale_divides_real_pixels() {
        let settings = StoredSettings {
            resolution_scale: 0.5,
            ..fixed(false)
        };
        let o = compute_resolution_override(&settings, &FHD).unwrap();
        assert_eq!((o.width, o.height), (3840, 2160));
        assert_eq!(o.source, ResolutionSource::Scaled { scale: 0.5 });
    }

    #[test]
    fn scale_truncates() {
        let settings = StoredSettings {
            resolution_scale: 1.5,
            ..fixed(false)
        };
        let o = compute_resolution_override(&settings, &DisplayMetrics::new(2340, 1081)).unwrap();
        assert_eq!((o.width, o.height), (1560, 720));
    }

    #[test]
    fn unity_scale_is_native() {
        assert_eq!(compute_resolution_override(&fixed(false), &FHD), None);
    }

    #[test]
    fn scale_without_display_is_native() {
        let settings = StoredSettings {
            resolution_scale: 2.0,
            ..fixed(false)
        };
        assert_eq!(compute_resolution_override(&settings, &None::<DisplayMetrics>), None);
    }

    #[test]
    fn tiny_scale_is_native() {
        for scale in [1e-40, 0.01, 0.1] {
            let settings = StoredSettings {
                resolution_scale: scale,
                ..fixed(false)
            };
            assert_eq!(compute_resolution_override(&settings, &FHD), None, "scale {scale}");
        }
    }

    #[test]
    fn huge_scale_is_native() {
        let settings = StoredSettings {
            resolution_scale: 5000.0,
            ..fixed(false)
        };
        assert_eq!(compute_resolution_override(&settings, &FHD), None);
    }
}
