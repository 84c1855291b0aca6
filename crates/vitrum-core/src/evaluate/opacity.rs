//! Apparent opacity of a pane against its background.

/// How strongly background lightness moves opacity away from `1 - T`.
pub const BACKGROUND_SENSITIVITY: f32 = 0.2;

/// Background lightness at which opacity is exactly `1 - T`.
pub const NEUTRAL_BACKGROUND_L: f32 = 0.5;

/// `clamp(1 - T·(1 + k·(0.5 - L_bg)), 0, 1)`.
///
/// Non-decreasing in background lightness for every transmittance: a
/// brighter backdrop makes the same pane read as more opaque. At the
/// neutral mid-gray backdrop it reduces to `1 - T`.
#[inline]
pub fn context_opacity(transmittance: f32, background_l: f32) -> f32 {
    let l = background_l.clamp(0.0, 1.0);
    let seen = transmittance * (1.0 + BACKGROUND_SENSITIVITY * (NEUTRAL_BACKGROUND_L - l));
    (1.0 - seen).clamp(0.0, 1.0)
}
