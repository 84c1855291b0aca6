//! Vitrum Backend — renders evaluated materials for concrete targets.
//!
//! Each backend takes an [`EvaluatedMaterial`] in physical units and a
//! [`RenderContext`] and does unit conversion only: millimetres become CSS
//! pixels, device pixels, points or stay millimetres, and linear color is
//! encoded for the target space. No optics are recomputed here.
//!
//! Hot paths use the [`Backend`] trait with static dispatch
//! ([`render_batch`]). Hosts that pick a target at runtime go through
//! [`render_dyn`] / [`render_json`], which return a tagged
//! [`RenderedArtifact`].

pub mod css;
pub mod gpu;
pub mod native;
pub mod print;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vitrum_core::{EvaluatedMaterial, GlassMaterial, MaterialContext, VitrumError};

// Re-exports for convenience.
pub use css::{CSS_PX_PER_MM, CssArtifact, CssBackend};
pub use gpu::{GpuBackend, GpuMaterialCommand};
pub use native::{NativeArtifact, NativeBackend};
pub use print::{PrintArtifact, PrintBackend};
pub use vitrum_core::render_context::{Compensation, MM_PER_INCH, RenderContext};

// ── Errors ───────────────────────────────────────────────────────

/// Errors that can occur while evaluating or rendering a material.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Core(#[from] VitrumError),

    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    #[error("failed to serialize artifact: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;

// ── Backend trait ────────────────────────────────────────────────

/// One render target.
///
/// Implementations are unit converters: they read physical quantities and
/// never mutate the evaluated material.
pub trait Backend {
    /// Target-native representation.
    type Output;

    /// Which variant of [`BackendKind`] this backend is.
    fn kind(&self) -> BackendKind;

    fn render(&self, material: &EvaluatedMaterial, ctx: &RenderContext) -> Self::Output;
}

/// Render many materials with one backend. Allocates only the returned
/// `Vec`.
pub fn render_batch<B: Backend>(
    backend: &B,
    materials: &[EvaluatedMaterial],
    ctx: &RenderContext,
) -> Vec<B::Output> {
    tracing::debug!(count = materials.len(), backend = %backend.kind(), "rendering batch");
    materials.iter().map(|m| backend.render(m, ctx)).collect()
}

/// Evaluate then render in one step.
pub fn evaluate_and_render<B: Backend>(
    backend: &B,
    material: &GlassMaterial,
    material_ctx: &MaterialContext,
    render_ctx: &RenderContext,
) -> Result<B::Output> {
    let evaluated = vitrum_core::evaluate(material, material_ctx)?;
    Ok(backend.render(&evaluated, render_ctx))
}

// ── Dynamic dispatch ─────────────────────────────────────────────

/// The closed set of render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Css,
    Gpu,
    Print,
    Native,
}

impl BackendKind {
    pub const ALL: [Self; 4] = [Self::Css, Self::Gpu, Self::Print, Self::Native];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Gpu => "gpu",
            Self::Print => "print",
            Self::Native => "native",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(name: &str) -> Result<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BackendError::UnknownBackend(name.to_string()))
    }
}

/// Output of [`render_dyn`], tagged by target for the host boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RenderedArtifact {
    Css(CssArtifact),
    Gpu(GpuMaterialCommand),
    Print(PrintArtifact),
    Native(NativeArtifact),
}

impl RenderedArtifact {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Css(_) => BackendKind::Css,
            Self::Gpu(_) => BackendKind::Gpu,
            Self::Print(_) => BackendKind::Print,
            Self::Native(_) => BackendKind::Native,
        }
    }
}

/// Render with a backend chosen at runtime.
pub fn render_dyn(
    kind: BackendKind,
    material: &EvaluatedMaterial,
    ctx: &RenderContext,
) -> RenderedArtifact {
    match kind {
        BackendKind::Css => RenderedArtifact::Css(CssBackend.render(material, ctx)),
        BackendKind::Gpu => RenderedArtifact::Gpu(GpuBackend.render(material, ctx)),
        BackendKind::Print => RenderedArtifact::Print(PrintBackend.render(material, ctx)),
        BackendKind::Native => RenderedArtifact::Native(NativeBackend.render(material, ctx)),
    }
}

/// [`render_dyn`] serialized as `{"type": ..., "data": ...}`.
pub fn render_json(
    kind: BackendKind,
    material: &EvaluatedMaterial,
    ctx: &RenderContext,
) -> Result<String> {
    Ok(serde_json::to_string(&render_dyn(kind, material, ctx))?)
}

/// Host entry point taking JSON on both sides: a material description
/// (partial fields allowed), a target name and a render context.
pub fn render_material_json(material_json: &str, kind: &str, ctx_json: &str) -> Result<String> {
    let material = GlassMaterial::from_json(material_json)?;
    let kind = kind.parse::<BackendKind>()?;
    let ctx: RenderContext = serde_json::from_str(ctx_json)?;
    let evaluated = vitrum_core::evaluate(&material, &MaterialContext::default())?;
    render_json(kind, &evaluated, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrum_core::Preset;

    fn frosted() -> EvaluatedMaterial {
        vitrum_core::evaluate(&Preset::Frosted.material(), &MaterialContext::default()).unwrap()
    }

    #[test]
    fn test_backend_kind_parses_case_insensitively() {
        assert_eq!("CSS".parse::<BackendKind>().unwrap(), BackendKind::Css);
        assert_eq!(" native ".parse::<BackendKind>().unwrap(), BackendKind::Native);
        assert!(matches!(
            "svg".parse::<BackendKind>(),
            Err(BackendError::UnknownBackend(name)) if name == "svg"
        ));
    }

    #[test]
    fn test_render_dyn_matches_static_dispatch() {
        let m = frosted();
        let ctx = RenderContext::default();
        for kind in BackendKind::ALL {
            let artifact = render_dyn(kind, &m, &ctx);
            assert_eq!(artifact.kind(), kind);
        }
        assert_eq!(
            render_dyn(BackendKind::Css, &m, &ctx),
            RenderedArtifact::Css(CssBackend.render(&m, &ctx))
        );
    }

    #[test]
    fn test_render_batch_preserves_order() {
        let materials: Vec<_> = Preset::all()
            .iter()
            .map(|p| vitrum_core::evaluate(&p.material(), &MaterialContext::default()).unwrap())
            .collect();
        let out = render_batch(&PrintBackend, &materials, &RenderContext::default());
        assert_eq!(out.len(), materials.len());
        for (artifact, m) in out.iter().zip(&materials) {
            assert_eq!(artifact.blur_radius_mm, m.scattering_radius_mm);
        }
    }

    #[test]
    fn test_evaluate_and_render_surfaces_core_errors() {
        let mut bad = Preset::Regular.material();
        bad.thickness = -1.0;
        let err = evaluate_and_render(
            &CssBackend,
            &bad,
            &MaterialContext::default(),
            &RenderContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BackendError::Core(VitrumError::NegativeThickness(_))));
    }

    #[test]
    fn test_render_json_is_tagged() {
        let json = render_json(BackendKind::Gpu, &frosted(), &RenderContext::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "gpu");
        assert!(value["data"]["blur_radius_px"].is_number());
    }
}
