//! Batch evaluation of many materials per call.
//!
//! Element-wise identical to calling [`evaluate`](crate::evaluate::evaluate)
//! on each pair: every path runs the same kernel against the same shared
//! Fresnel table. Inputs are validated up front, so a batch either fails
//! before any work happens or completes in full. Inside the per-element
//! loop nothing allocates; the only allocation is the returned buffer,
//! and the `_into` variants skip even that.

pub mod packed;
pub mod soa;

use crate::error::{Result, VitrumError};
use crate::evaluate::{
    EVALUATED_STRIDE, EvaluatedMaterial, FresnelLut, KernelInput, evaluate_kernel,
};
use crate::material::context::MaterialContext;
use crate::material::glass::GlassMaterial;

pub use packed::{CONTEXT_STRIDE, MATERIAL_STRIDE, PackedContext, PackedMaterial};
pub use soa::MaterialBatch;

/// Front door for high-throughput evaluation.
///
/// Holds a reference to the process-wide Fresnel table; cheap to create
/// and `Copy`.
#[derive(Debug, Clone, Copy)]
pub struct BatchEngine {
    lut: &'static FresnelLut,
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchEngine {
    pub fn new() -> Self {
        Self {
            lut: FresnelLut::shared(),
        }
    }

    /// Evaluate `materials[i]` in `contexts[i]` for every `i`.
    pub fn evaluate_batch(
        &self,
        materials: &[GlassMaterial],
        contexts: &[MaterialContext],
    ) -> Result<Vec<EvaluatedMaterial>> {
        check_lengths(materials.len(), contexts.len())?;
        validate_all(materials)?;
        tracing::debug!(count = materials.len(), "evaluating material batch");

        let mut out = Vec::with_capacity(materials.len());
        for (m, c) in materials.iter().zip(contexts) {
            out.push(evaluate_kernel(&KernelInput::new(m, c), self.lut));
        }
        Ok(out)
    }

    /// Like [`evaluate_batch`](Self::evaluate_batch) but writes into
    /// `out[..materials.len()]` and never allocates.
    pub fn evaluate_into(
        &self,
        materials: &[GlassMaterial],
        contexts: &[MaterialContext],
        out: &mut [EvaluatedMaterial],
    ) -> Result<()> {
        check_lengths(materials.len(), contexts.len())?;
        check_output(materials.len(), out.len())?;
        validate_all(materials)?;
        tracing::debug!(count = materials.len(), "evaluating material batch in place");

        for ((m, c), slot) in materials.iter().zip(contexts).zip(out.iter_mut()) {
            *slot = evaluate_kernel(&KernelInput::new(m, c), self.lut);
        }
        Ok(())
    }

    /// Evaluate pre-validated column storage against one context each.
    pub fn evaluate_soa(
        &self,
        batch: &MaterialBatch,
        contexts: &[MaterialContext],
    ) -> Result<Vec<EvaluatedMaterial>> {
        check_lengths(batch.len(), contexts.len())?;
        tracing::debug!(count = batch.len(), "evaluating column batch");

        let mut out = Vec::with_capacity(batch.len());
        for (i, c) in contexts.iter().enumerate() {
            out.push(evaluate_kernel(&batch.kernel_input(i, c), self.lut));
        }
        Ok(out)
    }

    /// Evaluate pre-validated column storage, every material against the
    /// same context.
    pub fn evaluate_soa_shared(
        &self,
        batch: &MaterialBatch,
        context: &MaterialContext,
    ) -> Vec<EvaluatedMaterial> {
        (0..batch.len())
            .map(|i| evaluate_kernel(&batch.kernel_input(i, context), self.lut))
            .collect()
    }

    /// Packed records in, packed records out (strides 11, 5 and 13).
    pub fn evaluate_packed(&self, materials: &[f32], contexts: &[f32]) -> Result<Vec<f32>> {
        let count = packed::view_materials(materials)?.len();
        let mut out = vec![0.0; count * EVALUATED_STRIDE];
        self.evaluate_packed_into(materials, contexts, &mut out)?;
        Ok(out)
    }

    /// Packed evaluation into a caller-owned buffer of at least
    /// `count * 13` floats. Non-finite input fields are read as 0.
    pub fn evaluate_packed_into(
        &self,
        materials: &[f32],
        contexts: &[f32],
        out: &mut [f32],
    ) -> Result<()> {
        let materials = packed::view_materials(materials)?;
        let contexts = packed::view_contexts(contexts)?;
        check_lengths(materials.len(), contexts.len())?;
        check_output(materials.len() * EVALUATED_STRIDE, out.len())?;
        for record in materials {
            GlassMaterial::from(&record.flushed()).validate()?;
        }
        tracing::debug!(count = materials.len(), "evaluating packed batch");

        let slots = out.chunks_exact_mut(EVALUATED_STRIDE);
        for ((m, c), slot) in materials.iter().zip(contexts).zip(slots) {
            let material = GlassMaterial::from(&m.flushed());
            let context = MaterialContext::from(&c.flushed());
            evaluate_kernel(&KernelInput::new(&material, &context), self.lut).write_packed(slot);
        }
        Ok(())
    }
}

/// One-shot batch evaluation with a default engine.
pub fn evaluate_batch(
    materials: &[GlassMaterial],
    contexts: &[MaterialContext],
) -> Result<Vec<EvaluatedMaterial>> {
    BatchEngine::new().evaluate_batch(materials, contexts)
}

fn check_lengths(materials: usize, contexts: usize) -> Result<()> {
    if materials != contexts {
        return Err(VitrumError::LengthMismatch {
            materials,
            contexts,
        });
    }
    Ok(())
}

fn check_output(needed: usize, got: usize) -> Result<()> {
    if got < needed {
        return Err(VitrumError::OutputTooSmall { needed, got });
    }
    Ok(())
}

fn validate_all(materials: &[GlassMaterial]) -> Result<()> {
    materials.iter().try_for_each(GlassMaterial::validate)
}
