//! Operation compilers
//!
//! An [`OperationCompiler`] is injected into the processor at construction.
//! [`BaseCompiler`] handles `volume`, `format` and `effects`;
//! [`AdvancedCompiler`] adds everything under `advanced`.

use crate::advanced::{compile_advanced, DEFAULT_NOMINAL_RATE};
use crate::base::{apply_format, compile_effects, compile_volume};
use crate::layering::compile_layers;
use crate::plan::CommandPlan;
use tonal_core::OperationSet;

/// Pure translation of an operation set into an engine command plan
///
/// Implementations never fail and never re-validate ranges: absent fields
/// and uncovered combinations simply produce no directive.
pub trait OperationCompiler: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn compile(&self, operations: &OperationSet) -> CommandPlan;

    /// Compile for a job reading `input_count` engine inputs
    ///
    /// Single-input compilers ignore the extra inputs.
    fn compile_for_inputs(&self, operations: &OperationSet, input_count: usize) -> CommandPlan {
        let _ = input_count;
        self.compile(operations)
    }
}

/// Volume, format and effects only
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseCompiler;

impl BaseCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl OperationCompiler for BaseCompiler {
    fn name(&self) -> &'static str {
        "base"
    }

    fn compile(&self, operations: &OperationSet) -> CommandPlan {
        let mut plan = CommandPlan::default();

        if let Some(volume) = &operations.volume {
            compile_volume(volume, &mut plan.filters);
        }
        if let Some(format) = &operations.format {
            apply_format(format, &mut plan);
        }
        if let Some(effects) = &operations.effects {
            compile_effects(effects, &mut plan);
        }

        plan
    }
}

/// Base operations plus the `advanced` block and multi-input layering
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedCompiler {
    base: BaseCompiler,
}

impl AdvancedCompiler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperationCompiler for AdvancedCompiler {
    fn name(&self) -> &'static str {
        "advanced"
    }

    fn compile(&self, operations: &OperationSet) -> CommandPlan {
        let mut plan = self.base.compile(operations);

        if let Some(advanced) = &operations.advanced {
            let nominal_rate = plan.sample_rate_hz.unwrap_or(DEFAULT_NOMINAL_RATE);
            compile_advanced(advanced, nominal_rate, &mut plan.filters);
        }

        tracing::trace!(filters = ?plan.filters, "Compiled operation set");
        plan
    }

    fn compile_for_inputs(&self, operations: &OperationSet, input_count: usize) -> CommandPlan {
        let mut plan = self.compile(operations);

        if let Some(layering) = operations.layering() {
            if input_count > 0 {
                let nominal_rate = plan.sample_rate_hz.unwrap_or(DEFAULT_NOMINAL_RATE);
                plan.graph = Some(compile_layers(input_count, &layering.layers, nominal_rate));
            }
        }

        plan
    }
}
