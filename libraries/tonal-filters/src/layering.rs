//! Multi-input layering graph
//!
//! Layer `i` processes engine input `i` through an optional
//! delay → pitch → volume → pan chain; every processed layer is then summed
//! with equal weights into one output.

use crate::advanced::{pan_filter, pitch_ratio, rate_shift};
use crate::filter::{chain, Filter};
use crate::plan::FilterGraph;
use tonal_core::{LayerSpec, MAX_LAYERS};

/// Mix-down renormalisation time when an input ends (seconds)
pub const DROPOUT_TRANSITION_SEC: u32 = 2;

/// Build the layering graph for `input_count` engine inputs
///
/// Layers without a matching input are ignored.
pub fn compile_layers(input_count: usize, layers: &[LayerSpec], nominal_rate: u32) -> FilterGraph {
    let effective = layers.len().min(input_count).min(MAX_LAYERS);
    if effective < layers.len() {
        tracing::warn!(
            requested = layers.len(),
            inputs = input_count,
            "Ignoring {} layer(s) without a matching input",
            layers.len() - effective
        );
    }

    let chains: Vec<String> = layers
        .iter()
        .take(effective)
        .enumerate()
        .map(|(i, layer)| format!("[{}:a]{}[l{}]", i, layer_chain(layer, nominal_rate), i))
        .collect();

    let labels: String = (0..effective).map(|i| format!("[l{}]", i)).collect();
    let mix = format!(
        "{}{}",
        labels,
        Filter::new("amix")
            .option("inputs", effective)
            .option("duration", "longest")
            .option("dropout_transition", DROPOUT_TRANSITION_SEC)
    );

    FilterGraph {
        chains,
        mix,
        input_count: effective,
    }
}

fn layer_chain(layer: &LayerSpec, nominal_rate: u32) -> String {
    let mut filters = Vec::new();

    if let Some(delay) = layer.delay_ms.filter(|d| *d > 0.0) {
        filters.push(Filter::new("adelay").value(format!("{}|{}", delay, delay)));
    }
    if let Some(semitones) = layer.pitch_semitones.filter(|s| *s != 0.0) {
        filters.extend(rate_shift(pitch_ratio(semitones, 0.0), nominal_rate));
    }
    if let Some(volume) = layer.volume {
        filters.push(Filter::new("volume").value(volume));
    }
    if let Some(pan) = layer.pan {
        filters.push(pan_filter(pan));
    }

    if filters.is_empty() {
        Filter::new("anull").to_string()
    } else {
        chain(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonal_core::BlendMode;

    #[test]
    fn test_layer_chain_order() {
        let layer = LayerSpec {
            blend: BlendMode::Mix,
            delay_ms: Some(120.0),
            pitch_semitones: Some(12.0),
            volume: Some(0.5),
            pan: Some(-0.5),
        };
        assert_eq!(
            layer_chain(&layer, 44100),
            "adelay=120|120,asetrate=44100*2,aresample=44100,volume=0.5,pan=stereo|c0=1*c0|c1=0.5*c1"
        );
    }

    #[test]
    fn test_unprocessed_layer_passes_through() {
        assert_eq!(layer_chain(&LayerSpec::default(), 44100), "anull");
    }

    #[test]
    fn test_mixdown_uses_longest_duration() {
        let graph = compile_layers(2, &[LayerSpec::default(), LayerSpec::default()], 44100);
        assert_eq!(graph.chains, vec!["[0:a]anull[l0]", "[1:a]anull[l1]"]);
        assert_eq!(
            graph.mix,
            "[l0][l1]amix=inputs=2:duration=longest:dropout_transition=2"
        );
        assert_eq!(graph.input_count, 2);
    }

    #[test]
    fn test_excess_layers_are_ignored() {
        let layers = vec![LayerSpec::default(); 3];
        let graph = compile_layers(2, &layers, 44100);
        assert_eq!(graph.chains.len(), 2);
        assert!(graph.mix.contains("inputs=2"));
    }

    #[test]
    fn test_extra_inputs_without_layers_are_unused() {
        let graph = compile_layers(4, &[LayerSpec::default()], 44100);
        assert_eq!(graph.chains.len(), 1);
        assert_eq!(graph.input_count, 1);
    }
}
