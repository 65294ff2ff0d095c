//! Band-energy extraction over a live audio signal.
//!
//! The platform side supplies a [`SignalGraph`]; the analyzer only pulls byte
//! frequency data from it and reduces that to bass/mid/high/overall energy.
//! Every failure at the graph boundary degrades to zeroed output.

use crate::config::AudioConfig;
use crate::error::GraphError;

/// Platform signal graph: a source feeding a frequency analyser.
pub trait SignalGraph {
    /// Copy the latest byte frequency spectrum into `out`, resizing it to the bin count.
    fn frequency_data(&mut self, out: &mut Vec<u8>);
    fn is_suspended(&self) -> bool;
    /// Ask a suspended graph to run again. Best effort.
    fn resume(&self) -> Result<(), GraphError>;
    /// Release every node. Must tolerate being called on a half-built graph.
    fn disconnect(&mut self);
}

/// Normalized band energies, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioEnergy {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub energy: f32,
}

impl AudioEnergy {
    pub const SILENT: AudioEnergy = AudioEnergy {
        bass: 0.0,
        mid: 0.0,
        high: 0.0,
        energy: 0.0,
    };

    /// Exponentially move toward `target` by `alpha`.
    pub fn approach(&mut self, target: &AudioEnergy, alpha: f32) {
        self.bass += (target.bass - self.bass) * alpha;
        self.mid += (target.mid - self.mid) * alpha;
        self.high += (target.high - self.high) * alpha;
        self.energy += (target.energy - self.energy) * alpha;
    }
}

/// Reduce a byte spectrum to band energies using the configured splits and divisors.
pub fn band_energies(spectrum: &[u8], cfg: &AudioConfig) -> AudioEnergy {
    let len = spectrum.len();
    if len == 0 {
        return AudioEnergy::SILENT;
    }
    let bass_end = ((len as f32 * cfg.bass_split) as usize).min(len);
    let mid_end = ((len as f32 * cfg.mid_split) as usize).clamp(bass_end, len);

    let mut bass_sum = 0u32;
    let mut mid_sum = 0u32;
    let mut high_sum = 0u32;
    for (i, &v) in spectrum.iter().enumerate() {
        let v = v as u32;
        if i < bass_end {
            bass_sum += v;
        } else if i < mid_end {
            mid_sum += v;
        } else {
            high_sum += v;
        }
    }
    let total = bass_sum + mid_sum + high_sum;

    AudioEnergy {
        bass: normalized(bass_sum, bass_end, cfg.bass_divisor),
        mid: normalized(mid_sum, mid_end - bass_end, cfg.mid_divisor),
        high: normalized(high_sum, len - mid_end, cfg.high_divisor),
        energy: normalized(total, len, cfg.energy_divisor),
    }
}

#[inline]
fn normalized(sum: u32, bins: usize, divisor: f32) -> f32 {
    if bins == 0 {
        return 0.0;
    }
    (sum as f32 / (bins as f32 * divisor)).clamp(0.0, 1.0)
}

pub struct FrequencyAnalyzer<G: SignalGraph> {
    graph: Option<G>,
    bins: Vec<u8>,
    config: AudioConfig,
    current: AudioEnergy,
}

impl<G: SignalGraph> FrequencyAnalyzer<G> {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            graph: None,
            bins: Vec::new(),
            config,
            current: AudioEnergy::SILENT,
        }
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Build and adopt a graph. A no-op while already connected; a failed
    /// build is logged and leaves the analyzer disconnected.
    pub fn connect<F>(&mut self, build: F)
    where
        F: FnOnce(&AudioConfig) -> Result<G, GraphError>,
    {
        if self.graph.is_some() {
            return;
        }
        match build(&self.config) {
            Ok(graph) => {
                log::info!("[audio] analyser connected");
                self.graph = Some(graph);
            }
            Err(e) => {
                log::warn!("[audio] could not connect analyser: {}", e);
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.graph.is_some()
    }

    /// Pull the latest spectrum. Zeroes every band when disconnected.
    pub fn update(&mut self) -> AudioEnergy {
        let Some(graph) = self.graph.as_mut() else {
            self.current = AudioEnergy::SILENT;
            return self.current;
        };
        if graph.is_suspended() {
            if let Err(e) = graph.resume() {
                log::debug!("[audio] resume deferred: {}", e);
            }
        }
        graph.frequency_data(&mut self.bins);
        self.current = band_energies(&self.bins, &self.config);
        self.current
    }

    pub fn energy(&self) -> AudioEnergy {
        self.current
    }

    /// Lift a suspended graph, typically from a user gesture. Failures are swallowed.
    pub fn resume(&self) {
        if let Some(graph) = &self.graph {
            if !graph.is_suspended() {
                return;
            }
            if let Err(e) = graph.resume() {
                log::debug!("[audio] resume deferred: {}", e);
            }
        }
    }

    /// Release the graph. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if let Some(mut graph) = self.graph.take() {
            graph.disconnect();
            log::info!("[audio] analyser released");
        }
        self.bins.clear();
        self.current = AudioEnergy::SILENT;
    }
}
