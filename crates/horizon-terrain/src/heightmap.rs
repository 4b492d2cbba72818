//! Fractal Brownian motion over simplex noise, normalized to `[0, 1]`.

use noise::{NoiseFn, Simplex};

/// Octave settings for [`HeightmapSampler`].
#[derive(Clone, Debug)]
pub struct HeightmapParams {
    /// Noise seed.
    pub seed: u32,
    /// Number of octaves composited per sample.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency of the broadest octave, in cycles per world unit.
    pub base_frequency: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.012,
        }
    }
}

/// Samples multi-octave simplex noise on the X/Z plane.
pub struct HeightmapSampler {
    noise: Simplex,
    params: HeightmapParams,
    max_amplitude: f64,
}

impl HeightmapSampler {
    /// Create a new sampler with the given parameters.
    pub fn new(params: HeightmapParams) -> Self {
        let noise = Simplex::new(params.seed);
        let mut max_amplitude = 0.0;
        let mut amp = 1.0;
        for _ in 0..params.octaves {
            max_amplitude += amp;
            amp *= params.persistence;
        }
        Self {
            noise,
            params,
            max_amplitude,
        }
    }

    /// Raw fBm value in `[-max_amplitude, max_amplitude]`.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, z * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// fBm value remapped to `[0, 1]`.
    pub fn sample_normalized(&self, x: f64, z: f64) -> f64 {
        if self.max_amplitude <= 0.0 {
            return 0.0;
        }
        (self.sample(x, z) / self.max_amplitude * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Geometric sum of all octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }
}
