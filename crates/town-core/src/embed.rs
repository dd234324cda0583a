use crate::Embedder;

/// Embedder that derives a fixed-size vector from a hash of the text.
///
/// Identical text always yields identical vectors, which makes relevance
/// scores reproducible without a model. Not a semantic embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut state = fnv1a(text);
        (0..self.dim)
            .map(|_| {
                state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
                // top 24 bits -> [-1, 1)
                let unit = (finalize(state) >> 40) as f32 / (1u32 << 24) as f32;
                unit * 2.0 - 1.0
            })
            .collect()
    }
}

fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xCBF2_9CE4_8422_2325, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01B3)
    })
}

/// SplitMix64 output mix.
fn finalize(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
