//! Stable speaker labels across windows
//!
//! Every window labels its speakers independently, so the same person
//! gets an arbitrary label in each window. The registry keeps one
//! representative embedding per stable global label and matches incoming
//! window-local speakers against them by cosine similarity. It grows
//! monotonically; a label is never relabeled or removed once assigned.

/// Strategy for minting new global speaker labels
pub trait LabelStrategy {
    /// Label for the n-th minted speaker (0-based)
    fn label(&self, index: usize) -> String;
}

/// Letter labels: A..Z, then AA, AB, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphabeticLabels;

impl LabelStrategy for AlphabeticLabels {
    fn label(&self, index: usize) -> String {
        let mut n = index + 1;
        let mut letters = Vec::new();
        while n > 0 {
            n -= 1;
            letters.push((b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        letters.iter().rev().collect()
    }
}

/// Mapping from stable global speaker labels to representative embeddings
#[derive(Debug, Clone)]
pub struct SpeakerRegistry<S: LabelStrategy = AlphabeticLabels> {
    entries: Vec<(String, Vec<f32>)>,
    labels: S,
    minted: usize,
}

impl SpeakerRegistry<AlphabeticLabels> {
    /// Create an empty registry with alphabetic labels
    pub fn new() -> Self {
        Self::with_labels(AlphabeticLabels)
    }
}

impl Default for SpeakerRegistry<AlphabeticLabels> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LabelStrategy> SpeakerRegistry<S> {
    /// Create an empty registry with a custom label strategy
    pub fn with_labels(labels: S) -> Self {
        Self {
            entries: Vec::new(),
            labels,
            minted: 0,
        }
    }

    /// Register an embedding under a caller-chosen label.
    ///
    /// Used to adopt the first window's local labels verbatim as the
    /// first stable global labels. A label already present is left
    /// untouched.
    pub fn seed(&mut self, label: &str, embedding: Vec<f32>) {
        if !self.contains(label) {
            self.entries.push((label.to_string(), embedding));
        }
    }

    /// Match an embedding against the registry, minting a new label if
    /// nothing scores above `threshold`.
    ///
    /// Greedy best-match: the running best above-threshold score wins,
    /// ties favoring the earlier-discovered speaker.
    pub fn resolve(&mut self, embedding: &[f32], threshold: f32) -> String {
        let mut best: Option<(usize, f32)> = None;
        for (idx, (_, existing)) in self.entries.iter().enumerate() {
            let similarity = cosine_similarity(embedding, existing);
            if similarity > threshold {
                match best {
                    Some((_, best_sim)) if similarity <= best_sim => {}
                    _ => best = Some((idx, similarity)),
                }
            }
        }

        if let Some((idx, _)) = best {
            return self.entries[idx].0.clone();
        }

        self.mint(embedding.to_vec())
    }

    /// Mint the next unused label and register the embedding under it
    fn mint(&mut self, embedding: Vec<f32>) -> String {
        // Seeded labels may already occupy symbols from the alphabet
        loop {
            let label = self.labels.label(self.minted);
            self.minted += 1;
            if !self.contains(&label) {
                self.entries.push((label.clone(), embedding));
                return label;
            }
        }
    }

    /// Whether a label is registered
    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    /// Registered labels, in discovery order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Number of registered speakers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no speaker has been registered yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity between two embedding vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_alphabetic_labels_extend_past_z() {
        let labels = AlphabeticLabels;
        assert_eq!(labels.label(0), "A");
        assert_eq!(labels.label(25), "Z");
        assert_eq!(labels.label(26), "AA");
        assert_eq!(labels.label(27), "AB");
        assert_eq!(labels.label(52), "BA");
    }

    #[test]
    fn test_resolve_matches_similar_embedding() {
        let mut registry = SpeakerRegistry::new();
        registry.seed("A", vec![1.0, 0.0]);

        let label = registry.resolve(&[0.9, 0.1], 0.5);
        assert_eq!(label, "A");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_mints_for_dissimilar_embedding() {
        let mut registry = SpeakerRegistry::new();
        registry.seed("A", vec![1.0, 0.0]);

        let label = registry.resolve(&[0.0, 1.0], 0.5);
        assert_eq!(label, "B");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_mint_skips_seeded_labels() {
        let mut registry = SpeakerRegistry::new();
        registry.seed("A", vec![1.0, 0.0, 0.0]);
        registry.seed("B", vec![0.0, 1.0, 0.0]);

        let label = registry.resolve(&[0.0, 0.0, 1.0], 0.5);
        assert_eq!(label, "C");
    }

    #[test]
    fn test_resolve_keeps_running_best_match() {
        let mut registry = SpeakerRegistry::new();
        registry.seed("A", vec![0.8, 0.6]);
        registry.seed("B", vec![1.0, 0.0]);

        // Both exceed the threshold; B scores higher and must win
        let label = registry.resolve(&[1.0, 0.0], 0.5);
        assert_eq!(label, "B");
    }
}
