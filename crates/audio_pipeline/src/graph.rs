//! FFmpeg filter graph construction
//!
//! A merge of N inputs becomes a single `-filter_complex` expression: the
//! audio stream of every input feeds one `concat` node, and the joined
//! stream optionally passes through `loudnorm` before reaching the labeled
//! output pad that `-map` picks up.

use std::fmt::Write as _;

/// A rendered `-filter_complex` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    spec: String,
}

impl FilterGraph {
    /// Label of the graph's output pad, for `-map`
    pub const OUTPUT_LABEL: &'static str = "[merged]";

    /// Build the filter graph for `input_count` audio inputs
    ///
    /// With `normalize` the joined stream runs through `loudnorm`:
    ///
    /// ```text
    /// [0:a][1:a]concat=n=2:v=0:a=1[joined];[joined]loudnorm[merged]
    /// ```
    ///
    /// Without it the concat node feeds the output pad directly.
    #[must_use]
    pub fn build(input_count: usize, normalize: bool) -> Self {
        let mut spec = String::new();
        for i in 0..input_count {
            // Infallible for String, but write! keeps the formatting terse.
            let _ = write!(spec, "[{i}:a]");
        }
        let _ = write!(spec, "concat=n={input_count}:v=0:a=1");

        if normalize {
            spec.push_str("[joined];[joined]loudnorm");
        }
        spec.push_str(Self::OUTPUT_LABEL);

        Self { spec }
    }

    /// The rendered filter expression
    #[must_use]
    pub fn spec(&self) -> &str {
        &self.spec
    }
}
