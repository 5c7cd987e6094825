//! Output encoding profiles

/// How the merged output is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingProfile {
    /// libmp3lame at 320 kbps constant bitrate, 48 kHz, with the encoder's
    /// highest-quality VBR setting for the psychoacoustic model
    #[default]
    HighQualityMp3,
    /// No explicit codec arguments; the output container picks its defaults
    ContainerDefault,
}

impl EncodingProfile {
    /// Encoder arguments to append to the ffmpeg command line
    #[must_use]
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::HighQualityMp3 => &[
                "-codec:a",
                "libmp3lame",
                "-b:a",
                "320k",
                "-ar",
                "48000",
                "-q:a",
                "0",
            ],
            Self::ContainerDefault => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_quality_pins_codec_bitrate_and_sample_rate() {
        let args = EncodingProfile::HighQualityMp3.args();
        assert_eq!(
            args,
            &["-codec:a", "libmp3lame", "-b:a", "320k", "-ar", "48000", "-q:a", "0"]
        );
    }

    #[test]
    fn container_default_adds_nothing() {
        assert!(EncodingProfile::ContainerDefault.args().is_empty());
    }
}
