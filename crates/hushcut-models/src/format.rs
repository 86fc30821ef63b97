//! Output container/codec formats.

use serde::{Deserialize, Serialize};

/// Supported output formats.
///
/// Unrecognized names fall back to [`OutputFormat::Mp3`] rather than
/// erroring, so stale clients keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp3,
    Wav,
    M4a,
    Ogg,
    Flac,
}

/// Input extensions the service accepts for upload.
pub const ALLOWED_INPUT_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "m4a", "aac", "ogg", "oga", "opus", "flac", "wma", "aiff", "aif",
];

impl OutputFormat {
    /// Parse a format name, falling back to the default for unknown values.
    pub fn parse_or_default(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mp3" => Self::Mp3,
            "wav" => Self::Wav,
            "m4a" | "mp4" | "aac" => Self::M4a,
            "ogg" | "oga" => Self::Ogg,
            "flac" => Self::Flac,
            _ => Self::default(),
        }
    }

    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
        }
    }

    /// MIME type for HTTP responses.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::M4a => "audio/mp4",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
        }
    }

    /// FFmpeg audio codec name.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Wav => "pcm_s16le",
            Self::M4a => "aac",
            Self::Ogg => "libvorbis",
            Self::Flac => "flac",
        }
    }

    /// FFmpeg container name.
    pub fn ffmpeg_container(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::M4a => "ipod",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
        }
    }

    /// Whether the bitrate ladder applies. Lossless formats take a
    /// single encode because bitrate is meaningless for them.
    pub fn is_lossy(&self) -> bool {
        matches!(self, Self::Mp3 | Self::M4a | Self::Ogg)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Check whether an uploaded filename carries an allowed audio extension.
pub fn is_allowed_input(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_INPUT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Strip the extension off an uploaded filename for `_processed` naming.
pub fn file_stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_formats() {
        assert_eq!(OutputFormat::parse_or_default("mp3"), OutputFormat::Mp3);
        assert_eq!(OutputFormat::parse_or_default("WAV"), OutputFormat::Wav);
        assert_eq!(OutputFormat::parse_or_default(" flac "), OutputFormat::Flac);
    }

    #[test]
    fn test_unknown_falls_back_to_mp3() {
        assert_eq!(OutputFormat::parse_or_default("webm"), OutputFormat::Mp3);
        assert_eq!(OutputFormat::parse_or_default(""), OutputFormat::Mp3);
    }

    #[test]
    fn test_lossy_classification() {
        assert!(OutputFormat::Mp3.is_lossy());
        assert!(OutputFormat::Ogg.is_lossy());
        assert!(!OutputFormat::Wav.is_lossy());
        assert!(!OutputFormat::Flac.is_lossy());
    }

    #[test]
    fn test_allowed_input() {
        assert!(is_allowed_input("talk.WAV"));
        assert!(is_allowed_input("a.b.mp3"));
        assert!(!is_allowed_input("clip.mkv"));
        assert!(!is_allowed_input("noextension"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("talk.wav"), "talk");
        assert_eq!(file_stem("a.b.mp3"), "a.b");
        assert_eq!(file_stem("noext"), "noext");
    }
}
