use std::path::Path;

/// Audio container formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
    Mpeg,
    Webm,
}

impl AudioFormat {
    /// Recognize a format from a declared MIME type (parameters are ignored)
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/mp3" => Some(Self::Mp3),
            "audio/mpeg" => Some(Self::Mpeg),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some(Self::M4a),
            "audio/webm" | "video/webm" => Some(Self::Webm),
            _ => None,
        }
    }

    /// Recognize a format from a file name's extension
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            "mpeg" => Some(Self::Mpeg),
            "webm" => Some(Self::Webm),
            _ => None,
        }
    }

    /// Detect from the MIME type first, then the file name
    pub fn detect(mime: Option<&str>, filename: Option<&str>) -> Option<Self> {
        mime.and_then(Self::from_mime)
            .or_else(|| filename.and_then(Self::from_filename))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Mpeg => "mpeg",
            Self::Webm => "webm",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 | Self::Mpeg => "audio/mpeg",
            Self::M4a => "audio/mp4",
            Self::Webm => "audio/webm",
        }
    }
}
