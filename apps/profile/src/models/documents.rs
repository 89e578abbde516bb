use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where the backend stored an uploaded resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    Pdf,
    Docx,
}

impl DownloadFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "application/pdf",
            DownloadFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl std::str::FromStr for DownloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(DownloadFormat::Pdf),
            "docx" => Ok(DownloadFormat::Docx),
            other => Err(format!("Unsupported format: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_file_name() -> String {
    "document".to_string()
}

fn default_format() -> String {
    "pdf".to_string()
}

/// A document ready to be saved by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// True when the backend could not render the document and the raw text was used.
    pub fallback: bool,
}

impl DownloadedFile {
    pub fn plain_text(base_name: &str, content: &str) -> Self {
        Self {
            file_name: format!("{base_name}.txt"),
            content_type: "text/plain".to_string(),
            bytes: content.as_bytes().to_vec(),
            fallback: true,
        }
    }

    /// Writes the file into `dir` and returns its full path.
    ///
    /// Only the final component of `file_name` is used, so the file always lands in `dir`.
    pub async fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let name = Path::new(&self.file_name)
            .file_name()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("invalid file name: {:?}", self.file_name),
                )
            })?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}
