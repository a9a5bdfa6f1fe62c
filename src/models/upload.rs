use std::path::Path;

use serde::{Deserialize, Serialize};

/// A file staged for `/upload`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Backend acknowledgement of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAck {
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Which drop zone a file was offered to; each accepts its own formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Clinical,
    Imaging,
    Genomics,
}

impl UploadCategory {
    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            UploadCategory::Clinical => &["pdf", "txt", "csv", "xls", "xlsx", "json"],
            UploadCategory::Imaging => &["dcm", "png", "jpg", "jpeg", "dicom"],
            UploadCategory::Genomics => &["vcf", "csv", "json"],
        }
    }

    pub fn accepts(self, file_name: &str) -> bool {
        extension_of(file_name)
            .map(|ext| self.accepted_extensions().contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("dcm") | Some("dicom") => "application/dicom",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("vcf") => "text/x-vcard",
        _ => "application/octet-stream",
    }
}
