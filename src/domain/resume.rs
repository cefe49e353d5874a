//! Uploaded resume files.
//!
//! One resume is kept per account. Only document formats are accepted and
//! the file name is reduced to its last path component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FieldIssue;

/// Largest accepted resume (5MB).
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Accepted content types with the extension each is known by.
pub const RESUME_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
];

/// What the API and the export show for a stored resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeInfo {
    pub filename: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Resume {
    pub info: ResumeInfo,
    pub data: Vec<u8>,
}

impl Resume {
    /// Validate an upload.
    ///
    /// A missing or generic content type is resolved from the file extension.
    pub fn new(filename: Option<&str>, content_type: Option<&str>, data: Vec<u8>) -> Result<Self, Vec<FieldIssue>> {
        let filename = clean_filename(filename.unwrap_or_default());
        let mut issues = Vec::new();

        let content_type = match content_type.filter(|t| !t.is_empty() && *t != "application/octet-stream") {
            Some(given) => RESUME_TYPES.iter().find(|(known, _)| *known == given),
            None => extension(&filename).and_then(|ext| RESUME_TYPES.iter().find(|(_, known)| *known == ext)),
        }
        .map(|(known, _)| (*known).to_string());
        if content_type.is_none() {
            issues.push(FieldIssue::new("resume", "must be a PDF or Word document"));
        }
        if data.is_empty() {
            issues.push(FieldIssue::new("resume", "file is empty"));
        }
        if data.len() > MAX_RESUME_BYTES {
            issues.push(FieldIssue::new(
                "resume",
                format!("file exceeds {}MB", MAX_RESUME_BYTES / (1024 * 1024)),
            ));
        }

        match content_type {
            Some(content_type) if issues.is_empty() => Ok(Self {
                info: ResumeInfo {
                    filename,
                    content_type,
                    size_bytes: data.len(),
                    uploaded_at: Utc::now(),
                },
                data,
            }),
            _ => Err(issues),
        }
    }
}

fn clean_filename(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let name: String = name.chars().filter(|c| !c.is_control() && *c != '"').collect();
    if name.is_empty() { "resume".to_string() } else { name }
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pdf_and_keeps_the_base_name() {
        let resume = Resume::new(Some("C:\\docs\\Asha Rao.pdf"), Some("application/pdf"), b"%PDF-1.7".to_vec())
            .expect("valid resume");
        assert_eq!(resume.info.filename, "Asha Rao.pdf");
        assert_eq!(resume.info.size_bytes, 8);
    }

    #[test]
    fn generic_type_falls_back_to_extension() {
        let resume = Resume::new(Some("cv.DOCX"), Some("application/octet-stream"), vec![1, 2, 3])
            .expect("valid resume");
        assert_eq!(resume.info.content_type, RESUME_TYPES[2].0);

        assert!(Resume::new(Some("cv.exe"), None, vec![1]).is_err());
    }

    #[test]
    fn rejects_images_empty_and_oversized_files() {
        let issues = Resume::new(Some("me.png"), Some("image/png"), vec![1]).unwrap_err();
        assert_eq!(issues[0].message, "must be a PDF or Word document");

        let issues = Resume::new(Some("cv.pdf"), Some("application/pdf"), Vec::new()).unwrap_err();
        assert_eq!(issues[0].message, "file is empty");

        let issues = Resume::new(Some("cv.pdf"), Some("application/pdf"), vec![0; MAX_RESUME_BYTES + 1]).unwrap_err();
        assert_eq!(issues[0].message, "file exceeds 5MB");
    }

    #[test]
    fn missing_name_gets_a_default() {
        let resume = Resume::new(None, Some("application/pdf"), vec![1]).expect("valid resume");
        assert_eq!(resume.info.filename, "resume");
    }
}
