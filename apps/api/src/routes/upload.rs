//! Multipart form reading shared by the resume upload endpoints.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// One uploaded file plus the plain text fields sent alongside it.
#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
    pub fields: HashMap<String, String>,
}

impl ResumeUpload {
    /// Extension taken from the client-supplied file name, without the dot.
    pub fn extension(&self) -> &str {
        file_extension(&self.file_name)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

pub fn file_extension(file_name: &str) -> &str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}

/// Reads every field; `file_field` must carry the document.
pub async fn read_upload(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == file_field {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;
            file = Some((file_name, data));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;
            fields.insert(name, value);
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    Ok(ResumeUpload {
        file_name,
        bytes,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_comes_from_file_name() {
        assert_eq!(file_extension("Jane_Doe.Resume.PDF"), "PDF");
        assert_eq!(file_extension("cv.docx"), "docx");
        assert_eq!(file_extension("resume"), "");
        assert_eq!(file_extension(""), "");
    }

    #[test]
    fn test_blank_fields_read_as_absent() {
        let upload = ResumeUpload {
            file_name: "cv.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF"),
            fields: HashMap::from([
                ("difficulty".to_string(), "  Hard ".to_string()),
                ("interviewType".to_string(), "   ".to_string()),
            ]),
        };
        assert_eq!(upload.field("difficulty"), Some("Hard"));
        assert_eq!(upload.field("interviewType"), None);
        assert_eq!(upload.field("numberOfQuestions"), None);
        assert_eq!(upload.extension(), "pdf");
    }
}
