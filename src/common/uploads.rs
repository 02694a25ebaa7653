// Multipart form parsing and uploaded file helpers

use axum::extract::Multipart;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;

use super::{generate_raw_id, ApiError, ValidationResult};

/// Largest accepted single image (10 MiB)
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// A file part received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: &str, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            data,
        }
    }

    /// Extension of the original file name, falling back to the sniffed type
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_lowercase())
            .or_else(|| infer::get(&self.data).map(|t| t.extension().to_string()))
            .unwrap_or_else(|| "bin".to_string())
    }

    /// True when the bytes carry a known image signature
    pub fn is_image(&self) -> bool {
        infer::get(&self.data)
            .map(|t| t.mime_type().starts_with("image/"))
            .unwrap_or(false)
    }

    /// MIME type sniffed from the bytes, else the one the client declared
    pub fn mime_type(&self) -> String {
        infer::get(&self.data)
            .map(|t| t.mime_type().to_string())
            .unwrap_or_else(|| self.content_type.clone())
    }
}

/// Records an error unless `file` is an image within the size limit
pub fn check_image(result: &mut ValidationResult, field: &str, file: &UploadedFile) {
    if !file.is_image() {
        result.add_error(
            field,
            &format!("{} is not a supported image", file.file_name),
        );
    } else if file.data.len() > MAX_IMAGE_BYTES {
        result.add_error(field, &format!("{} exceeds the 10 MB limit", file.file_name));
    }
}

/// Checks that between `min` and `max` image files were supplied
pub fn check_images(
    result: &mut ValidationResult,
    field: &str,
    files: &[UploadedFile],
    min: usize,
    max: usize,
) {
    if files.len() < min {
        let message = if min == 1 {
            "At least one image is required".to_string()
        } else {
            format!("At least {} images are required", min)
        };
        result.add_error(field, &message);
    } else if files.len() > max {
        result.add_error(field, &format!("At most {} images are allowed", max));
    }
    for file in files {
        check_image(result, field, file);
    }
}

/// Builds a collision-resistant object key below `prefix`:
/// `<prefix>/<unix-millis>-<random>.<ext>`
pub fn object_key(prefix: &str, file: &UploadedFile) -> String {
    format!(
        "{}/{}-{}.{}",
        prefix.trim_end_matches('/'),
        Utc::now().timestamp_millis(),
        generate_raw_id(10).to_lowercase(),
        file.extension()
    )
}

/// Text fields and file parts of a multipart request, grouped by field name
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl MultipartForm {
    pub async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }

            match field.file_name().map(|s| s.to_string()) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let data = field.bytes().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read file {}: {}", name, e))
                    })?;
                    // Browsers send an empty part for an untouched file input
                    if data.is_empty() {
                        continue;
                    }
                    form.files.entry(name).or_default().push(UploadedFile {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    });
                }
                None => {
                    let value = field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read {}: {}", name, e))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Text value of a field, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        self.files.remove(name).unwrap_or_default()
    }

    /// First file of a single-file input
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.take_files(name).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_extension_preserved_from_file_name() {
        let file = UploadedFile::new("Receipt.JPG", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(file.extension(), "jpg");
    }

    #[test]
    fn test_extension_falls_back_to_sniffed_type() {
        let file = UploadedFile::new("blob", "application/octet-stream", PNG_HEADER.to_vec());
        assert_eq!(file.extension(), "png");
        assert!(file.is_image());
        assert_eq!(file.mime_type(), "image/png");
    }

    #[test]
    fn test_non_image_detected() {
        let file = UploadedFile::new("notes.txt", "text/plain", b"hello world".to_vec());
        assert!(!file.is_image());
        assert_eq!(file.extension(), "txt");
    }

    #[test]
    fn test_check_images_counts_and_types() {
        let png = UploadedFile::new("a.png", "image/png", PNG_HEADER.to_vec());
        let txt = UploadedFile::new("a.txt", "text/plain", b"hello".to_vec());

        let mut result = ValidationResult::new();
        check_images(&mut result, "item_images", &[], 1, 3);
        assert!(result.has_error("item_images"));

        let mut result = ValidationResult::new();
        check_images(&mut result, "item_images", &vec![png.clone(); 4], 1, 3);
        assert!(result.has_error("item_images"));

        let mut result = ValidationResult::new();
        check_images(&mut result, "item_images", &[png.clone(), txt], 1, 3);
        assert_eq!(result.errors.len(), 1);

        let mut result = ValidationResult::new();
        check_images(&mut result, "item_images", &[png], 1, 3);
        assert!(result.is_valid);
    }

    #[test]
    fn test_object_key_layout() {
        let file = UploadedFile::new("phone.png", "image/png", PNG_HEADER.to_vec());
        let key = object_key("claims/items", &file);
        assert!(key.starts_with("claims/items/"));
        assert!(key.ends_with(".png"));

        let name = key.trim_start_matches("claims/items/");
        let (millis, rest) = name.split_once('-').expect("timestamp separator");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest.len(), "xxxxxxxxxx.png".len());
    }

    #[test]
    fn test_object_keys_do_not_collide() {
        let file = UploadedFile::new("a.png", "image/png", PNG_HEADER.to_vec());
        let first = object_key("claims/items", &file);
        let second = object_key("claims/items", &file);
        assert_ne!(first, second);
    }
}
