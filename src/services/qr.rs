//! Shelf QR code generation

use std::fs;
use std::path::Path;

use image::Luma;
use qrcode::QrCode;

use crate::{
    config::QrConfig,
    error::{AppError, AppResult},
};

/// Renders one PNG per shelf, encoding the public scan URL.
#[derive(Clone)]
pub struct QrService {
    config: QrConfig,
    public_base_url: String,
}

impl QrService {
    pub fn new(config: QrConfig, public_base_url: String) -> Self {
        Self {
            config,
            public_base_url,
        }
    }

    /// File name for a shelf's QR image
    pub fn file_name(shelf_id: i32) -> String {
        format!("shelf_{}_qr.png", shelf_id)
    }

    /// URL encoded into a shelf's QR image
    pub fn scan_url(&self, shelf_id: i32) -> String {
        format!(
            "{}/shelf/{}",
            self.public_base_url.trim_end_matches('/'),
            shelf_id
        )
    }

    /// Generate (or overwrite) the QR image for a shelf, returning its file name
    pub fn generate(&self, shelf_id: i32) -> AppResult<String> {
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create QR directory: {}", e)))?;

        let file_name = Self::file_name(shelf_id);
        let path = Path::new(&self.config.output_dir).join(&file_name);

        let url = self.scan_url(shelf_id);
        let code = QrCode::new(url.as_bytes())
            .map_err(|e| AppError::Internal(format!("Failed to encode QR code: {}", e)))?;
        let img = code.render::<Luma<u8>>().min_dimensions(320, 320).build();
        img.save(&path)
            .map_err(|e| AppError::Internal(format!("Failed to write QR image: {}", e)))?;

        Ok(file_name)
    }

    /// Remove a shelf's QR image if present
    pub fn remove(&self, shelf_id: i32) -> AppResult<()> {
        let path = Path::new(&self.config.output_dir).join(Self::file_name(shelf_id));
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| AppError::Internal(format!("Failed to remove QR image: {}", e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: &str, dir: &str) -> QrService {
        QrService::new(
            QrConfig {
                output_dir: dir.to_string(),
            },
            base_url.to_string(),
        )
    }

    #[test]
    fn file_names_are_deterministic() {
        assert_eq!(QrService::file_name(7), "shelf_7_qr.png");
        assert_eq!(QrService::file_name(7), QrService::file_name(7));
    }

    #[test]
    fn scan_url_points_at_the_shelf_route() {
        let qr = service("http://localhost:8080", "target/test_qr");
        assert_eq!(qr.scan_url(3), "http://localhost:8080/shelf/3");
    }

    #[test]
    fn scan_url_tolerates_a_trailing_slash() {
        let qr = service("https://library.example.org/", "target/test_qr");
        assert_eq!(qr.scan_url(12), "https://library.example.org/shelf/12");
    }

    #[test]
    fn generate_writes_a_png() {
        let qr = service("http://localhost:8080", "target/test_qr_codes");
        let name = qr.generate(42).unwrap();
        assert_eq!(name, "shelf_42_qr.png");

        let path = Path::new("target/test_qr_codes").join(&name);
        assert!(path.exists());
        qr.remove(42).unwrap();
        assert!(!path.exists());
    }
}
