use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub uploads: Uploads,
}

/// Contains parameters for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// The address the server binds to (e.g., "0.0.0.0").
    pub host: String,
    /// The port the server listens on.
    pub port: u16,
}

/// Contains parameters for garment image uploads.
#[derive(Debug, Clone, Deserialize)]
pub struct Uploads {
    /// The largest accepted image, in bytes.
    pub max_image_bytes: usize,
    /// How many images a single order may carry.
    pub max_images_per_order: usize,
    /// The MIME types the upload endpoint accepts.
    pub allowed_mime_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: Server {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            uploads: Uploads {
                max_image_bytes: 5 * 1024 * 1024,
                max_images_per_order: 5,
                allowed_mime_types: vec![
                    "image/jpeg".to_string(),
                    "image/png".to_string(),
                    "image/webp".to_string(),
                    "image/gif".to_string(),
                ],
            },
        }
    }
}
