//! Resolution of the images attached to the admin forms.
//!
//! An image can be provided in three ways. In priority order:
//!
//! 1. An external URL, hosted anywhere.
//! 2. The URL returned by the image upload service, which is already hosted.
//! 3. A file sent inline, encoded in base64, which is saved in the upload directory
//!    under a `<uniqid>.<ext>` name.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use serde::Deserialize;

use crate::error::{EsportsError, EsportsResult};

/// The extensions accepted for the uploaded files.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// The URL prefix under which the uploaded files are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// A file sent inline in a form.
#[derive(Deserialize, Debug, Clone)]
pub struct ImageFile {
    /// The original name of the file, used for its extension.
    pub file_name: String,
    /// The content of the file, in base64. A `data:` URL prefix is accepted.
    pub data_base64: String,
}

/// The image fields of an admin form.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ImageInput {
    /// An externally-hosted URL.
    pub image_url: Option<String>,
    /// The URL returned by the upload service.
    pub upload_url: Option<String>,
    /// A file to save locally.
    pub image_file: Option<ImageFile>,
}

/// The chosen source of an image.
#[derive(Debug, PartialEq)]
pub enum ImageSource<'a> {
    /// An externally-hosted URL.
    External(&'a str),
    /// A URL returned by the upload service.
    Uploaded(&'a str),
    /// A file to save locally.
    Local(&'a ImageFile),
    /// No image was provided.
    None,
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ImageInput {
    /// Returns the source of the image with the highest priority.
    pub fn source(&self) -> ImageSource<'_> {
        if let Some(url) = non_blank(&self.image_url) {
            ImageSource::External(url)
        } else if let Some(url) = non_blank(&self.upload_url) {
            ImageSource::Uploaded(url)
        } else if let Some(file) = &self.image_file {
            ImageSource::Local(file)
        } else {
            ImageSource::None
        }
    }

    /// Returns whether no image was provided.
    pub fn is_empty(&self) -> bool {
        matches!(self.source(), ImageSource::None)
    }
}

/// The local storage of the uploaded files.
#[derive(Debug, Clone)]
pub struct ImageStore {
    /// The directory of the files.
    pub dir: PathBuf,
    /// The maximum size of a file, in bytes.
    pub max_bytes: usize,
}

/// Returns a new unique file name, built from the current time, without extension.
///
/// The name is made of 8 hexadecimal digits for the seconds, and 5 for the microseconds.
pub fn uniqid() -> String {
    let now = chrono::Utc::now();
    format!(
        "{:08x}{:05x}",
        now.timestamp(),
        now.timestamp_subsec_micros()
    )
}

/// Returns the lowercased extension of the provided file name if it is allowed.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Returns whether the provided name could be the name of an uploaded file.
///
/// This is used before serving a file, to avoid leaving the upload directory.
pub fn is_upload_file_name(name: &str) -> bool {
    let Some((stem, _)) = name.split_once('.') else {
        return false;
    };
    !stem.is_empty()
        && stem.bytes().all(|b| b.is_ascii_hexdigit())
        && allowed_extension(name).is_some()
}

/// Returns the MIME type of an uploaded file from its name.
pub fn content_type(name: &str) -> &'static str {
    match allowed_extension(name).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn decode(data: &str) -> EsportsResult<Vec<u8>> {
    let data = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| EsportsError::InvalidImage(format!("bad base64 content: {e}")))
}

impl ImageStore {
    /// Saves the provided file in the upload directory, and returns its public URL.
    pub async fn save(&self, file: &ImageFile) -> EsportsResult<String> {
        let Some(ext) = allowed_extension(&file.file_name) else {
            return Err(EsportsError::InvalidImage(format!(
                "unsupported file type for `{}`, expected one of {}",
                file.file_name,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        };

        let bytes = decode(&file.data_base64)?;
        if bytes.is_empty() {
            return Err(EsportsError::InvalidImage("empty file".to_owned()));
        }
        if bytes.len() > self.max_bytes {
            return Err(EsportsError::InvalidImage(format!(
                "file too large ({} bytes, max {})",
                bytes.len(),
                self.max_bytes
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let name = format!("{}.{ext}", uniqid());
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        tracing::info!("Saved uploaded image {name}");

        Ok(format!("{UPLOADS_URL_PREFIX}/{name}"))
    }

    /// Resolves the image of a form into the URL to store, if any.
    pub async fn resolve(&self, input: &ImageInput) -> EsportsResult<Option<String>> {
        match input.source() {
            ImageSource::External(url) | ImageSource::Uploaded(url) => Ok(Some(url.to_owned())),
            ImageSource::Local(file) => self.save(file).await.map(Some),
            ImageSource::None => Ok(None),
        }
    }

    /// Returns the path of the uploaded file with the provided name, if the name is valid.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        is_upload_file_name(name).then(|| self.dir.join(name))
    }

    /// Removes the file saved for the provided form image when the write of its row failed.
    ///
    /// `url` is the URL returned by [`resolve`](Self::resolve) for this input. Only a file
    /// saved from an inline upload is removed, never one referenced by URL.
    pub async fn discard_on_err<T>(
        &self,
        input: &ImageInput,
        url: Option<&str>,
        res: EsportsResult<T>,
    ) -> EsportsResult<T> {
        if res.is_ok() || !matches!(input.source(), ImageSource::Local(_)) {
            return res;
        }

        let path = url
            .and_then(|url| url.strip_prefix(UPLOADS_URL_PREFIX))
            .and_then(|name| self.path_of(name.trim_start_matches('/')));
        if let Some(path) = path {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::info!("Removed unreferenced image {}", path.display()),
                Err(e) => tracing::warn!("Unable to remove image {}: {e}", path.display()),
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, data: &str) -> ImageFile {
        ImageFile {
            file_name: name.to_owned(),
            data_base64: data.to_owned(),
        }
    }

    fn store() -> ImageStore {
        ImageStore {
            dir: std::env::temp_dir().join(format!("esports_uploads_{}", crate::gen_random_str(8))),
            max_bytes: 16,
        }
    }

    #[test]
    fn external_url_has_priority() {
        let input = ImageInput {
            image_url: Some("https://cdn.example.org/a.png".to_owned()),
            upload_url: Some("https://upload.example.org/b.png".to_owned()),
            image_file: Some(file("c.png", "AAAA")),
        };
        assert_eq!(
            input.source(),
            ImageSource::External("https://cdn.example.org/a.png")
        );
    }

    #[test]
    fn blank_urls_are_skipped() {
        let input = ImageInput {
            image_url: Some("  ".to_owned()),
            upload_url: Some("https://upload.example.org/b.png".to_owned()),
            image_file: None,
        };
        assert_eq!(
            input.source(),
            ImageSource::Uploaded("https://upload.example.org/b.png")
        );

        let input = ImageInput {
            image_url: None,
            upload_url: Some(String::new()),
            image_file: Some(file("c.png", "AAAA")),
        };
        assert!(matches!(input.source(), ImageSource::Local(_)));
        assert!(ImageInput::default().is_empty());
    }

    #[test]
    fn uniqid_format() {
        let id = uniqid();
        assert_eq!(id.len(), 13);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn extensions() {
        assert_eq!(allowed_extension("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("logo.webp").as_deref(), Some("webp"));
        assert_eq!(allowed_extension("script.php"), None);
        assert_eq!(allowed_extension("noext"), None);
    }

    #[test]
    fn upload_file_names() {
        assert!(is_upload_file_name("65f1a2b3c4d5e.png"));
        assert!(!is_upload_file_name("../secret.png"));
        assert!(!is_upload_file_name(".png"));
        assert!(!is_upload_file_name("65f1a2b3c4d5e.exe"));
        assert_eq!(content_type("65f1a2b3c4d5e.jpeg"), "image/jpeg");
    }

    #[tokio::test]
    async fn saves_local_file() -> anyhow::Result<()> {
        let store = store();
        // "hello" in base64
        let url = store
            .resolve(&ImageInput {
                image_file: Some(file("hello.png", "data:image/png;base64,aGVsbG8=")),
                ..Default::default()
            })
            .await?
            .expect("an image url");

        let name = url
            .strip_prefix("/uploads/")
            .expect("url under the uploads prefix");
        assert!(is_upload_file_name(name));
        let content = tokio::fs::read(store.dir.join(name)).await?;
        assert_eq!(content, b"hello");

        tokio::fs::remove_dir_all(&store.dir).await?;
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_removes_saved_file() -> anyhow::Result<()> {
        let store = store();
        let input = ImageInput {
            image_file: Some(file("hello.png", "aGVsbG8=")),
            ..Default::default()
        };

        let kept = store.resolve(&input).await?;
        let res = store
            .discard_on_err(&input, kept.as_deref(), Ok::<_, EsportsError>(()))
            .await;
        assert!(res.is_ok());
        let kept_name = kept.as_deref().and_then(|u| u.strip_prefix("/uploads/"));
        assert!(store.dir.join(kept_name.unwrap()).exists());

        let removed = store.resolve(&input).await?;
        let res = store
            .discard_on_err(
                &input,
                removed.as_deref(),
                Err::<(), _>(EsportsError::NotFound { kind: "game", id: 1 }),
            )
            .await;
        assert!(matches!(res, Err(EsportsError::NotFound { kind: "game", id: 1 })));
        let removed_name = removed.as_deref().and_then(|u| u.strip_prefix("/uploads/"));
        assert!(!store.dir.join(removed_name.unwrap()).exists());

        // A file referenced by URL belongs to another row
        let by_url = ImageInput {
            image_url: kept.clone(),
            ..Default::default()
        };
        let _ = store
            .discard_on_err(
                &by_url,
                kept.as_deref(),
                Err::<(), _>(EsportsError::NotFound { kind: "game", id: 1 }),
            )
            .await;
        assert!(store.dir.join(kept_name.unwrap()).exists());

        tokio::fs::remove_dir_all(&store.dir).await?;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_bad_files() {
        let store = store();
        let too_large = base64::engine::general_purpose::STANDARD.encode([0u8; 32]);
        assert!(matches!(
            store.save(&file("big.png", &too_large)).await,
            Err(EsportsError::InvalidImage(_))
        ));
        assert!(matches!(
            store.save(&file("run.sh", "aGVsbG8=")).await,
            Err(EsportsError::InvalidImage(_))
        ));
        assert!(matches!(
            store.save(&file("a.png", "not base64!")).await,
            Err(EsportsError::InvalidImage(_))
        ));
    }
}
