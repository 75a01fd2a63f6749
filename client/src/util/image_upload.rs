//! Image upload: browser `File` → `UploadedImage`.
//!
//! The file is read as a data URL with `gloo-file`, then parsed by
//! `UploadedImage::from_data_url`, which rejects anything that is not
//! `image/*`. The MIME type is checked before reading so a large
//! non-image file is never loaded into memory.

#[cfg(test)]
#[path = "image_upload_test.rs"]
mod image_upload_test;

use mapkit::ImageError;
#[cfg(feature = "hydrate")]
use mapkit::UploadedImage;

/// Message shown when the chosen file cannot be used.
#[must_use]
pub fn upload_error_message(err: &ImageError) -> String {
    match err {
        ImageError::UnsupportedType(mime) if mime.is_empty() => "Please choose an image file.".to_owned(),
        ImageError::UnsupportedType(mime) => format!("Unsupported file type: {mime}. Please choose an image."),
        ImageError::Empty => "The selected image is empty.".to_owned(),
        ImageError::NotDataUrl | ImageError::InvalidBase64 => "The selected image could not be read.".to_owned(),
    }
}

/// Check the browser-reported MIME type before reading the file.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedType`] for non-image types.
pub fn check_mime(mime_type: &str) -> Result<(), ImageError> {
    if mapkit::types::is_supported_mime(mime_type) {
        Ok(())
    } else {
        Err(ImageError::UnsupportedType(mime_type.to_owned()))
    }
}

/// Read a browser file into an [`UploadedImage`].
///
/// # Errors
///
/// Returns a user-facing message if the file is not an image or cannot be read.
#[cfg(feature = "hydrate")]
pub async fn read_image(file: web_sys::File) -> Result<UploadedImage, String> {
    let file = gloo_file::File::from(file);
    check_mime(&file.raw_mime_type()).map_err(|e| upload_error_message(&e))?;
    let data_url = gloo_file::futures::read_as_data_url(&file)
        .await
        .map_err(|e| {
            log::warn!("image upload: read failed: {e}");
            upload_error_message(&ImageError::NotDataUrl)
        })?;
    UploadedImage::from_data_url(&data_url).map_err(|e| upload_error_message(&e))
}
