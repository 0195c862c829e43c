use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use arboard::{Clipboard, ImageData};
use chrono::NaiveDate;
use image::{ImageFormat, RgbaImage};
use log::info;
use reqwest::Url;
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;

use crate::error::{EditorError, EditorResult};

/// File name used when saving an edited screenshot on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("screenshot-{}.png", date.format("%Y-%m-%d"))
}

pub fn encode_png(image: &RgbaImage) -> EditorResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Write the image as a date-stamped PNG into `dir`, returning the path.
/// An existing file of the same name is overwritten.
pub fn save_png(image: &RgbaImage, dir: &Path) -> EditorResult<PathBuf> {
    let path = dir.join(export_file_name(chrono::Local::now().date_naive()));
    std::fs::write(&path, encode_png(image)?)?;
    info!(
        "Saved {}x{} screenshot to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(path)
}

pub fn copy_to_clipboard(image: &RgbaImage) -> EditorResult<()> {
    let mut clipboard = Clipboard::new().map_err(|e| EditorError::Clipboard(e.to_string()))?;
    clipboard
        .set_image(ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        })
        .map_err(|e| EditorError::Clipboard(e.to_string()))?;
    info!("Copied {}x{} screenshot to clipboard", image.width(), image.height());
    Ok(())
}

/// JSON reply of the upload endpoint
#[derive(Debug, Deserialize)]
pub struct UploadReply {
    pub success: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Link to an uploaded file: the endpoint's last path segment is replaced
/// by the stored file name, so `http://host/app/upload.php` and `a.png`
/// give `http://host/app/a.png`.
pub fn share_link(endpoint: &str, reply: &UploadReply) -> EditorResult<String> {
    if !reply.success {
        let reason = reply.message.as_deref().unwrap_or("upload rejected");
        return Err(EditorError::Share(reason.to_owned()));
    }
    let filename = reply
        .filename
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| EditorError::Share("reply has no file name".to_owned()))?;
    let base = Url::parse(endpoint).map_err(|e| EditorError::Share(e.to_string()))?;
    let link = base
        .join(filename)
        .map_err(|e| EditorError::Share(e.to_string()))?;
    Ok(link.to_string())
}

/// POST the image to `endpoint`, then copy the resulting share link to the
/// clipboard. Blocks until the server answers.
pub fn share_png(image: &RgbaImage, endpoint: &str) -> EditorResult<String> {
    let name = format!("screenshot_{}.png", chrono::Utc::now().timestamp_millis());
    let part = multipart::Part::bytes(encode_png(image)?)
        .file_name(name)
        .mime_str("image/png")?;
    let form = multipart::Form::new().part("image", part);

    let response = Client::new().post(endpoint).multipart(form).send()?;
    if !response.status().is_success() {
        return Err(EditorError::Share(format!(
            "upload failed with status {}",
            response.status()
        )));
    }
    let reply: UploadReply = response.json()?;
    let link = share_link(endpoint, &reply)?;

    let mut clipboard = Clipboard::new().map_err(|e| EditorError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(link.clone())
        .map_err(|e| EditorError::Clipboard(e.to_string()))?;
    info!("Shared screenshot at {link}");
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_date_stamped() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "screenshot-2024-03-07.png");
    }

    #[test]
    fn share_link_replaces_endpoint_script() {
        let reply: UploadReply =
            serde_json::from_str(r#"{"success": true, "filename": "shot_1.png"}"#).unwrap();
        let link = share_link("http://192.168.1.143/RCV/upload.php", &reply).unwrap();
        assert_eq!(link, "http://192.168.1.143/RCV/shot_1.png");
    }

    #[test]
    fn rejected_upload_reports_server_message() {
        let reply: UploadReply =
            serde_json::from_str(r#"{"success": false, "message": "too large"}"#).unwrap();
        let err = share_link("http://example.com/upload", &reply).unwrap_err();
        assert!(matches!(err, EditorError::Share(ref m) if m == "too large"));

        let reply: UploadReply = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(share_link("http://example.com/upload", &reply).is_err());
    }

    #[test]
    fn png_round_trips_pixels() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let bytes = encode_png(&image).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }
}
