// saves the last rendered city frame as a png file

use bevy::prelude::*;
use image::RgbaImage;
use std::path::Path;

use crate::error::CityError;
use crate::systems::city::canvas::CanvasFrame;

// export event
#[derive(Event)]
pub struct ExportEvent {
    pub filename: String,
}

// encoding is left to the image crate, png picked from the extension
pub fn export_png(frame: &RgbaImage, path: &Path) -> Result<(), CityError> {
    frame.save(path).map_err(|source| CityError::ExportFailed {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Exported {}x{} frame to {}", frame.width(), frame.height(), path.display());

    Ok(())
}

// handle export events
pub fn handle_export(
    mut events: EventReader<ExportEvent>,
    frame: Res<CanvasFrame>,
) {
    for event in events.read() {
        let Some(image) = &frame.image else {
            warn!("Nothing rendered yet, skipping export of {}", event.filename);
            continue;
        };

        // city state is unaffected either way
        if let Err(e) = export_png(image, Path::new(&event.filename)) {
            error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_export_writes_png() {
        let mut frame = RgbaImage::new(8, 4);
        frame.put_pixel(2, 1, Rgba([200, 100, 50, 255]));

        let path = std::env::temp_dir().join(format!("city_export_test_{}.png", std::process::id()));
        export_png(&frame, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_failure_is_reported() {
        let frame = RgbaImage::new(2, 2);
        let path = std::env::temp_dir().join("no_such_city_dir").join("nested").join("frame.png");

        match export_png(&frame, &path) {
            Err(CityError::ExportFailed { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected ExportFailed, got {other:?}"),
        }
    }
}
