use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CityError {
    #[error("invalid canvas dimension: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("window style weights are unusable: {0}")]
    InvalidStyleWeights(#[from] rand::distr::weighted::Error),

    #[error("export to '{}' failed: {source}", .path.display())]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
