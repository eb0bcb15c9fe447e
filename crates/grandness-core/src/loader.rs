//! Elevation grid loading.
//!
//! Image sources are decoded with the `image` crate. The first channel is
//! normalised to [0, 1] by its bit depth and scaled to
//! `[0, vertical_scale × width]`, so relief is expressed in horizontal cells.
//! `.json` sources hold a serialised [`ElevationGrid`] and are used as-is.
use std::fs;
use std::path::Path;

use crate::error::{GrandnessError, Result};
use crate::grid::ElevationGrid;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn image_error(path: &Path, err: image::ImageError) -> GrandnessError {
    match err {
        image::ImageError::IoError(source) => GrandnessError::Io { path: path.to_path_buf(), source },
        source => GrandnessError::Image { path: path.to_path_buf(), source },
    }
}

fn read_json_grid(path: &Path) -> Result<ElevationGrid> {
    let text = fs::read_to_string(path).map_err(|source| GrandnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid: ElevationGrid = serde_json::from_str(&text).map_err(|source| GrandnessError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    grid.validate()?;
    Ok(grid)
}

/// Read only the `(width, height)` of a source.
///
/// For images this decodes the header alone; JSON grids have no separate
/// header and are parsed in full.
pub fn probe_resolution(path: &Path) -> Result<(usize, usize)> {
    if is_json(path) {
        let grid = read_json_grid(path)?;
        return Ok((grid.width, grid.height));
    }
    let (w, h) = image::image_dimensions(path).map_err(|e| image_error(path, e))?;
    Ok((w as usize, h as usize))
}

/// Load a grid, rejecting sources with zero width or height.
pub fn load_grid(path: &Path, vertical_scale: f32) -> Result<ElevationGrid> {
    if !vertical_scale.is_finite() || vertical_scale < 0.0 {
        return Err(GrandnessError::InvalidVerticalScale(vertical_scale));
    }

    if is_json(path) {
        let grid = read_json_grid(path)?;
        check_extent(path, grid.width, grid.height)?;
        tracing::debug!(vertical_scale, "JSON grids are used as stored; vertical scale ignored");
        tracing::info!(path = %path.display(), width = grid.width, height = grid.height, "loaded grid");
        return Ok(grid);
    }

    let (width, height) = probe_resolution(path)?;
    check_extent(path, width, height)?;
    tracing::debug!(path = %path.display(), width, height, "probed image resolution");

    let img = image::open(path).map_err(|e| image_error(path, e))?.into_rgb32f();
    let top = vertical_scale * width as f32;
    let data: Vec<f32> = img.pixels().map(|p| p.0[0] * top).collect();
    let grid = ElevationGrid::from_vec(img.width() as usize, img.height() as usize, data)?;

    tracing::info!(
        path = %path.display(),
        width = grid.width,
        height = grid.height,
        max_elevation = top,
        "loaded elevation image"
    );
    Ok(grid)
}

/// Load `path` if given; otherwise the empty grid.
pub fn load_optional(path: Option<&Path>, vertical_scale: f32) -> Result<ElevationGrid> {
    match path {
        Some(p) => load_grid(p, vertical_scale),
        None => Ok(ElevationGrid::empty()),
    }
}

fn check_extent(path: &Path, width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(GrandnessError::EmptySource {
            path: path.to_path_buf(),
            width,
            height,
        });
    }
    Ok(())
}
