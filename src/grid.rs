//! Grid-post reconstruction.
//!
//! Multi-photo posts are presented upstream as a contact sheet of uniformly
//! sized tiles, nine or six to a grid, sometimes with a deliberately taller
//! "long image" in the last slot. This module detects those layouts from the
//! downloaded files alone and merges them into one composite raster, keeping
//! the long original as a separate attachment. Anything irregular falls back
//! to the untouched input list.

use std::path::{Path, PathBuf};

use image::{imageops, DynamicImage, GenericImageView, Rgb, RgbImage};
use thiserror::Error;
use tracing::{debug, info, warn};

const GRID_COLS: u32 = 3;

/// Fewer images than this cannot form either grid layout.
const MIN_GRID_IMAGES: usize = 5;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to read tile {}: {source}", .path.display())]
    ReadTile {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to save composite {}: {source}", .path.display())]
    SaveComposite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Merge a grid post's tiles into one composite, if the input forms a grid.
///
/// Checks the nine-tile layout first, then the six-tile layout; the first
/// eligible layout wins. Returns the rewritten path list: the composite,
/// then the uncropped long image when one was embedded, then any images
/// beyond the consumed prefix. Input that matches neither layout, or any
/// error while composing, yields the original list unchanged.
pub fn reconstruct(paths: &[PathBuf], cache_dir: &Path, account_id: &str) -> Vec<PathBuf> {
    if paths.len() < MIN_GRID_IMAGES {
        return paths.to_vec();
    }

    let attempt = grid_attempt(paths, 8, 3, cache_dir, account_id)
        .or_else(|| grid_attempt(paths, 5, 2, cache_dir, account_id));

    match attempt {
        Some(Ok(merged)) => merged,
        Some(Err(e)) => {
            warn!(error = %e, "grid composition failed, keeping original attachments");
            paths.to_vec()
        }
        None => paths.to_vec(),
    }
}

/// One detection-and-merge attempt for a layout of `base_count` uniform tiles
/// plus an optional trailing tile.
///
/// `None` means the layout does not apply and the next one may be tried.
/// `Some(Err(_))` means the layout applied but composing failed; the caller
/// must fall back to the original list without trying further layouts.
fn grid_attempt(
    paths: &[PathBuf],
    base_count: usize,
    rows: u32,
    cache_dir: &Path,
    account_id: &str,
) -> Option<Result<Vec<PathBuf>, GridError>> {
    if paths.len() < base_count {
        return None;
    }
    let base_size = consistent_dimensions(&paths[..base_count])?;
    Some(compose(paths, base_count, rows, base_size, cache_dir, account_id))
}

/// Dimensions shared by every listed image, from header probes only.
/// Any probe failure or mismatch disqualifies the set.
fn consistent_dimensions(paths: &[PathBuf]) -> Option<(u32, u32)> {
    let mut dims = paths.iter().map(|p| image::image_dimensions(p).ok());
    let first = dims.next()??;
    for dim in dims {
        if dim? != first {
            return None;
        }
    }
    Some(first)
}

fn compose(
    paths: &[PathBuf],
    base_count: usize,
    rows: u32,
    (width, height): (u32, u32),
    cache_dir: &Path,
    account_id: &str,
) -> Result<Vec<PathBuf>, GridError> {
    let mut tiles: Vec<DynamicImage> = Vec::with_capacity(base_count + 1);
    for path in &paths[..base_count] {
        tiles.push(open_tile(path)?);
    }

    let mut consumed = base_count;
    let mut long_original: Option<PathBuf> = None;

    if let Some(extra_path) = paths.get(base_count) {
        let extra = open_tile(extra_path)?;
        let (ew, eh) = extra.dimensions();
        if (ew, eh) == (width, height) {
            tiles.push(extra);
            consumed += 1;
        } else if ew == width && eh > height {
            // Long-image slot: the grid cell gets the top slice, the uncropped
            // original is forwarded separately after the composite.
            tiles.push(extra.crop_imm(0, 0, width, height));
            long_original = Some(extra_path.clone());
            consumed += 1;
        } else {
            debug!(
                path = %extra_path.display(),
                "irregular trailing image, composing base tiles only"
            );
        }
    }

    let mut canvas = RgbImage::from_pixel(width * GRID_COLS, height * rows, Rgb([255, 255, 255]));
    for (i, tile) in (0u32..).zip(tiles.iter()) {
        let col = i % GRID_COLS;
        let row = i / GRID_COLS;
        imageops::replace(
            &mut canvas,
            &tile.to_rgb8(),
            i64::from(col * width),
            i64::from(row * height),
        );
    }

    let composite = cache_dir.join(format!(
        "merged_{}_{}.png",
        account_id,
        chrono::Utc::now().timestamp()
    ));
    canvas.save(&composite).map_err(|e| GridError::SaveComposite {
        path: composite.clone(),
        source: e,
    })?;
    info!(
        tiles = tiles.len(),
        path = %composite.display(),
        "merged grid post into composite"
    );

    let mut result = vec![composite];
    result.extend(long_original);
    result.extend(paths[consumed..].iter().cloned());
    Ok(result)
}

fn open_tile(path: &Path) -> Result<DynamicImage, GridError> {
    image::open(path).map_err(|e| GridError::ReadTile {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([40, 80, 120])).save(&path).unwrap();
        path
    }

    #[test]
    fn test_short_input_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = (0..4)
            .map(|i| write_png(dir.path(), &format!("{i}.png"), 10, 10))
            .collect();
        assert_eq!(reconstruct(&paths, dir.path(), "42"), paths);
    }

    #[test]
    fn test_consistent_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", 10, 10);
        let b = write_png(dir.path(), "b.png", 10, 10);
        let c = write_png(dir.path(), "c.png", 10, 12);
        assert_eq!(consistent_dimensions(&[a.clone(), b.clone()]), Some((10, 10)));
        assert_eq!(consistent_dimensions(&[a.clone(), c]), None);
        let missing = dir.path().join("missing.png");
        assert_eq!(consistent_dimensions(&[a, missing]), None);
        assert_eq!(consistent_dimensions(&[b]), Some((10, 10)));
    }
}
