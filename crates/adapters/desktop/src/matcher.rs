//! Template matching by zero-mean normalized cross-correlation.
//!
//! Scores range from -1 to 1; 1 is a pixel-perfect match up to brightness
//! and contrast. In color mode the red, green and blue planes are scored
//! jointly, so a channel that is flat in the template does not poison the
//! score. Grayscale mode scores the luma plane only.
//!
//! Templates large enough to survive it are searched in two stages: both
//! images are shrunk by a power of two and scored everywhere, then the best
//! coarse peaks are rescored at full scale in a small window around each.
//! Only the full-scale score is compared against the confidence.
//!
//! The raw cross-correlation comes from `imageproc` (parallel over rows);
//! window sums come from integral images so each score costs O(1) on top of
//! it.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};
use imageproc::definitions::Image;
use imageproc::template_matching::{
    Extremes, MatchTemplateMethod, find_extremes, match_template_parallel,
};

use autoclick_domain::template::ColorMode;

/// Below this, a sum of squared deviations counts as zero.
const FLAT: f64 = 1e-6;

/// Shortest template side, once shrunk, that the coarse stage accepts.
const MIN_COARSE_SIDE: u32 = 8;

/// Largest shrink factor.
const MAX_FACTOR: u32 = 8;

/// Coarse peaks rescored at full scale.
const CANDIDATES: usize = 12;

/// Best-scoring placement of a template inside a haystack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Top-left corner, in haystack pixels.
    pub x: u32,
    pub y: u32,
    pub score: f32,
}

/// Find the best placement of `needle` in `haystack`, if it scores at least
/// `confidence`.
///
/// Returns `None` when the needle does not fit inside the haystack or has no
/// contrast at all (a single flat color cannot be located).
#[must_use]
pub fn best_match(
    haystack: &RgbaImage,
    needle: &RgbaImage,
    mode: ColorMode,
    confidence: f32,
) -> Option<Match> {
    let (width, height) = needle.dimensions();
    if width == 0 || height == 0 || width > haystack.width() || height > haystack.height() {
        return None;
    }

    let haystack = planes(haystack, mode);
    let needle = planes(needle, mode);
    let factor = shrink_factor(width, height);

    let found = if factor == 1 {
        exhaustive(&haystack, &needle)
    } else {
        staged(&haystack, &needle, factor).or_else(|| exhaustive(&haystack, &needle))
    }?;
    (found.score >= confidence).then_some(found)
}

/// Largest power of two that keeps the shrunk template at least
/// [`MIN_COARSE_SIDE`] pixels on its short side.
fn shrink_factor(width: u32, height: u32) -> u32 {
    let side = width.min(height);
    let mut factor = 1;
    while factor < MAX_FACTOR && side / (factor * 2) >= MIN_COARSE_SIDE {
        factor *= 2;
    }
    factor
}

/// Score every placement at full scale.
fn exhaustive(haystack: &[GrayImage], needle: &[GrayImage]) -> Option<Match> {
    score_map(haystack, needle).map(|scores| peak(&find_extremes(&scores), 0, 0))
}

/// Coarse search followed by full-scale refinement.
///
/// `None` when the shrunk template lost all its contrast.
fn staged(haystack: &[GrayImage], needle: &[GrayImage], factor: u32) -> Option<Match> {
    let coarse = score_map(&shrink(haystack, factor), &shrink(needle, factor))?;
    peaks(&coarse, CANDIDATES)
        .into_iter()
        .filter_map(|(x, y)| refine(haystack, needle, x * factor, y * factor, factor))
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

fn shrink(planes: &[GrayImage], factor: u32) -> Vec<GrayImage> {
    planes
        .iter()
        .map(|plane| {
            let (width, height) = plane.dimensions();
            imageops::resize(plane, width / factor, height / factor, FilterType::Triangle)
        })
        .collect()
}

/// Up to `limit` highest cells of `scores`, skipping the direct neighbours
/// of cells already taken.
fn peaks(scores: &Image<Luma<f32>>, limit: usize) -> Vec<(u32, u32)> {
    let mut cells: Vec<(u32, u32, f32)> = scores
        .enumerate_pixels()
        .map(|(x, y, score)| (x, y, score[0]))
        .collect();
    cells.sort_unstable_by(|a, b| b.2.total_cmp(&a.2));

    let mut taken: Vec<(u32, u32)> = Vec::with_capacity(limit);
    for (x, y, _) in cells {
        if taken.len() == limit {
            break;
        }
        if taken.iter().all(|&(tx, ty)| tx.abs_diff(x) > 1 || ty.abs_diff(y) > 1) {
            taken.push((x, y));
        }
    }
    taken
}

/// Rescore the placements within `reach` pixels of `(x, y)` at full scale.
fn refine(
    haystack: &[GrayImage],
    needle: &[GrayImage],
    x: u32,
    y: u32,
    reach: u32,
) -> Option<Match> {
    let (hay_width, hay_height) = haystack.first()?.dimensions();
    let (width, height) = needle.first()?.dimensions();
    let (last_x, last_y) = (hay_width - width, hay_height - height);
    let (x, y) = (x.min(last_x), y.min(last_y));

    let left = x.saturating_sub(reach);
    let top = y.saturating_sub(reach);
    let right = (x + reach).min(last_x);
    let bottom = (y + reach).min(last_y);

    let window: Vec<GrayImage> = haystack
        .iter()
        .map(|plane| {
            imageops::crop_imm(plane, left, top, right - left + width, bottom - top + height)
                .to_image()
        })
        .collect();
    score_map(&window, needle).map(|scores| peak(&find_extremes(&scores), left, top))
}

fn peak(extremes: &Extremes<f32>, left: u32, top: u32) -> Match {
    Match {
        x: left + extremes.max_value_location.0,
        y: top + extremes.max_value_location.1,
        score: extremes.max_value,
    }
}

/// Split an image into the planes scored for `mode`.
fn planes(image: &RgbaImage, mode: ColorMode) -> Vec<GrayImage> {
    let (width, height) = image.dimensions();
    match mode {
        ColorMode::Grayscale => vec![imageops::grayscale(image)],
        ColorMode::Color => (0..3)
            .filter_map(|channel| {
                let raw = image.pixels().map(|pixel| pixel[channel]).collect();
                GrayImage::from_raw(width, height, raw)
            })
            .collect(),
    }
}

/// Score every placement of `needle` inside `haystack`.
///
/// Both slices hold the same number of planes; every haystack plane has the
/// same size, and so does every needle plane.
#[allow(clippy::cast_possible_truncation)]
fn score_map(haystack: &[GrayImage], needle: &[GrayImage]) -> Option<Image<Luma<f32>>> {
    let (hay_width, hay_height) = haystack.first()?.dimensions();
    let (width, height) = needle.first()?.dimensions();
    if width == 0 || height == 0 || width > hay_width || height > hay_height {
        return None;
    }

    let area = f64::from(width) * f64::from(height);
    let out_width = hay_width - width + 1;
    let out_height = hay_height - height + 1;
    let cells = out_width as usize * out_height as usize;

    let mut numerator = vec![0.0_f64; cells];
    let mut window_spread = vec![0.0_f64; cells];
    let mut needle_spread = 0.0_f64;

    for (plane, template) in haystack.iter().zip(needle) {
        let (sum, sum_sq) = plane_sums(template);
        let mean = sum / area;
        needle_spread += sum_sq - sum * mean;

        let cross = match_template_parallel(plane, template, MatchTemplateMethod::CrossCorrelation);
        let integral = Integral::new(plane);
        for y in 0..out_height {
            for x in 0..out_width {
                let cell = y as usize * out_width as usize + x as usize;
                let (window_sum, window_sum_sq) = integral.window(x, y, width, height);
                numerator[cell] += f64::from(cross.get_pixel(x, y)[0]) - mean * window_sum;
                window_spread[cell] += window_sum_sq - window_sum * window_sum / area;
            }
        }
    }

    if needle_spread <= FLAT {
        return None;
    }

    Some(Image::from_fn(out_width, out_height, |x, y| {
        let cell = y as usize * out_width as usize + x as usize;
        let denominator = (window_spread[cell].max(0.0) * needle_spread).sqrt();
        let score = if denominator > FLAT {
            (numerator[cell] / denominator).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Luma([score as f32])
    }))
}

fn plane_sums(plane: &GrayImage) -> (f64, f64) {
    plane.pixels().fold((0.0, 0.0), |(sum, sum_sq), pixel| {
        let value = f64::from(pixel[0]);
        (sum + value, sum_sq + value * value)
    })
}

/// Summed-area tables of a plane and of its squares.
struct Integral {
    stride: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl Integral {
    fn new(plane: &GrayImage) -> Self {
        let (width, height) = plane.dimensions();
        let stride = width as usize + 1;
        let mut sum = vec![0.0; stride * (height as usize + 1)];
        let mut sum_sq = sum.clone();
        for y in 0..height as usize {
            let mut row = 0.0;
            let mut row_sq = 0.0;
            for x in 0..width as usize {
                #[allow(clippy::cast_possible_truncation)]
                let value = f64::from(plane.get_pixel(x as u32, y as u32)[0]);
                row += value;
                row_sq += value * value;
                let cell = (y + 1) * stride + x + 1;
                sum[cell] = sum[cell - stride] + row;
                sum_sq[cell] = sum_sq[cell - stride] + row_sq;
            }
        }
        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    /// Sum and sum of squares over the `width`×`height` window at `(x, y)`.
    fn window(&self, x: u32, y: u32, width: u32, height: u32) -> (f64, f64) {
        let (left, top) = (x as usize, y as usize);
        let (right, bottom) = (left + width as usize, top + height as usize);
        let at = |table: &[f64]| {
            table[bottom * self.stride + right] - table[top * self.stride + right]
                - table[bottom * self.stride + left]
                + table[top * self.stride + left]
        };
        (at(&self.sum), at(&self.sum_sq))
    }
}
