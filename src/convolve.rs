use std::cmp;
use std::sync::mpsc;
use std::sync::Arc;

use threadpool::ThreadPool;

use crate::mask::Mask;
use crate::raster::{Image, CHANNELS};

/// Applies a weight mask to whole images on a pool of worker threads.
///
/// The image is split into horizontal bands, one job per band. Workers
/// only read the shared source image and send their finished band back
/// over a channel, so no two jobs ever touch the same output range.
pub struct Convolver {
    mask: Arc<Mask>,
    pool: ThreadPool,
}

impl Convolver {
    /// A worker count of zero is treated as one.
    pub fn new(mask: Mask, number_of_workers: usize) -> Self {
        Convolver {
            mask: Arc::new(mask),
            pool: ThreadPool::new(cmp::max(number_of_workers, 1)),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.pool.max_count()
    }

    /// Convolves `source` into `destination`, which must have the same
    /// dimensions.
    ///
    /// Each output channel is the weighted sum over the kernel window
    /// divided by the number of mask cells. The divisor is the cell
    /// count, not the weight sum, so masks whose weights average above
    /// 1.0 brighten the image. Sums are rounded and clamped to the u8
    /// range. Out-of-image samples are clamped to the nearest border
    /// pixel.
    ///
    /// The per-pixel summation order is fixed, so the output is
    /// byte-identical for every worker count.
    pub fn apply(&self, source: &Arc<Image>, destination: &mut Image) {
        debug_assert_eq!(source.width(), destination.width());
        debug_assert_eq!(source.height(), destination.height());

        let height = source.height();
        let band_rows = height.div_ceil(self.pool.max_count());
        let (sender, receiver) = mpsc::channel();

        for band_start in (0..height).step_by(band_rows) {
            let band_end = cmp::min(band_start + band_rows, height);
            let source = Arc::clone(source);
            let mask = Arc::clone(&self.mask);
            let sender = sender.clone();
            self.pool.execute(move || {
                let band = convolve_rows(&source, &mask, band_start, band_end);
                sender
                    .send((band_start, band))
                    .expect("Band receiver dropped before all workers finished");
            });
        }
        drop(sender);

        let row_length = source.width() * CHANNELS;
        let output = destination.as_raw_mut();
        for (band_start, band) in receiver {
            let offset = band_start * row_length;
            output[offset..offset + band.len()].copy_from_slice(&band);
        }
        self.pool.join();
    }
}

/// Convolves the rows `row_start..row_end` and returns their pixel data.
fn convolve_rows(source: &Image, mask: &Mask, row_start: usize, row_end: usize) -> Vec<u8> {
    let element_count = mask.element_count() as f64;
    let half = mask.half() as i64;
    let mut band = Vec::with_capacity((row_end - row_start) * source.width() * CHANNELS);

    for y in row_start..row_end {
        for x in 0..source.width() {
            // Channel sums exceed the u8 range long before normalization.
            let mut sums = [0.0_f64; CHANNELS];
            for ky in 0..mask.size() {
                for kx in 0..mask.size() {
                    let sample_x = x as i64 + kx as i64 - half;
                    let sample_y = y as i64 + ky as i64 - half;
                    let pixel = source.sample(sample_x, sample_y);
                    let weight = mask.weight(kx, ky);
                    for (sum, component) in sums.iter_mut().zip(pixel) {
                        *sum += f64::from(component) * weight;
                    }
                }
            }
            for sum in sums {
                band.push((sum / element_count).round() as u8);
            }
        }
    }

    band
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::Convolver;
    use crate::mask::{Mask, MaskParser, MaskTokenizer};
    use crate::raster::Image;

    fn flat_image(width: usize, height: usize, pixel: [u8; 3]) -> Image {
        let mut image = Image::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                image.set_pixel(x, y, pixel);
            }
        }
        image
    }

    fn gradient_image(width: usize, height: usize) -> Image {
        let mut image = Image::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                image.set_pixel(
                    x,
                    y,
                    [(x % 256) as u8, (y % 256) as u8, ((x + y * 8) % 256) as u8],
                );
            }
        }
        image
    }

    fn apply_mask(image: Image, mask: Mask, number_of_workers: usize) -> Image {
        let convolver = Convolver::new(mask, number_of_workers);
        let mut destination = Image::new(image.width(), image.height()).unwrap();
        convolver.apply(&Arc::new(image), &mut destination);
        destination
    }

    #[test]
    fn flat_image_with_uniform_mask_is_unchanged() {
        let image = flat_image(4, 3, [77, 141, 9]);
        let expected = image.as_raw().to_vec();
        let mask = Mask::uniform(3, 1.0).unwrap();
        let result = apply_mask(image, mask, 2);
        assert_eq!(result.as_raw(), expected.as_slice());
    }

    #[test]
    fn divisor_is_cell_count_not_weight_sum() {
        let image = flat_image(3, 3, [100, 100, 100]);
        let mask = Mask::uniform(3, 2.0).unwrap();
        let result = apply_mask(image, mask, 1);
        assert!(result.as_raw().iter().all(|&value| value == 200));
    }

    #[test]
    fn channel_values_clamp_to_u8_range() {
        let bright = apply_mask(
            flat_image(3, 3, [100, 100, 100]),
            Mask::uniform(3, 30.0).unwrap(),
            1,
        );
        assert!(bright.as_raw().iter().all(|&value| value == 255));

        let dark = apply_mask(
            flat_image(3, 3, [100, 100, 100]),
            Mask::uniform(3, -1.0).unwrap(),
            1,
        );
        assert!(dark.as_raw().iter().all(|&value| value == 0));
    }

    #[test]
    fn result_is_independent_of_worker_count() {
        let single = apply_mask(gradient_image(8, 6), Mask::uniform(3, 1.0).unwrap(), 1);
        let pooled = apply_mask(gradient_image(8, 6), Mask::uniform(3, 1.0).unwrap(), 4);
        assert_eq!(single.as_raw(), pooled.as_raw());
    }

    #[test]
    fn more_workers_than_rows() {
        let few_rows = apply_mask(gradient_image(5, 2), Mask::uniform(3, 1.0).unwrap(), 1);
        let many_workers = apply_mask(gradient_image(5, 2), Mask::uniform(3, 1.0).unwrap(), 8);
        assert_eq!(few_rows.as_raw(), many_workers.as_raw());
    }

    #[test]
    fn even_mask_window_reaches_up_and_left() {
        let mut image = Image::new(2, 2).unwrap();
        image.set_pixel(0, 0, [0, 0, 0]);
        image.set_pixel(1, 0, [40, 40, 40]);
        image.set_pixel(0, 1, [80, 80, 80]);
        image.set_pixel(1, 1, [120, 120, 120]);

        let mask = Mask::uniform(2, 1.0).unwrap();
        let result = apply_mask(image, mask, 1);

        assert_eq!(result.pixel(0, 0), [0, 0, 0]);
        assert_eq!(result.pixel(1, 0), [20, 20, 20]);
        assert_eq!(result.pixel(0, 1), [40, 40, 40]);
        assert_eq!(result.pixel(1, 1), [60, 60, 60]);
    }

    #[test]
    fn border_pixels_reuse_clamped_samples() {
        let mut image = Image::new(3, 1).unwrap();
        image.set_pixel(0, 0, [0, 0, 0]);
        image.set_pixel(1, 0, [90, 90, 90]);
        image.set_pixel(2, 0, [255, 255, 255]);

        let mask = Mask::uniform(3, 1.0).unwrap();
        let result = apply_mask(image, mask, 1);

        assert_eq!(result.pixel(0, 0), [30, 30, 30]);
        assert_eq!(result.pixel(1, 0), [115, 115, 115]);
        assert_eq!(result.pixel(2, 0), [200, 200, 200]);
    }

    #[test]
    fn horizontal_weights_act_on_horizontal_neighbors() {
        let mut image = Image::new(3, 1).unwrap();
        image.set_pixel(0, 0, [10, 10, 10]);
        image.set_pixel(1, 0, [20, 20, 20]);
        image.set_pixel(2, 0, [30, 30, 30]);

        // left neighbor counts once, right neighbor twice
        let mask =
            MaskParser::parse(MaskTokenizer::new("3\n0 0 0\n1 0 2\n0 0 0".as_bytes())).unwrap();
        let result = apply_mask(image, mask, 1);

        assert_eq!(result.pixel(0, 0), [6, 6, 6]);
        assert_eq!(result.pixel(1, 0), [8, 8, 8]);
        assert_eq!(result.pixel(2, 0), [9, 9, 9]);
    }

    #[test]
    fn vertical_weights_act_on_vertical_neighbors() {
        let mut image = Image::new(1, 3).unwrap();
        image.set_pixel(0, 0, [10, 10, 10]);
        image.set_pixel(0, 1, [20, 20, 20]);
        image.set_pixel(0, 2, [30, 30, 30]);

        // upper neighbor counts once, lower neighbor twice
        let mask =
            MaskParser::parse(MaskTokenizer::new("3\n0 1 0\n0 0 0\n0 2 0".as_bytes())).unwrap();
        let result = apply_mask(image, mask, 1);

        assert_eq!(result.pixel(0, 0), [6, 6, 6]);
        assert_eq!(result.pixel(0, 1), [8, 8, 8]);
        assert_eq!(result.pixel(0, 2), [9, 9, 9]);
    }

    #[test]
    fn single_pixel_image_is_a_fixed_point() {
        let image = flat_image(1, 1, [200, 10, 0]);
        let mask = Mask::uniform(5, 1.0).unwrap();
        let result = apply_mask(image, mask, 3);
        assert_eq!(result.pixel(0, 0), [200, 10, 0]);
    }

    #[test]
    fn zero_workers_fall_back_to_one() {
        let convolver = Convolver::new(Mask::uniform(3, 1.0).unwrap(), 0);
        assert_eq!(convolver.worker_count(), 1);
    }
}
