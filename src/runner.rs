use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::convolve::Convolver;
use crate::mask::Mask;
use crate::raster::Image;
use crate::Result;

/// Drives repeated mask applications over one image.
///
/// The runner keeps two buffers. Every pass convolves the current image
/// into the scratch buffer and then commits the scratch buffer back,
/// so each pass reads only the finished result of the previous one.
pub struct MaskRunner {
    convolver: Convolver,
    iterations: usize,
}

impl MaskRunner {
    pub fn new(mask: Mask, number_of_workers: usize, iterations: usize) -> Self {
        MaskRunner {
            convolver: Convolver::new(mask, number_of_workers),
            iterations,
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn worker_count(&self) -> usize {
        self.convolver.worker_count()
    }

    /// Applies the mask the configured number of times and returns the
    /// final image together with the time spent in the passes. Decoding
    /// and encoding are not part of the measured time. Zero iterations
    /// return the input unchanged.
    pub fn run(&self, image: Image) -> Result<(Image, Duration)> {
        let mut current = Arc::new(image);
        let mut scratch = Image::new(current.width(), current.height())?;

        let start = Instant::now();
        for _ in 0..self.iterations {
            self.convolver.apply(&current, &mut scratch);
            Arc::make_mut(&mut current).copy_from(&scratch);
        }
        let elapsed = start.elapsed();

        let image = Arc::try_unwrap(current).unwrap_or_else(|shared| (*shared).clone());
        Ok((image, elapsed))
    }
}
