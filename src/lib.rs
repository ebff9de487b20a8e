use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub use cli::CLIParser;
use error::Error;
use mask::{Mask, MaskParser, MaskTokenizer};
use runner::MaskRunner;

mod cli;
mod codec;
mod convolve;
mod error;
pub mod logger;
pub mod mask;
pub mod raster;
pub mod runner;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    output_file: Option<PathBuf>,
    iterations: usize,
    mask_file: Option<PathBuf>,
    mask_size: usize,
    number_of_threads: usize,
    verbose: bool,
    no_output: bool,
}

fn open_mask_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenMaskFileForReading(file_path.to_string_lossy().into_owned(), e)
    })
}

fn create_mask(arguments: &Arguments) -> Result<Mask> {
    match &arguments.mask_file {
        Some(path) => {
            log::info!("Loading mask file from {}", path.display());
            let mask_file = open_mask_file(path)?;
            let mask = MaskParser::parse(MaskTokenizer::new(BufReader::new(mask_file)))?;
            log::info!("Loaded a {0}x{0} mask", mask.size());
            Ok(mask)
        }
        None => {
            log::info!("Creating default blur mask of size {}", arguments.mask_size);
            Mask::uniform(arguments.mask_size, 1.0)
        }
    }
}

/// Runs the whole masking pipeline for one set of command line
/// arguments. The measured runtime of the mask passes is printed to
/// standard output in seconds.
pub fn apply_mask_to_image(arguments: &Arguments) -> Result<()> {
    logger::init(arguments.verbose);
    let mask = create_mask(arguments)?;
    log::info!("Reading image from {}", arguments.input_file.display());
    let image = codec::read_image(&arguments.input_file)?;
    let runner = MaskRunner::new(mask, arguments.number_of_threads, arguments.iterations);
    log::info!(
        "Applying the mask {} times to a {}x{} pixel image using {} worker threads",
        runner.iterations(),
        image.width(),
        image.height(),
        runner.worker_count()
    );
    let (image, elapsed) = runner.run(image)?;
    println!("{:.6}", elapsed.as_secs_f64());
    match (&arguments.output_file, arguments.no_output) {
        (Some(path), false) => {
            log::info!("Writing masked image to {}", path.display());
            codec::write_image(path, image)
        }
        _ => Ok(()),
    }
}
