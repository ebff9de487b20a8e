use masker::mask::Mask;
use masker::raster::Image;
use masker::runner::MaskRunner;

const IMAGE_WIDTH: usize = 1920;
const IMAGE_HEIGHT: usize = 1080;
const ITERATIONS: usize = 10;
const MASK_SIZES: [usize; 3] = [3, 5, 8];
const THREAD_COUNTS: [usize; 4] = [1, 2, 4, 8];

fn create_test_image() -> Image {
    let mut image =
        Image::new(IMAGE_WIDTH, IMAGE_HEIGHT).expect("Test image dimensions must be valid");
    for y in 0..IMAGE_HEIGHT {
        for x in 0..IMAGE_WIDTH {
            image.set_pixel(
                x,
                y,
                [(x % 256) as u8, (y % 256) as u8, ((x + y * 8) % 256) as u8],
            );
        }
    }
    image
}

fn main() {
    eprintln!("Creating {}x{} test image", IMAGE_WIDTH, IMAGE_HEIGHT);
    let test_image = create_test_image();

    println!("size,threads,seconds");
    for &size in &MASK_SIZES {
        for &threads in &THREAD_COUNTS {
            let mask = Mask::uniform(size, 1.0).expect("Mask size must be valid");
            let runner = MaskRunner::new(mask, threads, ITERATIONS);
            let (_, elapsed) = runner
                .run(test_image.clone())
                .expect("Masking the test image failed");
            println!("{},{},{:.6}", size, threads, elapsed.as_secs_f64());
        }
    }
}
