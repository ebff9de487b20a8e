use std::env::args_os;
use std::process;

use masker::{apply_mask_to_image, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    if let Err(e) = apply_mask_to_image(&arguments) {
        eprintln!("Masking failed because of: {}", e);
        process::exit(1);
    }
}
