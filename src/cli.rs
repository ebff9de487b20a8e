use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_iterations_argument(command);
        let command = Self::register_mask_file_argument(command);
        let command = Self::register_mask_size_argument(command);
        let command = Self::register_threads_argument(command);
        let command = Self::register_verbose_argument(command);
        Self::register_no_output_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_iterations_argument(command: Command) -> Command {
        command.arg(Self::create_iterations_argument())
    }

    fn register_mask_file_argument(command: Command) -> Command {
        command.arg(Self::create_mask_file_argument())
    }

    fn register_mask_size_argument(command: Command) -> Command {
        command.arg(Self::create_mask_size_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_verbose_argument(command: Command) -> Command {
        command.arg(Self::create_verbose_argument())
    }

    fn register_no_output_argument(command: Command) -> Command {
        command.arg(Self::create_no_output_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to the source image file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to the masked output image (.png or .bmp)")
            .value_parser(value_parser!(PathBuf))
            .required_unless_present("no_output")
    }

    fn create_iterations_argument() -> Arg {
        arg!(iterations: -n --niter <ITERATIONS> "Number of times the mask is applied")
            .default_value("10")
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_mask_file_argument() -> Arg {
        arg!(mask_file: -m --mask <FILE> "Path of the mask file")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn create_mask_size_argument() -> Arg {
        arg!(mask_size: -s --masksize <SIZE> "Edge length of the default blur mask, ignored when a mask file is given")
            .default_value("3")
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of worker threads")
            .default_value("1")
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_verbose_argument() -> Arg {
        Arg::new("verbose")
            .long("verbose")
            .help("Log progress information")
            .action(ArgAction::SetTrue)
    }

    fn create_no_output_argument() -> Arg {
        Arg::new("no_output")
            .long("no-output")
            .help("Skip writing the output image")
            .action(ArgAction::SetTrue)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            iterations: Self::extract_iterations_argument(matches),
            mask_file: Self::extract_mask_file_argument(matches),
            mask_size: Self::extract_mask_size_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
            verbose: Self::extract_verbose_argument(matches),
            no_output: Self::extract_no_output_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("output_file").cloned()
    }

    fn extract_iterations_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("iterations")
            .expect("Number of iterations must be provided, but was unset.")
            .to_owned()
    }

    fn extract_mask_file_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("mask_file").cloned()
    }

    fn extract_mask_size_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("mask_size")
            .expect("Mask size must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_verbose_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("verbose")
    }

    fn extract_no_output_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("no_output")
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}
