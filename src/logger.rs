use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Configures logging to standard error. Verbose runs log progress at
/// info level, quiet runs only warnings and errors. Standard output
/// stays reserved for the measured runtime.
///
/// Repeated calls keep the configuration of the first one.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .expect("Logger configuration must be valid");
    let _ = log4rs::init_config(config);
}

#[cfg(test)]
mod test {
    #[test]
    fn repeated_initialization_is_harmless() {
        super::init(false);
        super::init(true);
        log::warn!("logger smoke test");
    }
}
