use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_PATTERN: &str = "{d(%H:%M:%S)} {l} {t} - {m}{n}";

#[ctor::ctor]
fn init() {
    if log4rs::init_file(CONFIG_FILE, Default::default()).is_ok() {
        return;
    }
    // no usable config file, log warnings to stderr
    if let Err(message) = install_fallback_logger() {
        eprintln!("Logging disabled: {}", message);
    }
}

fn install_fallback_logger() -> Result<(), String> {
    let config = fallback_config().ok_or("invalid fallback logging config")?;
    log4rs::init_config(config)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn fallback_config() -> Option<Config> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .ok()
}

pub fn log_dimensions(operation: &str, width: u32, height: u32, max_value: u16) {
    log::debug!(
        "{} on {}x{} image with max value {}",
        operation,
        width,
        height,
        max_value
    );
}

#[cfg(test)]
mod test {
    use super::{fallback_config, install_fallback_logger};

    #[test]
    fn fallback_config_is_valid() {
        assert!(fallback_config().is_some());
    }

    #[test]
    fn second_logger_is_reported() {
        // the constructor has already installed a logger
        assert!(install_fallback_logger().is_err());
    }
}
