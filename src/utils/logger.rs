use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

const DEFAULT_FILTER: &str = "warn,xtts_metadata=info";
const VERBOSE_FILTER: &str = "warn,xtts_metadata=debug";

pub fn init_logger(verbose: bool) {
    // RUST_LOG имеет приоритет над --verbose
    let default_filter = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env = Env::default().filter_or("RUST_LOG", default_filter);

    let mut builder = Builder::from_env(env);

    builder
        .filter_module("mio", LevelFilter::Error)
        .filter_module("hyper", LevelFilter::Error)
        .filter_module("hyper_util", LevelFilter::Error)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("rustls", LevelFilter::Warn)
        .filter_module("symphonia_core", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr);

    // Повторная инициализация (например, в тестах) не должна паниковать
    let _ = builder.try_init();
}
