//! Log setup: all command output goes through `log` to stdout.

use std::io::Write;

use log::LevelFilter;

/// Install the global logger.
///
/// Normal runs print bare messages at info level (`RUST_LOG` may override).
/// `quiet` keeps warnings and errors only; `verbose` adds debug messages with
/// timestamps and level tags.
pub(crate) fn init(quiet: bool, verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stdout);

    if verbose {
        builder.filter_level(LevelFilter::Debug);
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        });
    } else if quiet {
        builder.filter_level(LevelFilter::Warn);
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    } else {
        builder.filter_level(LevelFilter::Info);
        builder.parse_default_env();
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder.init();
}
