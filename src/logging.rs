//! Log setup. The terminal belongs to the UI while the game runs, so records
//! go to a file under the state directory instead of stderr.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(level).format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder
}

/// Route `log` records to `path`, truncating it. Without a usable path
/// logging stays off.
pub fn init(level: LevelFilter, path: Option<&Path>) {
    let file = match path.map(open_log_file) {
        Some(Ok(file)) => file,
        _ => {
            log::set_max_level(LevelFilter::Off);
            return;
        }
    };

    let mut builder = builder(level);
    builder.target(Target::Pipe(Box::new(file)));
    if builder.try_init().is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
        previous(panic_info);
    }));
}

/// Run `action` on every panic, ahead of the hooks already installed
pub fn chain_panic_hook<F>(action: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        action();
        previous(panic_info);
    }));
}
