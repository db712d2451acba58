//! Global logger with a pluggable printer.
//!
//! The simulation is host-agnostic: a terminal host wants stdout, an
//! engine host wants its own console. Hosts install a `LogPrinter`
//! once; the simulation logs through free functions and never knows
//! where the lines go. Headless runs fall back to `ConsoleLogger`.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static PRINTER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));
static MIN_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

/// Log line sink. Implementations must be callable from any thread.
pub trait LogPrinter: Send + Sync {
    fn print(&self, level: LogLevel, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Install a printer, replacing any previous one.
pub fn set_printer(printer: Box<dyn LogPrinter>) {
    *PRINTER.lock().unwrap() = Some(printer);
}

/// Lines below this level are dropped before reaching the printer.
pub fn set_min_level(level: LogLevel) {
    *MIN_LEVEL.lock().unwrap() = level;
}

/// Install the stdout printer unless a host already installed one.
pub fn init_console_logger() {
    let mut printer = PRINTER.lock().unwrap();
    if printer.is_none() {
        *printer = Some(Box::new(ConsoleLogger));
    }
}

pub fn log(message: &str) {
    emit(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    emit(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    emit(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    emit(LogLevel::Error, message);
}

fn emit(level: LogLevel, message: &str) {
    if level < *MIN_LEVEL.lock().unwrap() {
        return;
    }
    if let Some(printer) = PRINTER.lock().unwrap().as_ref() {
        // Timestamp added here so printers stay trivial
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        printer.print(level, &format!("[{timestamp}] {message}"));
    }
}

struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn print(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}
