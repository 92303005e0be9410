//! netainfo.
//!
//! netainfo is the backend of a dashboard about candidates in Indian Lok Sabha elections. It
//! loads the cleaned candidate records published by myneta.info and serves bar charts of the
//! average number of criminal cases, declared assets and age per state or party, filtered by
//! election year and by whether the candidates won.

#![warn(
    missing_debug_implementations,
    unused_crate_dependencies,
    clippy::all
)]

mod cli;
mod endpoints;
mod healthcheck;
mod logging;
mod server;
mod utils;


#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

fn main() {
    match cli::execute() {
        Ok(()) => std::process::exit(0),
        Err(error) => {
            logging::ensure_log_error(&error);
            std::process::exit(1);
        }
    }
}
