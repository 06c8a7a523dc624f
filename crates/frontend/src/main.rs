mod app;
mod components;
mod hooks;

use app::App;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;

#[cfg(debug_assertions)]
const LOG_LEVEL: LevelFilter = LevelFilter::DEBUG;
#[cfg(not(debug_assertions))]
const LOG_LEVEL: LevelFilter = LevelFilter::INFO;

fn init_tracing() {
    // Browsers have no clock for the fmt timer and don't render ANSI
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(LOG_LEVEL);

    tracing_subscriber::registry().with(fmt_layer).init();
}

fn main() {
    console_error_panic_hook::set_once();
    init_tracing();
    yew::Renderer::<App>::new().render();
}
