use std::panic;

use tracing::error;
use tracing_subscriber::{
    fmt, prelude::__tracing_subscriber_SubscriberExt, EnvFilter, Layer,
};

pub fn init_tracing() {
    const WITH_FILE_PATH: bool = cfg!(debug_assertions);
    let layer = fmt::layer()
        .compact()
        .with_file(WITH_FILE_PATH)
        .with_line_number(WITH_FILE_PATH)
        .with_target(!WITH_FILE_PATH)
        .with_thread_ids(true);
    let filter = if cfg!(debug_assertions) {
        EnvFilter::new(concat!(env!("CARGO_CRATE_NAME"), "=trace"))
    } else {
        EnvFilter::new(concat!(env!("CARGO_CRATE_NAME"), "=info"))
    };
    let reg = tracing_subscriber::registry().with(layer.with_filter(filter));
    tracing::subscriber::set_global_default(reg).unwrap();
    panic::set_hook(Box::new(|panic| error!("{}", panic)));
}
