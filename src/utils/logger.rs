use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line, for container log collectors.
    Json,
}

/// Filter used when `RUST_LOG` is unset. The HTTP front end also gets
/// per-request spans from `tower_http`.
pub fn default_filter(verbose: bool, serving: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec![format!("ecr_pusher={}", level)];

    if serving {
        directives.push(format!("tower_http={}", level));
        directives.push("axum=info".to_string());
    }
    if verbose {
        // aws-config 的憑證鏈解析過程
        directives.push("aws_config=debug".to_string());
    }

    directives.join(",")
}

pub fn init_logger(format: LogFormat, verbose: bool, serving: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, serving)));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(serving)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
    }
}
