use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Env;

/// Install the global tracing subscriber for `env`.
///
/// `local` logs human-readable lines at debug level, `dev` logs JSON at debug
/// level and `prod` logs JSON at info level. `RUST_LOG` overrides the level.
pub fn init(env: Env) {
    let default_directives = match env {
        Env::Local | Env::Dev => "sso=debug,auth=debug,tower=info,h2=info",
        Env::Prod => "sso=info,auth=info,warn",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Local => registry.with(tracing_subscriber::fmt::layer()).init(),
        Env::Dev | Env::Prod => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
    }
}
