use std::time::Duration;

use tonic::metadata::MetadataMap;

use crate::domain::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Build the core request context from call metadata.
///
/// The correlation id comes from `x-request-id` when the caller sent one.
/// The deadline is the earlier of the caller's `grpc-timeout` and the
/// server-side `timeout`.
pub fn request_context(metadata: &MetadataMap, timeout: Duration) -> RequestContext {
    let request_id = metadata
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let ctx = match request_id {
        Some(request_id) => RequestContext::with_request_id(request_id),
        None => RequestContext::new(),
    }
    .with_timeout(timeout);

    match metadata
        .get(GRPC_TIMEOUT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_grpc_timeout)
    {
        Some(client_timeout) => ctx.with_timeout(client_timeout),
        None => ctx,
    }
}

/// Parse a `grpc-timeout` header value: at most 8 digits followed by one of
/// the units `H`, `M`, `S`, `m`, `u`, `n`.
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    let unit = value.chars().last()?;
    let digits = &value[..value.len() - unit.len_utf8()];

    if digits.is_empty() || digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let amount: u64 = digits.parse().ok()?;

    match unit {
        'H' => Some(Duration::from_secs(amount * 60 * 60)),
        'M' => Some(Duration::from_secs(amount * 60)),
        'S' => Some(Duration::from_secs(amount)),
        'm' => Some(Duration::from_millis(amount)),
        'u' => Some(Duration::from_micros(amount)),
        'n' => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}
