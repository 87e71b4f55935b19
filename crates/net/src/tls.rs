use std::sync::Arc;

/// Client TLS config trusting the platform's root store.
///
/// Returns `None` when no usable native roots are found; callers then keep
/// the HTTP client's bundled roots.
pub(crate) fn native_tls_config() -> Option<Arc<rustls::ClientConfig>> {
    let loaded = rustls_native_certs::load_native_certs();
    for err in &loaded.errors {
        log::debug!(target: "net.tls", "native cert error: {err}");
    }
    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(loaded.certs);
    if added == 0 {
        log::warn!(target: "net.tls", "no native root certificates ({ignored} ignored)");
        return None;
    }
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = match rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
    {
        Ok(builder) => builder.with_root_certificates(roots).with_no_client_auth(),
        Err(err) => {
            log::warn!(target: "net.tls", "TLS config error: {err}");
            return None;
        }
    };
    log::debug!(target: "net.tls", "loaded {added} native roots");
    Some(Arc::new(config))
}
