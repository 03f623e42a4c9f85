/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::client
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Facade owning notifier configuration and session data;
    exposes `notify`, which builds one event and sends it.

  Security / Safety Notes:
    The API key is read at send time and only ever placed in
    the payload body.

  Dependencies:
    Internal modules only; transport is injectable.

  Operational Scope:
    Entry point for applications reporting errors.

  Revision History:
    2026-10-16 COD  Authored notifier client facade.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Synchronous, single-attempt delivery
    - Silent suppression outside notify release stages
    - Typed failures propagated to the caller
============================================================*/

use std::collections::BTreeSet;
use std::error::Error;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::{NotifierConfig, NotifierSettings};
use crate::error::Result;
use crate::event::{build_event, BaseData, ErrorBatch, MetaData};
use crate::logger::Logger;
use crate::payload::{build_payload, NotifierInfo, NOTIFIER};
use crate::transport::{endpoint, send_payload, HttpTransport, ReqwestTransport};

/// Error-reporting client for the Bugsnag notify endpoint.
///
/// Setters take `&mut self` and return it so calls can be chained; `notify`
/// takes `&self`, so configuration cannot change while a send is in flight.
pub struct Client {
    config: NotifierConfig,
    base: BaseData,
    transport: Option<Box<dyn HttpTransport>>,
    /// Built on first send when no transport is injected; reset by `set_timeout`.
    default_transport: OnceLock<ReqwestTransport>,
    logger: Arc<Logger>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("use_ssl", &self.config.use_ssl)
            .field("notify_release_stages", &self.config.notify_release_stages)
            .field("base", &self.base)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl Client {
    /// Client reporting over plain HTTP for the `production` stage only.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(NotifierConfig::new(api_key), BaseData::default())
    }

    pub fn with_config(config: NotifierConfig, base: BaseData) -> Self {
        Self {
            config,
            base,
            transport: None,
            default_transport: OnceLock::new(),
            logger: Arc::new(Logger::quiet()),
        }
    }

    /// Build a client from loaded settings; fails without an API key.
    pub fn from_settings(settings: NotifierSettings) -> Result<Self> {
        let (config, base) = settings.into_parts()?;
        Ok(Self::with_config(config, base))
    }

    /// Report one error, or a batch of related errors, as a single event.
    ///
    /// Returns `Ok(())` without sending anything when the release stage is
    /// set and not in the notify list.
    pub fn notify(&self, errors: impl Into<ErrorBatch>, meta_data: MetaData) -> Result<()> {
        let errors = errors.into();
        let stage = self.base.release_stage.as_deref();
        if !self.config.should_notify(stage) {
            self.logger.debug(
                "SKIP",
                format!(
                    "Release stage {} not in notify stages; event dropped",
                    stage.unwrap_or_default()
                ),
            );
            return Ok(());
        }

        let body = self.render(&errors, meta_data)?;
        let url = self.endpoint();
        self.logger.debug(
            "NOTIFY",
            format!(
                "Sending {} exception(s), {} bytes to {url}",
                errors.len(),
                body.len()
            ),
        );

        let outcome = match &self.transport {
            Some(transport) => send_payload(transport.as_ref(), &url, body),
            None => send_payload(self.default_transport()?, &url, body),
        };

        match &outcome {
            Ok(()) => self.logger.info("NOTIFY", "Event accepted"),
            Err(err) => self.logger.warn("HTTP", format!("Notification failed: {err}")),
        }
        outcome
    }

    /// Report a typed error together with every error in its `source()` chain.
    pub fn notify_error<E: Error + 'static>(&self, err: &E, meta_data: MetaData) -> Result<()> {
        self.notify(ErrorBatch::from_error_chain(err), meta_data)
    }

    /// Serialised payload `notify` would send, ignoring the release stage.
    pub fn build_payload(
        &self,
        errors: impl Into<ErrorBatch>,
        meta_data: MetaData,
    ) -> Result<Vec<u8>> {
        self.render(&errors.into(), meta_data)
    }

    fn default_transport(&self) -> Result<&ReqwestTransport> {
        if let Some(transport) = self.default_transport.get() {
            return Ok(transport);
        }
        let built = ReqwestTransport::new(self.config.timeout)?;
        Ok(self.default_transport.get_or_init(|| built))
    }

    fn render(&self, errors: &ErrorBatch, meta_data: MetaData) -> Result<Vec<u8>> {
        let event = build_event(&self.base, errors, meta_data);
        build_payload(&self.config.api_key, event)
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn base_data(&self) -> &BaseData {
        &self.base
    }

    pub fn notify_release_stages(&self) -> &BTreeSet<String> {
        &self.config.notify_release_stages
    }

    /// URL notifications are posted to.
    pub fn endpoint(&self) -> String {
        endpoint(self.config.use_ssl)
    }

    pub fn notifier_info(&self) -> NotifierInfo {
        NOTIFIER
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) -> &mut Self {
        self.config.api_key = api_key.into();
        self
    }

    pub fn set_user_id(&mut self, value: impl Into<String>) -> &mut Self {
        self.base.user_id = Some(value.into());
        self
    }

    pub fn set_app_version(&mut self, value: impl Into<String>) -> &mut Self {
        self.base.app_version = Some(value.into());
        self
    }

    pub fn set_os_version(&mut self, value: impl Into<String>) -> &mut Self {
        self.base.os_version = Some(value.into());
        self
    }

    pub fn set_release_stage(&mut self, value: impl Into<String>) -> &mut Self {
        self.base.release_stage = Some(value.into());
        self
    }

    pub fn set_context(&mut self, value: impl Into<String>) -> &mut Self {
        self.base.context = Some(value.into());
        self
    }

    /// Replace the release stages events are sent for.
    pub fn set_notify_release_stages<I, S>(&mut self, stages: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.notify_release_stages = stages.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_use_ssl(&mut self, use_ssl: bool) -> &mut Self {
        self.config.use_ssl = use_ssl;
        self
    }

    /// Timeout for the default transport; injected transports ignore it.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.timeout = timeout;
        self.default_transport = OnceLock::new();
        self
    }

    pub fn set_transport(&mut self, transport: impl HttpTransport + 'static) -> &mut Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn set_logger(&mut self, logger: Arc<Logger>) -> &mut Self {
        self.logger = logger;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::NotifierError;
    use crate::exception::RawError;
    use crate::transport::HttpResponse;

    #[derive(Default)]
    struct Counting {
        calls: Mutex<usize>,
    }

    impl HttpTransport for Counting {
        fn post(
            &self,
            _url: &str,
            _headers: &[(&str, &str)],
            _body: Vec<u8>,
        ) -> Result<HttpResponse> {
            *self.calls.lock().unwrap() += 1;
            Ok(HttpResponse::new(200, "OK"))
        }
    }

    struct Refusing;

    impl HttpTransport for Refusing {
        fn post(
            &self,
            url: &str,
            _headers: &[(&str, &str)],
            _body: Vec<u8>,
        ) -> Result<HttpResponse> {
            Err(NotifierError::Transport(format!("POST {url} connection failed")))
        }
    }

    fn boom() -> RawError {
        RawError::native("Panic", "boom", vec![])
    }

    #[test]
    fn setters_update_base_data() {
        let mut client = Client::new("key");
        client
            .set_user_id("u-9")
            .set_app_version("3.1.0")
            .set_os_version("linux 6.8")
            .set_context("checkout")
            .set_release_stage("production");
        let base = client.base_data();
        assert_eq!(base.user_id.as_deref(), Some("u-9"));
        assert_eq!(base.app_version.as_deref(), Some("3.1.0"));
        assert_eq!(base.os_version.as_deref(), Some("linux 6.8"));
        assert_eq!(base.context.as_deref(), Some("checkout"));
        assert_eq!(base.release_stage.as_deref(), Some("production"));
    }

    #[test]
    fn default_transport_is_reused_until_timeout_changes() {
        let mut client = Client::new("key");
        let first: *const ReqwestTransport = client.default_transport().unwrap();
        let second: *const ReqwestTransport = client.default_transport().unwrap();
        assert!(std::ptr::eq(first, second));

        client.set_timeout(Duration::from_secs(3));
        assert!(client.default_transport.get().is_none());
        assert!(client.default_transport().is_ok());
    }

    #[test]
    fn endpoint_switches_with_ssl() {
        let mut client = Client::new("key");
        assert_eq!(client.endpoint(), "http://notify.bugsnag.com");
        client.set_use_ssl(true);
        assert_eq!(client.endpoint(), "https://notify.bugsnag.com");
    }

    #[test]
    fn suppressed_stage_skips_transport() {
        let transport = Arc::new(Counting::default());
        let mut client = Client::new("key");
        client
            .set_release_stage("development")
            .set_transport(transport.clone());
        client.notify(boom(), MetaData::new()).unwrap();
        assert_eq!(*transport.calls.lock().unwrap(), 0);
    }

    #[test]
    fn custom_stage_list_is_honoured() {
        let transport = Arc::new(Counting::default());
        let mut client = Client::new("key");
        client
            .set_release_stage("staging")
            .set_notify_release_stages(["staging", "production"])
            .set_transport(transport.clone());
        client.notify(boom(), MetaData::new()).unwrap();
        assert_eq!(*transport.calls.lock().unwrap(), 1);
    }

    #[test]
    fn unset_stage_always_sends() {
        let transport = Arc::new(Counting::default());
        let mut client = Client::new("key");
        client.set_transport(transport.clone());
        client.notify(boom(), MetaData::new()).unwrap();
        assert_eq!(*transport.calls.lock().unwrap(), 1);
    }

    #[test]
    fn transport_failure_is_surfaced() {
        let mut client = Client::new("key");
        client.set_transport(Refusing);
        let err = client.notify(boom(), MetaData::new()).unwrap_err();
        assert!(matches!(err, NotifierError::Transport(_)));
    }

    #[test]
    fn from_settings_requires_api_key() {
        assert!(Client::from_settings(NotifierSettings::default()).is_err());
        let settings = NotifierSettings {
            api_key: Some("abc".into()),
            ..NotifierSettings::default()
        };
        let client = Client::from_settings(settings).unwrap();
        assert_eq!(client.api_key(), "abc");
        assert!(client.notify_release_stages().contains("production"));
    }
}
