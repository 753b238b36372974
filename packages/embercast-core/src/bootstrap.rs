//! Service wiring for the bridge.
//!
//! Builds the HTTP client, renderer client, event subscriber, and engine,
//! and owns the background subscription-refresh task.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::engine::driver::StateListener;
use crate::engine::mailbox::EngineHandle;
use crate::engine::{spawn_engine, EngineDeps};
use crate::error::{EmbercastError, EmbercastResult};
use crate::media::MediaResolver;
use crate::protocol::SOAP_TIMEOUT_SECS;
use crate::queue::TrackQueue;
use crate::renderer::{EventSubscriber, RendererClient};
use crate::runtime::TokioSpawner;

/// External collaborators and configuration for [`bootstrap_bridge`].
pub struct BridgeDeps {
    /// IP address of the renderer to control.
    pub renderer_ip: String,
    /// Media resolution collaborator.
    pub resolver: Arc<dyn MediaResolver>,
    /// Upstream ordered-queue collaborator.
    pub queue: Arc<dyn TrackQueue>,
    /// Upstream status notification sink.
    pub listener: Arc<dyn StateListener>,
    /// Engine tunables.
    pub config: EngineConfig,
}

/// A wired bridge: running engine plus its renderer-facing services.
pub struct BridgeServices {
    /// Handle to the running engine.
    pub engine: EngineHandle,
    /// GENA subscription manager for the renderer.
    pub subscriber: Arc<EventSubscriber>,
    config: EngineConfig,
    tasks: CancellationToken,
}

/// Builds and starts the engine and renderer services.
///
/// Must be called from within a Tokio runtime. The GENA subscription is not
/// established here - call [`BridgeServices::start_event_subscription`] once
/// the callback server's URL is known.
pub fn bootstrap_bridge(deps: BridgeDeps) -> EmbercastResult<BridgeServices> {
    let BridgeDeps {
        renderer_ip,
        resolver,
        queue,
        listener,
        config,
    } = deps;

    config
        .validate()
        .map_err(EmbercastError::Configuration)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(SOAP_TIMEOUT_SECS))
        .build()
        .map_err(|e| EmbercastError::Internal(format!("HTTP client construction failed: {e}")))?;

    let device = Arc::new(RendererClient::new(client.clone(), renderer_ip.clone()));
    let subscriber = Arc::new(EventSubscriber::new(client, renderer_ip));

    let engine = spawn_engine(EngineDeps {
        device,
        resolver,
        queue,
        listener,
        config: config.clone(),
        spawner: TokioSpawner::current(),
    });

    Ok(BridgeServices {
        engine,
        subscriber,
        config,
        tasks: CancellationToken::new(),
    })
}

impl BridgeServices {
    /// Starts the GENA subscription and its periodic refresh task.
    ///
    /// The renderer delivers transport events to `callback_url`; the refresh
    /// loop renews the subscription (resubscribing after expiry) for the
    /// lifetime of the bridge.
    pub fn start_event_subscription(&self, callback_url: String) {
        let subscriber = Arc::clone(&self.subscriber);
        let cancel = self.tasks.child_token();
        let refresh_interval = Duration::from_secs(self.config.subscription_refresh_secs);

        tokio::spawn(async move {
            if let Err(e) = subscriber.ensure_subscribed(&callback_url).await {
                log::error!("[Bridge] Initial event subscription failed: {}", e);
            }

            let mut interval = tokio::time::interval(refresh_interval);
            interval.tick().await;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        match subscriber.ensure_subscribed(&callback_url).await {
                            Ok(()) => log::debug!("[Bridge] Renderer event subscription refreshed"),
                            Err(e) => log::warn!("[Bridge] Subscription refresh failed: {}", e),
                        }
                    }
                }
            }
        });
    }

    /// Gracefully stops background tasks, the subscription, and the engine.
    pub async fn shutdown(self) {
        self.tasks.cancel();
        self.subscriber.unsubscribe_all().await;
        self.engine.shutdown().await;
    }
}
