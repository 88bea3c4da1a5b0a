//! HTTP transport: updates come in as JSON, replies go back in the response
//! body, out-of-band deliveries stream over SSE.

use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

use ginga_engine::round::PlayerId;
use ginga_store::{Ledger, StoreError};

use crate::dispatcher::{Dispatcher, DispatcherConfig};
use crate::events::DeliveryBus;
use crate::global_round::GlobalRoundHandle;
use crate::handlers;
use crate::settings::{Settings, SettingsError};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    ledger: Arc<Ledger>,
    bus: Arc<DeliveryBus>,
    dispatcher: Arc<Dispatcher>,
}

impl AppContext {
    /// Opens the database named in `settings` and wires the dispatcher to the
    /// SSE delivery bus.
    pub fn from_settings(settings: &Settings) -> Result<Self, ServerError> {
        settings.validate()?;
        let ledger =
            Arc::new(Ledger::open(&settings.database_path)?.with_daily_bonus(settings.daily_bonus));
        let config = ServerConfig::new(settings.host.clone(), settings.port);
        Ok(Self::new_with_dependencies(
            config,
            DispatcherConfig::from_settings(settings),
            ledger,
        ))
    }

    pub fn new_with_dependencies(
        config: ServerConfig,
        dispatcher_config: DispatcherConfig,
        ledger: Arc<Ledger>,
    ) -> Self {
        let bus = Arc::new(DeliveryBus::new());
        let dispatcher = Arc::new(Dispatcher::new(
            dispatcher_config,
            Arc::clone(&ledger),
            Arc::new(GlobalRoundHandle::new()),
            Arc::clone(&bus) as Arc<dyn crate::events::Outbox>,
        ));
        Self {
            config,
            ledger,
            bus,
            dispatcher,
        }
    }

    /// In-memory database, ephemeral port, user 1 as admin.
    pub fn new_for_tests() -> Result<Self, ServerError> {
        let settings = Settings {
            admin_id: Some(1),
            seed: Some(7),
            ..Settings::default()
        };
        let ledger = Arc::new(Ledger::open_in_memory()?);
        Ok(Self::new_with_dependencies(
            ServerConfig::for_tests(),
            DispatcherConfig::from_settings(&settings),
            ledger,
        ))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn ledger(&self) -> Arc<Ledger> {
        Arc::clone(&self.ledger)
    }

    pub fn bus(&self) -> Arc<DeliveryBus> {
        Arc::clone(&self.bus)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct BotServer {
    context: AppContext,
}

impl BotServer {
    pub fn new(settings: &Settings) -> Result<Self, ServerError> {
        Ok(Self {
            context: AppContext::from_settings(settings)?,
        })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let BotServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(%addr, "bot server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::Config(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs
            .next()
            .ok_or_else(|| ServerError::Config(format!("failed to resolve address `{candidate}`")))
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        // warp wraps a hyper error that wraps the listener's io error
        if let Some(io_err) = std::iter::successors(err.source(), |&e| e.source())
            .find_map(|source| source.downcast_ref::<std::io::Error>())
        {
            return ServerError::Bind(std::io::Error::new(io_err.kind(), io_err.to_string()));
        }

        ServerError::Config(err.to_string())
    }

    fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .and(Self::with_context(context.clone()))
            .map(|context: AppContext| handlers::health(&context).into_response());

        health
            .or(Self::update_routes(context))
            .unify()
            .or(Self::user_routes(context))
            .unify()
            .boxed()
    }

    fn update_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        warp::path!("api" / "updates")
            .and(warp::post())
            .and(warp::body::content_length_limit(64 * 1024))
            .and(warp::body::bytes())
            .and(Self::with_dispatcher(context.dispatcher()))
            .and_then(|body: Bytes, dispatcher: Arc<Dispatcher>| async move {
                Ok::<_, Infallible>(handlers::post_update(dispatcher, body).await)
            })
            .boxed()
    }

    fn user_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let profile = warp::path!("api" / "users" / PlayerId / "profile")
            .and(warp::get())
            .and(Self::with_ledger(context.ledger()))
            .and_then(|user: PlayerId, ledger: Arc<Ledger>| async move {
                Ok::<_, Infallible>(handlers::get_profile(ledger, user).await)
            });

        let events = warp::path!("api" / "users" / PlayerId / "events")
            .and(warp::get())
            .and(Self::with_bus(context.bus()))
            .and_then(|user: PlayerId, bus: Arc<DeliveryBus>| async move {
                Ok::<_, Infallible>(handlers::stream_deliveries(user, bus).await)
            });

        profile.or(events).unify().boxed()
    }

    fn with_context(
        context: AppContext,
    ) -> impl Filter<Extract = (AppContext,), Error = Infallible> + Clone {
        warp::any().map(move || context.clone())
    }

    fn with_dispatcher(
        dispatcher: Arc<Dispatcher>,
    ) -> impl Filter<Extract = (Arc<Dispatcher>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&dispatcher))
    }

    fn with_ledger(
        ledger: Arc<Ledger>,
    ) -> impl Filter<Extract = (Arc<Ledger>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&ledger))
    }

    fn with_bus(
        bus: Arc<DeliveryBus>,
    ) -> impl Filter<Extract = (Arc<DeliveryBus>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&bus))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::Config(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
