//! # Runtime
//!
//! Drives a [`Controller`] from async code.
//!
//! The runtime is a single tokio task that owns the controller. Commands
//! arrive on an mpsc channel and are handled one at a time. Each
//! `FetchRequest` the controller emits runs in its own spawned task and
//! reports back on a completion channel, so a slow network call never
//! blocks command handling. Ordering is left to the controller's ticket
//! sequence: whichever response arrives, only the latest request applies.
//!
//! Callers talk to the runtime through a cloneable [`RuntimeHandle`]. The
//! task stops once every handle is dropped; await its [`RuntimeTask`] to
//! be sure unsaved favorites were retried before the process exits.

use crate::remote::MovieApi;
use marquee_core::{
    Catalog, Command, Completion, Controller, FetchError, FetchKind, FetchRequest, Movie, Ticket,
    View,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 64;

/// Errors returned by a [`RuntimeHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime task has stopped.
    #[error("runtime has stopped")]
    Closed,
}

enum Message {
    Dispatch(Command, oneshot::Sender<View>),
    View(oneshot::Sender<View>),
    Favorites(oneshot::Sender<Vec<Movie>>),
    Settled(oneshot::Sender<View>),
}

type FetchOutcome = (Ticket, Result<Catalog, FetchError>);

// =============================================================================
// HANDLE
// =============================================================================

/// Cloneable handle to a running runtime.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    tx: mpsc::Sender<Message>,
}

impl RuntimeHandle {
    /// Apply a command and return the resulting view.
    ///
    /// Returns as soon as the command is handled; a fetch it starts keeps
    /// running and the view reports `loading: true`.
    pub async fn dispatch(&self, command: Command) -> Result<View, RuntimeError> {
        self.request(|reply| Message::Dispatch(command, reply)).await
    }

    /// Current view.
    pub async fn view(&self) -> Result<View, RuntimeError> {
        self.request(Message::View).await
    }

    /// Favorite movies among the known catalogs.
    pub async fn favorite_movies(&self) -> Result<Vec<Movie>, RuntimeError> {
        self.request(Message::Favorites).await
    }

    /// View once no fetch is outstanding.
    pub async fn settled(&self) -> Result<View, RuntimeError> {
        self.request(Message::Settled).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Message,
    ) -> Result<T, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| RuntimeError::Closed)?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }
}

/// The spawned runtime task.
#[derive(Debug)]
pub struct RuntimeTask(JoinHandle<()>);

impl RuntimeTask {
    /// Wait until the runtime has stopped and flushed favorites.
    ///
    /// Only returns after every [`RuntimeHandle`] is dropped.
    pub async fn join(self) {
        if let Err(e) = self.0.await {
            tracing::warn!(error = %e, "runtime task did not finish cleanly");
        }
    }
}

// =============================================================================
// RUNTIME
// =============================================================================

/// The task that owns the controller.
pub struct Runtime<A: MovieApi> {
    controller: Controller,
    api: Arc<A>,
    commands: mpsc::Receiver<Message>,
    completions_tx: mpsc::UnboundedSender<FetchOutcome>,
    completions: mpsc::UnboundedReceiver<FetchOutcome>,
    waiters: Vec<oneshot::Sender<View>>,
}

impl<A: MovieApi> Runtime<A> {
    /// Start the runtime on the current tokio runtime, detached.
    ///
    /// It stops once every handle is dropped.
    pub fn spawn(controller: Controller, api: A) -> RuntimeHandle {
        Self::start(controller, api).0
    }

    /// Start the runtime and keep its task for joining at shutdown.
    pub fn start(controller: Controller, api: A) -> (RuntimeHandle, RuntimeTask) {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions) = mpsc::unbounded_channel();

        let runtime = Self {
            controller,
            api: Arc::new(api),
            commands,
            completions_tx,
            completions,
            waiters: Vec::new(),
        };
        let task = tokio::spawn(runtime.run());

        (RuntimeHandle { tx }, RuntimeTask(task))
    }

    async fn run(mut self) {
        tracing::debug!("runtime started");
        loop {
            tokio::select! {
                message = self.commands.recv() => match message {
                    Some(message) => self.handle(message),
                    None => break,
                },
                Some((ticket, result)) = self.completions.recv() => {
                    self.complete(ticket, result);
                }
            }
        }

        if let Err(e) = self.controller.flush_favorites() {
            tracing::warn!(error = %e, "favorites not saved at shutdown");
        }
        tracing::debug!("runtime stopped");
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Dispatch(command, reply) => {
                if let Some(request) = self.controller.dispatch(command) {
                    self.fetch(request);
                }
                let _ = reply.send(self.controller.view());
                self.wake_settled();
            }
            Message::View(reply) => {
                let _ = reply.send(self.controller.view());
            }
            Message::Favorites(reply) => {
                let _ = reply.send(self.controller.favorite_movies());
            }
            Message::Settled(reply) => {
                if self.controller.is_loading() {
                    self.waiters.push(reply);
                } else {
                    let _ = reply.send(self.controller.view());
                }
            }
        }
    }

    fn fetch(&self, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.completions_tx.clone();
        let FetchRequest { ticket, kind } = request;

        tracing::debug!(ticket = ticket.value(), ?kind, "fetch started");
        tokio::spawn(async move {
            let result = match kind {
                FetchKind::Popular => api.popular_movies().await,
                FetchKind::Search(query) => api.search_movies(&query).await,
            };
            // The runtime may be gone; the result is then irrelevant.
            let _ = tx.send((ticket, result));
        });
    }

    fn complete(&mut self, ticket: Ticket, result: Result<Catalog, FetchError>) {
        match self.controller.complete(ticket, result) {
            Completion::Applied { count } => {
                tracing::info!(ticket = ticket.value(), count, "catalog updated");
            }
            Completion::BaseUpdated { count } => {
                tracing::info!(ticket = ticket.value(), count, "base catalog updated");
            }
            Completion::Stale => {}
            Completion::Failed => {
                tracing::info!(ticket = ticket.value(), "keeping previous catalog");
            }
        }
        self.wake_settled();
    }

    fn wake_settled(&mut self) {
        if self.controller.is_loading() || self.waiters.is_empty() {
            return;
        }
        let view = self.controller.view();
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(view.clone());
        }
    }
}
