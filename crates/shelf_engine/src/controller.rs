//! Hosts one screen: runs its pure update, carries out the effects it asks
//! for, and feeds engine results back in as messages.
//!
//! A controller lives on the consumer's thread. Results arrive over a
//! channel and are only applied from [`ScreenController::pump`] or
//! [`ScreenController::wait_for_event`], so every state change and listener
//! call happens on that thread.

use std::collections::VecDeque;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use shelf_core::{ApiError, Effect, Observable, Screen, ScreenError, Subscription};
use shelf_logging::{shelf_debug, shelf_error, shelf_warn};

use crate::engine::{Delivery, Engine, EngineEvent, Interest, Reply};
use crate::image::ImageLoader;
use crate::store::{SecureStore, TOKEN_KEY};

pub struct ScreenController<S: Screen> {
    state: Observable<S>,
    engine: Engine,
    store: Arc<dyn SecureStore>,
    reply_tx: mpsc::Sender<Delivery>,
    reply_rx: mpsc::Receiver<Delivery>,
    interest: Arc<Interest>,
    completed: bool,
}

impl<S: Screen> ScreenController<S> {
    pub fn new(initial: S, engine: Engine, store: Arc<dyn SecureStore>) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        Self {
            state: Observable::new(initial),
            engine,
            store,
            reply_tx,
            reply_rx,
            interest: Arc::new(Interest::new(0)),
            completed: false,
        }
    }

    pub fn state(&self) -> S {
        self.state.get()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.state.with(f)
    }

    /// The listener sees every later state until the subscription is dropped
    /// or a one-shot screen completes.
    pub fn subscribe(&self, listener: impl FnMut(&S) + 'static) -> Subscription {
        self.state.subscribe(listener)
    }

    /// True once a one-shot screen's request has finished successfully.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn dispatch(&mut self, msg: S::Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let (next, effects) = self.state.get().update(msg);
            let finished = S::ONE_SHOT && next.network().is_finished();
            self.state.set(next);

            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect) {
                    queue.push_back(follow_up);
                }
            }

            if finished && !self.completed {
                self.completed = true;
                self.state.close();
            }
        }
    }

    /// Applies every result already waiting. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(delivery) = self.reply_rx.try_recv() {
            if self.accept(delivery) {
                applied += 1;
            }
        }
        applied
    }

    /// Blocks until one result is applied or `timeout` passes.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.reply_rx.recv_timeout(remaining) {
                Ok(delivery) => {
                    if self.accept(delivery) {
                        return true;
                    }
                }
                Err(_) => return false,
            }
        }
    }

    /// Waits until the screen is no longer loading. False on timeout.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.with(|state| state.network().is_loading()) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.wait_for_event(remaining) {
                return false;
            }
        }
        true
    }

    /// Loads an image off-thread; the base64 result reaches screens that
    /// accept images as a message. Returns false if the engine is gone.
    pub fn load_image(&mut self, loader: Arc<dyn ImageLoader>, url: impl Into<String>) -> bool {
        let reply = self.reply();
        self.engine.load_image(url.into(), loader, reply)
    }

    fn reply(&self) -> Reply {
        Reply::new(self.reply_tx.clone(), &self.interest)
    }

    fn run_effect(&mut self, effect: Effect) -> Option<S::Msg> {
        match effect {
            Effect::Request(request) => {
                let token = if request.requires_auth() {
                    match self.read_token() {
                        Some(token) => Some(token),
                        None => {
                            shelf_warn!("no stored token; not sending authenticated request");
                            return Some(S::completed(Err(ScreenError::MissingCredential)));
                        }
                    }
                } else {
                    None
                };
                let reply = self.reply();
                if self.engine.call(request, token, reply) {
                    None
                } else {
                    shelf_error!("engine is not running");
                    Some(S::completed(Err(ScreenError::Api(ApiError::UrlRequest))))
                }
            }
            Effect::StoreToken(token) => {
                if let Err(err) = self.store.set(TOKEN_KEY, &token) {
                    shelf_error!("failed to store session token: {err}");
                }
                None
            }
            Effect::ClearToken => {
                if let Err(err) = self.store.remove(TOKEN_KEY) {
                    shelf_error!("failed to clear session token: {err}");
                }
                None
            }
            Effect::DiscardPending => {
                let next = self.interest.generation() + 1;
                self.interest = Arc::new(Interest::new(next));
                None
            }
        }
    }

    fn read_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                shelf_warn!("failed to read session token: {err}");
                None
            }
        }
    }

    fn accept(&mut self, delivery: Delivery) -> bool {
        if delivery.generation != self.interest.generation() {
            shelf_debug!("dropping stale result from generation {}", delivery.generation);
            return false;
        }
        let msg = match delivery.event {
            EngineEvent::CallCompleted(result) => Some(S::completed(result)),
            EngineEvent::ImageLoaded(Ok(encoded)) => S::image_encoded(encoded),
            EngineEvent::ImageLoaded(Err(err)) => {
                shelf_warn!("image load failed: {err}");
                None
            }
        };
        if let Some(msg) = msg {
            self.dispatch(msg);
        }
        true
    }
}
