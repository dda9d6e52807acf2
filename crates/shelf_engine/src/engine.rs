use std::io;
use std::sync::{mpsc, Arc, Weak};
use std::thread;

use shelf_core::{ApiError, ApiOutcome, ApiRequest, ScreenError};
use shelf_logging::shelf_debug;

use crate::api;
use crate::image::{encode_base64, ImageLoader};
use crate::transport::ApiClient;

/// Results the engine hands back to a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CallCompleted(Result<ApiOutcome, ScreenError>),
    /// Base64 of the loaded image, wrapped for the book service.
    ImageLoaded(Result<String, ApiError>),
}

/// Held by a controller for as long as it wants results tagged with
/// `generation`. The engine only keeps a weak reference.
#[derive(Debug)]
pub struct Interest {
    generation: u64,
}

impl Interest {
    pub fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct Delivery {
    pub generation: u64,
    pub event: EngineEvent,
}

/// Return address for one unit of work.
#[derive(Debug, Clone)]
pub struct Reply {
    tx: mpsc::Sender<Delivery>,
    interest: Weak<Interest>,
    generation: u64,
}

impl Reply {
    pub fn new(tx: mpsc::Sender<Delivery>, interest: &Arc<Interest>) -> Self {
        Self {
            tx,
            interest: Arc::downgrade(interest),
            generation: interest.generation,
        }
    }

    fn deliver(self, event: EngineEvent) {
        if self.interest.upgrade().is_none() {
            shelf_debug!("discarding result for generation {}: no longer wanted", self.generation);
            return;
        }
        let _ = self.tx.send(Delivery {
            generation: self.generation,
            event,
        });
    }
}

enum EngineCommand {
    Call {
        request: ApiRequest,
        token: Option<String>,
        reply: Reply,
    },
    LoadImage {
        url: String,
        loader: Arc<dyn ImageLoader>,
        reply: Reply,
    },
}

/// Owns the async runtime on a dedicated thread. Cloning shares the thread.
#[derive(Clone)]
pub struct Engine {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl Engine {
    pub fn new(client: ApiClient) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("shelf-io")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let client = Arc::new(client);

        thread::Builder::new()
            .name("shelf-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command).await;
                    });
                }
                shelf_debug!("engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    /// Returns false when the engine thread is gone.
    pub fn call(&self, request: ApiRequest, token: Option<String>, reply: Reply) -> bool {
        self.cmd_tx
            .send(EngineCommand::Call {
                request,
                token,
                reply,
            })
            .is_ok()
    }

    pub fn load_image(&self, url: String, loader: Arc<dyn ImageLoader>, reply: Reply) -> bool {
        self.cmd_tx
            .send(EngineCommand::LoadImage { url, loader, reply })
            .is_ok()
    }
}

async fn handle_command(client: &ApiClient, command: EngineCommand) {
    match command {
        EngineCommand::Call {
            request,
            token,
            reply,
        } => {
            let result = api::execute(client, request, token.as_deref()).await;
            reply.deliver(EngineEvent::CallCompleted(result));
        }
        EngineCommand::LoadImage { url, loader, reply } => {
            let result = loader.load(&url).await.map(|bytes| encode_base64(&bytes));
            reply.deliver(EngineEvent::ImageLoaded(result));
        }
    }
}
