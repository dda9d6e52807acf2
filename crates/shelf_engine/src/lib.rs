//! Shelf engine: request pipeline, I/O runtime and screen hosting.
pub mod api;
pub mod codec;
mod controller;
mod engine;
mod image;
mod persist;
pub mod request;
mod store;
mod transport;

pub use codec::WireRequest;
pub use controller::ScreenController;
pub use engine::{Delivery, Engine, EngineEvent, Interest, Reply};
pub use image::{encode_base64, ImageLoader, ReqwestImageLoader, BASE64_LINE_WIDTH};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use request::{HttpMethod, PageQuery, RequestDescriptor, RequestParams};
pub use store::{FileStore, MemoryStore, SecureStore, StoreError, TOKEN_KEY};
pub use transport::{ApiClient, ClientSettings, ReqwestTransport, Transport};
