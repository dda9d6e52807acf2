use crate::{ApiOutcome, Effect, NetworkState, ScreenError};

/// A screen's pure state machine, as driven by a host controller.
pub trait Screen: Clone + 'static {
    type Msg;

    /// Mutation screens stop being observed once their request finishes.
    const ONE_SHOT: bool;

    fn update(self, msg: Self::Msg) -> (Self, Vec<Effect>);

    /// Wraps the result of this screen's request as a message.
    fn completed(result: Result<ApiOutcome, ScreenError>) -> Self::Msg;

    /// Wraps a base64-encoded image, for screens that accept one.
    fn image_encoded(_base64: String) -> Option<Self::Msg> {
        None
    }

    fn network(&self) -> &NetworkState<ScreenError>;
}

/// Any outcome other than the one a screen asked for means the response did
/// not have the expected shape.
pub(crate) fn unexpected_outcome() -> ScreenError {
    ScreenError::Api(crate::ApiError::JsonDecode)
}
