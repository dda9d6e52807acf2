/// Progress of a screen's network activity.
///
/// `Standby -> Loading -> Finished | Error`, and back to `Loading` on the next
/// operation. Only an explicit reset returns to `Standby`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkState<E> {
    Standby,
    Loading,
    Finished,
    Error(E),
}

impl<E> Default for NetworkState<E> {
    fn default() -> Self {
        NetworkState::Standby
    }
}

impl<E> NetworkState<E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, NetworkState::Loading)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, NetworkState::Finished)
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            NetworkState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Enters `Loading` unless already there. Returns `false` when the
    /// caller must not start another operation.
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = NetworkState::Loading;
        true
    }

    pub fn complete<T>(&mut self, result: &Result<T, E>)
    where
        E: Clone,
    {
        *self = match result {
            Ok(_) => NetworkState::Finished,
            Err(err) => NetworkState::Error(err.clone()),
        };
    }

    pub fn reset(&mut self) {
        *self = NetworkState::Standby;
    }
}
