use crate::screen::unexpected_outcome;
use crate::{ApiOutcome, ApiRequest, Effect, NetworkState, Screen, ScreenError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsState {
    pub network: NetworkState<ScreenError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsMsg {
    LogoutClicked,
    Completed(Result<ApiOutcome, ScreenError>),
}

pub fn update_settings(mut state: SettingsState, msg: SettingsMsg) -> (SettingsState, Vec<Effect>) {
    let effects = match msg {
        SettingsMsg::LogoutClicked => {
            if state.network.begin() {
                vec![Effect::Request(ApiRequest::Logout)]
            } else {
                Vec::new()
            }
        }
        SettingsMsg::Completed(result) => {
            let result = match result {
                Ok(ApiOutcome::LoggedOut) => Ok(()),
                Ok(_) => Err(unexpected_outcome()),
                Err(err) => Err(err),
            };
            state.network.complete(&result);
            match result {
                Ok(()) => vec![Effect::ClearToken],
                Err(_) => Vec::new(),
            }
        }
    };
    (state, effects)
}

impl Screen for SettingsState {
    type Msg = SettingsMsg;
    const ONE_SHOT: bool = true;

    fn update(self, msg: SettingsMsg) -> (Self, Vec<Effect>) {
        update_settings(self, msg)
    }

    fn completed(result: Result<ApiOutcome, ScreenError>) -> SettingsMsg {
        SettingsMsg::Completed(result)
    }

    fn network(&self) -> &NetworkState<ScreenError> {
        &self.network
    }
}
