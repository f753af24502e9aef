use serde::Serialize;

/// Ensures the route plan is requested once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchGate {
    #[default]
    NotStarted,
    Loading,
    Done,
}

impl FetchGate {
    /// Moves `NotStarted` to `Loading`. Returns `false` when a fetch already
    /// started, in which case the caller must not issue another one.
    pub fn try_start(&mut self) -> bool {
        match self {
            FetchGate::NotStarted => {
                *self = FetchGate::Loading;
                true
            }
            FetchGate::Loading | FetchGate::Done => false,
        }
    }

    pub fn finish(&mut self) {
        *self = FetchGate::Done;
    }

    pub fn reset(&mut self) {
        *self = FetchGate::NotStarted;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchGate::Loading)
    }
}
