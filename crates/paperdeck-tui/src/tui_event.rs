use paperdeck_core::{FetchCommand, FetchError, Paper, RequestTicket};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Run one request against the papers API.
    Fetch(FetchCommand),
}

/// Events flowing from the backend fetch tasks to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    /// A request finished, successfully or not.
    PapersLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Paper>, FetchError>,
    },
}
