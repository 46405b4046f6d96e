use printhub_queue::QueueService;

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub service: QueueService,
}

impl AppState {
    pub fn new(service: QueueService) -> Self {
        Self { service }
    }
}
