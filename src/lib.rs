pub mod api; // JSON client for the legal-consultation backend
pub mod config;
pub mod export; // Downloadable session / transcript documents
pub mod format; // Pure answer-text formatter (markup + renderers)
pub mod metadata; // Confidence tiers and answer metadata display
pub mod refresh; // Cancellable periodic session refresh tasks
pub mod session; // Locally persisted session record
pub mod shell; // Interactive terminal front end
pub mod status; // System status display glue
pub mod suggestions; // Example legal queries
pub mod transcript; // Message model and in-memory transcript
pub mod view; // Conversation view: submit / state machine
