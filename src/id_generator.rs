use std::sync::atomic::{AtomicUsize, Ordering};

// Shared by every payload so texture caches can key on it
static NEXT_PAYLOAD_ID: AtomicUsize = AtomicUsize::new(1);

pub fn generate_id() -> usize {
    NEXT_PAYLOAD_ID.fetch_add(1, Ordering::SeqCst)
}
