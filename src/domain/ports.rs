// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}
