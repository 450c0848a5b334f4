// src/progress.rs
/// Lightweight progress reporting for the long-running crawl.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one character was fully scraped and persisted.
    fn item_done(&mut self, _id: &str) {}

    /// Called when one character had to be skipped.
    fn item_failed(&mut self, _id: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Line-per-item console sink for the CLI.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, id: &str) {
        self.done += 1;
        println!("[{}/{}] {} ok", self.done, self.total, id);
    }

    fn item_failed(&mut self, id: &str) {
        self.done += 1;
        println!("[{}/{}] {} FAILED (see log)", self.done, self.total, id);
    }
}
