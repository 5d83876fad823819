use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Per-space progress callbacks for export and import runs.
pub trait RunProgress: Send + Sync {
    fn on_start(&self, total: u64);
    fn on_space_done(&self, space_id: &str);
    fn on_space_failed(&self, space_id: &str);
    fn on_finish(&self);
}

/// No-op progress reporter for when progress isn't needed.
pub struct NoopProgress;

impl RunProgress for NoopProgress {
    fn on_start(&self, _total: u64) {}
    fn on_space_done(&self, _space_id: &str) {}
    fn on_space_failed(&self, _space_id: &str) {}
    fn on_finish(&self) {}
}

/// Terminal progress bar over spaces.
pub struct SpaceProgress {
    bar: ProgressBar,
    done: AtomicU64,
    failed: AtomicU64,
    start: Instant,
}

impl SpaceProgress {
    pub fn new(verb: &str) -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} spaces {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        bar.set_style(style);
        bar.set_prefix(verb.to_string());

        Self {
            bar,
            done: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

impl RunProgress for SpaceProgress {
    fn on_start(&self, total: u64) {
        self.bar.set_length(total);
    }

    fn on_space_done(&self, space_id: &str) {
        self.done.fetch_add(1, Ordering::Relaxed);
        self.bar.set_message(space_id.to_string());
        self.bar.inc(1);
    }

    fn on_space_failed(&self, space_id: &str) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.bar.set_message(format!("{} (failed)", space_id));
        self.bar.inc(1);
    }

    fn on_finish(&self) {
        self.bar.finish_with_message(format!(
            "{} {} spaces in {:.1}s ({} failed)",
            self.bar.prefix(),
            self.done(),
            self.start.elapsed().as_secs_f64(),
            self.failed()
        ));
    }
}
