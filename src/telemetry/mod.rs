//! Telemetry system for kyccheck
//!
//! Collects per-run events (documents processed, verdicts, API latency) and
//! prints a summary at the end of a batch.

use colored::Colorize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    DocumentStarted {
        path: String,
        timestamp: Instant,
    },
    DocumentValidated {
        path: String,
        passed: bool,
        timestamp: Instant,
    },
    DocumentErrored {
        path: String,
        error: String,
        timestamp: Instant,
    },
    ApiCall {
        operation: String,
        duration_ms: u64,
        success: bool,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default)]
pub struct TelemetryStats {
    pub documents_started: usize,
    pub documents_passed: usize,
    pub documents_failed: usize,
    pub documents_errored: usize,
    pub api_calls: usize,
    pub api_failures: usize,
    pub api_time_ms: u64,
}

/// Telemetry collector
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = self.stats.lock().unwrap_or_else(|e| e.into_inner());
            match &event {
                TelemetryEvent::DocumentStarted { .. } => {
                    stats.documents_started += 1;
                }
                TelemetryEvent::DocumentValidated { passed, .. } => {
                    if *passed {
                        stats.documents_passed += 1;
                    } else {
                        stats.documents_failed += 1;
                    }
                }
                TelemetryEvent::DocumentErrored { .. } => {
                    stats.documents_errored += 1;
                }
                TelemetryEvent::ApiCall {
                    duration_ms,
                    success,
                    ..
                } => {
                    stats.api_calls += 1;
                    stats.api_time_ms += duration_ms;
                    if !*success {
                        stats.api_failures += 1;
                    }
                }
            }
        }

        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        self.stats.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let start = events.len().saturating_sub(n);
        events[start..].to_vec()
    }

    /// Share of validated documents that passed
    pub fn pass_rate(&self) -> f64 {
        let stats = self.get_stats();
        let total = stats.documents_passed + stats.documents_failed;
        if total == 0 {
            0.0
        } else {
            stats.documents_passed as f64 / total as f64
        }
    }

    /// Mean API call latency in milliseconds
    pub fn mean_api_latency_ms(&self) -> f64 {
        let stats = self.get_stats();
        if stats.api_calls == 0 {
            0.0
        } else {
            stats.api_time_ms as f64 / stats.api_calls as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple telemetry display
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    verbosity: crate::cli::Verbosity,
}

impl TelemetryDisplay {
    /// Create a new display
    pub fn new(collector: TelemetryCollector, verbosity: crate::cli::Verbosity) -> Self {
        Self {
            collector,
            verbosity,
        }
    }

    /// Display summary statistics on stderr so stdout stays pure JSON
    pub fn display_summary(&self) {
        if !self.verbosity.show_progress() {
            return;
        }

        let stats = self.collector.get_stats();
        let elapsed = self.collector.elapsed();

        eprintln!("\n{}", "Run Summary".bold());
        eprintln!("─────────────────────────────────────");
        eprintln!("Duration:          {:.2}s", elapsed.as_secs_f64());
        eprintln!("Documents:         {}", stats.documents_started);
        eprintln!("Passed:            {}", stats.documents_passed.to_string().green());
        eprintln!("Failed:            {}", stats.documents_failed.to_string().red());
        eprintln!("Errored:           {}", stats.documents_errored.to_string().yellow());
        eprintln!("Pass rate:         {:.1}%", self.collector.pass_rate() * 100.0);
        eprintln!(
            "API calls:         {} ({} failed, mean {:.0}ms)",
            stats.api_calls,
            stats.api_failures,
            self.collector.mean_api_latency_ms()
        );
        eprintln!();
    }
}
