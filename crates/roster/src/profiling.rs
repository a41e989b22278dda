use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fastrace::collector::{Config as FastraceConfig, Reporter, SpanRecord};
use fastrace::prelude::*;
use roster_types::FunctionStats;

pub struct CollectingReporter {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
}

impl CollectingReporter {
    pub fn new() -> (Self, SpanCollector) {
        let spans = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                spans: spans.clone(),
            },
            SpanCollector { spans },
        )
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, spans: Vec<SpanRecord>) {
        if let Ok(mut collected) = self.spans.lock() {
            collected.extend(spans);
        }
    }
}

pub struct SpanCollector {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
}

impl SpanCollector {
    pub fn collect_and_aggregate(&self) -> Vec<FunctionStats> {
        let spans = match self.spans.lock() {
            Ok(mut collected) => std::mem::take(&mut *collected),
            Err(_) => return Vec::new(),
        };
        let durations = spans
            .into_iter()
            .map(|s| (simplify_name(&s.name), s.duration_ns / 1000));
        compute_function_stats(durations)
    }
}

/// Runs `f` under a root span and returns its result with per-function timings.
pub fn profiled<T>(name: &'static str, f: impl FnOnce() -> T) -> (T, Vec<FunctionStats>) {
    let (reporter, collector) = CollectingReporter::new();
    fastrace::set_reporter(reporter, FastraceConfig::default());

    let root = Span::root(name, SpanContext::random());
    let result = {
        let _guard = root.set_local_parent();
        f()
    };
    drop(root);
    fastrace::flush();

    (result, collector.collect_and_aggregate())
}

fn simplify_name(name: &str) -> String {
    let name = name
        .replace("::{{closure}}", "")
        .replace("roster_registry::", "")
        .replace("registry::", "")
        .replace("validation::", "");

    match name.rfind("::") {
        Some(pos) => name[pos + 2..].to_string(),
        None => name,
    }
}

fn compute_function_stats(
    durations: impl IntoIterator<Item = (String, u64)>,
) -> Vec<FunctionStats> {
    let mut by_name: HashMap<String, Vec<u64>> = HashMap::new();
    for (name, duration_us) in durations {
        by_name.entry(name).or_default().push(duration_us);
    }

    let mut stats: Vec<FunctionStats> = by_name
        .into_iter()
        .map(|(name, mut durations)| {
            durations.sort_unstable();
            let calls = durations.len() as u32;
            let total_us: u64 = durations.iter().sum();
            let avg_us = if calls > 0 {
                total_us / calls as u64
            } else {
                0
            };
            let p90_idx = ((durations.len() as f64 * 0.9).ceil() as usize).saturating_sub(1);
            let p90_us = durations.get(p90_idx).copied().unwrap_or(0);
            let max_us = durations.last().copied().unwrap_or(0);

            FunctionStats {
                name,
                calls,
                total_us,
                avg_us,
                p90_us,
                max_us,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_us.cmp(&a.total_us).then_with(|| a.name.cmp(&b.name)));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_name() {
        assert_eq!(
            simplify_name("roster_registry::registry::UserRegistry::find_user"),
            "find_user"
        );
        assert_eq!(simplify_name("demo"), "demo");
    }

    #[test]
    fn test_compute_function_stats() {
        let stats = compute_function_stats(vec![
            ("find_user".to_string(), 10),
            ("create_user".to_string(), 40),
            ("find_user".to_string(), 30),
            ("create_user".to_string(), 60),
        ]);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "create_user");
        assert_eq!(stats[0].calls, 2);
        assert_eq!(stats[0].total_us, 100);
        assert_eq!(stats[0].avg_us, 50);
        assert_eq!(stats[0].p90_us, 60);
        assert_eq!(stats[0].max_us, 60);
        assert_eq!(stats[1].name, "find_user");
        assert_eq!(stats[1].total_us, 40);
    }

    #[test]
    fn test_profiled_collects_registry_spans() {
        let (created, stats) = profiled("test", || {
            let mut registry = roster_registry::UserRegistry::new();
            registry.create_user("a", "a@example.com");
            registry.create_user("a", "a2@example.com");
            registry.user_count()
        });
        assert_eq!(created, 1);

        let calls = |name: &str| {
            stats
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.calls)
                .unwrap_or(0)
        };
        assert_eq!(calls("create_user"), 2);
        assert_eq!(calls("try_create_user"), 2);
        assert_eq!(calls("find_user"), 2);
        assert_eq!(calls("is_valid_email"), 1);
    }
}
