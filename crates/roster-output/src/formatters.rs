use serde::Serialize;

use roster_types::*;

pub fn format_user(user: &User) -> String {
    format!("User: {} ({})", user.username(), user.email())
}

pub fn format_summary(count: usize) -> Vec<String> {
    vec![
        format!("Application version {}", VERSION),
        format!("Total users created: {}", count),
    ]
}

#[derive(Debug, Serialize)]
struct UserListing<'a> {
    version: &'static str,
    count: usize,
    users: &'a [User],
}

pub fn users_to_json(users: &[User]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&UserListing {
        version: VERSION,
        count: users.len(),
        users,
    })
}

pub fn format_function_stats(stats: &[FunctionStats]) -> Vec<String> {
    if stats.is_empty() {
        return Vec::new();
    }

    let name_width = stats
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("function".len());

    let mut lines = vec![format!(
        "  {:<name_width$}  {:>6}  {:>10}  {:>10}  {:>10}  {:>10}",
        "function", "calls", "total", "avg", "p90", "max"
    )];
    for s in stats {
        lines.push(format!(
            "  {:<name_width$}  {:>6}  {:>10}  {:>10}  {:>10}  {:>10}",
            s.name,
            s.calls,
            format_micros(s.total_us),
            format_micros(s.avg_us),
            format_micros(s.p90_us),
            format_micros(s.max_us),
        ));
    }
    lines
}

pub fn format_profiling(stats: &[FunctionStats]) -> String {
    let mut lines = vec!["TIMING".to_string()];
    lines.extend(format_function_stats(stats));
    lines.join("\n")
}

fn format_micros(us: u64) -> String {
    if us >= 1000 {
        format!("{:.2}ms", us as f64 / 1000.0)
    } else {
        format!("{}us", us)
    }
}
