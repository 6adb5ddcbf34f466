use gpuscope_common::{GpuMetrics, GpuNode, GpuUtilization, HealthStatus};

use crate::filter::Summary;

pub fn print_health(status: &HealthStatus) {
    println!("✓ API {} (version {}, {})", status.status, status.version, status.timestamp);
}

pub fn print_metrics(metrics: &[GpuMetrics], summary: &Summary) {
    println!("\n=== GPU Metrics ===\n");
    if metrics.is_empty() {
        println!("No GPUs matched.");
        return;
    }
    println!(
        "{:<20} {:>4} {:<24} {:>7} {:>17} {:>7} {:>6} {:>15}",
        "Node", "GPU", "Model", "Util%", "Memory (GB)", "Mem%", "Temp", "Power (W)"
    );
    println!("{:-<110}", "");
    for g in metrics {
        println!(
            "{:<20} {:>4} {:<24} {:>7.1} {:>17} {:>7.1} {:>6.0} {:>15}",
            truncate(&g.node_name, 20),
            g.gpu_index,
            truncate(if g.gpu_name.is_empty() { "-" } else { &g.gpu_name }, 24),
            g.utilization,
            format!("{:.1}/{:.1}", g.memory_used, g.memory_total),
            g.memory_utilization,
            g.temperature,
            format!("{:.0}/{:.0}", g.power_draw, g.power_limit),
        );
    }
    println!(
        "\n{} GPUs, {} active, avg utilization {:.1}%, {} above 80°C",
        summary.total, summary.active, summary.avg_utilization, summary.hot
    );
    if let Some(first) = metrics.first() {
        println!("as of {}", first.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!();
}

pub fn print_nodes(nodes: &[GpuNode]) {
    println!("\n=== GPU Nodes ===\n");
    if nodes.is_empty() {
        println!("No GPU nodes found.");
        return;
    }
    println!("{:<30} {:>6}  {}", "Node", "GPUs", "Models");
    println!("{:-<80}", "");
    for n in nodes {
        println!(
            "{:<30} {:>6}  {}",
            n.node_name,
            n.gpu_count,
            n.gpu_models.join(", ")
        );
    }
    println!();
}

pub fn print_utilization(samples: &[GpuUtilization]) {
    println!("\n=== GPU Utilization ===\n");
    if samples.is_empty() {
        println!("No samples.");
        return;
    }
    println!("{:<30} {:>4} {:>10}", "Node", "GPU", "Util%");
    println!("{:-<46}", "");
    for s in samples {
        println!("{:<30} {:>4} {:>10}", s.node, s.gpu_index, s.utilization);
    }
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("NVIDIA A100-SXM4-80GB", 10), "NVIDIA A1…");
        assert_eq!(truncate("NVIDIA A100-SXM4-80GB", 10).chars().count(), 10);
    }
}
