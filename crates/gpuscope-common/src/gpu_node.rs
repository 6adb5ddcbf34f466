use serde::{Deserialize, Serialize};

/// A node that exposes at least one GPU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuNode {
    pub node_name: String,
    #[serde(default)]
    pub gpu_count: u32,

    /// Distinct GPU models in order of first appearance.
    #[serde(default)]
    pub gpu_models: Vec<String>,
}

impl GpuNode {
    pub fn new(node_name: &str) -> Self {
        Self {
            node_name: node_name.to_string(),
            gpu_count: 0,
            gpu_models: Vec::new(),
        }
    }

    /// Record a model name unless it is empty or already listed.
    pub fn add_model(&mut self, model: &str) {
        if model.is_empty() || self.gpu_models.iter().any(|m| m == model) {
            return;
        }
        self.gpu_models.push(model.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_model_keeps_first_appearance_order() {
        let mut node = GpuNode::new("n1");
        node.add_model("NVIDIA A100");
        node.add_model("Tesla V100");
        node.add_model("NVIDIA A100");
        node.add_model("");
        assert_eq!(node.gpu_models, vec!["NVIDIA A100", "Tesla V100"]);
    }
}
