use anyhow::{Context, Result};
use hf_survival::config::DEFAULT_MODEL_PATH;
use hf_survival::models::{Estimator, ModelArtifact};

fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());
    let artifact = ModelArtifact::load(&path)
        .with_context(|| format!("Failed to load model artifact {}", path))?;

    println!("Model: {} (format v{})", artifact.name, artifact.format_version);

    match &artifact.estimator {
        Estimator::LogisticRegression(m) => {
            println!("Estimator: logistic_regression (threshold {})", m.threshold);
            println!("Intercept: {}", m.intercept);
            println!("Scaled: {}", m.scaler.is_some());
        }
        Estimator::DecisionTree(t) => {
            println!("Estimator: decision_tree ({} nodes)", t.node_count());
        }
        Estimator::RandomForest(f) => {
            let nodes: usize = f.trees.iter().map(|t| t.node_count()).sum();
            println!("Estimator: random_forest ({} trees, {} nodes)", f.trees.len(), nodes);
        }
    }

    println!("Features:");
    for (idx, name) in artifact.feature_names.iter().enumerate() {
        match &artifact.estimator {
            Estimator::LogisticRegression(m) => println!("  {:>2}. {:<26} coef={:+.6}", idx, name, m.coefficients[idx]),
            _ => println!("  {:>2}. {}", idx, name),
        }
    }

    Ok(())
}
