use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::types::GraphSnapshot;
use std::path::Path;

impl DependencyGraph {
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let snapshot: GraphSnapshot = serde_json::from_str(data)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the snapshot next to `path` and atomically move it into place
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&self.to_snapshot())?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        log::info!(
            "Saved dependency graph to {:?} ({} nodes, {} edges)",
            path,
            self.node_count(),
            self.edge_count()
        );
        Ok(())
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let snapshot: GraphSnapshot = serde_json::from_slice(&bytes)?;
        let graph = Self::from_snapshot(snapshot);

        log::info!(
            "Loaded dependency graph from {:?} ({} nodes, {} edges)",
            path,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}
