use std::collections::HashMap;
use std::path::Path;

use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use log::{debug, error, info};
use tokio::fs;

use super::{flatten, parent, Tree};

/// What happened to each file of a materialized tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

enum Outcome {
    Written(String),
    Skipped(String),
    Failed(String),
}

/// Writes every file of `tree` under `root`.
///
/// Each distinct parent directory is created once and every file write
/// waits for its own directory only; writes otherwise run concurrently.
/// Without `overwrite`, files that already exist are left untouched. A
/// failing write is logged and reported but never aborts its siblings.
pub async fn materialize(tree: &Tree, root: &Path, overwrite: bool) -> MaterializeReport {
    let files = flatten(tree);

    let mut directories: HashMap<&str, Shared<BoxFuture<'static, ()>>> = HashMap::new();
    for path in files.keys() {
        let directory = parent(path);
        directories.entry(directory).or_insert_with(|| {
            let target = root.join(directory);
            let label = directory.to_string();
            async move {
                info!("making directory {}", if label.is_empty() { "." } else { label.as_str() });
                if let Err(e) = fs::create_dir_all(&target).await {
                    debug!("Failed to create '{}': {e}", target.display());
                }
            }
            .boxed()
            .shared()
        });
    }

    let writes = files.iter().map(|(path, content)| {
        let directory_ready = directories.get(parent(path)).cloned();
        let target = root.join(path);
        async move {
            if let Some(directory_ready) = directory_ready {
                directory_ready.await;
            }

            if !overwrite && fs::try_exists(&target).await.unwrap_or(false) {
                debug!("skipping existing file {path}");
                return Outcome::Skipped(path.clone());
            }

            info!("writing file {path}");
            match fs::write(&target, content).await {
                Ok(()) => Outcome::Written(path.clone()),
                Err(e) => {
                    error!("Failed to write '{}': {e}", target.display());
                    Outcome::Failed(path.clone())
                }
            }
        }
    });

    let mut report = MaterializeReport::default();
    for outcome in join_all(writes).await {
        match outcome {
            Outcome::Written(path) => report.written.push(path),
            Outcome::Skipped(path) => report.skipped.push(path),
            Outcome::Failed(path) => report.failed.push(path),
        }
    }
    report
}
