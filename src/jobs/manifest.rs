use std::path::Path;

use crate::error::Result;
use crate::models::JobSpec;

/// Write one CSV row per job: index, config path, model path.
pub fn write_manifest(jobs: &[JobSpec], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["job", "config", "model"])?;
    for job in jobs {
        wtr.write_record([
            job.index.to_string(),
            job.config_path.display().to_string(),
            job.model_path.display().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_rows() {
        let dir = TempDir::new().unwrap();
        let jobs = vec![JobSpec {
            index: 1,
            config_path: PathBuf::from("runs/1.config"),
            model_path: PathBuf::from("models/model1"),
            command: String::new(),
        }];
        let path = dir.path().join("jobs.csv");
        write_manifest(&jobs, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "job,config,model\n1,runs/1.config,models/model1\n");
    }
}
