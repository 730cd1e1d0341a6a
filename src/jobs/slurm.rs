use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// Resource and queue settings for one array submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    pub job_name: String,
    /// Memory reservation per task, in MB.
    pub memory: u64,
    pub queue: String,
    /// Upper bound on concurrently running array tasks.
    pub max_parallel: usize,
    /// Extra `#SBATCH` lines copied verbatim into the header.
    pub extra_directives: Vec<String>,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            job_name: "BlueSTARR".to_string(),
            memory: 20000,
            queue: String::new(),
            max_parallel: 300,
            extra_directives: vec!["#SBATCH --exclusive".to_string()],
        }
    }
}

/// Turns an ordered list of job commands into a cluster submission script.
pub trait JobArrayWriter {
    /// Write the script into `dir` and return its path.
    fn write_array_script(
        &self,
        dir: &Path,
        commands: &[String],
        settings: &ClusterSettings,
    ) -> Result<PathBuf>;
}

/// Writes a single SLURM array script that dispatches on `$SLURM_ARRAY_TASK_ID`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlurmArrayWriter;

impl SlurmArrayWriter {
    pub fn render(&self, dir: &Path, commands: &[String], settings: &ClusterSettings) -> String {
        let mut header = vec![
            "#!/bin/bash".to_string(),
            format!("#SBATCH --job-name={}", settings.job_name),
        ];
        if !settings.queue.is_empty() {
            header.push(format!("#SBATCH --partition={}", settings.queue));
        }
        header.push(format!("#SBATCH --mem={}", settings.memory));
        header.push(format!(
            "#SBATCH --array=1-{}%{}",
            commands.len(),
            settings.max_parallel.max(1)
        ));
        header.push(format!("#SBATCH --output={}/%a.output", dir.display()));
        header.push(format!("#SBATCH --error={}/%a.output", dir.display()));
        header.extend(settings.extra_directives.iter().map(|l| l.trim_end().to_string()));

        let mut script = header.join("\n");
        script.push_str("\n\ncase \"$SLURM_ARRAY_TASK_ID\" in\n");
        for (i, command) in commands.iter().enumerate() {
            script.push_str(&format!("{})\n", i + 1));
            script.push_str(command);
            if !command.ends_with('\n') {
                script.push('\n');
            }
            script.push_str(";;\n");
        }
        script.push_str("esac\n");
        script
    }
}

impl JobArrayWriter for SlurmArrayWriter {
    fn write_array_script(
        &self,
        dir: &Path,
        commands: &[String],
        settings: &ClusterSettings,
    ) -> Result<PathBuf> {
        if commands.is_empty() {
            return Err(SweepError::InvalidInput(
                "no job commands to submit".to_string(),
            ));
        }

        let path = dir.join(format!("{}.slurm", settings.job_name));
        let mut out = BufWriter::new(File::create(&path)?);
        out.write_all(self.render(dir, commands, settings).as_bytes())?;
        out.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_header_and_dispatch() {
        let settings = ClusterSettings {
            queue: "gpu-common".to_string(),
            max_parallel: 2,
            ..Default::default()
        };
        let commands = vec!["echo one\n".to_string(), "echo two".to_string()];
        let script = SlurmArrayWriter.render(Path::new("/runs/a"), &commands, &settings);

        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains("#SBATCH --job-name=BlueSTARR\n"));
        assert!(script.contains("#SBATCH --partition=gpu-common\n"));
        assert!(script.contains("#SBATCH --mem=20000\n"));
        assert!(script.contains("#SBATCH --array=1-2%2\n"));
        assert!(script.contains("#SBATCH --output=/runs/a/%a.output\n"));
        assert!(script.contains("#SBATCH --exclusive\n"));
        assert!(script.contains("1)\necho one\n;;\n2)\necho two\n;;\nesac\n"));
    }

    #[test]
    fn test_header_without_queue() {
        let script = SlurmArrayWriter.render(
            Path::new("out"),
            &["true\n".to_string()],
            &ClusterSettings::default(),
        );

        assert!(!script.contains("--partition"));
        assert!(script.contains("#SBATCH --exclusive\n\ncase \"$SLURM_ARRAY_TASK_ID\" in\n1)\n"));
        assert_eq!(script.lines().filter(|l| l.starts_with("#SBATCH")).count(), 6);
    }

    #[test]
    fn test_write_into_directory() {
        let dir = TempDir::new().unwrap();
        let path = SlurmArrayWriter
            .write_array_script(dir.path(), &["true\n".to_string()], &ClusterSettings::default())
            .unwrap();

        assert_eq!(path, dir.path().join("BlueSTARR.slurm"));
        assert!(std::fs::read_to_string(path).unwrap().contains("#SBATCH --array=1-1%300"));
    }

    #[test]
    fn test_empty_command_list_rejected() {
        let dir = TempDir::new().unwrap();
        let result =
            SlurmArrayWriter.write_array_script(dir.path(), &[], &ClusterSettings::default());
        assert!(result.is_err());
    }
}
