use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

use swag_core::config::GeneratorConfig;
use swag_core::validate::Language;

/// One run of the external model generator over a filtered model file.
#[derive(Debug, Clone)]
pub struct GeneratorRun {
    pub command: String,
    pub model_path: PathBuf,
    pub lang: Language,
    pub src_dir: PathBuf,
    pub output_file: String,
}

impl GeneratorRun {
    pub fn new(config: &GeneratorConfig, model_path: &Path, lang: Language, src_dir: &Path) -> Self {
        Self {
            command: config.command.clone(),
            model_path: model_path.to_path_buf(),
            lang,
            src_dir: src_dir.to_path_buf(),
            output_file: format!("{}.{}", config.output_stem, lang),
        }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            self.model_path.display().to_string(),
            "--lang".to_string(),
            self.lang.to_string(),
            "--src".to_string(),
            self.src_dir.display().to_string(),
            "-o".to_string(),
            self.output_file.clone(),
        ]
    }

    /// The same run with the model path and source directory made absolute,
    /// so they still point at the right place once the generator starts in
    /// `src_dir`.
    pub fn resolved(&self) -> Result<GeneratorRun> {
        let absolute = |path: &Path| {
            std::path::absolute(path)
                .with_context(|| format!("failed to resolve {}", path.display()))
        };
        Ok(GeneratorRun {
            model_path: absolute(&self.model_path)?,
            src_dir: absolute(&self.src_dir)?,
            ..self.clone()
        })
    }

    /// Run the generator in `src_dir` and return the path of the emitted file.
    pub fn run(&self) -> Result<PathBuf> {
        let run = self.resolved()?;
        log::debug!("running {} {}", run.command, run.args().join(" "));
        let output = Command::new(&run.command)
            .args(run.args())
            .current_dir(&run.src_dir)
            .output()
            .with_context(|| {
                format!(
                    "failed to run `{}` (is it installed and on PATH?)",
                    self.command
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            );
        }
        Ok(run.src_dir.join(&run.output_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(command: &str, dir: &Path) -> GeneratorRun {
        let config = GeneratorConfig {
            command: command.to_string(),
            ..GeneratorConfig::default()
        };
        GeneratorRun::new(&config, &dir.join("model.json"), Language::Ts, dir)
    }

    #[test]
    fn test_args_follow_generator_cli() {
        let run = run_with("quicktype", Path::new("/work"));
        assert_eq!(
            run.args(),
            [
                "/work/model.json",
                "--lang",
                "ts",
                "--src",
                "/work",
                "-o",
                "SwaggerModel.ts"
            ]
        );
    }

    #[test]
    fn test_missing_binary_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_with("swag-no-such-generator", dir.path())
            .run()
            .unwrap_err();
        assert!(err.to_string().contains("swag-no-such-generator"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_checked() {
        let dir = tempfile::tempdir().unwrap();
        let ok = run_with("true", dir.path()).run().unwrap();
        assert_eq!(ok, dir.path().join("SwaggerModel.ts"));
        assert!(run_with("false", dir.path()).run().is_err());
    }

    /// Write an executable shell script that stands in for the generator.
    #[cfg(unix)]
    fn stub_generator(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("stub-generator.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_output_dir() {
        let bin = tempfile::tempdir().unwrap();
        let script = stub_generator(
            bin.path(),
            r#"test -f "$1" || { echo "no model at $1" >&2; exit 1; }
test -d "$5" || { echo "no source dir $5" >&2; exit 1; }
echo generated > "$5/$7""#,
        );

        // Relative to the working directory of the test process.
        let out = tempfile::tempdir_in(".").unwrap();
        let relative = PathBuf::from(out.path().file_name().unwrap());
        std::fs::write(relative.join("model.json"), "{}").unwrap();

        let config = GeneratorConfig {
            command: script.display().to_string(),
            ..GeneratorConfig::default()
        };
        let model = relative.join("model.json");
        let run = GeneratorRun::new(&config, &model, Language::Swift, &relative);
        let generated = run.run().unwrap();

        assert!(generated.is_absolute());
        assert_eq!(
            std::fs::read_to_string(&generated).unwrap().trim(),
            "generated"
        );
        assert!(generated.ends_with("SwaggerModel.swift"));
    }
}
